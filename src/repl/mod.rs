//! # Analysis Front End
//!
//! MVVM layout: models hold data, services reach the backend, view models
//! shape results for display, controllers own state transitions and views draw.

pub mod commands;
pub mod controllers;
pub mod io;
pub mod models;
pub mod services;
pub mod view_models;
pub mod views;

pub use controllers::{
    AnalysisController, AnalysisPhase, AppController, Completion, PendingAnalysis,
};
pub use models::{
    AnalysisOutcome, AnalysisRequest, Mode, RawResult, TransportFailure, TransportResult,
};
pub use services::{classify_failure, AnalysisTransport, HttpService, ScriptedTransport};
pub use view_models::{render_result, RenderedResult, ResultView};
