//! # Controllers Module
//!
//! The analysis state machine and the terminal loop that drives it.

pub mod analysis_controller;
pub mod app_controller;

pub use analysis_controller::{
    AnalysisController, AnalysisPhase, Completion, PendingAnalysis, PRIMARY_SEED, SECONDARY_SEED,
};
pub use app_controller::AppController;
