//! # codepad - Terminal Client for a Code Analysis Service
//!
//! Submit source code to one of four remote analyses (diff comparison,
//! indentation check, syntax validation, AI change summary) and read the
//! result inline.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   draws    ┌──────────────────┐   builds    ┌───────────┐
//! │    Views    │◄───────────│ AnalysisController│────────────►│  Models   │
//! │ - Terminal  │            │ - Mode, buffers   │             │ - Request │
//! │   renderer  │            │ - Idle/Loading/   │             │ - Outcome │
//! └─────────────┘            │   Success/Failure │             └───────────┘
//!        ▲                   └──────────────────┘
//!        │                      ▲            │ send
//!        │                      │ commands   ▼
//! ┌──────────────┐       ┌──────────────┐  ┌────────────────────┐
//! │ View models  │       │ AppController│  │ Services           │
//! │ - Diff, prose│       │ - Event loop │  │ - HTTP transport   │
//! │ - Fallback   │       │ - Key mapping│  │ - Error classifier │
//! └──────────────┘       └──────────────┘  └────────────────────┘
//! ```

pub mod cmd_args;
pub mod config;
pub mod logging;
pub mod repl;

// Re-export main types for easy access
pub use repl::*;
