//! # Analysis Modes
//!
//! The closed set of operations the analysis service offers, and the static
//! facts each one carries. Every per-mode decision in the crate routes through
//! [`Mode::spec`] so that a new mode is one table entry plus one renderer branch.

use std::fmt;
use std::str::FromStr;

/// One of the four remote analysis operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    #[default]
    Compare,
    Indent,
    Syntax,
    AiSummary,
}

/// Static description of a mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeSpec {
    /// Whether the request carries the secondary buffer as well
    pub requires_secondary_buffer: bool,
    /// Endpoint path relative to the service address, trailing slash included
    pub endpoint_path: &'static str,
    /// Tab title
    pub title: &'static str,
    /// Label of the analyze action
    pub action_label: &'static str,
    /// Title of the primary buffer pane
    pub primary_title: &'static str,
}

impl Mode {
    /// All modes in tab order
    pub const ALL: [Mode; 4] = [Mode::Compare, Mode::Indent, Mode::Syntax, Mode::AiSummary];

    /// Look up the static description of this mode
    pub const fn spec(self) -> ModeSpec {
        match self {
            Mode::Compare => ModeSpec {
                requires_secondary_buffer: true,
                endpoint_path: "/compare/",
                title: "Compare Code",
                action_label: "Compare Code",
                primary_title: "Original Code",
            },
            Mode::Indent => ModeSpec {
                requires_secondary_buffer: false,
                endpoint_path: "/indent/",
                title: "Indentation Check",
                action_label: "Check Indentation",
                primary_title: "Enter Code",
            },
            Mode::Syntax => ModeSpec {
                requires_secondary_buffer: false,
                endpoint_path: "/syntax/",
                title: "Syntax Validation",
                action_label: "Validate Syntax",
                primary_title: "Enter Code",
            },
            Mode::AiSummary => ModeSpec {
                requires_secondary_buffer: true,
                endpoint_path: "/ai/summary/",
                title: "AI Summary",
                action_label: "Get AI Summary",
                primary_title: "Enter Code",
            },
        }
    }

    pub const fn requires_secondary_buffer(self) -> bool {
        self.spec().requires_secondary_buffer
    }

    pub const fn endpoint_path(self) -> &'static str {
        self.spec().endpoint_path
    }

    /// Title of the primary buffer pane in this mode
    pub const fn primary_title(self) -> &'static str {
        self.spec().primary_title
    }

    /// Position in [`Mode::ALL`], used for tab highlighting
    pub fn index(self) -> usize {
        Mode::ALL.iter().position(|m| *m == self).unwrap_or(0)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Compare => "compare",
            Mode::Indent => "indent",
            Mode::Syntax => "syntax",
            Mode::AiSummary => "ai",
        };
        f.write_str(name)
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compare" => Ok(Mode::Compare),
            "indent" => Ok(Mode::Indent),
            "syntax" => Ok(Mode::Syntax),
            "ai" | "ai-summary" | "summary" => Ok(Mode::AiSummary),
            other => Err(format!(
                "unknown mode '{other}' (expected compare, indent, syntax or ai)"
            )),
        }
    }
}
