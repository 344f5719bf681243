//! Classification of save responses

use std::fmt;

/// Result of one save request
///
/// Only [`SubmitOutcome::Archived`] counts as success; every other variant
/// leaves the task in the queue for the next drain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// 2xx or 3xx response
    Archived { status: u16 },
    /// The service is shedding load (429, 503, 520-529)
    Overloaded { status: u16 },
    /// Any other non-success status
    Rejected { status: u16 },
    /// No response within the request timeout
    TimedOut,
    /// Connection-level failure
    Transport(String),
}

impl SubmitOutcome {
    /// Classify an HTTP status code
    #[must_use]
    pub fn from_status(status: u16) -> Self {
        match status {
            200..=399 => Self::Archived { status },
            429 | 503 | 520..=529 => Self::Overloaded { status },
            _ => Self::Rejected { status },
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Archived { .. })
    }
}

impl fmt::Display for SubmitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Archived { status } => write!(f, "archived (HTTP {status})"),
            Self::Overloaded { status } => write!(f, "archive overloaded (HTTP {status})"),
            Self::Rejected { status } => write!(f, "rejected (HTTP {status})"),
            Self::TimedOut => write!(f, "timed out"),
            Self::Transport(msg) => write!(f, "network error: {msg}"),
        }
    }
}
