//! Navigation monitor
//!
//! Turns page navigations and reveal clicks into archive queue entries and
//! keeps the queue draining. State machine per evaluation:
//! `Idle -> Evaluating -> Discovering -> Queueing -> Idle`.

pub mod archiver;
pub mod commands;
pub mod context;
pub mod debounce;
pub mod interaction;
pub mod runner;

pub use archiver::{Archiver, Collaborators, PageChange};
pub use commands::{ArchiverStatus, save_label};
pub use context::{ArchiverContext, EvaluationGuard, MonitorState, SaveGuard};
pub use debounce::Debouncer;
pub use runner::NavigationSignal;
