//! Submission to the archive service
//!
//! A submission is a single request with a bounded timeout. It is never
//! retried in place; retry belongs to the queue's next drain.

pub mod outcome;
pub mod wayback;

use futures::future::BoxFuture;

pub use outcome::SubmitOutcome;
pub use wayback::WaybackClient;

/// Submits one URL to the archive
///
/// Implementations must not panic and have no error channel: every failure
/// mode is a non-success [`SubmitOutcome`].
pub trait Submitter: Send + Sync {
    fn submit<'a>(&'a self, url: &'a str) -> BoxFuture<'a, SubmitOutcome>;
}
