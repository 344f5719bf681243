pub mod constants;
pub mod url_utils;

pub use constants::*;
pub use url_utils::{
    absolutize_protocol_relative, is_valid_url, registrable_host, save_url,
};

/// Current wall-clock time in epoch milliseconds
///
/// Queue tasks and cooldown records store this representation.
#[must_use]
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
