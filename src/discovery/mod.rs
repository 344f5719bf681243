//! Content discovery
//!
//! Finds the external URLs an item references (embedded media, outbound
//! links) inside its container element, and provides the bounded wait used
//! while that container is still rendering.

pub mod extractor;
pub mod tree;
pub mod wait;

pub use extractor::ContentDiscoverer;
pub use tree::{closest, match_ordinal, nth_match_html};
pub use wait::{MutationSubscription, find_in_snapshot, find_within, wait_for_element};
