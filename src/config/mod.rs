//! Configuration module for the archiver
//!
//! This module provides the `ArchiverConfig` struct, its builder, and the
//! `SiteProfile` that isolates the site-specific URL and markup conventions.

// Sub-modules
pub mod builder;
pub mod getters;
pub mod methods;
pub mod site;
pub mod types;

// Re-exports for public API
pub use builder::ArchiverConfigBuilder;
pub use site::{SiteProfile, SiteRules};
pub use types::{ArchiverConfig, SubmitMethod};
