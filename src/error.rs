//! Error types for the archiver
//!
//! Parse and transport failures never surface as errors: the canonicalizer
//! returns `None` and the submitter returns a failed outcome. What remains is
//! storage failure and invalid configuration.

/// Errors raised by a [`KvStore`](crate::store::KvStore) implementation
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed
    #[error("Store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file is not a JSON object
    #[error("Store file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A stored value does not have the shape its key requires
    #[error("Value under '{key}' has an unexpected shape: {message}")]
    Decode { key: String, message: String },

    /// The store cannot serve requests (closed, poisoned, injected failure)
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Convenience alias for Result with `StoreError`
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors detected while validating an [`ArchiverConfig`](crate::config::ArchiverConfig)
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A CSS selector from the site profile does not parse
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// A regex from the site profile does not compile
    #[error("Invalid pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },

    /// Any other out-of-range or malformed value
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level error for pipeline phases
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A click target handed over by the host page is not a usable selector
    #[error("Invalid click target '{0}'")]
    ClickTarget(String),
}

/// Convenience alias for Result with `ArchiveError`
pub type ArchiveResult<T> = Result<T, ArchiveError>;
