//! Error types for the merge crate.
//!
//! Resolution itself is total; only loading resolver configuration can fail.

/// Errors raised while loading resolver configuration.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The configuration text is not valid TOML for [`ResolutionConfig`](crate::ResolutionConfig).
    #[error("invalid resolver config: {0}")]
    Config(String),
}

impl From<toml::de::Error> for MergeError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for MergeError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Convenience alias for merge results.
pub type MergeResult<T> = Result<T, MergeError>;
