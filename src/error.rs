use thiserror::Error;

/// Why a load from the price provider failed. The `Display` text is what the
/// operator sees in the notice strip.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("price provider unavailable (HTTP {status})")]
    ProviderUnavailable { status: u16 },

    #[error("unexpected response format: {0}")]
    UnexpectedFormat(String),

    #[error("network failure: {0}")]
    NetworkFailure(String),
}

impl From<reqwest::Error> for LoadError {
    fn from(err: reqwest::Error) -> Self {
        LoadError::NetworkFailure(err.to_string())
    }
}

pub type LoadResult<T> = Result<T, LoadError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config value {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}
