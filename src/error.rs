use thiserror::Error;

/// Failure talking to the content provider: transport, credentials or HTTP status.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProviderError {
    #[error("no API credential configured (set API_KEY)")]
    MissingCredential,

    #[error("request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("network error: {0}")]
    Network(String),

    #[error("provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("provider returned no text")]
    EmptyResponse,
}

/// The provider answered, but the payload does not match the expected shape.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("response is not valid JSON for {target}: {message}")]
    Decode {
        target: &'static str,
        message: String,
    },

    #[error("response is missing required field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` has non-finite value")]
    NonFinite { field: &'static str },
}

/// Anything that can go wrong between asking for content and holding a validated value.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ContentError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {name} must be a non-negative integer, got `{value}`")]
    InvalidNumber { name: &'static str, value: String },
}
