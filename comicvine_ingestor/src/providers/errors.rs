use shared_utils::env::MissingEnvVarError;
use thiserror::Error;

/// Errors that can occur within a `MetadataProvider` implementation.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// An error during the HTTP request itself (network failure, DNS, TLS).
    #[error("API request failed: {0}")]
    Request(reqwest::Error),

    /// The API answered, but with an error envelope or a non-success HTTP
    /// status (rate limited, invalid key, 5xx).
    #[error("API error {status}: {message}")]
    Service { status: i32, message: String },

    /// The request exceeded the configured timeout.
    #[error("API request timed out")]
    Timeout,

    /// The response body did not match the expected schema.
    #[error("malformed API payload: {0}")]
    Payload(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Payload(err.to_string())
        } else {
            Self::Request(err)
        }
    }
}

impl ProviderError {
    /// Whether the failure is the remote service misbehaving (retryable
    /// later) as opposed to a payload we will never be able to parse.
    pub fn is_transient(&self) -> bool {
        !matches!(self, Self::Payload(_))
    }
}

/// Errors constructing a provider instance.
#[derive(Debug, Error)]
pub enum ProviderInitError {
    #[error(transparent)]
    MissingCredential(#[from] MissingEnvVarError),

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}
