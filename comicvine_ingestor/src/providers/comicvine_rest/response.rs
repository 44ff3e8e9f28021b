use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::providers::ProviderError;

/// Every ComicVine response wraps its payload in this envelope. `status_code`
/// is 1 on success; anything else is an API-level error even when the HTTP
/// status is 200.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    pub error: String,
    pub status_code: i32,
    #[serde(default)]
    pub number_of_total_results: i64,
    #[serde(default)]
    pub offset: i64,
    #[serde(default)]
    pub limit: i64,
    #[serde(default)]
    pub results: serde_json::Value,
}

const OK_STATUS: i32 = 1;

impl Envelope {
    /// Unwraps the envelope: an error status becomes
    /// [`ProviderError::Service`], and the `results` payload is only decoded
    /// once the status is known good (error envelopes carry a `results`
    /// shape that does not match the success schema).
    pub fn into_results<T: DeserializeOwned>(self) -> Result<T, ProviderError> {
        if self.status_code != OK_STATUS {
            return Err(ProviderError::Service {
                status: self.status_code,
                message: self.error,
            });
        }
        serde_json::from_value(self.results).map_err(|e| ProviderError::Payload(e.to_string()))
    }
}
