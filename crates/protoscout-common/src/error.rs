use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProtoscoutError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Endpoint unavailable: {0}")]
    EndpointUnavailable(String),

    #[error("All endpoints exhausted for {0}")]
    AllEndpointsExhausted(String),

    #[error("No descriptor for {0} in reflection response")]
    MissingDescriptor(String),

    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProtoscoutError {
    /// True when the failover invoker may fail the whole network for this
    /// error rather than skipping a single service.
    pub fn is_exhaustion(&self) -> bool {
        matches!(self, ProtoscoutError::AllEndpointsExhausted(_))
    }
}

pub type Result<T> = std::result::Result<T, ProtoscoutError>;
