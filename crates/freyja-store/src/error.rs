use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid or expired access token")]
    Unauthorized,

    #[error("no completion API key configured for this account")]
    MissingApiKey,

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{context} returned HTTP {status}")]
    UnexpectedStatus { context: &'static str, status: u16 },

    #[error("invalid response: {0}")]
    Deserialize(String),
}
