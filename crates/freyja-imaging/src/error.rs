use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImagingError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx reply. `label` is the provider-specific message prefix.
    #[error("{label}: {reason} - {body}")]
    Upstream {
        label: &'static str,
        status: u16,
        reason: String,
        body: String,
    },

    #[error("no image URL returned by {provider}")]
    MissingImage { provider: &'static str },
}
