use thiserror::Error;

use freyja_scraper::ScraperError;

#[derive(Debug, Error)]
pub enum ProfilerError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("completion API returned {status}: {detail}")]
    Upstream { status: u16, detail: String },

    #[error("malformed model response: {reason}")]
    MalformedResponse { reason: String },
}

/// Failure of a full extraction run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Acquisition(#[from] ScraperError),

    #[error(transparent)]
    Inference(#[from] ProfilerError),
}
