use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unable to reach {url}: direct fetch and readability proxy both failed")]
    Unreachable { url: String },
}
