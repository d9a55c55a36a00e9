use serde::Serialize;

/// Which acquisition method produced the page content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AcquisitionSource {
    Direct,
    ProxyFallback,
}

impl AcquisitionSource {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            AcquisitionSource::Direct => "direct",
            AcquisitionSource::ProxyFallback => "proxy-fallback",
        }
    }
}

impl std::fmt::Display for AcquisitionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Page content obtained for one invocation.
#[derive(Debug, Clone)]
pub struct AcquiredContent {
    pub source: AcquisitionSource,
    /// Raw HTML for direct fetches, proxy text/markdown otherwise.
    pub raw: String,
    /// Tag-free text for direct fetches; the proxy body unchanged otherwise.
    pub cleaned_text: String,
}

impl AcquiredContent {
    /// Raw HTML, available only when the direct fetch succeeded.
    #[must_use]
    pub fn raw_html(&self) -> Option<&str> {
        match self.source {
            AcquisitionSource::Direct => Some(&self.raw),
            AcquisitionSource::ProxyFallback => None,
        }
    }
}

/// Result of a single acquisition attempt.
///
/// Failures are values, not errors: the caller decides whether another
/// strategy is worth trying.
#[derive(Debug)]
pub enum AttemptOutcome {
    Success(String),
    Failed(AttemptFailure),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptFailure {
    Status(u16),
    Timeout,
    Network(String),
    Body(String),
    TooShort { len: usize },
}

impl std::fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttemptFailure::Status(status) => write!(f, "HTTP status {status}"),
            AttemptFailure::Timeout => write!(f, "timed out"),
            AttemptFailure::Network(reason) => write!(f, "network error: {reason}"),
            AttemptFailure::Body(reason) => write!(f, "unreadable body: {reason}"),
            AttemptFailure::TooShort { len } => write!(f, "body too short ({len} chars)"),
        }
    }
}
