//! Thin clients for the hosted image generators used from the studio.
//!
//! Callers supply their own provider credentials on every call; nothing here
//! stores keys.

pub mod error;
pub mod higgsfield;
pub mod ideogram;
mod upstream;

pub use error::ImagingError;
pub use higgsfield::{HiggsfieldClient, NanoBananaRequest, DEFAULT_ASPECT_RATIO};
pub use ideogram::IdeogramClient;
