//! Website content acquisition for brand extraction.
//!
//! Fetches a page directly with browser-like headers, falls back to a
//! readability proxy when the direct attempt fails, and derives the cleaned
//! text and brand color candidates the profiler consumes.

pub mod acquire;
pub mod colors;
pub mod error;
pub mod normalize;
pub mod types;

pub use acquire::ContentAcquirer;
pub use colors::extract_color_candidates;
pub use error::ScraperError;
pub use normalize::{html_to_text, truncate_chars};
pub use types::{AcquiredContent, AcquisitionSource, AttemptFailure, AttemptOutcome};
