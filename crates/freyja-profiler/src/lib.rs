//! Brand attribute inference.
//!
//! Renders the brand-analysis prompt, calls an OpenAI-compatible chat
//! completion endpoint, and turns the reply into a [`BrandProfile`]. The
//! [`BrandExtractionPipeline`] ties acquisition and inference together.
//!
//! [`BrandProfile`]: freyja_core::BrandProfile

pub mod client;
pub mod error;
pub mod infer;
pub mod parse;
pub mod pipeline;
pub mod prompt;

pub use client::{CompletionClient, CompletionOptions};
pub use error::{PipelineError, ProfilerError};
pub use infer::infer_brand_profile;
pub use pipeline::{BrandExtractionPipeline, PipelineConfig};
pub use prompt::{PromptTemplate, Slot};
