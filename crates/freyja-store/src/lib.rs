//! Supabase access for the HTTP surface: caller identity and per-user
//! settings, both over the hosted REST endpoints.

pub mod client;
pub mod error;

pub use client::{AuthenticatedUser, SupabaseClient};
pub use error::StoreError;
