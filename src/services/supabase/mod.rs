//! Outbound client for the Supabase REST and Auth APIs.
mod client;
mod error;
pub mod types;

pub use client::SupabaseClient;
pub use error::{SupabaseError, SupabaseResult};
