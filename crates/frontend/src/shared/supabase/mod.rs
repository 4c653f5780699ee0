//! Query façade over the hosted PostgREST endpoint
//!
//! Pages never build URLs by hand: they describe a read with
//! [`contracts::shared::store_query::StoreQuery`] and hand it to a
//! [`SalesStore`]. The browser build talks to Supabase through
//! [`SupabaseClient`]; tests run the same descriptors against
//! `memory::MemoryStore`.

pub mod client;
pub mod error;
#[cfg(test)]
pub mod memory;
pub mod postgrest;

pub use client::{fetch, fetch_all, MailIngestion, SalesStore, SupabaseClient};
pub use error::StoreError;
