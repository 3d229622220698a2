//! Client for the council address and bin collection lookups.
//!
//! Two calls, both plain JSON over HTTPS:
//! - addresses for a postcode (`/addresses?postcode=…`)
//! - next collection dates for a property (`/collections?uprn=…&postcode=…`)

pub mod client;
pub mod schedule;
pub mod types;

pub use client::{CouncilClient, DEFAULT_API_BASE, DEFAULT_TIMEOUT};
