//! Display formatting for council address data.
//!
//! The council gazetteer returns addresses as one shouty free-text string
//! per property, often with the postcode, county, and property reference
//! glued onto the end. [`format_display_address`] turns that into a short,
//! title-cased label suitable for a selection list.

pub mod address;
pub mod normalize;
pub mod postcode;
pub mod title_case;

pub use address::{format_display_address, AddressFormatter, INVALID_ADDRESS};
pub use postcode::{format_postcode, normalize_postcode};
pub use title_case::title_case;
