//! Pattern matching for Ethereum addresses.
//!
//! Supports two matching strategies:
//! - Prefix: Match right after the `0x` marker
//! - Suffix: Match at the end of the address

mod pattern;

pub use pattern::{matches, AddressMatcher, Pattern, PatternType};
