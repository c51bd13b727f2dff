//! # eth_vanity
//!
//! Multi-threaded Ethereum vanity address search.
//!
//! ## Architecture
//!
//! - `crypto`: Key generation and address derivation
//! - `matcher`: Prefix/suffix pattern matching
//! - `worker`: Worker pool with first-match cancellation
//! - `report`: Result display and persistence
//! - `config`: Runtime configuration

pub mod config;
pub mod crypto;
pub mod error;
pub mod matcher;
pub mod report;
pub mod worker;

pub use config::Config;
pub use crypto::{derive, Address, AuxRandom, KeyGenerator, PrivateKey};
pub use error::{Error, Result};
pub use matcher::{matches, AddressMatcher, Pattern, PatternType};
pub use worker::{search, SearchStatus, VanityResult, WorkerPool};
