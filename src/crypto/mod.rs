//! Cryptographic operations for Ethereum key and address generation.
//!
//! This module provides:
//! - Secure random key generation using secp256k1
//! - Ethereum address derivation using Keccak-256

mod address;
mod keygen;

pub use address::{derive, Address, ADDRESS_HEX_LEN, ADDRESS_NIBBLES};
pub use keygen::{AuxRandom, KeyGenerator, PrivateKey};
