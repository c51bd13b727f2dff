//! Ethereum address representation and derivation.

use std::fmt;

use secp256k1::PublicKey;
use tiny_keccak::{Hasher, Keccak};

use super::PrivateKey;

/// Length of an address rendered with its `0x` marker.
pub const ADDRESS_HEX_LEN: usize = 42;

/// Number of hex digits after the `0x` marker.
pub const ADDRESS_NIBBLES: usize = 40;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// An Ethereum address (20 bytes).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address([u8; 20]);

impl Address {
    /// Creates an address from raw bytes.
    #[inline]
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Returns the lowercase ASCII hex digit at nibble `index`.
    ///
    /// Index 0 is the digit right after `0x`. Panics if `index` is not below
    /// [`ADDRESS_NIBBLES`].
    #[inline]
    pub fn hex_digit(&self, index: usize) -> u8 {
        let byte = self.0[index / 2];
        let nibble = if index % 2 == 0 { byte >> 4 } else { byte & 0x0f };
        HEX_DIGITS[nibble as usize]
    }

    /// Returns the address as a lowercase hex string (without 0x prefix).
    #[inline]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Returns the address as lowercase hex with 0x prefix.
    pub fn to_hex_prefixed(&self) -> String {
        let mut out = String::with_capacity(ADDRESS_HEX_LEN);
        out.push_str("0x");
        out.push_str(&self.to_hex());
        out
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex_prefixed())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex_prefixed())
    }
}

/// Derives the Ethereum address of a private key.
///
/// 1. Multiply the generator point by the key
/// 2. Serialize the point uncompressed and drop the 0x04 tag, leaving X || Y
///    as two 32-byte big-endian coordinates
/// 3. Hash the 64 bytes with Keccak-256
/// 4. Keep the last 20 bytes of the hash
#[inline]
pub fn derive(key: &PrivateKey) -> Address {
    let public_key = PublicKey::from_secret_key_global(key.secret_key());
    let public_key_bytes = public_key.serialize_uncompressed();

    let mut hasher = Keccak::v256();
    hasher.update(&public_key_bytes[1..]);

    let mut hash = [0u8; 32];
    hasher.finalize(&mut hash);

    let mut address_bytes = [0u8; 20];
    address_bytes.copy_from_slice(&hash[12..]);

    Address::from_bytes(address_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::KeyGenerator;

    fn key_from_u8(last: u8) -> PrivateKey {
        let mut bytes = [0u8; 32];
        bytes[31] = last;
        PrivateKey::from_bytes(bytes).unwrap()
    }

    #[test]
    fn test_known_address_for_key_one() {
        let address = derive(&key_from_u8(1));
        assert_eq!(
            address.to_hex_prefixed(),
            "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf"
        );
    }

    #[test]
    fn test_known_address_for_key_two() {
        let address = derive(&key_from_u8(2));
        assert_eq!(address.to_hex(), "2b5ad5c4795c026514f8317c7a215e218dccd6cf");
    }

    #[test]
    fn test_derive_is_deterministic() {
        let mut gen = KeyGenerator::new();
        for _ in 0..16 {
            let (key, _) = gen.generate().unwrap();
            assert_eq!(derive(&key), derive(&key));
        }
    }

    #[test]
    fn test_rendered_length() {
        let mut gen = KeyGenerator::new();
        for _ in 0..16 {
            let (key, _) = gen.generate().unwrap();
            let rendered = derive(&key).to_hex_prefixed();
            assert_eq!(rendered.len(), ADDRESS_HEX_LEN);
            assert!(rendered.starts_with("0x"));
            assert!(rendered[2..]
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        }
    }

    #[test]
    fn test_hex_digit_agrees_with_hex_string() {
        let mut gen = KeyGenerator::new();
        let (key, _) = gen.generate().unwrap();
        let address = derive(&key);
        let rendered = address.to_hex();

        for (i, expected) in rendered.bytes().enumerate() {
            assert_eq!(address.hex_digit(i), expected);
        }
        assert_eq!(rendered.len(), ADDRESS_NIBBLES);
    }

    #[test]
    fn test_hex_output() {
        let addr = Address::from_bytes([0u8; 20]);
        assert_eq!(addr.to_hex(), "0000000000000000000000000000000000000000");
        assert_eq!(
            addr.to_string(),
            "0x0000000000000000000000000000000000000000"
        );
    }
}
