//! Random private key and auxiliary number generation.

use std::fmt;

use rand::rngs::OsRng;
use rand::RngCore;
use secp256k1::SecretKey;

use crate::error::Result;

/// A secp256k1 private key, a scalar in `[1, n - 1]`.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey(SecretKey);

impl PrivateKey {
    /// Builds a key from big-endian bytes.
    ///
    /// Returns `None` for zero or for values not below the curve order.
    pub fn from_bytes(bytes: [u8; 32]) -> Option<Self> {
        SecretKey::from_slice(&bytes).ok().map(Self)
    }

    /// Returns the key as 32 big-endian bytes.
    pub fn secret_bytes(&self) -> [u8; 32] {
        self.0.secret_bytes()
    }

    /// Returns the key as 64 lowercase hex characters (without 0x prefix).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0.secret_bytes())
    }

    /// Returns the underlying secp256k1 key.
    #[inline]
    pub(crate) fn secret_key(&self) -> &SecretKey {
        &self.0
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(..)")
    }
}

/// A 256-bit random number drawn alongside each key.
///
/// It has no relation to the key material and is only carried through to the
/// report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuxRandom([u8; 32]);

impl AuxRandom {
    /// Wraps 32 big-endian bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the raw 32 bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex of the integer value, without leading zeros.
    pub fn to_hex(&self) -> String {
        let full = hex::encode(self.0);
        match full.trim_start_matches('0') {
            "" => "0".to_string(),
            digits => digits.to_string(),
        }
    }
}

/// Produces candidate keys from a cryptographically secure source.
///
/// The default source is the operating system RNG. Failures of the source are
/// returned to the caller; there is no fallback.
#[derive(Debug)]
pub struct KeyGenerator<R = OsRng> {
    rng: R,
}

impl KeyGenerator<OsRng> {
    /// Creates a generator backed by the operating system RNG.
    pub fn new() -> Self {
        Self { rng: OsRng }
    }
}

impl Default for KeyGenerator<OsRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RngCore> KeyGenerator<R> {
    /// Uses a caller-provided random source.
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Draws a uniformly random private key and an independent 256-bit number.
    ///
    /// Both values come from a single 64-byte draw: the first half is the
    /// key candidate, the second half the auxiliary number. Draws whose key
    /// half falls outside `[1, n - 1]` are thrown away whole and redrawn.
    pub fn generate(&mut self) -> Result<(PrivateKey, AuxRandom)> {
        let mut draw = [0u8; 64];
        loop {
            self.rng.try_fill_bytes(&mut draw)?;

            let (key_half, aux_half) = draw.split_at(32);
            let mut key_bytes = [0u8; 32];
            key_bytes.copy_from_slice(key_half);

            if let Some(key) = PrivateKey::from_bytes(key_bytes) {
                let mut aux = [0u8; 32];
                aux.copy_from_slice(aux_half);
                return Ok((key, AuxRandom::from_bytes(aux)));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    /// Replays a fixed byte script, then fails.
    struct ScriptedRng {
        bytes: Vec<u8>,
    }

    impl RngCore for ScriptedRng {
        fn next_u32(&mut self) -> u32 {
            let mut buf = [0u8; 4];
            self.fill_bytes(&mut buf);
            u32::from_le_bytes(buf)
        }

        fn next_u64(&mut self) -> u64 {
            let lo = self.next_u32() as u64;
            let hi = self.next_u32() as u64;
            (hi << 32) | lo
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            self.try_fill_bytes(dest).unwrap()
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
            if self.bytes.len() < dest.len() {
                return Err(rand::Error::new("script exhausted"));
            }
            let rest = self.bytes.split_off(dest.len());
            dest.copy_from_slice(&self.bytes);
            self.bytes = rest;
            Ok(())
        }
    }

    #[test]
    fn test_generate_with_os_rng() {
        let mut gen = KeyGenerator::new();
        let (a, _) = gen.generate().unwrap();
        let (b, _) = gen.generate().unwrap();
        assert_eq!(a.to_hex().len(), 64);
        assert_ne!(a, b);
    }

    #[test]
    fn test_rejects_out_of_range_scalars() {
        let mut script = vec![0u8; 32]; // zero
        script.extend([0x11u8; 32]);
        script.extend([0xffu8; 32]); // above the curve order
        script.extend([0x22u8; 32]);
        let mut one = [0u8; 32];
        one[31] = 1;
        script.extend(one);
        script.extend([0xabu8; 32]);

        let mut gen = KeyGenerator::with_rng(ScriptedRng { bytes: script });
        let (key, aux) = gen.generate().unwrap();
        assert_eq!(key.secret_bytes(), one);
        assert_eq!(aux.as_bytes(), &[0xabu8; 32]);
    }

    #[test]
    fn test_entropy_failure_is_reported() {
        let mut gen = KeyGenerator::with_rng(ScriptedRng { bytes: vec![1u8; 8] });
        assert!(matches!(gen.generate(), Err(Error::Entropy(_))));
    }

    #[test]
    fn test_aux_hex_strips_leading_zeros() {
        let mut bytes = [0u8; 32];
        bytes[30] = 0x0a;
        bytes[31] = 0xbc;
        assert_eq!(AuxRandom::from_bytes(bytes).to_hex(), "abc");
        assert_eq!(AuxRandom::from_bytes([0u8; 32]).to_hex(), "0");
    }

    #[test]
    fn test_debug_hides_key_material() {
        let mut one = [0u8; 32];
        one[31] = 1;
        let key = PrivateKey::from_bytes(one).unwrap();
        assert_eq!(format!("{:?}", key), "PrivateKey(..)");
    }
}
