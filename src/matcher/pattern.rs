//! Pattern matching implementation.

use std::fmt;

use crate::crypto::{Address, ADDRESS_NIBBLES};

/// Marker placed in front of the hex body of a rendered address.
const HEX_MARKER: &str = "0x";

/// Where in the address the pattern has to appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PatternType {
    /// Match the characters right after `0x`
    Prefix,
    /// Match the trailing characters
    #[default]
    Suffix,
}

impl PatternType {
    /// Returns true for [`PatternType::Prefix`].
    #[inline]
    pub fn is_prefix(self) -> bool {
        matches!(self, PatternType::Prefix)
    }
}

impl fmt::Display for PatternType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternType::Prefix => write!(f, "prefix"),
            PatternType::Suffix => write!(f, "suffix"),
        }
    }
}

/// Anything that can decide whether a derived address is a hit.
///
/// The worker pool is generic over this so the search loop does not care how
/// the decision is made.
pub trait AddressMatcher: Send + Sync {
    fn is_match(&self, address: &Address) -> bool;
}

/// Tests `address` against `pattern`.
///
/// Prefix mode compares with the characters following the `0x` marker,
/// suffix mode with the trailing characters. Comparison is byte for byte.
/// An empty pattern, or an address body shorter than the pattern, never
/// matches.
#[inline]
pub fn matches(address: &str, pattern: &str, is_prefix: bool) -> bool {
    if pattern.is_empty() {
        return false;
    }

    let body = address.strip_prefix(HEX_MARKER).unwrap_or(address);
    if body.len() < pattern.len() {
        return false;
    }

    if is_prefix {
        body.as_bytes().starts_with(pattern.as_bytes())
    } else {
        body.as_bytes().ends_with(pattern.as_bytes())
    }
}

/// An immutable search pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    /// The pattern string, compared as-is
    pattern: String,
    /// The pattern type
    pattern_type: PatternType,
}

impl Pattern {
    /// Creates a new pattern.
    pub fn new(pattern: impl Into<String>, pattern_type: PatternType) -> Self {
        Self {
            pattern: pattern.into(),
            pattern_type,
        }
    }

    /// Parses raw user input.
    ///
    /// A leading `p` on input longer than one character selects prefix mode
    /// and is stripped. Anything else is taken whole as a suffix. A lone `p`
    /// is the suffix `"p"`.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match raw.strip_prefix('p') {
            Some(rest) if !rest.is_empty() => Self::new(rest, PatternType::Prefix),
            _ => Self::new(raw, PatternType::Suffix),
        }
    }

    /// Returns the pattern string.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns the pattern type.
    pub fn pattern_type(&self) -> PatternType {
        self.pattern_type
    }

    /// Returns true if the pattern is compared right after `0x`.
    pub fn is_prefix(&self) -> bool {
        self.pattern_type.is_prefix()
    }

    /// Matches an address against this pattern.
    ///
    /// Same outcome as [`matches()`] on the rendered address, but compares
    /// digit by digit without rendering it.
    #[inline]
    pub fn matches(&self, address: &Address) -> bool {
        let pattern = self.pattern.as_bytes();
        if pattern.is_empty() || pattern.len() > ADDRESS_NIBBLES {
            return false;
        }

        let offset = if self.is_prefix() {
            0
        } else {
            ADDRESS_NIBBLES - pattern.len()
        };

        pattern
            .iter()
            .enumerate()
            .all(|(i, &digit)| address.hex_digit(offset + i) == digit)
    }

    /// Returns true if no derived address can ever satisfy this pattern.
    ///
    /// Derived addresses are lowercase hex, so empty patterns and patterns
    /// holding anything other than `0-9a-f` never match.
    pub fn is_unsatisfiable(&self) -> bool {
        self.pattern.is_empty()
            || self.pattern.len() > ADDRESS_NIBBLES
            || !self
                .pattern
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
    }

    /// Returns the estimated difficulty (number of attempts to find a match).
    ///
    /// For hex patterns:
    /// - Each character has 16 possible values
    /// - Expected attempts = 16^n where n is pattern length
    pub fn estimated_difficulty(&self) -> u64 {
        16u64.saturating_pow(self.pattern.len() as u32)
    }

    /// Returns a human-readable difficulty estimate.
    pub fn difficulty_description(&self) -> String {
        if self.is_unsatisfiable() {
            return "Impossible (never matches)".into();
        }
        let diff = self.estimated_difficulty();
        match diff {
            0..=1_000 => "Very Easy (< 1 second)".into(),
            1_001..=100_000 => "Easy (seconds)".into(),
            100_001..=10_000_000 => "Medium (minutes)".into(),
            10_000_001..=1_000_000_000 => "Hard (hours)".into(),
            _ => "Very Hard (days or more)".into(),
        }
    }
}

impl AddressMatcher for Pattern {
    #[inline]
    fn is_match(&self, address: &Address) -> bool {
        self.matches(address)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.pattern, self.pattern_type)
    }
}
