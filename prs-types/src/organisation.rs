//! Organisation identifiers and usage-tier ranking.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PrsError;

/// An 8-digit healthcare-organisation identifier (URA, GLOSSARY).
///
/// Always stored zero-padded to 8 digits, matching its canonical wire form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UraNumber([u8; 8]);

impl UraNumber {
    /// Parses an 8-digit URA from its bare digit string (no `ura:` prefix).
    ///
    /// # Errors
    /// Returns [`PrsError::InvalidUra`] unless `value` is exactly 8 ASCII
    /// digits.
    pub fn new(value: &str) -> Result<Self, PrsError> {
        let bytes = value.as_bytes();
        if bytes.len() != 8 || !bytes.iter().all(u8::is_ascii_digit) {
            return Err(PrsError::InvalidUra(format!(
                "URA must be 8 digits, got {value:?}"
            )));
        }
        let mut digits = [0u8; 8];
        digits.copy_from_slice(bytes);
        Ok(Self(digits))
    }

    /// Parses a `"ura:<digits>"` string (spec §4.8.1 step 1).
    ///
    /// # Errors
    /// Returns [`PrsError::InvalidUra`] if the `ura:` prefix is missing or
    /// the remainder is not a valid 8-digit URA.
    pub fn parse_prefixed(value: &str) -> Result<Self, PrsError> {
        let digits = value
            .strip_prefix("ura:")
            .ok_or_else(|| PrsError::InvalidUra(format!("missing 'ura:' prefix: {value:?}")))?;
        Self::new(digits)
    }

    /// Returns the `"ura:<digits>"` wire form.
    pub fn as_prefixed_string(&self) -> String {
        format!("ura:{self}")
    }
}

impl fmt::Display for UraNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // SAFETY: constructed only from ASCII digit bytes.
        f.write_str(std::str::from_utf8(&self.0).expect("URA digits are ASCII"))
    }
}

impl FromStr for UraNumber {
    type Err = PrsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Ordered usage tier governing what pseudonym types may ever be derived
/// on an organisation's behalf, and what a RID's declared ceiling permits
/// (spec §3, §4.7).
///
/// Ranks: `irp:1 < rp:2 < bsn:3`. The derived [`Ord`] follows declaration
/// order, so `a >= b` reads directly as "rank(a) >= rank(b)".
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum UsageTier {
    /// Irreversible pseudonyms only. Rank 1.
    Irp,
    /// Reversible pseudonyms (and everything `Irp` allows). Rank 2.
    Rp,
    /// The raw BSN (and everything `Rp` allows). Rank 3.
    Bsn,
}

impl UsageTier {
    /// Returns the numeric rank backing the tier's ordering (spec §3).
    pub fn rank(&self) -> u8 {
        match self {
            UsageTier::Irp => 1,
            UsageTier::Rp => 2,
            UsageTier::Bsn => 3,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            UsageTier::Irp => "irp",
            UsageTier::Rp => "rp",
            UsageTier::Bsn => "bsn",
        }
    }
}

impl fmt::Display for UsageTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UsageTier {
    type Err = PrsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "irp" => Ok(UsageTier::Irp),
            "rp" => Ok(UsageTier::Rp),
            "bsn" => Ok(UsageTier::Bsn),
            other => Err(PrsError::InvalidInput(format!("unknown usage tier: {other}"))),
        }
    }
}

/// An organisation known to the PRS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Organisation {
    /// The organisation's unique URA.
    pub ura: UraNumber,
    /// Display name.
    pub name: String,
    /// The ceiling on what pseudonym types may ever be derived on this
    /// organisation's behalf (spec §3).
    pub max_rid_usage: UsageTier,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ura_zero_length_roundtrip() {
        let ura = UraNumber::new("12345678").unwrap();
        assert_eq!(ura.to_string(), "12345678");
        assert_eq!(ura.as_prefixed_string(), "ura:12345678");
    }

    #[test]
    fn ura_rejects_non_digits_or_wrong_length() {
        assert!(UraNumber::new("1234567").is_err());
        assert!(UraNumber::new("123456789").is_err());
        assert!(UraNumber::new("1234567a").is_err());
    }

    #[test]
    fn ura_prefixed_parse() {
        assert!(UraNumber::parse_prefixed("87654321").is_err());
        assert_eq!(
            UraNumber::parse_prefixed("ura:87654321").unwrap(),
            UraNumber::new("87654321").unwrap()
        );
    }

    #[test]
    fn usage_tier_rank_order() {
        assert!(UsageTier::Irp < UsageTier::Rp);
        assert!(UsageTier::Rp < UsageTier::Bsn);
        assert!(UsageTier::Bsn >= UsageTier::Irp);
    }

    #[test]
    fn usage_tier_display_and_parse_roundtrip() {
        for tier in [UsageTier::Irp, UsageTier::Rp, UsageTier::Bsn] {
            assert_eq!(tier.to_string().parse::<UsageTier>().unwrap(), tier);
        }
    }
}
