//! Typed pseudonym string wrappers (spec §3).
//!
//! Pseudonyms are opaque, printable strings with a typed prefix. These
//! wrappers exist so that a pseudonym's kind is encoded in the Rust type
//! system instead of re-parsed ad hoc at every call site; the actual
//! cryptographic construction lives in `prs-core`.

use std::fmt;
use std::str::FromStr;

use crate::error::PrsError;

/// Prefix for an irreversible pseudonym string.
pub const IRREVERSIBLE_PREFIX: &str = "pseudonym:irreversible:";
/// Prefix for a reversible pseudonym string.
pub const REVERSIBLE_PREFIX: &str = "pseudonym:reversible:";
/// Prefix for a RID string.
pub const RID_PREFIX: &str = "rid:";
/// Prefix for an OPRF evaluation subject string.
pub const OPRF_EVAL_PREFIX: &str = "pseudonym:eval:";

/// The pseudonym type requested for a direct exchange (spec §4.8.1).
///
/// Distinct from [`crate::UsageTier`]: a direct exchange never returns the
/// raw BSN, only irreversible or reversible pseudonyms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectPseudonymType {
    /// One-way, per-recipient pseudonym.
    Irreversible,
    /// Deterministic, AEAD-wrapped pseudonym the same recipient can later
    /// decrypt.
    Reversible,
}

impl fmt::Display for DirectPseudonymType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DirectPseudonymType::Irreversible => "irreversible",
            DirectPseudonymType::Reversible => "reversible",
        })
    }
}

impl FromStr for DirectPseudonymType {
    type Err = PrsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "irreversible" => Ok(DirectPseudonymType::Irreversible),
            "reversible" => Ok(DirectPseudonymType::Reversible),
            other => Err(PrsError::InvalidInput(format!(
                "unknown pseudonym type: {other}"
            ))),
        }
    }
}

/// A parsed, typed-prefix pseudonym string (spec §3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pseudonym {
    /// `pseudonym:irreversible:<b64url(32 bytes)>`
    Irreversible(String),
    /// `pseudonym:reversible:<b64url(tag‖ct)>`
    Reversible(String),
    /// `rid:<b64url(nonce‖tag‖ct)>`
    Rid(String),
    /// `pseudonym:eval:<b64url(E)>`
    OprfEval(String),
}

impl Pseudonym {
    /// Parses a typed-prefix pseudonym string, returning the payload
    /// (everything after the prefix) tagged by kind.
    ///
    /// # Errors
    /// Returns [`PrsError::InvalidInput`] if no known prefix matches.
    pub fn parse(s: &str) -> Result<Self, PrsError> {
        if let Some(payload) = s.strip_prefix(IRREVERSIBLE_PREFIX) {
            Ok(Pseudonym::Irreversible(payload.to_string()))
        } else if let Some(payload) = s.strip_prefix(REVERSIBLE_PREFIX) {
            Ok(Pseudonym::Reversible(payload.to_string()))
        } else if let Some(payload) = s.strip_prefix(OPRF_EVAL_PREFIX) {
            Ok(Pseudonym::OprfEval(payload.to_string()))
        } else if let Some(payload) = s.strip_prefix(RID_PREFIX) {
            Ok(Pseudonym::Rid(payload.to_string()))
        } else {
            Err(PrsError::InvalidInput("unrecognised pseudonym prefix".into()))
        }
    }
}

impl fmt::Display for Pseudonym {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pseudonym::Irreversible(p) => write!(f, "{IRREVERSIBLE_PREFIX}{p}"),
            Pseudonym::Reversible(p) => write!(f, "{REVERSIBLE_PREFIX}{p}"),
            Pseudonym::Rid(p) => write!(f, "{RID_PREFIX}{p}"),
            Pseudonym::OprfEval(p) => write!(f, "{OPRF_EVAL_PREFIX}{p}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_each_prefix() {
        assert!(matches!(
            Pseudonym::parse("pseudonym:irreversible:abc").unwrap(),
            Pseudonym::Irreversible(p) if p == "abc"
        ));
        assert!(matches!(
            Pseudonym::parse("pseudonym:reversible:abc").unwrap(),
            Pseudonym::Reversible(p) if p == "abc"
        ));
        assert!(matches!(
            Pseudonym::parse("rid:abc").unwrap(),
            Pseudonym::Rid(p) if p == "abc"
        ));
        assert!(matches!(
            Pseudonym::parse("pseudonym:eval:abc").unwrap(),
            Pseudonym::OprfEval(p) if p == "abc"
        ));
    }

    #[test]
    fn rejects_unknown_prefix() {
        assert!(Pseudonym::parse("nonsense:abc").is_err());
    }

    #[test]
    fn display_roundtrips_parse() {
        let original = "pseudonym:reversible:deadbeef";
        assert_eq!(Pseudonym::parse(original).unwrap().to_string(), original);
    }
}
