//! The trust-boundary contract consumed by the core (spec §6.1).
//!
//! mTLS termination, OAuth2 token verification, and thumbprint binding
//! (RFC 8705 `cnf.x5t#S256`) all live outside this crate; the core only
//! consumes the record the surrounding layer produces once a request has
//! been authenticated.

use std::collections::BTreeSet;
use std::fmt;

use crate::organisation::UraNumber;

/// The kind of certificate/card used to authenticate the caller.
///
/// Only [`CardType::S`] is accepted for pseudonym origination (spec §6.1);
/// that check happens in the trust boundary before an [`AuthenticatedCaller`]
/// is ever constructed — the core itself never inspects `card_type`. Other
/// card types are preserved here only for logging/audit purposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardType {
    /// The "S" card type, the only one allowed to originate exchanges.
    S,
    /// Any other observed card type.
    Other(String),
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardType::S => f.write_str("S"),
            CardType::Other(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CardType {
    fn from(value: &str) -> Self {
        match value {
            "S" => CardType::S,
            other => CardType::Other(other.to_string()),
        }
    }
}

/// The authenticated caller record handed to the core by the surrounding
/// trust boundary (spec §6.1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedCaller {
    /// The caller organisation's URA.
    pub ura: UraNumber,
    /// The certificate/card type used to authenticate.
    pub card_type: CardType,
    /// Scopes the caller is authorised for.
    pub scopes: BTreeSet<String>,
}
