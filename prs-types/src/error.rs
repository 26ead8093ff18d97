//! The error type surfaced by the PRS core.
//!
//! Every fallible operation in [`prs-core`](../prs_core/index.html) and the
//! orchestrator in `prs-service` returns [`PrsError`]. Crypto-derived
//! failures intentionally collapse distinct internal causes into a single
//! client-visible variant (spec §4.9): the precise cause should be logged
//! internally by the caller, never placed in the error message returned to
//! the client.

/// All errors the PRS core can surface to a caller.
#[derive(Debug, thiserror::Error)]
pub enum PrsError {
    /// Malformed `PersonalId`, scope, base64, or JSON payload.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// `recipient_org` lacks the `ura:` prefix or is not 8 digits.
    #[error("invalid URA: {0}")]
    InvalidUra(String),

    /// No organisation registered for the given URA.
    #[error("organization not found")]
    OrganizationNotFound,

    /// No public key registered for the given `(organisation, scope)`.
    #[error("public key not found")]
    PubKeyNotFound,

    /// A usage-tier or origination rule was violated.
    #[error("policy denied")]
    PolicyDenied,

    /// RID malformed, failed to decrypt, or bound to the wrong audience.
    #[error("invalid RID")]
    InvalidRid,

    /// Decryption of a reversible pseudonym failed.
    #[error("invalid pseudonym")]
    InvalidPseudonym,

    /// The submitted OPRF blinded input is not a valid group element.
    #[error("invalid blind")]
    InvalidBlind,

    /// Unexpected failure inside a cryptographic primitive.
    #[error("internal cryptographic error")]
    CryptoInternal,
}

impl PrsError {
    /// Maps this error kind to the HTTP status code a transport layer
    /// hosting this core should return (spec §7). The core itself never
    /// depends on an HTTP crate; this is a plain integer for the hosting
    /// binary to use as it sees fit.
    pub fn http_status(&self) -> u16 {
        match self {
            PrsError::InvalidInput(_)
            | PrsError::InvalidUra(_)
            | PrsError::PolicyDenied
            | PrsError::InvalidRid
            | PrsError::InvalidPseudonym
            | PrsError::InvalidBlind => 400,
            PrsError::OrganizationNotFound | PrsError::PubKeyNotFound => 404,
            PrsError::CryptoInternal => 500,
        }
    }
}
