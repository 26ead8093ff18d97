#![deny(missing_docs)]
//! Core type definitions for the Pseudonym/Privacy Resolution Service (PRS).
//!
//! This crate groups together the strongly-typed values exchanged between
//! the PRS crypto core and the services that host it. It provides:
//!
//! * [`PersonalId`] and [`UraNumber`], the identifiers exchanged by callers.
//! * [`UsageTier`], the ordered ranking of pseudonym origination rights.
//! * Pseudonym wrapper types (see [`pseudonym`]).
//! * [`rid::RidClaims`], the plaintext bound inside an issued RID.
//! * [`trust::AuthenticatedCaller`], the record the surrounding trust
//!   boundary hands to the core.
//! * [`error::PrsError`], the single error type surfaced by the core.

pub mod error;
pub mod organisation;
pub mod personal_id;
pub mod pseudonym;
pub mod rid;
pub mod trust;

pub use error::PrsError;
pub use organisation::{Organisation, UraNumber, UsageTier};
pub use personal_id::PersonalId;
pub use pseudonym::{DirectPseudonymType, Pseudonym};
pub use rid::RidClaims;
pub use trust::{AuthenticatedCaller, CardType};
