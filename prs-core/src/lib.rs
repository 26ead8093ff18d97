//! Cryptographic core of the pseudonym/privacy resolution service: key
//! derivation, the pseudonym algebra, RID envelopes, and OPRF evaluation.
//!
//! This crate is transport-agnostic and holds no registry or policy
//! state; it only turns keys and plaintext into ciphertext and back.

#![deny(missing_docs)]

pub mod kdf;
pub mod oprf;
pub mod pseudonym;
pub mod rid;

pub use kdf::{constant_time_eq, MasterKey};
pub use oprf::{OprfEngine, OprfKey};
pub use pseudonym::{DecryptedReversible, PseudonymEngine};
pub use rid::RidEngine;
