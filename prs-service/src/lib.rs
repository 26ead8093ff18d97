#![deny(missing_docs)]
//! Service wiring for the pseudonym/privacy resolution service.
//!
//! This crate hosts the ambient stack around [`prs_core`]'s cryptographic
//! engines: configuration, metrics, secret loading, the JWE envelope
//! builder, the organisation/key registry, usage policy, and the
//! [`orchestrator::ExchangeOrchestrator`] that ties all four exchange
//! operations together (spec §4.8). HTTP transport, request routing, and
//! admin CRUD endpoints are not part of this crate; a hosting binary
//! would wire those around [`orchestrator::ExchangeOrchestrator`].

pub mod config;
pub mod jwe;
pub mod metrics;
pub mod orchestrator;
pub mod policy;
pub mod registry;
pub mod secrets;

pub use orchestrator::{ExchangeOrchestrator, ReceiveResponse};
pub use registry::KeyRegistry;
