//! Configuration types and CLI/environment parsing for the PRS service.
//!
//! Parsing the configuration itself (reading argv/env) is ambient plumbing,
//! not core cryptography; it follows the same `clap`-driven shape the
//! surrounding stack uses elsewhere so a hosting binary can simply call
//! [`PrsServiceConfig::parse`].

use std::num::NonZeroU32;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use secrecy::SecretString;

/// The environment the service is running in.
///
/// Services that are intended for `dev` only (like the in-memory
/// [`crate::registry::InMemoryKeyRegistry`]) must assert that they are
/// called from the `dev` environment via [`Environment::assert_is_dev`].
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Environment {
    /// Production environment.
    Prod,
    /// Development environment.
    Dev,
}

impl Environment {
    /// Asserts that `Environment` is `dev`. Panics if not the case.
    pub fn assert_is_dev(&self) {
        assert!(matches!(self, Environment::Dev), "is not dev environment")
    }
}

/// The configuration for the PRS service.
///
/// Configurable via environment variables or command-line arguments using
/// `clap`.
#[derive(Parser, Debug)]
pub struct PrsServiceConfig {
    /// The environment of the service (either `prod` or `dev`).
    #[clap(long, env = "PRS_ENVIRONMENT", default_value = "prod")]
    pub environment: Environment,

    /// Path to the file holding the base64url-encoded 32-byte master key
    /// (spec §6.4).
    #[clap(long, env = "PRS_MASTER_KEY_PATH")]
    pub master_key_path: String,

    /// Path to the file holding the base64url-encoded 32-byte OPRF secret
    /// scalar (spec §6.4).
    #[clap(long, env = "PRS_OPRF_KEY_PATH")]
    pub oprf_key_path: String,

    /// The connection string for the Postgres-backed `KeyRegistry`.
    #[clap(long, env = "PRS_DB_CONNECTION_STRING")]
    pub db_connection_string: SecretString,

    /// Max number of connections in the registry's Postgres pool.
    #[clap(long, env = "PRS_DB_MAX_CONNECTIONS", default_value = "3")]
    pub db_max_connections: NonZeroU32,

    /// Validity window of an issued JWE (`exp = iat + validity`, spec §4.5).
    #[clap(
        long,
        env = "PRS_JWE_VALIDITY",
        default_value = "5min",
        value_parser = humantime::parse_duration,
    )]
    pub jwe_validity: Duration,
}
