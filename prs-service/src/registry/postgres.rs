//! A Postgres-backed `KeyRegistry`, following
//! `PostgresSecretManager`'s connection-pool setup and `sqlx::FromRow`
//! row-mapping style (spec §6.3).
//!
//! Schema (not a migration, the concrete SQL is not mandated by the
//! spec):
//!
//! ```sql
//! CREATE TABLE organisation (
//!     id              BIGSERIAL PRIMARY KEY,
//!     ura             TEXT NOT NULL UNIQUE,
//!     name            TEXT NOT NULL,
//!     max_rid_usage   TEXT NOT NULL
//! );
//!
//! CREATE TABLE organisation_key (
//!     id              BIGSERIAL PRIMARY KEY,
//!     organisation_id BIGINT NOT NULL REFERENCES organisation(id) ON DELETE CASCADE,
//!     scope           TEXT[] NOT NULL,
//!     key_data        TEXT NOT NULL
//! );
//! ```

use std::num::NonZeroU32;

use async_trait::async_trait;
use eyre::Context as _;
use prs_types::{Organisation, PrsError, UraNumber, UsageTier};
use rsa::RsaPublicKey;
use secrecy::{ExposeSecret as _, SecretString};
use sqlx::{PgPool, postgres::PgPoolOptions};
use tracing::instrument;

use crate::registry::{KeyRegistry, validate_public_key_pem};

/// A [`KeyRegistry`] backed by a Postgres connection pool.
pub struct PostgresKeyRegistry(PgPool);

#[derive(sqlx::FromRow)]
struct OrganisationRow {
    ura: String,
    name: String,
    max_rid_usage: String,
}

impl TryFrom<OrganisationRow> for Organisation {
    type Error = PrsError;

    fn try_from(row: OrganisationRow) -> Result<Self, Self::Error> {
        Ok(Organisation {
            ura: UraNumber::new(&row.ura)?,
            name: row.name,
            max_rid_usage: row
                .max_rid_usage
                .parse::<UsageTier>()
                .map_err(|_| PrsError::CryptoInternal)?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct KeyRow {
    key_data: String,
}

impl PostgresKeyRegistry {
    /// Connects to Postgres with a bounded pool (`max_connections`).
    #[instrument(level = "info", skip_all)]
    pub async fn connect(
        connection_string: &SecretString,
        max_connections: NonZeroU32,
    ) -> eyre::Result<Self> {
        tracing::info!("connecting to registry DB...");
        let pool = PgPoolOptions::new()
            .max_connections(max_connections.get())
            .connect(connection_string.expose_secret())
            .await
            .context("while connecting to registry DB")?;
        Ok(Self(pool))
    }
}

#[async_trait]
impl KeyRegistry for PostgresKeyRegistry {
    #[instrument(level = "debug", skip(self))]
    async fn organisation(&self, ura: &UraNumber) -> Result<Option<Organisation>, PrsError> {
        let row: Option<OrganisationRow> = sqlx::query_as(
            r#"SELECT ura, name, max_rid_usage FROM organisation WHERE ura = $1"#,
        )
        .bind(ura.to_string())
        .fetch_optional(&self.0)
        .await
        .map_err(|err| {
            tracing::error!("organisation lookup failed: {err:?}");
            PrsError::CryptoInternal
        })?;
        row.map(Organisation::try_from).transpose()
    }

    #[instrument(level = "debug", skip(self))]
    async fn resolve(&self, ura: &UraNumber, scope: &str) -> Result<Option<RsaPublicKey>, PrsError> {
        // Exact match wins over the wildcard; among several exact matches
        // the lowest `organisation_key.id` wins (spec §4.6 Open Question,
        // recorded as a deliberate tie-break in DESIGN.md).
        let exact: Option<KeyRow> = sqlx::query_as(
            r#"
                SELECT ok.key_data
                FROM organisation_key ok
                JOIN organisation o ON o.id = ok.organisation_id
                WHERE o.ura = $1 AND $2 = ANY(ok.scope)
                ORDER BY ok.id ASC
                LIMIT 1
            "#,
        )
        .bind(ura.to_string())
        .bind(scope)
        .fetch_optional(&self.0)
        .await
        .map_err(|err| {
            tracing::error!("exact scope lookup failed: {err:?}");
            PrsError::CryptoInternal
        })?;

        let row = match exact {
            Some(row) => Some(row),
            None => sqlx::query_as(
                r#"
                    SELECT ok.key_data
                    FROM organisation_key ok
                    JOIN organisation o ON o.id = ok.organisation_id
                    WHERE o.ura = $1 AND '*' = ANY(ok.scope)
                    ORDER BY ok.id ASC
                    LIMIT 1
                "#,
            )
            .bind(ura.to_string())
            .fetch_optional(&self.0)
            .await
            .map_err(|err| {
                tracing::error!("wildcard scope lookup failed: {err:?}");
                PrsError::CryptoInternal
            })?,
        };

        row.map(|row| validate_public_key_pem(&row.key_data)).transpose()
    }
}
