//! A `parking_lot::RwLock`-guarded in-memory `KeyRegistry`, gated to the
//! `dev` environment the same way the teacher never ships its dev-only
//! secret manager to prod.

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use prs_types::{Organisation, PrsError, UraNumber};
use rsa::RsaPublicKey;

use crate::config::Environment;
use crate::registry::{KeyRegistry, normalise_scopes, pick_scope_match, validate_public_key_pem};

struct KeyEntry {
    id: u64,
    scopes: BTreeSet<String>,
    public_key: RsaPublicKey,
}

/// An in-memory [`KeyRegistry`], intended for tests and local development
/// only.
#[derive(Default)]
pub struct InMemoryKeyRegistry {
    organisations: RwLock<HashMap<UraNumber, Organisation>>,
    keys: RwLock<HashMap<UraNumber, Vec<KeyEntry>>>,
    next_id: AtomicU64,
}

impl InMemoryKeyRegistry {
    /// Creates an empty registry.
    ///
    /// # Panics
    /// Panics if `environment` is not [`Environment::Dev`].
    pub fn new(environment: &Environment) -> Self {
        environment.assert_is_dev();
        Self::default()
    }

    /// Seeds an organisation, overwriting any existing entry for the same
    /// URA.
    pub fn insert_organisation(&self, organisation: Organisation) {
        self.organisations
            .write()
            .insert(organisation.ura, organisation);
    }

    /// Validates and inserts a public key for `(ura, scope_set)`, running
    /// the same validators a Postgres-backed admin path would (spec §4.6).
    ///
    /// # Errors
    /// Returns [`PrsError::InvalidInput`] if `scopes` is empty after
    /// normalisation or `public_key_pem` is not a valid public key.
    pub fn insert_key<I, S>(
        &self,
        ura: UraNumber,
        scopes: I,
        public_key_pem: &str,
    ) -> Result<(), PrsError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let scopes = normalise_scopes(scopes)?;
        let public_key = validate_public_key_pem(public_key_pem)?;
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.keys
            .write()
            .entry(ura)
            .or_default()
            .push(KeyEntry {
                id,
                scopes,
                public_key,
            });
        Ok(())
    }
}

#[async_trait]
impl KeyRegistry for InMemoryKeyRegistry {
    async fn organisation(&self, ura: &UraNumber) -> Result<Option<Organisation>, PrsError> {
        Ok(self.organisations.read().get(ura).cloned())
    }

    async fn resolve(&self, ura: &UraNumber, scope: &str) -> Result<Option<RsaPublicKey>, PrsError> {
        let keys = self.keys.read();
        let Some(entries) = keys.get(ura) else {
            return Ok(None);
        };
        let triples: Vec<(u64, BTreeSet<String>, RsaPublicKey)> = entries
            .iter()
            .map(|entry| (entry.id, entry.scopes.clone(), entry.public_key.clone()))
            .collect();
        Ok(pick_scope_match(triples.iter(), scope).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prs_types::UsageTier;

    fn test_pem() -> String {
        let priv_key = rsa::RsaPrivateKey::new(&mut rand::rngs::OsRng, 2048).unwrap();
        let pub_key = RsaPublicKey::from(&priv_key);
        use rsa::pkcs8::EncodePublicKey as _;
        pub_key.to_public_key_pem(Default::default()).unwrap()
    }

    #[tokio::test]
    async fn resolves_exact_match_over_wildcard() {
        let registry = InMemoryKeyRegistry::new(&Environment::Dev);
        let ura = UraNumber::new("12345678").unwrap();
        registry.insert_organisation(Organisation {
            ura,
            name: "test org".into(),
            max_rid_usage: UsageTier::Bsn,
        });
        let wildcard_pem = test_pem();
        let exact_pem = test_pem();
        registry.insert_key(ura, ["*"], &wildcard_pem).unwrap();
        registry.insert_key(ura, ["nvi"], &exact_pem).unwrap();

        let resolved = registry.resolve(&ura, "nvi").await.unwrap().unwrap();
        let expected = validate_public_key_pem(&exact_pem).unwrap();
        assert_eq!(resolved, expected);
    }

    #[tokio::test]
    async fn falls_back_to_wildcard_without_exact_match() {
        let registry = InMemoryKeyRegistry::new(&Environment::Dev);
        let ura = UraNumber::new("12345678").unwrap();
        let wildcard_pem = test_pem();
        registry.insert_key(ura, ["*"], &wildcard_pem).unwrap();

        let resolved = registry.resolve(&ura, "anything").await.unwrap();
        assert!(resolved.is_some());
    }

    #[tokio::test]
    async fn unknown_organisation_resolves_to_none() {
        let registry = InMemoryKeyRegistry::new(&Environment::Dev);
        let ura = UraNumber::new("99999999").unwrap();
        assert!(registry.organisation(&ura).await.unwrap().is_none());
        assert!(registry.resolve(&ura, "nvi").await.unwrap().is_none());
    }

    #[test]
    #[should_panic(expected = "is not dev environment")]
    fn refuses_to_construct_outside_dev() {
        InMemoryKeyRegistry::new(&Environment::Prod);
    }
}
