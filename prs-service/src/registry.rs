//! The organisation/key registry (spec §4.6).
//!
//! This module exposes the [`KeyRegistry`] trait the core depends on for
//! public-key resolution and max-usage lookup, the insertion-time
//! validators spec §4.6 binds to the registry, and two implementations:
//! [`in_memory::InMemoryKeyRegistry`] (dev-only) and
//! [`postgres::PostgresKeyRegistry`].
//!
//! Admin mutators (create/update/delete of organisations and keys) stay
//! out of scope; only the read path the core consumes, plus the
//! validation the spec says the registry itself must enforce at
//! insertion, live here.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use prs_types::{Organisation, PrsError, UraNumber};
use rsa::RsaPublicKey;
use rsa::pkcs8::DecodePublicKey as _;

pub mod in_memory;
#[cfg(feature = "postgres")]
pub mod postgres;

/// The sentinel scope that matches any requested scope (spec §3, §4.6).
pub const WILDCARD_SCOPE: &str = "*";

/// Dynamic trait object for a `KeyRegistry` service.
pub type KeyRegistryService = Arc<dyn KeyRegistry>;

/// Operations the core consumes from the organisation/key registry
/// (spec §4.6). Implementations must be `Send + Sync` to be shared across
/// request-handling tasks.
#[async_trait]
pub trait KeyRegistry: Send + Sync {
    /// Looks up an organisation by its URA.
    async fn organisation(&self, ura: &UraNumber) -> Result<Option<Organisation>, PrsError>;

    /// Resolves the public key registered for `(ura, scope)`.
    ///
    /// Matches on scope by set membership or the `"*"` wildcard; the
    /// wildcard is chosen only if no exact match exists within the same
    /// organisation (spec §4.6). When multiple non-wildcard entries
    /// contain the scope, implementations return a single deterministic
    /// choice (documented per implementation).
    async fn resolve(&self, ura: &UraNumber, scope: &str) -> Result<Option<RsaPublicKey>, PrsError>;
}

/// Normalises a raw scope list: lowercase, trim, dedupe, sort.
///
/// # Errors
/// Returns [`PrsError::InvalidInput`] if the resulting set is empty.
pub fn normalise_scopes<I, S>(scopes: I) -> Result<BTreeSet<String>, PrsError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let normalised: BTreeSet<String> = scopes
        .into_iter()
        .map(|s| s.as_ref().trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();
    if normalised.is_empty() {
        return Err(PrsError::InvalidInput(
            "scope-set must not be empty".into(),
        ));
    }
    Ok(normalised)
}

/// Parses and validates a PEM-encoded public key, rejecting private
/// material (spec §4.6).
///
/// # Errors
/// Returns [`PrsError::InvalidInput`] if `pem` does not parse as a public
/// key in PKCS#1 or PKCS#8 PEM form.
pub fn validate_public_key_pem(pem: &str) -> Result<RsaPublicKey, PrsError> {
    RsaPublicKey::from_public_key_pem(pem)
        .map_err(|err| PrsError::InvalidInput(format!("invalid public key PEM: {err}")))
}

/// Picks the matching scope entry out of a set of `(id, scopes)` pairs,
/// following spec §4.6's resolution rule: exact scope match wins over the
/// wildcard, and the lowest `id` wins any tie among several matches of the
/// same kind (documented Open Question decision).
pub(crate) fn pick_scope_match<'a, T>(
    entries: impl Iterator<Item = &'a (u64, BTreeSet<String>, T)>,
    scope: &str,
) -> Option<&'a T> {
    let mut exact: Option<&'a (u64, BTreeSet<String>, T)> = None;
    let mut wildcard: Option<&'a (u64, BTreeSet<String>, T)> = None;
    for entry in entries {
        let (id, scopes, _) = entry;
        if scopes.contains(scope) {
            if exact.is_none_or(|current| *id < current.0) {
                exact = Some(entry);
            }
        } else if scopes.contains(WILDCARD_SCOPE)
            && wildcard.is_none_or(|current| *id < current.0)
        {
            wildcard = Some(entry);
        }
    }
    exact.or(wildcard).map(|(_, _, value)| value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalise_scopes_dedupes_and_lowercases() {
        let scopes = normalise_scopes(["NVI", " nvi ", "Other"]).unwrap();
        assert_eq!(
            scopes,
            BTreeSet::from(["nvi".to_string(), "other".to_string()])
        );
    }

    #[test]
    fn normalise_scopes_rejects_empty() {
        assert!(normalise_scopes(Vec::<String>::new()).is_err());
        assert!(normalise_scopes([" ", ""]).is_err());
    }

    #[test]
    fn exact_match_wins_over_wildcard() {
        let entries = vec![
            (2u64, BTreeSet::from(["*".to_string()]), "wildcard-key"),
            (1u64, BTreeSet::from(["nvi".to_string()]), "exact-key"),
        ];
        let found = pick_scope_match(entries.iter(), "nvi");
        assert_eq!(found, Some(&"exact-key"));
    }

    #[test]
    fn lowest_id_wins_among_exact_matches() {
        let entries = vec![
            (5u64, BTreeSet::from(["nvi".to_string()]), "newer"),
            (1u64, BTreeSet::from(["nvi".to_string()]), "older"),
        ];
        let found = pick_scope_match(entries.iter(), "nvi");
        assert_eq!(found, Some(&"older"));
    }

    #[test]
    fn wildcard_used_only_without_exact_match() {
        let entries = vec![(1u64, BTreeSet::from(["*".to_string()]), "wildcard")];
        assert_eq!(pick_scope_match(entries.iter(), "anything"), Some(&"wildcard"));
        assert_eq!(pick_scope_match(Vec::<(u64, BTreeSet<String>, &str)>::new().iter(), "x"), None);
    }
}
