//! The pseudonym algebra: irreversible (HMAC) and reversible (AES-SIV)
//! pseudonyms (spec §4.2).

use aes_siv::aead::{Aead, KeyInit, Payload};
use aes_siv::{Aes128SivAead, Nonce};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use prs_types::pseudonym::{IRREVERSIBLE_PREFIX, REVERSIBLE_PREFIX};
use prs_types::{PersonalId, PrsError};
use sha2::Sha256;

use crate::kdf::MasterKey;

/// Associated data bound into every reversible-pseudonym ciphertext.
const REVERSIBLE_AAD: &[u8] = b"PRS:Pseudonym:v1";

/// The result of successfully decrypting a reversible pseudonym.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecryptedReversible {
    /// The personal id bound inside the pseudonym.
    pub personal_id: PersonalId,
    /// The recipient organisation it was addressed to.
    pub recipient_org: String,
    /// The recipient scope it was addressed to.
    pub recipient_scope: String,
}

/// Derives irreversible and reversible pseudonyms from a [`MasterKey`].
///
/// Both operations are pure and deterministic in their inputs (spec §4.2);
/// the only cross-call nondeterminism anywhere in this crate lives in
/// [`crate::rid::RidEngine`]'s fresh nonce per call.
pub struct PseudonymEngine<'a> {
    master: &'a MasterKey,
}

impl<'a> PseudonymEngine<'a> {
    /// Creates a new engine bound to the given master key.
    pub fn new(master: &'a MasterKey) -> Self {
        Self { master }
    }

    /// Computes the `|`-delimited subject string shared by both pseudonym
    /// constructions (spec §4.2).
    ///
    /// # Errors
    /// Returns [`PrsError::InvalidInput`] if `recipient_org` or
    /// `recipient_scope` contains `|`.
    fn subject(
        personal_id: &PersonalId,
        recipient_org: &str,
        recipient_scope: &str,
    ) -> Result<String, PrsError> {
        if recipient_org.contains('|') || recipient_scope.contains('|') {
            return Err(PrsError::InvalidInput(
                "recipient_org and recipient_scope must not contain '|'".into(),
            ));
        }
        Ok(format!(
            "{}|{}|{}",
            personal_id.canonical(),
            recipient_org,
            recipient_scope
        ))
    }

    /// Generates a one-way, per-recipient irreversible pseudonym (spec
    /// §4.2).
    pub fn generate_irreversible(
        &self,
        personal_id: &PersonalId,
        recipient_org: &str,
        recipient_scope: &str,
    ) -> Result<String, PrsError> {
        let subject = Self::subject(personal_id, recipient_org, recipient_scope)?;
        let key = self.master.irp_hmac_key();
        let mut mac = Hmac::<Sha256>::new_from_slice(&key)
            .map_err(|_| PrsError::CryptoInternal)?;
        mac.update(subject.as_bytes());
        let tag = mac.finalize().into_bytes();
        Ok(format!("{IRREVERSIBLE_PREFIX}{}", URL_SAFE_NO_PAD.encode(tag)))
    }

    /// Generates a deterministic, AEAD-wrapped reversible pseudonym only
    /// the same recipient organisation can later decrypt (spec §4.2).
    pub fn generate_reversible(
        &self,
        personal_id: &PersonalId,
        recipient_org: &str,
        recipient_scope: &str,
    ) -> Result<String, PrsError> {
        let subject = Self::subject(personal_id, recipient_org, recipient_scope)?;
        let key = self.master.rp_aes_key(recipient_org);
        let cipher = Aes128SivAead::new_from_slice(&key).map_err(|_| PrsError::CryptoInternal)?;
        let nonce = Nonce::default();
        let wire = cipher
            .encrypt(
                &nonce,
                Payload {
                    msg: subject.as_bytes(),
                    aad: REVERSIBLE_AAD,
                },
            )
            .map_err(|_| PrsError::CryptoInternal)?;
        Ok(format!("{REVERSIBLE_PREFIX}{}", URL_SAFE_NO_PAD.encode(wire)))
    }

    /// Decrypts a reversible pseudonym previously generated for
    /// `recipient_org` (spec §4.2). This operation is
    /// authorisation-gated at the orchestrator, not here.
    ///
    /// # Errors
    /// Returns [`PrsError::InvalidPseudonym`] on any decode, tag-mismatch,
    /// or malformed-subject failure.
    pub fn decrypt_reversible(
        &self,
        encoded: &str,
        recipient_org: &str,
    ) -> Result<DecryptedReversible, PrsError> {
        let payload = encoded
            .strip_prefix(REVERSIBLE_PREFIX)
            .ok_or(PrsError::InvalidPseudonym)?;
        let wire = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| PrsError::InvalidPseudonym)?;
        // Smallest possible ciphertext is the 16-byte SIV tag over an
        // empty plaintext; anything shorter cannot be genuine.
        if wire.len() < 16 {
            return Err(PrsError::InvalidPseudonym);
        }

        let key = self.master.rp_aes_key(recipient_org);
        let cipher = Aes128SivAead::new_from_slice(&key).map_err(|_| PrsError::CryptoInternal)?;
        let nonce = Nonce::default();
        let subject_bytes = cipher
            .decrypt(
                &nonce,
                Payload {
                    msg: &wire,
                    aad: REVERSIBLE_AAD,
                },
            )
            .map_err(|_| PrsError::InvalidPseudonym)?;
        let subject = String::from_utf8(subject_bytes).map_err(|_| PrsError::InvalidPseudonym)?;

        let parts: Vec<&str> = subject.splitn(3, '|').collect();
        let [pid_str, org, scope] = parts.as_slice() else {
            return Err(PrsError::InvalidPseudonym);
        };
        let personal_id = pid_str.parse().map_err(|_| PrsError::InvalidPseudonym)?;

        Ok(DecryptedReversible {
            personal_id,
            recipient_org: org.to_string(),
            recipient_scope: scope.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn master() -> MasterKey {
        MasterKey::new([42u8; 32])
    }

    fn pid() -> PersonalId {
        PersonalId::new("NL", "bsn", "123456782").unwrap()
    }

    #[test]
    fn irreversible_is_deterministic() {
        let master = master();
        let engine = PseudonymEngine::new(&master);
        let a = engine
            .generate_irreversible(&pid(), "ura:12345678", "nvi")
            .unwrap();
        let b = engine
            .generate_irreversible(&pid(), "ura:12345678", "nvi")
            .unwrap();
        assert_eq!(a, b);
        assert!(a.starts_with(IRREVERSIBLE_PREFIX));
    }

    #[test]
    fn irreversible_is_unlinkable_across_recipients() {
        let master = master();
        let engine = PseudonymEngine::new(&master);
        let a = engine
            .generate_irreversible(&pid(), "ura:12345678", "nvi")
            .unwrap();
        let b = engine
            .generate_irreversible(&pid(), "ura:87654321", "nvi")
            .unwrap();
        let c = engine
            .generate_irreversible(&pid(), "ura:12345678", "other")
            .unwrap();
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn reversible_round_trips() {
        let master = master();
        let engine = PseudonymEngine::new(&master);
        let encoded = engine
            .generate_reversible(&pid(), "ura:12345678", "nvi")
            .unwrap();
        let decoded = engine.decrypt_reversible(&encoded, "ura:12345678").unwrap();
        assert_eq!(decoded.personal_id, pid());
        assert_eq!(decoded.recipient_org, "ura:12345678");
        assert_eq!(decoded.recipient_scope, "nvi");
    }

    #[test]
    fn reversible_is_deterministic() {
        let master = master();
        let engine = PseudonymEngine::new(&master);
        let a = engine
            .generate_reversible(&pid(), "ura:12345678", "nvi")
            .unwrap();
        let b = engine
            .generate_reversible(&pid(), "ura:12345678", "nvi")
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn reversible_wrong_org_fails() {
        let master = master();
        let engine = PseudonymEngine::new(&master);
        let encoded = engine
            .generate_reversible(&pid(), "ura:12345678", "nvi")
            .unwrap();
        assert!(matches!(
            engine.decrypt_reversible(&encoded, "ura:87654321"),
            Err(PrsError::InvalidPseudonym)
        ));
    }

    #[test]
    fn reversible_tamper_detection() {
        let master = master();
        let engine = PseudonymEngine::new(&master);
        let encoded = engine
            .generate_reversible(&pid(), "ura:12345678", "nvi")
            .unwrap();
        let payload = encoded.strip_prefix(REVERSIBLE_PREFIX).unwrap();
        let mut raw = URL_SAFE_NO_PAD.decode(payload).unwrap();
        raw[0] ^= 0x01;
        let tampered = format!("{REVERSIBLE_PREFIX}{}", URL_SAFE_NO_PAD.encode(raw));
        assert!(matches!(
            engine.decrypt_reversible(&tampered, "ura:12345678"),
            Err(PrsError::InvalidPseudonym)
        ));
    }

    #[test]
    fn rejects_pipe_in_recipient_fields() {
        let master = master();
        let engine = PseudonymEngine::new(&master);
        assert!(engine.generate_irreversible(&pid(), "ura:1|2", "nvi").is_err());
        assert!(engine.generate_reversible(&pid(), "ura:12", "n|vi").is_err());
    }
}
