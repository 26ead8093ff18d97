//! Authenticated encryption of RID claims (spec §4.3).

use aes_gcm::aead::{Aead, KeyInit, OsRng as AeadOsRng, Payload};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use prs_types::PrsError;
use rand::RngCore;

use crate::kdf::MasterKey;

/// Associated data bound into every RID ciphertext.
const RID_AAD: &[u8] = b"RID:v1";
const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

/// Encrypts and decrypts RID claims under AES-256-GCM (spec §4.3).
///
/// Unlike [`crate::pseudonym::PseudonymEngine`], RID encryption is
/// intentionally nondeterministic: each call draws a fresh random nonce,
/// so the same claims encrypted twice yield different tokens (spec §8,
/// property 8). There is no server-side replay cache (spec §9, open
/// question); re-issue-safety relies entirely on this nonce.
pub struct RidEngine<'a> {
    master: &'a MasterKey,
}

impl<'a> RidEngine<'a> {
    /// Creates a new engine bound to the given master key.
    pub fn new(master: &'a MasterKey) -> Self {
        Self { master }
    }

    fn cipher(&self) -> Result<Aes256Gcm, PrsError> {
        let key = self.master.rid_aes_key();
        Aes256Gcm::new_from_slice(&key).map_err(|_| PrsError::CryptoInternal)
    }

    /// Encrypts `claims_json` into a `b64url(nonce || tag || ciphertext)`
    /// token.
    pub fn encrypt_rid(&self, claims_json: &[u8]) -> Result<String, PrsError> {
        let cipher = self.cipher()?;
        let mut nonce_bytes = [0u8; NONCE_LEN];
        AeadOsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let sealed = cipher
            .encrypt(
                nonce,
                Payload {
                    msg: claims_json,
                    aad: RID_AAD,
                },
            )
            .map_err(|_| PrsError::CryptoInternal)?;
        // `aes-gcm` appends the tag after the ciphertext; the wire format
        // (spec §3) wants it between the nonce and the ciphertext.
        let tag_start = sealed.len() - TAG_LEN;
        let (ciphertext, tag) = sealed.split_at(tag_start);

        let mut wire = Vec::with_capacity(NONCE_LEN + TAG_LEN + ciphertext.len());
        wire.extend_from_slice(&nonce_bytes);
        wire.extend_from_slice(tag);
        wire.extend_from_slice(ciphertext);
        Ok(URL_SAFE_NO_PAD.encode(wire))
    }

    /// Decrypts a token produced by [`Self::encrypt_rid`], returning the
    /// original `claims_json` bytes.
    ///
    /// Collapses decode, tag-mismatch, and truncation failures into a
    /// single [`PrsError::InvalidRid`] so a caller cannot distinguish the
    /// cause (spec §4.3, §4.9).
    pub fn decrypt_rid(&self, token: &str) -> Result<Vec<u8>, PrsError> {
        let wire = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|_| PrsError::InvalidRid)?;
        if wire.len() < NONCE_LEN + TAG_LEN {
            return Err(PrsError::InvalidRid);
        }
        let (nonce_bytes, rest) = wire.split_at(NONCE_LEN);
        let (tag, ciphertext) = rest.split_at(TAG_LEN);
        let nonce = Nonce::from_slice(nonce_bytes);

        // Re-assemble into `aes-gcm`'s expected `ct‖tag` order.
        let mut sealed = Vec::with_capacity(ciphertext.len() + TAG_LEN);
        sealed.extend_from_slice(ciphertext);
        sealed.extend_from_slice(tag);

        let cipher = self.cipher()?;
        cipher
            .decrypt(
                nonce,
                Payload {
                    msg: &sealed,
                    aad: RID_AAD,
                },
            )
            .map_err(|_| PrsError::InvalidRid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn master() -> MasterKey {
        MasterKey::new([13u8; 32])
    }

    #[test]
    fn round_trips() {
        let master = master();
        let engine = RidEngine::new(&master);
        let claims = br#"{"usage":"irp"}"#;
        let token = engine.encrypt_rid(claims).unwrap();
        let back = engine.decrypt_rid(&token).unwrap();
        assert_eq!(back, claims);
    }

    #[test]
    fn nondeterministic_nonce() {
        let master = master();
        let engine = RidEngine::new(&master);
        let claims = b"same plaintext";
        let a = engine.encrypt_rid(claims).unwrap();
        let b = engine.encrypt_rid(claims).unwrap();
        assert_ne!(a, b);
        assert_eq!(engine.decrypt_rid(&a).unwrap(), claims);
        assert_eq!(engine.decrypt_rid(&b).unwrap(), claims);
    }

    #[test]
    fn malformed_token_fails() {
        let master = master();
        let engine = RidEngine::new(&master);
        assert!(matches!(
            engine.decrypt_rid("foobar"),
            Err(PrsError::InvalidRid)
        ));
    }

    #[test]
    fn tamper_detection() {
        let master = master();
        let engine = RidEngine::new(&master);
        let token = engine.encrypt_rid(b"payload").unwrap();
        let mut raw = URL_SAFE_NO_PAD.decode(&token).unwrap();
        let last = raw.len() - 1;
        raw[last] ^= 0x01;
        let tampered = URL_SAFE_NO_PAD.encode(raw);
        assert!(matches!(
            engine.decrypt_rid(&tampered),
            Err(PrsError::InvalidRid)
        ));
    }
}
