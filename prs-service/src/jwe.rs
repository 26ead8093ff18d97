//! Compact JWE construction (spec §4.5, §6.2).
//!
//! `alg = RSA-OAEP-256`, `enc = A256GCM`. No JOSE/JWE crate in the
//! dependency pack depends on this combination directly, so the five
//! compact segments are assembled by hand over `rsa`, `aes-gcm`, and
//! `serde_json`/`base64`.

use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use prs_types::PrsError;
use rand::RngCore;
use rsa::{Oaep, RsaPublicKey};
use serde::Serialize;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::time::{SystemTime, UNIX_EPOCH};

/// The JWE validity window (`exp - iat`), spec §4.5.
pub const DEFAULT_VALIDITY_SECS: u64 = 300;

#[derive(Serialize)]
struct ProtectedHeader<'a> {
    alg: &'a str,
    enc: &'a str,
    kid: String,
    cty: &'a str,
}

#[derive(Serialize)]
struct Claims {
    subject: String,
    aud: String,
    scope: String,
    version: &'static str,
    iat: u64,
    exp: u64,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// Builds compact JWEs addressed to a recipient organisation's registered
/// public key (spec §4.5).
pub struct JweEnvelope;

impl JweEnvelope {
    /// Assembles claims and returns the 5-segment compact JWE string.
    ///
    /// `extra` is merged into the claim set verbatim (e.g. `ridUsage` for
    /// RID issuance, spec §4.8.2).
    pub fn build(
        audience: &str,
        scope: &str,
        subject: &str,
        pub_key: &RsaPublicKey,
        extra: Map<String, Value>,
        validity_secs: u64,
    ) -> Result<String, PrsError> {
        let iat = now_unix();
        let claims = Claims {
            subject: subject.to_string(),
            aud: audience.to_string(),
            scope: scope.to_string(),
            version: "1.1",
            iat,
            exp: iat + validity_secs,
            extra,
        };
        let plaintext = serde_json::to_vec(&claims).map_err(|_| PrsError::CryptoInternal)?;

        let kid = jwk_thumbprint(pub_key)?;
        let header = ProtectedHeader {
            alg: "RSA-OAEP-256",
            enc: "A256GCM",
            kid,
            cty: "application/json",
        };
        let header_json = serde_json::to_vec(&header).map_err(|_| PrsError::CryptoInternal)?;
        let protected = URL_SAFE_NO_PAD.encode(header_json);

        let mut rng = rand::rngs::OsRng;
        let mut cek = [0u8; 32];
        rng.fill_bytes(&mut cek);
        let encrypted_key = pub_key
            .encrypt(&mut rng, Oaep::new::<Sha256>(), &cek)
            .map_err(|_| PrsError::CryptoInternal)?;

        let mut iv_bytes = [0u8; 12];
        rng.fill_bytes(&mut iv_bytes);
        let iv = Nonce::from_slice(&iv_bytes);

        let cipher = Aes256Gcm::new_from_slice(&cek).map_err(|_| PrsError::CryptoInternal)?;
        let sealed = cipher
            .encrypt(
                iv,
                Payload {
                    msg: &plaintext,
                    aad: protected.as_bytes(),
                },
            )
            .map_err(|_| PrsError::CryptoInternal)?;
        let tag_start = sealed.len() - 16;
        let (ciphertext, tag) = sealed.split_at(tag_start);

        Ok(format!(
            "{}.{}.{}.{}.{}",
            protected,
            URL_SAFE_NO_PAD.encode(encrypted_key),
            URL_SAFE_NO_PAD.encode(iv_bytes),
            URL_SAFE_NO_PAD.encode(ciphertext),
            URL_SAFE_NO_PAD.encode(tag),
        ))
    }
}

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is after the Unix epoch")
        .as_secs()
}

/// RFC 7638 JWK thumbprint of an RSA public key, used as `kid`.
fn jwk_thumbprint(pub_key: &RsaPublicKey) -> Result<String, PrsError> {
    use rsa::traits::PublicKeyParts;
    let n = URL_SAFE_NO_PAD.encode(pub_key.n().to_bytes_be());
    let e = URL_SAFE_NO_PAD.encode(pub_key.e().to_bytes_be());
    // Canonical JWK member order for the thumbprint digest input is
    // lexicographic: "e" < "kty" < "n".
    let canonical = format!(r#"{{"e":"{e}","kty":"RSA","n":"{n}"}}"#);
    let digest = Sha256::digest(canonical.as_bytes());
    Ok(URL_SAFE_NO_PAD.encode(digest))
}
