//! Key derivation and constant-time comparison (spec §4.1).
//!
//! All symmetric subkeys used by the engines in this crate are derived
//! from a single process-wide master key via HKDF-SHA256 with an empty
//! salt and a component-labelled `info` string.

use hkdf::Hkdf;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// The `info` label for the irreversible-pseudonym HMAC subkey.
pub const INFO_IRP_HMAC: &[u8] = b"prs:irp:hmac";
/// The `info` label prefix for a per-organisation reversible-pseudonym
/// AES-SIV subkey; the organisation's `ura:<digits>` string is appended.
pub const INFO_RP_AES_SIV_PREFIX: &[u8] = b"prs:rp:aes-siv:";
/// The `info` label for the RID AES-GCM subkey.
pub const INFO_RID: &[u8] = b"prs:rid";

/// A process-wide 32-byte secret. Zeroized on drop; never implements
/// `Debug`/`Display` so it cannot be accidentally logged.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct MasterKey([u8; 32]);

impl MasterKey {
    /// Wraps a raw 32-byte secret as a [`MasterKey`].
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Derives a labelled 32-byte subkey via HKDF-SHA256 with an empty
    /// salt (spec §4.1).
    pub fn derive_subkey(&self, info: &[u8]) -> [u8; 32] {
        let hk = Hkdf::<Sha256>::new(None, &self.0);
        let mut out = [0u8; 32];
        hk.expand(info, &mut out)
            .expect("32 bytes is a valid HKDF-SHA256 output length");
        out
    }

    /// Derives the subkey for irreversible-pseudonym HMACs.
    pub fn irp_hmac_key(&self) -> [u8; 32] {
        self.derive_subkey(INFO_IRP_HMAC)
    }

    /// Derives the per-organisation subkey for reversible-pseudonym
    /// AES-SIV encryption.
    pub fn rp_aes_key(&self, recipient_org: &str) -> [u8; 32] {
        let mut info = Vec::with_capacity(INFO_RP_AES_SIV_PREFIX.len() + recipient_org.len());
        info.extend_from_slice(INFO_RP_AES_SIV_PREFIX);
        info.extend_from_slice(recipient_org.as_bytes());
        self.derive_subkey(&info)
    }

    /// Derives the subkey for RID AES-GCM encryption.
    pub fn rid_aes_key(&self) -> [u8; 32] {
        self.derive_subkey(INFO_RID)
    }
}

/// Compares two byte slices in constant time.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}
