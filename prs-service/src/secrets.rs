//! Loading the master key and OPRF key from disk at startup (spec §6.4).

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use eyre::Context as _;
use prs_core::MasterKey;
use prs_core::oprf::OprfKey;

/// Reads, decodes, and validates the two process secrets the service needs
/// at startup: the master key (for [`prs_core::PseudonymEngine`]/
/// [`prs_core::RidEngine`]) and the OPRF secret scalar (for
/// [`prs_core::OprfEngine`]).
///
/// Both files are expected to hold a base64url-encoded 32-byte value. An
/// empty or malformed file is a fatal startup error, matching spec §6.4 —
/// this service does not start in a half-configured state.
pub struct SecretLoader;

impl SecretLoader {
    /// Loads the master key from `path`.
    pub fn load_master_key(path: &str) -> eyre::Result<MasterKey> {
        let bytes = Self::load_32_bytes(path).context("while loading master key")?;
        Ok(MasterKey::new(bytes))
    }

    /// Loads the OPRF secret scalar from `path`.
    pub fn load_oprf_key(path: &str) -> eyre::Result<OprfKey> {
        let bytes = Self::load_32_bytes(path).context("while loading OPRF key")?;
        OprfKey::from_bytes(&bytes).map_err(|err| eyre::eyre!("malformed OPRF key: {err}"))
    }

    fn load_32_bytes(path: &str) -> eyre::Result<[u8; 32]> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("while reading secret file {path}"))?;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            eyre::bail!("secret file {path} is empty");
        }
        let decoded = URL_SAFE_NO_PAD
            .decode(trimmed)
            .with_context(|| format!("secret file {path} is not valid base64url"))?;
        let len = decoded.len();
        decoded
            .try_into()
            .map_err(|_| eyre::eyre!("secret file {path} must decode to exactly 32 bytes, got {len}"))
    }
}
