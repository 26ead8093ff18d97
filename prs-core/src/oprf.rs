//! Server-side OPRF evaluation over a prime-order group element (spec §4.4).
//!
//! The client-side blind/unblind steps are deliberately not implemented
//! here (spec §4.4): this engine only ever sees a blinded input and
//! returns a blinded output, never the underlying query.

use k256::NonZeroScalar;
use k256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use k256::{AffinePoint, EncodedPoint, ProjectivePoint};
use prs_types::PrsError;
use rand::{CryptoRng, RngCore};
use zeroize::ZeroizeOnDrop;

/// The OPRF secret key: a scalar in the prime-order group (spec §4.4),
/// independent from the [`crate::kdf::MasterKey`].
#[derive(Clone, ZeroizeOnDrop)]
pub struct OprfKey(NonZeroScalar);

impl OprfKey {
    /// Generates a fresh random OPRF secret key.
    pub fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Self(NonZeroScalar::random(rng))
    }

    /// Wraps a raw scalar encoded as 32 big-endian bytes.
    ///
    /// # Errors
    /// Returns [`PrsError::CryptoInternal`] if the bytes do not encode a
    /// nonzero scalar in the curve's scalar field.
    pub fn from_bytes(bytes: &[u8; 32]) -> Result<Self, PrsError> {
        let scalar = NonZeroScalar::try_from(bytes.as_slice()).map_err(|_| PrsError::CryptoInternal)?;
        Ok(Self(scalar))
    }
}

/// Evaluates the server side of the OPRF: `E = sk * B` (spec §4.4).
pub struct OprfEngine {
    sk: OprfKey,
}

impl OprfEngine {
    /// Creates a new engine bound to the given OPRF secret key.
    pub fn new(sk: OprfKey) -> Self {
        Self { sk }
    }

    /// Evaluates a blinded input, returning the compressed encoding of
    /// `E = sk * B`.
    ///
    /// `blinded_input` is the SEC1-compressed encoding of a group element
    /// `B`. Scalar multiplication on this curve's backend runs in constant
    /// time with respect to `sk` (spec §4.4).
    ///
    /// # Errors
    /// Returns [`PrsError::InvalidBlind`] if `blinded_input` is not a
    /// valid compressed point encoding on the curve.
    pub fn evaluate(&self, blinded_input: &[u8]) -> Result<Vec<u8>, PrsError> {
        let encoded = EncodedPoint::from_bytes(blinded_input).map_err(|_| PrsError::InvalidBlind)?;
        let affine: AffinePoint =
            Option::from(AffinePoint::from_encoded_point(&encoded)).ok_or(PrsError::InvalidBlind)?;
        let b = ProjectivePoint::from(affine);
        let e = b * *self.sk.0;
        Ok(e.to_affine().to_encoded_point(true).as_bytes().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k256::elliptic_curve::Field;
    use k256::Scalar;
    use rand::rngs::OsRng;

    fn random_point(rng: &mut OsRng) -> ProjectivePoint {
        ProjectivePoint::GENERATOR * Scalar::random(rng)
    }

    #[test]
    fn evaluate_is_deterministic_in_key_and_input() {
        let mut rng = OsRng;
        let key = OprfKey::random(&mut rng);
        let engine = OprfEngine::new(key);
        let b = random_point(&mut rng).to_affine().to_encoded_point(true);
        let out1 = engine.evaluate(b.as_bytes()).unwrap();
        let out2 = engine.evaluate(b.as_bytes()).unwrap();
        assert_eq!(out1, out2);
    }

    #[test]
    fn evaluate_matches_scalar_multiplication() {
        let mut rng = OsRng;
        let sk = NonZeroScalar::random(&mut rng);
        let engine = OprfEngine::new(OprfKey(sk));
        let b_point = random_point(&mut rng);
        let b_affine = b_point.to_affine();
        let encoded = b_affine.to_encoded_point(true);

        let out = engine.evaluate(encoded.as_bytes()).unwrap();
        let expected = (b_point * *sk).to_affine().to_encoded_point(true);
        assert_eq!(out, expected.as_bytes().to_vec());
    }

    #[test]
    fn malformed_blind_rejected() {
        let mut rng = OsRng;
        let engine = OprfEngine::new(OprfKey::random(&mut rng));
        assert!(matches!(
            engine.evaluate(&[0u8; 5]),
            Err(PrsError::InvalidBlind)
        ));
    }
}
