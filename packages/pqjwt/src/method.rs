//! ML-DSA JWT signing methods

use crate::algorithm::MlDsaVariant;
use crate::credential::Credential;
use crate::error::{PqJwtError, Result};

/// A JWT signing method backed by one ML-DSA parameter set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SigningMethod {
    name: &'static str,
    family: &'static str,
    variant: MlDsaVariant,
}

/// `ML-DSA-44`
pub const ML_DSA_44: SigningMethod = SigningMethod::new(MlDsaVariant::MlDsa44);
/// `ML-DSA-65`
pub const ML_DSA_65: SigningMethod = SigningMethod::new(MlDsaVariant::MlDsa65);
/// `ML-DSA-87`
pub const ML_DSA_87: SigningMethod = SigningMethod::new(MlDsaVariant::MlDsa87);

impl SigningMethod {
    /// Signing method for `variant`, named after the scheme
    #[must_use]
    pub const fn new(variant: MlDsaVariant) -> Self {
        Self {
            name: variant.name(),
            family: variant.family(),
            variant,
        }
    }

    /// Header `alg` value and registry key
    #[must_use]
    pub const fn alg(&self) -> &'static str {
        self.name
    }

    /// Key type label used as JWK `kty`
    #[must_use]
    pub const fn family(&self) -> &'static str {
        self.family
    }

    /// Parameter set
    #[must_use]
    pub const fn variant(&self) -> MlDsaVariant {
        self.variant
    }

    /// Sign the exact bytes of `signing_input`. No digest is applied first.
    ///
    /// # Errors
    ///
    /// * `InvalidKey` if `credential` is not a context
    /// * `MissingConfig` if the context carries no key material
    /// * `NoPrivateKey` if the material has no private key
    /// * `AlgorithmMismatch` if the private key belongs to another parameter set
    pub fn sign<'a>(
        &self,
        signing_input: impl AsRef<[u8]>,
        credential: impl Into<Credential<'a>>,
    ) -> Result<Vec<u8>> {
        let private_key = credential.into().private_key()?;
        if private_key.variant() != self.variant {
            return Err(PqJwtError::algorithm_mismatch(self.name, private_key.variant()));
        }

        tracing::debug!(alg = self.name, "signing");
        private_key.sign_detached(signing_input.as_ref())
    }

    /// Verify `signature` over `signing_input`.
    ///
    /// The verify primitive is chosen by the key's parameter set, which must
    /// equal this method's.
    ///
    /// # Errors
    ///
    /// * `MissingConfig` / `InvalidKey` if no public key can be taken from `credential`
    /// * `AlgorithmMismatch` if the key belongs to another parameter set
    /// * `InvalidSignature` if the signature does not verify
    pub fn verify<'a>(
        &self,
        signing_input: impl AsRef<[u8]>,
        signature: &[u8],
        credential: impl Into<Credential<'a>>,
    ) -> Result<()> {
        let public_key = credential.into().public_key()?;
        if public_key.variant() != self.variant {
            return Err(PqJwtError::algorithm_mismatch(self.name, public_key.variant()));
        }

        tracing::debug!(alg = self.name, "verifying signature");
        public_key.verify_detached(signing_input.as_ref(), signature)
    }
}

impl From<MlDsaVariant> for SigningMethod {
    fn from(variant: MlDsaVariant) -> Self {
        Self::new(variant)
    }
}

impl std::fmt::Display for SigningMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}
