//! Key material handed to signing methods

use crate::algorithm::MlDsaVariant;
use crate::error::{PqJwtError, Result};
use crate::keys::{PrivateKey, PublicKey};

/// Public key of `private_key`.
///
/// # Errors
///
/// Generated, seeded and key-pair imports always carry their public half.
/// Returns `InvalidKey` when the private key was imported from secret key
/// bytes alone and therefore exposes no public key.
pub fn derive_public_key(private_key: &PrivateKey) -> Result<PublicKey> {
    private_key.public_key().cloned().ok_or_else(|| {
        PqJwtError::invalid_key(format!(
            "{} private key does not expose a public key",
            private_key.variant()
        ))
    })
}

/// A private and/or public key for one ML-DSA parameter set
#[derive(Debug, Clone)]
pub struct KeyMaterial {
    private_key: Option<PrivateKey>,
    public_key: Option<PublicKey>,
}

impl KeyMaterial {
    /// Build key material from optional halves.
    ///
    /// # Errors
    ///
    /// Returns `InvalidKey` when both halves are absent or they belong to
    /// different parameter sets.
    pub fn new(private_key: Option<PrivateKey>, public_key: Option<PublicKey>) -> Result<Self> {
        match (&private_key, &public_key) {
            (None, None) => {
                return Err(PqJwtError::invalid_key(
                    "key material needs a private or a public key",
                ));
            }
            (Some(sk), Some(pk)) if sk.variant() != pk.variant() => {
                return Err(PqJwtError::invalid_key(format!(
                    "private key is {} but public key is {}",
                    sk.variant(),
                    pk.variant()
                )));
            }
            _ => {}
        }

        Ok(Self {
            private_key,
            public_key,
        })
    }

    /// Signing-side material; the public key is derived when attached to a context
    #[must_use]
    pub fn from_private(private_key: PrivateKey) -> Self {
        Self {
            private_key: Some(private_key),
            public_key: None,
        }
    }

    /// Verification-side material
    #[must_use]
    pub fn from_public(public_key: PublicKey) -> Self {
        Self {
            private_key: None,
            public_key: Some(public_key),
        }
    }

    /// Both halves, checked to share a parameter set
    ///
    /// # Errors
    ///
    /// Returns `InvalidKey` when the halves belong to different parameter sets.
    pub fn from_pair(private_key: PrivateKey, public_key: PublicKey) -> Result<Self> {
        Self::new(Some(private_key), Some(public_key))
    }

    /// Fill in the public key from the private key if it is missing.
    ///
    /// # Errors
    ///
    /// Returns `InvalidKey` if the public key is missing and cannot be derived.
    pub fn with_derived_public_key(mut self) -> Result<Self> {
        if self.public_key.is_none()
            && let Some(private_key) = &self.private_key
        {
            tracing::trace!(alg = %private_key.variant(), "deriving public key from private key");
            self.public_key = Some(derive_public_key(private_key)?);
        }
        Ok(self)
    }

    /// Private half, present only on the signing side
    #[must_use]
    pub fn private_key(&self) -> Option<&PrivateKey> {
        self.private_key.as_ref()
    }

    /// Public half
    #[must_use]
    pub fn public_key(&self) -> Option<&PublicKey> {
        self.public_key.as_ref()
    }

    /// Parameter set shared by both halves
    #[must_use]
    pub fn variant(&self) -> MlDsaVariant {
        match (&self.public_key, &self.private_key) {
            (Some(pk), _) => pk.variant(),
            (None, Some(sk)) => sk.variant(),
            // unreachable through the constructors
            (None, None) => MlDsaVariant::MlDsa44,
        }
    }

    /// Thumbprint of the public key against the default registry
    ///
    /// # Errors
    ///
    /// See [`crate::thumbprint::material_thumbprint`].
    pub fn thumbprint(&self) -> Result<String> {
        crate::thumbprint::material_thumbprint(self, crate::registry::registry())
    }
}
