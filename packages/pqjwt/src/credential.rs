//! Credentials accepted by signing methods

use crate::context::KeyContext;
use crate::error::{PqJwtError, Result};
use crate::keys::{PrivateKey, PublicKey};

/// The single key argument passed to [`crate::SigningMethod::sign`] and
/// [`crate::SigningMethod::verify`].
///
/// Signing needs a context with attached private key material; verification
/// takes either a context (its public key is used) or a public key directly.
#[derive(Debug, Clone, Copy)]
pub enum Credential<'a> {
    /// Key context carrying [`crate::KeyMaterial`]
    Context(&'a KeyContext),
    /// Bare public key, verification only
    PublicKey(&'a PublicKey),
}

impl<'a> Credential<'a> {
    /// Private key for signing.
    ///
    /// # Errors
    ///
    /// `InvalidKey` for a bare public key, `MissingConfig` when the context
    /// has no material, `NoPrivateKey` when the material is public only.
    pub fn private_key(&self) -> Result<&'a PrivateKey> {
        match self {
            Credential::Context(ctx) => {
                let material = ctx.lookup().ok_or(PqJwtError::MissingConfig)?;
                material.private_key().ok_or(PqJwtError::NoPrivateKey)
            }
            Credential::PublicKey(_) => Err(PqJwtError::invalid_key(
                "signing requires a key context, got a public key",
            )),
        }
    }

    /// Public key for verification.
    ///
    /// # Errors
    ///
    /// `MissingConfig` when the context has no material, `InvalidKey` when
    /// the material has no public key.
    pub fn public_key(&self) -> Result<&'a PublicKey> {
        match self {
            Credential::Context(ctx) => {
                let material = ctx.lookup().ok_or(PqJwtError::MissingConfig)?;
                material
                    .public_key()
                    .ok_or_else(|| PqJwtError::invalid_key("key material has no public key"))
            }
            Credential::PublicKey(pk) => Ok(pk),
        }
    }
}

impl<'a> From<&'a KeyContext> for Credential<'a> {
    fn from(ctx: &'a KeyContext) -> Self {
        Credential::Context(ctx)
    }
}

impl<'a> From<&'a PublicKey> for Credential<'a> {
    fn from(pk: &'a PublicKey) -> Self {
        Credential::PublicKey(pk)
    }
}

/// Explicit signing request, dispatched by algorithm name through a registry
#[derive(Debug, Clone, Copy)]
pub struct SignRequest<'a> {
    /// Registered algorithm name (`alg`)
    pub alg: &'a str,
    /// Key context holding the private key
    pub credential: Credential<'a>,
    /// Exact bytes to sign, e.g. the JWT signing string
    pub message: &'a [u8],
}

impl<'a> SignRequest<'a> {
    /// New signing request
    #[must_use]
    pub fn new(alg: &'a str, credential: impl Into<Credential<'a>>, message: &'a [u8]) -> Self {
        Self {
            alg,
            credential: credential.into(),
            message,
        }
    }
}

/// Explicit verification request, dispatched by algorithm name through a registry
#[derive(Debug, Clone, Copy)]
pub struct VerifyRequest<'a> {
    /// Registered algorithm name (`alg`)
    pub alg: &'a str,
    /// Context or public key to verify with
    pub credential: Credential<'a>,
    /// Exact bytes that were signed
    pub message: &'a [u8],
    /// Detached signature
    pub signature: &'a [u8],
}

impl<'a> VerifyRequest<'a> {
    /// New verification request
    #[must_use]
    pub fn new(
        alg: &'a str,
        credential: impl Into<Credential<'a>>,
        message: &'a [u8],
        signature: &'a [u8],
    ) -> Self {
        Self {
            alg,
            credential: credential.into(),
            message,
            signature,
        }
    }
}
