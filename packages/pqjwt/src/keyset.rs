//! Verification key lookup in a JSON Web Key Set

use crate::error::{PqJwtError, Result};
use crate::jwk::JsonWebKeySet;
use crate::keys::PublicKey;
use crate::registry::{SigningMethodRegistry, registry};
use crate::token::{Header, KeyResolver};

/// Resolve the key for `header` from `key_set` using the default registry.
///
/// # Errors
///
/// As [`resolve_with_registry`].
pub fn resolve_verification_key(header: &Header, key_set: &JsonWebKeySet) -> Result<PublicKey> {
    resolve_with_registry(header, key_set, registry())
}

/// Resolve the key for `header` from `key_set`.
///
/// The first key whose `kid` equals the header's wins. Its own `alg`, not
/// the header's, selects the parameter set used to decode `pub`.
///
/// # Errors
///
/// * `MissingKeyId` if the header has no string `kid`
/// * `KeyNotFound` if no key carries that `kid`
/// * `UnsupportedAlgorithm` if the key's `alg` is not registered
/// * `InvalidKey` if `pub` is missing or not a valid key
pub fn resolve_with_registry(
    header: &Header,
    key_set: &JsonWebKeySet,
    methods: &SigningMethodRegistry,
) -> Result<PublicKey> {
    let kid = header.kid.as_deref().ok_or(PqJwtError::MissingKeyId)?;
    let jwk = key_set
        .find(kid)
        .ok_or_else(|| PqJwtError::KeyNotFound(kid.to_string()))?;

    let alg = jwk.alg.as_deref().unwrap_or_default();
    let method = methods.require(alg)?;
    let bytes = jwk
        .pub_
        .as_deref()
        .ok_or_else(|| PqJwtError::invalid_key(format!("key {kid} has no public key")))?;

    tracing::debug!(kid, alg, "resolved verification key from key set");
    PublicKey::from_bytes(method.variant(), bytes)
}

impl KeyResolver for JsonWebKeySet {
    fn resolve(&self, header: &Header) -> Result<PublicKey> {
        resolve_verification_key(header, self)
    }
}
