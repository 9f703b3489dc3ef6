//! Public key thumbprints
//!
//! The thumbprint is SHA-256 over the canonical JSON
//! `{"alg":"<scheme>","kty":"<family>","pub":"<base64url(pub)>"}`, encoded
//! as standard base64. Member order, the absence of whitespace, and the
//! padded base64url alphabet inside the JSON are fixed; other verifiers
//! recompute the same bytes.

use crate::context::KeyContext;
use crate::error::{PqJwtError, Result};
use crate::keys::PublicKey;
use crate::material::{KeyMaterial, derive_public_key};
use crate::registry::{SigningMethodRegistry, registry};
use base64::{
    Engine as _,
    engine::general_purpose::{STANDARD, URL_SAFE},
};
use sha2::{Digest, Sha256};

/// Thumbprint of the key material attached to `context`.
///
/// # Errors
///
/// * `MissingConfig` if no key material is attached
/// * `InvalidKey` if the material has no public key
/// * `UnsupportedScheme` if the scheme is not registered
pub fn compute_thumbprint(context: &KeyContext) -> Result<String> {
    let material = context.lookup().ok_or(PqJwtError::MissingConfig)?;
    material_thumbprint(material, registry())
}

/// Thumbprint of `material`'s public key, checked against `registry`.
///
/// A missing public key is derived from the private key first, so
/// signing-side material hashes to the same value it has once attached.
///
/// # Errors
///
/// `InvalidKey` if no public key is present or derivable, `UnsupportedScheme`
/// if the scheme is not registered.
pub fn material_thumbprint(
    material: &KeyMaterial,
    registry: &SigningMethodRegistry,
) -> Result<String> {
    match (material.public_key(), material.private_key()) {
        (Some(public_key), _) => thumbprint_with_registry(public_key, registry),
        (None, Some(private_key)) => {
            thumbprint_with_registry(&derive_public_key(private_key)?, registry)
        }
        (None, None) => Err(PqJwtError::invalid_key("key material has no public key")),
    }
}

/// Thumbprint of `public_key` against the default registry.
///
/// # Errors
///
/// `UnsupportedScheme` if the scheme is not registered.
pub fn public_key_thumbprint(public_key: &PublicKey) -> Result<String> {
    thumbprint_with_registry(public_key, registry())
}

/// Thumbprint of `public_key`, taking `kty` from `registry`.
///
/// # Errors
///
/// `UnsupportedScheme` if `registry` has no method for the key's scheme.
pub fn thumbprint_with_registry(
    public_key: &PublicKey,
    registry: &SigningMethodRegistry,
) -> Result<String> {
    let alg = public_key.scheme_name();
    let kty = registry
        .family_of(alg)
        .ok_or_else(|| PqJwtError::UnsupportedScheme(alg.to_string()))?;

    let canonical = canonical_json(alg, kty, public_key.as_bytes());
    let digest = Sha256::digest(canonical.as_bytes());
    Ok(STANDARD.encode(digest))
}

/// Canonical JSON hashed by the thumbprint
#[must_use]
pub fn canonical_json(alg: &str, kty: &str, public_key: &[u8]) -> String {
    format!(
        r#"{{"alg":"{alg}","kty":"{kty}","pub":"{}"}}"#,
        URL_SAFE.encode(public_key)
    )
}
