//! Post-quantum JSON Web Token signing with ML-DSA
//!
//! This crate provides:
//! - `ML-DSA-44`, `ML-DSA-65` and `ML-DSA-87` as JWT signing methods
//! - A name-keyed signing-method registry
//! - Key contexts that carry key material into sign and verify calls
//! - Deterministic public key thumbprints for the `kid` header
//! - JSON Web Key Sets and `kid`-based verification key lookup
//! - Compact token framing and an async builder over the tokio runtime

pub mod algorithm;
pub mod api;
pub mod claims;
pub mod config;
pub mod context;
pub mod credential;
mod error;
pub mod jwk;
pub mod keys;
pub mod keyset;
pub mod material;
pub mod method;
pub mod registry;
pub mod thumbprint;
pub mod token;

pub use algorithm::{ML_DSA_FAMILY, MlDsaVariant};
pub use api::{AsyncJwtResult, PqJwt, PqJwtBuilder};
pub use claims::Claims;
pub use config::ValidationOptions;
pub use context::{KeyContext, attach, lookup};
pub use credential::{Credential, SignRequest, VerifyRequest};
pub use error::*;
pub use jwk::{JsonWebKey, JsonWebKeySet};
pub use keys::{PrivateKey, PublicKey};
pub use keyset::{resolve_verification_key, resolve_with_registry};
pub use material::{KeyMaterial, derive_public_key};
pub use method::{ML_DSA_44, ML_DSA_65, ML_DSA_87, SigningMethod};
pub use registry::{SigningMethodRegistry, lookup_signing_method, registry};
pub use thumbprint::{
    compute_thumbprint, material_thumbprint, public_key_thumbprint, thumbprint_with_registry,
};
pub use token::{
    Header, KeyResolver, Token, VerifiedToken, decode_header, parse, parse_with_registry,
};
