//! ML-DSA parameter sets

use crate::error::{PqJwtError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Key type label shared by every ML-DSA parameter set (JWK `kty`)
pub const ML_DSA_FAMILY: &str = "ML-DSA";

/// ML-DSA (FIPS 204) parameter sets usable as JWT signing algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MlDsaVariant {
    /// ML-DSA-44 (NIST security level 2)
    #[serde(rename = "ML-DSA-44")]
    MlDsa44,

    /// ML-DSA-65 (NIST security level 3)
    #[serde(rename = "ML-DSA-65")]
    MlDsa65,

    /// ML-DSA-87 (NIST security level 5)
    #[serde(rename = "ML-DSA-87")]
    MlDsa87,
}

impl MlDsaVariant {
    /// Every supported parameter set, weakest first
    pub const ALL: [MlDsaVariant; 3] = [Self::MlDsa44, Self::MlDsa65, Self::MlDsa87];

    /// Scheme name, also used as the JWT `alg` header value
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::MlDsa44 => "ML-DSA-44",
            Self::MlDsa65 => "ML-DSA-65",
            Self::MlDsa87 => "ML-DSA-87",
        }
    }

    /// Key type family
    #[must_use]
    pub const fn family(&self) -> &'static str {
        ML_DSA_FAMILY
    }

    /// Parse an exact scheme name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.name() == name)
    }

    /// Get the security level of the algorithm
    #[must_use]
    pub const fn security_level(&self) -> u8 {
        match self {
            Self::MlDsa44 => 2,
            Self::MlDsa65 => 3,
            Self::MlDsa87 => 5,
        }
    }

    /// Get the public key size in bytes
    #[must_use]
    pub const fn public_key_size(&self) -> usize {
        match self {
            Self::MlDsa44 => 1312,
            Self::MlDsa65 => 1952,
            Self::MlDsa87 => 2592,
        }
    }

    /// Get the secret key size in bytes
    #[must_use]
    pub const fn secret_key_size(&self) -> usize {
        match self {
            Self::MlDsa44 => 2560,
            Self::MlDsa65 => 4032,
            Self::MlDsa87 => 4896,
        }
    }

    /// Get the signature size in bytes
    #[must_use]
    pub const fn signature_size(&self) -> usize {
        match self {
            Self::MlDsa44 => 2420,
            Self::MlDsa65 => 3309,
            Self::MlDsa87 => 4627,
        }
    }
}

impl fmt::Display for MlDsaVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MlDsaVariant {
    type Err = PqJwtError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s).ok_or_else(|| PqJwtError::unsupported_algorithm(s))
    }
}
