//! Error types for post-quantum JWT signing and verification

use std::fmt;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, PqJwtError>;

/// Errors produced by signing methods, key contexts, thumbprints and key sets
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PqJwtError {
    /// Wrong or malformed key, or a credential that cannot carry the needed key
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// No key material attached to the provided context
    #[error("signer: missing configuration in provided context")]
    MissingConfig,

    /// Signing was requested with public key material only
    #[error("private key must be specified for Sign")]
    NoPrivateKey,

    /// Cryptographic signature check failed
    #[error("Invalid JWT signature")]
    InvalidSignature,

    /// Token header carries no usable `kid`
    #[error("could not find kid in JWT header")]
    MissingKeyId,

    /// No key in the key set carries the requested `kid`
    #[error("keyset not found for key {0}")]
    KeyNotFound(String),

    /// Algorithm name is not a registered signing method
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Registered algorithm that the validation options do not accept
    #[error("Algorithm not allowed: {0}")]
    AlgorithmNotAllowed(String),

    /// Thumbprint requested for a scheme outside the registered families
    #[error("unknown key type {0}")]
    UnsupportedScheme(String),

    /// Key variant does not match the signing method it was used with
    #[error("Algorithm mismatch: method {expected} cannot use a {actual} key")]
    AlgorithmMismatch {
        /// Algorithm of the signing method
        expected: String,
        /// Algorithm of the supplied key
        actual: String,
    },

    /// Token is not `header.payload.signature` or a segment does not decode
    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),

    /// `exp` is in the past
    #[error("JWT token has expired")]
    TokenExpired,

    /// `nbf` is in the future
    #[error("JWT token not yet valid")]
    TokenNotYetValid,

    /// A claim required by the validation options is absent
    #[error("Missing required claim: {0}")]
    MissingClaim(String),

    /// `iss` does not match the expected issuer
    #[error("Invalid JWT issuer")]
    InvalidIssuer,

    /// `aud` does not contain an expected audience
    #[error("Invalid JWT audience")]
    InvalidAudience,

    /// JSON encoding or decoding failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Reading a key set document failed
    #[error("IO error: {0}")]
    Io(String),

    /// Internal failure, e.g. a background task dropped its result channel
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PqJwtError {
    /// Create an `InvalidKey` error with a formatted message
    pub fn invalid_key(msg: impl fmt::Display) -> Self {
        Self::InvalidKey(msg.to_string())
    }

    /// Create an `InvalidToken` error with a formatted message
    pub fn invalid_token(msg: impl fmt::Display) -> Self {
        Self::InvalidToken(msg.to_string())
    }

    /// Create an `UnsupportedAlgorithm` error for the given name
    pub fn unsupported_algorithm(alg: impl fmt::Display) -> Self {
        Self::UnsupportedAlgorithm(alg.to_string())
    }

    /// Create an `AlgorithmMismatch` error
    pub fn algorithm_mismatch(expected: impl fmt::Display, actual: impl fmt::Display) -> Self {
        Self::AlgorithmMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Create a `Serialization` error with a formatted message
    pub fn serialization(msg: impl fmt::Display) -> Self {
        Self::Serialization(msg.to_string())
    }

    /// Create an `Internal` error with a formatted message
    pub fn internal(msg: impl fmt::Display) -> Self {
        Self::Internal(msg.to_string())
    }

    /// True for failures that mean "this token is not valid" rather than
    /// "no key could be found to check it".
    #[must_use]
    pub fn is_verification_failure(&self) -> bool {
        matches!(
            self,
            Self::InvalidSignature
                | Self::AlgorithmNotAllowed(_)
                | Self::AlgorithmMismatch { .. }
                | Self::TokenExpired
                | Self::TokenNotYetValid
                | Self::MissingClaim(_)
                | Self::InvalidIssuer
                | Self::InvalidAudience
        )
    }

    /// True for key-set lookup failures: `MissingKeyId`, `KeyNotFound`, or
    /// an `UnsupportedAlgorithm` key. Policy rejections of a known algorithm
    /// are `AlgorithmNotAllowed` and do not count.
    #[must_use]
    pub fn is_key_lookup_failure(&self) -> bool {
        matches!(
            self,
            Self::MissingKeyId | Self::KeyNotFound(_) | Self::UnsupportedAlgorithm(_)
        )
    }
}

impl From<serde_json::Error> for PqJwtError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<base64::DecodeError> for PqJwtError {
    fn from(err: base64::DecodeError) -> Self {
        Self::InvalidToken(format!("Base64 decode error: {err}"))
    }
}

impl From<std::io::Error> for PqJwtError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verification_and_lookup_failures_are_distinct() {
        assert!(PqJwtError::InvalidSignature.is_verification_failure());
        assert!(!PqJwtError::InvalidSignature.is_key_lookup_failure());
        assert!(PqJwtError::KeyNotFound("k".into()).is_key_lookup_failure());
        assert!(!PqJwtError::MissingKeyId.is_verification_failure());
    }

    #[test]
    fn disallowed_algorithm_is_a_verification_failure() {
        let err = PqJwtError::AlgorithmNotAllowed("ML-DSA-44".into());
        assert!(err.is_verification_failure());
        assert!(!err.is_key_lookup_failure());
        assert!(PqJwtError::unsupported_algorithm("ES256").is_key_lookup_failure());
    }

    #[test]
    fn mismatch_message_names_both_algorithms() {
        let err = PqJwtError::algorithm_mismatch("ML-DSA-44", "ML-DSA-65");
        assert_eq!(
            err.to_string(),
            "Algorithm mismatch: method ML-DSA-44 cannot use a ML-DSA-65 key"
        );
    }
}
