//! Signing-method registry
//!
//! The process-wide registry is built once, on first use, with every
//! ML-DSA parameter set and is read-only afterwards. Callers that need a
//! different set of methods build their own [`SigningMethodRegistry`].

use crate::credential::{SignRequest, VerifyRequest};
use crate::error::{PqJwtError, Result};
use crate::method::{ML_DSA_44, ML_DSA_65, ML_DSA_87, SigningMethod};
use once_cell::sync::Lazy;
use std::collections::HashMap;

static DEFAULT_REGISTRY: Lazy<SigningMethodRegistry> = Lazy::new(|| {
    let mut registry = SigningMethodRegistry::new();
    registry.register(ML_DSA_44);
    registry.register(ML_DSA_65);
    registry.register(ML_DSA_87);
    registry
});

/// Process-wide registry of the built-in ML-DSA signing methods
#[must_use]
pub fn registry() -> &'static SigningMethodRegistry {
    &DEFAULT_REGISTRY
}

/// Look up a built-in signing method by its exact `alg` name
#[must_use]
pub fn lookup_signing_method(alg: &str) -> Option<&'static SigningMethod> {
    DEFAULT_REGISTRY.get(alg)
}

/// Name → signing method table
#[derive(Debug, Clone, Default)]
pub struct SigningMethodRegistry {
    methods: HashMap<&'static str, SigningMethod>,
}

impl SigningMethodRegistry {
    /// Empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `method` under its `alg` name. A later registration with the
    /// same name replaces the earlier one, which is returned.
    pub fn register(&mut self, method: SigningMethod) -> Option<SigningMethod> {
        self.methods.insert(method.alg(), method)
    }

    /// Method registered under `alg`
    #[must_use]
    pub fn get(&self, alg: &str) -> Option<&SigningMethod> {
        self.methods.get(alg)
    }

    /// Method registered under `alg`, or `UnsupportedAlgorithm`
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedAlgorithm` if nothing is registered under `alg`.
    pub fn require(&self, alg: &str) -> Result<&SigningMethod> {
        self.get(alg)
            .ok_or_else(|| PqJwtError::unsupported_algorithm(alg))
    }

    /// Key type family of the method registered under `scheme_name`
    #[must_use]
    pub fn family_of(&self, scheme_name: &str) -> Option<&'static str> {
        self.get(scheme_name).map(SigningMethod::family)
    }

    /// Registered names, sorted
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.methods.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Number of registered methods
    #[must_use]
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// True when nothing is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Sign through the method named by `request.alg`.
    ///
    /// # Errors
    ///
    /// `UnsupportedAlgorithm` for unknown names, otherwise as [`SigningMethod::sign`].
    pub fn sign(&self, request: &SignRequest<'_>) -> Result<Vec<u8>> {
        self.require(request.alg)?
            .sign(request.message, request.credential)
    }

    /// Verify through the method named by `request.alg`.
    ///
    /// # Errors
    ///
    /// `UnsupportedAlgorithm` for unknown names, otherwise as [`SigningMethod::verify`].
    pub fn verify(&self, request: &VerifyRequest<'_>) -> Result<()> {
        self.require(request.alg)?
            .verify(request.message, request.signature, request.credential)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::MlDsaVariant;

    #[test]
    fn default_registry_holds_every_variant() {
        assert_eq!(registry().names(), vec!["ML-DSA-44", "ML-DSA-65", "ML-DSA-87"]);
        assert_eq!(lookup_signing_method("ML-DSA-65"), Some(&ML_DSA_65));
        assert_eq!(registry().family_of("ML-DSA-87"), Some("ML-DSA"));
        assert!(lookup_signing_method("ES256").is_none());
    }

    #[test]
    fn last_registration_wins() {
        let mut registry = SigningMethodRegistry::new();
        assert!(registry.register(ML_DSA_44).is_none());
        assert_eq!(registry.register(ML_DSA_44), Some(ML_DSA_44));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn require_reports_unknown_names() {
        let registry = SigningMethodRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(
            registry.require("ML-DSA-44"),
            Err(PqJwtError::UnsupportedAlgorithm("ML-DSA-44".to_string()))
        );
    }

    #[test]
    fn methods_are_named_after_their_variant() {
        for variant in MlDsaVariant::ALL {
            let method = registry().get(variant.name());
            assert_eq!(method.map(SigningMethod::variant), Some(variant));
        }
    }
}
