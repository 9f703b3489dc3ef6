//! Token validation options

use crate::error::Result;
use crate::registry::registry;
use serde::{Deserialize, Serialize};

/// Options applied by [`crate::parse`] after the signature checks out.
///
/// Every field has a serde default, so a partial JSON document only needs
/// the settings it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationOptions {
    /// Clock skew tolerated on `exp` and `nbf`, in seconds.
    pub leeway_seconds: i64,
    /// Validate expiry.
    pub validate_exp: bool,
    /// Validate not-before.
    pub validate_nbf: bool,
    /// Claims that must be present.
    pub required_claims: Vec<String>,
    /// Accepted header `alg` values.
    pub allowed_algorithms: Vec<String>,
    /// Expected issuer.
    pub expected_issuer: Option<String>,
    /// Accepted audiences; one match is enough.
    pub expected_audience: Option<Vec<String>>,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            leeway_seconds: 0,
            validate_exp: true,
            validate_nbf: true,
            required_claims: vec![],
            allowed_algorithms: registry().names().into_iter().map(String::from).collect(),
            expected_issuer: None,
            expected_audience: None,
        }
    }
}

impl ValidationOptions {
    /// Parse options from JSON; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// `Serialization` on malformed JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// No leeway, `exp` required, and only the two higher parameter sets.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            required_claims: vec!["exp".to_string()],
            allowed_algorithms: vec!["ML-DSA-65".to_string(), "ML-DSA-87".to_string()],
            ..Self::default()
        }
    }

    /// Set the clock skew leeway in seconds.
    #[must_use]
    pub fn with_leeway(mut self, seconds: i64) -> Self {
        self.leeway_seconds = seconds;
        self
    }

    /// Set whether to validate expiration.
    #[must_use]
    pub fn validate_expiration(mut self, validate: bool) -> Self {
        self.validate_exp = validate;
        self
    }

    /// Set whether to validate not-before.
    #[must_use]
    pub fn validate_not_before(mut self, validate: bool) -> Self {
        self.validate_nbf = validate;
        self
    }

    /// Add a required claim.
    #[must_use]
    pub fn require_claim(mut self, claim: impl Into<String>) -> Self {
        self.required_claims.push(claim.into());
        self
    }

    /// Replace the accepted algorithms.
    #[must_use]
    pub fn allowed_algorithms<I, S>(mut self, algorithms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_algorithms = algorithms.into_iter().map(Into::into).collect();
        self
    }

    /// Set expected issuer.
    #[must_use]
    pub fn expect_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.expected_issuer = Some(issuer.into());
        self
    }

    /// Set expected audience.
    #[must_use]
    pub fn expect_audience(mut self, audience: Vec<String>) -> Self {
        self.expected_audience = Some(audience);
        self
    }

    /// True when `alg` is accepted
    #[must_use]
    pub fn allows(&self, alg: &str) -> bool {
        self.allowed_algorithms.iter().any(|allowed| allowed == alg)
    }
}
