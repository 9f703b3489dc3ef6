//! Registered JWT claims and their validation

use crate::config::ValidationOptions;
use crate::error::{PqJwtError, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// JWT claims set: the registered claims plus any custom members
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Issuer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    /// Subject.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Audience. Accepts a single string on input.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "one_or_many"
    )]
    pub aud: Option<Vec<String>>,
    /// Expiry (unix seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    /// Not before (unix seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
    /// Issued-at (unix seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// JWT ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
    /// Custom claims.
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl Claims {
    /// Empty claims set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `sub`
    #[must_use]
    pub fn subject(mut self, sub: impl Into<String>) -> Self {
        self.sub = Some(sub.into());
        self
    }

    /// Set `iss`
    #[must_use]
    pub fn issuer(mut self, iss: impl Into<String>) -> Self {
        self.iss = Some(iss.into());
        self
    }

    /// Set `aud`
    #[must_use]
    pub fn audience<I, S>(mut self, aud: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aud = Some(aud.into_iter().map(Into::into).collect());
        self
    }

    /// Set `iat` to now
    #[must_use]
    pub fn issued_now(mut self) -> Self {
        self.iat = Some(Utc::now().timestamp());
        self
    }

    /// Set `exp` to now plus `ttl`
    #[must_use]
    pub fn expires_in(mut self, ttl: Duration) -> Self {
        self.exp = Some((Utc::now() + ttl).timestamp());
        self
    }

    /// Set `nbf`
    #[must_use]
    pub fn not_before(mut self, nbf: DateTime<Utc>) -> Self {
        self.nbf = Some(nbf.timestamp());
        self
    }

    /// Set `jti`
    #[must_use]
    pub fn jwt_id(mut self, jti: impl Into<String>) -> Self {
        self.jti = Some(jti.into());
        self
    }

    /// Add a custom claim
    #[must_use]
    pub fn claim(mut self, name: impl Into<String>, value: Value) -> Self {
        self.extra.insert(name.into(), value);
        self
    }

    /// True when the registered or custom claim `name` is present
    #[must_use]
    pub fn has_claim(&self, name: &str) -> bool {
        match name {
            "iss" => self.iss.is_some(),
            "sub" => self.sub.is_some(),
            "aud" => self.aud.is_some(),
            "exp" => self.exp.is_some(),
            "nbf" => self.nbf.is_some(),
            "iat" => self.iat.is_some(),
            "jti" => self.jti.is_some(),
            other => self.extra.contains_key(other),
        }
    }

    /// Check the claims against `options` at the current time.
    ///
    /// # Errors
    ///
    /// `MissingClaim`, `TokenExpired`, `TokenNotYetValid`, `InvalidIssuer` or
    /// `InvalidAudience`.
    pub fn validate(&self, options: &ValidationOptions) -> Result<()> {
        self.validate_at(options, Utc::now().timestamp())
    }

    /// Check the claims against `options` at unix time `now`.
    ///
    /// # Errors
    ///
    /// As [`Claims::validate`].
    pub fn validate_at(&self, options: &ValidationOptions, now: i64) -> Result<()> {
        if let Some(missing) = options
            .required_claims
            .iter()
            .find(|name| !self.has_claim(name))
        {
            return Err(PqJwtError::MissingClaim(missing.clone()));
        }

        let leeway = options.leeway_seconds;
        if options.validate_exp
            && let Some(exp) = self.exp
            && now > exp.saturating_add(leeway)
        {
            return Err(PqJwtError::TokenExpired);
        }
        if options.validate_nbf
            && let Some(nbf) = self.nbf
            && now < nbf.saturating_sub(leeway)
        {
            return Err(PqJwtError::TokenNotYetValid);
        }

        if let Some(expected) = &options.expected_issuer
            && self.iss.as_ref() != Some(expected)
        {
            return Err(PqJwtError::InvalidIssuer);
        }

        if let Some(expected) = &options.expected_audience {
            let audience = self.aud.as_deref().unwrap_or_default();
            if !audience.iter().any(|aud| expected.contains(aud)) {
                return Err(PqJwtError::InvalidAudience);
            }
        }

        Ok(())
    }
}

fn one_or_many<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<Vec<String>>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(Option::<OneOrMany>::deserialize(deserializer)?.map(|aud| match aud {
        OneOrMany::One(single) => vec![single],
        OneOrMany::Many(many) => many,
    }))
}
