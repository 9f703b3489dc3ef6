//! Builder entry point for ML-DSA token signing and verification

use super::async_result::AsyncJwtResult;
use crate::config::ValidationOptions;
use crate::context::KeyContext;
use crate::error::{PqJwtError, Result};
use crate::jwk::JsonWebKeySet;
use crate::keys::PublicKey;
use crate::material::KeyMaterial;
use crate::method::SigningMethod;
use crate::registry::registry;
use crate::token::{self, Token, VerifiedToken};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Entry point: `PqJwt::builder()`
pub struct PqJwt;

impl PqJwt {
    /// New builder with default validation and no keys
    #[must_use]
    pub fn builder() -> PqJwtBuilder {
        PqJwtBuilder::default()
    }
}

#[derive(Debug, Clone, Default)]
enum KeyId {
    #[default]
    None,
    Fixed(String),
    Thumbprint,
}

/// Collects the method, keys and options for one sign or verify call.
///
/// Configuration errors (unknown algorithm names, invalid key material) are
/// held back and reported by the returned future.
#[derive(Debug, Clone, Default)]
pub struct PqJwtBuilder {
    method: Option<SigningMethod>,
    context: KeyContext,
    key_id: KeyId,
    public_key: Option<PublicKey>,
    key_set: Option<JsonWebKeySet>,
    validation: ValidationOptions,
    error: Option<PqJwtError>,
}

impl PqJwtBuilder {
    /// Sign with `method`
    #[must_use]
    pub fn with_method(mut self, method: SigningMethod) -> Self {
        self.method = Some(method);
        self
    }

    /// Sign with the registered method named `alg`
    #[must_use]
    pub fn with_algorithm(mut self, alg: &str) -> Self {
        match registry().require(alg) {
            Ok(method) => self.method = Some(*method),
            Err(e) => self.error = Some(e),
        }
        self
    }

    /// Use the key material attached to `context`
    #[must_use]
    pub fn with_context(mut self, context: KeyContext) -> Self {
        self.context = context;
        self
    }

    /// Attach `material` to the builder's context
    #[must_use]
    pub fn with_key_material(mut self, material: KeyMaterial) -> Self {
        match self.context.attach(material) {
            Ok(context) => self.context = context,
            Err(e) => self.error = Some(e),
        }
        self
    }

    /// Put `kid` in the header of signed tokens
    #[must_use]
    pub fn with_key_id(mut self, kid: impl Into<String>) -> Self {
        self.key_id = KeyId::Fixed(kid.into());
        self
    }

    /// Put the signing key's thumbprint in the header of signed tokens
    #[must_use]
    pub fn with_thumbprint_key_id(mut self) -> Self {
        self.key_id = KeyId::Thumbprint;
        self
    }

    /// Verify with `public_key` instead of the context's key
    #[must_use]
    pub fn with_public_key(mut self, public_key: PublicKey) -> Self {
        self.public_key = Some(public_key);
        self
    }

    /// Verify with the key set entry named by the header `kid`
    #[must_use]
    pub fn with_key_set(mut self, key_set: JsonWebKeySet) -> Self {
        self.key_set = Some(key_set);
        self
    }

    /// Replace the validation options
    #[must_use]
    pub fn with_validation(mut self, options: ValidationOptions) -> Self {
        self.validation = options;
        self
    }

    /// Sign `claims` on the tokio runtime.
    ///
    /// Without an explicit method the parameter set of the attached key is
    /// used.
    pub fn sign<C>(self, claims: C) -> AsyncJwtResult<String>
    where
        C: Serialize + Send + 'static,
    {
        AsyncJwtResult::spawn(move || self.sign_now(claims))
    }

    /// Verify `token` on the tokio runtime.
    ///
    /// The key comes from the key set if one is configured, else from the
    /// public key, else from the context.
    pub fn verify<C>(self, token: impl AsRef<str>) -> AsyncJwtResult<VerifiedToken<C>>
    where
        C: DeserializeOwned + Send + 'static,
    {
        let token = token.as_ref().to_string();
        AsyncJwtResult::spawn(move || self.verify_now(&token))
    }

    fn sign_now<C: Serialize>(self, claims: C) -> Result<String> {
        if let Some(e) = self.error {
            return Err(e);
        }
        let method = match self.method {
            Some(method) => method,
            None => self
                .context
                .lookup()
                .map(|material| SigningMethod::new(material.variant()))
                .ok_or(PqJwtError::MissingConfig)?,
        };

        let token = Token::new(method, claims);
        let token = match self.key_id {
            KeyId::None => token,
            KeyId::Fixed(kid) => token.with_key_id(kid),
            KeyId::Thumbprint => token.with_thumbprint_key_id(&self.context)?,
        };
        token.signed_string(&self.context)
    }

    fn verify_now<C: DeserializeOwned>(self, token: &str) -> Result<VerifiedToken<C>> {
        if let Some(e) = self.error {
            return Err(e);
        }
        match (&self.key_set, &self.public_key) {
            (Some(key_set), _) => token::parse(token, key_set, &self.validation),
            (None, Some(public_key)) => token::parse(token, public_key, &self.validation),
            (None, None) => token::parse(token, &self.context, &self.validation),
        }
    }
}
