//! Compact JWT framing over the ML-DSA signing methods
//!
//! A token is `b64url(header).b64url(claims).b64url(signature)` with no
//! padding. The signature covers the ASCII bytes of the first two segments
//! joined by `.`.

use crate::config::ValidationOptions;
use crate::context::KeyContext;
use crate::credential::Credential;
use crate::claims::Claims;
use crate::error::{PqJwtError, Result};
use crate::keys::PublicKey;
use crate::method::SigningMethod;
use crate::registry::{SigningMethodRegistry, registry};
use crate::thumbprint::compute_thumbprint;
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// JOSE header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    /// Signing method name
    pub alg: String,
    /// Token type, `JWT` for tokens built here
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,
    /// Key identifier. A non-string value is read as absent.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "string_or_absent"
    )]
    pub kid: Option<String>,
    /// Any other header members
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Header {
    /// Header for `method` with `typ` set to `JWT`
    #[must_use]
    pub fn new(method: &SigningMethod) -> Self {
        Self {
            alg: method.alg().to_string(),
            typ: Some("JWT".to_string()),
            kid: None,
            extra: Map::new(),
        }
    }
}

fn string_or_absent<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error> {
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(|value| match value {
        Value::String(kid) => Some(kid),
        _ => None,
    }))
}

/// Source of the verification key for a parsed header
pub trait KeyResolver {
    /// Public key that should verify a token carrying `header`.
    ///
    /// # Errors
    ///
    /// Implementation defined; key sets report `MissingKeyId`, `KeyNotFound`,
    /// `UnsupportedAlgorithm` or `InvalidKey`.
    fn resolve(&self, header: &Header) -> Result<PublicKey>;
}

impl KeyResolver for PublicKey {
    fn resolve(&self, _header: &Header) -> Result<PublicKey> {
        Ok(self.clone())
    }
}

/// A context resolves to the public key of its attached material,
/// whatever the header says.
impl KeyResolver for KeyContext {
    fn resolve(&self, _header: &Header) -> Result<PublicKey> {
        Credential::Context(self).public_key().cloned()
    }
}

impl<F> KeyResolver for F
where
    F: Fn(&Header) -> Result<PublicKey>,
{
    fn resolve(&self, header: &Header) -> Result<PublicKey> {
        self(header)
    }
}

/// Unsigned token
#[derive(Debug, Clone)]
pub struct Token<C> {
    method: SigningMethod,
    header: Header,
    claims: C,
}

impl<C: Serialize> Token<C> {
    /// New token signed with `method`
    #[must_use]
    pub fn new(method: SigningMethod, claims: C) -> Self {
        Self {
            header: Header::new(&method),
            method,
            claims,
        }
    }

    /// Set the header `kid`
    #[must_use]
    pub fn with_key_id(mut self, kid: impl Into<String>) -> Self {
        self.header.kid = Some(kid.into());
        self
    }

    /// Set the header `kid` to the thumbprint of the key attached to `context`.
    ///
    /// # Errors
    ///
    /// As [`compute_thumbprint`].
    pub fn with_thumbprint_key_id(self, context: &KeyContext) -> Result<Self> {
        let kid = compute_thumbprint(context)?;
        Ok(self.with_key_id(kid))
    }

    /// Header
    #[must_use]
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Claims
    #[must_use]
    pub fn claims(&self) -> &C {
        &self.claims
    }

    /// Signing method
    #[must_use]
    pub fn method(&self) -> SigningMethod {
        self.method
    }

    /// `b64url(header).b64url(claims)`
    ///
    /// # Errors
    ///
    /// `Serialization` if the header or claims cannot be encoded.
    pub fn signing_string(&self) -> Result<String> {
        let header = serde_json::to_vec(&self.header)?;
        let claims = serde_json::to_vec(&self.claims)?;
        Ok(format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(header),
            URL_SAFE_NO_PAD.encode(claims)
        ))
    }

    /// Sign and return the compact token.
    ///
    /// # Errors
    ///
    /// `Serialization`, or any error of [`SigningMethod::sign`].
    pub fn signed_string<'a>(&self, credential: impl Into<Credential<'a>>) -> Result<String> {
        let signing_string = self.signing_string()?;
        let signature = self.method.sign(&signing_string, credential)?;
        Ok(format!("{signing_string}.{}", URL_SAFE_NO_PAD.encode(signature)))
    }
}

/// Token whose signature and claims have been checked
#[derive(Debug, Clone)]
pub struct VerifiedToken<C> {
    /// Decoded header
    pub header: Header,
    /// Decoded claims
    pub claims: C,
    /// Method that verified the signature
    pub method: SigningMethod,
}

/// Decode the header without verifying anything
///
/// # Errors
///
/// `InvalidToken` if the token is not three segments or the header does not decode.
pub fn decode_header(token: &str) -> Result<Header> {
    let [header, _, _] = split(token)?;
    decode_segment(header)
}

/// Verify `token` with the default registry. See [`parse_with_registry`].
///
/// # Errors
///
/// As [`parse_with_registry`].
pub fn parse<C, R>(token: &str, resolver: &R, options: &ValidationOptions) -> Result<VerifiedToken<C>>
where
    C: DeserializeOwned,
    R: KeyResolver + ?Sized,
{
    parse_with_registry(token, registry(), resolver, options)
}

/// Split, verify and validate a compact token.
///
/// The header `alg` selects the method from `methods` and must be allowed by
/// `options`. The key comes from `resolver`. Claims are validated only after
/// the signature checks out.
///
/// # Errors
///
/// * `InvalidToken` for framing or decoding failures
/// * `UnsupportedAlgorithm` for an unregistered `alg`
/// * `AlgorithmNotAllowed` for an `alg` the options do not accept
/// * resolver errors, `AlgorithmMismatch`, `InvalidSignature`
/// * claim validation errors, `Serialization` if `C` does not deserialize
pub fn parse_with_registry<C, R>(
    token: &str,
    methods: &SigningMethodRegistry,
    resolver: &R,
    options: &ValidationOptions,
) -> Result<VerifiedToken<C>>
where
    C: DeserializeOwned,
    R: KeyResolver + ?Sized,
{
    let [header_b64, claims_b64, signature_b64] = split(token)?;
    let header: Header = decode_segment(header_b64)?;

    let method = *methods.require(&header.alg)?;
    if !options.allows(method.alg()) {
        return Err(PqJwtError::AlgorithmNotAllowed(method.alg().to_string()));
    }

    let public_key = resolver.resolve(&header)?;
    let signature = URL_SAFE_NO_PAD.decode(signature_b64)?;
    let signing_input = &token[..header_b64.len() + 1 + claims_b64.len()];
    method.verify(signing_input, &signature, &public_key)?;

    let payload: Value = decode_segment(claims_b64)?;
    let registered: Claims = serde_json::from_value(payload.clone())
        .map_err(|e| PqJwtError::invalid_token(format!("claims: {e}")))?;
    registered.validate(options)?;

    tracing::debug!(alg = method.alg(), kid = ?header.kid, "verified token");
    Ok(VerifiedToken {
        claims: serde_json::from_value(payload)?,
        header,
        method,
    })
}

fn split(token: &str) -> Result<[&str; 3]> {
    let mut parts = token.split('.');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(header), Some(claims), Some(signature), None) => Ok([header, claims, signature]),
        _ => Err(PqJwtError::invalid_token("expected three dot-separated segments")),
    }
}

fn decode_segment<T: DeserializeOwned>(segment: &str) -> Result<T> {
    let bytes = URL_SAFE_NO_PAD.decode(segment)?;
    serde_json::from_slice(&bytes).map_err(PqJwtError::invalid_token)
}
