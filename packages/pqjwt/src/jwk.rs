//! JSON Web Key and JSON Web Key Set model
//!
//! Every member of a key is optional and omitted from the output when
//! absent. `pub` holds the raw public key bytes, written as standard padded
//! base64. A set always writes its `keys` array and reads a missing one as
//! empty.

use crate::error::{PqJwtError, Result};
use crate::keys::PublicKey;
use crate::thumbprint::public_key_thumbprint;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Single JSON Web Key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonWebKey {
    /// Intended use, e.g. `sig`
    #[serde(rename = "use", default, skip_serializing_if = "Option::is_none")]
    pub use_: Option<String>,
    /// Key type family, e.g. `ML-DSA`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kty: Option<String>,
    /// Key identifier, usually the key's thumbprint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
    /// Signing algorithm name, e.g. `ML-DSA-44`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,
    /// Raw public key bytes
    #[serde(
        rename = "pub",
        default,
        skip_serializing_if = "Option::is_none",
        with = "std_base64"
    )]
    pub pub_: Option<Vec<u8>>,
}

impl JsonWebKey {
    /// JWK for `public_key`: `kty` is the family, `alg` the scheme name and
    /// `kid` the thumbprint.
    ///
    /// # Errors
    ///
    /// `UnsupportedScheme` if the key's scheme is not registered.
    pub fn from_public_key(public_key: &PublicKey) -> Result<Self> {
        Ok(Self {
            use_: None,
            kty: Some(public_key.variant().family().to_string()),
            kid: Some(public_key_thumbprint(public_key)?),
            alg: Some(public_key.scheme_name().to_string()),
            pub_: Some(public_key.marshal_binary()),
        })
    }

    /// Set the `use` member
    #[must_use]
    pub fn with_use(mut self, key_use: impl Into<String>) -> Self {
        self.use_ = Some(key_use.into());
        self
    }

    /// Set the `kid` member
    #[must_use]
    pub fn with_key_id(mut self, kid: impl Into<String>) -> Self {
        self.kid = Some(kid.into());
        self
    }
}

/// JSON Web Key Set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonWebKeySet {
    /// Member keys, in document order
    #[serde(default)]
    pub keys: Vec<JsonWebKey>,
}

impl JsonWebKeySet {
    /// Empty set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JWK Set document.
    ///
    /// # Errors
    ///
    /// `Serialization` on malformed JSON or a `pub` that is not base64.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to a JWK Set document
    ///
    /// # Errors
    ///
    /// `Serialization` if encoding fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Read and parse a JWK Set document from disk.
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be read, `Serialization` if it does not parse.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path).await?;
        let set = Self::from_json(&json)?;
        tracing::debug!(path = %path.display(), keys = set.keys.len(), "loaded key set");
        Ok(set)
    }

    /// First key whose `kid` equals `kid`
    #[must_use]
    pub fn find(&self, kid: &str) -> Option<&JsonWebKey> {
        self.keys.iter().find(|key| key.kid.as_deref() == Some(kid))
    }

    /// Append `key`
    pub fn push(&mut self, key: JsonWebKey) {
        self.keys.push(key);
    }

    /// Append the JWK for `public_key` with `use` set to `sig`.
    ///
    /// # Errors
    ///
    /// As [`JsonWebKey::from_public_key`].
    pub fn push_public_key(&mut self, public_key: &PublicKey) -> Result<&JsonWebKey> {
        self.keys
            .push(JsonWebKey::from_public_key(public_key)?.with_use("sig"));
        self.keys
            .last()
            .ok_or_else(|| PqJwtError::internal("key set empty after push"))
    }

    /// Number of keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// True when the set holds no keys
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl FromIterator<JsonWebKey> for JsonWebKeySet {
    fn from_iter<I: IntoIterator<Item = JsonWebKey>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().collect(),
        }
    }
}

mod std_base64 {
    use base64::{Engine as _, engine::general_purpose::STANDARD};
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(bytes: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error> {
        match bytes {
            Some(bytes) => serializer.serialize_str(&STANDARD.encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|encoded| STANDARD.decode(encoded).map_err(D::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_key(kid: &str, byte: u8) -> JsonWebKey {
        JsonWebKey {
            use_: Some("sig".to_string()),
            kty: Some("ML-DSA".to_string()),
            kid: Some(kid.to_string()),
            alg: Some("ML-DSA-44".to_string()),
            pub_: Some(vec![byte; 3]),
        }
    }

    #[test]
    fn absent_members_are_omitted() {
        let key = JsonWebKey {
            kid: Some("k1".to_string()),
            ..JsonWebKey::default()
        };
        assert_eq!(serde_json::to_string(&key).ok().as_deref(), Some(r#"{"kid":"k1"}"#));
    }

    #[test]
    fn pub_is_standard_base64() {
        let key = JsonWebKey {
            pub_: Some(vec![0xfb, 0xff, 0xfe]),
            ..JsonWebKey::default()
        };
        assert_eq!(serde_json::to_string(&key).ok().as_deref(), Some(r#"{"pub":"+//+"}"#));
    }

    #[test]
    fn member_order_and_names() {
        let json = serde_json::to_string(&sample_key("k", 1)).unwrap_or_default();
        assert_eq!(
            json,
            r#"{"use":"sig","kty":"ML-DSA","kid":"k","alg":"ML-DSA-44","pub":"AQEB"}"#
        );
    }

    #[test]
    fn set_round_trips() {
        let set: JsonWebKeySet = [sample_key("a", 1), sample_key("b", 2)].into_iter().collect();
        let parsed = set.to_json().and_then(|json| JsonWebKeySet::from_json(&json));
        assert_eq!(parsed, Ok(set));
    }

    #[test]
    fn empty_set_writes_keys_array() {
        assert_eq!(JsonWebKeySet::new().to_json().as_deref(), Ok(r#"{"keys":[]}"#));
        assert_eq!(JsonWebKeySet::from_json("{}"), Ok(JsonWebKeySet::new()));
    }

    #[test]
    fn find_returns_first_match() {
        let set: JsonWebKeySet = [sample_key("a", 1), sample_key("b", 2), sample_key("b", 3)]
            .into_iter()
            .collect();
        assert_eq!(set.find("b").and_then(|k| k.pub_.clone()), Some(vec![2; 3]));
        assert!(set.find("c").is_none());
    }

    #[test]
    fn malformed_pub_is_rejected() {
        let err = JsonWebKeySet::from_json(r#"{"keys":[{"pub":"%%%"}]}"#);
        assert!(matches!(err, Err(PqJwtError::Serialization(_))));
    }
}
