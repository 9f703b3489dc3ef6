//! Typed ML-DSA key handles
//!
//! Keys are kept as their canonical byte encodings, tagged with the
//! parameter set they belong to. Every constructor runs the scheme's own
//! `from_bytes` so a `PublicKey` or `PrivateKey` value is always decodable
//! by `pqcrypto-mldsa`. Seeded key generation goes through `ml-dsa`, whose
//! FIPS 204 encodings `pqcrypto-mldsa` reads unchanged.

use crate::algorithm::MlDsaVariant;
use crate::error::{PqJwtError, Result};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use ml_dsa::KeyGen;
use pqcrypto_mldsa::{mldsa44, mldsa65, mldsa87};
use pqcrypto_traits::sign::{
    DetachedSignature as PqDetachedSignature, PublicKey as PqPublicKey,
    SecretKey as PqSecretKey, VerificationError,
};
use std::fmt;
use zeroize::Zeroizing;

/// ML-DSA public key
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PublicKey {
    variant: MlDsaVariant,
    bytes: Vec<u8>,
}

impl PublicKey {
    /// Reconstruct a public key from its binary encoding.
    ///
    /// # Errors
    ///
    /// Returns `InvalidKey` when the bytes are not a valid encoding for `variant`.
    pub fn from_bytes(variant: MlDsaVariant, bytes: impl Into<Vec<u8>>) -> Result<Self> {
        let bytes = bytes.into();
        let decodes = match variant {
            MlDsaVariant::MlDsa44 => mldsa44::PublicKey::from_bytes(&bytes).is_ok(),
            MlDsaVariant::MlDsa65 => mldsa65::PublicKey::from_bytes(&bytes).is_ok(),
            MlDsaVariant::MlDsa87 => mldsa87::PublicKey::from_bytes(&bytes).is_ok(),
        };
        if !decodes {
            return Err(PqJwtError::invalid_key(format!(
                "Invalid {variant} public key: expected {} bytes, got {}",
                variant.public_key_size(),
                bytes.len()
            )));
        }
        Ok(Self { variant, bytes })
    }

    /// Load a public key from standard base64
    ///
    /// # Errors
    ///
    /// Returns `InvalidKey` if the text is not base64 or not a valid key.
    pub fn from_base64(variant: MlDsaVariant, encoded: &str) -> Result<Self> {
        let bytes = STANDARD
            .decode(encoded)
            .map_err(|e| PqJwtError::invalid_key(format!("Invalid base64 public key: {e}")))?;
        Self::from_bytes(variant, bytes)
    }

    /// Load a public key from hex
    ///
    /// # Errors
    ///
    /// Returns `InvalidKey` if the text is not hex or not a valid key.
    pub fn from_hex(variant: MlDsaVariant, encoded: &str) -> Result<Self> {
        let bytes = hex::decode(encoded)
            .map_err(|e| PqJwtError::invalid_key(format!("Invalid hex public key: {e}")))?;
        Self::from_bytes(variant, bytes)
    }

    /// Parameter set of this key
    #[must_use]
    pub fn variant(&self) -> MlDsaVariant {
        self.variant
    }

    /// Scheme name, e.g. `ML-DSA-44`
    #[must_use]
    pub fn scheme_name(&self) -> &'static str {
        self.variant.name()
    }

    /// Canonical binary encoding
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Canonical binary encoding, owned
    #[must_use]
    pub fn marshal_binary(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    /// Check a detached signature over `message` with this key's parameter set.
    pub(crate) fn verify_detached(&self, message: &[u8], signature: &[u8]) -> Result<()> {
        match self.variant {
            MlDsaVariant::MlDsa44 => verify_with::<mldsa44::PublicKey, mldsa44::DetachedSignature>(
                &self.bytes,
                message,
                signature,
                mldsa44::verify_detached_signature,
            ),
            MlDsaVariant::MlDsa65 => verify_with::<mldsa65::PublicKey, mldsa65::DetachedSignature>(
                &self.bytes,
                message,
                signature,
                mldsa65::verify_detached_signature,
            ),
            MlDsaVariant::MlDsa87 => verify_with::<mldsa87::PublicKey, mldsa87::DetachedSignature>(
                &self.bytes,
                message,
                signature,
                mldsa87::verify_detached_signature,
            ),
        }
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = &self.bytes[..self.bytes.len().min(8)];
        f.debug_struct("PublicKey")
            .field("variant", &self.variant)
            .field("prefix", &hex::encode(prefix))
            .finish()
    }
}

/// ML-DSA private key, optionally carrying its public half
#[derive(Clone)]
pub struct PrivateKey {
    variant: MlDsaVariant,
    secret: Zeroizing<Vec<u8>>,
    public: Option<PublicKey>,
}

impl PrivateKey {
    /// Generate a fresh key pair from the system RNG
    #[must_use]
    pub fn generate(variant: MlDsaVariant) -> Self {
        let (public, secret) = match variant {
            MlDsaVariant::MlDsa44 => {
                let (pk, sk) = mldsa44::keypair();
                (pk.as_bytes().to_vec(), sk.as_bytes().to_vec())
            }
            MlDsaVariant::MlDsa65 => {
                let (pk, sk) = mldsa65::keypair();
                (pk.as_bytes().to_vec(), sk.as_bytes().to_vec())
            }
            MlDsaVariant::MlDsa87 => {
                let (pk, sk) = mldsa87::keypair();
                (pk.as_bytes().to_vec(), sk.as_bytes().to_vec())
            }
        };

        Self {
            variant,
            secret: Zeroizing::new(secret),
            public: Some(PublicKey { variant, bytes: public }),
        }
    }

    /// Expand a 32-byte seed into a key pair (FIPS 204 `ML-DSA.KeyGen_internal`).
    ///
    /// The same seed always yields the same pair, and the public half is
    /// kept, so seed imports can always derive their public key.
    ///
    /// # Errors
    ///
    /// Returns `InvalidKey` if an expanded half fails to decode.
    pub fn from_seed(variant: MlDsaVariant, seed: &[u8; 32]) -> Result<Self> {
        let (public, secret) = match variant {
            MlDsaVariant::MlDsa44 => {
                let kp = ml_dsa::MlDsa44::key_gen_internal(&(*seed).into());
                (kp.verifying_key().encode().to_vec(), kp.signing_key().encode().to_vec())
            }
            MlDsaVariant::MlDsa65 => {
                let kp = ml_dsa::MlDsa65::key_gen_internal(&(*seed).into());
                (kp.verifying_key().encode().to_vec(), kp.signing_key().encode().to_vec())
            }
            MlDsaVariant::MlDsa87 => {
                let kp = ml_dsa::MlDsa87::key_gen_internal(&(*seed).into());
                (kp.verifying_key().encode().to_vec(), kp.signing_key().encode().to_vec())
            }
        };
        tracing::trace!(alg = %variant, "expanded key pair from seed");
        Self::from_keypair_bytes(variant, public, secret)
    }

    /// Import a secret key without its public half.
    ///
    /// ML-DSA secret keys do not encode `t1`, so keys imported this way
    /// cannot produce their public key. Import the seed with
    /// [`PrivateKey::from_seed`] or both halves with
    /// [`PrivateKey::from_keypair_bytes`] instead.
    ///
    /// # Errors
    ///
    /// Returns `InvalidKey` when the bytes are not a valid secret key encoding.
    pub fn from_bytes(variant: MlDsaVariant, secret: impl Into<Vec<u8>>) -> Result<Self> {
        let secret = Zeroizing::new(secret.into());
        let decodes = match variant {
            MlDsaVariant::MlDsa44 => mldsa44::SecretKey::from_bytes(&secret).is_ok(),
            MlDsaVariant::MlDsa65 => mldsa65::SecretKey::from_bytes(&secret).is_ok(),
            MlDsaVariant::MlDsa87 => mldsa87::SecretKey::from_bytes(&secret).is_ok(),
        };
        if !decodes {
            return Err(PqJwtError::invalid_key(format!(
                "Invalid {variant} secret key: expected {} bytes, got {}",
                variant.secret_key_size(),
                secret.len()
            )));
        }
        Ok(Self {
            variant,
            secret,
            public: None,
        })
    }

    /// Import a key pair
    ///
    /// # Errors
    ///
    /// Returns `InvalidKey` when either half is not a valid encoding.
    pub fn from_keypair_bytes(
        variant: MlDsaVariant,
        public: impl Into<Vec<u8>>,
        secret: impl Into<Vec<u8>>,
    ) -> Result<Self> {
        let public = PublicKey::from_bytes(variant, public)?;
        let mut key = Self::from_bytes(variant, secret)?;
        key.public = Some(public);
        Ok(key)
    }

    /// Parameter set of this key
    #[must_use]
    pub fn variant(&self) -> MlDsaVariant {
        self.variant
    }

    /// Public half, when known
    #[must_use]
    pub fn public_key(&self) -> Option<&PublicKey> {
        self.public.as_ref()
    }

    /// Secret key bytes
    #[must_use]
    pub fn secret_bytes(&self) -> &[u8] {
        &self.secret
    }

    /// Detached ML-DSA signature over the raw message (empty context string).
    pub(crate) fn sign_detached(&self, message: &[u8]) -> Result<Vec<u8>> {
        match self.variant {
            MlDsaVariant::MlDsa44 => {
                sign_with::<mldsa44::SecretKey, _>(&self.secret, message, mldsa44::detached_sign)
            }
            MlDsaVariant::MlDsa65 => {
                sign_with::<mldsa65::SecretKey, _>(&self.secret, message, mldsa65::detached_sign)
            }
            MlDsaVariant::MlDsa87 => {
                sign_with::<mldsa87::SecretKey, _>(&self.secret, message, mldsa87::detached_sign)
            }
        }
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("variant", &self.variant)
            .field("secret", &"<redacted>")
            .field("public", &self.public)
            .finish()
    }
}

fn sign_with<S, D>(secret: &[u8], message: &[u8], sign: fn(&[u8], &S) -> D) -> Result<Vec<u8>>
where
    S: PqSecretKey,
    D: PqDetachedSignature,
{
    let sk = S::from_bytes(secret).map_err(|_| PqJwtError::invalid_key("Invalid ML-DSA secret key"))?;
    Ok(sign(message, &sk).as_bytes().to_vec())
}

fn verify_with<P, D>(
    public: &[u8],
    message: &[u8],
    signature: &[u8],
    verify: fn(&D, &[u8], &P) -> std::result::Result<(), VerificationError>,
) -> Result<()>
where
    P: PqPublicKey,
    D: PqDetachedSignature,
{
    let pk = P::from_bytes(public).map_err(|_| PqJwtError::invalid_key("Invalid ML-DSA public key"))?;
    let sig = D::from_bytes(signature).map_err(|_| PqJwtError::InvalidSignature)?;
    verify(&sig, message, &pk).map_err(|_| PqJwtError::InvalidSignature)
}
