//! JWK Set documents: shape, interop vectors and loading from disk

use cryypt_pqjwt::{
    JsonWebKey, JsonWebKeySet, MlDsaVariant, PqJwtError, PrivateKey, PublicKey,
    public_key_thumbprint,
};

fn fixed_public_key() -> PublicKey {
    PublicKey::from_bytes(MlDsaVariant::MlDsa44, vec![0x2a; 1312]).expect("fixed key")
}

#[test]
fn jwk_from_public_key_uses_family_scheme_and_thumbprint() {
    let jwk = JsonWebKey::from_public_key(&fixed_public_key())
        .expect("jwk")
        .with_use("sig");
    assert_eq!(jwk.kty.as_deref(), Some("ML-DSA"));
    assert_eq!(jwk.alg.as_deref(), Some("ML-DSA-44"));
    assert_eq!(
        jwk.kid.as_deref(),
        Some("bZj90fq6Tb4dXR8dv6TlnhpwXvqAlDfp6KcMS6NvRUM=")
    );
    assert_eq!(jwk.use_.as_deref(), Some("sig"));
    assert_eq!(jwk.pub_.as_deref().map(<[u8]>::len), Some(1312));
}

#[test]
fn document_uses_standard_base64_for_pub() {
    let mut set = JsonWebKeySet::new();
    set.push_public_key(&fixed_public_key()).expect("jwk");
    let json = set.to_json().expect("json");

    // 0x2a repeated encodes to "Kioq" blocks in both alphabets
    assert!(json.starts_with(r#"{"keys":[{"use":"sig","kty":"ML-DSA","kid":"bZj90fq6Tb4dXR8dv6TlnhpwXvqAlDfp6KcMS6NvRUM=","alg":"ML-DSA-44","pub":"KioqKioq"#));
    assert_eq!(JsonWebKeySet::from_json(&json), Ok(set));
}

#[test]
fn thumbprint_matches_published_kid() {
    let public = PrivateKey::generate(MlDsaVariant::MlDsa87)
        .public_key()
        .cloned()
        .expect("public half");
    let jwk = JsonWebKey::from_public_key(&public).expect("jwk");
    assert_eq!(jwk.kid, public_key_thumbprint(&public).ok());
}

#[tokio::test]
async fn load_reads_a_document_from_disk() {
    let mut set = JsonWebKeySet::new();
    set.push_public_key(&fixed_public_key()).expect("jwk");

    let path = std::env::temp_dir().join(format!("pqjwt-keyset-{}.json", std::process::id()));
    tokio::fs::write(&path, set.to_json().expect("json"))
        .await
        .expect("write key set");

    let loaded = JsonWebKeySet::load(&path).await;
    let _ = tokio::fs::remove_file(&path).await;
    assert_eq!(loaded, Ok(set));
}

#[tokio::test]
async fn load_reports_missing_file_as_io() {
    let path = std::env::temp_dir().join("pqjwt-keyset-does-not-exist.json");
    assert!(matches!(JsonWebKeySet::load(&path).await, Err(PqJwtError::Io(_))));
}
