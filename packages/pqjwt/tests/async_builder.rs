//! Async builder sign and verify

use cryypt_pqjwt::{
    Claims, JsonWebKeySet, KeyMaterial, MlDsaVariant, PqJwt, PqJwtError, PrivateKey,
    ValidationOptions, VerifiedToken, compute_thumbprint, decode_header,
};

#[tokio::test]
async fn sign_and_verify_with_key_material() {
    let key = PrivateKey::generate(MlDsaVariant::MlDsa44);
    let public = key.public_key().cloned().expect("public half");

    let token = PqJwt::builder()
        .with_key_material(KeyMaterial::from_private(key))
        .with_thumbprint_key_id()
        .sign(Claims::new().subject("alice").issuer("idp"))
        .await
        .expect("sign");
    assert_eq!(decode_header(&token).map(|h| h.alg), Ok("ML-DSA-44".to_string()));

    let verified: VerifiedToken<Claims> = PqJwt::builder()
        .with_public_key(public)
        .with_validation(ValidationOptions::default().expect_issuer("idp"))
        .verify(&token)
        .await
        .expect("verify");
    assert_eq!(verified.claims.sub.as_deref(), Some("alice"));
}

#[tokio::test]
async fn verify_through_key_set() {
    let key = PrivateKey::generate(MlDsaVariant::MlDsa65);
    let mut key_set = JsonWebKeySet::new();
    key_set
        .push_public_key(key.public_key().expect("public half"))
        .expect("jwk");

    let token = PqJwt::builder()
        .with_algorithm("ML-DSA-65")
        .with_key_material(KeyMaterial::from_private(key))
        .with_thumbprint_key_id()
        .sign(Claims::new())
        .await
        .expect("sign");

    let verified = PqJwt::builder()
        .with_key_set(key_set)
        .verify::<Claims>(&token)
        .await;
    assert!(verified.is_ok());
}

#[tokio::test]
async fn explicit_key_id_is_used() {
    let token = PqJwt::builder()
        .with_key_material(KeyMaterial::from_private(PrivateKey::generate(MlDsaVariant::MlDsa44)))
        .with_key_id("key-2024")
        .sign(Claims::new())
        .await
        .expect("sign");
    assert_eq!(decode_header(&token).map(|h| h.kid), Ok(Some("key-2024".to_string())));
}

#[tokio::test]
async fn configuration_errors_surface_from_the_future() {
    assert_eq!(
        PqJwt::builder()
            .with_algorithm("ES256")
            .sign(Claims::new())
            .await,
        Err(PqJwtError::UnsupportedAlgorithm("ES256".to_string()))
    );
    assert_eq!(
        PqJwt::builder().sign(Claims::new()).await,
        Err(PqJwtError::MissingConfig)
    );
    assert!(matches!(
        PqJwt::builder()
            .with_key_material(KeyMaterial::from_private(
                PrivateKey::from_bytes(
                    MlDsaVariant::MlDsa44,
                    PrivateKey::generate(MlDsaVariant::MlDsa44).secret_bytes().to_vec(),
                )
                .expect("secret key"),
            ))
            .sign(Claims::new())
            .await,
        Err(PqJwtError::InvalidKey(_))
    ));
}

#[tokio::test]
async fn concurrent_signers_share_one_background_context() {
    let key = PrivateKey::generate(MlDsaVariant::MlDsa44);
    let ctx = cryypt_pqjwt::KeyContext::background()
        .attach(KeyMaterial::from_private(key))
        .expect("attach");
    let kid = compute_thumbprint(&ctx).expect("thumbprint");

    let tasks: Vec<_> = (0..8)
        .map(|i| {
            PqJwt::builder()
                .with_context(ctx.clone())
                .with_thumbprint_key_id()
                .sign(Claims::new().subject(format!("user-{i}")))
        })
        .collect();

    for task in tasks {
        let token = task.await.expect("sign");
        assert_eq!(decode_header(&token).ok().and_then(|h| h.kid), Some(kid.clone()));
        let verified = PqJwt::builder()
            .with_context(ctx.clone())
            .verify::<Claims>(token)
            .await;
        assert!(verified.is_ok());
    }
}
