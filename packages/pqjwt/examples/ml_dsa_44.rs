//! Sign and verify an ML-DSA-44 token from a key context

use chrono::Duration;
use cryypt_pqjwt::{
    Claims, KeyContext, KeyMaterial, ML_DSA_44, MlDsaVariant, PqJwt, PrivateKey,
    ValidationOptions, VerifiedToken, compute_thumbprint,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let key = PrivateKey::generate(MlDsaVariant::MlDsa44);
    let ctx = KeyContext::background().attach(KeyMaterial::from_private(key))?;
    let kid = compute_thumbprint(&ctx)?;
    println!("kid: {kid}");

    // Raw signing method over a signing string
    let signature = ML_DSA_44.sign("header.payload", &ctx)?;
    ML_DSA_44.verify("header.payload", &signature, &ctx)?;
    println!("detached signature: {} bytes", signature.len());

    // Full token through the async builder
    let token = PqJwt::builder()
        .with_context(ctx.clone())
        .with_thumbprint_key_id()
        .sign(
            Claims::new()
                .subject("user123")
                .issuer("cryypt")
                .issued_now()
                .expires_in(Duration::hours(1)),
        )
        .await?;
    println!("token: {token}");

    let verified: VerifiedToken<Claims> = PqJwt::builder()
        .with_context(ctx)
        .with_validation(ValidationOptions::default().expect_issuer("cryypt"))
        .verify(&token)
        .await?;
    println!("verified subject: {:?}", verified.claims.sub);

    Ok(())
}
