//! Publish public keys as a JWK Set and verify tokens by `kid`

use cryypt_pqjwt::{
    Claims, JsonWebKeySet, KeyMaterial, MlDsaVariant, PqJwt, PrivateKey, VerifiedToken,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let signing_keys: Vec<PrivateKey> = [MlDsaVariant::MlDsa44, MlDsaVariant::MlDsa65]
        .into_iter()
        .map(PrivateKey::generate)
        .collect();

    let mut key_set = JsonWebKeySet::new();
    for key in &signing_keys {
        if let Some(public) = key.public_key() {
            key_set.push_public_key(public)?;
        }
    }
    println!("{}", key_set.to_json()?);

    for key in signing_keys {
        let alg = key.variant();
        let token = PqJwt::builder()
            .with_key_material(KeyMaterial::from_private(key))
            .with_thumbprint_key_id()
            .sign(Claims::new().subject("service-a"))
            .await?;

        let verified: VerifiedToken<Claims> = PqJwt::builder()
            .with_key_set(key_set.clone())
            .verify(&token)
            .await?;
        println!("{alg}: verified kid {:?}", verified.header.kid);
    }

    Ok(())
}
