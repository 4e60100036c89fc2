use std::sync::OnceLock;

use anyhow::{Result, anyhow};
use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};

/// Hashes on the blocking pool; argon2 is deliberately slow.
pub async fn hash_password(plain: String) -> Result<String> {
    tokio::task::spawn_blocking(move || hash_password_sync(&plain)).await?
}

pub async fn verify_password(plain: String, hash: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || verify_password_sync(&plain, &hash)).await?
}

/// Runs a verification that can never succeed so an unknown email costs
/// about as much as a wrong password.
pub async fn burn_verification(plain: String) {
    let _ = tokio::task::spawn_blocking(move || {
        if let Some(hash) = dummy_hash() {
            let _ = verify_password_sync(&plain, hash);
        }
    })
    .await;
}

fn hash_password_sync(plain: &str) -> Result<String> {
    let salt = SaltString::generate(&mut rand::rngs::OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|err| anyhow!("failed to hash password: {err}"))?;

    Ok(hash.to_string())
}

fn verify_password_sync(plain: &str, hash: &str) -> Result<bool> {
    let parsed =
        PasswordHash::new(hash).map_err(|err| anyhow!("stored password hash is malformed: {err}"))?;

    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

fn dummy_hash() -> Option<&'static String> {
    static DUMMY: OnceLock<Option<String>> = OnceLock::new();
    DUMMY
        .get_or_init(|| hash_password_sync("not-a-real-account-password").ok())
        .as_ref()
}
