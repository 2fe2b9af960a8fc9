use anyhow::{Context, Result};

/// Hashes a password with bcrypt on the blocking pool.
pub async fn hash_password(password: String) -> Result<String> {
    hash_with_cost(password, bcrypt::DEFAULT_COST).await
}

async fn hash_with_cost(password: String, cost: u32) -> Result<String> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .context("Password hashing task failed")?
        .context("Failed to hash password")
}

/// Checks a password against a stored bcrypt hash. A malformed hash counts as a mismatch.
pub async fn verify_password(password: String, hash: String) -> Result<bool> {
    let verified = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .context("Password verification task failed")?;
    Ok(verified.unwrap_or(false))
}
