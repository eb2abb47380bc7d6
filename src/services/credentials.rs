//! One-way password hashing and verification.

use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use async_trait::async_trait;
use tokio::task;

use crate::config::SecurityConfig;

/// Hashes raw passwords and checks them against stored hashes.
#[async_trait]
pub trait PasswordEncoder: Send + Sync {
    /// Produces a salted, self-describing hash of `raw`.
    async fn encode(&self, raw: &str) -> Result<String>;

    /// Returns `true` when `raw` matches `hash`. A malformed hash is an error.
    async fn matches(&self, raw: &str, hash: &str) -> Result<bool>;
}

/// Argon2id encoder. Hashing runs on the blocking pool since it is
/// deliberately CPU and memory heavy.
pub struct Argon2PasswordEncoder {
    config: SecurityConfig,
}

impl Argon2PasswordEncoder {
    #[must_use]
    pub const fn new(config: SecurityConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl PasswordEncoder for Argon2PasswordEncoder {
    async fn encode(&self, raw: &str) -> Result<String> {
        let password = raw.to_string();
        let config = self.config.clone();

        task::spawn_blocking(move || hash_password(&password, &config))
            .await
            .context("Password hashing task panicked")?
    }

    async fn matches(&self, raw: &str, hash: &str) -> Result<bool> {
        let password = raw.to_string();
        let password_hash = hash.to_string();

        task::spawn_blocking(move || verify_password(&password, &password_hash))
            .await
            .context("Password verification task panicked")?
    }
}

/// Hash a password using Argon2id with the configured cost parameters.
pub fn hash_password(password: &str, config: &SecurityConfig) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let params = Params::new(
        config.argon2_memory_cost_kib,
        config.argon2_time_cost,
        config.argon2_parallelism,
        None,
    )
    .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

/// Verify against a PHC string; the cost parameters are read from the hash.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
