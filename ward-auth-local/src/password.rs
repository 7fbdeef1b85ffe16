// Password hashing.

use anyhow::Result;
use ward_core::WardError;

/// bcrypt hashing run off the async workers.
#[derive(Clone, Copy, Debug)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self { cost: bcrypt::DEFAULT_COST }
    }
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub async fn hash(&self, password: &str) -> Result<String> {
        let password = password.to_string();
        let cost = self.cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| WardError::unexpected(format!("Hashing task failed: {e}")).into_anyhow())?
            .map_err(|e| WardError::unexpected(format!("Could not hash password: {e}")).into_anyhow())
    }

    /// `Ok(false)` for a wrong password or a malformed stored hash.
    pub async fn verify(&self, password: &str, hash: &str) -> Result<bool> {
        let password = password.to_string();
        let hash = hash.to_string();
        let matched = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| WardError::unexpected(format!("Hashing task failed: {e}")).into_anyhow())?;

        Ok(matched.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "stored password hash could not be checked");
            false
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_then_verify() {
        let hasher = PasswordHasher::new(4);
        let hash = hasher.hash("hunter2").await.unwrap();

        assert_ne!(hash, "hunter2");
        assert!(hasher.verify("hunter2", &hash).await.unwrap());
        assert!(!hasher.verify("hunter3", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn malformed_hash_never_matches() {
        let hasher = PasswordHasher::new(4);
        assert!(!hasher.verify("x", "not-a-bcrypt-hash").await.unwrap());
    }
}
