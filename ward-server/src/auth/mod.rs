use std::sync::Arc;

use anyhow::Result;
use ward_auth::Authenticator;
use ward_auth_local::{LocalStrategy, LocalStrategyOptions};
use ward_core::WardConfigSnapshot;

/// Token issuing plus one login strategy per role.
#[derive(Clone)]
pub struct Auth {
    pub authenticator: Arc<Authenticator>,
    pub doctors: Arc<LocalStrategy>,
    pub admins: Arc<LocalStrategy>,
}

pub fn strategies(config: &WardConfigSnapshot) -> Result<Auth> {
    let authenticator = Arc::new(Authenticator::from_config(config)?);

    let options = LocalStrategyOptions {
        hash_cost: config.get_u32("auth.bcrypt.cost").unwrap_or(10),
        ..Default::default()
    };

    Ok(Auth {
        doctors: Arc::new(LocalStrategy::doctors(Arc::clone(&authenticator)).with_options(options.clone())),
        admins: Arc::new(LocalStrategy::admins(Arc::clone(&authenticator)).with_options(options)),
        authenticator,
    })
}
