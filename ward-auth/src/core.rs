// Authentication core.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use uuid::Uuid;
use ward_core::{Identity, WardConfigSnapshot, WardError};

use crate::jwt::{Claims, JwtProvider};
use crate::options::AuthOptions;

/// Pull a token out of an authorization header value.
///
/// Accepts `<scheme> <token>` for any allowed scheme, or a bare token.
/// An unknown scheme is treated as no token at all.
pub fn extract_bearer_token(value: &str, schemes: &[String]) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Some((scheme, token)) = value.split_once(' ') {
        let token = token.trim();
        if token.is_empty() {
            return None;
        }
        let allowed = schemes.iter().any(|s| s.eq_ignore_ascii_case(scheme.trim()));
        return allowed.then(|| token.to_string());
    }

    // A scheme with nothing after it.
    if schemes.iter().any(|s| s.eq_ignore_ascii_case(value)) {
        return None;
    }

    Some(value.to_string())
}

/// Issues and verifies hospital-bound access tokens.
pub struct Authenticator {
    options: AuthOptions,
    jwt: Arc<dyn JwtProvider>,
}

impl Authenticator {
    pub fn new(options: AuthOptions) -> Result<Self> {
        options
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid authentication options: {e}"))?;

        let jwt: Arc<dyn JwtProvider> = {
            #[cfg(any(feature = "jwt-aws-lc-rs", feature = "jwt-rust-crypto"))]
            {
                Arc::new(crate::jwt::JsonwebtokenProvider)
            }
            #[cfg(not(any(feature = "jwt-aws-lc-rs", feature = "jwt-rust-crypto")))]
            {
                Arc::new(crate::jwt::NoJwtProvider)
            }
        };

        Ok(Self { options, jwt })
    }

    pub fn from_config(config: &WardConfigSnapshot) -> Result<Self> {
        let options = AuthOptions::from_config(config).map_err(|e| anyhow::anyhow!(e))?;
        Self::new(options)
    }

    pub fn options(&self) -> &AuthOptions {
        &self.options
    }

    /// Claims for `identity`, valid from now for the configured lifetime.
    pub fn claims_for(&self, identity: &Identity) -> Claims {
        let jwt = &self.options.jwt;
        let now = Utc::now().timestamp();
        Claims {
            sub: identity.id.clone(),
            role: identity.role,
            hospital: identity.hospital.clone(),
            email: identity.email.clone(),
            iss: jwt.issuer.clone(),
            aud: jwt.audience.clone(),
            iat: now,
            exp: now + jwt.access_token_expires_in.as_secs() as i64,
            jti: Uuid::new_v4().to_string(),
        }
    }

    pub fn create_access_token(&self, identity: &Identity) -> Result<String> {
        self.sign(&self.claims_for(identity))
    }

    pub fn sign(&self, claims: &Claims) -> Result<String> {
        self.jwt.sign(&self.options.jwt, claims)
    }

    /// Verify signature, issuer, audience and expiry.
    pub fn verify_access_token(&self, token: &str) -> Result<Claims> {
        self.jwt.verify(&self.options.jwt, token)
    }

    /// Token from the configured header, if any.
    pub fn token_from_headers(&self, headers: &HashMap<String, String>) -> Option<String> {
        headers
            .get(&self.options.header.to_ascii_lowercase())
            .and_then(|v| extract_bearer_token(v, &self.options.schemes))
    }

    pub fn unauthenticated() -> WardError {
        WardError::unauthorized("Not authenticated")
    }
}
