// Authentication options and configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use ward_core::WardConfigSnapshot;

/// JWT signing algorithms (HMAC only; tokens are verified by the issuer).
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum JwtAlgorithm {
    /// HMAC using SHA-256
    #[default]
    HS256,
    /// HMAC using SHA-384
    HS384,
    /// HMAC using SHA-512
    HS512,
}

impl std::str::FromStr for JwtAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "HS256" => Ok(Self::HS256),
            "HS384" => Ok(Self::HS384),
            "HS512" => Ok(Self::HS512),
            other => Err(format!("Unsupported JWT algorithm: {other}")),
        }
    }
}

/// JWT-specific configuration options
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct JwtOptions {
    pub algorithm: JwtAlgorithm,
    /// Token issuer (iss claim)
    pub issuer: String,
    /// Token audience (aud claim)
    pub audience: Vec<String>,
    #[serde(with = "humantime_serde")]
    pub access_token_expires_in: Duration,
    /// Clock skew tolerated when checking `exp`.
    #[serde(with = "humantime_serde")]
    pub leeway: Duration,
    /// HMAC signing secret
    pub secret: Option<String>,
}

impl Default for JwtOptions {
    fn default() -> Self {
        Self {
            algorithm: JwtAlgorithm::default(),
            issuer: "ward".to_string(),
            audience: vec!["ward-api".to_string()],
            access_token_expires_in: Duration::from_secs(86_400), // 1 day
            leeway: Duration::from_secs(0),
            secret: None,
        }
    }
}

impl JwtOptions {
    pub fn validate(&self) -> Result<(), String> {
        if self.issuer.is_empty() {
            return Err("JWT issuer cannot be empty".to_string());
        }

        if self.audience.is_empty() {
            return Err("JWT audience cannot be empty".to_string());
        }

        match self.secret.as_deref() {
            None | Some("") => return Err("HMAC algorithms require a secret".to_string()),
            Some(_) => {}
        }

        if self.access_token_expires_in.as_secs() == 0 {
            return Err("Access token expiration must be greater than 0".to_string());
        }

        Ok(())
    }
}

/// Main authentication configuration
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthOptions {
    pub jwt: JwtOptions,
    /// Header the bearer token is read from.
    pub header: String,
    /// Accepted `<scheme> <token>` prefixes; a bare token is accepted too.
    pub schemes: Vec<String>,
}

impl Default for AuthOptions {
    fn default() -> Self {
        Self {
            jwt: JwtOptions::default(),
            header: "authorization".to_string(),
            schemes: vec!["Bearer".to_string(), "JWT".to_string()],
        }
    }
}

impl AuthOptions {
    pub fn validate(&self) -> Result<(), String> {
        if self.header.trim().is_empty() {
            return Err("Authentication header name cannot be empty".to_string());
        }
        self.jwt
            .validate()
            .map_err(|e| format!("JWT validation failed: {e}"))
    }

    /// Read `auth.*` keys over the defaults.
    ///
    /// Recognised keys: `auth.jwt.secret`, `auth.jwt.issuer`,
    /// `auth.jwt.audience` (comma separated), `auth.jwt.algorithm`,
    /// `auth.jwt.expires_in` and `auth.jwt.leeway` (humantime), `auth.header`.
    pub fn from_config(config: &WardConfigSnapshot) -> Result<Self, String> {
        let mut options = Self::default();

        if let Some(secret) = config.get_string("auth.jwt.secret") {
            options.jwt.secret = Some(secret);
        }
        if let Some(issuer) = config.get_string("auth.jwt.issuer") {
            options.jwt.issuer = issuer;
        }
        let audience = config.get_list("auth.jwt.audience");
        if !audience.is_empty() {
            options.jwt.audience = audience;
        }
        if let Some(alg) = config.get("auth.jwt.algorithm") {
            options.jwt.algorithm = alg.parse()?;
        }
        if config.get("auth.jwt.expires_in").is_some() {
            options.jwt.access_token_expires_in = config
                .get_duration("auth.jwt.expires_in")
                .ok_or_else(|| "auth.jwt.expires_in is not a valid duration".to_string())?;
        }
        if config.get("auth.jwt.leeway").is_some() {
            options.jwt.leeway = config
                .get_duration("auth.jwt.leeway")
                .ok_or_else(|| "auth.jwt.leeway is not a valid duration".to_string())?;
        }
        if let Some(header) = config.get_string("auth.header") {
            options.header = header.to_ascii_lowercase();
        }

        options.validate()?;
        Ok(options)
    }
}
