// JWT claims and signing providers.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use ward_core::{Identity, Role, TenantId, WardError};

use crate::options::JwtOptions;

#[cfg(any(feature = "jwt-aws-lc-rs", feature = "jwt-rust-crypto"))]
use crate::options::JwtAlgorithm;

/// Access token payload. `hospital` binds the token to one tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: Role,
    pub hospital: TenantId,
    pub email: String,
    pub iss: String,
    pub aud: Vec<String>,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

impl Claims {
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.sub.clone(),
            role: self.role,
            hospital: self.hospital.clone(),
            email: self.email.clone(),
        }
    }
}

pub trait JwtProvider: Send + Sync {
    fn sign(&self, jwt: &JwtOptions, claims: &Claims) -> Result<String>;

    fn verify(&self, jwt: &JwtOptions, token: &str) -> Result<Claims>;
}

#[cfg(not(any(feature = "jwt-aws-lc-rs", feature = "jwt-rust-crypto")))]
pub(crate) struct NoJwtProvider;

#[cfg(not(any(feature = "jwt-aws-lc-rs", feature = "jwt-rust-crypto")))]
impl JwtProvider for NoJwtProvider {
    fn sign(&self, _jwt: &JwtOptions, _claims: &Claims) -> Result<String> {
        Err(anyhow::anyhow!(
            "JWT support is disabled (enable one of: jwt-aws-lc-rs, jwt-rust-crypto)"
        ))
    }

    fn verify(&self, _jwt: &JwtOptions, _token: &str) -> Result<Claims> {
        Err(anyhow::anyhow!(
            "JWT support is disabled (enable one of: jwt-aws-lc-rs, jwt-rust-crypto)"
        ))
    }
}

#[cfg(any(feature = "jwt-aws-lc-rs", feature = "jwt-rust-crypto"))]
pub(crate) struct JsonwebtokenProvider;

#[cfg(any(feature = "jwt-aws-lc-rs", feature = "jwt-rust-crypto"))]
impl JsonwebtokenProvider {
    fn algorithm(alg: &JwtAlgorithm) -> jsonwebtoken::Algorithm {
        match alg {
            JwtAlgorithm::HS256 => jsonwebtoken::Algorithm::HS256,
            JwtAlgorithm::HS384 => jsonwebtoken::Algorithm::HS384,
            JwtAlgorithm::HS512 => jsonwebtoken::Algorithm::HS512,
        }
    }

    fn secret(jwt: &JwtOptions) -> Result<&str> {
        jwt.secret
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| WardError::unexpected("JWT secret is not configured").into_anyhow())
    }
}

#[cfg(any(feature = "jwt-aws-lc-rs", feature = "jwt-rust-crypto"))]
impl JwtProvider for JsonwebtokenProvider {
    fn sign(&self, jwt: &JwtOptions, claims: &Claims) -> Result<String> {
        use jsonwebtoken::{encode, EncodingKey, Header};

        let secret = Self::secret(jwt)?;
        let mut header = Header::new(Self::algorithm(&jwt.algorithm));
        header.typ = Some("access".to_string());

        encode(&header, claims, &EncodingKey::from_secret(secret.as_bytes()))
            .map_err(|e| WardError::unexpected(format!("Could not sign token: {e}")).into_anyhow())
    }

    fn verify(&self, jwt: &JwtOptions, token: &str) -> Result<Claims> {
        use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
        use jsonwebtoken::{decode, DecodingKey, Validation};

        let secret = Self::secret(jwt)?;

        let mut validation = Validation::new(Self::algorithm(&jwt.algorithm));
        validation.set_issuer(&[jwt.issuer.as_str()]);
        validation.set_audience(&jwt.audience.iter().map(|s| s.as_str()).collect::<Vec<_>>());
        validation.leeway = jwt.leeway.as_secs();

        let decoded = decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
            .map_err(|e| {
                let message = match e.kind() {
                    JwtErrorKind::ExpiredSignature => "Token expired".to_string(),
                    JwtErrorKind::InvalidSignature => "Invalid token signature".to_string(),
                    _ => format!("Invalid token: {e}"),
                };
                WardError::unauthorized(message).into_anyhow()
            })?;

        Ok(decoded.claims)
    }
}
