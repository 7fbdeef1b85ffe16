// Pipeline stage that authenticates the caller against the resolved hospital.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;
use ward_core::{Flow, RequestContext, Role, Stage, WardError};

use crate::core::Authenticator;

/// Verifies the bearer token and attaches the caller's identity.
///
/// Must run after tenant resolution: a token is only accepted when its
/// `hospital` claim names the hospital the request resolved to.
pub struct AuthenticateStage {
    auth: Arc<Authenticator>,
    require: Option<Role>,
}

impl AuthenticateStage {
    /// Any authenticated role.
    pub fn new(auth: Arc<Authenticator>) -> Self {
        Self { auth, require: None }
    }

    pub fn require(mut self, role: Role) -> Self {
        self.require = Some(role);
        self
    }

    pub fn doctor(auth: Arc<Authenticator>) -> Self {
        Self::new(auth).require(Role::Doctor)
    }

    pub fn admin(auth: Arc<Authenticator>) -> Self {
        Self::new(auth).require(Role::Admin)
    }

    fn check(&self, ctx: &RequestContext) -> Result<ward_core::Identity, WardError> {
        let tenant = ctx.require_tenant()?;

        let token = self
            .auth
            .token_from_headers(&ctx.headers)
            .ok_or_else(Authenticator::unauthenticated)?;

        let claims = self
            .auth
            .verify_access_token(&token)
            .map_err(WardError::normalize)?;

        if claims.hospital != tenant.tenant_id {
            debug!(token_hospital = %claims.hospital, hospital = %tenant.tenant_id, "token issued for another hospital");
            return Err(WardError::unauthorized("Token was issued for another hospital"));
        }

        if let Some(required) = self.require {
            if claims.role != required {
                return Err(WardError::forbidden(format!("Requires {required} access")));
            }
        }

        Ok(claims.identity())
    }
}

#[async_trait]
impl Stage for AuthenticateStage {
    fn name(&self) -> &'static str {
        "authenticate"
    }

    async fn run(&self, mut ctx: RequestContext) -> Flow {
        match self.check(&ctx) {
            Ok(identity) => {
                debug!(user = %identity.id, role = %identity.role, "authenticated");
                ctx.identity = Some(identity);
                Flow::Continue(ctx)
            }
            Err(err) => Flow::Respond(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ward_core::{ErrorKind, Hospital, Identity, MemoryStoreFactory, TenantId, TenantRegistry};

    use crate::options::AuthOptions;

    async fn resolved(code: &str) -> RequestContext {
        let registry = TenantRegistry::new(Arc::new(MemoryStoreFactory));
        registry.provision(Hospital::new("H1", "City", "memory://h1")).await;
        registry.provision(Hospital::new("H2", "General", "memory://h2")).await;

        let mut ctx = RequestContext::new("GET", "/getPatients");
        ctx.tenant = Some(registry.resolve(code).await.unwrap());
        ctx
    }

    fn auth() -> Arc<Authenticator> {
        let mut options = AuthOptions::default();
        options.jwt.secret = Some("stage-secret".into());
        Arc::new(Authenticator::new(options).unwrap())
    }

    fn token(auth: &Authenticator, role: Role, hospital: &str) -> String {
        auth.create_access_token(&Identity {
            id: "u-1".into(),
            role,
            hospital: TenantId::from(hospital),
            email: "u@x.com".into(),
        })
        .unwrap()
    }

    fn rejected(flow: Flow) -> ErrorKind {
        match flow {
            Flow::Respond(err) => err.kind,
            Flow::Continue(_) => panic!("expected the stage to reject"),
        }
    }

    #[tokio::test]
    async fn attaches_identity_for_matching_hospital() {
        let auth = auth();
        let stage = AuthenticateStage::doctor(auth.clone());
        let ctx = resolved("H1")
            .await
            .with_header("Authorization", format!("Bearer {}", token(&auth, Role::Doctor, "H1")));

        let Flow::Continue(ctx) = stage.run(ctx).await else {
            panic!("expected continue");
        };
        assert_eq!(ctx.identity.unwrap().id, "u-1");
    }

    #[tokio::test]
    async fn missing_token_is_unauthorized() {
        let stage = AuthenticateStage::new(auth());
        assert_eq!(rejected(stage.run(resolved("H1").await).await), ErrorKind::Unauthorized);
    }

    #[tokio::test]
    async fn token_from_another_hospital_is_unauthorized() {
        let auth = auth();
        let stage = AuthenticateStage::doctor(auth.clone());
        let ctx = resolved("H2")
            .await
            .with_header("authorization", token(&auth, Role::Doctor, "H1"));
        assert_eq!(rejected(stage.run(ctx).await), ErrorKind::Unauthorized);
    }

    #[tokio::test]
    async fn wrong_role_is_forbidden() {
        let auth = auth();
        let stage = AuthenticateStage::admin(auth.clone());
        let ctx = resolved("H1")
            .await
            .with_header("authorization", format!("JWT {}", token(&auth, Role::Doctor, "H1")));
        assert_eq!(rejected(stage.run(ctx).await), ErrorKind::Forbidden);
    }

    #[tokio::test]
    async fn unresolved_tenant_is_reported_first() {
        let auth = auth();
        let stage = AuthenticateStage::new(auth.clone());
        let ctx = RequestContext::new("GET", "/getPatients")
            .with_header("authorization", token(&auth, Role::Doctor, "H1"));
        assert_eq!(rejected(stage.run(ctx).await), ErrorKind::TenantNotFound);
    }
}
