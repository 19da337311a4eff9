use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use sea_orm::DatabaseConnection;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::auth::authorization::Actor;
use crate::auth::jwt::{Claims, TokenVerifier};
use crate::db::users as user_db;
use crate::error::AppError;
use crate::models::users::{self, UserStatus};

/// A caller whose token is valid, whether or not a local user exists yet.
///
/// Only registration uses this directly; every other route wants
/// [`AuthenticatedUser`].
pub struct VerifiedIdentity(pub Claims);

impl FromRequest for VerifiedIdentity {
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move { verify_bearer(&req).await.map(VerifiedIdentity) })
    }
}

/// A caller with a valid token and an ACTIVE local user.
pub struct AuthenticatedUser(pub users::Model);

impl AuthenticatedUser {
    pub fn actor(&self) -> Actor {
        Actor::new(self.0.id, self.0.role)
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let claims = verify_bearer(&req).await?;

            let db = req
                .app_data::<web::Data<DatabaseConnection>>()
                .ok_or_else(|| AppError::Internal("Database not configured".to_string()))?;

            let user = user_db::get_user_by_auth_uid(db.get_ref(), claims.auth_uid())
                .await?
                .ok_or_else(|| {
                    AppError::Unauthorized("User not found. Please register first.".to_string())
                })?;

            if user.status != UserStatus::Active {
                return Err(AppError::Forbidden("Account is not active".to_string()));
            }

            Ok(AuthenticatedUser(user))
        })
    }
}

async fn verify_bearer(req: &HttpRequest) -> Result<Claims, AppError> {
    // 1. Extract the Bearer token from the Authorization header.
    let bearer = BearerAuth::extract(req).await.map_err(|_| {
        AppError::Unauthorized("Authorization header must be: Bearer <token>".to_string())
    })?;

    // 2. Get the token verifier from app data.
    let verifier = req
        .app_data::<web::Data<Arc<TokenVerifier>>>()
        .ok_or_else(|| AppError::Internal("Token verifier not configured".to_string()))?;

    // 3. Validate the token.
    verifier.verify(bearer.token()).await.map_err(|e| {
        tracing::warn!("Rejected bearer token: {e}");
        AppError::Unauthorized("Invalid or expired token".to_string())
    })
}
