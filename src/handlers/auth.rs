use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;

use crate::auth::middleware::{AuthenticatedUser, VerifiedIdentity};
use crate::db::users as user_db;
use crate::error::AppError;
use crate::models::users::RegisterUser;

/// POST /api/auth/register: create the caller's customer account after first sign-in.
///
/// Email and, when the body leaves them out, display name and photo come
/// from the verified token.
pub async fn register(
    identity: VerifiedIdentity,
    db: web::Data<DatabaseConnection>,
    body: web::Json<RegisterUser>,
) -> Result<HttpResponse, AppError> {
    let claims = identity.0;
    let email = claims
        .user_email()
        .ok_or_else(|| AppError::BadRequest("Token carries no email address".to_string()))?;

    let mut input = body.into_inner();
    input.display_name = input.display_name.or_else(|| claims.display_name());
    input.photo_url = input.photo_url.or_else(|| claims.photo_url());

    let profile = user_db::register_customer(db.get_ref(), claims.auth_uid(), email, input).await?;
    Ok(HttpResponse::Created().json(profile))
}

/// GET /api/auth/me: the current user with their customer or employee profile.
pub async fn me(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let profile = user_db::get_profile(db.get_ref(), user.0).await?;
    Ok(HttpResponse::Ok().json(profile))
}
