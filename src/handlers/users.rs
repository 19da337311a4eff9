use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;

use crate::auth::middleware::AuthenticatedUser;
use crate::db::employees as employee_db;
use crate::db::users as user_db;
use crate::error::AppError;
use crate::models::users::{UpdateProfile, UserStatus};

/// GET /api/users/profile
pub async fn get_profile(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let profile = user_db::get_profile(db.get_ref(), user.0).await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// PUT /api/users/profile: contact details, plus the default address for customers.
pub async fn update_profile(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<UpdateProfile>,
) -> Result<HttpResponse, AppError> {
    let profile = user_db::update_profile(db.get_ref(), user.0, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// DELETE /api/users/account: deactivate the caller's account.
///
/// Employees holding active jobs are refused, same as an admin deactivation.
pub async fn deactivate_account(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let user_id = user.0.id;

    match employee_db::get_employee_by_user_id(db.get_ref(), user_id).await? {
        Some(employee) => employee_db::deactivate_employee(db.get_ref(), employee.id).await?,
        None => {
            user_db::set_user_status(db.get_ref(), user_id, UserStatus::Inactive).await?;
        }
    }

    tracing::info!(user_id = %user_id, "Account deactivated");
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Account deactivated",
    })))
}
