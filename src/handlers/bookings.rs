use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::authorization::require_role;
use crate::auth::middleware::AuthenticatedUser;
use crate::config::WorkflowConfig;
use crate::error::AppError;
use crate::models::bookings::{CreateBooking, UpdateBooking};
use crate::models::uploaded_media::AttachEnvironmentImages;
use crate::models::users::Roles;
use crate::workflow::bookings as booking_flow;

/// POST /api/bookings: a customer books a service.
pub async fn create_booking(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    workflow: web::Data<WorkflowConfig>,
    body: web::Json<CreateBooking>,
) -> Result<HttpResponse, AppError> {
    let actor = user.actor();
    require_role(&actor, &[Roles::Customer])?;

    let booking =
        booking_flow::create_booking(db.get_ref(), &workflow, &actor, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(booking))
}

/// GET /api/bookings: the caller's own bookings.
pub async fn get_my_bookings(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let actor = user.actor();
    require_role(&actor, &[Roles::Customer])?;

    let bookings = booking_flow::list_my_bookings(db.get_ref(), &actor).await?;
    Ok(HttpResponse::Ok().json(bookings))
}

/// GET /api/bookings/{id}
pub async fn get_booking(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let details = booking_flow::get_booking(db.get_ref(), &user.actor(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(details))
}

/// PUT /api/bookings/{id}: reschedule or relocate a booking that hasn't started.
pub async fn update_booking(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateBooking>,
) -> Result<HttpResponse, AppError> {
    let booking = booking_flow::update_booking(
        db.get_ref(),
        &user.actor(),
        path.into_inner(),
        body.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(booking))
}

/// DELETE /api/bookings/{id}: cancel; the booking row is kept.
pub async fn cancel_booking(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    workflow: web::Data<WorkflowConfig>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let booking =
        booking_flow::cancel_booking(db.get_ref(), &workflow, &user.actor(), path.into_inner())
            .await?;
    Ok(HttpResponse::Ok().json(booking))
}

/// POST /api/bookings/{id}/upload-images: environment photos from the customer.
pub async fn upload_images(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<AttachEnvironmentImages>,
) -> Result<HttpResponse, AppError> {
    let images = booking_flow::attach_environment_images(
        db.get_ref(),
        &user.actor(),
        path.into_inner(),
        body.into_inner().images,
    )
    .await?;
    Ok(HttpResponse::Ok().json(images))
}
