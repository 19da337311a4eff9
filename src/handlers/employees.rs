use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::authorization::require_role;
use crate::auth::middleware::AuthenticatedUser;
use crate::config::WorkflowConfig;
use crate::error::AppError;
use crate::models::job_assignments::{AdvanceJobStatus, AttachJobImages};
use crate::models::users::Roles;
use crate::workflow::assignments as assignment_flow;

/// GET /api/employees/jobs: the caller's assignments, newest first.
pub async fn get_my_jobs(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let actor = user.actor();
    require_role(&actor, &[Roles::Employee])?;

    let jobs = assignment_flow::list_my_jobs(db.get_ref(), &actor).await?;
    Ok(HttpResponse::Ok().json(jobs))
}

/// GET /api/employees/jobs/{id}
pub async fn get_job(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let actor = user.actor();
    require_role(&actor, &[Roles::Employee, Roles::Admin, Roles::SuperAdmin])?;

    let job = assignment_flow::get_job_details(db.get_ref(), &actor, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(job))
}

/// PUT /api/employees/jobs/{id}/status: start or complete a job.
pub async fn update_job_status(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    workflow: web::Data<WorkflowConfig>,
    path: web::Path<Uuid>,
    body: web::Json<AdvanceJobStatus>,
) -> Result<HttpResponse, AppError> {
    let actor = user.actor();
    require_role(&actor, &[Roles::Employee])?;

    let outcome = assignment_flow::advance_status(
        db.get_ref(),
        &workflow,
        &actor,
        path.into_inner(),
        body.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(outcome))
}

/// POST /api/employees/jobs/{id}/upload-images: replace before or after photos.
pub async fn upload_job_images(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<AttachJobImages>,
) -> Result<HttpResponse, AppError> {
    let actor = user.actor();
    require_role(&actor, &[Roles::Employee])?;

    let body = body.into_inner();
    let assignment = assignment_flow::attach_job_images(
        db.get_ref(),
        &actor,
        path.into_inner(),
        body.kind,
        body.images,
    )
    .await?;
    Ok(HttpResponse::Ok().json(assignment))
}
