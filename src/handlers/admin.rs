use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::authorization::require_admin;
use crate::auth::middleware::AuthenticatedUser;
use crate::config::WorkflowConfig;
use crate::db::bookings as booking_db;
use crate::db::customers as customer_db;
use crate::db::employees as employee_db;
use crate::error::AppError;
use crate::models::bookings::BookingListQuery;
use crate::models::employees::{CreateEmployee, UpdateEmployee};
use crate::models::job_assignments::AssignEmployee;
use crate::workflow::assignments as assignment_flow;

/// GET /api/admin/bookings: paginated, optionally filtered by status.
/// Query params: ?status=PENDING&page=1&limit=10
pub async fn get_bookings(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    query: web::Query<BookingListQuery>,
) -> Result<HttpResponse, AppError> {
    require_admin(&user.actor())?;

    let page = booking_db::get_bookings_paginated(db.get_ref(), &query).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// GET /api/admin/customers
pub async fn get_customers(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    require_admin(&user.actor())?;

    let customers = customer_db::list_customers(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(customers))
}

/// GET /api/admin/employees
pub async fn get_employees(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    require_admin(&user.actor())?;

    let employees = employee_db::list_employees(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(employees))
}

/// POST /api/admin/employees: create the user and employee profile together.
pub async fn create_employee(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    workflow: web::Data<WorkflowConfig>,
    body: web::Json<CreateEmployee>,
) -> Result<HttpResponse, AppError> {
    require_admin(&user.actor())?;

    let employee =
        employee_db::create_employee(db.get_ref(), &workflow, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(employee))
}

/// PUT /api/admin/employees/{id}
pub async fn update_employee(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateEmployee>,
) -> Result<HttpResponse, AppError> {
    require_admin(&user.actor())?;

    let employee =
        employee_db::update_employee(db.get_ref(), path.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(employee))
}

/// DELETE /api/admin/employees/{id}: deactivate, never hard delete.
pub async fn deactivate_employee(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    require_admin(&user.actor())?;

    let id = path.into_inner();
    employee_db::deactivate_employee(db.get_ref(), id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Employee {id} deactivated"),
    })))
}

/// POST /api/admin/jobs/assign: assign an employee and confirm the booking.
pub async fn assign_job(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    workflow: web::Data<WorkflowConfig>,
    body: web::Json<AssignEmployee>,
) -> Result<HttpResponse, AppError> {
    require_admin(&user.actor())?;

    let outcome =
        assignment_flow::assign_employee(db.get_ref(), &workflow, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(outcome))
}
