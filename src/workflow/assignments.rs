//! Job assignment: admin assigns an employee to a booking, the employee
//! advances the job, and the booking follows along.

use sea_orm::*;
use uuid::Uuid;

use crate::auth::authorization::Actor;
use crate::config::WorkflowConfig;
use crate::db::assignments as assignment_db;
use crate::db::bookings as booking_db;
use crate::db::employees as employee_db;
use crate::db::users as user_db;
use crate::error::{AppError, AppResult};
use crate::models::bookings::BookingStatus;
use crate::models::employees;
use crate::models::job_assignments::{
    self, AdvanceJobStatus, AssignEmployee, AssignmentOutcome, AssignmentStatus, JobDetails,
    JobImageKind, JobSummary,
};
use crate::models::users::UserStatus;

use super::identifiers;

/// Assign an employee to a PENDING booking and confirm it.
///
/// Runs as one transaction: the assignment row, the booking's move to
/// CONFIRMED and the employee's availability flag all commit together or
/// not at all.
pub async fn assign_employee(
    db: &DatabaseConnection,
    config: &WorkflowConfig,
    input: AssignEmployee,
) -> AppResult<AssignmentOutcome> {
    let txn = db.begin().await?;

    let booking = booking_db::lock_booking(&txn, input.booking_id)
        .await?
        .ok_or_else(|| AppError::not_found("Booking", input.booking_id))?;

    let employee = employees::Entity::find_by_id(input.employee_id)
        .lock_exclusive()
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::not_found("Employee", input.employee_id))?;

    if assignment_db::lock_active_for_booking(&txn, booking.id)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(
            "Booking already has an active assignment".to_string(),
        ));
    }

    if booking.status != BookingStatus::Pending {
        return Err(AppError::Conflict(format!(
            "Booking is {:?}. Only pending bookings can be assigned.",
            booking.status
        )));
    }

    let account_active = user_db::get_user_by_id(&txn, employee.user_id)
        .await?
        .is_some_and(|u| u.status == UserStatus::Active);
    let active_jobs = employee_db::count_active_assignments(&txn, employee.id).await?;

    if !account_active
        || !employee.is_available
        || active_jobs >= config.max_active_jobs_per_employee
    {
        return Err(AppError::Unavailable(format!(
            "Employee {} is not available for new jobs",
            employee.id
        )));
    }

    let inserted = job_assignments::ActiveModel {
        id: Set(Uuid::new_v4()),
        booking_id: Set(booking.id),
        employee_id: Set(employee.id),
        status: Set(AssignmentStatus::Assigned),
        assigned_at: Set(chrono::Utc::now()),
        started_at: Set(None),
        completed_at: Set(None),
        notes: Set(None),
        before_images: Set(Default::default()),
        after_images: Set(Default::default()),
    }
    .insert(&txn)
    .await;

    let assignment = match inserted {
        Ok(assignment) => assignment,
        Err(e) if identifiers::is_unique_violation(&e) => {
            return Err(AppError::Conflict(
                "Booking already has an active assignment".to_string(),
            ));
        }
        Err(e) => return Err(e.into()),
    };

    super::transition_booking(&txn, booking.id, BookingStatus::Pending, BookingStatus::Confirmed)
        .await?;

    if active_jobs + 1 >= config.max_active_jobs_per_employee {
        let result = employees::Entity::update_many()
            .set(employees::ActiveModel {
                is_available: Set(false),
                updated_at: Set(Some(chrono::Utc::now())),
                ..Default::default()
            })
            .filter(employees::Column::Id.eq(employee.id))
            .filter(employees::Column::IsAvailable.eq(true))
            .exec(&txn)
            .await?;
        if result.rows_affected != 1 {
            return Err(AppError::Conflict(format!(
                "Employee {} changed concurrently",
                employee.id
            )));
        }
    }

    let booking = booking_db::get_booking_by_id(&txn, booking.id)
        .await?
        .ok_or_else(|| AppError::not_found("Booking", input.booking_id))?;
    txn.commit().await?;

    tracing::info!(
        assignment_id = %assignment.id,
        booking_id = %booking.id,
        employee_id = %employee.id,
        "Employee assigned"
    );

    Ok(AssignmentOutcome {
        assignment,
        booking,
    })
}

/// Advance an assignment one step and move its booking with it.
///
/// `Assigned → Started` moves the booking `Confirmed → InProgress`;
/// `Started → Completed` moves it `InProgress → Completed` and frees up
/// the employee. Only the assigned employee may do this.
pub async fn advance_status(
    db: &DatabaseConnection,
    config: &WorkflowConfig,
    actor: &Actor,
    assignment_id: Uuid,
    input: AdvanceJobStatus,
) -> AppResult<AssignmentOutcome> {
    let txn = db.begin().await?;

    // Locks are taken booking first, then assignment, as cancellation does.
    let unlocked = assignment_db::get_assignment_by_id(&txn, assignment_id)
        .await?
        .ok_or_else(|| AppError::not_found("Assignment", assignment_id))?;
    let booking = booking_db::lock_booking(&txn, unlocked.booking_id)
        .await?
        .ok_or_else(|| AppError::not_found("Booking", unlocked.booking_id))?;
    let assignment = job_assignments::Entity::find_by_id(assignment_id)
        .lock_exclusive()
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::not_found("Assignment", assignment_id))?;

    ensure_assigned_employee(&txn, actor, &assignment).await?;

    let next = input.status;
    if !assignment.status.can_advance_to(next) {
        return Err(AppError::invalid_transition("assignment", assignment.status, next));
    }

    let now = chrono::Utc::now();
    let mut changes = job_assignments::ActiveModel {
        status: Set(next),
        ..Default::default()
    };
    let booking_target = match next {
        AssignmentStatus::Started => {
            changes.started_at = Set(Some(now));
            (BookingStatus::Confirmed, BookingStatus::InProgress)
        }
        _ => {
            changes.completed_at = Set(Some(now));
            (BookingStatus::InProgress, BookingStatus::Completed)
        }
    };
    if let Some(notes) = input.notes {
        changes.notes = Set(Some(notes));
    }

    if booking.status != booking_target.0 {
        return Err(AppError::invalid_transition(
            "booking",
            booking.status,
            booking_target.1,
        ));
    }

    let result = job_assignments::Entity::update_many()
        .set(changes)
        .filter(job_assignments::Column::Id.eq(assignment.id))
        .filter(job_assignments::Column::Status.eq(assignment.status))
        .exec(&txn)
        .await?;
    if result.rows_affected != 1 {
        return Err(AppError::Conflict(format!(
            "Assignment {assignment_id} changed concurrently"
        )));
    }

    super::transition_booking(&txn, booking.id, booking_target.0, booking_target.1).await?;

    if next == AssignmentStatus::Completed {
        super::refresh_availability(&txn, config, assignment.employee_id).await?;
    }

    let assignment = assignment_db::get_assignment_by_id(&txn, assignment_id)
        .await?
        .ok_or_else(|| AppError::not_found("Assignment", assignment_id))?;
    let booking = booking_db::get_booking_by_id(&txn, booking.id)
        .await?
        .ok_or_else(|| AppError::not_found("Booking", assignment.booking_id))?;
    txn.commit().await?;

    tracing::info!(
        assignment_id = %assignment.id,
        status = ?assignment.status,
        booking_status = ?booking.status,
        "Job status advanced"
    );

    Ok(AssignmentOutcome {
        assignment,
        booking,
    })
}

/// Replace the before or after image list of an assignment.
pub async fn attach_job_images(
    db: &DatabaseConnection,
    actor: &Actor,
    assignment_id: Uuid,
    kind: JobImageKind,
    images: Vec<String>,
) -> AppResult<job_assignments::Model> {
    if images.is_empty() {
        return Err(AppError::BadRequest("No images provided".to_string()));
    }

    let txn = db.begin().await?;

    let assignment = job_assignments::Entity::find_by_id(assignment_id)
        .lock_exclusive()
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::not_found("Assignment", assignment_id))?;

    ensure_assigned_employee(&txn, actor, &assignment).await?;

    let mut active: job_assignments::ActiveModel = assignment.into();
    match kind {
        JobImageKind::Before => active.before_images = Set(images.into()),
        JobImageKind::After => active.after_images = Set(images.into()),
    }
    let updated = active.update(&txn).await?;
    txn.commit().await?;

    Ok(updated)
}

/// The calling employee's jobs, newest assignment first.
pub async fn list_my_jobs(db: &DatabaseConnection, actor: &Actor) -> AppResult<Vec<JobSummary>> {
    let employee = employee_db::get_employee_by_user_id(db, actor.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Employee profile not found".to_string()))?;

    Ok(assignment_db::get_jobs_by_employee(db, employee.id).await?)
}

/// Job detail view for the assigned employee or an administrator.
pub async fn get_job_details(
    db: &DatabaseConnection,
    actor: &Actor,
    assignment_id: Uuid,
) -> AppResult<JobDetails> {
    let assignment = assignment_db::get_assignment_by_id(db, assignment_id)
        .await?
        .ok_or_else(|| AppError::not_found("Assignment", assignment_id))?;

    if !actor.is_admin() {
        ensure_assigned_employee(db, actor, &assignment).await?;
    }

    Ok(assignment_db::get_job_details(db, assignment).await?)
}

async fn ensure_assigned_employee<C: ConnectionTrait>(
    conn: &C,
    actor: &Actor,
    assignment: &job_assignments::Model,
) -> AppResult<()> {
    let employee = employee_db::get_employee_by_user_id(conn, actor.user_id).await?;
    match employee {
        Some(e) if e.id == assignment.employee_id => Ok(()),
        _ => Err(AppError::Forbidden(
            "This job is not assigned to you".to_string(),
        )),
    }
}
