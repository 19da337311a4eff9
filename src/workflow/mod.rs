//! Booking lifecycle and job assignment workflow.
//!
//! Every operation that touches more than one entity runs in a single
//! transaction. Rows that guard a transition are read with a row lock, and
//! every status write is conditional on the status that was read, so a
//! concurrent writer surfaces as `Conflict` instead of a lost update.

pub mod assignments;
pub mod bookings;
pub mod identifiers;

use sea_orm::*;
use uuid::Uuid;

use crate::config::WorkflowConfig;
use crate::db::employees as employee_db;
use crate::error::{AppError, AppResult};
use crate::models::bookings::{self as booking_model, BookingStatus};
use crate::models::employees;

/// Move a booking between two states, checked against the transition table.
///
/// The write only applies if the row is still in `from`.
pub(crate) async fn transition_booking<C: ConnectionTrait>(
    conn: &C,
    booking_id: Uuid,
    from: BookingStatus,
    to: BookingStatus,
) -> AppResult<()> {
    if !from.can_transition_to(to) {
        return Err(AppError::invalid_transition("booking", from, to));
    }

    let result = booking_model::Entity::update_many()
        .set(booking_model::ActiveModel {
            status: Set(to),
            updated_at: Set(Some(chrono::Utc::now())),
            ..Default::default()
        })
        .filter(booking_model::Column::Id.eq(booking_id))
        .filter(booking_model::Column::Status.eq(from))
        .exec(conn)
        .await?;

    if result.rows_affected != 1 {
        return Err(AppError::Conflict(format!(
            "Booking {booking_id} changed concurrently; expected {from:?}"
        )));
    }

    tracing::info!(booking_id = %booking_id, ?from, ?to, "Booking transitioned");
    Ok(())
}

/// Recompute an employee's availability from their active assignment count.
pub(crate) async fn refresh_availability<C: ConnectionTrait>(
    conn: &C,
    config: &WorkflowConfig,
    employee_id: Uuid,
) -> AppResult<()> {
    let active = employee_db::count_active_assignments(conn, employee_id).await?;
    let is_available = active < config.max_active_jobs_per_employee;

    employees::Entity::update_many()
        .set(employees::ActiveModel {
            is_available: Set(is_available),
            updated_at: Set(Some(chrono::Utc::now())),
            ..Default::default()
        })
        .filter(employees::Column::Id.eq(employee_id))
        .exec(conn)
        .await?;

    tracing::debug!(
        employee_id = %employee_id,
        active,
        is_available,
        "Employee availability refreshed"
    );
    Ok(())
}
