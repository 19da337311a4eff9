use sea_orm::*;
use uuid::Uuid;

use crate::models::job_assignments::{self, AssignmentStatus, JobDetails, JobSummary};
use crate::db::bookings::with_customer_users;
use crate::models::{bookings, customers, services, uploaded_media};

/// Fetch a single job assignment by ID.
pub async fn get_assignment_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<job_assignments::Model>, DbErr> {
    job_assignments::Entity::find_by_id(id).one(db).await
}

/// The booking's assigned or started assignment, if any, locked for update.
pub async fn lock_active_for_booking<C: ConnectionTrait>(
    db: &C,
    booking_id: Uuid,
) -> Result<Option<job_assignments::Model>, DbErr> {
    job_assignments::Entity::find()
        .filter(job_assignments::Column::BookingId.eq(booking_id))
        .filter(job_assignments::Column::Status.is_in(AssignmentStatus::active()))
        .lock_exclusive()
        .one(db)
        .await
}

/// Whether the employee holds any assignment (of any status) on the booking.
pub async fn employee_worked_on_booking(
    db: &DatabaseConnection,
    employee_id: Uuid,
    booking_id: Uuid,
) -> Result<bool, DbErr> {
    let count = job_assignments::Entity::find()
        .filter(job_assignments::Column::EmployeeId.eq(employee_id))
        .filter(job_assignments::Column::BookingId.eq(booking_id))
        .count(db)
        .await?;
    Ok(count > 0)
}

/// An employee's assignments, newest first, each with its booking.
pub async fn get_jobs_by_employee(
    db: &DatabaseConnection,
    employee_id: Uuid,
) -> Result<Vec<JobSummary>, DbErr> {
    let rows = job_assignments::Entity::find()
        .filter(job_assignments::Column::EmployeeId.eq(employee_id))
        .order_by_desc(job_assignments::Column::AssignedAt)
        .all(db)
        .await?;

    let bookings = rows.load_one(bookings::Entity, db).await?;

    Ok(rows
        .into_iter()
        .zip(bookings)
        .map(|(assignment, booking)| JobSummary {
            assignment,
            booking,
        })
        .collect())
}

/// Assignment with booking, customer, service and uploaded media.
pub async fn get_job_details(
    db: &DatabaseConnection,
    assignment: job_assignments::Model,
) -> Result<JobDetails, DbErr> {
    let booking = assignment
        .find_related(bookings::Entity)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("Booking not found".to_string()))?;
    let customer = booking.find_related(customers::Entity).one(db).await?;
    let customer = with_customer_users(db, vec![customer])
        .await?
        .into_iter()
        .next()
        .flatten();
    let service = booking.find_related(services::Entity).one(db).await?;
    let uploaded_media = booking
        .find_related(uploaded_media::Entity)
        .order_by_asc(uploaded_media::Column::CreatedAt)
        .all(db)
        .await?;

    Ok(JobDetails {
        assignment,
        booking,
        customer,
        service,
        uploaded_media,
    })
}
