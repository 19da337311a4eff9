//! Booking lifecycle: create, update, cancel, environment images, and the
//! access-checked reads that go with them.

use sea_orm::*;
use uuid::Uuid;

use crate::auth::authorization::Actor;
use crate::config::WorkflowConfig;
use crate::db::assignments as assignment_db;
use crate::db::bookings as booking_db;
use crate::db::customers as customer_db;
use crate::db::employees as employee_db;
use crate::db::services as service_db;
use crate::error::{AppError, AppResult};
use crate::models::bookings::{
    self, BookingDetails, BookingStatus, BookingSummary, CreateBooking, PaymentStatus,
    UpdateBooking,
};
use crate::models::job_assignments::{self, AssignmentStatus};
use crate::models::uploaded_media::{self, EnvironmentImages, MediaKind, MediaUpload};
use crate::models::{StringList, customers};

use super::identifiers;

/// Create a PENDING booking for the calling customer.
///
/// Duration defaults to the service's duration, location defaults to the
/// customer's saved address, and the estimated price is a snapshot of the
/// service's current base price.
pub async fn create_booking(
    db: &DatabaseConnection,
    config: &WorkflowConfig,
    actor: &Actor,
    input: CreateBooking,
) -> AppResult<bookings::Model> {
    create_booking_with(db, config, actor, input, identifiers::booking_number).await
}

/// `create_booking` with the booking-number source supplied by the caller.
pub(crate) async fn create_booking_with(
    db: &DatabaseConnection,
    config: &WorkflowConfig,
    actor: &Actor,
    input: CreateBooking,
    mut next_number: impl FnMut() -> String,
) -> AppResult<bookings::Model> {
    let customer = customer_db::get_customer_by_user_id(db, actor.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Customer profile not found".to_string()))?;

    let service = service_db::get_service_by_id(db, input.service_id)
        .await?
        .filter(|s| s.is_active)
        .ok_or_else(|| AppError::not_found("Service", input.service_id))?;

    if input.duration.is_some_and(|d| d <= 0) {
        return Err(AppError::BadRequest("duration must be positive".to_string()));
    }
    if input.scheduled_time.trim().is_empty() {
        return Err(AppError::BadRequest("scheduled_time is required".to_string()));
    }

    let address = non_blank(input.address)
        .or_else(|| customer.address.clone())
        .ok_or_else(|| AppError::BadRequest("address is required".to_string()))?;
    let city = non_blank(input.city)
        .or_else(|| customer.city.clone())
        .ok_or_else(|| AppError::BadRequest("city is required".to_string()))?;
    let postal_code = input.postal_code.or_else(|| customer.postal_code.clone());
    let duration = input.duration.unwrap_or(service.duration);

    for attempt in 1..=config.identifier_attempts {
        let booking_number = next_number();
        if booking_db::booking_number_exists(db, &booking_number).await? {
            tracing::warn!(attempt, "Booking number already taken, retrying");
            continue;
        }

        let now = chrono::Utc::now();
        let new_booking = bookings::ActiveModel {
            id: Set(Uuid::new_v4()),
            booking_number: Set(booking_number),
            customer_id: Set(customer.id),
            service_id: Set(service.id),
            scheduled_date: Set(input.scheduled_date),
            scheduled_time: Set(input.scheduled_time.clone()),
            duration: Set(duration),
            address: Set(address.clone()),
            city: Set(city.clone()),
            postal_code: Set(postal_code.clone()),
            special_instructions: Set(input.special_instructions.clone()),
            estimated_price: Set(service.base_price),
            final_price: Set(None),
            status: Set(BookingStatus::Pending),
            payment_status: Set(PaymentStatus::Pending),
            environment_images: Set(StringList::default()),
            created_at: Set(now),
            updated_at: Set(None),
        };

        // The unique index catches a number claimed between the lookup and the insert.
        match new_booking.insert(db).await {
            Ok(booking) => {
                tracing::info!(
                    booking_id = %booking.id,
                    booking_number = %booking.booking_number,
                    "Booking created"
                );
                return Ok(booking);
            }
            Err(e) if identifiers::is_unique_violation(&e) => {
                tracing::warn!(attempt, "Booking number collided on insert, retrying");
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(AppError::Conflict(
        "Could not allocate a unique booking number".to_string(),
    ))
}

/// Partially update schedule, location or instructions of a PENDING or
/// CONFIRMED booking. Owner or admin only.
pub async fn update_booking(
    db: &DatabaseConnection,
    actor: &Actor,
    booking_id: Uuid,
    input: UpdateBooking,
) -> AppResult<bookings::Model> {
    if input.duration.is_some_and(|d| d <= 0) {
        return Err(AppError::BadRequest("duration must be positive".to_string()));
    }
    for (field, value) in [
        ("scheduled_time", &input.scheduled_time),
        ("address", &input.address),
        ("city", &input.city),
    ] {
        if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
            return Err(AppError::BadRequest(format!("{field} must not be empty")));
        }
    }

    let txn = db.begin().await?;

    let booking = booking_db::lock_booking(&txn, booking_id)
        .await?
        .ok_or_else(|| AppError::not_found("Booking", booking_id))?;

    ensure_owner_or_admin(&txn, actor, &booking).await?;

    if !booking.status.is_editable() {
        return Err(AppError::Conflict(format!(
            "Booking is {:?}. Only pending or confirmed bookings can be updated.",
            booking.status
        )));
    }

    if input.is_empty() {
        return Ok(booking);
    }

    let mut changes = bookings::ActiveModel {
        updated_at: Set(Some(chrono::Utc::now())),
        ..Default::default()
    };
    if let Some(scheduled_date) = input.scheduled_date {
        changes.scheduled_date = Set(scheduled_date);
    }
    if let Some(scheduled_time) = input.scheduled_time {
        changes.scheduled_time = Set(scheduled_time);
    }
    if let Some(duration) = input.duration {
        changes.duration = Set(duration);
    }
    if let Some(address) = input.address {
        changes.address = Set(address);
    }
    if let Some(city) = input.city {
        changes.city = Set(city);
    }
    if let Some(postal_code) = input.postal_code {
        changes.postal_code = Set(Some(postal_code));
    }
    if let Some(special_instructions) = input.special_instructions {
        changes.special_instructions = Set(Some(special_instructions));
    }

    let result = bookings::Entity::update_many()
        .set(changes)
        .filter(bookings::Column::Id.eq(booking_id))
        .filter(bookings::Column::Status.eq(booking.status))
        .exec(&txn)
        .await?;
    if result.rows_affected != 1 {
        return Err(AppError::Conflict(format!(
            "Booking {booking_id} changed concurrently; retry the update"
        )));
    }

    let updated = booking_db::get_booking_by_id(&txn, booking_id)
        .await?
        .ok_or_else(|| AppError::not_found("Booking", booking_id))?;
    txn.commit().await?;

    Ok(updated)
}

/// Cancel a PENDING or CONFIRMED booking. Owner or admin only.
///
/// An active assignment is released and its employee's availability
/// recomputed in the same transaction.
pub async fn cancel_booking(
    db: &DatabaseConnection,
    config: &WorkflowConfig,
    actor: &Actor,
    booking_id: Uuid,
) -> AppResult<bookings::Model> {
    let txn = db.begin().await?;

    let booking = booking_db::lock_booking(&txn, booking_id)
        .await?
        .ok_or_else(|| AppError::not_found("Booking", booking_id))?;

    ensure_owner_or_admin(&txn, actor, &booking).await?;

    super::transition_booking(&txn, booking_id, booking.status, BookingStatus::Cancelled).await?;

    if let Some(assignment) = assignment_db::lock_active_for_booking(&txn, booking_id).await? {
        let released = job_assignments::Entity::update_many()
            .set(job_assignments::ActiveModel {
                status: Set(AssignmentStatus::Released),
                ..Default::default()
            })
            .filter(job_assignments::Column::Id.eq(assignment.id))
            .filter(job_assignments::Column::Status.eq(assignment.status))
            .exec(&txn)
            .await?;
        if released.rows_affected != 1 {
            return Err(AppError::Conflict(format!(
                "Assignment {} changed concurrently",
                assignment.id
            )));
        }

        super::refresh_availability(&txn, config, assignment.employee_id).await?;
        tracing::info!(
            assignment_id = %assignment.id,
            employee_id = %assignment.employee_id,
            "Released assignment of cancelled booking"
        );
    }

    let cancelled = booking_db::get_booking_by_id(&txn, booking_id)
        .await?
        .ok_or_else(|| AppError::not_found("Booking", booking_id))?;
    txn.commit().await?;

    Ok(cancelled)
}

/// Append media references to the booking's environment images and record
/// one uploaded-media row per reference. Owning customer only; any status.
pub async fn attach_environment_images(
    db: &DatabaseConnection,
    actor: &Actor,
    booking_id: Uuid,
    uploads: Vec<MediaUpload>,
) -> AppResult<EnvironmentImages> {
    if uploads.is_empty() {
        return Err(AppError::BadRequest("No images provided".to_string()));
    }
    if uploads.iter().any(|u| u.reference.trim().is_empty()) {
        return Err(AppError::BadRequest("Image references must not be empty".to_string()));
    }

    let txn = db.begin().await?;

    let booking = booking_db::lock_booking(&txn, booking_id)
        .await?
        .ok_or_else(|| AppError::not_found("Booking", booking_id))?;

    if !is_owner(&txn, actor, &booking).await? {
        return Err(AppError::Forbidden(
            "Only the customer who made the booking can upload images".to_string(),
        ));
    }

    let now = chrono::Utc::now();
    let mut uploaded = Vec::with_capacity(uploads.len());
    for upload in uploads {
        let media = uploaded_media::ActiveModel {
            id: Set(Uuid::new_v4()),
            booking_id: Set(booking_id),
            kind: Set(MediaKind::from_mime_type(upload.mime_type.as_deref())),
            reference: Set(upload.reference),
            file_name: Set(upload.file_name),
            file_size: Set(upload.file_size),
            mime_type: Set(upload.mime_type),
            created_at: Set(now),
        }
        .insert(&txn)
        .await?;
        uploaded.push(media);
    }

    let mut images = booking.environment_images.clone().into_inner();
    images.extend(uploaded.iter().map(|m| m.reference.clone()));

    let mut active: bookings::ActiveModel = booking.into();
    active.environment_images = Set(images.clone().into());
    active.updated_at = Set(Some(now));
    active.update(&txn).await?;

    txn.commit().await?;

    Ok(EnvironmentImages {
        environment_images: images,
        uploaded,
    })
}

/// Booking detail view: owner, admins, and employees assigned to it.
pub async fn get_booking(
    db: &DatabaseConnection,
    actor: &Actor,
    booking_id: Uuid,
) -> AppResult<BookingDetails> {
    let booking = booking_db::get_booking_by_id(db, booking_id)
        .await?
        .ok_or_else(|| AppError::not_found("Booking", booking_id))?;

    let allowed = actor.is_admin()
        || is_owner(db, actor, &booking).await?
        || match employee_db::get_employee_by_user_id(db, actor.user_id).await? {
            Some(employee) => {
                assignment_db::employee_worked_on_booking(db, employee.id, booking.id).await?
            }
            None => false,
        };

    if !allowed {
        return Err(AppError::Forbidden(
            "You can only view bookings you are involved in".to_string(),
        ));
    }

    Ok(booking_db::get_booking_details(db, booking).await?)
}

/// The calling customer's bookings, newest first.
pub async fn list_my_bookings(
    db: &DatabaseConnection,
    actor: &Actor,
) -> AppResult<Vec<BookingSummary>> {
    let customer = customer_db::get_customer_by_user_id(db, actor.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Customer profile not found".to_string()))?;

    Ok(booking_db::get_bookings_by_customer(db, customer.id).await?)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

async fn is_owner<C: ConnectionTrait>(
    conn: &C,
    actor: &Actor,
    booking: &bookings::Model,
) -> AppResult<bool> {
    let owner = customers::Entity::find_by_id(booking.customer_id)
        .one(conn)
        .await?;
    Ok(owner.is_some_and(|c| c.user_id == actor.user_id))
}

async fn ensure_owner_or_admin<C: ConnectionTrait>(
    conn: &C,
    actor: &Actor,
    booking: &bookings::Model,
) -> AppResult<()> {
    if actor.is_admin() || is_owner(conn, actor, booking).await? {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "You can only modify your own bookings".to_string(),
        ))
    }
}
