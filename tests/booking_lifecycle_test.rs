//! Booking lifecycle against an in-memory database.
//!
//! Run with: `cargo test --test booking_lifecycle_test`
mod common;

use std::collections::HashSet;
use std::sync::Arc;

use sea_orm::{EntityTrait, PaginatorTrait};

use gleamy_backend::config::WorkflowConfig;
use gleamy_backend::db::bookings as booking_db;
use gleamy_backend::db::employees as employee_db;
use gleamy_backend::db::services as service_db;
use gleamy_backend::error::AppError;
use gleamy_backend::models::bookings::{BookingStatus, PaymentStatus, UpdateBooking};
use gleamy_backend::models::job_assignments::{
    self, AdvanceJobStatus, AssignEmployee, AssignmentStatus,
};
use gleamy_backend::models::services::UpdateService;
use gleamy_backend::models::uploaded_media::{self, MediaKind, MediaUpload};
use gleamy_backend::workflow::assignments as assignment_flow;
use gleamy_backend::workflow::bookings as booking_flow;

use common::*;

fn upload(reference: &str, mime_type: &str) -> MediaUpload {
    MediaUpload {
        reference: reference.to_string(),
        file_name: Some(format!("{reference}.bin")),
        file_size: Some(1024),
        mime_type: Some(mime_type.to_string()),
    }
}

#[tokio::test]
async fn test_create_booking_starts_pending_with_price_snapshot() {
    let db = setup_db().await;
    let config = WorkflowConfig::default();
    let (_, customer) = register_customer(&db, Some("42 Elm St")).await;
    let service = create_service(&db, 8000).await;

    let mut request = booking_request(service.id);
    request.address = None;
    request.city = None;
    let booking = booking_flow::create_booking(&db, &config, &customer, request)
        .await
        .unwrap();

    assert_eq!(booking.status, BookingStatus::Pending);
    assert_eq!(booking.payment_status, PaymentStatus::Pending);
    assert_eq!(booking.estimated_price, 8000);
    assert_eq!(booking.final_price, None);
    assert_eq!(booking.duration, service.duration);
    assert_eq!(booking.address, "42 Elm St");
    assert_eq!(booking.city, "Springfield");
    assert!(booking.booking_number.starts_with("GLM-"));
    assert!(booking.environment_images.0.is_empty());
}

#[tokio::test]
async fn test_price_snapshot_survives_service_price_change() {
    let db = setup_db().await;
    let config = WorkflowConfig::default();
    let (_, customer) = register_customer(&db, None).await;
    let service = create_service(&db, 8000).await;

    let booking = create_booking(&db, &config, &customer, service.id).await;

    service_db::update_service(
        &db,
        service.id,
        UpdateService {
            base_price: Some(9500),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let admin = create_admin(&db).await;
    let details = booking_flow::get_booking(&db, &admin, booking.id).await.unwrap();
    assert_eq!(details.booking.estimated_price, 8000);
    assert_eq!(details.service.unwrap().base_price, 9500);
}

#[tokio::test]
async fn test_create_booking_without_known_address_is_rejected() {
    let db = setup_db().await;
    let (_, customer) = register_customer(&db, None).await;
    let service = create_service(&db, 8000).await;

    let mut request = booking_request(service.id);
    request.address = None;

    let err = booking_flow::create_booking(&db, &WorkflowConfig::default(), &customer, request)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)), "got {err:?}");
}

#[tokio::test]
async fn test_create_booking_for_inactive_or_missing_service_is_not_found() {
    let db = setup_db().await;
    let config = WorkflowConfig::default();
    let (_, customer) = register_customer(&db, None).await;
    let service = create_service(&db, 8000).await;

    service_db::update_service(
        &db,
        service.id,
        UpdateService {
            is_active: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let err = booking_flow::create_booking(&db, &config, &customer, booking_request(service.id))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "got {err:?}");

    let err = booking_flow::create_booking(
        &db,
        &config,
        &customer,
        booking_request(uuid::Uuid::new_v4()),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "got {err:?}");
}

#[tokio::test]
async fn test_caller_without_customer_profile_cannot_book() {
    let db = setup_db().await;
    let admin = create_admin(&db).await;
    let service = create_service(&db, 8000).await;

    let err = booking_flow::create_booking(
        &db,
        &WorkflowConfig::default(),
        &admin,
        booking_request(service.id),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "got {err:?}");
}

#[tokio::test]
async fn test_concurrent_creations_get_distinct_booking_numbers() {
    let db = Arc::new(setup_db().await);
    let config = WorkflowConfig::default();
    let (_, customer) = register_customer(&db, None).await;
    let service = create_service(&db, 8000).await;

    let handles: Vec<_> = (0..20)
        .map(|_| {
            let db = Arc::clone(&db);
            let request = booking_request(service.id);
            tokio::spawn(async move {
                booking_flow::create_booking(&db, &config, &customer, request).await
            })
        })
        .collect();

    let mut numbers = HashSet::new();
    for handle in handles {
        let booking = handle.await.unwrap().unwrap();
        assert!(numbers.insert(booking.booking_number));
    }
    assert_eq!(numbers.len(), 20);

    let mine = booking_flow::list_my_bookings(&db, &customer).await.unwrap();
    assert_eq!(mine.len(), 20);
}

#[tokio::test]
async fn test_owner_updates_schedule_but_strangers_cannot() {
    let db = setup_db().await;
    let config = WorkflowConfig::default();
    let (_, customer) = register_customer(&db, None).await;
    let (_, stranger) = register_customer(&db, None).await;
    let service = create_service(&db, 8000).await;
    let booking = create_booking(&db, &config, &customer, service.id).await;

    let update = UpdateBooking {
        scheduled_time: Some("14:30".to_string()),
        special_instructions: Some("Ring twice".to_string()),
        ..Default::default()
    };

    let err = booking_flow::update_booking(&db, &stranger, booking.id, update.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)), "got {err:?}");

    let updated = booking_flow::update_booking(&db, &customer, booking.id, update)
        .await
        .unwrap();
    assert_eq!(updated.scheduled_time, "14:30");
    assert_eq!(updated.special_instructions.as_deref(), Some("Ring twice"));
    assert_eq!(updated.status, BookingStatus::Pending);
    assert_eq!(updated.estimated_price, booking.estimated_price);
    assert_eq!(updated.booking_number, booking.booking_number);
}

#[tokio::test]
async fn test_update_rejects_blank_time_or_location() {
    let db = setup_db().await;
    let config = WorkflowConfig::default();
    let (_, customer) = register_customer(&db, None).await;
    let service = create_service(&db, 8000).await;
    let booking = create_booking(&db, &config, &customer, service.id).await;

    let blanks = [
        UpdateBooking {
            scheduled_time: Some("   ".to_string()),
            address: Some(String::new()),
            city: Some(String::new()),
            ..Default::default()
        },
        UpdateBooking {
            scheduled_time: Some(" ".to_string()),
            ..Default::default()
        },
        UpdateBooking {
            address: Some("\t".to_string()),
            special_instructions: Some("Back door".to_string()),
            ..Default::default()
        },
        UpdateBooking {
            city: Some(String::new()),
            ..Default::default()
        },
    ];
    for update in blanks {
        let err = booking_flow::update_booking(&db, &customer, booking.id, update)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)), "got {err:?}");
    }

    let stored = booking_db::get_booking_by_id(&db, booking.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.scheduled_time, "10:00");
    assert_eq!(stored.address, "1 Main St");
    assert_eq!(stored.city, "Springfield");
    assert!(stored.special_instructions.is_none());
    assert!(stored.updated_at.is_none());
}

#[tokio::test]
async fn test_admin_can_update_and_cancel_any_booking() {
    let db = setup_db().await;
    let config = WorkflowConfig::default();
    let (_, customer) = register_customer(&db, None).await;
    let admin = create_admin(&db).await;
    let service = create_service(&db, 8000).await;
    let booking = create_booking(&db, &config, &customer, service.id).await;

    let updated = booking_flow::update_booking(
        &db,
        &admin,
        booking.id,
        UpdateBooking {
            city: Some("Shelbyville".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.city, "Shelbyville");

    let cancelled = booking_flow::cancel_booking(&db, &config, &admin, booking.id)
        .await
        .unwrap();
    assert_eq!(cancelled.status, BookingStatus::Cancelled);
}

#[tokio::test]
async fn test_cancel_pending_then_again_is_invalid() {
    let db = setup_db().await;
    let config = WorkflowConfig::default();
    let (_, customer) = register_customer(&db, None).await;
    let service = create_service(&db, 8000).await;
    let booking = create_booking(&db, &config, &customer, service.id).await;

    let cancelled = booking_flow::cancel_booking(&db, &config, &customer, booking.id)
        .await
        .unwrap();
    assert_eq!(cancelled.status, BookingStatus::Cancelled);

    let err = booking_flow::cancel_booking(&db, &config, &customer, booking.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition { .. }), "got {err:?}");

    let err = booking_flow::update_booking(
        &db,
        &customer,
        booking.id,
        UpdateBooking {
            scheduled_time: Some("09:00".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)), "got {err:?}");
}

#[tokio::test]
async fn test_cancel_confirmed_booking_releases_assignment() {
    let db = setup_db().await;
    let config = WorkflowConfig::default();
    let (_, customer) = register_customer(&db, None).await;
    let (employee, _) = create_employee(&db, &config).await;
    let service = create_service(&db, 8000).await;
    let booking = create_booking(&db, &config, &customer, service.id).await;

    let outcome = assignment_flow::assign_employee(
        &db,
        &config,
        AssignEmployee {
            booking_id: booking.id,
            employee_id: employee.employee.id,
        },
    )
    .await
    .unwrap();
    assert_eq!(outcome.booking.status, BookingStatus::Confirmed);
    let busy = employee_db::get_employee_by_id(&db, employee.employee.id)
        .await
        .unwrap()
        .unwrap();
    assert!(!busy.is_available);

    let cancelled = booking_flow::cancel_booking(&db, &config, &customer, booking.id)
        .await
        .unwrap();
    assert_eq!(cancelled.status, BookingStatus::Cancelled);

    let assignment = job_assignments::Entity::find_by_id(outcome.assignment.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(assignment.status, AssignmentStatus::Released);

    let freed = employee_db::get_employee_by_id(&db, employee.employee.id)
        .await
        .unwrap()
        .unwrap();
    assert!(freed.is_available);
    assert_eq!(
        employee_db::count_active_assignments(&db, employee.employee.id)
            .await
            .unwrap(),
        0
    );
}

#[tokio::test]
async fn test_cancel_in_progress_booking_changes_nothing() {
    let db = setup_db().await;
    let config = WorkflowConfig::default();
    let (_, customer) = register_customer(&db, None).await;
    let (employee, employee_actor) = create_employee(&db, &config).await;
    let service = create_service(&db, 8000).await;
    let booking = create_booking(&db, &config, &customer, service.id).await;

    let outcome = assignment_flow::assign_employee(
        &db,
        &config,
        AssignEmployee {
            booking_id: booking.id,
            employee_id: employee.employee.id,
        },
    )
    .await
    .unwrap();
    assignment_flow::advance_status(
        &db,
        &config,
        &employee_actor,
        outcome.assignment.id,
        AdvanceJobStatus {
            status: AssignmentStatus::Started,
            notes: None,
        },
    )
    .await
    .unwrap();

    let err = booking_flow::cancel_booking(&db, &config, &customer, booking.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition { .. }), "got {err:?}");

    let details = booking_flow::get_booking(&db, &customer, booking.id).await.unwrap();
    assert_eq!(details.booking.status, BookingStatus::InProgress);
    assert_eq!(details.assignments.len(), 1);
    assert_eq!(details.assignments[0].assignment.status, AssignmentStatus::Started);
}

#[tokio::test]
async fn test_booking_views_name_customer_and_assigned_employee() {
    let db = setup_db().await;
    let config = WorkflowConfig::default();
    let (profile, customer) = register_customer(&db, None).await;
    let (employee, _) = create_employee(&db, &config).await;
    let admin = create_admin(&db).await;
    let service = create_service(&db, 8000).await;
    let booking = create_booking(&db, &config, &customer, service.id).await;
    let unassigned = create_booking(&db, &config, &customer, service.id).await;

    assignment_flow::assign_employee(
        &db,
        &config,
        AssignEmployee {
            booking_id: booking.id,
            employee_id: employee.employee.id,
        },
    )
    .await
    .unwrap();

    let details = booking_flow::get_booking(&db, &admin, booking.id).await.unwrap();
    let owner = details.customer.expect("customer");
    assert_eq!(owner.customer.user_id, profile.user.id);
    assert_eq!(owner.user.map(|u| u.email), Some(profile.user.email.clone()));

    let assigned = details.assignments[0].employee.as_ref().expect("employee");
    assert_eq!(assigned.employee.id, employee.employee.id);
    assert_eq!(
        assigned.user.as_ref().map(|u| u.id),
        employee.user.as_ref().map(|u| u.id)
    );

    let mine = booking_flow::list_my_bookings(&db, &customer).await.unwrap();
    assert_eq!(mine.len(), 2);
    for summary in &mine {
        let owner = summary.customer.as_ref().expect("customer");
        assert_eq!(owner.user.as_ref().map(|u| u.id), Some(profile.user.id));
        if summary.booking.id == unassigned.id {
            assert!(summary.assignments.is_empty());
        } else {
            assert_eq!(summary.assignments.len(), 1);
            let held_by = summary.assignments[0].employee.as_ref().expect("employee");
            assert_eq!(held_by.employee.id, employee.employee.id);
            assert!(held_by.user.is_some());
        }
    }
}

#[tokio::test]
async fn test_environment_images_append_in_order_and_record_media() {
    let db = setup_db().await;
    let config = WorkflowConfig::default();
    let (_, customer) = register_customer(&db, None).await;
    let service = create_service(&db, 8000).await;
    let booking = create_booking(&db, &config, &customer, service.id).await;

    booking_flow::attach_environment_images(
        &db,
        &customer,
        booking.id,
        vec![upload("img-1", "image/png"), upload("clip-1", "video/mp4")],
    )
    .await
    .unwrap();
    let second = booking_flow::attach_environment_images(
        &db,
        &customer,
        booking.id,
        vec![upload("img-1", "image/jpeg")],
    )
    .await
    .unwrap();

    assert_eq!(second.environment_images, vec!["img-1", "clip-1", "img-1"]);
    assert_eq!(second.uploaded.len(), 1);

    let media = uploaded_media::Entity::find().all(&db).await.unwrap();
    assert_eq!(media.len(), 3);
    assert_eq!(
        media.iter().filter(|m| m.kind == MediaKind::Video).count(),
        1
    );

    let details = booking_flow::get_booking(&db, &customer, booking.id).await.unwrap();
    assert_eq!(details.booking.status, BookingStatus::Pending);
    assert_eq!(details.uploaded_media.len(), 3);
}

#[tokio::test]
async fn test_environment_images_are_owner_only() {
    let db = setup_db().await;
    let config = WorkflowConfig::default();
    let (_, customer) = register_customer(&db, None).await;
    let admin = create_admin(&db).await;
    let service = create_service(&db, 8000).await;
    let booking = create_booking(&db, &config, &customer, service.id).await;

    let err = booking_flow::attach_environment_images(
        &db,
        &admin,
        booking.id,
        vec![upload("img-1", "image/png")],
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)), "got {err:?}");

    let err = booking_flow::attach_environment_images(&db, &customer, booking.id, vec![])
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)), "got {err:?}");

    assert_eq!(uploaded_media::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_booking_visibility() {
    let db = setup_db().await;
    let config = WorkflowConfig::default();
    let (_, customer) = register_customer(&db, None).await;
    let (_, stranger) = register_customer(&db, None).await;
    let admin = create_admin(&db).await;
    let (employee, employee_actor) = create_employee(&db, &config).await;
    let (_, other_employee) = create_employee(&db, &config).await;
    let service = create_service(&db, 8000).await;
    let booking = create_booking(&db, &config, &customer, service.id).await;

    assignment_flow::assign_employee(
        &db,
        &config,
        AssignEmployee {
            booking_id: booking.id,
            employee_id: employee.employee.id,
        },
    )
    .await
    .unwrap();

    for allowed in [&customer, &admin, &employee_actor] {
        let details = booking_flow::get_booking(&db, allowed, booking.id).await.unwrap();
        assert_eq!(details.booking.id, booking.id);
    }

    for denied in [&stranger, &other_employee] {
        let err = booking_flow::get_booking(&db, denied, booking.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)), "got {err:?}");
    }

    let err = booking_flow::get_booking(&db, &admin, uuid::Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "got {err:?}");
}
