//! Registration, profiles, the service catalog and admin listings.
//!
//! Run with: `cargo test --test catalog_and_admin_test`
mod common;

use std::sync::Arc;

use gleamy_backend::config::WorkflowConfig;
use gleamy_backend::db::bookings as booking_db;
use gleamy_backend::db::customers as customer_db;
use gleamy_backend::db::employees as employee_db;
use gleamy_backend::db::services as service_db;
use gleamy_backend::db::users as user_db;
use gleamy_backend::error::AppError;
use gleamy_backend::models::bookings::{BookingListQuery, BookingStatus};
use gleamy_backend::models::MAX_PAGE;
use gleamy_backend::models::employees::UpdateEmployee;
use gleamy_backend::models::services::{Categories, CreateService, ServiceListQuery};
use gleamy_backend::models::users::{RegisterUser, Roles, UpdateProfile, UserStatus};
use gleamy_backend::workflow::bookings as booking_flow;

use common::*;

fn catalog_entry(name: &str, category: Categories, base_price: i64) -> CreateService {
    CreateService {
        name: name.to_string(),
        category,
        description: format!("{name} description"),
        base_price,
        price_unit: "per service".to_string(),
        duration: 90,
        features: vec!["eco products".to_string()],
        image_url: None,
    }
}

#[tokio::test]
async fn test_registration_creates_customer_once() {
    let db = setup_db().await;

    let input = RegisterUser {
        display_name: Some("Dana".to_string()),
        phone_number: None,
        photo_url: None,
        address: Some("7 Oak Ave".to_string()),
        city: Some("Ogdenville".to_string()),
        postal_code: Some("12345".to_string()),
    };

    let profile = user_db::register_customer(
        &db,
        "uid-dana",
        "dana@example.com".to_string(),
        input.clone(),
    )
    .await
    .unwrap();
    assert_eq!(profile.user.role, Roles::Customer);
    assert_eq!(profile.user.status, UserStatus::Active);
    assert_eq!(profile.customer.unwrap().city.as_deref(), Some("Ogdenville"));
    assert!(profile.employee.is_none());

    let err = user_db::register_customer(&db, "uid-dana", "dana@example.com".to_string(), input)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)), "got {err:?}");
}

#[tokio::test]
async fn test_concurrent_registrations_yield_one_user_and_conflicts() {
    let db = Arc::new(setup_db().await);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let db = Arc::clone(&db);
        handles.push(tokio::spawn(async move {
            user_db::register_customer(
                &db,
                "uid-racer",
                "racer@example.com".to_string(),
                RegisterUser {
                    display_name: None,
                    phone_number: None,
                    photo_url: None,
                    address: None,
                    city: None,
                    postal_code: None,
                },
            )
            .await
        }));
    }

    let mut created = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(AppError::Conflict(_)) => {}
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }
    assert_eq!(created, 1);
}

#[tokio::test]
async fn test_profile_update_changes_default_booking_address() {
    let db = setup_db().await;
    let config = WorkflowConfig::default();
    let (profile, customer) = register_customer(&db, None).await;
    let service = create_service(&db, 4000).await;

    let user = user_db::get_user_by_id(&db, profile.user.id)
        .await
        .unwrap()
        .unwrap();
    let updated = user_db::update_profile(
        &db,
        user,
        UpdateProfile {
            phone_number: Some("555-0100".to_string()),
            address: Some("9 Pine Rd".to_string()),
            city: Some("Capital City".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.user.phone_number.as_deref(), Some("555-0100"));

    let mut request = booking_request(service.id);
    request.address = None;
    request.city = None;
    let booking = booking_flow::create_booking(&db, &config, &customer, request)
        .await
        .unwrap();
    assert_eq!(booking.address, "9 Pine Rd");
    assert_eq!(booking.city, "Capital City");
}

#[tokio::test]
async fn test_service_listing_filters_and_orders_by_name() {
    let db = setup_db().await;

    for (name, category) in [
        ("Office Cleaning", Categories::Commercial),
        ("Bathroom Sanitization", Categories::Residential),
        ("Laundry Service", Categories::Specialized),
        ("Kitchen Deep Cleaning", Categories::Residential),
    ] {
        service_db::insert_service(&db, catalog_entry(name, category, 5000))
            .await
            .unwrap();
    }

    let residential = service_db::list_services(
        &db,
        &ServiceListQuery {
            category: Some(Categories::Residential),
            is_active: None,
        },
    )
    .await
    .unwrap();
    let names: Vec<_> = residential.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Bathroom Sanitization", "Kitchen Deep Cleaning"]);

    let all = service_db::list_services(&db, &ServiceListQuery::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 4);
    assert_eq!(all[0].features.0, vec!["eco products"]);
}

#[tokio::test]
async fn test_duplicate_service_name_conflicts() {
    let db = setup_db().await;

    service_db::insert_service(
        &db,
        catalog_entry("Office Cleaning", Categories::Commercial, 12000),
    )
    .await
    .unwrap();
    let err = service_db::insert_service(
        &db,
        catalog_entry("Office Cleaning", Categories::Commercial, 9000),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)), "got {err:?}");
}

#[tokio::test]
async fn test_referenced_service_cannot_be_deleted() {
    let db = setup_db().await;
    let config = WorkflowConfig::default();
    let (_, customer) = register_customer(&db, None).await;
    let referenced = create_service(&db, 8000).await;
    let unused = create_service(&db, 3000).await;

    create_booking(&db, &config, &customer, referenced.id).await;

    let err = service_db::delete_service(&db, referenced.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)), "got {err:?}");
    assert!(service_db::get_service_by_id(&db, referenced.id)
        .await
        .unwrap()
        .is_some());

    service_db::delete_service(&db, unused.id).await.unwrap();
    assert!(service_db::get_service_by_id(&db, unused.id)
        .await
        .unwrap()
        .is_none());

    let err = service_db::delete_service(&db, unused.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "got {err:?}");
}

#[tokio::test]
async fn test_upsert_by_name_creates_then_refreshes() {
    let db = setup_db().await;

    let entry = |price| catalog_entry("Car Interior Cleaning", Categories::Specialized, price);

    let (created, was_created) = service_db::upsert_service_by_name(&db, entry(2500))
        .await
        .unwrap();
    assert!(was_created);

    let (refreshed, was_created) = service_db::upsert_service_by_name(&db, entry(2700))
        .await
        .unwrap();
    assert!(!was_created);
    assert_eq!(refreshed.id, created.id);
    assert_eq!(refreshed.base_price, 2700);
}

#[tokio::test]
async fn test_admin_booking_page_reports_total_for_filter() {
    let db = setup_db().await;
    let config = WorkflowConfig::default();
    let (_, customer) = register_customer(&db, None).await;
    let service = create_service(&db, 8000).await;

    let mut ids = Vec::new();
    for _ in 0..5 {
        ids.push(create_booking(&db, &config, &customer, service.id).await.id);
    }
    booking_flow::cancel_booking(&db, &config, &customer, ids[0])
        .await
        .unwrap();

    let page = booking_db::get_bookings_paginated(
        &db,
        &BookingListQuery {
            status: Some(BookingStatus::Pending),
            page: Some(1),
            limit: Some(3),
        },
    )
    .await
    .unwrap();
    assert_eq!(page.total, 4);
    assert_eq!(page.results, 3);
    assert_eq!(page.limit, 3);
    assert!(page.bookings.iter().all(|b| b.booking.status == BookingStatus::Pending));
    assert!(page.bookings.iter().all(|b| b.service.is_some()));

    let second = booking_db::get_bookings_paginated(
        &db,
        &BookingListQuery {
            status: Some(BookingStatus::Pending),
            page: Some(2),
            limit: Some(3),
        },
    )
    .await
    .unwrap();
    assert_eq!(second.results, 1);

    let cancelled = booking_db::get_bookings_paginated(
        &db,
        &BookingListQuery {
            status: Some(BookingStatus::Cancelled),
            page: None,
            limit: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(cancelled.total, 1);
    assert_eq!(cancelled.page, 1);
    assert_eq!(cancelled.limit, 10);
}

#[tokio::test]
async fn test_admin_booking_page_far_past_the_end_is_empty() {
    let db = setup_db().await;
    let config = WorkflowConfig::default();
    let (_, customer) = register_customer(&db, None).await;
    let service = create_service(&db, 8000).await;
    create_booking(&db, &config, &customer, service.id).await;
    create_booking(&db, &config, &customer, service.id).await;

    let page = booking_db::get_bookings_paginated(
        &db,
        &BookingListQuery {
            status: None,
            page: Some(u64::MAX),
            limit: Some(100),
        },
    )
    .await
    .unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.results, 0);
    assert!(page.bookings.is_empty());
    assert_eq!(page.page, MAX_PAGE);
    assert_eq!(page.limit, 100);
}

#[tokio::test]
async fn test_admin_people_listings_and_employee_updates() {
    let db = setup_db().await;
    let config = WorkflowConfig::default();
    register_customer(&db, None).await;
    register_customer(&db, None).await;
    let (employee, _) = create_employee(&db, &config).await;

    let customers = customer_db::list_customers(&db).await.unwrap();
    assert_eq!(customers.len(), 2);
    assert!(customers.iter().all(|c| c.user.is_some()));

    let employees = employee_db::list_employees(&db).await.unwrap();
    assert_eq!(employees.len(), 1);
    assert_eq!(
        employees[0].user.as_ref().map(|u| u.role),
        Some(Roles::Employee)
    );

    let updated = employee_db::update_employee(
        &db,
        employee.employee.id,
        UpdateEmployee {
            position: Some("Team Lead".to_string()),
            skills: Some(vec!["windows".to_string(), "carpets".to_string()]),
            experience: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.position.as_deref(), Some("Team Lead"));
    assert_eq!(updated.skills.0, vec!["windows", "carpets"]);
    assert_eq!(updated.experience, Some(2));
    assert!(updated.is_available);
}
