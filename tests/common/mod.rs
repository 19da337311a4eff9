//! Shared fixtures for the integration tests.
//!
//! Every test gets its own in-memory SQLite database with the full
//! migration set applied. The pool holds a single connection, so a test
//! must never touch `db` while it has a transaction open.
#![allow(dead_code)]

use chrono::NaiveDate;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use uuid::Uuid;

use gleamy_backend::auth::authorization::Actor;
use gleamy_backend::config::WorkflowConfig;
use gleamy_backend::db::employees as employee_db;
use gleamy_backend::db::services as service_db;
use gleamy_backend::db::users as user_db;
use gleamy_backend::models::bookings::{self, CreateBooking};
use gleamy_backend::models::employees::{CreateEmployee, EmployeeWithUser};
use gleamy_backend::models::services::{self, Categories, CreateService};
use gleamy_backend::models::users::{self, RegisterUser, Roles, UserProfileResponse, UserStatus};
use gleamy_backend::workflow::bookings as booking_flow;
use migration::{Migrator, MigratorTrait};

pub async fn setup_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(opts)
        .await
        .expect("Failed to open in-memory SQLite");
    Migrator::up(&db, None).await.expect("Migrations failed");
    db
}

pub fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

pub fn actor_of(user: &users::Model) -> Actor {
    Actor::new(user.id, user.role)
}

pub fn scheduled_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 11, 20).expect("valid date")
}

/// Registers a customer; `address` also sets the city so bookings can default both.
pub async fn register_customer(
    db: &DatabaseConnection,
    address: Option<&str>,
) -> (UserProfileResponse, Actor) {
    let uid = unique("customer");
    let profile = user_db::register_customer(
        db,
        &uid,
        format!("{uid}@example.com"),
        RegisterUser {
            display_name: Some("Test Customer".to_string()),
            phone_number: None,
            photo_url: None,
            address: address.map(str::to_string),
            city: address.map(|_| "Springfield".to_string()),
            postal_code: None,
        },
    )
    .await
    .expect("register customer");

    let actor = Actor::new(profile.user.id, profile.user.role);
    (profile, actor)
}

pub async fn create_admin(db: &DatabaseConnection) -> Actor {
    let uid = unique("admin");
    let user = users::ActiveModel {
        id: Set(Uuid::new_v4()),
        auth_uid: Set(uid.clone()),
        email: Set(format!("{uid}@example.com")),
        display_name: Set(Some("Admin".to_string())),
        phone_number: Set(None),
        photo_url: Set(None),
        role: Set(Roles::Admin),
        status: Set(UserStatus::Active),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
    }
    .insert(db)
    .await
    .expect("insert admin");

    actor_of(&user)
}

pub async fn create_employee(
    db: &DatabaseConnection,
    config: &WorkflowConfig,
) -> (EmployeeWithUser, Actor) {
    let uid = unique("employee");
    let employee = employee_db::create_employee(
        db,
        config,
        CreateEmployee {
            auth_uid: uid.clone(),
            email: format!("{uid}@example.com"),
            display_name: Some("Test Employee".to_string()),
            phone_number: None,
            position: Some("Cleaner".to_string()),
            skills: vec!["deep cleaning".to_string()],
            experience: Some(2),
            hire_date: None,
        },
    )
    .await
    .expect("create employee");

    let user = employee.user.as_ref().expect("employee user");
    let actor = Actor::new(user.id, user.role);
    (employee, actor)
}

pub async fn create_service(db: &DatabaseConnection, base_price: i64) -> services::Model {
    service_db::insert_service(
        db,
        CreateService {
            name: unique("Home Deep Cleaning"),
            category: Categories::Residential,
            description: "Whole home".to_string(),
            base_price,
            price_unit: "per service".to_string(),
            duration: 180,
            features: vec![],
            image_url: None,
        },
    )
    .await
    .expect("insert service")
}

pub fn booking_request(service_id: Uuid) -> CreateBooking {
    CreateBooking {
        service_id,
        scheduled_date: scheduled_date(),
        scheduled_time: "10:00".to_string(),
        duration: None,
        address: Some("1 Main St".to_string()),
        city: Some("Springfield".to_string()),
        postal_code: None,
        special_instructions: None,
    }
}

pub async fn create_booking(
    db: &DatabaseConnection,
    config: &WorkflowConfig,
    customer: &Actor,
    service_id: Uuid,
) -> bookings::Model {
    booking_flow::create_booking(db, config, customer, booking_request(service_id))
        .await
        .expect("create booking")
}
