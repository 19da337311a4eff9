pub mod admin;
pub mod auth;
pub mod bookings;
pub mod employees;
pub mod services;
pub mod users;

use actix_web::{HttpResponse, Responder, web};

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    // ── Auth routes (token required; registration needs no local user yet) ──
    cfg.service(
        web::scope("/auth")
            .route("/register", web::post().to(auth::register))
            .route("/me", web::get().to(auth::me)),
    );

    // ── User routes ──
    cfg.service(
        web::resource("/users/profile")
            .route(web::get().to(users::get_profile))
            .route(web::put().to(users::update_profile)),
    );
    cfg.service(
        web::resource("/users/account").route(web::delete().to(users::deactivate_account)),
    );

    // ── Service catalog (reads are public, writes are admin only) ──
    cfg.service(
        web::scope("/services")
            .route("", web::get().to(services::get_services))
            .route("", web::post().to(services::create_service))
            .route("/{id}", web::get().to(services::get_service))
            .route("/{id}", web::put().to(services::update_service))
            .route("/{id}", web::delete().to(services::delete_service)),
    );

    // ── Booking routes ──
    cfg.service(
        web::scope("/bookings")
            .route("", web::get().to(bookings::get_my_bookings))
            .route("", web::post().to(bookings::create_booking))
            .route("/{id}", web::get().to(bookings::get_booking))
            .route("/{id}", web::put().to(bookings::update_booking))
            .route("/{id}", web::delete().to(bookings::cancel_booking))
            .route("/{id}/upload-images", web::post().to(bookings::upload_images)),
    );

    // ── Admin routes ──
    cfg.service(
        web::scope("/admin")
            .route("/bookings", web::get().to(admin::get_bookings))
            .route("/customers", web::get().to(admin::get_customers))
            .route("/employees", web::get().to(admin::get_employees))
            .route("/employees", web::post().to(admin::create_employee))
            .route("/employees/{id}", web::put().to(admin::update_employee))
            .route("/employees/{id}", web::delete().to(admin::deactivate_employee))
            .route("/jobs/assign", web::post().to(admin::assign_job)),
    );

    // ── Employee job routes ──
    cfg.service(
        web::scope("/employees")
            .route("/jobs", web::get().to(employees::get_my_jobs))
            .route("/jobs/{id}", web::get().to(employees::get_job))
            .route("/jobs/{id}/status", web::put().to(employees::update_job_status))
            .route("/jobs/{id}/upload-images", web::post().to(employees::upload_job_images)),
    );
}

/// GET /health
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}
