use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::authorization::require_admin;
use crate::auth::middleware::AuthenticatedUser;
use crate::cache::{CacheData, keys};
use crate::config::CacheConfig;
use crate::db::services as service_db;
use crate::error::AppError;
use crate::models::services::{CreateService, ServiceListQuery, UpdateService};

/// GET /api/services: public catalog, filterable by category and active flag.
pub async fn get_services(
    db: web::Data<DatabaseConnection>,
    cache: Option<web::Data<CacheData>>,
    ttl: web::Data<CacheConfig>,
    query: web::Query<ServiceListQuery>,
) -> Result<HttpResponse, AppError> {
    let cache_key = keys::service_list(&query.cache_fragment());

    if let Some(cache) = &cache {
        match cache.get::<serde_json::Value>(&cache_key).await {
            Ok(Some(cached)) => return Ok(HttpResponse::Ok().json(cached)),
            Ok(None) => {}
            Err(e) => tracing::warn!("Cache error: {e}"),
        }
    }

    let services = service_db::list_services(db.get_ref(), &query).await?;

    if let Some(cache) = &cache {
        if let Err(e) = cache.set(&cache_key, &services, ttl.service_list_ttl).await {
            tracing::warn!("Cache write failed: {e}");
        }
    }

    Ok(HttpResponse::Ok().json(services))
}

/// GET /api/services/{id}
pub async fn get_service(
    db: web::Data<DatabaseConnection>,
    cache: Option<web::Data<CacheData>>,
    ttl: web::Data<CacheConfig>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let cache_key = keys::service(&id.to_string());

    if let Some(cache) = &cache {
        match cache.get::<serde_json::Value>(&cache_key).await {
            Ok(Some(cached)) => return Ok(HttpResponse::Ok().json(cached)),
            Ok(None) => {}
            Err(e) => tracing::warn!("Cache error: {e}"),
        }
    }

    let service = service_db::get_service_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| AppError::not_found("Service", id))?;

    if let Some(cache) = &cache {
        if let Err(e) = cache.set(&cache_key, &service, ttl.service_ttl).await {
            tracing::warn!("Cache write failed: {e}");
        }
    }

    Ok(HttpResponse::Ok().json(service))
}

/// POST /api/services: admin only.
pub async fn create_service(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: Option<web::Data<CacheData>>,
    body: web::Json<CreateService>,
) -> Result<HttpResponse, AppError> {
    require_admin(&user.actor())?;

    let service = service_db::insert_service(db.get_ref(), body.into_inner()).await?;
    if let Some(cache) = cache {
        cache.invalidate_service(&service.id.to_string()).await;
    }

    Ok(HttpResponse::Created().json(service))
}

/// PUT /api/services/{id}: admin only. Existing bookings keep their price.
pub async fn update_service(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: Option<web::Data<CacheData>>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateService>,
) -> Result<HttpResponse, AppError> {
    require_admin(&user.actor())?;

    let id = path.into_inner();
    let service = service_db::update_service(db.get_ref(), id, body.into_inner()).await?;
    if let Some(cache) = cache {
        cache.invalidate_service(&id.to_string()).await;
    }

    Ok(HttpResponse::Ok().json(service))
}

/// DELETE /api/services/{id}: admin only; refused while bookings reference it.
pub async fn delete_service(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: Option<web::Data<CacheData>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    require_admin(&user.actor())?;

    let id = path.into_inner();
    service_db::delete_service(db.get_ref(), id).await?;
    if let Some(cache) = cache {
        cache.invalidate_service(&id.to_string()).await;
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Service {id} deleted"),
    })))
}
