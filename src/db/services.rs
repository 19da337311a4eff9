use sea_orm::*;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::bookings;
use crate::models::services::{self, CreateService, ServiceListQuery, UpdateService};

/// Catalog listing, ordered by name.
pub async fn list_services(
    db: &DatabaseConnection,
    query: &ServiceListQuery,
) -> Result<Vec<services::Model>, DbErr> {
    let mut select = services::Entity::find();

    if let Some(category) = query.category {
        select = select.filter(services::Column::Category.eq(category));
    }
    if let Some(is_active) = query.is_active {
        select = select.filter(services::Column::IsActive.eq(is_active));
    }

    select.order_by_asc(services::Column::Name).all(db).await
}

/// Fetch a single service by ID.
pub async fn get_service_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<services::Model>, DbErr> {
    services::Entity::find_by_id(id).one(db).await
}

/// Insert a new, active service.
pub async fn insert_service(
    db: &DatabaseConnection,
    input: CreateService,
) -> AppResult<services::Model> {
    if input.base_price < 0 || input.duration <= 0 {
        return Err(AppError::BadRequest(
            "base_price must be non-negative and duration positive".to_string(),
        ));
    }

    let new_service = services::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(input.name),
        category: Set(input.category),
        description: Set(input.description),
        base_price: Set(input.base_price),
        price_unit: Set(input.price_unit),
        duration: Set(input.duration),
        features: Set(input.features.into()),
        image_url: Set(input.image_url),
        is_active: Set(true),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
    };

    new_service.insert(db).await.map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::Conflict("A service with this name already exists".to_string())
        }
        _ => e.into(),
    })
}

/// Update an existing service. Existing bookings keep their price snapshot.
pub async fn update_service(
    db: &DatabaseConnection,
    id: Uuid,
    input: UpdateService,
) -> AppResult<services::Model> {
    let service = get_service_by_id(db, id)
        .await?
        .ok_or_else(|| AppError::not_found("Service", id))?;

    if input.base_price.is_some_and(|p| p < 0) || input.duration.is_some_and(|d| d <= 0) {
        return Err(AppError::BadRequest(
            "base_price must be non-negative and duration positive".to_string(),
        ));
    }

    let mut active: services::ActiveModel = service.into();

    if let Some(name) = input.name {
        active.name = Set(name);
    }
    if let Some(category) = input.category {
        active.category = Set(category);
    }
    if let Some(description) = input.description {
        active.description = Set(description);
    }
    if let Some(base_price) = input.base_price {
        active.base_price = Set(base_price);
    }
    if let Some(price_unit) = input.price_unit {
        active.price_unit = Set(price_unit);
    }
    if let Some(duration) = input.duration {
        active.duration = Set(duration);
    }
    if let Some(features) = input.features {
        active.features = Set(features.into());
    }
    if let Some(image_url) = input.image_url {
        active.image_url = Set(Some(image_url));
    }
    if let Some(is_active) = input.is_active {
        active.is_active = Set(is_active);
    }
    active.updated_at = Set(Some(chrono::Utc::now()));

    Ok(active.update(db).await?)
}

/// Hard-delete a service that no booking references.
pub async fn delete_service(db: &DatabaseConnection, id: Uuid) -> AppResult<()> {
    let txn = db.begin().await?;

    let referenced = bookings::Entity::find()
        .filter(bookings::Column::ServiceId.eq(id))
        .count(&txn)
        .await?;
    if referenced > 0 {
        return Err(AppError::Conflict(format!(
            "Service {id} is referenced by {referenced} booking(s); deactivate it instead"
        )));
    }

    let result = services::Entity::delete_by_id(id).exec(&txn).await?;
    if result.rows_affected == 0 {
        return Err(AppError::not_found("Service", id));
    }

    txn.commit().await?;
    Ok(())
}

/// Insert or refresh a catalog entry keyed by name. Used by the seeder.
pub async fn upsert_service_by_name(
    db: &DatabaseConnection,
    input: CreateService,
) -> AppResult<(services::Model, bool)> {
    let existing = services::Entity::find()
        .filter(services::Column::Name.eq(input.name.as_str()))
        .one(db)
        .await?;

    match existing {
        Some(service) => {
            let update = UpdateService {
                name: None,
                category: Some(input.category),
                description: Some(input.description),
                base_price: Some(input.base_price),
                price_unit: Some(input.price_unit),
                duration: Some(input.duration),
                features: Some(input.features),
                image_url: input.image_url,
                is_active: Some(true),
            };
            Ok((update_service(db, service.id, update).await?, false))
        }
        None => Ok((insert_service(db, input).await?, true)),
    }
}
