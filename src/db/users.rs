use sea_orm::*;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::users::{
    self, RegisterUser, Roles, UpdateProfile, UserProfileResponse, UserStatus,
};
use crate::models::{customers, employees};
use crate::workflow::identifiers;

/// Fetch a single user by ID.
pub async fn get_user_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<users::Model>, DbErr> {
    users::Entity::find_by_id(id).one(db).await
}

/// Fetch the user linked to an identity provider subject.
pub async fn get_user_by_auth_uid(
    db: &DatabaseConnection,
    auth_uid: &str,
) -> Result<Option<users::Model>, DbErr> {
    users::Entity::find()
        .filter(users::Column::AuthUid.eq(auth_uid))
        .one(db)
        .await
}

/// A concurrent registration that slipped past the existence check still
/// reports `Conflict` once the unique index rejects it.
pub(crate) fn user_insert_error(err: DbErr) -> AppError {
    if identifiers::is_unique_violation(&err) {
        AppError::Conflict("User already exists".to_string())
    } else {
        err.into()
    }
}

/// Create a CUSTOMER user and its customer profile in one transaction.
pub async fn register_customer(
    db: &DatabaseConnection,
    auth_uid: &str,
    email: String,
    input: RegisterUser,
) -> AppResult<UserProfileResponse> {
    let txn = db.begin().await?;

    let existing = users::Entity::find()
        .filter(
            Condition::any()
                .add(users::Column::AuthUid.eq(auth_uid))
                .add(users::Column::Email.eq(email.as_str())),
        )
        .count(&txn)
        .await?;
    if existing > 0 {
        return Err(AppError::Conflict("User already exists".to_string()));
    }

    let now = chrono::Utc::now();
    let user = users::ActiveModel {
        id: Set(Uuid::new_v4()),
        auth_uid: Set(auth_uid.to_string()),
        email: Set(email),
        display_name: Set(input.display_name),
        phone_number: Set(input.phone_number),
        photo_url: Set(input.photo_url),
        role: Set(Roles::Customer),
        status: Set(UserStatus::Active),
        created_at: Set(now),
        updated_at: Set(None),
    }
    .insert(&txn)
    .await
    .map_err(user_insert_error)?;

    let customer = customers::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.id),
        address: Set(input.address),
        city: Set(input.city),
        postal_code: Set(input.postal_code),
        created_at: Set(now),
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;
    tracing::info!(user_id = %user.id, "Registered customer");

    Ok(UserProfileResponse {
        user: user.into(),
        customer: Some(customer),
        employee: None,
    })
}

/// The user together with whichever profile matches their role.
pub async fn get_profile(
    db: &DatabaseConnection,
    user: users::Model,
) -> Result<UserProfileResponse, DbErr> {
    let customer = user.find_related(customers::Entity).one(db).await?;
    let employee = user.find_related(employees::Entity).one(db).await?;

    Ok(UserProfileResponse {
        user: user.into(),
        customer,
        employee,
    })
}

/// Update contact details, and for customers the default booking address.
pub async fn update_profile(
    db: &DatabaseConnection,
    user: users::Model,
    input: UpdateProfile,
) -> AppResult<UserProfileResponse> {
    let txn = db.begin().await?;
    let role = user.role;

    let mut active: users::ActiveModel = user.into();
    if let Some(display_name) = input.display_name {
        active.display_name = Set(Some(display_name));
    }
    if let Some(phone_number) = input.phone_number {
        active.phone_number = Set(Some(phone_number));
    }
    if let Some(photo_url) = input.photo_url {
        active.photo_url = Set(Some(photo_url));
    }
    active.updated_at = Set(Some(chrono::Utc::now()));
    let user = active.update(&txn).await?;

    if role == Roles::Customer {
        if let Some(customer) = user.find_related(customers::Entity).one(&txn).await? {
            let mut active: customers::ActiveModel = customer.into();
            if let Some(address) = input.address {
                active.address = Set(Some(address));
            }
            if let Some(city) = input.city {
                active.city = Set(Some(city));
            }
            if let Some(postal_code) = input.postal_code {
                active.postal_code = Set(Some(postal_code));
            }
            active.update(&txn).await?;
        }
    }

    txn.commit().await?;
    Ok(get_profile(db, user).await?)
}

/// Soft-delete: the account stays for booking history but can no longer sign in.
pub async fn set_user_status<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    status: UserStatus,
) -> Result<users::Model, DbErr> {
    let user = users::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("User not found".to_string()))?;

    let mut active: users::ActiveModel = user.into();
    active.status = Set(status);
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(db).await
}
