use sea_orm::*;
use uuid::Uuid;

use crate::models::customers::{self, CustomerWithUser};
use crate::models::users;

/// Fetch the customer profile owned by a user.
pub async fn get_customer_by_user_id<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
) -> Result<Option<customers::Model>, DbErr> {
    customers::Entity::find()
        .filter(customers::Column::UserId.eq(user_id))
        .one(db)
        .await
}

/// All customers with their users, newest first.
pub async fn list_customers(db: &DatabaseConnection) -> Result<Vec<CustomerWithUser>, DbErr> {
    let rows = customers::Entity::find()
        .find_also_related(users::Entity)
        .order_by_desc(customers::Column::CreatedAt)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(customer, user)| CustomerWithUser {
            customer,
            user: user.map(Into::into),
        })
        .collect())
}
