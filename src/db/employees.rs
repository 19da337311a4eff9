use sea_orm::*;
use uuid::Uuid;

use crate::config::WorkflowConfig;
use crate::db::users as user_db;
use crate::error::{AppError, AppResult};
use crate::models::employees::{self, CreateEmployee, EmployeeWithUser, UpdateEmployee};
use crate::models::job_assignments::{self, AssignmentStatus};
use crate::models::users::{self, Roles, UserStatus};
use crate::workflow::identifiers;

/// Fetch a single employee by ID.
pub async fn get_employee_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<employees::Model>, DbErr> {
    employees::Entity::find_by_id(id).one(db).await
}

/// Fetch the employee profile owned by a user.
pub async fn get_employee_by_user_id<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
) -> Result<Option<employees::Model>, DbErr> {
    employees::Entity::find()
        .filter(employees::Column::UserId.eq(user_id))
        .one(db)
        .await
}

/// Number of assignments the employee currently holds (assigned or started).
pub async fn count_active_assignments<C: ConnectionTrait>(
    db: &C,
    employee_id: Uuid,
) -> Result<u64, DbErr> {
    job_assignments::Entity::find()
        .filter(job_assignments::Column::EmployeeId.eq(employee_id))
        .filter(job_assignments::Column::Status.is_in(AssignmentStatus::active()))
        .count(db)
        .await
}

/// All employees with their users, newest first.
pub async fn list_employees(db: &DatabaseConnection) -> Result<Vec<EmployeeWithUser>, DbErr> {
    let rows = employees::Entity::find()
        .find_also_related(users::Entity)
        .order_by_desc(employees::Column::CreatedAt)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(employee, user)| EmployeeWithUser {
            employee,
            user: user.map(Into::into),
        })
        .collect())
}

/// Create an EMPLOYEE user and its profile with a freshly generated employee code.
pub async fn create_employee(
    db: &DatabaseConnection,
    config: &WorkflowConfig,
    input: CreateEmployee,
) -> AppResult<EmployeeWithUser> {
    for attempt in 1..=config.identifier_attempts {
        let employee_code = identifiers::employee_code();
        let txn = db.begin().await?;

        let existing = users::Entity::find()
            .filter(
                Condition::any()
                    .add(users::Column::AuthUid.eq(input.auth_uid.as_str()))
                    .add(users::Column::Email.eq(input.email.as_str())),
            )
            .count(&txn)
            .await?;
        if existing > 0 {
            return Err(AppError::Conflict("User already exists".to_string()));
        }

        let now = chrono::Utc::now();
        let user = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            auth_uid: Set(input.auth_uid.clone()),
            email: Set(input.email.clone()),
            display_name: Set(input.display_name.clone()),
            phone_number: Set(input.phone_number.clone()),
            photo_url: Set(None),
            role: Set(Roles::Employee),
            status: Set(UserStatus::Active),
            created_at: Set(now),
            updated_at: Set(None),
        }
        .insert(&txn)
        .await
        .map_err(user_db::user_insert_error)?;

        let inserted = employees::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user.id),
            employee_code: Set(employee_code),
            position: Set(input.position.clone()),
            skills: Set(input.skills.clone().into()),
            experience: Set(input.experience),
            hire_date: Set(input.hire_date),
            is_available: Set(true),
            created_at: Set(now),
            updated_at: Set(None),
        }
        .insert(&txn)
        .await;

        match inserted {
            Ok(employee) => {
                txn.commit().await?;
                tracing::info!(employee_id = %employee.id, code = %employee.employee_code, "Created employee");
                return Ok(EmployeeWithUser {
                    employee,
                    user: Some(user.into()),
                });
            }
            Err(e) if identifiers::is_unique_violation(&e) => {
                tracing::warn!(attempt, "Employee code collision, retrying");
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(AppError::Conflict(
        "Could not allocate a unique employee code".to_string(),
    ))
}

/// Update position, skills and experience. Availability is not editable here.
pub async fn update_employee(
    db: &DatabaseConnection,
    id: Uuid,
    input: UpdateEmployee,
) -> AppResult<employees::Model> {
    let employee = get_employee_by_id(db, id)
        .await?
        .ok_or_else(|| AppError::not_found("Employee", id))?;

    let mut active: employees::ActiveModel = employee.into();

    if let Some(position) = input.position {
        active.position = Set(Some(position));
    }
    if let Some(skills) = input.skills {
        active.skills = Set(skills.into());
    }
    if let Some(experience) = input.experience {
        active.experience = Set(Some(experience));
    }
    active.updated_at = Set(Some(chrono::Utc::now()));

    Ok(active.update(db).await?)
}

/// Deactivate the employee's account. Refused while they hold active work.
pub async fn deactivate_employee(db: &DatabaseConnection, id: Uuid) -> AppResult<()> {
    let txn = db.begin().await?;

    let employee = employees::Entity::find_by_id(id)
        .lock_exclusive()
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::not_found("Employee", id))?;

    if count_active_assignments(&txn, employee.id).await? > 0 {
        return Err(AppError::Conflict(
            "Employee still holds active job assignments".to_string(),
        ));
    }

    user_db::set_user_status(&txn, employee.user_id, UserStatus::Inactive).await?;
    txn.commit().await?;

    tracing::info!(employee_id = %id, "Deactivated employee");
    Ok(())
}
