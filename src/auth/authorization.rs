use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::users::Roles;

/// Verified caller identity handed to the workflow layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: Uuid,
    pub role: Roles,
}

impl Actor {
    pub fn new(user_id: Uuid, role: Roles) -> Self {
        Self { user_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Role gate applied by handlers before calling into the workflow.
pub fn require_role(actor: &Actor, allowed: &[Roles]) -> AppResult<()> {
    if allowed.contains(&actor.role) {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Access denied. Insufficient permissions.".to_string(),
        ))
    }
}

pub fn require_admin(actor: &Actor) -> AppResult<()> {
    require_role(actor, &[Roles::Admin, Roles::SuperAdmin])
}
