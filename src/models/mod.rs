pub mod bookings;
pub mod customers;
pub mod employees;
pub mod job_assignments;
pub mod reviews;
pub mod services;
pub mod uploaded_media;
pub mod users;

use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

/// Highest page a listing will serve. Keeps `page * limit` far from overflow.
pub const MAX_PAGE: u64 = 1_000_000;

#[derive(Debug, Clone, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl PaginationQuery {
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).clamp(1, MAX_PAGE)
    }

    pub fn limit(&self) -> u64 {
        self.limit.unwrap_or(10).clamp(1, 100)
    }
}

/// Ordered list of strings persisted as a JSON column.
///
/// Used for opaque media references (environment, before and after images)
/// as well as free-form tags such as skills and service features.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(transparent)]
pub struct StringList(pub Vec<String>);

impl StringList {
    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

impl From<Vec<String>> for StringList {
    fn from(items: Vec<String>) -> Self {
        Self(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults_and_caps() {
        let q = PaginationQuery { page: None, limit: None };
        assert_eq!(q.page(), 1);
        assert_eq!(q.limit(), 10);

        let q = PaginationQuery { page: Some(0), limit: Some(500) };
        assert_eq!(q.page(), 1);
        assert_eq!(q.limit(), 100);
    }

    #[test]
    fn huge_page_is_capped() {
        let q = PaginationQuery { page: Some(u64::MAX), limit: Some(100) };
        assert_eq!(q.page(), MAX_PAGE);
        assert!(q.page().checked_mul(q.limit()).is_some());
    }
}
