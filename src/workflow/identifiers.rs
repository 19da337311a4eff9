//! Human-facing identifiers: booking numbers and employee codes.
//!
//! Generation is random; uniqueness is enforced by the caller with a store
//! lookup plus a unique index, retried a bounded number of times.

use rand::Rng;
use sea_orm::{DbErr, SqlErr};

const ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

fn random_suffix(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

/// `GLM-<unix millis>-<9 base36 chars>`.
pub fn booking_number() -> String {
    format!(
        "GLM-{}-{}",
        chrono::Utc::now().timestamp_millis(),
        random_suffix(9)
    )
}

/// `EMP-<unix millis>-<5 base36 chars>`.
pub fn employee_code() -> String {
    format!(
        "EMP-{}-{}",
        chrono::Utc::now().timestamp_millis(),
        random_suffix(5)
    )
}

pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
