//! Database schema.
//!
//! The SQL lives in `migrations/` at the workspace root and is embedded into
//! the binary at compile time.

use sqlx::migrate::Migrator;

/// Embedded migrations creating the `users`, `admins`, `questions` and
/// `quiz_results` tables.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");
