//! `PostgreSQL` implementation of the `UserDirectory` trait.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use kitobxon_core::error::DomainError;
use kitobxon_core::model::{UserId, UserProfile};
use kitobxon_core::repository::UserDirectory;

use crate::mapping::{corrupt, infra};

/// PostgreSQL-backed directory of registered readers and administrators.
#[derive(Debug, Clone)]
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    /// Creates a new `PgUserDirectory`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn find_user(&self, user_id: UserId) -> Result<Option<UserProfile>, DomainError> {
        let row = sqlx::query(
            r"
                SELECT user_id, display_name, username, age
                FROM users
                WHERE user_id = $1
            ",
        )
        .bind(user_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(infra)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let age: i16 = row.try_get("age").map_err(infra)?;
        Ok(Some(UserProfile {
            user_id: UserId(row.try_get("user_id").map_err(infra)?),
            display_name: row.try_get("display_name").map_err(infra)?,
            username: row.try_get("username").map_err(infra)?,
            age: u8::try_from(age).map_err(|_| corrupt("age", age))?,
        }))
    }

    async fn admin_ids(&self) -> Result<Vec<UserId>, DomainError> {
        let ids: Vec<i64> = sqlx::query_scalar("SELECT user_id FROM admins ORDER BY user_id")
            .fetch_all(&self.pool)
            .await
            .map_err(infra)?;
        Ok(ids.into_iter().map(UserId).collect())
    }
}
