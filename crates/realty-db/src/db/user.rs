use async_trait::async_trait;
use realty_core::models::UserRole;
use realty_core::AppError;
use sqlx::PgPool;
use uuid::Uuid;

/// The slice of user persistence this service writes to.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Add `role` to the user's role set. Idempotent; returns whether the set changed.
    async fn add_role(&self, user_id: Uuid, role: UserRole) -> Result<bool, AppError>;
}

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserRepository {
    #[tracing::instrument(skip(self), fields(db.table = "users", db.operation = "update", db.record_id = %user_id))]
    async fn add_role(&self, user_id: Uuid, role: UserRole) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET roles = array_append(roles, $2), updated_at = NOW()
            WHERE id = $1 AND NOT ($2 = ANY(roles))
            "#,
        )
        .bind(user_id)
        .bind(role.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
