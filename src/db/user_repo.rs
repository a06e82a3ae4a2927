// src/db/user_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::{InviteCode, User},
};

#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Leituras simples podem usar a pool principal.

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    // ---
    // Escritas (rodam dentro da transação de registro)
    // ---

    pub async fn count_users<'e, E>(&self, executor: E) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(executor)
            .await?;
        Ok(count)
    }

    pub async fn create_user<'e, E>(
        &self,
        executor: E,
        username: &str,
        password_hash: &str,
        is_admin: bool,
    ) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash, is_admin)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(is_admin)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::UsernameAlreadyExists;
                }
            }
            e.into()
        })
    }

    // Lock no código para o consumo ser serializado com o create_user.
    pub async fn get_unused_invite_for_update<'e, E>(
        &self,
        executor: E,
        code: &str,
    ) -> Result<Option<InviteCode>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let invite = sqlx::query_as::<_, InviteCode>(
            "SELECT * FROM invite_codes WHERE code = $1 AND used_by IS NULL FOR UPDATE",
        )
        .bind(code)
        .fetch_optional(executor)
        .await?;
        Ok(invite)
    }

    pub async fn mark_invite_used<'e, E>(
        &self,
        executor: E,
        code: &str,
        used_by: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE invite_codes SET used_by = $2, used_at = now() WHERE code = $1 AND used_by IS NULL",
        )
        .bind(code)
        .bind(used_by)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn create_invite<'e, E>(
        &self,
        executor: E,
        code: &str,
        created_by: Uuid,
    ) -> Result<InviteCode, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let invite = sqlx::query_as::<_, InviteCode>(
            r#"
            INSERT INTO invite_codes (code, created_by)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(code)
        .bind(created_by)
        .fetch_one(executor)
        .await?;
        Ok(invite)
    }
}
