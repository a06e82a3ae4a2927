// src/db/cost_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::costs::{CostCategory, CostItem},
};

#[derive(Clone)]
pub struct CostRepository {
    pool: PgPool,
}

impl CostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        name: &str,
        amount: Decimal,
        category: CostCategory,
        note: Option<&str>,
    ) -> Result<CostItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let cost = sqlx::query_as::<_, CostItem>(
            r#"
            INSERT INTO cost_items (name, amount, category, note)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(amount)
        .bind(category)
        .bind(note)
        .fetch_one(executor)
        .await?;
        Ok(cost)
    }

    // Leitura simples: pool principal.
    pub async fn list(&self) -> Result<Vec<CostItem>, AppError> {
        let costs =
            sqlx::query_as::<_, CostItem>("SELECT * FROM cost_items ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(costs)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM cost_items WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
