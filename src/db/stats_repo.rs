// src/db/stats_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::stats::{CostBucket, CurrencyBucket},
};

#[derive(Clone)]
pub struct StatsRepository {
    pool: PgPool,
}

impl StatsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Soma de finalAmount por moeda, só saídas. Devoluções são entradas e
    // ficam de fora desta visão por construção.
    pub async fn sales_by_currency<'e, E>(
        &self,
        executor: E,
        date_from: Option<DateTime<Utc>>,
        date_to: Option<DateTime<Utc>>,
    ) -> Result<Vec<CurrencyBucket>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let buckets = sqlx::query_as::<_, CurrencyBucket>(
            r#"
            SELECT currency, COALESCE(SUM(final_amount), 0) AS total
            FROM transactions
            WHERE direction = 'OUTBOUND'
              AND currency IS NOT NULL
              AND final_amount IS NOT NULL
              AND ($1::timestamptz IS NULL OR created_at >= $1)
              AND ($2::timestamptz IS NULL OR created_at <= $2)
            GROUP BY currency
            "#,
        )
        .bind(date_from)
        .bind(date_to)
        .fetch_all(executor)
        .await?;
        Ok(buckets)
    }

    pub async fn count_transactions<'e, E>(
        &self,
        executor: E,
        date_from: Option<DateTime<Utc>>,
        date_to: Option<DateTime<Utc>>,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM transactions
            WHERE ($1::timestamptz IS NULL OR created_at >= $1)
              AND ($2::timestamptz IS NULL OR created_at <= $2)
            "#,
        )
        .bind(date_from)
        .bind(date_to)
        .fetch_one(executor)
        .await?;
        Ok(count)
    }

    // Agrupamento único, sem necessidade de snapshot: pool principal.
    pub async fn cost_totals(&self) -> Result<Vec<CostBucket>, AppError> {
        let buckets = sqlx::query_as::<_, CostBucket>(
            r#"
            SELECT category AS name, COALESCE(SUM(amount), 0) AS value
            FROM cost_items
            GROUP BY category
            ORDER BY value DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(buckets)
    }
}
