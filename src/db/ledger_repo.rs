// src/db/ledger_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::ledger::{Direction, NewTransaction, TransactionPlan, TransactionRecord},
};

#[derive(Debug, Default, Clone)]
pub struct LedgerFilter {
    pub direction: Option<Direction>,
    pub item_id: Option<Uuid>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
}

#[derive(Clone)]
pub struct LedgerRepository {
    pool: PgPool,
}

impl LedgerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Funções de "Leitura" (Getters)
    // ---
    // Leituras simples usam a pool principal; `get_by_id` aceita executor
    // porque o processador a chama dentro da transação.

    pub async fn get_by_id<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<TransactionRecord>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let record =
            sqlx::query_as::<_, TransactionRecord>("SELECT * FROM transactions WHERE id = $1")
                .bind(id)
                .fetch_optional(executor)
                .await?;
        Ok(record)
    }

    pub async fn list_by_item(&self, item_id: Uuid) -> Result<Vec<TransactionRecord>, AppError> {
        let records = sqlx::query_as::<_, TransactionRecord>(
            "SELECT * FROM transactions WHERE item_id = $1 ORDER BY created_at DESC",
        )
        .bind(item_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    // LIMIT NULL no Postgres significa "sem limite".
    pub async fn list(&self, filter: &LedgerFilter) -> Result<Vec<TransactionRecord>, AppError> {
        let records = sqlx::query_as::<_, TransactionRecord>(
            r#"
            SELECT * FROM transactions
            WHERE ($1::tx_direction IS NULL OR direction = $1)
              AND ($2::uuid IS NULL OR item_id = $2)
              AND ($3::timestamptz IS NULL OR created_at >= $3)
              AND ($4::timestamptz IS NULL OR created_at <= $4)
            ORDER BY created_at DESC
            LIMIT $5
            "#,
        )
        .bind(filter.direction)
        .bind(filter.item_id)
        .bind(filter.date_from)
        .bind(filter.date_to)
        .bind(filter.limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    // ---
    // Escrita
    // ---

    // Único produtor: o processador de transações. Os campos derivados
    // (direção efetiva, moeda resolvida, valor final) vêm do plano, nunca
    // crus do chamador.
    pub(crate) async fn insert<'e, E>(
        &self,
        executor: E,
        input: &NewTransaction,
        plan: &TransactionPlan,
    ) -> Result<TransactionRecord, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let record = sqlx::query_as::<_, TransactionRecord>(
            r#"
            INSERT INTO transactions
                (item_id, direction, method, quantity, amount, discount, final_amount,
                 currency, source, return_status, linked_transaction_id, note)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(input.item_id)
        .bind(input.direction)
        .bind(input.method)
        .bind(input.quantity)
        .bind(input.amount)
        .bind(input.discount)
        .bind(plan.final_amount)
        .bind(plan.currency)
        .bind(&input.source)
        .bind(input.return_status)
        .bind(input.linked_transaction_id)
        .bind(&input.note)
        .fetch_one(executor)
        .await?;
        Ok(record)
    }
}
