// src/db/catalog_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::catalog::{Item, ItemCategory, ItemPatch, PriceEvent, PriceKind, Warehouse},
};

// Campos aceitos na criação; id e timestamps são do servidor.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub category: ItemCategory,
    pub model_number: String,
    pub specification: Option<String>,
    pub color: Option<String>,
    pub quantity: i32,
    pub warehouse: Warehouse,
    pub cost_price: Decimal,
    pub online_price: Decimal,
    pub offline_price: Decimal,
    pub image_url: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ItemFilter {
    pub keyword: Option<String>,
    pub category: Option<ItemCategory>,
    pub warehouse: Option<Warehouse>,
}

#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Funções de "Leitura" (Getters)
    // ---
    // Leituras simples usam a pool principal.

    pub async fn get_item(&self, id: Uuid) -> Result<Option<Item>, AppError> {
        let item = sqlx::query_as::<_, Item>("SELECT * FROM items WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(item)
    }

    // Leitura com lock de linha: serializa movimentações concorrentes do
    // mesmo item dentro da transação do processador.
    pub async fn get_item_for_update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Item>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, Item>("SELECT * FROM items WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(item)
    }

    // Busca por palavra-chave (modelo ou especificação, substring sem caixa)
    // e filtros de categoria/local.
    pub async fn list_items(&self, filter: &ItemFilter) -> Result<Vec<Item>, AppError> {
        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT * FROM items
            WHERE ($1::text IS NULL
                   OR model_number ILIKE '%' || $1 || '%'
                   OR specification ILIKE '%' || $1 || '%')
              AND ($2::item_category IS NULL OR category = $2)
              AND ($3::warehouse IS NULL OR warehouse = $3)
            ORDER BY created_at DESC
            "#,
        )
        .bind(&filter.keyword)
        .bind(filter.category)
        .bind(filter.warehouse)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    pub async fn list_price_events(&self, item_id: Uuid) -> Result<Vec<PriceEvent>, AppError> {
        let events = sqlx::query_as::<_, PriceEvent>(
            "SELECT * FROM price_events WHERE item_id = $1 ORDER BY changed_at DESC",
        )
        .bind(item_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(events)
    }

    // ---
    // Funções de "Escrita" (Transacionais)
    // ---

    pub async fn create_item<'e, E>(&self, executor: E, new: &NewItem) -> Result<Item, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, Item>(
            r#"
            INSERT INTO items
                (category, model_number, specification, color, quantity, warehouse,
                 cost_price, online_price, offline_price, image_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(new.category)
        .bind(&new.model_number)
        .bind(&new.specification)
        .bind(&new.color)
        .bind(new.quantity)
        .bind(new.warehouse)
        .bind(new.cost_price)
        .bind(new.online_price)
        .bind(new.offline_price)
        .bind(&new.image_url)
        .fetch_one(executor)
        .await?;
        Ok(item)
    }

    // Patch parcial: COALESCE mantém o valor atual quando o campo não veio.
    // Note que `quantity` não aparece aqui de propósito.
    pub async fn update_item<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        patch: &ItemPatch,
    ) -> Result<Item, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, Item>(
            r#"
            UPDATE items SET
                category      = COALESCE($2::item_category, category),
                model_number  = COALESCE($3, model_number),
                specification = COALESCE($4, specification),
                color         = COALESCE($5, color),
                warehouse     = COALESCE($6::warehouse, warehouse),
                cost_price    = COALESCE($7, cost_price),
                online_price  = COALESCE($8, online_price),
                offline_price = COALESCE($9, offline_price),
                image_url     = COALESCE($10, image_url),
                updated_at    = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(patch.category)
        .bind(&patch.model_number)
        .bind(&patch.specification)
        .bind(&patch.color)
        .bind(patch.warehouse)
        .bind(patch.cost_price)
        .bind(patch.online_price)
        .bind(patch.offline_price)
        .bind(&patch.image_url)
        .fetch_one(executor)
        .await?;
        Ok(item)
    }

    // Ajuste atômico de saldo. O WHERE guarda o invariante `quantity >= 0`;
    // zero linhas afetadas significa que o ajuste NÃO pode ser aplicado.
    pub async fn apply_quantity_delta<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        delta: i32,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE items
            SET quantity = quantity + $2, updated_at = now()
            WHERE id = $1 AND quantity + $2 >= 0
            "#,
        )
        .bind(id)
        .bind(delta)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn record_price_event<'e, E>(
        &self,
        executor: E,
        item_id: Uuid,
        kind: PriceKind,
        old_price: Decimal,
        new_price: Decimal,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO price_events (item_id, kind, old_price, new_price)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(item_id)
        .bind(kind)
        .bind(old_price)
        .bind(new_price)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn delete_item<'e, E>(&self, executor: E, id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
