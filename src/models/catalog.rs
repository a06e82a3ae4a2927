// src/models/catalog.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "item_category", rename_all = "SCREAMING_SNAKE_CASE")] // Banco
#[serde(rename_all = "SCREAMING_SNAKE_CASE")] // JSON
pub enum ItemCategory {
    EarAccessory, // Brincos e acessórios de orelha
    Necklace,
    Bracelet,
    Ring,
    Other,
}

// Locais físicos fixos da operação.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "warehouse", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Warehouse {
    Studio,
    Shop,
    SgWarehouse,
    TwWarehouse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "price_kind", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriceKind {
    Cost,
    Online,
    Offline,
}

// --- Structs ---

// O item de catálogo. `quantity` é o saldo autoritativo de estoque:
// definido uma única vez na criação e depois mutado somente pelo
// processador de transações.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: Uuid,
    pub category: ItemCategory,

    #[schema(example = "S925-A017")]
    pub model_number: String,

    pub specification: Option<String>,
    pub color: Option<String>,

    pub quantity: i32,

    pub warehouse: Warehouse,

    #[schema(example = "35.00")]
    pub cost_price: Decimal,
    #[schema(example = "99.00")]
    pub online_price: Decimal,
    #[schema(example = "89.00")]
    pub offline_price: Decimal,

    pub image_url: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Evento de alteração de preço (append-only, gravado na mesma transação
// do update que mudou o preço).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriceEvent {
    pub id: Uuid,
    pub item_id: Uuid,
    pub kind: PriceKind,
    pub old_price: Decimal,
    pub new_price: Decimal,
    pub changed_at: DateTime<Utc>,
}

// Patch explícito de item: cada campo editável como Option.
// Não existe campo `quantity` aqui — saldo só muda via transação —
// e `deny_unknown_fields` rejeita qualquer tentativa de passá-lo no JSON.
#[derive(Debug, Default, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ItemPatch {
    pub category: Option<ItemCategory>,

    #[validate(length(min = 1, message = "O número do modelo não pode ser vazio."))]
    pub model_number: Option<String>,

    pub specification: Option<String>,
    pub color: Option<String>,
    pub warehouse: Option<Warehouse>,

    #[validate(custom(function = "crate::models::validate_not_negative"))]
    pub cost_price: Option<Decimal>,
    #[validate(custom(function = "crate::models::validate_not_negative"))]
    pub online_price: Option<Decimal>,
    #[validate(custom(function = "crate::models::validate_not_negative"))]
    pub offline_price: Option<Decimal>,

    pub image_url: Option<String>,
}
