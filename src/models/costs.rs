// src/models/costs.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "cost_category", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CostCategory {
    Material,
    Packaging,
    Shipping,
    Marketing,
    PlatformFee,
    Equipment,
    Other,
}

// Lançamento de custo avulso. Ciclo de vida independente do catálogo e do
// razão; só a agregação financeira consome.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CostItem {
    pub id: Uuid,

    #[schema(example = "Embalagens kraft")]
    pub name: String,

    #[schema(example = "120.00")]
    pub amount: Decimal,

    pub category: CostCategory,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}
