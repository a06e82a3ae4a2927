// src/models/stats.rs

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use std::collections::BTreeMap;
use utoipa::ToSchema;

use crate::models::costs::CostCategory;
use crate::models::ledger::Currency;

// Linha crua do GROUP BY currency.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyBucket {
    pub currency: Currency,
    pub total: Decimal,
}

// Vendas por moeda no intervalo. As três moedas aparecem sempre como chave,
// zeradas quando não há registros.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalesStats {
    #[schema(value_type = Object)]
    pub sales_by_currency: BTreeMap<Currency, Decimal>,
    pub total_records: i64,
}

// Linha crua do GROUP BY category.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CostBucket {
    pub name: CostCategory,
    pub value: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CostSummary {
    pub by_category: Vec<CostBucket>,
    pub total: Decimal,
}
