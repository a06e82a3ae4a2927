// src/models/ledger.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "tx_direction", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Inbound,
    Outbound,
}

// Canais de movimentação. Cada método pertence a exatamente uma direção;
// o processador valida o par direção/método na fronteira.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "tx_method", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionMethod {
    // Saída
    DirectSale,    // Venda presencial
    MarketplaceSg, // Marketplace de Singapura
    MarketplaceTw, // Marketplace de Taiwan
    SocialChannel, // Venda por rede social
    OtherOutbound,
    // Entrada
    Return,
    Procurement,
    Handmade,
    OtherInbound,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "currency", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Currency {
    Cny,
    Sgd,
    Twd,
}

impl Currency {
    // Os três buckets fixos das agregações.
    pub const ALL: [Currency; 3] = [Currency::Cny, Currency::Sgd, Currency::Twd];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "return_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReturnStatus {
    Intact,
    Damaged,
}

impl TransactionMethod {
    pub fn direction(self) -> Direction {
        match self {
            TransactionMethod::DirectSale
            | TransactionMethod::MarketplaceSg
            | TransactionMethod::MarketplaceTw
            | TransactionMethod::SocialChannel
            | TransactionMethod::OtherOutbound => Direction::Outbound,
            TransactionMethod::Return
            | TransactionMethod::Procurement
            | TransactionMethod::Handmade
            | TransactionMethod::OtherInbound => Direction::Inbound,
        }
    }

    // Moeda fixa do canal. Quando Some, o valor do chamador é ignorado;
    // apenas os marketplaces permitem escolha livre.
    pub fn fixed_currency(self) -> Option<Currency> {
        match self {
            TransactionMethod::DirectSale
            | TransactionMethod::SocialChannel
            | TransactionMethod::OtherOutbound => Some(Currency::Cny),
            _ => None,
        }
    }

    // Moeda padrão quando o chamador não informa nada.
    pub fn default_currency(self) -> Option<Currency> {
        match self {
            TransactionMethod::MarketplaceSg => Some(Currency::Sgd),
            TransactionMethod::MarketplaceTw => Some(Currency::Twd),
            other => other.fixed_currency(),
        }
    }
}

// --- Structs ---

// Intenção de movimentação, já tipada. É o que o processador valida na
// fronteira antes de tocar no banco.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub item_id: Uuid,
    pub direction: Direction,
    pub method: TransactionMethod,
    pub quantity: i32,
    pub amount: Option<Decimal>,
    pub discount: Option<Decimal>,
    pub currency: Option<Currency>,
    pub source: Option<String>,
    pub return_status: Option<ReturnStatus>,
    pub linked_transaction_id: Option<Uuid>,
    pub note: Option<String>,
}

// Saída do passo puro de planejamento: o que o processador persiste
// além dos campos crus da intenção.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionPlan {
    pub delta: i32,
    pub final_amount: Option<Decimal>,
    pub currency: Option<Currency>,
}

// Um lançamento do livro-razão. Todo registro persistido já foi aplicado
// ao saldo do item exatamente uma vez (mesma transação SQL).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: Uuid,
    pub item_id: Uuid,
    pub direction: Direction,
    pub method: TransactionMethod,
    pub quantity: i32,

    // Preço de tabela antes do desconto.
    #[schema(example = "300.00")]
    pub amount: Option<Decimal>,
    // Pode ser negativo (acréscimo); finalAmount = amount - discount.
    pub discount: Option<Decimal>,
    pub final_amount: Option<Decimal>,
    pub currency: Option<Currency>,

    // Procedência (fornecedor, pedido de origem, etc).
    #[schema(example = "1688")]
    pub source: Option<String>,

    pub return_status: Option<ReturnStatus>,
    pub linked_transaction_id: Option<Uuid>,
    pub note: Option<String>,

    pub created_at: DateTime<Utc>,
}
