// src/handlers/transactions.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, response::Envelope},
    config::AppState,
    db::ledger_repo::LedgerFilter,
    middleware::auth::AuthenticatedUser,
    models::ledger::{Currency, Direction, NewTransaction, ReturnStatus, TransactionMethod},
    models::validate_not_negative,
};

// ---
// Payload: registrar movimentação
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordTransactionPayload {
    pub item_id: Uuid,
    pub direction: Direction,
    pub method: TransactionMethod,

    #[validate(range(min = 1, message = "A quantidade deve ser no mínimo 1."))]
    pub quantity: i32,

    // Preço de tabela antes do desconto.
    #[validate(custom(function = "validate_not_negative"))]
    pub amount: Option<Decimal>,

    // Livre em sinal: negativo funciona como acréscimo.
    pub discount: Option<Decimal>,

    pub currency: Option<Currency>,
    pub source: Option<String>,
    pub return_status: Option<ReturnStatus>,
    pub linked_transaction_id: Option<Uuid>,
    pub note: Option<String>,
}

impl RecordTransactionPayload {
    pub fn into_new_transaction(self) -> NewTransaction {
        NewTransaction {
            item_id: self.item_id,
            direction: self.direction,
            method: self.method,
            quantity: self.quantity,
            amount: self.amount,
            discount: self.discount,
            currency: self.currency,
            source: self.source,
            return_status: self.return_status,
            linked_transaction_id: self.linked_transaction_id,
            note: self.note,
        }
    }
}

// ---
// Query: filtros do razão
// ---
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTransactionsQuery {
    pub direction: Option<Direction>,
    pub item_id: Option<Uuid>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
}

impl ListTransactionsQuery {
    pub fn into_filter(self) -> LedgerFilter {
        LedgerFilter {
            direction: self.direction,
            item_id: self.item_id,
            date_from: self.date_from,
            date_to: self.date_to,
            limit: self.limit,
        }
    }
}

// ---
// Handler: record_transaction
// ---
// Valida, deriva delta/valor final/moeda e aplica tudo numa transação SQL:
// ou o lançamento e o ajuste de saldo entram juntos, ou nada entra.
#[utoipa::path(
    post,
    path = "/api/transactions",
    tag = "Transactions",
    request_body = RecordTransactionPayload,
    responses(
        (status = 201, description = "Movimentação registrada e saldo ajustado"),
        (status = 404, description = "Item ou transação vinculada não encontrados"),
        (status = 409, description = "Estoque insuficiente (carrega o disponível)"),
        (status = 422, description = "Payload inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn record_transaction(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Json(payload): Json<RecordTransactionPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let record = app_state
        .transaction_service
        .record_transaction(&app_state.db_pool, payload.into_new_transaction())
        .await?;

    Ok((StatusCode::CREATED, Json(Envelope::ok(record))))
}

// ---
// Handler: list_transactions
// ---
#[utoipa::path(
    get,
    path = "/api/transactions",
    tag = "Transactions",
    responses(
        (status = 200, description = "Lançamentos do razão, mais recentes primeiro")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_transactions(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Query(query): Query<ListTransactionsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let records = app_state
        .transaction_service
        .list(&query.into_filter())
        .await?;

    Ok((StatusCode::OK, Json(Envelope::ok(records))))
}

// ---
// Handler: get_by_item
// ---
#[utoipa::path(
    get,
    path = "/api/transactions/by-item/{item_id}",
    tag = "Transactions",
    responses(
        (status = 200, description = "Histórico de movimentações do item, mais recentes primeiro")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_by_item(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(item_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let records = app_state
        .transaction_service
        .list_by_item(item_id)
        .await?;

    Ok((StatusCode::OK, Json(Envelope::ok(records))))
}
