// src/handlers/costs.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, response::Envelope},
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::costs::CostCategory,
};

// ---
// Payload: CreateCost
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCostPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,

    pub amount: Decimal,

    #[validate(required(message = "O campo 'category' é obrigatório."))]
    pub category: Option<CostCategory>,

    pub note: Option<String>,
}

// ---
// Handler: create_cost
// ---
#[utoipa::path(
    post,
    path = "/api/costs",
    tag = "Costs",
    request_body = CreateCostPayload,
    responses(
        (status = 201, description = "Custo lançado"),
        (status = 422, description = "Payload inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_cost(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Json(payload): Json<CreateCostPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let cost = app_state
        .cost_service
        .create(
            &app_state.db_pool,
            &payload.name,
            payload.amount,
            payload.category.unwrap(),
            payload.note.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(Envelope::ok(cost))))
}

// ---
// Handler: list_costs
// ---
#[utoipa::path(
    get,
    path = "/api/costs",
    tag = "Costs",
    responses(
        (status = 200, description = "Lançamentos de custo, mais recentes primeiro")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_costs(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let costs = app_state.cost_service.list().await?;
    Ok((StatusCode::OK, Json(Envelope::ok(costs))))
}

// ---
// Handler: delete_cost
// ---
#[utoipa::path(
    delete,
    path = "/api/costs/{id}",
    tag = "Costs",
    responses(
        (status = 200, description = "Custo removido"),
        (status = 404, description = "Custo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_cost(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .cost_service
        .delete(&app_state.db_pool, id)
        .await?;

    Ok((StatusCode::OK, Json(Envelope::ok_empty())))
}
