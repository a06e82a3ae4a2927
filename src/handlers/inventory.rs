// src/handlers/inventory.rs

use axum::{
    extract::{Path, Query, State},
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
    db::catalog_repo::{ItemFilter, NewItem},
    middleware::auth::AuthenticatedUser,
    models::catalog::{ItemCategory, ItemPatch, Warehouse},
    models::validate_not_negative,
};

// ---
// Payload: CreateItem
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemPayload {
    #[validate(required(message = "O campo 'category' é obrigatório."))]
    pub category: Option<ItemCategory>,

    #[validate(length(min = 1, message = "O número do modelo é obrigatório."))]
    pub model_number: String,

    pub specification: Option<String>,
    pub color: Option<String>,

    // Quantidade inicial: definida aqui uma única vez. Edições posteriores
    // de saldo passam pelo registro de transações.
    #[validate(range(min = 0, message = "A quantidade não pode ser negativa."))]
    #[serde(default)]
    pub quantity: i32,

    #[validate(required(message = "O campo 'warehouse' é obrigatório."))]
    pub warehouse: Option<Warehouse>,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    pub cost_price: Decimal,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    pub online_price: Decimal,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    pub offline_price: Decimal,

    pub image_url: Option<String>,
}

impl CreateItemPayload {
    pub fn into_new_item(self) -> NewItem {
        NewItem {
            category: self.category.unwrap(),
            model_number: self.model_number,
            specification: self.specification,
            color: self.color,
            quantity: self.quantity,
            warehouse: self.warehouse.unwrap(),
            cost_price: self.cost_price,
            online_price: self.online_price,
            offline_price: self.offline_price,
            image_url: self.image_url,
        }
    }
}

// ---
// Query: filtros de listagem
// ---
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItemsQuery {
    pub keyword: Option<String>,
    pub category: Option<ItemCategory>,
    pub warehouse: Option<Warehouse>,
}

impl ListItemsQuery {
    pub fn into_filter(self) -> ItemFilter {
        ItemFilter {
            keyword: self.keyword,
            category: self.category,
            warehouse: self.warehouse,
        }
    }
}

// ---
// Handler: create_item
// ---
#[utoipa::path(
    post,
    path = "/api/inventory/items",
    tag = "Inventory",
    request_body = CreateItemPayload,
    responses(
        (status = 201, description = "Item criado"),
        (status = 422, description = "Payload inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_item(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Json(payload): Json<CreateItemPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let new_item = app_state
        .catalog_service
        .create_item(&app_state.db_pool, payload.into_new_item())
        .await?;

    Ok((StatusCode::CREATED, Json(Envelope::ok(new_item))))
}

// ---
// Handler: get_all_items
// ---
#[utoipa::path(
    get,
    path = "/api/inventory/items",
    tag = "Inventory",
    responses(
        (status = 200, description = "Itens do catálogo, filtráveis por palavra-chave, categoria e local")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_all_items(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Query(query): Query<ListItemsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let items = app_state
        .catalog_service
        .list_items(&query.into_filter())
        .await?;

    Ok((StatusCode::OK, Json(Envelope::ok(items))))
}

// ---
// Handler: get_item
// ---
#[utoipa::path(
    get,
    path = "/api/inventory/items/{id}",
    tag = "Inventory",
    responses(
        (status = 200, description = "Item"),
        (status = 404, description = "Item não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_item(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let item = app_state
        .catalog_service
        .get_item(id)
        .await?;

    Ok((StatusCode::OK, Json(Envelope::ok(item))))
}

// ---
// Handler: update_item
// ---
// O patch não tem campo de quantidade (e campos desconhecidos são
// rejeitados na desserialização): saldo só muda via transação.
#[utoipa::path(
    put,
    path = "/api/inventory/items/{id}",
    tag = "Inventory",
    request_body = ItemPatch,
    responses(
        (status = 200, description = "Item atualizado"),
        (status = 404, description = "Item não encontrado"),
        (status = 422, description = "Payload inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_item(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(patch): Json<ItemPatch>,
) -> Result<impl IntoResponse, AppError> {
    patch.validate()?;

    let updated = app_state
        .catalog_service
        .update_item(&app_state.db_pool, id, patch)
        .await?;

    Ok((StatusCode::OK, Json(Envelope::ok(updated))))
}

// ---
// Handler: delete_item
// ---
#[utoipa::path(
    delete,
    path = "/api/inventory/items/{id}",
    tag = "Inventory",
    responses(
        (status = 200, description = "Item removido"),
        (status = 404, description = "Item não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_item(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .catalog_service
        .delete_item(&app_state.db_pool, id)
        .await?;

    Ok((StatusCode::OK, Json(Envelope::ok_empty())))
}

// ---
// Handler: price_history
// ---
#[utoipa::path(
    get,
    path = "/api/inventory/items/{id}/price-history",
    tag = "Inventory",
    responses(
        (status = 200, description = "Histórico de alterações de preço do item")
    ),
    security(("api_jwt" = []))
)]
pub async fn price_history(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let events = app_state
        .catalog_service
        .price_history(id)
        .await?;

    Ok((StatusCode::OK, Json(Envelope::ok(events))))
}
