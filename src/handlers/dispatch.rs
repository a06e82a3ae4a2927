// src/handlers/dispatch.rs
//
// Protocolo de ações do cliente mini-program: um único POST com
// `{action, data}`, resposta sempre no envelope `{success, data?, error?}`.
// Cada ação reaproveita os mesmos payloads e services das rotas REST.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, response::Envelope},
    config::AppState,
    handlers::costs::CreateCostPayload,
    handlers::inventory::{CreateItemPayload, ListItemsQuery},
    handlers::stats::DateRangeQuery,
    handlers::transactions::{ListTransactionsQuery, RecordTransactionPayload},
    middleware::auth::AuthenticatedUser,
    models::catalog::ItemPatch,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct ActionRequest {
    pub action: String,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub data: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IdPayload {
    id: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemIdPayload {
    item_id: Uuid,
}

// Desserializa o `data` da ação, apontando o problema para o chamador.
fn parse<T: DeserializeOwned>(data: Value) -> Result<T, AppError> {
    serde_json::from_value(data).map_err(|e| AppError::InvalidField {
        field: "data",
        message: format!("Dados da ação inválidos: {}", e),
    })
}

// Variante para ações em que `data` pode vir vazio (listagens, resumos).
fn parse_or_default<T: DeserializeOwned + Default>(data: Value) -> Result<T, AppError> {
    if data.is_null() {
        return Ok(T::default());
    }
    parse(data)
}

#[utoipa::path(
    post,
    path = "/api/dispatch",
    tag = "Dispatch",
    request_body = ActionRequest,
    responses(
        (status = 200, description = "Resultado da ação no envelope {success, data?}"),
        (status = 422, description = "Ação desconhecida ou dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn dispatch(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Json(request): Json<ActionRequest>,
) -> Result<Response, AppError> {
    let pool = &app_state.db_pool;

    let response = match request.action.as_str() {
        // --- Catálogo ---
        "inventory.list" => {
            let query: ListItemsQuery = parse_or_default(request.data)?;
            let items = app_state
                .catalog_service
                .list_items(&query.into_filter())
                .await?;
            Json(Envelope::ok(items)).into_response()
        }
        "inventory.add" => {
            let payload: CreateItemPayload = parse(request.data)?;
            payload.validate()?;
            let item = app_state
                .catalog_service
                .create_item(pool, payload.into_new_item())
                .await?;
            Json(Envelope::ok(item)).into_response()
        }
        "inventory.update" => {
            // `data` vem achatado: {id, ...campos parciais}. Separamos o id
            // e o resto precisa caber no patch (que rejeita `quantity`).
            let Value::Object(mut fields) = request.data else {
                return Err(AppError::InvalidField {
                    field: "data",
                    message: "Dados da ação devem ser um objeto.".into(),
                });
            };
            let id_value = fields.remove("id").ok_or(AppError::InvalidField {
                field: "id",
                message: "O campo 'id' é obrigatório.".into(),
            })?;
            let id: Uuid = parse(id_value)?;
            let patch: ItemPatch = parse(Value::Object(fields))?;
            patch.validate()?;
            app_state.catalog_service.update_item(pool, id, patch).await?;
            Json(Envelope::ok_empty()).into_response()
        }
        "inventory.delete" => {
            let payload: IdPayload = parse(request.data)?;
            app_state.catalog_service.delete_item(pool, payload.id).await?;
            Json(Envelope::ok_empty()).into_response()
        }

        // --- Razão ---
        "transactions.add" => {
            let payload: RecordTransactionPayload = parse(request.data)?;
            payload.validate()?;
            let record = app_state
                .transaction_service
                .record_transaction(pool, payload.into_new_transaction())
                .await?;
            Json(Envelope::ok(record)).into_response()
        }
        "transactions.list" => {
            let query: ListTransactionsQuery = parse_or_default(request.data)?;
            let records = app_state
                .transaction_service
                .list(&query.into_filter())
                .await?;
            Json(Envelope::ok(records)).into_response()
        }
        "transactions.getByItem" => {
            let payload: ItemIdPayload = parse(request.data)?;
            let records = app_state
                .transaction_service
                .list_by_item(payload.item_id)
                .await?;
            Json(Envelope::ok(records)).into_response()
        }
        "transactions.stats" => {
            let range: DateRangeQuery = parse_or_default(request.data)?;
            let stats = app_state
                .stats_service
                .sales_stats(pool, range.date_from, range.date_to)
                .await?;
            Json(Envelope::ok(stats)).into_response()
        }

        // --- Custos ---
        "costs.add" => {
            let payload: CreateCostPayload = parse(request.data)?;
            payload.validate()?;
            let cost = app_state
                .cost_service
                .create(
                    pool,
                    &payload.name,
                    payload.amount,
                    payload.category.unwrap(),
                    payload.note.as_deref(),
                )
                .await?;
            Json(Envelope::ok(cost)).into_response()
        }
        "costs.list" => {
            let costs = app_state.cost_service.list().await?;
            Json(Envelope::ok(costs)).into_response()
        }
        "costs.delete" => {
            let payload: IdPayload = parse(request.data)?;
            app_state.cost_service.delete(pool, payload.id).await?;
            Json(Envelope::ok_empty()).into_response()
        }
        "costs.summary" => {
            let summary = app_state.stats_service.cost_summary().await?;
            Json(Envelope::ok(summary)).into_response()
        }

        unknown => {
            return Err(AppError::InvalidField {
                field: "action",
                message: format!("Ação desconhecida: '{}'.", unknown),
            });
        }
    };

    Ok(response)
}
