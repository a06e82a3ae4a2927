// src/handlers/stats.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::{
    common::{error::AppError, response::Envelope},
    config::AppState,
    middleware::auth::AuthenticatedUser,
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeQuery {
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}

// ---
// Handler: sales_stats
// ---
// Vendas por moeda (só saídas; devoluções não entram nesta visão) e a
// contagem de lançamentos do intervalo.
#[utoipa::path(
    get,
    path = "/api/transactions/stats",
    tag = "Stats",
    responses(
        (status = 200, description = "Somatório de vendas por moeda (CNY/SGD/TWD sempre presentes) e total de lançamentos")
    ),
    security(("api_jwt" = []))
)]
pub async fn sales_stats(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Query(range): Query<DateRangeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let stats = app_state
        .stats_service
        .sales_stats(&app_state.db_pool, range.date_from, range.date_to)
        .await?;

    Ok((StatusCode::OK, Json(Envelope::ok(stats))))
}

// ---
// Handler: cost_summary
// ---
#[utoipa::path(
    get,
    path = "/api/costs/summary",
    tag = "Stats",
    responses(
        (status = 200, description = "Custos agrupados por categoria e total geral")
    ),
    security(("api_jwt" = []))
)]
pub async fn cost_summary(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let summary = app_state
        .stats_service
        .cost_summary()
        .await?;

    Ok((StatusCode::OK, Json(Envelope::ok(summary))))
}
