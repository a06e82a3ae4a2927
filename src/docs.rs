// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::get_me,
        handlers::auth::create_invite,

        // --- INVENTORY ---
        handlers::inventory::create_item,
        handlers::inventory::get_all_items,
        handlers::inventory::get_item,
        handlers::inventory::update_item,
        handlers::inventory::delete_item,
        handlers::inventory::price_history,

        // --- TRANSACTIONS ---
        handlers::transactions::record_transaction,
        handlers::transactions::list_transactions,
        handlers::transactions::get_by_item,

        // --- STATS ---
        handlers::stats::sales_stats,
        handlers::stats::cost_summary,

        // --- COSTS ---
        handlers::costs::create_cost,
        handlers::costs::list_costs,
        handlers::costs::delete_cost,

        // --- DISPATCH (mini-program) ---
        handlers::dispatch::dispatch,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::InviteCode,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Catálogo ---
            models::catalog::ItemCategory,
            models::catalog::Warehouse,
            models::catalog::PriceKind,
            models::catalog::Item,
            models::catalog::PriceEvent,
            models::catalog::ItemPatch,

            // --- Razão ---
            models::ledger::Direction,
            models::ledger::TransactionMethod,
            models::ledger::Currency,
            models::ledger::ReturnStatus,
            models::ledger::TransactionRecord,

            // --- Custos ---
            models::costs::CostCategory,
            models::costs::CostItem,

            // --- Stats ---
            models::stats::SalesStats,
            models::stats::CostBucket,
            models::stats::CostSummary,

            // --- Payloads ---
            handlers::inventory::CreateItemPayload,
            handlers::transactions::RecordTransactionPayload,
            handlers::costs::CreateCostPayload,
            handlers::dispatch::ActionRequest,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação, Registro e Convites"),
        (name = "Users", description = "Dados do Usuário"),
        (name = "Inventory", description = "Catálogo e Estoque"),
        (name = "Transactions", description = "Movimentações (Razão)"),
        (name = "Stats", description = "Agregações Financeiras"),
        (name = "Costs", description = "Lançamentos de Custo"),
        (name = "Dispatch", description = "Protocolo de ações do mini-program")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
