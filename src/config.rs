// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    db::{CatalogRepository, CostRepository, LedgerRepository, StatsRepository, UserRepository},
    services::{AuthService, CatalogService, CostService, StatsService, TransactionService},
};

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_secret: String,
    pub auth_service: AuthService,
    pub catalog_service: CatalogService,
    pub transaction_service: TransactionService,
    pub cost_service: CostService,
    pub stats_service: StatsService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let catalog_repo = CatalogRepository::new(db_pool.clone());
        let ledger_repo = LedgerRepository::new(db_pool.clone());
        let cost_repo = CostRepository::new(db_pool.clone());
        let stats_repo = StatsRepository::new(db_pool.clone());
        let user_repo = UserRepository::new(db_pool.clone());

        let catalog_service = CatalogService::new(catalog_repo.clone());
        let transaction_service = TransactionService::new(catalog_repo, ledger_repo);
        let cost_service = CostService::new(cost_repo);
        let stats_service = StatsService::new(stats_repo);
        let auth_service = AuthService::new(user_repo, jwt_secret.clone(), db_pool.clone());

        Ok(Self {
            db_pool,
            jwt_secret,
            auth_service,
            catalog_service,
            transaction_service,
            cost_service,
            stats_service,
        })
    }
}
