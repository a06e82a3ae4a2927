pub mod auth_service;
pub use auth_service::AuthService;
pub mod catalog_service;
pub use catalog_service::CatalogService;
pub mod cost_service;
pub use cost_service::CostService;
pub mod stats_service;
pub use stats_service::StatsService;
pub mod transaction_service;
pub use transaction_service::TransactionService;
