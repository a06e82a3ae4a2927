pub mod catalog_repo;
pub use catalog_repo::CatalogRepository;
pub mod ledger_repo;
pub use ledger_repo::LedgerRepository;
pub mod cost_repo;
pub use cost_repo::CostRepository;
pub mod stats_repo;
pub use stats_repo::StatsRepository;
pub mod user_repo;
pub use user_repo::UserRepository;
