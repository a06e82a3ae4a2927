// src/services/cost_service.rs

use rust_decimal::Decimal;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CostRepository,
    models::costs::{CostCategory, CostItem},
};

#[derive(Clone)]
pub struct CostService {
    repo: CostRepository,
}

impl CostService {
    pub fn new(repo: CostRepository) -> Self {
        Self { repo }
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        name: &str,
        amount: Decimal,
        category: CostCategory,
        note: Option<&str>,
    ) -> Result<CostItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        if name.trim().is_empty() {
            return Err(AppError::InvalidField {
                field: "name",
                message: "O nome do custo é obrigatório.".into(),
            });
        }
        if amount <= Decimal::ZERO {
            return Err(AppError::InvalidField {
                field: "amount",
                message: "O valor do custo deve ser maior que zero.".into(),
            });
        }

        self.repo.create(executor, name, amount, category, note).await
    }

    pub async fn list(&self) -> Result<Vec<CostItem>, AppError> {
        self.repo.list().await
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let deleted = self.repo.delete(executor, id).await?;
        if deleted == 0 {
            return Err(AppError::CostItemNotFound);
        }
        Ok(())
    }
}
