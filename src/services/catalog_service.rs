// src/services/catalog_service.rs

use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::catalog_repo::{CatalogRepository, ItemFilter, NewItem},
    models::catalog::{Item, ItemPatch, PriceEvent, PriceKind},
};

#[derive(Clone)]
pub struct CatalogService {
    repo: CatalogRepository,
}

impl CatalogService {
    pub fn new(repo: CatalogRepository) -> Self {
        Self { repo }
    }

    // --- CREATE ---
    // A quantidade inicial entra aqui uma única vez; depois disso só o
    // serviço de transações mexe no saldo.
    pub async fn create_item<'e, E>(&self, executor: E, new: NewItem) -> Result<Item, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        if new.model_number.trim().is_empty() {
            return Err(AppError::InvalidField {
                field: "modelNumber",
                message: "O número do modelo é obrigatório.".into(),
            });
        }
        if new.quantity < 0 {
            return Err(AppError::InvalidField {
                field: "quantity",
                message: "A quantidade inicial não pode ser negativa.".into(),
            });
        }
        for (field, price) in [
            ("costPrice", new.cost_price),
            ("onlinePrice", new.online_price),
            ("offlinePrice", new.offline_price),
        ] {
            if price.is_sign_negative() {
                return Err(AppError::InvalidField {
                    field,
                    message: "O preço não pode ser negativo.".into(),
                });
            }
        }

        self.repo.create_item(executor, &new).await
    }

    // --- READ ---

    pub async fn get_item(&self, id: Uuid) -> Result<Item, AppError> {
        self.repo
            .get_item(id)
            .await?
            .ok_or(AppError::ItemNotFound)
    }

    pub async fn list_items(&self, filter: &ItemFilter) -> Result<Vec<Item>, AppError> {
        self.repo.list_items(filter).await
    }

    pub async fn price_history(&self, item_id: Uuid) -> Result<Vec<PriceEvent>, AppError> {
        self.repo.list_price_events(item_id).await
    }

    // --- UPDATE ---
    // Patch + histórico de preço na mesma transação: se o update falhar,
    // nenhum evento de preço órfão sobra.
    pub async fn update_item<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        patch: ItemPatch,
    ) -> Result<Item, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let current = self
            .repo
            .get_item_for_update(&mut *tx, id)
            .await?
            .ok_or(AppError::ItemNotFound)?;

        for (kind, old_price, new_price) in price_changes(&current, &patch) {
            self.repo
                .record_price_event(&mut *tx, id, kind, old_price, new_price)
                .await?;
        }

        let updated = self.repo.update_item(&mut *tx, id, &patch).await?;

        tx.commit().await?;
        Ok(updated)
    }

    // --- DELETE ---
    // Lançamentos do razão que apontam para o item são mantidos: o
    // histórico financeiro sobrevive à limpeza do catálogo.
    pub async fn delete_item<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let deleted = self.repo.delete_item(executor, id).await?;
        if deleted == 0 {
            return Err(AppError::ItemNotFound);
        }
        Ok(())
    }
}

// Diferença de preços entre o item atual e o patch (puro, testável).
pub fn price_changes(current: &Item, patch: &ItemPatch) -> Vec<(PriceKind, Decimal, Decimal)> {
    let candidates = [
        (PriceKind::Cost, current.cost_price, patch.cost_price),
        (PriceKind::Online, current.online_price, patch.online_price),
        (PriceKind::Offline, current.offline_price, patch.offline_price),
    ];
    candidates
        .into_iter()
        .filter_map(|(kind, old_price, new_price)| {
            new_price.and_then(|new_price| {
                (new_price != old_price).then_some((kind, old_price, new_price))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::{ItemCategory, Warehouse};
    use chrono::Utc;

    fn base_item() -> Item {
        Item {
            id: Uuid::new_v4(),
            category: ItemCategory::Necklace,
            model_number: "N-102".into(),
            specification: None,
            color: None,
            quantity: 3,
            warehouse: Warehouse::Shop,
            cost_price: Decimal::new(2000, 2),
            online_price: Decimal::new(5900, 2),
            offline_price: Decimal::new(4900, 2),
            image_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn patch_sem_precos_nao_gera_eventos() {
        let item = base_item();
        let patch = ItemPatch {
            color: Some("dourado".into()),
            ..ItemPatch::default()
        };
        assert!(price_changes(&item, &patch).is_empty());
    }

    #[test]
    fn preco_igual_nao_gera_evento_preco_novo_gera() {
        let item = base_item();
        let patch = ItemPatch {
            online_price: Some(Decimal::new(5900, 2)), // igual ao atual
            offline_price: Some(Decimal::new(5500, 2)), // mudou
            ..ItemPatch::default()
        };
        let changes = price_changes(&item, &patch);
        assert_eq!(changes.len(), 1);
        let (kind, old_price, new_price) = changes[0];
        assert_eq!(kind, PriceKind::Offline);
        assert_eq!(old_price, Decimal::new(4900, 2));
        assert_eq!(new_price, Decimal::new(5500, 2));
    }
}
