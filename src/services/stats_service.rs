// src/services/stats_service.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, Postgres};
use std::collections::BTreeMap;

use crate::{
    common::error::AppError,
    db::StatsRepository,
    models::ledger::Currency,
    models::stats::{CostSummary, CurrencyBucket, SalesStats},
};

#[derive(Clone)]
pub struct StatsService {
    repo: StatsRepository,
}

impl StatsService {
    pub fn new(repo: StatsRepository) -> Self {
        Self { repo }
    }

    // Visão somente-leitura. As duas consultas rodam na mesma transação
    // (snapshot consistente): soma e contagem nunca divergem entre si.
    pub async fn sales_stats<'e, E>(
        &self,
        executor: E,
        date_from: Option<DateTime<Utc>>,
        date_to: Option<DateTime<Utc>>,
    ) -> Result<SalesStats, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let buckets = self
            .repo
            .sales_by_currency(&mut *tx, date_from, date_to)
            .await?;
        let total_records = self
            .repo
            .count_transactions(&mut *tx, date_from, date_to)
            .await?;

        tx.commit().await?;

        Ok(SalesStats {
            sales_by_currency: fill_currency_buckets(buckets),
            total_records,
        })
    }

    pub async fn cost_summary(&self) -> Result<CostSummary, AppError> {
        let by_category = self.repo.cost_totals().await?;
        let total = by_category.iter().map(|bucket| bucket.value).sum();
        Ok(CostSummary { by_category, total })
    }
}

// CNY, SGD e TWD aparecem sempre como chave, zeradas quando o intervalo
// não tem registros daquela moeda (puro, testável).
pub fn fill_currency_buckets(buckets: Vec<CurrencyBucket>) -> BTreeMap<Currency, Decimal> {
    let mut map: BTreeMap<Currency, Decimal> = Currency::ALL
        .into_iter()
        .map(|currency| (currency, Decimal::ZERO))
        .collect();
    for bucket in buckets {
        map.insert(bucket.currency, bucket.total);
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buckets_vazios_viram_tres_moedas_zeradas() {
        let map = fill_currency_buckets(vec![]);
        assert_eq!(map.len(), 3);
        for currency in Currency::ALL {
            assert_eq!(map[&currency], Decimal::ZERO);
        }
    }

    #[test]
    fn bucket_presente_substitui_o_zero() {
        let map = fill_currency_buckets(vec![CurrencyBucket {
            currency: Currency::Sgd,
            total: Decimal::new(12345, 2),
        }]);
        assert_eq!(map[&Currency::Sgd], Decimal::new(12345, 2));
        assert_eq!(map[&Currency::Cny], Decimal::ZERO);
        assert_eq!(map[&Currency::Twd], Decimal::ZERO);
        // A soma dos buckets é a soma do que entrou.
        let soma: Decimal = map.values().copied().sum();
        assert_eq!(soma, Decimal::new(12345, 2));
    }
}
