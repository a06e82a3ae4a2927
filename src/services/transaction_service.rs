// src/services/transaction_service.rs

use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CatalogRepository, LedgerRepository},
    db::ledger_repo::LedgerFilter,
    models::catalog::Item,
    models::ledger::{
        Direction, NewTransaction, TransactionMethod, TransactionPlan, TransactionRecord,
    },
};

// Ponto de entrada único para registrar movimentação de estoque.
// Só este serviço insere no razão e só ele ajusta `items.quantity`
// depois da criação do item.
#[derive(Clone)]
pub struct TransactionService {
    catalog_repo: CatalogRepository,
    ledger_repo: LedgerRepository,
}

impl TransactionService {
    pub fn new(catalog_repo: CatalogRepository, ledger_repo: LedgerRepository) -> Self {
        Self {
            catalog_repo,
            ledger_repo,
        }
    }

    // --- REGISTRAR MOVIMENTAÇÃO ---
    //
    // Tudo dentro de UMA transação SQL: o SELECT ... FOR UPDATE serializa
    // chamadas concorrentes sobre o mesmo item (duas vendas simultâneas não
    // passam ambas na checagem de saldo), e o par insert + ajuste de saldo
    // ou entra inteiro ou não entra.
    pub async fn record_transaction<'e, E>(
        &self,
        executor: E,
        input: NewTransaction,
    ) -> Result<TransactionRecord, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        // 1. Carrega e trava o item
        let item = self
            .catalog_repo
            .get_item_for_update(&mut *tx, input.item_id)
            .await?
            .ok_or(AppError::ItemNotFound)?;

        // 2. Carrega a venda de origem, se a devolução apontar para uma
        let linked = match input.linked_transaction_id {
            Some(linked_id) => Some(
                self.ledger_repo
                    .get_by_id(&mut *tx, linked_id)
                    .await?
                    .ok_or(AppError::TransactionNotFound)?,
            ),
            None => None,
        };

        // 3. Passo puro: valida a intenção e deriva delta / valor final / moeda
        let plan = plan_transaction(&input, &item, linked.as_ref())?;

        // 4. Grava o lançamento no razão
        let record = self.ledger_repo.insert(&mut *tx, &input, &plan).await?;

        // 5. Aplica o delta ao saldo. O UPDATE é condicionado a
        //    `quantity + delta >= 0`; zero linhas aqui significa que razão e
        //    estoque divergiriam, então abortamos e o rollback descarta o
        //    lançamento do passo 4.
        let updated = self
            .catalog_repo
            .apply_quantity_delta(&mut *tx, input.item_id, plan.delta)
            .await?;
        if updated != 1 {
            return Err(AppError::Consistency);
        }

        tx.commit().await?;

        tracing::info!(
            "Movimentação registrada: item {} {:?} x{}",
            record.item_id,
            record.method,
            record.quantity
        );
        Ok(record)
    }

    // --- LEITURAS DO RAZÃO ---

    pub async fn list(&self, filter: &LedgerFilter) -> Result<Vec<TransactionRecord>, AppError> {
        self.ledger_repo.list(filter).await
    }

    pub async fn list_by_item(&self, item_id: Uuid) -> Result<Vec<TransactionRecord>, AppError> {
        self.ledger_repo.list_by_item(item_id).await
    }
}

// ---
// Planejamento (puro, sem banco)
// ---

pub fn signed_delta(direction: Direction, quantity: i32) -> i32 {
    match direction {
        Direction::Inbound => quantity,
        Direction::Outbound => -quantity,
    }
}

// finalAmount = amount - discount. O desconto pode ser negativo (acréscimo)
// e pode ultrapassar o valor — o sinal do resultado não é restringido.
pub fn final_amount(
    amount: Option<rust_decimal::Decimal>,
    discount: Option<rust_decimal::Decimal>,
) -> Option<rust_decimal::Decimal> {
    amount.map(|a| a - discount.unwrap_or_default())
}

// Moeda efetiva: canais de moeda fixa ignoram o que o chamador mandou;
// só os marketplaces aceitam escolha livre (com padrão do canal).
pub fn resolve_currency(
    method: TransactionMethod,
    requested: Option<crate::models::ledger::Currency>,
) -> Option<crate::models::ledger::Currency> {
    match method.fixed_currency() {
        Some(fixed) => Some(fixed),
        None => requested.or(method.default_currency()),
    }
}

// Valida a intenção contra o estado atual do item (e a venda de origem,
// para devoluções) e deriva o plano. Nenhum efeito colateral: falhou aqui,
// nada foi escrito.
pub fn plan_transaction(
    input: &NewTransaction,
    item: &Item,
    linked: Option<&TransactionRecord>,
) -> Result<TransactionPlan, AppError> {
    if input.quantity < 1 {
        return Err(AppError::InvalidField {
            field: "quantity",
            message: "A quantidade deve ser um inteiro maior ou igual a 1.".into(),
        });
    }

    if input.method.direction() != input.direction {
        return Err(AppError::InvalidField {
            field: "method",
            message: format!(
                "O método {:?} não pertence à direção {:?}.",
                input.method, input.direction
            ),
        });
    }

    if let Some(amount) = input.amount {
        if amount.is_sign_negative() {
            return Err(AppError::InvalidField {
                field: "amount",
                message: "O valor não pode ser negativo.".into(),
            });
        }
    }

    if input.method == TransactionMethod::Return && input.return_status.is_none() {
        return Err(AppError::InvalidField {
            field: "returnStatus",
            message: "Devoluções exigem o estado da peça (INTACT ou DAMAGED).".into(),
        });
    }

    if input.linked_transaction_id.is_some() && input.method != TransactionMethod::Return {
        return Err(AppError::InvalidField {
            field: "linkedTransactionId",
            message: "Vínculo com venda de origem só vale para devoluções.".into(),
        });
    }

    if let Some(origin) = linked {
        if origin.direction != Direction::Outbound {
            return Err(AppError::InvalidField {
                field: "linkedTransactionId",
                message: "A transação vinculada precisa ser uma saída.".into(),
            });
        }
        if origin.item_id != input.item_id {
            return Err(AppError::InvalidField {
                field: "linkedTransactionId",
                message: "A transação vinculada pertence a outro item.".into(),
            });
        }
        if input.quantity > origin.quantity {
            return Err(AppError::InvalidField {
                field: "quantity",
                message: format!(
                    "A devolução ({}) excede a quantidade da venda de origem ({}).",
                    input.quantity, origin.quantity
                ),
            });
        }
    }

    if input.direction == Direction::Outbound && item.quantity < input.quantity {
        return Err(AppError::InsufficientStock {
            available: item.quantity,
        });
    }

    // Moeda só é persistida quando há valor; e aí ela é obrigatória.
    let currency = match input.amount {
        Some(_) => {
            let resolved = resolve_currency(input.method, input.currency);
            if resolved.is_none() {
                return Err(AppError::InvalidField {
                    field: "currency",
                    message: "Informe a moeda quando houver valor.".into(),
                });
            }
            resolved
        }
        None => None,
    };

    Ok(TransactionPlan {
        delta: signed_delta(input.direction, input.quantity),
        final_amount: final_amount(input.amount, input.discount),
        currency,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::{ItemCategory, Warehouse};
    use crate::models::ledger::{Currency, ReturnStatus};
    use chrono::Utc;
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    fn item_with_stock(quantity: i32) -> Item {
        Item {
            id: Uuid::new_v4(),
            category: ItemCategory::Ring,
            model_number: "S925-A017".into(),
            specification: Some("6号".into()),
            color: Some("prata".into()),
            quantity,
            warehouse: Warehouse::Studio,
            cost_price: Decimal::new(3500, 2),
            online_price: Decimal::new(9900, 2),
            offline_price: Decimal::new(8900, 2),
            image_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn intent(direction: Direction, method: TransactionMethod, quantity: i32) -> NewTransaction {
        NewTransaction {
            item_id: Uuid::new_v4(),
            direction,
            method,
            quantity,
            amount: None,
            discount: None,
            currency: None,
            source: None,
            return_status: None,
            linked_transaction_id: None,
            note: None,
        }
    }

    fn outbound_record(item_id: Uuid, quantity: i32) -> TransactionRecord {
        TransactionRecord {
            id: Uuid::new_v4(),
            item_id,
            direction: Direction::Outbound,
            method: TransactionMethod::DirectSale,
            quantity,
            amount: Some(Decimal::new(30000, 2)),
            discount: None,
            final_amount: Some(Decimal::new(30000, 2)),
            currency: Some(Currency::Cny),
            source: None,
            return_status: None,
            linked_transaction_id: None,
            note: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn venda_direta_fixa_moeda_em_cny() {
        let item = item_with_stock(10);
        let mut input = intent(Direction::Outbound, TransactionMethod::DirectSale, 3);
        input.item_id = item.id;
        input.amount = Some(Decimal::new(30000, 2));
        // O chamador tenta forçar SGD; o canal manda.
        input.currency = Some(Currency::Sgd);

        let plan = plan_transaction(&input, &item, None).unwrap();
        assert_eq!(plan.currency, Some(Currency::Cny));
        assert_eq!(plan.delta, -3);
        assert_eq!(plan.final_amount, Some(Decimal::new(30000, 2)));
    }

    #[test]
    fn marketplace_aceita_moeda_do_chamador_e_tem_padrao() {
        let item = item_with_stock(10);
        let mut input = intent(Direction::Outbound, TransactionMethod::MarketplaceSg, 1);
        input.item_id = item.id;
        input.amount = Some(Decimal::new(4500, 2));

        // Sem moeda: padrão do canal
        let plan = plan_transaction(&input, &item, None).unwrap();
        assert_eq!(plan.currency, Some(Currency::Sgd));

        // Com moeda explícita: respeitada
        input.currency = Some(Currency::Twd);
        let plan = plan_transaction(&input, &item, None).unwrap();
        assert_eq!(plan.currency, Some(Currency::Twd));
    }

    #[test]
    fn desconto_negativo_aumenta_o_valor_final() {
        let item = item_with_stock(5);
        let mut input = intent(Direction::Outbound, TransactionMethod::DirectSale, 1);
        input.item_id = item.id;
        input.amount = Some(Decimal::new(10000, 2));
        input.discount = Some(Decimal::new(-500, 2));

        let plan = plan_transaction(&input, &item, None).unwrap();
        assert_eq!(plan.final_amount, Some(Decimal::new(10500, 2)));
    }

    #[test]
    fn desconto_maior_que_o_valor_produz_final_negativo() {
        let item = item_with_stock(5);
        let mut input = intent(Direction::Outbound, TransactionMethod::DirectSale, 1);
        input.item_id = item.id;
        input.amount = Some(Decimal::new(5000, 2));
        input.discount = Some(Decimal::new(8000, 2));

        // Comportamento observado do negócio: crédito de loja, sem clamp.
        let plan = plan_transaction(&input, &item, None).unwrap();
        assert_eq!(plan.final_amount, Some(Decimal::new(-3000, 2)));
    }

    #[test]
    fn saida_acima_do_saldo_falha_com_disponivel() {
        let item = item_with_stock(7);
        let mut input = intent(Direction::Outbound, TransactionMethod::DirectSale, 10);
        input.item_id = item.id;

        match plan_transaction(&input, &item, None) {
            Err(AppError::InsufficientStock { available }) => assert_eq!(available, 7),
            other => panic!("esperava InsufficientStock, veio {:?}", other.map(|p| p.delta)),
        }
    }

    #[test]
    fn metodo_de_entrada_com_direcao_de_saida_e_rejeitado() {
        let item = item_with_stock(10);
        let mut input = intent(Direction::Outbound, TransactionMethod::Procurement, 1);
        input.item_id = item.id;

        match plan_transaction(&input, &item, None) {
            Err(AppError::InvalidField { field, .. }) => assert_eq!(field, "method"),
            _ => panic!("esperava InvalidField(method)"),
        }
    }

    #[test]
    fn devolucao_sem_estado_da_peca_e_rejeitada() {
        let item = item_with_stock(0);
        let mut input = intent(Direction::Inbound, TransactionMethod::Return, 1);
        input.item_id = item.id;

        match plan_transaction(&input, &item, None) {
            Err(AppError::InvalidField { field, .. }) => assert_eq!(field, "returnStatus"),
            _ => panic!("esperava InvalidField(returnStatus)"),
        }
    }

    #[test]
    fn devolucao_limitada_pela_venda_de_origem() {
        let item = item_with_stock(0);
        let origin = outbound_record(item.id, 5);

        let mut input = intent(Direction::Inbound, TransactionMethod::Return, 5);
        input.item_id = item.id;
        input.return_status = Some(ReturnStatus::Intact);
        input.linked_transaction_id = Some(origin.id);

        // 5 de 5: ok, delta positivo
        let plan = plan_transaction(&input, &item, Some(&origin)).unwrap();
        assert_eq!(plan.delta, 5);

        // 6 de 5: excede a venda de origem
        input.quantity = 6;
        match plan_transaction(&input, &item, Some(&origin)) {
            Err(AppError::InvalidField { field, .. }) => assert_eq!(field, "quantity"),
            _ => panic!("esperava InvalidField(quantity)"),
        }
    }

    #[test]
    fn vinculo_fora_de_devolucao_e_rejeitado() {
        let item = item_with_stock(10);
        let mut input = intent(Direction::Inbound, TransactionMethod::Procurement, 1);
        input.item_id = item.id;
        input.linked_transaction_id = Some(Uuid::new_v4());

        match plan_transaction(&input, &item, None) {
            Err(AppError::InvalidField { field, .. }) => assert_eq!(field, "linkedTransactionId"),
            _ => panic!("esperava InvalidField(linkedTransactionId)"),
        }
    }

    #[test]
    fn entrada_com_valor_sem_moeda_e_rejeitada() {
        let item = item_with_stock(0);
        let mut input = intent(Direction::Inbound, TransactionMethod::Procurement, 10);
        input.item_id = item.id;
        input.amount = Some(Decimal::new(20000, 2));

        match plan_transaction(&input, &item, None) {
            Err(AppError::InvalidField { field, .. }) => assert_eq!(field, "currency"),
            _ => panic!("esperava InvalidField(currency)"),
        }
    }

    #[test]
    fn entrada_sem_valor_nao_persiste_moeda() {
        let item = item_with_stock(0);
        let mut input = intent(Direction::Inbound, TransactionMethod::Procurement, 20);
        input.item_id = item.id;
        input.source = Some("1688".into());

        let plan = plan_transaction(&input, &item, None).unwrap();
        assert_eq!(plan.delta, 20);
        assert_eq!(plan.currency, None);
        assert_eq!(plan.final_amount, None);
    }

    proptest! {
        // Lei do valor final: finalAmount == amount - discount, exatamente.
        #[test]
        fn lei_do_valor_final(amount_cents in 0i64..=10_000_000, discount_cents in -10_000_000i64..=10_000_000) {
            let amount = Decimal::new(amount_cents, 2);
            let discount = Decimal::new(discount_cents, 2);
            let result = final_amount(Some(amount), Some(discount)).unwrap();
            prop_assert_eq!(result, amount - discount);
        }

        // Conservação: saldo final == inicial + entradas - saídas, para
        // qualquer sequência de deltas aplicados.
        #[test]
        fn conservacao_de_estoque(movimentos in proptest::collection::vec((any::<bool>(), 1i32..=50), 0..40)) {
            let initial: i64 = 100_000;
            let mut saldo = initial;
            let mut entradas: i64 = 0;
            let mut saidas: i64 = 0;
            for (inbound, qty) in movimentos {
                let direction = if inbound { Direction::Inbound } else { Direction::Outbound };
                saldo += i64::from(signed_delta(direction, qty));
                if inbound { entradas += i64::from(qty) } else { saidas += i64::from(qty) }
            }
            prop_assert_eq!(saldo, initial + entradas - saidas);
        }
    }
}
