// tests/transaction_flow.rs
//
// Testes de ponta a ponta contra um Postgres real. Defina TEST_DATABASE_URL
// (ou DATABASE_URL) para rodar; sem ela os testes apenas avisam e passam.

use rust_decimal::Decimal;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use joalheria_backend::db::catalog_repo::NewItem;
use joalheria_backend::db::{CatalogRepository, LedgerRepository, StatsRepository};
use joalheria_backend::common::error::AppError;
use joalheria_backend::models::catalog::{Item, ItemCategory, Warehouse};
use joalheria_backend::models::ledger::{
    Currency, Direction, NewTransaction, ReturnStatus, TransactionMethod,
};
use joalheria_backend::services::{CatalogService, StatsService, TransactionService};

async fn test_pool() -> Option<PgPool> {
    let url = std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok();
    let Some(url) = url else {
        eprintln!("TEST_DATABASE_URL não definida; pulando teste de integração.");
        return None;
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("Falha ao conectar no banco de teste");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Falha ao rodar as migrações no banco de teste");

    Some(pool)
}

fn services(pool: &PgPool) -> (CatalogService, TransactionService, StatsService) {
    let catalog_repo = CatalogRepository::new(pool.clone());
    let ledger_repo = LedgerRepository::new(pool.clone());
    let stats_repo = StatsRepository::new(pool.clone());
    (
        CatalogService::new(catalog_repo.clone()),
        TransactionService::new(catalog_repo, ledger_repo),
        StatsService::new(stats_repo),
    )
}

async fn seed_item(catalog: &CatalogService, pool: &PgPool, quantity: i32) -> Item {
    catalog
        .create_item(
            pool,
            NewItem {
                category: ItemCategory::Ring,
                // Modelo único por item para os asserts não colidirem entre testes
                model_number: format!("TESTE-{}", Uuid::new_v4().simple()),
                specification: None,
                color: Some("prata".into()),
                quantity,
                warehouse: Warehouse::Studio,
                cost_price: Decimal::new(3500, 2),
                online_price: Decimal::new(9900, 2),
                offline_price: Decimal::new(8900, 2),
                image_url: None,
            },
        )
        .await
        .expect("Falha ao criar item de teste")
}

fn sale_intent(item_id: Uuid, quantity: i32, amount: Option<Decimal>) -> NewTransaction {
    NewTransaction {
        item_id,
        direction: Direction::Outbound,
        method: TransactionMethod::DirectSale,
        quantity,
        amount,
        discount: None,
        currency: None,
        source: None,
        return_status: None,
        linked_transaction_id: None,
        note: None,
    }
}

// Cenário: venda direta baixa o saldo, fixa CNY e calcula o valor final.
#[tokio::test]
async fn venda_direta_baixa_saldo_e_fixa_cny() {
    let Some(pool) = test_pool().await else { return };
    let (catalog, transactions, _) = services(&pool);

    let item = seed_item(&catalog, &pool, 10).await;

    let record = transactions
        .record_transaction(&pool, sale_intent(item.id, 3, Some(Decimal::new(30000, 2))))
        .await
        .expect("A venda deveria ter sido registrada");

    assert_eq!(record.final_amount, Some(Decimal::new(30000, 2)));
    assert_eq!(record.currency, Some(Currency::Cny));

    let after = catalog.get_item(item.id).await.unwrap();
    assert_eq!(after.quantity, 7);

    // Continuação: pedir 10 com 7 em estoque falha carregando o disponível,
    // sem mexer no saldo nem gravar lançamento.
    let result = transactions
        .record_transaction(&pool, sale_intent(item.id, 10, None))
        .await;
    match result {
        Err(AppError::InsufficientStock { available }) => assert_eq!(available, 7),
        other => panic!("esperava InsufficientStock, veio {:?}", other.is_ok()),
    }

    let after = catalog.get_item(item.id).await.unwrap();
    assert_eq!(after.quantity, 7);
    let history = transactions.list_by_item(item.id).await.unwrap();
    assert_eq!(history.len(), 1);
}

// Cenário: entrada de compra sobe o saldo e preserva a procedência.
#[tokio::test]
async fn entrada_de_compra_sobe_saldo_e_guarda_procedencia() {
    let Some(pool) = test_pool().await else { return };
    let (catalog, transactions, _) = services(&pool);

    let item = seed_item(&catalog, &pool, 0).await;

    let record = transactions
        .record_transaction(
            &pool,
            NewTransaction {
                source: Some("1688".into()),
                direction: Direction::Inbound,
                method: TransactionMethod::Procurement,
                quantity: 20,
                ..sale_intent(item.id, 20, None)
            },
        )
        .await
        .expect("A entrada deveria ter sido registrada");

    assert_eq!(record.source.as_deref(), Some("1688"));

    let after = catalog.get_item(item.id).await.unwrap();
    assert_eq!(after.quantity, 20);
}

// Cenário: devolução vinculada à venda de origem, limitada pela quantidade dela.
#[tokio::test]
async fn devolucao_vinculada_respeita_a_venda_de_origem() {
    let Some(pool) = test_pool().await else { return };
    let (catalog, transactions, _) = services(&pool);

    let item = seed_item(&catalog, &pool, 10).await;

    let sale = transactions
        .record_transaction(&pool, sale_intent(item.id, 5, Some(Decimal::new(50000, 2))))
        .await
        .unwrap();
    assert_eq!(catalog.get_item(item.id).await.unwrap().quantity, 5);

    let mut return_intent = NewTransaction {
        direction: Direction::Inbound,
        method: TransactionMethod::Return,
        return_status: Some(ReturnStatus::Intact),
        linked_transaction_id: Some(sale.id),
        ..sale_intent(item.id, 5, None)
    };

    transactions
        .record_transaction(&pool, return_intent.clone())
        .await
        .expect("A devolução de 5 deveria passar");
    assert_eq!(catalog.get_item(item.id).await.unwrap().quantity, 10);

    // 6 unidades numa venda de 5: rejeitado, saldo intacto.
    return_intent.quantity = 6;
    let result = transactions.record_transaction(&pool, return_intent).await;
    match result {
        Err(AppError::InvalidField { field, .. }) => assert_eq!(field, "quantity"),
        other => panic!("esperava InvalidField(quantity), veio {:?}", other.is_ok()),
    }
    assert_eq!(catalog.get_item(item.id).await.unwrap().quantity, 10);
}

// Conservação: saldo final == inicial + entradas - saídas, após uma sequência.
#[tokio::test]
async fn conservacao_do_saldo_apos_sequencia() {
    let Some(pool) = test_pool().await else { return };
    let (catalog, transactions, _) = services(&pool);

    let item = seed_item(&catalog, &pool, 100).await;

    let moves = [
        (Direction::Inbound, TransactionMethod::Handmade, 20),
        (Direction::Outbound, TransactionMethod::MarketplaceSg, 30),
        (Direction::Inbound, TransactionMethod::OtherInbound, 5),
        (Direction::Outbound, TransactionMethod::SocialChannel, 15),
    ];
    for (direction, method, quantity) in moves {
        transactions
            .record_transaction(
                &pool,
                NewTransaction {
                    direction,
                    method,
                    quantity,
                    ..sale_intent(item.id, quantity, None)
                },
            )
            .await
            .unwrap();
    }

    let after = catalog.get_item(item.id).await.unwrap();
    assert_eq!(after.quantity, 100 + 20 + 5 - 30 - 15);
    assert_eq!(
        transactions.list_by_item(item.id).await.unwrap().len(),
        moves.len()
    );
}

// Duas vendas concorrentes do mesmo item não podem passar ambas na checagem
// de saldo: o lock de linha serializa e exatamente uma vence.
#[tokio::test]
async fn vendas_concorrentes_nao_vendem_alem_do_saldo() {
    let Some(pool) = test_pool().await else { return };
    let (catalog, transactions, _) = services(&pool);

    let item = seed_item(&catalog, &pool, 1).await;

    let a = transactions.record_transaction(&pool, sale_intent(item.id, 1, None));
    let b = transactions.record_transaction(&pool, sale_intent(item.id, 1, None));
    let (ra, rb) = tokio::join!(a, b);

    let successes = [&ra, &rb].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exatamente uma venda deveria vencer");
    for result in [ra, rb] {
        if let Err(e) = result {
            assert!(matches!(e, AppError::InsufficientStock { available: 0 }));
        }
    }

    assert_eq!(catalog.get_item(item.id).await.unwrap().quantity, 0);
}

// Rollback na fronteira de armazenamento: um lançamento inserido numa
// transação abortada nunca fica visível para leituras posteriores.
#[tokio::test]
async fn lancamento_de_transacao_abortada_nao_fica_visivel() {
    let Some(pool) = test_pool().await else { return };
    let (catalog, transactions, _) = services(&pool);

    let item = seed_item(&catalog, &pool, 10).await;

    let mut tx = pool.begin().await.unwrap();
    sqlx::query(
        r#"
        INSERT INTO transactions (item_id, direction, method, quantity)
        VALUES ($1, 'OUTBOUND', 'DIRECT_SALE', 3)
        "#,
    )
    .bind(item.id)
    .execute(&mut *tx)
    .await
    .unwrap();
    tx.rollback().await.unwrap();

    let history = transactions.list_by_item(item.id).await.unwrap();
    assert!(history.is_empty(), "o lançamento abortado vazou para a leitura");
    assert_eq!(catalog.get_item(item.id).await.unwrap().quantity, 10);
}

// Agregação: idempotente sem escritas no meio, e a soma dos buckets bate
// com a soma dos finalAmounts de saída no banco.
#[tokio::test]
async fn agregacao_idempotente_e_consistente_com_o_razao() {
    let Some(pool) = test_pool().await else { return };
    let (catalog, transactions, stats) = services(&pool);

    let item = seed_item(&catalog, &pool, 50).await;
    transactions
        .record_transaction(&pool, sale_intent(item.id, 2, Some(Decimal::new(20000, 2))))
        .await
        .unwrap();
    transactions
        .record_transaction(
            &pool,
            NewTransaction {
                method: TransactionMethod::MarketplaceTw,
                amount: Some(Decimal::new(8800, 2)),
                ..sale_intent(item.id, 1, Some(Decimal::new(8800, 2)))
            },
        )
        .await
        .unwrap();

    let first = stats.sales_stats(&pool, None, None).await.unwrap();
    let second = stats.sales_stats(&pool, None, None).await.unwrap();
    assert_eq!(first.sales_by_currency, second.sales_by_currency);
    assert_eq!(first.total_records, second.total_records);

    // As três moedas sempre presentes
    for currency in Currency::ALL {
        assert!(first.sales_by_currency.contains_key(&currency));
    }

    let bucket_sum: Decimal = first.sales_by_currency.values().copied().sum();
    let ledger_sum: Decimal = sqlx::query_scalar(
        r#"
        SELECT COALESCE(SUM(final_amount), 0) FROM transactions
        WHERE direction = 'OUTBOUND' AND final_amount IS NOT NULL AND currency IS NOT NULL
        "#,
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(bucket_sum, ledger_sum);
}

// O patch de item não tem como expressar quantidade; e mudanças de preço
// deixam rastro no histórico.
#[tokio::test]
async fn patch_rejeita_quantidade_e_loga_mudanca_de_preco() {
    let Some(pool) = test_pool().await else { return };
    let (catalog, _, _) = services(&pool);

    let item = seed_item(&catalog, &pool, 4).await;

    // Tentativa de editar quantity via JSON: rejeitada na desserialização.
    let sneaky: Result<joalheria_backend::models::catalog::ItemPatch, _> =
        serde_json::from_value(serde_json::json!({ "quantity": 999 }));
    assert!(sneaky.is_err(), "o patch aceitou 'quantity'");

    let patch: joalheria_backend::models::catalog::ItemPatch =
        serde_json::from_value(serde_json::json!({ "onlinePrice": 129.00 })).unwrap();
    let updated = catalog.update_item(&pool, item.id, patch).await.unwrap();
    assert_eq!(updated.online_price, Decimal::new(12900, 2));
    assert_eq!(updated.quantity, 4, "o patch não pode tocar no saldo");

    let history = catalog.price_history(item.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].old_price, Decimal::new(9900, 2));
    assert_eq!(history[0].new_price, Decimal::new(12900, 2));
}
