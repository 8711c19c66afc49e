use std::collections::HashSet;

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use engine::{
    Category, Engine, EngineError, Money, Transaction, TransactionKind, TransactionListFilter,
    TransactionNew, TransactionPatch,
};

async fn engine() -> Engine {
    Engine::builder().build().await.unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn new_tx(date: NaiveDate, category: Category, amount: Money) -> TransactionNew {
    TransactionNew {
        date,
        description: "Mercado".to_string(),
        category,
        amount,
        kind: None,
        is_paid: true,
    }
}

#[tokio::test]
async fn create_derives_kind_and_get_returns_it() {
    let engine = engine().await;

    let id = engine
        .create_transaction(
            "alice",
            new_tx(date(2024, 7, 5), Category::Food, Money::new(dec!(-82.40))),
        )
        .await
        .unwrap();

    let tx = engine.transaction("alice", id).await.unwrap();
    assert_eq!(tx.kind, TransactionKind::Expense);
    assert_eq!(tx.description, "Mercado");
    assert!(tx.is_paid);
}

#[tokio::test]
async fn create_rejects_contradicting_kind() {
    let engine = engine().await;
    let mut cmd = new_tx(date(2024, 7, 5), Category::Food, Money::new(dec!(-10)));
    cmd.kind = Some(TransactionKind::Income);

    let err = engine.create_transaction("alice", cmd).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
    assert!(engine.store().transactions("alice", None).await.is_empty());
}

#[tokio::test]
async fn amounts_beyond_the_bound_are_rejected() {
    let engine = engine().await;
    let too_large = Money::MAX_ABS + Money::from_minor(1);

    let err = engine
        .create_transaction(
            "alice",
            new_tx(date(2024, 7, 5), Category::Income, too_large),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    let id = engine
        .create_transaction(
            "alice",
            new_tx(date(2024, 7, 5), Category::Food, -Money::MAX_ABS),
        )
        .await
        .unwrap();
    let patch = TransactionPatch {
        amount: Some(-too_large),
        ..TransactionPatch::default()
    };
    let err = engine
        .update_transaction("alice", id, patch)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    let mut huge = Transaction::new(date(2024, 7, 6), "Prêmio", Category::Income, Money::ZERO)
        .unwrap();
    huge.amount = too_large;
    let fine = Transaction::new(date(2024, 7, 6), "Feira", Category::Food, Money::from_minor(-100))
        .unwrap();
    let err = engine
        .import_transactions("alice", [fine, huge])
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    let stored = engine.store().transactions("alice", None).await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].amount, -Money::MAX_ABS);
}

#[tokio::test]
async fn users_are_isolated() {
    let engine = engine().await;
    let id = engine
        .create_transaction(
            "alice",
            new_tx(date(2024, 7, 5), Category::Food, Money::new(dec!(-10))),
        )
        .await
        .unwrap();

    assert!(matches!(
        engine.transaction("bob", id).await,
        Err(EngineError::KeyNotFound(_))
    ));
    assert!(matches!(
        engine.delete_transaction("bob", id).await,
        Err(EngineError::KeyNotFound(_))
    ));
    let bob = engine.monthly_totals("bob", "2024-07".parse().unwrap()).await;
    assert_eq!(bob.value.expenses, Money::ZERO);
}

#[tokio::test]
async fn update_patches_only_given_fields() {
    let engine = engine().await;
    let id = engine
        .create_transaction(
            "alice",
            new_tx(date(2024, 7, 5), Category::Food, Money::new(dec!(-10))),
        )
        .await
        .unwrap();

    let updated = engine
        .update_transaction(
            "alice",
            id,
            TransactionPatch {
                amount: Some(Money::new(dec!(250))),
                category: Some(Category::Income),
                ..TransactionPatch::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.amount, Money::new(dec!(250)));
    assert_eq!(updated.kind, TransactionKind::Income);
    assert_eq!(updated.category, Category::Income);
    assert_eq!(updated.date, date(2024, 7, 5));
    assert_eq!(updated.description, "Mercado");
}

#[tokio::test]
async fn update_rejects_kind_that_contradicts_stored_amount() {
    let engine = engine().await;
    let id = engine
        .create_transaction(
            "alice",
            new_tx(date(2024, 7, 5), Category::Food, Money::new(dec!(-10))),
        )
        .await
        .unwrap();

    let err = engine
        .update_transaction(
            "alice",
            id,
            TransactionPatch {
                kind: Some(TransactionKind::Income),
                ..TransactionPatch::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    let err = engine
        .update_transaction(
            "alice",
            id,
            TransactionPatch {
                description: Some("  ".to_string()),
                ..TransactionPatch::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    let tx = engine.transaction("alice", id).await.unwrap();
    assert_eq!(tx.kind, TransactionKind::Expense);
}

#[tokio::test]
async fn toggle_paid_moves_amount_in_and_out_of_balance() {
    let engine = engine().await;
    let id = engine
        .create_transaction(
            "alice",
            new_tx(date(2024, 7, 5), Category::Housing, Money::new(dec!(-1850.50))),
        )
        .await
        .unwrap();
    let as_of = date(2024, 7, 31);

    let balance = engine.balance("alice", as_of, false).await.unwrap();
    assert_eq!(balance.value, Money::new(dec!(-1850.50)));

    let tx = engine.toggle_transaction_paid("alice", id).await.unwrap();
    assert!(!tx.is_paid);
    let balance = engine.balance("alice", as_of, false).await.unwrap();
    assert_eq!(balance.value, Money::ZERO);
    let balance = engine.balance("alice", as_of, true).await.unwrap();
    assert_eq!(balance.value, Money::new(dec!(-1850.50)));
}

#[tokio::test]
async fn delete_removes_the_record() {
    let engine = engine().await;
    let id = engine
        .create_transaction(
            "alice",
            new_tx(date(2024, 7, 5), Category::Food, Money::new(dec!(-10))),
        )
        .await
        .unwrap();

    engine.delete_transaction("alice", id).await.unwrap();
    assert!(matches!(
        engine.transaction("alice", id).await,
        Err(EngineError::KeyNotFound(_))
    ));
}

#[tokio::test]
async fn pagination_visits_every_transaction_once_newest_first() {
    let engine = engine().await;
    let mut expected = HashSet::new();
    for day in 1..=9 {
        // Two transactions on most days to exercise the id tiebreak.
        for _ in 0..(1 + day % 2) {
            let id = engine
                .create_transaction(
                    "alice",
                    new_tx(date(2024, 7, day), Category::Food, Money::new(dec!(-1))),
                )
                .await
                .unwrap();
            expected.insert(id);
        }
    }

    let filter = TransactionListFilter::default();
    let mut seen: Vec<Transaction> = Vec::new();
    let mut cursor: Option<String> = None;
    loop {
        let (items, next) = engine
            .list_transactions_page("alice", 4, cursor.as_deref(), &filter)
            .await
            .unwrap();
        assert!(items.len() <= 4);
        seen.extend(items);
        match next {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    let ids: HashSet<_> = seen.iter().map(|tx| tx.id).collect();
    assert_eq!(ids, expected);
    assert_eq!(seen.len(), expected.len());
    assert!(
        seen.windows(2)
            .all(|pair| (pair[0].date, pair[0].id) > (pair[1].date, pair[1].id))
    );
}

#[tokio::test]
async fn pagination_respects_inclusive_date_filter() {
    let engine = engine().await;
    for day in [1, 10, 20, 31] {
        engine
            .create_transaction(
                "alice",
                new_tx(date(2024, 7, day), Category::Food, Money::new(dec!(-1))),
            )
            .await
            .unwrap();
    }

    let filter = TransactionListFilter {
        from: Some(date(2024, 7, 10)),
        to: Some(date(2024, 7, 20)),
    };
    let (items, next) = engine
        .list_transactions_page("alice", 50, None, &filter)
        .await
        .unwrap();
    assert!(next.is_none());
    let dates: Vec<_> = items.iter().map(|tx| tx.date).collect();
    assert_eq!(dates, vec![date(2024, 7, 20), date(2024, 7, 10)]);
}

#[tokio::test]
async fn pagination_rejects_bad_input() {
    let engine = engine().await;
    let filter = TransactionListFilter::default();

    assert!(matches!(
        engine
            .list_transactions_page("alice", 10, Some("not a cursor!"), &filter)
            .await,
        Err(EngineError::InvalidCursor(_))
    ));
    assert!(matches!(
        engine.list_transactions_page("alice", 0, None, &filter).await,
        Err(EngineError::Validation(_))
    ));

    let reversed = TransactionListFilter {
        from: Some(date(2024, 7, 20)),
        to: Some(date(2024, 7, 10)),
    };
    assert!(matches!(
        engine.list_transactions_page("alice", 10, None, &reversed).await,
        Err(EngineError::InvalidRange(_))
    ));
}
