mod common;

use engine::{
    CategoryKind, EngineError, FixedExpenseCmd, GoalCmd, GoalKind, GroupDimension, MoneyCents,
    Period, TransactionCmd, TransactionKind, TransactionListFilter,
};

use common::{date, engine_with_db};

#[tokio::test]
async fn amount_must_be_positive() {
    let (engine, _db) = engine_with_db().await;
    let err = engine
        .new_transaction(TransactionCmd::new(
            TransactionKind::Expense,
            date(2025, 11, 1),
            0,
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
}

#[tokio::test]
async fn amounts_above_the_cap_are_rejected() {
    let (engine, _db) = engine_with_db().await;
    let cap = MoneyCents::MAX_AMOUNT.cents();

    let err = engine
        .new_transaction(TransactionCmd::new(
            TransactionKind::Expense,
            date(2025, 11, 1),
            i64::MAX / 2 + 1,
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
    assert!(matches!(
        engine
            .new_fixed_expense(FixedExpenseCmd::new("Aluguel", cap + 1, 5))
            .await,
        Err(EngineError::InvalidAmount(_))
    ));
    assert!(matches!(
        engine
            .new_goal(GoalCmd::new("Casa", GoalKind::Savings, cap + 1, 2025, 1))
            .await,
        Err(EngineError::InvalidAmount(_))
    ));

    engine
        .new_transaction(TransactionCmd::new(
            TransactionKind::Expense,
            date(2025, 11, 1),
            cap,
        ))
        .await
        .unwrap();
    engine
        .new_transaction(TransactionCmd::new(
            TransactionKind::Expense,
            date(2025, 11, 2),
            cap,
        ))
        .await
        .unwrap();
    let dashboard = engine.dashboard(Period::new(2025, 11).unwrap()).await.unwrap();
    assert_eq!(dashboard.total_expenses_minor, 2 * cap);
}

#[tokio::test]
async fn category_kind_must_match() {
    let (engine, _db) = engine_with_db().await;
    let salary = engine
        .new_category("Salário", CategoryKind::Income)
        .await
        .unwrap();

    let err = engine
        .new_transaction(
            TransactionCmd::new(TransactionKind::Expense, date(2025, 11, 1), 1_000)
                .category(salary.id),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidKind(_)));

    engine
        .new_transaction(
            TransactionCmd::new(TransactionKind::Income, date(2025, 11, 1), 1_000)
                .category(salary.id),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn unknown_references_are_rejected() {
    let (engine, _db) = engine_with_db().await;
    let err = engine
        .new_transaction(
            TransactionCmd::new(TransactionKind::Expense, date(2025, 11, 1), 1_000)
                .account(uuid::Uuid::new_v4()),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn recurrence_and_installments_are_normalized() {
    let (engine, _db) = engine_with_db().await;

    let mut cmd = TransactionCmd::new(TransactionKind::Expense, date(2025, 11, 10), 9_990)
        .description("  Academia  ");
    // Not recurring: the end date is dropped.
    cmd.recurrence_end = Some(date(2026, 1, 1));
    cmd.installments_remaining = Some(3);
    let tx = engine.new_transaction(cmd).await.unwrap();
    assert_eq!(tx.description.as_deref(), Some("Academia"));
    assert_eq!(tx.recurrence_end, None);
    assert_eq!(tx.installments_remaining, None);

    let err = engine
        .new_transaction(
            TransactionCmd::new(TransactionKind::Expense, date(2025, 11, 10), 9_990)
                .recurring_until(Some(date(2025, 10, 1))),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidDate(_)));

    let err = engine
        .new_transaction(
            TransactionCmd::new(TransactionKind::Expense, date(2025, 11, 10), 9_990)
                .installments(0),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
}

#[tokio::test]
async fn goal_movements_need_a_goal_and_get_a_description() {
    let (engine, _db) = engine_with_db().await;
    let goal = engine
        .new_goal(GoalCmd::new("Viagem", GoalKind::Savings, 500_000, 2025, 12))
        .await
        .unwrap();

    let err = engine
        .new_transaction(TransactionCmd::new(
            TransactionKind::GoalTransfer,
            date(2025, 11, 1),
            10_000,
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidKind(_)));

    let err = engine
        .new_transaction(
            TransactionCmd::new(TransactionKind::Expense, date(2025, 11, 1), 10_000)
                .goal(goal.id),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidKind(_)));

    let tx = engine
        .new_transaction(
            TransactionCmd::new(TransactionKind::GoalTransfer, date(2025, 11, 1), 10_000)
                .goal(goal.id)
                .description("ignored"),
        )
        .await
        .unwrap();
    assert_eq!(
        tx.description.as_deref(),
        Some("Transferência para meta: Viagem")
    );
}

#[tokio::test]
async fn list_filters_and_orders_newest_first() {
    let (engine, _db) = engine_with_db().await;
    let paulo = engine.new_responsible("Paulo").await.unwrap();

    let first = engine
        .new_transaction(TransactionCmd::new(
            TransactionKind::Expense,
            date(2025, 11, 5),
            100,
        ))
        .await
        .unwrap();
    let second = engine
        .new_transaction(
            TransactionCmd::new(TransactionKind::Expense, date(2025, 11, 5), 200)
                .responsible(paulo.id),
        )
        .await
        .unwrap();
    let latest = engine
        .new_transaction(TransactionCmd::new(
            TransactionKind::Income,
            date(2025, 11, 20),
            300,
        ))
        .await
        .unwrap();
    engine
        .new_transaction(TransactionCmd::new(
            TransactionKind::Expense,
            date(2025, 10, 31),
            400,
        ))
        .await
        .unwrap();

    let november = engine
        .transactions(&TransactionListFilter::period(
            Period::new(2025, 11).unwrap(),
        ))
        .await
        .unwrap();
    let ids: Vec<_> = november.iter().map(|tx| tx.id).collect();
    assert_eq!(ids, vec![latest.id, second.id, first.id]);

    let filtered = engine
        .transactions(&TransactionListFilter {
            kind: Some(TransactionKind::Expense),
            responsible_id: Some(paulo.id),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].id, second.id);

    let whole_year = engine
        .transactions(&TransactionListFilter {
            year: Some(2025),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(whole_year.len(), 4);

    let err = engine
        .transactions(&TransactionListFilter {
            month: Some(11),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidDate(_)));
}

#[tokio::test]
async fn update_replaces_all_fields() {
    let (engine, _db) = engine_with_db().await;
    let account = engine.new_account("Nubank").await.unwrap();
    let tx = engine
        .new_transaction(
            TransactionCmd::new(TransactionKind::Expense, date(2025, 11, 5), 100)
                .account(account.id)
                .description("Padaria"),
        )
        .await
        .unwrap();

    let updated = engine
        .update_transaction(
            tx.id,
            TransactionCmd::new(TransactionKind::Expense, date(2025, 11, 6), 150),
        )
        .await
        .unwrap();
    assert_eq!(updated.account_id, None);
    assert_eq!(updated.description, None);
    assert_eq!(updated.created_at, tx.created_at);
    assert_eq!(engine.transaction(tx.id).await.unwrap().amount_minor, 150);

    engine.delete_transaction(tx.id).await.unwrap();
    assert!(matches!(
        engine.delete_transaction(tx.id).await,
        Err(EngineError::KeyNotFound(_))
    ));
}

#[tokio::test]
async fn groups_totals_by_dimension() {
    let (engine, _db) = engine_with_db().await;
    let market = engine
        .new_category("Mercado", CategoryKind::Expense)
        .await
        .unwrap();
    let leisure = engine
        .new_category("Lazer", CategoryKind::Expense)
        .await
        .unwrap();
    for (category, amount) in [(market.id, 3_000), (leisure.id, 5_000), (market.id, 4_000)] {
        engine
            .new_transaction(
                TransactionCmd::new(TransactionKind::Expense, date(2025, 11, 2), amount)
                    .category(category),
            )
            .await
            .unwrap();
    }
    // No category: excluded from the grouping.
    engine
        .new_transaction(TransactionCmd::new(
            TransactionKind::Expense,
            date(2025, 11, 2),
            9_999,
        ))
        .await
        .unwrap();

    let groups = engine
        .group_transactions(
            GroupDimension::Category,
            TransactionKind::Expense,
            Some(Period::new(2025, 11).unwrap()),
        )
        .await
        .unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].name.as_deref(), Some("Mercado"));
    assert_eq!(groups[0].total_minor, 7_000);
    assert_eq!(groups[1].total_minor, 5_000);
}
