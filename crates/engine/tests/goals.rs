mod common;

use engine::{EngineError, GoalCmd, GoalKind, MoneyCents, TransactionKind};

use common::engine_with_db;

#[tokio::test]
async fn contributions_and_withdrawals_drive_progress() {
    let (engine, _db) = engine_with_db().await;
    let trip = engine
        .new_goal(GoalCmd::new("Viagem", GoalKind::Savings, 300_000, 2025, 12))
        .await
        .unwrap();

    let tx = engine
        .contribute_to_goal(trip.id, "1.500,00".parse::<MoneyCents>().unwrap())
        .await
        .unwrap();
    assert_eq!(tx.kind, TransactionKind::GoalTransfer);
    assert_eq!(tx.goal_id, Some(trip.id));
    assert_eq!(tx.description.as_deref(), Some("Transferência para meta: Viagem"));

    let tx = engine
        .withdraw_from_goal(trip.id, MoneyCents::new(50_000))
        .await
        .unwrap();
    assert_eq!(tx.description.as_deref(), Some("Resgate da meta: Viagem"));

    let progress = engine.goal_progress().await.unwrap();
    assert_eq!(progress.len(), 1);
    assert_eq!(progress[0].achieved_minor, 100_000);
    assert_eq!(progress[0].percent, 33.33);
}

#[tokio::test]
async fn cannot_withdraw_more_than_saved() {
    let (engine, _db) = engine_with_db().await;
    let goal = engine
        .new_goal(GoalCmd::new("Reserva", GoalKind::Investment, 100_000, 2025, 6))
        .await
        .unwrap();
    engine
        .contribute_to_goal(goal.id, MoneyCents::new(10_000))
        .await
        .unwrap();

    let err = engine
        .withdraw_from_goal(goal.id, MoneyCents::new(10_001))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    let err = engine
        .contribute_to_goal(goal.id, MoneyCents::ZERO)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
}

#[tokio::test]
async fn progress_lists_active_goals_newest_first() {
    let (engine, _db) = engine_with_db().await;
    engine
        .new_goal(GoalCmd::new("Antiga", GoalKind::Other, 1_000, 2024, 3))
        .await
        .unwrap();
    engine
        .new_goal(GoalCmd::new("Nova", GoalKind::Savings, 1_000, 2025, 1))
        .await
        .unwrap();
    engine
        .new_goal(GoalCmd::new("Pausada", GoalKind::Savings, 1_000, 2026, 1).active(false))
        .await
        .unwrap();

    let names: Vec<_> = engine
        .goal_progress()
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.goal.description)
        .collect();
    assert_eq!(names, vec!["Nova", "Antiga"]);
    assert_eq!(engine.goals().await.unwrap().len(), 3);
}

#[tokio::test]
async fn goal_validation_and_delete() {
    let (engine, _db) = engine_with_db().await;
    assert!(matches!(
        engine
            .new_goal(GoalCmd::new("Carro", GoalKind::Savings, 0, 2025, 1))
            .await,
        Err(EngineError::InvalidAmount(_))
    ));
    assert!(matches!(
        engine
            .new_goal(GoalCmd::new("Carro", GoalKind::Savings, 1_000, 2025, 13))
            .await,
        Err(EngineError::InvalidDate(_))
    ));

    let goal = engine
        .new_goal(GoalCmd::new("Carro", GoalKind::Savings, 1_000, 2025, 1))
        .await
        .unwrap();
    let updated = engine
        .update_goal(
            goal.id,
            GoalCmd::new("Carro novo", GoalKind::Investment, 2_000, 2025, 2),
        )
        .await
        .unwrap();
    assert_eq!(engine.goal(goal.id).await.unwrap(), updated);

    engine
        .contribute_to_goal(goal.id, MoneyCents::new(100))
        .await
        .unwrap();
    assert_eq!(
        engine.delete_goal(goal.id).await.unwrap_err(),
        EngineError::InUse("Carro novo".to_string())
    );
}
