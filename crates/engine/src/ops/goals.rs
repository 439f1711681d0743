use std::collections::HashMap;

use chrono::{Local, Utc};
use sea_orm::{
    ActiveValue, ConnectionTrait, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
    prelude::*,
};
use uuid::Uuid;

use crate::{
    EngineError, Goal, GoalCmd, GoalProgress, MoneyCents, Period, ResultEngine, Transaction,
    TransactionCmd, TransactionKind, goals, money::sum_minor, transactions,
    util::normalize_required_name,
};

use super::{Engine, ensure_unreferenced, with_tx};

impl Engine {
    /// All goals, most recent reference month first.
    pub async fn goals(&self) -> ResultEngine<Vec<Goal>> {
        goals::Entity::find()
            .order_by_desc(goals::Column::Year)
            .order_by_desc(goals::Column::Month)
            .order_by_asc(goals::Column::Description)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Goal::try_from)
            .collect()
    }

    pub async fn goal(&self, id: Uuid) -> ResultEngine<Goal> {
        let model = self.require_goal(&self.database, id).await?;
        Goal::try_from(model)
    }

    pub async fn new_goal(&self, cmd: GoalCmd) -> ResultEngine<Goal> {
        with_tx!(self, |db_tx| {
            let goal = self.validated_goal(&db_tx, Uuid::new_v4(), cmd).await?;
            goals::ActiveModel::from(&goal).insert(&db_tx).await?;
            tracing::info!("created goal {}", goal.description);
            Ok(goal)
        })
    }

    pub async fn update_goal(&self, id: Uuid, cmd: GoalCmd) -> ResultEngine<Goal> {
        with_tx!(self, |db_tx| {
            self.require_goal(&db_tx, id).await?;
            let goal = self.validated_goal(&db_tx, id, cmd).await?;
            let mut active: goals::ActiveModel = (&goal).into();
            active.id = ActiveValue::Unchanged(id);
            active.update(&db_tx).await?;
            Ok(goal)
        })
    }

    /// Delete a goal with no transfers or withdrawals recorded against it.
    pub async fn delete_goal(&self, id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_goal(&db_tx, id).await?;
            let references = transactions::Entity::find()
                .filter(transactions::Column::GoalId.eq(id))
                .count(&db_tx)
                .await?;
            ensure_unreferenced(&model.description, references)?;
            goals::Entity::delete_by_id(id).exec(&db_tx).await?;
            Ok(())
        })
    }

    /// Progress of every active goal, most recent reference month first.
    pub async fn goal_progress(&self) -> ResultEngine<Vec<GoalProgress>> {
        let goals = goals::Entity::find()
            .filter(goals::Column::Active.eq(true))
            .order_by_desc(goals::Column::Year)
            .order_by_desc(goals::Column::Month)
            .order_by_asc(goals::Column::Description)
            .all(&self.database)
            .await?;

        let mut achieved: HashMap<Uuid, i64> = HashMap::new();
        for model in transactions::Entity::find()
            .filter(transactions::Column::GoalId.is_not_null())
            .all(&self.database)
            .await?
        {
            let tx = Transaction::try_from(model)?;
            if let Some(goal_id) = tx.goal_id {
                let total = achieved.entry(goal_id).or_default();
                *total = total.saturating_add(tx.kind.goal_contribution(tx.amount_minor));
            }
        }

        goals
            .into_iter()
            .map(|model| -> ResultEngine<GoalProgress> {
                let goal = Goal::try_from(model)?;
                let achieved_minor = achieved.get(&goal.id).copied().unwrap_or_default();
                Ok(GoalProgress::new(goal, achieved_minor))
            })
            .collect()
    }

    /// Put `amount` into a goal, recorded as a transfer dated today.
    pub async fn contribute_to_goal(
        &self,
        id: Uuid,
        amount: MoneyCents,
    ) -> ResultEngine<Transaction> {
        self.goal_movement(id, amount, TransactionKind::GoalTransfer)
            .await
    }

    /// Take `amount` back out of a goal. Fails when the goal holds less.
    pub async fn withdraw_from_goal(
        &self,
        id: Uuid,
        amount: MoneyCents,
    ) -> ResultEngine<Transaction> {
        self.goal_movement(id, amount, TransactionKind::GoalWithdrawal)
            .await
    }

    async fn goal_movement(
        &self,
        id: Uuid,
        amount: MoneyCents,
        kind: TransactionKind,
    ) -> ResultEngine<Transaction> {
        MoneyCents::ensure_stored(amount.cents(), "amount")?;
        let today = Local::now().date_naive();
        with_tx!(self, |db_tx| {
            self.require_goal(&db_tx, id).await?;
            if kind == TransactionKind::GoalWithdrawal {
                let available = goal_balance(&db_tx, id).await?;
                if available < amount.cents() {
                    return Err(EngineError::InvalidAmount(format!(
                        "cannot withdraw {amount}, goal holds {}",
                        MoneyCents::new(available)
                    )));
                }
            }

            let cmd = TransactionCmd::new(kind, today, amount.cents()).goal(id);
            let tx = self
                .validated_transaction(&db_tx, Uuid::new_v4(), cmd, Utc::now())
                .await?;
            transactions::ActiveModel::from(&tx).insert(&db_tx).await?;
            tracing::info!("{} of {amount} on goal {id}", kind.as_str());
            Ok(tx)
        })
    }

    async fn validated_goal<C: ConnectionTrait>(
        &self,
        db: &C,
        id: Uuid,
        cmd: GoalCmd,
    ) -> ResultEngine<Goal> {
        let description = normalize_required_name(&cmd.description, "goal")?;
        MoneyCents::ensure_stored(cmd.target_minor, "target")?;
        let period = Period::new(cmd.year, cmd.month)?;
        self.require_references(db, cmd.category_id, None, cmd.responsible_id)
            .await?;

        Ok(Goal {
            id,
            description,
            kind: cmd.kind,
            target_minor: cmd.target_minor,
            month: period.month(),
            year: period.year(),
            category_id: cmd.category_id,
            responsible_id: cmd.responsible_id,
            active: cmd.active,
        })
    }
}

/// Transfers minus withdrawals recorded against `goal_id`.
async fn goal_balance<C: ConnectionTrait>(db: &C, goal_id: Uuid) -> ResultEngine<i64> {
    let mut contributions = Vec::new();
    for model in transactions::Entity::find()
        .filter(transactions::Column::GoalId.eq(goal_id))
        .all(db)
        .await?
    {
        let tx = Transaction::try_from(model)?;
        contributions.push(tx.kind.goal_contribution(tx.amount_minor));
    }
    Ok(sum_minor(contributions))
}
