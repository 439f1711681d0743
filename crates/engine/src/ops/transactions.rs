use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveValue, Condition, ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait,
    prelude::*,
};
use uuid::Uuid;

use crate::{
    CategoryKind, EngineError, MoneyCents, Period, ResultEngine, Transaction, TransactionCmd,
    TransactionKind,
    dashboard::{GroupDimension, Grouping, group_by},
    transactions,
    util::normalize_optional_text,
};

use super::{Engine, with_tx};

/// Filters for listing transactions. Every field is optional; `month` needs
/// a `year`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransactionListFilter {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub kind: Option<TransactionKind>,
    pub category_id: Option<Uuid>,
    pub responsible_id: Option<Uuid>,
    pub account_id: Option<Uuid>,
}

impl TransactionListFilter {
    /// Only the transactions of `period`.
    pub fn period(period: Period) -> Self {
        Self {
            year: Some(period.year()),
            month: Some(period.month()),
            ..Default::default()
        }
    }

    /// Inclusive date range selected by `year`/`month`.
    fn date_range(&self) -> ResultEngine<Option<(NaiveDate, NaiveDate)>> {
        match (self.year, self.month) {
            (Some(year), Some(month)) => {
                let period = Period::new(year, month)?;
                Ok(Some((period.first_day(), period.last_day())))
            }
            (Some(year), None) => {
                let january = Period::new(year, 1)?;
                let december = Period::new(year, 12)?;
                Ok(Some((january.first_day(), december.last_day())))
            }
            (None, Some(_)) => Err(EngineError::InvalidDate(
                "month filter requires a year".to_string(),
            )),
            (None, None) => Ok(None),
        }
    }

    fn condition(&self) -> ResultEngine<Condition> {
        let mut cond = Condition::all();
        if let Some((from, to)) = self.date_range()? {
            cond = cond
                .add(transactions::Column::OccurredOn.gte(from))
                .add(transactions::Column::OccurredOn.lte(to));
        }
        if let Some(kind) = self.kind {
            cond = cond.add(transactions::Column::Kind.eq(kind.as_str()));
        }
        if let Some(id) = self.category_id {
            cond = cond.add(transactions::Column::CategoryId.eq(id));
        }
        if let Some(id) = self.responsible_id {
            cond = cond.add(transactions::Column::ResponsibleId.eq(id));
        }
        if let Some(id) = self.account_id {
            cond = cond.add(transactions::Column::AccountId.eq(id));
        }
        Ok(cond)
    }
}

impl Engine {
    /// List transactions matching `filter`, newest first.
    pub async fn transactions(
        &self,
        filter: &TransactionListFilter,
    ) -> ResultEngine<Vec<Transaction>> {
        self.list_transactions(&self.database, filter).await
    }

    pub(super) async fn list_transactions<C: ConnectionTrait>(
        &self,
        db: &C,
        filter: &TransactionListFilter,
    ) -> ResultEngine<Vec<Transaction>> {
        transactions::Entity::find()
            .filter(filter.condition()?)
            .order_by_desc(transactions::Column::OccurredOn)
            .order_by_desc(transactions::Column::CreatedAt)
            .all(db)
            .await?
            .into_iter()
            .map(Transaction::try_from)
            .collect()
    }

    pub async fn transaction(&self, id: Uuid) -> ResultEngine<Transaction> {
        let model = self.require_transaction(&self.database, id).await?;
        Transaction::try_from(model)
    }

    /// Record a new transaction.
    pub async fn new_transaction(&self, cmd: TransactionCmd) -> ResultEngine<Transaction> {
        with_tx!(self, |db_tx| {
            let tx = self
                .validated_transaction(&db_tx, Uuid::new_v4(), cmd, Utc::now())
                .await?;
            transactions::ActiveModel::from(&tx).insert(&db_tx).await?;
            tracing::debug!("created {} transaction {}", tx.kind.as_str(), tx.id);
            Ok(tx)
        })
    }

    /// Replace every field of an existing transaction. The creation time is
    /// kept so ordering stays stable.
    pub async fn update_transaction(
        &self,
        id: Uuid,
        cmd: TransactionCmd,
    ) -> ResultEngine<Transaction> {
        with_tx!(self, |db_tx| {
            let current = self.require_transaction(&db_tx, id).await?;
            let tx = self
                .validated_transaction(&db_tx, id, cmd, current.created_at)
                .await?;
            let mut active: transactions::ActiveModel = (&tx).into();
            active.id = ActiveValue::Unchanged(id);
            active.update(&db_tx).await?;
            Ok(tx)
        })
    }

    pub async fn delete_transaction(&self, id: Uuid) -> ResultEngine<()> {
        let res = transactions::Entity::delete_by_id(id)
            .exec(&self.database)
            .await?;
        if res.rows_affected == 0 {
            return Err(EngineError::KeyNotFound(format!(
                "transaction {id} not exists"
            )));
        }
        Ok(())
    }

    /// Totals of `kind` transactions in `period` (current month when `None`)
    /// grouped by `dimension`.
    pub async fn group_transactions(
        &self,
        dimension: GroupDimension,
        kind: TransactionKind,
        period: Option<Period>,
    ) -> ResultEngine<Vec<Grouping>> {
        let period = period.unwrap_or_else(Period::current);
        let filter = TransactionListFilter {
            kind: Some(kind),
            ..TransactionListFilter::period(period)
        };
        let txs = self.list_transactions(&self.database, &filter).await?;
        let names = self.load_names(&self.database).await?;
        Ok(group_by(&txs, &names, dimension))
    }

    /// Apply the transaction rules to `cmd` and build the record to store.
    pub(super) async fn validated_transaction<C: ConnectionTrait>(
        &self,
        db: &C,
        id: Uuid,
        cmd: TransactionCmd,
        created_at: chrono::DateTime<Utc>,
    ) -> ResultEngine<Transaction> {
        MoneyCents::ensure_stored(cmd.amount_minor, "amount")?;

        let category = self
            .require_references(db, cmd.category_id, cmd.account_id, cmd.responsible_id)
            .await?;
        if let (Some(expected), Some(category)) = (cmd.kind.category_kind(), category) {
            let actual = CategoryKind::try_from(category.kind.as_str())?;
            if actual != expected {
                return Err(EngineError::InvalidKind(format!(
                    "category '{}' is {} but the transaction is {}",
                    category.name,
                    actual.as_str(),
                    cmd.kind.as_str()
                )));
            }
        }

        let description = if cmd.kind.is_goal_movement() {
            let goal_id = cmd.goal_id.ok_or_else(|| {
                EngineError::InvalidKind(format!("{} requires a goal", cmd.kind.as_str()))
            })?;
            let goal = self.require_goal(db, goal_id).await?;
            Some(goal_movement_description(cmd.kind, &goal.description))
        } else {
            if cmd.goal_id.is_some() {
                return Err(EngineError::InvalidKind(format!(
                    "{} transactions cannot reference a goal",
                    cmd.kind.as_str()
                )));
            }
            normalize_optional_text(cmd.description.as_deref())
        };

        let installments_remaining = if cmd.installments {
            match cmd.installments_remaining {
                Some(remaining) if remaining < 1 => {
                    return Err(EngineError::InvalidAmount(
                        "remaining installments must be >= 1".to_string(),
                    ));
                }
                remaining => remaining,
            }
        } else {
            None
        };

        let recurrence_end = if cmd.recurring {
            if let Some(end) = cmd.recurrence_end
                && end < cmd.date
            {
                return Err(EngineError::InvalidDate(format!(
                    "recurrence end {end} precedes {}",
                    cmd.date
                )));
            }
            cmd.recurrence_end
        } else {
            None
        };

        Ok(Transaction {
            id,
            date: cmd.date,
            kind: cmd.kind,
            category_id: cmd.category_id,
            account_id: cmd.account_id,
            responsible_id: cmd.responsible_id,
            description,
            amount_minor: cmd.amount_minor,
            recurring: cmd.recurring,
            recurrence_end,
            installments: cmd.installments,
            installments_remaining,
            goal_id: cmd.goal_id,
            created_at,
        })
    }
}

fn goal_movement_description(kind: TransactionKind, goal: &str) -> String {
    match kind {
        TransactionKind::GoalWithdrawal => format!("Resgate da meta: {goal}"),
        _ => format!("Transferência para meta: {goal}"),
    }
}
