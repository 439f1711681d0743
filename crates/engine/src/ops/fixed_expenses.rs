use chrono::Local;
use sea_orm::{
    ActiveValue, ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{
    EngineError, FixedExpense, FixedExpenseCmd, FixedExpensePayment, MoneyCents, PaymentMethod,
    Period, ResultEngine, dashboard::FixedChecklist, fixed_expense_payments, fixed_expenses,
    util::normalize_required_name,
};

use super::{Engine, with_tx};

/// Longest description accepted for a fixed expense, in characters.
const MAX_DESCRIPTION_LEN: usize = 120;

impl Engine {
    /// All fixed expenses ordered by due day.
    pub async fn fixed_expenses(&self) -> ResultEngine<Vec<FixedExpense>> {
        self.all_fixed_expenses(&self.database).await
    }

    pub(super) async fn all_fixed_expenses<C: ConnectionTrait>(
        &self,
        db: &C,
    ) -> ResultEngine<Vec<FixedExpense>> {
        fixed_expenses::Entity::find()
            .order_by_asc(fixed_expenses::Column::DueDay)
            .order_by_asc(fixed_expenses::Column::Description)
            .all(db)
            .await?
            .into_iter()
            .map(FixedExpense::try_from)
            .collect()
    }

    pub async fn fixed_expense(&self, id: Uuid) -> ResultEngine<FixedExpense> {
        let model = self.require_fixed_expense(&self.database, id).await?;
        FixedExpense::try_from(model)
    }

    pub async fn new_fixed_expense(&self, cmd: FixedExpenseCmd) -> ResultEngine<FixedExpense> {
        with_tx!(self, |db_tx| {
            let expense = self
                .validated_fixed_expense(&db_tx, Uuid::new_v4(), cmd)
                .await?;
            fixed_expenses::ActiveModel::from(&expense)
                .insert(&db_tx)
                .await?;
            tracing::info!(
                "created fixed expense {} ({})",
                expense.description,
                expense.payment_method.as_str()
            );
            Ok(expense)
        })
    }

    pub async fn update_fixed_expense(
        &self,
        id: Uuid,
        cmd: FixedExpenseCmd,
    ) -> ResultEngine<FixedExpense> {
        with_tx!(self, |db_tx| {
            self.require_fixed_expense(&db_tx, id).await?;
            let expense = self.validated_fixed_expense(&db_tx, id, cmd).await?;
            let mut active: fixed_expenses::ActiveModel = (&expense).into();
            active.id = ActiveValue::Unchanged(id);
            active.update(&db_tx).await?;
            Ok(expense)
        })
    }

    /// Delete a fixed expense together with its paid checklist.
    pub async fn delete_fixed_expense(&self, id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_fixed_expense(&db_tx, id).await?;
            fixed_expense_payments::Entity::delete_many()
                .filter(fixed_expense_payments::Column::FixedExpenseId.eq(id))
                .exec(&db_tx)
                .await?;
            fixed_expenses::Entity::delete_by_id(id).exec(&db_tx).await?;
            Ok(())
        })
    }

    /// Mark a fixed expense paid or unpaid for `period`. Paying records today
    /// as the payment date; unpaying clears it.
    pub async fn set_fixed_expense_paid(
        &self,
        id: Uuid,
        period: Period,
        paid: bool,
    ) -> ResultEngine<FixedExpensePayment> {
        let paid_on = paid.then(|| Local::now().date_naive());
        with_tx!(self, |db_tx| {
            self.require_fixed_expense(&db_tx, id).await?;
            let month = period.month() as i32;

            let existing = fixed_expense_payments::Entity::find()
                .filter(fixed_expense_payments::Column::FixedExpenseId.eq(id))
                .filter(fixed_expense_payments::Column::Year.eq(period.year()))
                .filter(fixed_expense_payments::Column::Month.eq(month))
                .one(&db_tx)
                .await?;

            let model = match existing {
                Some(model) => {
                    let mut active: fixed_expense_payments::ActiveModel = model.into();
                    active.paid = ActiveValue::Set(paid);
                    active.paid_on = ActiveValue::Set(paid_on);
                    active.update(&db_tx).await?
                }
                None => {
                    fixed_expense_payments::ActiveModel {
                        id: ActiveValue::Set(Uuid::new_v4()),
                        fixed_expense_id: ActiveValue::Set(id),
                        year: ActiveValue::Set(period.year()),
                        month: ActiveValue::Set(month),
                        paid: ActiveValue::Set(paid),
                        paid_on: ActiveValue::Set(paid_on),
                    }
                    .insert(&db_tx)
                    .await?
                }
            };
            tracing::debug!("fixed expense {id} paid={paid} for {period}");
            Ok(FixedExpensePayment::from(model))
        })
    }

    /// Fixed expenses due in `period` with their paid flag and the
    /// credit/debit totals.
    pub async fn fixed_expense_checklist(&self, period: Period) -> ResultEngine<FixedChecklist> {
        let expenses = self.all_fixed_expenses(&self.database).await?;
        let payments = self.payments_of(&self.database, period).await?;
        Ok(FixedChecklist::build(period, &expenses, &payments))
    }

    pub(super) async fn payments_of<C: ConnectionTrait>(
        &self,
        db: &C,
        period: Period,
    ) -> ResultEngine<Vec<FixedExpensePayment>> {
        Ok(fixed_expense_payments::Entity::find()
            .filter(fixed_expense_payments::Column::Year.eq(period.year()))
            .filter(fixed_expense_payments::Column::Month.eq(period.month() as i32))
            .all(db)
            .await?
            .into_iter()
            .map(FixedExpensePayment::from)
            .collect())
    }

    async fn validated_fixed_expense<C: ConnectionTrait>(
        &self,
        db: &C,
        id: Uuid,
        cmd: FixedExpenseCmd,
    ) -> ResultEngine<FixedExpense> {
        let description = normalize_required_name(&cmd.description, "fixed expense")?;
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(EngineError::InvalidName(format!(
                "description must be at most {MAX_DESCRIPTION_LEN} characters"
            )));
        }
        MoneyCents::ensure_stored(cmd.amount_minor, "amount")?;
        if !(1..=31).contains(&cmd.due_day) {
            return Err(EngineError::InvalidDate(format!(
                "due day must be between 1 and 31, got {}",
                cmd.due_day
            )));
        }

        self.require_references(db, cmd.category_id, None, cmd.responsible_id)
            .await?;
        let account = match cmd.account_id {
            Some(account_id) => Some(self.require_account(db, account_id).await?),
            None => None,
        };
        let payment_method = cmd.payment_method.unwrap_or_else(|| {
            account
                .as_ref()
                .map(|account| PaymentMethod::infer_from_account(&account.name))
                .unwrap_or_default()
        });

        Ok(FixedExpense {
            id,
            description,
            amount_minor: cmd.amount_minor,
            due_day: cmd.due_day,
            account_id: cmd.account_id,
            responsible_id: cmd.responsible_id,
            category_id: cmd.category_id,
            recurrence_end: cmd.recurrence_end,
            payment_method,
        })
    }
}
