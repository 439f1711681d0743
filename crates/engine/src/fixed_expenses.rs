//! Recurring monthly bills (`Despesa Fixa`) such as rent, school or
//! subscriptions.

use chrono::NaiveDate;
use sea_orm::entity::{ActiveValue, prelude::*};

use crate::{EngineError, Period, ResultEngine, util::name_key};

/// Account name fragments that mark a credit card. Matched against the
/// accent-insensitive lowercase name.
const CREDIT_MARKERS: [&str; 4] = ["cartao", "credito", "credit", "card"];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PaymentMethod {
    #[default]
    Debit,
    Credit,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debit => "debit",
            Self::Credit => "credit",
        }
    }

    /// Guess how a bill is paid from the name of the account it is charged to.
    ///
    /// ```rust
    /// use engine::PaymentMethod;
    ///
    /// assert_eq!(PaymentMethod::infer_from_account("Cartão XP"), PaymentMethod::Credit);
    /// assert_eq!(PaymentMethod::infer_from_account("Itaú"), PaymentMethod::Debit);
    /// ```
    pub fn infer_from_account(account_name: &str) -> Self {
        let key = name_key(account_name);
        if CREDIT_MARKERS.iter().any(|marker| key.contains(marker)) {
            Self::Credit
        } else {
            Self::Debit
        }
    }
}

impl TryFrom<&str> for PaymentMethod {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match name_key(value).as_str() {
            "debit" | "debito" => Ok(Self::Debit),
            "credit" | "credito" => Ok(Self::Credit),
            other => Err(EngineError::InvalidKind(format!(
                "invalid payment method: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixedExpense {
    pub id: Uuid,
    pub description: String,
    pub amount_minor: i64,
    /// Day of month the bill is due, 1..=31.
    pub due_day: u32,
    pub account_id: Option<Uuid>,
    pub responsible_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    /// Last day the bill recurs; `None` means it never ends.
    pub recurrence_end: Option<NaiveDate>,
    pub payment_method: PaymentMethod,
}

impl FixedExpense {
    /// A bill counts for a month unless its recurrence ended before the month
    /// started.
    pub fn is_active_in(&self, period: Period) -> bool {
        self.recurrence_end.is_none_or(|end| end >= period.first_day())
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "fixed_expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub description: String,
    pub amount_minor: i64,
    pub due_day: i32,
    pub account_id: Option<Uuid>,
    pub responsible_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub recurrence_end: Option<Date>,
    pub payment_method: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::fixed_expense_payments::Entity")]
    Payments,
}

impl Related<super::fixed_expense_payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for FixedExpense {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        let due_day = u32::try_from(model.due_day)
            .map_err(|_| EngineError::InvalidDate(format!("invalid due day {}", model.due_day)))?;
        Ok(Self {
            id: model.id,
            description: model.description,
            amount_minor: model.amount_minor,
            due_day,
            account_id: model.account_id,
            responsible_id: model.responsible_id,
            category_id: model.category_id,
            recurrence_end: model.recurrence_end,
            payment_method: PaymentMethod::try_from(model.payment_method.as_str())?,
        })
    }
}

impl From<&FixedExpense> for ActiveModel {
    fn from(expense: &FixedExpense) -> Self {
        Self {
            id: ActiveValue::Set(expense.id),
            description: ActiveValue::Set(expense.description.clone()),
            amount_minor: ActiveValue::Set(expense.amount_minor),
            due_day: ActiveValue::Set(expense.due_day as i32),
            account_id: ActiveValue::Set(expense.account_id),
            responsible_id: ActiveValue::Set(expense.responsible_id),
            category_id: ActiveValue::Set(expense.category_id),
            recurrence_end: ActiveValue::Set(expense.recurrence_end),
            payment_method: ActiveValue::Set(expense.payment_method.as_str().to_string()),
        }
    }
}
