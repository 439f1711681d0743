//! Transaction primitives (`Lançamento`).
//!
//! A `Transaction` records money coming in, going out, or being moved into or
//! out of a savings goal on a given day.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};

use crate::{CategoryKind, EngineError, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    Income,
    Expense,
    /// Money set aside for a goal.
    GoalTransfer,
    /// Money taken back out of a goal.
    GoalWithdrawal,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
            Self::GoalTransfer => "goal_transfer",
            Self::GoalWithdrawal => "goal_withdrawal",
        }
    }

    /// Label used in exports, matching the household's spreadsheet.
    pub fn label(self) -> &'static str {
        match self {
            Self::Income => "RECEITA",
            Self::Expense => "DESPESA",
            Self::GoalTransfer => "TRANSFERENCIA_META",
            Self::GoalWithdrawal => "RESGATE_META",
        }
    }

    pub fn is_goal_movement(self) -> bool {
        matches!(self, Self::GoalTransfer | Self::GoalWithdrawal)
    }

    /// The category side an income/expense transaction must use.
    pub fn category_kind(self) -> Option<CategoryKind> {
        match self {
            Self::Income => Some(CategoryKind::Income),
            Self::Expense => Some(CategoryKind::Expense),
            Self::GoalTransfer | Self::GoalWithdrawal => None,
        }
    }

    /// Signed contribution of `amount_minor` to a goal's progress.
    pub fn goal_contribution(self, amount_minor: i64) -> i64 {
        match self {
            Self::GoalTransfer => amount_minor,
            Self::GoalWithdrawal => -amount_minor,
            Self::Income | Self::Expense => 0,
        }
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "income" | "receita" => Ok(Self::Income),
            "expense" | "despesa" => Ok(Self::Expense),
            "goal_transfer" | "transferencia_meta" => Ok(Self::GoalTransfer),
            "goal_withdrawal" | "resgate_meta" => Ok(Self::GoalWithdrawal),
            other => Err(EngineError::InvalidKind(format!(
                "invalid transaction kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub id: Uuid,
    pub date: NaiveDate,
    pub kind: TransactionKind,
    pub category_id: Option<Uuid>,
    pub account_id: Option<Uuid>,
    pub responsible_id: Option<Uuid>,
    pub description: Option<String>,
    /// Always positive; the direction comes from `kind`.
    pub amount_minor: i64,
    pub recurring: bool,
    pub recurrence_end: Option<NaiveDate>,
    pub installments: bool,
    pub installments_remaining: Option<i32>,
    pub goal_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub occurred_on: Date,
    pub kind: String,
    pub category_id: Option<Uuid>,
    pub account_id: Option<Uuid>,
    pub responsible_id: Option<Uuid>,
    pub description: Option<String>,
    pub amount_minor: i64,
    pub recurring: bool,
    pub recurrence_end: Option<Date>,
    pub installments: bool,
    pub installments_remaining: Option<i32>,
    pub goal_id: Option<Uuid>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Category,
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Account,
    #[sea_orm(
        belongs_to = "super::responsibles::Entity",
        from = "Column::ResponsibleId",
        to = "super::responsibles::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Responsible,
    #[sea_orm(
        belongs_to = "super::goals::Entity",
        from = "Column::GoalId",
        to = "super::goals::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Goal,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl Related<super::responsibles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Responsible.def()
    }
}

impl Related<super::goals::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Goal.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: model.id,
            date: model.occurred_on,
            kind: TransactionKind::try_from(model.kind.as_str())?,
            category_id: model.category_id,
            account_id: model.account_id,
            responsible_id: model.responsible_id,
            description: model.description,
            amount_minor: model.amount_minor,
            recurring: model.recurring,
            recurrence_end: model.recurrence_end,
            installments: model.installments,
            installments_remaining: model.installments_remaining,
            goal_id: model.goal_id,
            created_at: model.created_at,
        })
    }
}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id),
            occurred_on: ActiveValue::Set(tx.date),
            kind: ActiveValue::Set(tx.kind.as_str().to_string()),
            category_id: ActiveValue::Set(tx.category_id),
            account_id: ActiveValue::Set(tx.account_id),
            responsible_id: ActiveValue::Set(tx.responsible_id),
            description: ActiveValue::Set(tx.description.clone()),
            amount_minor: ActiveValue::Set(tx.amount_minor),
            recurring: ActiveValue::Set(tx.recurring),
            recurrence_end: ActiveValue::Set(tx.recurrence_end),
            installments: ActiveValue::Set(tx.installments),
            installments_remaining: ActiveValue::Set(tx.installments_remaining),
            goal_id: ActiveValue::Set(tx.goal_id),
            created_at: ActiveValue::Set(tx.created_at),
        }
    }
}
