use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `income` categories classify receipts, `expense` ones classify spending.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    Income,
    Expense,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
    GoalTransfer,
    GoalWithdrawal,
}

/// How a fixed expense is paid. Credit bills land on a card statement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Debit,
    Credit,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalKind {
    #[default]
    Savings,
    Investment,
    SpendingReduction,
    Other,
}

/// `?year=&month=` query shared by the month-scoped endpoints. Missing
/// fields fall back to the current month.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct PeriodQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

/// A named total, `name` is `None` for records without the dimension set.
#[derive(Debug, Serialize, Deserialize)]
pub struct Grouping {
    pub name: Option<String>,
    pub total_minor: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
}

pub mod category {
    use super::*;

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CategoryListQuery {
        pub kind: Option<CategoryKind>,
    }

    /// Body of both create and update.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub name: String,
        pub kind: CategoryKind,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: Uuid,
        pub name: String,
        pub kind: CategoryKind,
    }
}

pub mod account {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountNew {
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountView {
        pub id: Uuid,
        pub name: String,
    }
}

pub mod responsible {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ResponsibleNew {
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ResponsibleView {
        pub id: Uuid,
        pub name: String,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionListQuery {
        pub year: Option<i32>,
        pub month: Option<u32>,
        pub kind: Option<TransactionKind>,
        pub category_id: Option<Uuid>,
        pub responsible_id: Option<Uuid>,
        pub account_id: Option<Uuid>,
    }

    /// Totals of one kind for a month. `kind` defaults to `expense`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionGroupQuery {
        pub kind: Option<TransactionKind>,
        pub year: Option<i32>,
        pub month: Option<u32>,
    }

    /// Body of both create and update. Updates replace every field.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub kind: TransactionKind,
        pub date: NaiveDate,
        pub amount_minor: i64,
        #[serde(default)]
        pub category_id: Option<Uuid>,
        #[serde(default)]
        pub account_id: Option<Uuid>,
        #[serde(default)]
        pub responsible_id: Option<Uuid>,
        #[serde(default)]
        pub description: Option<String>,
        #[serde(default)]
        pub recurring: bool,
        #[serde(default)]
        pub recurrence_end: Option<NaiveDate>,
        #[serde(default)]
        pub installments: bool,
        #[serde(default)]
        pub installments_remaining: Option<i32>,
        /// Required for goal transfers and withdrawals, rejected otherwise.
        #[serde(default)]
        pub goal_id: Option<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub date: NaiveDate,
        pub kind: TransactionKind,
        pub category_id: Option<Uuid>,
        pub account_id: Option<Uuid>,
        pub responsible_id: Option<Uuid>,
        pub description: Option<String>,
        pub amount_minor: i64,
        pub recurring: bool,
        pub recurrence_end: Option<NaiveDate>,
        pub installments: bool,
        pub installments_remaining: Option<i32>,
        pub goal_id: Option<Uuid>,
    }
}

pub mod fixed_expense {
    use super::*;

    /// Body of both create and update. `payment_method` is inferred from the
    /// account name when omitted.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct FixedExpenseNew {
        pub description: String,
        pub amount_minor: i64,
        pub due_day: u32,
        #[serde(default)]
        pub account_id: Option<Uuid>,
        #[serde(default)]
        pub responsible_id: Option<Uuid>,
        #[serde(default)]
        pub category_id: Option<Uuid>,
        #[serde(default)]
        pub recurrence_end: Option<NaiveDate>,
        #[serde(default)]
        pub payment_method: Option<PaymentMethod>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct FixedExpenseView {
        pub id: Uuid,
        pub description: String,
        pub amount_minor: i64,
        pub due_day: u32,
        pub account_id: Option<Uuid>,
        pub responsible_id: Option<Uuid>,
        pub category_id: Option<Uuid>,
        pub recurrence_end: Option<NaiveDate>,
        pub payment_method: PaymentMethod,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentUpdate {
        pub year: i32,
        pub month: u32,
        pub paid: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentView {
        pub fixed_expense_id: Uuid,
        pub year: i32,
        pub month: u32,
        pub paid: bool,
        pub paid_on: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct FixedExpenseStatus {
        pub expense: FixedExpenseView,
        pub due_date: NaiveDate,
        pub paid: bool,
        pub paid_on: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Checklist {
        pub year: i32,
        pub month: u32,
        pub items: Vec<FixedExpenseStatus>,
        pub credit_total_minor: i64,
        pub debit_total_minor: i64,
        pub paid_total_minor: i64,
        pub pending_total_minor: i64,
    }
}

pub mod goal {
    use super::*;

    /// Body of both create and update.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalNew {
        pub description: String,
        #[serde(default)]
        pub kind: GoalKind,
        pub target_minor: i64,
        pub month: u32,
        pub year: i32,
        #[serde(default)]
        pub category_id: Option<Uuid>,
        #[serde(default)]
        pub responsible_id: Option<Uuid>,
        #[serde(default = "default_active")]
        pub active: bool,
    }

    fn default_active() -> bool {
        true
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalView {
        pub id: Uuid,
        pub description: String,
        pub kind: GoalKind,
        pub target_minor: i64,
        pub month: u32,
        pub year: i32,
        pub category_id: Option<Uuid>,
        pub responsible_id: Option<Uuid>,
        pub active: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalProgressView {
        pub goal: GoalView,
        pub achieved_minor: i64,
        pub percent: f64,
    }

    /// `?amount=12,50`: a decimal amount as typed by the user.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct AmountQuery {
        pub amount: String,
    }
}

pub mod dashboard {
    use super::*;
    use crate::fixed_expense::Checklist;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthlyPoint {
        pub year: i32,
        pub month: u32,
        pub income_minor: i64,
        pub variable_minor: i64,
        pub fixed_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LatestTransaction {
        pub id: Uuid,
        pub date: NaiveDate,
        pub kind: TransactionKind,
        pub description: Option<String>,
        pub amount_minor: i64,
        pub category: Option<String>,
        pub responsible: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DashboardView {
        pub year: i32,
        pub month: u32,
        /// Set when the month precedes the configured start of the data.
        pub message: Option<String>,
        pub total_income_minor: i64,
        pub total_expenses_minor: i64,
        pub total_fixed_minor: i64,
        pub balance_minor: i64,
        pub fixed: Checklist,
        pub expenses_by_category: Vec<Grouping>,
        pub expenses_by_responsible: Vec<Grouping>,
        pub expenses_by_account: Vec<Grouping>,
        pub fixed_by_category: Vec<Grouping>,
        pub fixed_by_responsible: Vec<Grouping>,
        pub income_by_category: Vec<Grouping>,
        pub income_by_responsible: Vec<Grouping>,
        pub income_by_account: Vec<Grouping>,
        pub monthly: Vec<MonthlyPoint>,
        pub latest: Vec<LatestTransaction>,
    }
}

pub mod parameter {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ParameterView {
        pub key: String,
        pub value: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ParameterSet {
        pub value: String,
    }
}
