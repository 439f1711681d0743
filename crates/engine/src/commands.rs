//! Command structs for engine operations.
//!
//! These types group parameters for write operations (transactions, fixed
//! expenses, goals), keeping call sites readable and avoiding long argument
//! lists.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{GoalKind, PaymentMethod, TransactionKind};

/// Create or fully replace a transaction.
#[derive(Clone, Debug)]
pub struct TransactionCmd {
    pub kind: TransactionKind,
    pub date: NaiveDate,
    pub amount_minor: i64,
    pub category_id: Option<Uuid>,
    pub account_id: Option<Uuid>,
    pub responsible_id: Option<Uuid>,
    pub description: Option<String>,
    pub recurring: bool,
    pub recurrence_end: Option<NaiveDate>,
    pub installments: bool,
    pub installments_remaining: Option<i32>,
    pub goal_id: Option<Uuid>,
}

impl TransactionCmd {
    #[must_use]
    pub fn new(kind: TransactionKind, date: NaiveDate, amount_minor: i64) -> Self {
        Self {
            kind,
            date,
            amount_minor,
            category_id: None,
            account_id: None,
            responsible_id: None,
            description: None,
            recurring: false,
            recurrence_end: None,
            installments: false,
            installments_remaining: None,
            goal_id: None,
        }
    }

    #[must_use]
    pub fn category(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    #[must_use]
    pub fn account(mut self, account_id: Uuid) -> Self {
        self.account_id = Some(account_id);
        self
    }

    #[must_use]
    pub fn responsible(mut self, responsible_id: Uuid) -> Self {
        self.responsible_id = Some(responsible_id);
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn recurring_until(mut self, end: Option<NaiveDate>) -> Self {
        self.recurring = true;
        self.recurrence_end = end;
        self
    }

    #[must_use]
    pub fn installments(mut self, remaining: i32) -> Self {
        self.installments = true;
        self.installments_remaining = Some(remaining);
        self
    }

    #[must_use]
    pub fn goal(mut self, goal_id: Uuid) -> Self {
        self.goal_id = Some(goal_id);
        self
    }
}

/// Create or fully replace a fixed expense.
#[derive(Clone, Debug)]
pub struct FixedExpenseCmd {
    pub description: String,
    pub amount_minor: i64,
    pub due_day: u32,
    pub account_id: Option<Uuid>,
    pub responsible_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub recurrence_end: Option<NaiveDate>,
    /// `None` lets the engine infer it from the account name.
    pub payment_method: Option<PaymentMethod>,
}

impl FixedExpenseCmd {
    #[must_use]
    pub fn new(description: impl Into<String>, amount_minor: i64, due_day: u32) -> Self {
        Self {
            description: description.into(),
            amount_minor,
            due_day,
            account_id: None,
            responsible_id: None,
            category_id: None,
            recurrence_end: None,
            payment_method: None,
        }
    }

    #[must_use]
    pub fn account(mut self, account_id: Uuid) -> Self {
        self.account_id = Some(account_id);
        self
    }

    #[must_use]
    pub fn responsible(mut self, responsible_id: Uuid) -> Self {
        self.responsible_id = Some(responsible_id);
        self
    }

    #[must_use]
    pub fn category(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    #[must_use]
    pub fn until(mut self, end: NaiveDate) -> Self {
        self.recurrence_end = Some(end);
        self
    }

    #[must_use]
    pub fn payment_method(mut self, method: PaymentMethod) -> Self {
        self.payment_method = Some(method);
        self
    }
}

/// Create or fully replace a goal.
#[derive(Clone, Debug)]
pub struct GoalCmd {
    pub description: String,
    pub kind: GoalKind,
    pub target_minor: i64,
    pub month: u32,
    pub year: i32,
    pub category_id: Option<Uuid>,
    pub responsible_id: Option<Uuid>,
    pub active: bool,
}

impl GoalCmd {
    #[must_use]
    pub fn new(
        description: impl Into<String>,
        kind: GoalKind,
        target_minor: i64,
        year: i32,
        month: u32,
    ) -> Self {
        Self {
            description: description.into(),
            kind,
            target_minor,
            month,
            year,
            category_id: None,
            responsible_id: None,
            active: true,
        }
    }

    #[must_use]
    pub fn category(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    #[must_use]
    pub fn responsible(mut self, responsible_id: Uuid) -> Self {
        self.responsible_id = Some(responsible_id);
        self
    }

    #[must_use]
    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }
}
