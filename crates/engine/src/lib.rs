//! Domain engine of the household finance tracker.
//!
//! [`Engine`] owns the database connection and exposes every operation the
//! REST server needs: reference data, transactions, fixed expenses with their
//! monthly checklist, goals, the dashboard, the CSV report and parameters.

pub use accounts::Account;
pub use categories::{Category, CategoryKind};
pub use commands::{FixedExpenseCmd, GoalCmd, TransactionCmd};
pub use dashboard::{
    Dashboard, FixedChecklist, FixedExpenseStatus, GroupDimension, Grouping, LatestTransaction,
    MonthlyPoint,
};
pub use error::EngineError;
pub use fixed_expense_payments::FixedExpensePayment;
pub use fixed_expenses::{FixedExpense, PaymentMethod};
pub use goals::{Goal, GoalKind, GoalProgress};
pub use money::MoneyCents;
pub use ops::{Engine, EngineBuilder, TransactionListFilter};
pub use parameters::{DASHBOARD_START, Parameter};
pub use period::Period;
pub use report::Report;
pub use responsibles::Responsible;
pub use transactions::{Transaction, TransactionKind};

mod accounts;
mod categories;
mod commands;
mod dashboard;
mod error;
mod fixed_expense_payments;
mod fixed_expenses;
mod goals;
mod money;
mod ops;
mod parameters;
mod period;
mod report;
mod responsibles;
mod transactions;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
