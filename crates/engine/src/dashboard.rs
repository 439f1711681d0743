//! Monthly dashboard aggregation.
//!
//! Everything here is pure: the engine loads rows for the requested month and
//! [`Dashboard::build`] turns them into totals, groupings and the fixed
//! expense checklist.

use std::collections::HashMap;

use chrono::{Datelike, Days, NaiveDate};
use uuid::Uuid;

use crate::{
    EngineError, FixedExpense, FixedExpensePayment, PaymentMethod, Period, Transaction,
    TransactionKind, money::sum_minor, util::name_key,
};

/// Days before the month start inspected for a salary paid in advance.
pub const SALARY_LOOKBACK_DAYS: u64 = 5;
/// A salary received after this day of the month funds the following month.
pub const SALARY_CUTOFF_DAY: u32 = 15;

/// Display names for the reference data ids transactions point to.
#[derive(Clone, Debug, Default)]
pub struct Names {
    pub categories: HashMap<Uuid, String>,
    pub accounts: HashMap<Uuid, String>,
    pub responsibles: HashMap<Uuid, String>,
}

impl Names {
    fn category(&self, id: Option<Uuid>) -> Option<&str> {
        id.and_then(|id| self.categories.get(&id)).map(String::as_str)
    }

    fn account(&self, id: Option<Uuid>) -> Option<&str> {
        id.and_then(|id| self.accounts.get(&id)).map(String::as_str)
    }

    fn responsible(&self, id: Option<Uuid>) -> Option<&str> {
        id.and_then(|id| self.responsibles.get(&id)).map(String::as_str)
    }

    fn of(&self, dimension: GroupDimension, tx: &Transaction) -> Option<&str> {
        match dimension {
            GroupDimension::Category => self.category(tx.category_id),
            GroupDimension::Responsible => self.responsible(tx.responsible_id),
            GroupDimension::Account => self.account(tx.account_id),
        }
    }
}

/// Totals of `txs` by `dimension`, largest first. Transactions without a
/// value for the dimension are left out.
pub fn group_by(txs: &[Transaction], names: &Names, dimension: GroupDimension) -> Vec<Grouping> {
    let txs: Vec<&Transaction> = txs.iter().collect();
    group_transactions(&txs, |tx| names.of(dimension, tx))
}

/// What transaction totals are grouped by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GroupDimension {
    Category,
    Responsible,
    Account,
}

impl GroupDimension {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Responsible => "responsible",
            Self::Account => "account",
        }
    }
}

impl TryFrom<&str> for GroupDimension {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match name_key(value).as_str() {
            "category" | "categoria" => Ok(Self::Category),
            "responsible" | "responsavel" => Ok(Self::Responsible),
            "account" | "conta" => Ok(Self::Account),
            other => Err(EngineError::InvalidKind(format!(
                "invalid grouping dimension: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grouping {
    /// `None` collects fixed expenses with no value for the dimension.
    pub name: Option<String>,
    pub total_minor: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonthlyPoint {
    pub year: i32,
    pub month: u32,
    pub income_minor: i64,
    pub variable_minor: i64,
    pub fixed_minor: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixedExpenseStatus {
    pub expense: FixedExpense,
    pub due_date: NaiveDate,
    pub paid: bool,
    pub paid_on: Option<NaiveDate>,
}

/// The fixed expenses due in a month with their paid flag, split into the
/// credit card and debit buckets.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FixedChecklist {
    pub items: Vec<FixedExpenseStatus>,
    pub credit_total_minor: i64,
    pub debit_total_minor: i64,
    pub paid_total_minor: i64,
    pub pending_total_minor: i64,
}

impl FixedChecklist {
    pub fn build(
        period: Period,
        expenses: &[FixedExpense],
        payments: &[FixedExpensePayment],
    ) -> Self {
        let by_expense: HashMap<Uuid, &FixedExpensePayment> = payments
            .iter()
            .filter(|p| p.year == period.year() && p.month == period.month())
            .map(|p| (p.fixed_expense_id, p))
            .collect();

        let mut checklist = FixedChecklist::default();
        for expense in expenses.iter().filter(|e| e.is_active_in(period)) {
            let payment = by_expense.get(&expense.id);
            let paid = payment.is_some_and(|p| p.paid);
            let paid_on = payment.and_then(|p| p.paid_on).filter(|_| paid);

            let amount = expense.amount_minor;
            let method_total = match expense.payment_method {
                PaymentMethod::Credit => &mut checklist.credit_total_minor,
                PaymentMethod::Debit => &mut checklist.debit_total_minor,
            };
            *method_total = method_total.saturating_add(amount);
            let status_total = if paid {
                &mut checklist.paid_total_minor
            } else {
                &mut checklist.pending_total_minor
            };
            *status_total = status_total.saturating_add(amount);

            checklist.items.push(FixedExpenseStatus {
                expense: expense.clone(),
                due_date: period.due_date(expense.due_day),
                paid,
                paid_on,
            });
        }
        checklist
            .items
            .sort_by(|a, b| a.due_date.cmp(&b.due_date).then_with(|| {
                a.expense.description.cmp(&b.expense.description)
            }));
        checklist
    }

    pub fn total_minor(&self) -> i64 {
        self.credit_total_minor.saturating_add(self.debit_total_minor)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LatestTransaction {
    pub id: Uuid,
    pub date: NaiveDate,
    pub kind: TransactionKind,
    pub description: Option<String>,
    pub amount_minor: i64,
    pub category: Option<String>,
    pub responsible: Option<String>,
}

/// Rows the engine loads for [`Dashboard::build`].
#[derive(Clone, Debug, Default)]
pub struct DashboardData {
    /// Transactions dated from `SALARY_LOOKBACK_DAYS` before the month start
    /// through the end of the month.
    pub window: Vec<Transaction>,
    /// Transactions of the whole year, for the monthly series.
    pub year: Vec<Transaction>,
    pub fixed_expenses: Vec<FixedExpense>,
    pub payments: Vec<FixedExpensePayment>,
    pub names: Names,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DashboardOptions {
    /// Category name identifying salary income (accent/case-insensitive).
    pub salary_category: String,
    pub latest_limit: usize,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            salary_category: "Salário".to_string(),
            latest_limit: 10,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dashboard {
    pub period: Period,
    /// Set when the month is outside the reported range.
    pub message: Option<String>,
    pub total_income_minor: i64,
    pub total_expenses_minor: i64,
    pub total_fixed_minor: i64,
    pub balance_minor: i64,
    pub fixed: FixedChecklist,
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

impl Dashboard {
    pub fn empty(period: Period, message: Option<String>) -> Self {
        Self {
            period,
            message,
            total_income_minor: 0,
            total_expenses_minor: 0,
            total_fixed_minor: 0,
            balance_minor: 0,
            fixed: FixedChecklist::default(),
            expenses_by_category: Vec::new(),
            expenses_by_responsible: Vec::new(),
            expenses_by_account: Vec::new(),
            fixed_by_category: Vec::new(),
            fixed_by_responsible: Vec::new(),
            income_by_category: Vec::new(),
            income_by_responsible: Vec::new(),
            income_by_account: Vec::new(),
            monthly: Vec::new(),
            latest: Vec::new(),
        }
    }

    pub fn build(period: Period, data: &DashboardData, options: &DashboardOptions) -> Self {
        let names = &data.names;
        let month_txs: Vec<&Transaction> = data
            .window
            .iter()
            .filter(|tx| period.contains(tx.date))
            .collect();
        let incomes: Vec<&Transaction> = month_txs
            .iter()
            .copied()
            .filter(|tx| tx.kind == TransactionKind::Income)
            .collect();
        let expenses: Vec<&Transaction> = month_txs
            .iter()
            .copied()
            .filter(|tx| tx.kind == TransactionKind::Expense)
            .collect();

        let total_income_minor = salary_adjusted_income(period, &data.window, names, options);
        let total_expenses_minor = sum_minor(expenses.iter().map(|tx| tx.amount_minor));

        let fixed = FixedChecklist::build(period, &data.fixed_expenses, &data.payments);
        let total_fixed_minor = fixed.total_minor();
        let active_fixed: Vec<&FixedExpense> =
            fixed.items.iter().map(|item| &item.expense).collect();

        let mut latest: Vec<&Transaction> = month_txs.clone();
        latest.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        let latest = latest
            .into_iter()
            .take(options.latest_limit)
            .map(|tx| LatestTransaction {
                id: tx.id,
                date: tx.date,
                kind: tx.kind,
                description: tx.description.clone(),
                amount_minor: tx.amount_minor,
                category: names.category(tx.category_id).map(ToString::to_string),
                responsible: names.responsible(tx.responsible_id).map(ToString::to_string),
            })
            .collect();

        Self {
            period,
            message: None,
            total_income_minor,
            total_expenses_minor,
            total_fixed_minor,
            balance_minor: total_income_minor
                .saturating_sub(total_expenses_minor.saturating_add(total_fixed_minor)),
            expenses_by_category: group_transactions(&expenses, |tx| {
                names.category(tx.category_id)
            }),
            expenses_by_responsible: group_transactions(&expenses, |tx| {
                names.responsible(tx.responsible_id)
            }),
            expenses_by_account: group_transactions(&expenses, |tx| names.account(tx.account_id)),
            fixed_by_category: group_fixed(&active_fixed, |e| names.category(e.category_id)),
            fixed_by_responsible: group_fixed(&active_fixed, |e| {
                names.responsible(e.responsible_id)
            }),
            income_by_category: group_transactions(&incomes, |tx| names.category(tx.category_id)),
            income_by_responsible: group_transactions(&incomes, |tx| {
                names.responsible(tx.responsible_id)
            }),
            income_by_account: group_transactions(&incomes, |tx| names.account(tx.account_id)),
            fixed,
            monthly: monthly_series(period, &data.year, &data.fixed_expenses),
            latest,
        }
    }
}

/// Income of the month with the salary shift applied: a salary paid in the
/// last days of the previous month (after the cutoff day) counts for this
/// month, and one paid after the cutoff this month counts for the next.
pub fn salary_adjusted_income(
    period: Period,
    window: &[Transaction],
    names: &Names,
    options: &DashboardOptions,
) -> i64 {
    let salary_key = name_key(&options.salary_category);
    let lookback_start = period
        .first_day()
        .checked_sub_days(Days::new(SALARY_LOOKBACK_DAYS))
        .unwrap_or(NaiveDate::MIN);
    let is_salary = |tx: &Transaction| {
        names
            .category(tx.category_id)
            .is_some_and(|name| name_key(name) == salary_key)
    };

    let counted = window
        .iter()
        .filter(|tx| tx.kind == TransactionKind::Income)
        .filter(|tx| {
            if period.contains(tx.date) {
                !(is_salary(tx) && tx.date.day() > SALARY_CUTOFF_DAY)
            } else {
                tx.date >= lookback_start
                    && tx.date < period.first_day()
                    && tx.date.day() > SALARY_CUTOFF_DAY
                    && is_salary(tx)
            }
        })
        .map(|tx| tx.amount_minor);
    sum_minor(counted)
}

fn sort_groupings(mut groups: Vec<Grouping>) -> Vec<Grouping> {
    groups.sort_by(|a, b| {
        b.total_minor
            .cmp(&a.total_minor)
            .then_with(|| a.name.cmp(&b.name))
    });
    groups
}

fn group_transactions<'a, F>(txs: &[&'a Transaction], name_of: F) -> Vec<Grouping>
where
    F: Fn(&'a Transaction) -> Option<&'a str>,
{
    let mut totals: HashMap<&str, i64> = HashMap::new();
    for tx in txs {
        if let Some(name) = name_of(tx) {
            let total = totals.entry(name).or_default();
            *total = total.saturating_add(tx.amount_minor);
        }
    }
    sort_groupings(
        totals
            .into_iter()
            .map(|(name, total_minor)| Grouping {
                name: Some(name.to_string()),
                total_minor,
            })
            .collect(),
    )
}

fn group_fixed<'a, F>(expenses: &[&'a FixedExpense], name_of: F) -> Vec<Grouping>
where
    F: Fn(&'a FixedExpense) -> Option<&'a str>,
{
    let mut totals: HashMap<Option<&str>, i64> = HashMap::new();
    for expense in expenses {
        let total = totals.entry(name_of(expense)).or_default();
        *total = total.saturating_add(expense.amount_minor);
    }
    sort_groupings(
        totals
            .into_iter()
            .map(|(name, total_minor)| Grouping {
                name: name.map(ToString::to_string),
                total_minor,
            })
            .collect(),
    )
}

fn monthly_series(
    period: Period,
    year_txs: &[Transaction],
    fixed_expenses: &[FixedExpense],
) -> Vec<MonthlyPoint> {
    period
        .months_of_year()
        .map(|month| {
            let mut point = MonthlyPoint {
                year: month.year(),
                month: month.month(),
                income_minor: 0,
                variable_minor: 0,
                fixed_minor: sum_minor(
                    fixed_expenses
                        .iter()
                        .filter(|e| e.is_active_in(month))
                        .map(|e| e.amount_minor),
                ),
            };
            for tx in year_txs.iter().filter(|tx| month.contains(tx.date)) {
                match tx.kind {
                    TransactionKind::Income => {
                        point.income_minor = point.income_minor.saturating_add(tx.amount_minor);
                    }
                    TransactionKind::Expense => {
                        point.variable_minor = point.variable_minor.saturating_add(tx.amount_minor);
                    }
                    TransactionKind::GoalTransfer | TransactionKind::GoalWithdrawal => {}
                }
            }
            point
        })
        .collect()
}
