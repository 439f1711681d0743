//! Monthly transaction report exported as CSV.

use std::collections::HashMap;

use chrono::NaiveDate;
use csv::Writer;
use uuid::Uuid;

use crate::{
    EngineError, FixedExpense, MoneyCents, Period, ResultEngine, Transaction, TransactionKind,
    dashboard::Names,
};

pub const HEADER: [&str; 7] = [
    "Data",
    "Tipo",
    "Categoria",
    "Descrição",
    "Valor",
    "Conta/Cartão",
    "Responsável",
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportLine {
    pub date: NaiveDate,
    pub label: &'static str,
    pub category: Option<String>,
    pub description: Option<String>,
    pub amount_minor: i64,
    pub account: Option<String>,
    pub responsible: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    pub period: Period,
    pub lines: Vec<ReportLine>,
    pub total_income_minor: i64,
    /// Expenses, fixed expenses and goal transfers, net of goal withdrawals.
    pub total_expenses_minor: i64,
}

impl Report {
    /// `transactions` are the month's transactions already filtered by the
    /// caller; fixed expenses inactive in `period` are skipped.
    pub fn build(
        period: Period,
        transactions: &[Transaction],
        fixed_expenses: &[FixedExpense],
        names: &Names,
    ) -> Self {
        let lookup = |map: &HashMap<Uuid, String>, id: Option<Uuid>| {
            id.and_then(|id| map.get(&id)).cloned()
        };

        let mut total_income_minor: i64 = 0;
        let mut total_expenses_minor: i64 = 0;
        let mut lines = Vec::with_capacity(transactions.len() + fixed_expenses.len());

        for tx in transactions {
            match tx.kind {
                TransactionKind::Income => {
                    total_income_minor = total_income_minor.saturating_add(tx.amount_minor);
                }
                TransactionKind::Expense | TransactionKind::GoalTransfer => {
                    total_expenses_minor = total_expenses_minor.saturating_add(tx.amount_minor);
                }
                TransactionKind::GoalWithdrawal => {
                    total_expenses_minor = total_expenses_minor.saturating_sub(tx.amount_minor);
                }
            }
            lines.push(ReportLine {
                date: tx.date,
                label: tx.kind.label(),
                category: lookup(&names.categories, tx.category_id),
                description: tx.description.clone(),
                amount_minor: tx.amount_minor,
                account: lookup(&names.accounts, tx.account_id),
                responsible: lookup(&names.responsibles, tx.responsible_id),
            });
        }

        for expense in fixed_expenses.iter().filter(|e| e.is_active_in(period)) {
            total_expenses_minor = total_expenses_minor.saturating_add(expense.amount_minor);
            lines.push(ReportLine {
                date: period.first_day(),
                label: TransactionKind::Expense.label(),
                category: lookup(&names.categories, expense.category_id),
                description: Some(expense.description.clone()),
                amount_minor: expense.amount_minor,
                account: lookup(&names.accounts, expense.account_id),
                responsible: lookup(&names.responsibles, expense.responsible_id),
            });
        }

        Self {
            period,
            lines,
            total_income_minor,
            total_expenses_minor,
        }
    }

    pub fn balance_minor(&self) -> i64 {
        self.total_income_minor.saturating_sub(self.total_expenses_minor)
    }

    /// `relatorio-lancamentos-<month>-<year>.csv`
    pub fn file_name(&self) -> String {
        format!(
            "relatorio-lancamentos-{}-{}.csv",
            self.period.month(),
            self.period.year()
        )
    }

    pub fn to_csv(&self) -> ResultEngine<Vec<u8>> {
        let mut writer = Writer::from_writer(vec![]);
        writer.write_record(HEADER).map_err(export_error)?;

        for line in &self.lines {
            writer
                .write_record([
                    line.date.format("%Y-%m-%d").to_string(),
                    line.label.to_string(),
                    line.category.clone().unwrap_or_default(),
                    line.description.clone().unwrap_or_default(),
                    MoneyCents::new(line.amount_minor).to_decimal_string(),
                    line.account.clone().unwrap_or_default(),
                    line.responsible.clone().unwrap_or_default(),
                ])
                .map_err(export_error)?;
        }

        writer.write_record([""; 7]).map_err(export_error)?;
        for (label, amount) in [
            ("Total Receitas:", self.total_income_minor),
            ("Total Despesas:", self.total_expenses_minor),
            ("Saldo:", self.balance_minor()),
        ] {
            let value = MoneyCents::new(amount).to_decimal_string();
            writer
                .write_record(["", "", "", label, value.as_str(), "", ""])
                .map_err(export_error)?;
        }

        writer
            .into_inner()
            .map_err(|err| EngineError::Export(err.to_string()))
    }
}

fn export_error(err: csv::Error) -> EngineError {
    tracing::error!("failed to write report row: {err}");
    EngineError::Export(err.to_string())
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::PaymentMethod;

    fn tx(kind: TransactionKind, day: u32, amount_minor: i64) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2025, 11, day).unwrap(),
            kind,
            category_id: None,
            account_id: None,
            responsible_id: None,
            description: None,
            amount_minor,
            recurring: false,
            recurrence_end: None,
            installments: false,
            installments_remaining: None,
            goal_id: None,
            created_at: Utc.with_ymd_and_hms(2025, 11, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn csv_has_rows_blank_line_and_totals() {
        let market = Uuid::new_v4();
        let mut names = Names::default();
        names.categories.insert(market, "Mercado".to_string());

        let mut expense = tx(TransactionKind::Expense, 3, 12_550);
        expense.category_id = Some(market);
        expense.description = Some("Compra, semana".to_string());
        let rent = FixedExpense {
            id: Uuid::new_v4(),
            description: "Aluguel".to_string(),
            amount_minor: 150_000,
            due_day: 5,
            account_id: None,
            responsible_id: None,
            category_id: None,
            recurrence_end: None,
            payment_method: PaymentMethod::Debit,
        };
        let period = Period::new(2025, 11).unwrap();
        let report = Report::build(
            period,
            &[tx(TransactionKind::Income, 5, 500_000), expense],
            &[rent],
            &names,
        );

        assert_eq!(report.total_income_minor, 500_000);
        assert_eq!(report.total_expenses_minor, 162_550);
        assert_eq!(report.file_name(), "relatorio-lancamentos-11-2025.csv");

        let csv = String::from_utf8(report.to_csv().unwrap()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Data,Tipo,Categoria,Descrição,Valor,Conta/Cartão,Responsável",
                "2025-11-05,RECEITA,,,5000.00,,",
                "2025-11-03,DESPESA,Mercado,\"Compra, semana\",125.50,,",
                "2025-11-01,DESPESA,,Aluguel,1500.00,,",
                ",,,,,,",
                ",,,Total Receitas:,5000.00,,",
                ",,,Total Despesas:,1625.50,,",
                ",,,Saldo:,3374.50,,",
            ]
        );
    }

    #[test]
    fn goal_withdrawals_reduce_expense_total() {
        let period = Period::new(2025, 11).unwrap();
        let report = Report::build(
            period,
            &[
                tx(TransactionKind::GoalTransfer, 2, 10_000),
                tx(TransactionKind::GoalWithdrawal, 4, 4_000),
            ],
            &[],
            &Names::default(),
        );
        assert_eq!(report.total_expenses_minor, 6_000);
        assert_eq!(report.balance_minor(), -6_000);
        assert_eq!(report.lines[1].label, "RESGATE_META");
    }

    #[test]
    fn huge_rows_saturate_totals() {
        let period = Period::new(2025, 11).unwrap();
        let huge = i64::MAX / 2 + 1;
        let report = Report::build(
            period,
            &[
                tx(TransactionKind::Expense, 2, huge),
                tx(TransactionKind::Expense, 3, huge),
            ],
            &[],
            &Names::default(),
        );
        assert_eq!(report.total_expenses_minor, i64::MAX);
        assert_eq!(report.balance_minor(), -i64::MAX);
    }
}
