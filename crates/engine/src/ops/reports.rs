use crate::{Period, ResultEngine, report::Report};

use super::{Engine, TransactionListFilter};

impl Engine {
    /// Build the month's report. `filter` narrows the transactions; its
    /// `year`/`month` are replaced by `period`.
    pub async fn report(
        &self,
        period: Period,
        filter: TransactionListFilter,
    ) -> ResultEngine<Report> {
        let db = &self.database;
        let filter = TransactionListFilter {
            year: Some(period.year()),
            month: Some(period.month()),
            ..filter
        };
        let mut transactions = self.list_transactions(db, &filter).await?;
        transactions.reverse();

        let fixed_expenses = self.all_fixed_expenses(db).await?;
        let names = self.load_names(db).await?;
        tracing::debug!(
            "report for {period}: {} transactions, {} fixed expenses",
            transactions.len(),
            fixed_expenses.len()
        );
        Ok(Report::build(period, &transactions, &fixed_expenses, &names))
    }

    /// The month's report rendered as CSV.
    pub async fn export_csv(
        &self,
        period: Period,
        filter: TransactionListFilter,
    ) -> ResultEngine<(String, Vec<u8>)> {
        let report = self.report(period, filter).await?;
        Ok((report.file_name(), report.to_csv()?))
    }
}
