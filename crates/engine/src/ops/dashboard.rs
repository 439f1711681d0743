use chrono::Days;

use crate::{
    Period, ResultEngine, Transaction,
    dashboard::{Dashboard, DashboardData, SALARY_LOOKBACK_DAYS},
};

use super::{Engine, TransactionListFilter};

impl Engine {
    /// The monthly dashboard for `period`.
    ///
    /// Months before the `dashboard.start` parameter get an empty dashboard
    /// carrying an explanatory message.
    pub async fn dashboard(&self, period: Period) -> ResultEngine<Dashboard> {
        let db = &self.database;
        if let Some(start) = self.dashboard_start(db).await?
            && period < start
        {
            tracing::debug!("dashboard for {period} requested before start {start}");
            return Ok(Dashboard::empty(
                period,
                Some(format!("data available only from {start}")),
            ));
        }

        let year = self
            .list_transactions(
                db,
                &TransactionListFilter {
                    year: Some(period.year()),
                    ..Default::default()
                },
            )
            .await?;

        // The salary rule looks a few days into the previous month, which
        // may belong to the previous year.
        let mut window: Vec<Transaction> = year
            .iter()
            .filter(|tx| period.contains(tx.date))
            .cloned()
            .collect();
        let lookback_start = period
            .first_day()
            .checked_sub_days(Days::new(SALARY_LOOKBACK_DAYS))
            .unwrap_or(period.first_day());
        let previous = period.previous();
        let before: Vec<Transaction> = if previous.year() == period.year() {
            year.iter()
                .filter(|tx| previous.contains(tx.date))
                .cloned()
                .collect()
        } else {
            self.list_transactions(db, &TransactionListFilter::period(previous))
                .await?
        };
        window.extend(before.into_iter().filter(|tx| tx.date >= lookback_start));

        let data = DashboardData {
            window,
            year,
            fixed_expenses: self.all_fixed_expenses(db).await?,
            payments: self.payments_of(db, period).await?,
            names: self.load_names(db).await?,
        };
        Ok(Dashboard::build(period, &data, &self.dashboard))
    }
}
