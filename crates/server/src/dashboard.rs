use api_types::{
    PeriodQuery,
    dashboard::{DashboardView, LatestTransaction, MonthlyPoint},
};
use axum::{
    Json,
    extract::{Query, State},
};

use crate::{
    ServerError,
    fixed_expenses::map_checklist,
    period_or_current,
    server::ServerState,
    transactions::{map_grouping, map_kind},
};

fn groupings(groupings: Vec<engine::Grouping>) -> Vec<api_types::Grouping> {
    groupings.into_iter().map(map_grouping).collect()
}

fn map_dashboard(dashboard: engine::Dashboard) -> DashboardView {
    let period = dashboard.period;
    DashboardView {
        year: period.year(),
        month: period.month(),
        message: dashboard.message,
        total_income_minor: dashboard.total_income_minor,
        total_expenses_minor: dashboard.total_expenses_minor,
        total_fixed_minor: dashboard.total_fixed_minor,
        balance_minor: dashboard.balance_minor,
        fixed: map_checklist(period, dashboard.fixed),
        expenses_by_category: groupings(dashboard.expenses_by_category),
        expenses_by_responsible: groupings(dashboard.expenses_by_responsible),
        expenses_by_account: groupings(dashboard.expenses_by_account),
        fixed_by_category: groupings(dashboard.fixed_by_category),
        fixed_by_responsible: groupings(dashboard.fixed_by_responsible),
        income_by_category: groupings(dashboard.income_by_category),
        income_by_responsible: groupings(dashboard.income_by_responsible),
        income_by_account: groupings(dashboard.income_by_account),
        monthly: dashboard
            .monthly
            .into_iter()
            .map(|point| MonthlyPoint {
                year: point.year,
                month: point.month,
                income_minor: point.income_minor,
                variable_minor: point.variable_minor,
                fixed_minor: point.fixed_minor,
            })
            .collect(),
        latest: dashboard
            .latest
            .into_iter()
            .map(|tx| LatestTransaction {
                id: tx.id,
                date: tx.date,
                kind: map_kind(tx.kind),
                description: tx.description,
                amount_minor: tx.amount_minor,
                category: tx.category,
                responsible: tx.responsible,
            })
            .collect(),
    }
}

/// `GET /dashboard?year=&month=`
pub async fn get(
    State(state): State<ServerState>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<DashboardView>, ServerError> {
    let period = period_or_current(query.year, query.month)?;
    let dashboard = state.engine.dashboard(period).await?;
    Ok(Json(map_dashboard(dashboard)))
}
