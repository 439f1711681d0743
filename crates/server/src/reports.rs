//! CSV export of a month of transactions.

use api_types::transaction::TransactionListQuery;
use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::{ServerError, period_or_current, server::ServerState, transactions::list_filter};

/// `GET /reports/export`: the month's transactions and fixed expenses as an
/// attachment. Missing `year`/`month` select the current month.
pub async fn export(
    State(state): State<ServerState>,
    Query(query): Query<TransactionListQuery>,
) -> Result<Response, ServerError> {
    let period = period_or_current(query.year, query.month)?;
    let (file_name, body) = state
        .engine
        .export_csv(period, list_filter(query))
        .await?;
    tracing::info!("exported {file_name} ({} bytes)", body.len());

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        body,
    )
        .into_response())
}
