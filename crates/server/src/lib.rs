use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::{EngineError, Period};

use serde::Serialize;
pub use server::{Credentials, ServerOptions, router, run, run_with_listener, spawn_with_listener};

mod accounts;
mod categories;
mod dashboard;
mod fixed_expenses;
mod goals;
mod parameters;
mod reports;
mod responsibles;
mod server;
mod transactions;

pub mod types {
    pub use api_types::{
        CategoryKind, GoalKind, Grouping, Health, PaymentMethod, PeriodQuery, TransactionKind,
    };

    pub mod category {
        pub use api_types::category::{CategoryListQuery, CategoryNew, CategoryView};
    }

    pub mod account {
        pub use api_types::account::{AccountNew, AccountView};
    }

    pub mod responsible {
        pub use api_types::responsible::{ResponsibleNew, ResponsibleView};
    }

    pub mod transaction {
        pub use api_types::transaction::{
            TransactionGroupQuery, TransactionListQuery, TransactionNew, TransactionView,
        };
    }

    pub mod fixed_expense {
        pub use api_types::fixed_expense::{
            Checklist, FixedExpenseNew, FixedExpenseStatus, FixedExpenseView, PaymentUpdate,
            PaymentView,
        };
    }

    pub mod goal {
        pub use api_types::goal::{AmountQuery, GoalNew, GoalProgressView, GoalView};
    }

    pub mod dashboard {
        pub use api_types::dashboard::{DashboardView, LatestTransaction, MonthlyPoint};
    }

    pub mod parameter {
        pub use api_types::parameter::{ParameterSet, ParameterView};
    }
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) | EngineError::InUse(_) => StatusCode::CONFLICT,
        EngineError::Export(_) | EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::InvalidAmount(_)
        | EngineError::InvalidName(_)
        | EngineError::InvalidDate(_)
        | EngineError::InvalidKind(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        EngineError::Export(reason) => {
            tracing::error!("export error: {reason}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), message_for_engine_error(err)),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

/// Resolve `?year=&month=`, filling whatever is missing from the current month.
fn period_or_current(year: Option<i32>, month: Option<u32>) -> Result<Period, ServerError> {
    let current = Period::current();
    Ok(Period::new(
        year.unwrap_or(current.year()),
        month.unwrap_or(current.month()),
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::KeyNotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn engine_conflict_maps_to_409() {
        let res = ServerError::from(EngineError::ExistingKey("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn engine_in_use_maps_to_409() {
        let res = ServerError::from(EngineError::InUse("Mercado".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn engine_validation_maps_to_422() {
        for err in [
            EngineError::InvalidAmount("x".to_string()),
            EngineError::InvalidName("x".to_string()),
            EngineError::InvalidDate("x".to_string()),
            EngineError::InvalidKind("x".to_string()),
        ] {
            let res = ServerError::from(err).into_response();
            assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        }
    }

    #[test]
    fn engine_export_maps_to_500() {
        let res = ServerError::from(EngineError::Export("disk".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn missing_period_fields_use_current_month() {
        let current = Period::current();
        let period = period_or_current(Some(2024), None).ok();
        assert_eq!(period, Period::new(2024, current.month()).ok());
        assert!(period_or_current(Some(2024), Some(13)).is_err());
    }
}
