//! Fixed expenses API endpoints, including the monthly paid checklist.

use api_types::{
    PaymentMethod, PeriodQuery,
    fixed_expense::{
        Checklist, FixedExpenseNew, FixedExpenseStatus, FixedExpenseView, PaymentUpdate,
        PaymentView,
    },
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{FixedExpenseCmd, Period};
use uuid::Uuid;

use crate::{ServerError, period_or_current, server::ServerState};

fn method_to_api(method: engine::PaymentMethod) -> PaymentMethod {
    match method {
        engine::PaymentMethod::Debit => PaymentMethod::Debit,
        engine::PaymentMethod::Credit => PaymentMethod::Credit,
    }
}

fn method_from_api(method: PaymentMethod) -> engine::PaymentMethod {
    match method {
        PaymentMethod::Debit => engine::PaymentMethod::Debit,
        PaymentMethod::Credit => engine::PaymentMethod::Credit,
    }
}

fn map_fixed_expense(expense: engine::FixedExpense) -> FixedExpenseView {
    FixedExpenseView {
        id: expense.id,
        description: expense.description,
        amount_minor: expense.amount_minor,
        due_day: expense.due_day,
        account_id: expense.account_id,
        responsible_id: expense.responsible_id,
        category_id: expense.category_id,
        recurrence_end: expense.recurrence_end,
        payment_method: method_to_api(expense.payment_method),
    }
}

pub(crate) fn map_checklist(period: Period, checklist: engine::FixedChecklist) -> Checklist {
    Checklist {
        year: period.year(),
        month: period.month(),
        items: checklist
            .items
            .into_iter()
            .map(|status| FixedExpenseStatus {
                expense: map_fixed_expense(status.expense),
                due_date: status.due_date,
                paid: status.paid,
                paid_on: status.paid_on,
            })
            .collect(),
        credit_total_minor: checklist.credit_total_minor,
        debit_total_minor: checklist.debit_total_minor,
        paid_total_minor: checklist.paid_total_minor,
        pending_total_minor: checklist.pending_total_minor,
    }
}

fn cmd_from_payload(payload: FixedExpenseNew) -> FixedExpenseCmd {
    FixedExpenseCmd {
        description: payload.description,
        amount_minor: payload.amount_minor,
        due_day: payload.due_day,
        account_id: payload.account_id,
        responsible_id: payload.responsible_id,
        category_id: payload.category_id,
        recurrence_end: payload.recurrence_end,
        payment_method: payload.payment_method.map(method_from_api),
    }
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<Vec<FixedExpenseView>>, ServerError> {
    let expenses = state
        .engine
        .fixed_expenses()
        .await?
        .into_iter()
        .map(map_fixed_expense)
        .collect();
    Ok(Json(expenses))
}

pub async fn get_one(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FixedExpenseView>, ServerError> {
    Ok(Json(map_fixed_expense(state.engine.fixed_expense(id).await?)))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<FixedExpenseNew>,
) -> Result<(StatusCode, Json<FixedExpenseView>), ServerError> {
    let expense = state
        .engine
        .new_fixed_expense(cmd_from_payload(payload))
        .await?;
    Ok((StatusCode::CREATED, Json(map_fixed_expense(expense))))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<FixedExpenseNew>,
) -> Result<Json<FixedExpenseView>, ServerError> {
    let expense = state
        .engine
        .update_fixed_expense(id, cmd_from_payload(payload))
        .await?;
    Ok(Json(map_fixed_expense(expense)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_fixed_expense(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn checklist(
    State(state): State<ServerState>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<Checklist>, ServerError> {
    let period = period_or_current(query.year, query.month)?;
    let checklist = state.engine.fixed_expense_checklist(period).await?;
    Ok(Json(map_checklist(period, checklist)))
}

pub async fn set_payment(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PaymentUpdate>,
) -> Result<Json<PaymentView>, ServerError> {
    let period = Period::new(payload.year, payload.month)?;
    let payment = state
        .engine
        .set_fixed_expense_paid(id, period, payload.paid)
        .await?;
    Ok(Json(PaymentView {
        fixed_expense_id: payment.fixed_expense_id,
        year: payment.year,
        month: payment.month,
        paid: payment.paid,
        paid_on: payment.paid_on,
    }))
}
