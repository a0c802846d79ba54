//! Expenses API endpoints

use api_types::expense::{ExpenseNew, ExpenseView};
use axum::{Extension, Json, extract::State, http::StatusCode};
use engine::Expense;

use crate::{ServerError, bookings::resolve_payment_mode, server::ServerState, user};

pub(crate) fn map_view(expense: Expense) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        title: expense.title,
        amount: expense.amount,
        category: expense.category,
        date: expense.date,
        payment_mode: expense.payment_mode.legacy(),
        note: expense.note,
        created_at: expense.created_at,
    }
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseNew>,
) -> Result<(StatusCode, Json<ExpenseView>), ServerError> {
    let payment_mode = resolve_payment_mode(payload.payment_mode, None)?;
    let expense = state
        .engine
        .new_expense(engine::NewExpense {
            user_id: user.username.clone(),
            title: payload.title,
            amount: payload.amount,
            category: payload.category,
            date: payload.date,
            payment_mode,
            note: payload.note,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(map_view(expense))))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<ExpenseView>>, ServerError> {
    let expenses = state.engine.expenses(&user.username).await?;
    Ok(Json(expenses.into_iter().map(map_view).collect()))
}
