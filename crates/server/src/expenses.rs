//! Expenses API endpoints

use api_types::expense::{ExpenseNew, ExpenseResponse, ExpensesQuery};
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use chrono::Utc;
use engine::{Amount, Currency, EngineError, Expense, ExpenseCategory, ExpenseView, User};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn map_view(view: ExpenseView) -> ExpenseResponse {
    ExpenseResponse {
        date: view.date.fixed_offset(),
        category: view.category,
        amount_minor: view.amount_minor,
        currency: view.currency,
        comment: view.comment,
        user_full_name: view.user_full_name,
    }
}

fn no_expenses(user_id: Uuid) -> ServerError {
    ServerError::NotFound(format!("No expenses found for user with ID {user_id}."))
}

pub async fn expense_new(
    State(state): State<ServerState>,
    payload: Result<Json<ExpenseNew>, JsonRejection>,
) -> Result<(StatusCode, &'static str), ServerError> {
    let Json(payload) = payload?;
    // Amount comes first, before any code is parsed.
    let amount = Amount::new(payload.amount_minor);
    if !amount.is_positive() {
        return Err(EngineError::InvalidAmount(amount).into());
    }

    let user = User::new(
        payload.user.first_name,
        payload.user.last_name,
        Currency::try_from(payload.user.currency.as_str())?,
    );
    let expense = Expense::new(
        payload.date.with_timezone(&Utc),
        ExpenseCategory::try_from(payload.category.as_str())?,
        amount,
        Currency::try_from(payload.currency.as_str())?,
        payload.comment,
        user,
    )?;

    state.engine.submit_expense(expense).await?;

    Ok((StatusCode::CREATED, "Expense created successfully."))
}

/// Lists the expenses of a user.
///
/// An unknown user and a user without expenses both answer 404.
pub async fn list(
    State(state): State<ServerState>,
    user_id: Result<Path<Uuid>, PathRejection>,
    query: Result<Query<ExpensesQuery>, QueryRejection>,
) -> Result<Json<Vec<ExpenseResponse>>, ServerError> {
    let Path(user_id) = user_id?;
    let Query(query) = query?;
    let views = match state
        .engine
        .expenses_for_user(
            user_id,
            query.sort_by.as_deref(),
            query.sort_order.as_deref(),
        )
        .await
    {
        Ok(views) => views,
        Err(EngineError::UserNotFound(_)) => return Err(no_expenses(user_id)),
        Err(err) => return Err(err.into()),
    };

    if views.is_empty() {
        return Err(no_expenses(user_id));
    }

    Ok(Json(views.into_iter().map(map_view).collect()))
}
