//! Ordering and projection of a user's expenses for display.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{EngineError, Expense, ResultEngine, User};

/// Field the expense list is ordered by.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Date,
    Amount,
}

impl SortKey {
    /// Parses an optional, case-insensitive sort key. `None` means date.
    pub fn parse(value: Option<&str>) -> ResultEngine<Self> {
        let Some(value) = value else {
            return Ok(Self::default());
        };
        match value.trim().to_ascii_lowercase().as_str() {
            "date" => Ok(Self::Date),
            "amount" => Ok(Self::Amount),
            _ => Err(EngineError::InvalidArgument(
                "Invalid sort parameter.".to_string(),
            )),
        }
    }
}

/// Direction of the ordering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Parses an optional direction. Only `desc` (any case) selects
    /// descending order; anything else, unknown values included, is
    /// ascending.
    #[must_use]
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some(value) if value.trim().eq_ignore_ascii_case("desc") => Self::Desc,
            _ => Self::Asc,
        }
    }
}

/// Read-only display record of a stored expense.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseView {
    pub date: DateTime<Utc>,
    pub category: String,
    pub amount_minor: i64,
    pub currency: String,
    pub comment: String,
    pub user_full_name: String,
}

/// Sorts in place. The sort is stable: expenses with equal keys keep their
/// retrieval order, in both directions.
pub fn sort_expenses(expenses: &mut [Expense], key: SortKey, order: SortOrder) {
    match (key, order) {
        (SortKey::Date, SortOrder::Asc) => expenses.sort_by_key(Expense::date),
        (SortKey::Date, SortOrder::Desc) => {
            expenses.sort_by(|a, b| b.date().cmp(&a.date()));
        }
        (SortKey::Amount, SortOrder::Asc) => expenses.sort_by_key(Expense::amount),
        (SortKey::Amount, SortOrder::Desc) => {
            expenses.sort_by(|a, b| b.amount().cmp(&a.amount()));
        }
    }
}

/// Projects expenses owned by `owner`, resolving the display name once.
pub fn project(expenses: Vec<Expense>, owner: &User) -> Vec<ExpenseView> {
    let user_full_name = owner.full_name();
    expenses
        .into_iter()
        .map(|expense| ExpenseView {
            date: expense.date(),
            category: expense.category().name().to_string(),
            amount_minor: expense.amount().minor(),
            currency: expense.currency().code().to_string(),
            comment: expense.comment().to_string(),
            user_full_name: user_full_name.clone(),
        })
        .collect()
}
