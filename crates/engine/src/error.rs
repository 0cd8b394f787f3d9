//! The module contains the errors the engine can throw.
//!
//! Validation failures raised while building an [`Expense`]:
//!
//! - [`InvalidAmount`], [`InvalidExpenseDate`], [`MissingComment`],
//!   [`InvalidCurrency`] and [`UnrecognizedCurrency`].
//!
//! Conflicts raised while submitting:
//!
//! - [`DuplicateExpense`] and [`DuplicateUser`].
//!
//! Lookups raise [`UserNotFound`], bad query parameters raise
//! [`InvalidArgument`]. Storage failures are carried verbatim in
//! [`Database`].
//!
//!  [`Expense`]: crate::Expense
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`InvalidExpenseDate`]: EngineError::InvalidExpenseDate
//!  [`MissingComment`]: EngineError::MissingComment
//!  [`InvalidCurrency`]: EngineError::InvalidCurrency
//!  [`UnrecognizedCurrency`]: EngineError::UnrecognizedCurrency
//!  [`DuplicateExpense`]: EngineError::DuplicateExpense
//!  [`DuplicateUser`]: EngineError::DuplicateUser
//!  [`UserNotFound`]: EngineError::UserNotFound
//!  [`InvalidArgument`]: EngineError::InvalidArgument
//!  [`Database`]: EngineError::Database
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

use crate::{Amount, Currency};

/// Format used when a date is embedded in an error message.
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// Why an expense date was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidDate {
    #[error("The expense date {} cannot be in the future.", .0.format(DATE_FORMAT))]
    Future(DateTime<Utc>),
    #[error("The expense cannot be dated more than 3 months ago.")]
    TooOld(DateTime<Utc>),
}

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Amount must be greater than zero. Provided amount: {0}.")]
    InvalidAmount(Amount),
    #[error(transparent)]
    InvalidExpenseDate(#[from] InvalidDate),
    #[error("Comment is mandatory.")]
    MissingComment,
    #[error("The expense currency ({expense}) does not match the user's currency ({user}).")]
    InvalidCurrency { expense: Currency, user: Currency },
    #[error("The expense currency ({0}) isn't recognized.")]
    UnrecognizedCurrency(String),
    #[error("An expense with date {date} and amount {amount} has already been declared.")]
    DuplicateExpense { date: NaiveDate, amount: Amount },
    #[error("A user with the same details already exists: {first_name} {last_name}")]
    DuplicateUser {
        first_name: String,
        last_name: String,
    },
    #[error("User with ID {0} not found.")]
    UserNotFound(Uuid),
    #[error("{0}")]
    InvalidArgument(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidExpenseDate(a), Self::InvalidExpenseDate(b)) => a == b,
            (Self::MissingComment, Self::MissingComment) => true,
            (
                Self::InvalidCurrency {
                    expense: a,
                    user: b,
                },
                Self::InvalidCurrency {
                    expense: c,
                    user: d,
                },
            ) => a == c && b == d,
            (Self::UnrecognizedCurrency(a), Self::UnrecognizedCurrency(b)) => a == b,
            (
                Self::DuplicateExpense { date: a, amount: b },
                Self::DuplicateExpense { date: c, amount: d },
            ) => a == c && b == d,
            (
                Self::DuplicateUser {
                    first_name: a,
                    last_name: b,
                },
                Self::DuplicateUser {
                    first_name: c,
                    last_name: d,
                },
            ) => a == c && b == d,
            (Self::UserNotFound(a), Self::UserNotFound(b)) => a == b,
            (Self::InvalidArgument(a), Self::InvalidArgument(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
