//! Expense tracking engine.
//!
//! Users declare expenses tied to themselves; the engine validates them,
//! resolves (or creates) their owner, rejects duplicates and stores them. A
//! user's expenses can then be listed sorted by date or amount.

pub use category::ExpenseCategory;
pub use currency::Currency;
pub use error::{EngineError, InvalidDate};
pub use expenses::Expense;
pub use money::Amount;
pub use ops::{Engine, EngineBuilder};
pub use sorting::{ExpenseView, SortKey, SortOrder, project, sort_expenses};
pub use users::User;

mod category;
mod currency;
mod error;
mod expenses;
mod money;
mod ops;
mod sorting;
mod users;

type ResultEngine<T> = Result<T, EngineError>;
