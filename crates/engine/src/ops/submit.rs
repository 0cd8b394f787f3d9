use sea_orm::TransactionTrait;

use crate::{EngineError, Expense, ResultEngine};

use super::{Engine, with_tx};

impl Engine {
    /// Submits a validated expense.
    ///
    /// Steps, each failure being final:
    ///
    /// 1. resolve the owner: the submitted user is looked up by identity
    ///    triple and created when missing; an expense without a submitted
    ///    user must point at a stored one ([`EngineError::UserNotFound`]);
    /// 2. bind the expense to the resolved owner, dropping the submitted user;
    /// 3. reject it with [`EngineError::DuplicateExpense`] if it collides with
    ///    a stored expense;
    /// 4. store it.
    ///
    /// Returns the stored expense.
    pub async fn submit_expense(&self, mut expense: Expense) -> ResultEngine<Expense> {
        with_tx!(self, |db_tx| {
            let owner = match expense.submitted_by() {
                Some(submitted) => {
                    self.resolve_user_in(
                        &db_tx,
                        &submitted.first_name,
                        &submitted.last_name,
                        submitted.currency,
                    )
                    .await?
                }
                None => self
                    .find_user_by_id(&db_tx, expense.user_id())
                    .await?
                    .ok_or(EngineError::UserNotFound(expense.user_id()))?,
            };
            expense.bind_owner(&owner);

            if self.has_duplicate(&db_tx, &expense).await? {
                tracing::debug!(
                    "duplicate expense for user {} on {}",
                    owner.id,
                    expense.day()
                );
                Err(expense.duplicate_error())
            } else {
                let stored = self.insert_expense(&db_tx, &expense).await?;
                tracing::info!(
                    "stored expense {:?} for user {}",
                    stored.id(),
                    stored.user_id()
                );
                Ok(stored)
            }
        })
    }
}
