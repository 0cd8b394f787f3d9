use sea_orm::{DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{Expense, ResultEngine, expenses};

use super::{Engine, map_unique_violation, with_tx};

impl Engine {
    /// Stores `expense` as is and returns the stored copy.
    ///
    /// No owner resolution happens here: the expense must already point at a
    /// stored user. Use [`Engine::submit_expense`] for the full workflow.
    pub async fn add_expense(&self, expense: &Expense) -> ResultEngine<Expense> {
        with_tx!(self, |db_tx| self.insert_expense(&db_tx, expense).await)
    }

    /// Every expense owned by `user_id`, in insertion order.
    pub async fn expenses_by_user(&self, user_id: Uuid) -> ResultEngine<Vec<Expense>> {
        with_tx!(self, |db_tx| self.find_expenses_by_user(&db_tx, user_id).await)
    }

    /// Whether a stored expense collides with `expense`: same owner, same
    /// calendar day, same amount and same category.
    pub async fn check_duplicate(&self, expense: &Expense) -> ResultEngine<bool> {
        with_tx!(self, |db_tx| self.has_duplicate(&db_tx, expense).await)
    }

    pub(super) async fn insert_expense(
        &self,
        db: &DatabaseTransaction,
        expense: &Expense,
    ) -> ResultEngine<Expense> {
        let model = expenses::ActiveModel::from(expense)
            .insert(db)
            .await
            .map_err(|err| map_unique_violation(err, || expense.duplicate_error()))?;
        Expense::try_from(model)
    }

    pub(super) async fn find_expenses_by_user(
        &self,
        db: &DatabaseTransaction,
        user_id: Uuid,
    ) -> ResultEngine<Vec<Expense>> {
        expenses::Entity::find()
            .filter(expenses::Column::UserId.eq(user_id))
            .order_by_asc(expenses::Column::Id)
            .all(db)
            .await?
            .into_iter()
            .map(Expense::try_from)
            .collect()
    }

    pub(super) async fn has_duplicate(
        &self,
        db: &DatabaseTransaction,
        expense: &Expense,
    ) -> ResultEngine<bool> {
        let found = expenses::Entity::find()
            .filter(expenses::Column::UserId.eq(expense.user_id()))
            .filter(expenses::Column::OccurredOn.eq(expense.day()))
            .filter(expenses::Column::AmountMinor.eq(expense.amount().minor()))
            .filter(expenses::Column::Category.eq(expense.category().name()))
            .one(db)
            .await?;
        Ok(found.is_some())
    }
}
