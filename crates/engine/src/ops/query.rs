use sea_orm::TransactionTrait;
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine,
    sorting::{ExpenseView, SortKey, SortOrder, project, sort_expenses},
};

use super::{Engine, with_tx};

impl Engine {
    /// Lists the expenses of a user, sorted and projected for display.
    ///
    /// `sort_by` is `date` (default) or `amount`, case-insensitive; any other
    /// value fails with [`EngineError::InvalidArgument`] before storage is
    /// touched. `sort_order` is `asc` (default) or `desc`; unknown values
    /// sort ascending.
    pub async fn expenses_for_user(
        &self,
        user_id: Uuid,
        sort_by: Option<&str>,
        sort_order: Option<&str>,
    ) -> ResultEngine<Vec<ExpenseView>> {
        let key = SortKey::parse(sort_by)?;
        let order = SortOrder::parse(sort_order);

        with_tx!(self, |db_tx| {
            let owner = self
                .find_user_by_id(&db_tx, user_id)
                .await?
                .ok_or(EngineError::UserNotFound(user_id))?;

            let mut expenses = self.find_expenses_by_user(&db_tx, user_id).await?;
            sort_expenses(&mut expenses, key, order);
            Ok(project(expenses, &owner))
        })
    }
}
