use sea_orm::{DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{Currency, EngineError, ResultEngine, User, users};

use super::{Engine, map_unique_violation, normalize_required_name, with_tx};

impl Engine {
    /// Stores `user`.
    ///
    /// Fails with [`EngineError::DuplicateUser`] when a user with the same
    /// first name, last name and currency already exists.
    pub async fn add_user(&self, user: &User) -> ResultEngine<()> {
        with_tx!(self, |db_tx| self.insert_user(&db_tx, user).await)
    }

    /// Creates and stores a new user from its identity triple.
    pub async fn create_user(
        &self,
        first_name: &str,
        last_name: &str,
        currency: Currency,
    ) -> ResultEngine<User> {
        let user = User::new(
            normalize_required_name(first_name, "first")?,
            normalize_required_name(last_name, "last")?,
            currency,
        );
        with_tx!(self, |db_tx| self.insert_user(&db_tx, &user).await)?;
        Ok(user)
    }

    pub async fn user_by_id(&self, user_id: Uuid) -> ResultEngine<Option<User>> {
        with_tx!(self, |db_tx| self.find_user_by_id(&db_tx, user_id).await)
    }

    pub async fn user_by_details(
        &self,
        first_name: &str,
        last_name: &str,
        currency: Currency,
    ) -> ResultEngine<Option<User>> {
        with_tx!(self, |db_tx| {
            self.find_user_by_details(&db_tx, first_name, last_name, currency)
                .await
        })
    }

    /// Finds the user with the given identity triple, creating it when
    /// missing. Resolving the same triple twice yields the same user and
    /// writes only once.
    pub async fn resolve_user(
        &self,
        first_name: &str,
        last_name: &str,
        currency: Currency,
    ) -> ResultEngine<User> {
        with_tx!(self, |db_tx| {
            self.resolve_user_in(&db_tx, first_name, last_name, currency)
                .await
        })
    }

    /// Lists every stored user ordered by last then first name.
    pub async fn list_users(&self) -> ResultEngine<Vec<User>> {
        with_tx!(self, |db_tx| {
            users::Entity::find()
                .order_by_asc(users::Column::LastName)
                .order_by_asc(users::Column::FirstName)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(User::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    pub(super) async fn find_user_by_id(
        &self,
        db: &DatabaseTransaction,
        user_id: Uuid,
    ) -> ResultEngine<Option<User>> {
        users::Entity::find_by_id(user_id)
            .one(db)
            .await?
            .map(User::try_from)
            .transpose()
    }

    pub(super) async fn find_user_by_details(
        &self,
        db: &DatabaseTransaction,
        first_name: &str,
        last_name: &str,
        currency: Currency,
    ) -> ResultEngine<Option<User>> {
        users::Entity::find()
            .filter(users::Column::FirstName.eq(first_name))
            .filter(users::Column::LastName.eq(last_name))
            .filter(users::Column::Currency.eq(currency.code()))
            .one(db)
            .await?
            .map(User::try_from)
            .transpose()
    }

    pub(super) async fn resolve_user_in(
        &self,
        db: &DatabaseTransaction,
        first_name: &str,
        last_name: &str,
        currency: Currency,
    ) -> ResultEngine<User> {
        let first_name = normalize_required_name(first_name, "first")?;
        let last_name = normalize_required_name(last_name, "last")?;

        if let Some(existing) = self
            .find_user_by_details(db, &first_name, &last_name, currency)
            .await?
        {
            tracing::debug!("resolved existing user {}", existing.id);
            return Ok(existing);
        }

        let user = User::new(first_name, last_name, currency);
        self.insert_user(db, &user).await?;
        tracing::info!("created user {} ({})", user.id, user.full_name());
        Ok(user)
    }

    /// Inserts `user`, re-checking the identity triple first. The unique
    /// index on the triple backs the check when two writers race.
    pub(super) async fn insert_user(
        &self,
        db: &DatabaseTransaction,
        user: &User,
    ) -> ResultEngine<()> {
        if self
            .find_user_by_details(db, &user.first_name, &user.last_name, user.currency)
            .await?
            .is_some()
        {
            return Err(EngineError::DuplicateUser {
                first_name: user.first_name.clone(),
                last_name: user.last_name.clone(),
            });
        }

        self.store_user(db, user).await
    }

    async fn store_user(&self, db: &DatabaseTransaction, user: &User) -> ResultEngine<()> {
        users::ActiveModel::from(user)
            .insert(db)
            .await
            .map_err(|err| {
                map_unique_violation(err, || EngineError::DuplicateUser {
                    first_name: user.first_name.clone(),
                    last_name: user.last_name.clone(),
                })
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use migration::MigratorTrait;
    use sea_orm::Database;

    use super::*;

    async fn engine() -> Engine {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        Engine::builder().database(db).build().await.unwrap()
    }

    #[tokio::test]
    async fn identity_index_maps_to_duplicate_user() {
        let engine = engine().await;
        engine
            .add_user(&User::new("Tony", "Stark", Currency::Usd))
            .await
            .unwrap();

        // Skips the lookup, as a concurrent writer would.
        let twin = User::new("Tony", "Stark", Currency::Usd);
        let db_tx = engine.database.begin().await.unwrap();
        let err = engine.store_user(&db_tx, &twin).await.unwrap_err();

        assert_eq!(
            err,
            EngineError::DuplicateUser {
                first_name: "Tony".to_string(),
                last_name: "Stark".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn identity_index_allows_another_currency() {
        let engine = engine().await;
        engine
            .add_user(&User::new("Tony", "Stark", Currency::Usd))
            .await
            .unwrap();

        let db_tx = engine.database.begin().await.unwrap();
        engine
            .store_user(&db_tx, &User::new("Tony", "Stark", Currency::Eur))
            .await
            .unwrap();
    }
}
