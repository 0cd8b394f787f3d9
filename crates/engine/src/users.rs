//! Users who declare expenses.
//!
//! A user is identified by the triple `(first_name, last_name, currency)`:
//! no two stored users may share all three. The surrogate `id` is assigned
//! on creation and never changes.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Currency, EngineError, ResultEngine};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub currency: Currency,
}

impl User {
    /// Builds a transient user with a freshly generated id.
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>, currency: Currency) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            currency,
        }
    }

    /// Display name: first and last name separated by a space.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Returns whether `currency` is the currency of this user.
    ///
    /// `currency` is a raw code as received from outside the engine; codes
    /// that are not a known [`Currency`] are rejected with
    /// [`EngineError::UnrecognizedCurrency`] instead of being coerced.
    pub fn check_currency(&self, currency: &str) -> ResultEngine<bool> {
        let currency = Currency::try_from(currency)?;
        Ok(currency == self.currency)
    }

    /// Returns whether `other` has the same identity triple.
    #[must_use]
    pub fn same_identity(&self, other: &User) -> bool {
        self.first_name == other.first_name
            && self.last_name == other.last_name
            && self.currency == other.currency
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub currency: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::expenses::Entity")]
    Expenses,
}

impl Related<super::expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&User> for ActiveModel {
    fn from(user: &User) -> Self {
        Self {
            id: ActiveValue::Set(user.id),
            first_name: ActiveValue::Set(user.first_name.clone()),
            last_name: ActiveValue::Set(user.last_name.clone()),
            currency: ActiveValue::Set(user.currency.code().to_string()),
        }
    }
}

impl TryFrom<Model> for User {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            currency: Currency::try_from(model.currency.as_str())?,
            first_name: model.first_name,
            last_name: model.last_name,
        })
    }
}
