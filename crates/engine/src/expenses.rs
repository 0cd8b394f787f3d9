//! Expense primitives.
//!
//! An [`Expense`] validates itself on construction and is immutable
//! afterwards, except for its owner which is rebound once when the submitted
//! user is resolved against storage.

use chrono::{DateTime, Months, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{
    Amount, Currency, EngineError, ExpenseCategory, ResultEngine, User, error::InvalidDate,
};

/// How far back an expense may be dated.
const MAX_AGE_MONTHS: u32 = 3;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expense {
    id: Option<i32>,
    date: DateTime<Utc>,
    category: ExpenseCategory,
    amount: Amount,
    currency: Currency,
    comment: String,
    user_id: Uuid,
    /// Owner as submitted by the caller, dropped once resolved. Never stored.
    submitted_by: Option<User>,
}

impl Expense {
    /// Builds an expense, validating it against the current time.
    pub fn new(
        date: DateTime<Utc>,
        category: ExpenseCategory,
        amount: Amount,
        currency: Currency,
        comment: impl Into<String>,
        user: User,
    ) -> ResultEngine<Self> {
        Self::new_at(date, category, amount, currency, comment, user, Utc::now())
    }

    /// Builds an expense, validating it against `now`.
    ///
    /// Rules are checked in order and the first violation is returned:
    /// amount, future date, date too old, missing comment, currency.
    pub fn new_at(
        date: DateTime<Utc>,
        category: ExpenseCategory,
        amount: Amount,
        currency: Currency,
        comment: impl Into<String>,
        user: User,
        now: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        let comment = comment.into();
        validate(date, amount, currency, &comment, &user, now)?;
        Ok(Self {
            id: None,
            date,
            category,
            amount,
            currency,
            comment,
            user_id: user.id,
            submitted_by: Some(user),
        })
    }

    /// Storage id, `None` until the expense has been persisted.
    #[must_use]
    pub fn id(&self) -> Option<i32> {
        self.id
    }

    #[must_use]
    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    /// Calendar day of the expense (UTC), the granularity used for
    /// duplicate detection.
    #[must_use]
    pub fn day(&self) -> NaiveDate {
        self.date.date_naive()
    }

    #[must_use]
    pub fn category(&self) -> ExpenseCategory {
        self.category
    }

    #[must_use]
    pub fn amount(&self) -> Amount {
        self.amount
    }

    #[must_use]
    pub fn currency(&self) -> Currency {
        self.currency
    }

    #[must_use]
    pub fn comment(&self) -> &str {
        &self.comment
    }

    #[must_use]
    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    /// The user as submitted, until the owner is resolved.
    #[must_use]
    pub fn submitted_by(&self) -> Option<&User> {
        self.submitted_by.as_ref()
    }

    /// Points the expense at a resolved user and drops the submitted one.
    pub(crate) fn bind_owner(&mut self, owner: &User) {
        self.user_id = owner.id;
        self.submitted_by = None;
    }

    /// Two expenses collide when they share owner, calendar day, amount and
    /// category.
    #[must_use]
    pub fn is_duplicate_of(&self, other: &Expense) -> bool {
        self.user_id == other.user_id
            && self.day() == other.day()
            && self.amount == other.amount
            && self.category == other.category
    }

    pub(crate) fn duplicate_error(&self) -> EngineError {
        EngineError::DuplicateExpense {
            date: self.day(),
            amount: self.amount,
        }
    }
}

fn validate(
    date: DateTime<Utc>,
    amount: Amount,
    currency: Currency,
    comment: &str,
    user: &User,
    now: DateTime<Utc>,
) -> ResultEngine<()> {
    if !amount.is_positive() {
        return Err(EngineError::InvalidAmount(amount));
    }
    if date > now {
        return Err(InvalidDate::Future(date).into());
    }
    let oldest = now
        .checked_sub_months(Months::new(MAX_AGE_MONTHS))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    if date < oldest {
        return Err(InvalidDate::TooOld(date).into());
    }
    if comment.trim().is_empty() {
        return Err(EngineError::MissingComment);
    }
    if !user.check_currency(currency.code())? {
        return Err(EngineError::InvalidCurrency {
            expense: currency,
            user: user.currency,
        });
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: Uuid,
    pub occurred_at: DateTimeUtc,
    pub occurred_on: Date,
    pub category: String,
    pub amount_minor: i64,
    pub currency: String,
    pub comment: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Expense> for ActiveModel {
    fn from(expense: &Expense) -> Self {
        Self {
            id: expense.id.map_or(ActiveValue::NotSet, ActiveValue::Set),
            user_id: ActiveValue::Set(expense.user_id),
            occurred_at: ActiveValue::Set(expense.date),
            occurred_on: ActiveValue::Set(expense.day()),
            category: ActiveValue::Set(expense.category.name().to_string()),
            amount_minor: ActiveValue::Set(expense.amount.minor()),
            currency: ActiveValue::Set(expense.currency.code().to_string()),
            comment: ActiveValue::Set(expense.comment.clone()),
        }
    }
}

impl TryFrom<Model> for Expense {
    type Error = EngineError;

    /// Rebuilds a stored expense. Stored rows were validated when written, so
    /// the time-dependent rules are not re-applied here.
    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Some(model.id),
            date: model.occurred_at,
            category: ExpenseCategory::try_from(model.category.as_str())?,
            amount: Amount::new(model.amount_minor),
            currency: Currency::try_from(model.currency.as_str())?,
            comment: model.comment,
            user_id: model.user_id,
            submitted_by: None,
        })
    }
}
