use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod user {
    use super::*;

    /// Identity of the person an expense is declared for.
    ///
    /// `(first_name, last_name, currency)` identifies a user; submitting it
    /// again resolves to the stored user instead of creating a new one.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct UserNew {
        pub first_name: String,
        pub last_name: String,
        /// ISO 4217 code (`USD`, `EUR`, `RUB`).
        pub currency: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserResponse {
        pub id: Uuid,
        pub first_name: String,
        pub last_name: String,
        pub currency: String,
    }
}

pub mod expense {
    use super::*;
    use crate::user::UserNew;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        /// RFC3339 timestamp, including timezone offset (local user time).
        pub date: DateTime<FixedOffset>,
        /// `Restaurant`, `Hotel` or `Misc` (case-insensitive).
        pub category: String,
        pub amount_minor: i64,
        pub currency: String,
        pub comment: String,
        pub user: UserNew,
    }

    /// Query string of the expense listing.
    ///
    /// Both parameters are optional: `sortBy` defaults to `date`,
    /// `sortOrder` to `asc`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ExpensesQuery {
        #[serde(rename = "sortBy")]
        pub sort_by: Option<String>,
        #[serde(rename = "sortOrder")]
        pub sort_order: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseResponse {
        pub date: DateTime<FixedOffset>,
        pub category: String,
        pub amount_minor: i64,
        pub currency: String,
        pub comment: String,
        pub user_full_name: String,
    }
}
