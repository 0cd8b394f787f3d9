use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::IntoResponse,
};
use engine::EngineError;

use serde::Serialize;
pub use server::{router, run, run_with_listener, spawn_with_listener};

mod expenses;
mod server;
mod users;

pub mod types {
    pub mod expense {
        pub use api_types::expense::{ExpenseNew, ExpenseResponse, ExpensesQuery};
    }

    pub mod user {
        pub use api_types::user::{UserCreated, UserNew, UserResponse};
    }
}

#[derive(Debug)]
pub enum ServerError {
    Engine(EngineError),
    NotFound(String),
    /// Malformed request: bad JSON body, path or query string.
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::UserNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::DuplicateExpense { .. } | EngineError::DuplicateUser { .. } => {
            StatusCode::CONFLICT
        }
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::InvalidAmount(_)
        | EngineError::InvalidExpenseDate(_)
        | EngineError::MissingComment
        | EngineError::InvalidCurrency { .. }
        | EngineError::UnrecognizedCurrency(_)
        | EngineError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    if let EngineError::Database(db_err) = &err {
        tracing::error!("database error: {db_err}");
    }
    err.to_string()
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), message_for_engine_error(err)),
            ServerError::NotFound(err) => (StatusCode::NOT_FOUND, err),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<JsonRejection> for ServerError {
    fn from(value: JsonRejection) -> Self {
        Self::Generic(value.body_text())
    }
}

impl From<PathRejection> for ServerError {
    fn from(value: PathRejection) -> Self {
        Self::Generic(value.body_text())
    }
}

impl From<QueryRejection> for ServerError {
    fn from(value: QueryRejection) -> Self {
        Self::Generic(value.body_text())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use engine::{Amount, Currency, InvalidDate};
    use http_body_util::BodyExt;
    use uuid::Uuid;

    use super::*;

    async fn body_of(res: axum::response::Response) -> serde_json::Value {
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn validation_errors_map_to_400() {
        let errors = [
            EngineError::InvalidAmount(Amount::new(0)),
            EngineError::InvalidExpenseDate(InvalidDate::Future(chrono::Utc::now())),
            EngineError::MissingComment,
            EngineError::InvalidCurrency {
                expense: Currency::Eur,
                user: Currency::Usd,
            },
            EngineError::UnrecognizedCurrency("XYZ".to_string()),
            EngineError::InvalidArgument("Invalid sort parameter.".to_string()),
        ];
        for err in errors {
            let res = ServerError::from(err).into_response();
            assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn duplicates_map_to_409() {
        let res = ServerError::from(EngineError::DuplicateExpense {
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            amount: Amount::new(10_000),
        })
        .into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);

        let res = ServerError::from(EngineError::DuplicateUser {
            first_name: "Tony".to_string(),
            last_name: "Stark".to_string(),
        })
        .into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn unknown_user_maps_to_404() {
        let res = ServerError::from(EngineError::UserNotFound(Uuid::nil())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn database_error_keeps_its_message() {
        let err = EngineError::Database(sea_orm::DbErr::Custom("disk I/O error".to_string()));
        let expected = err.to_string();

        let res = ServerError::from(err).into_response();

        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_of(res).await["error"], expected);
    }

    #[tokio::test]
    async fn error_body_carries_the_message() {
        let res = ServerError::from(EngineError::MissingComment).into_response();

        assert_eq!(body_of(res).await["error"], "Comment is mandatory.");
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
