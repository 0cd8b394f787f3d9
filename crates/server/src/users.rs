//! Users API endpoints

use api_types::user::{UserCreated, UserNew, UserResponse};
use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use engine::{Currency, EngineError};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

pub async fn user_new(
    State(state): State<ServerState>,
    payload: Result<Json<UserNew>, JsonRejection>,
) -> Result<(StatusCode, Json<UserCreated>), ServerError> {
    let Json(payload) = payload?;
    let currency = Currency::try_from(payload.currency.as_str())?;
    let user = state
        .engine
        .create_user(&payload.first_name, &payload.last_name, currency)
        .await?;

    Ok((StatusCode::CREATED, Json(UserCreated { id: user.id })))
}

pub async fn get(
    State(state): State<ServerState>,
    user_id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<UserResponse>, ServerError> {
    let Path(user_id) = user_id?;
    let user = state
        .engine
        .user_by_id(user_id)
        .await?
        .ok_or(EngineError::UserNotFound(user_id))?;

    Ok(Json(UserResponse {
        id: user.id,
        first_name: user.first_name,
        last_name: user.last_name,
        currency: user.currency.code().to_string(),
    }))
}
