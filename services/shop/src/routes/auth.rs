//! Registration and login endpoints

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;

use super::ApiJson;
use crate::{error::ApiResult, state::AppState};

/// Registration request body; presence is checked by the service
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Login request body, shared by user and administrator login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

pub async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    state
        .auth
        .register(
            payload.name.as_deref(),
            payload.email.as_deref(),
            payload.password.as_deref(),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User registered successfully" })),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let response = state
        .auth
        .login(payload.email.as_deref(), payload.password.as_deref())
        .await?;
    Ok(Json(response))
}

pub async fn admin_login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let response = state
        .auth
        .login_admin(payload.email.as_deref(), payload.password.as_deref())
        .await?;
    Ok(Json(response))
}
