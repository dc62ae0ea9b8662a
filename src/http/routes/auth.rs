use axum::{extract::State, http::StatusCode, routing::post, Json, Router};

use crate::domain::user::Credentials;
use crate::http::routing::AppState;
use crate::http::types::{ApiError, JsonBody, TokenBody};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

async fn register(State(state): State<AppState>, JsonBody(body): JsonBody<Credentials>) -> Result<(StatusCode, Json<TokenBody>), ApiError> {
    let token = state.auth.register(&body.email, &body.password).await?;
    Ok((StatusCode::CREATED, Json(TokenBody { token })))
}

async fn login(State(state): State<AppState>, JsonBody(body): JsonBody<Credentials>) -> Result<Json<TokenBody>, ApiError> {
    let token = state.auth.login(&body.email, &body.password).await?;
    Ok(Json(TokenBody { token }))
}
