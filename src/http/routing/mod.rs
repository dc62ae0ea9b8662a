use std::sync::Arc;

use axum::{http::HeaderValue, middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use super::middleware::{cors, require_auth};
use super::routes::{auth, lists, todos};
use crate::application::{
    auth_service::{AuthService, AuthServiceImpl},
    todo_service::{TodoService, TodoServiceImpl},
};
use crate::infrastructure::{jwt::TokenIssuer, sqlite_repo::SqliteRepository};

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<dyn AuthService>,
    pub todos: Arc<dyn TodoService>,
}

impl AppState {
    pub fn new(repo: SqliteRepository, tokens: TokenIssuer) -> Self {
        Self {
            auth: Arc::new(AuthServiceImpl::new(repo.clone(), tokens)),
            todos: Arc::new(TodoServiceImpl::new(repo)),
        }
    }
}

pub fn app(state: AppState, cors_origin: HeaderValue) -> Router {
    let protected = Router::new()
        .merge(todos::router())
        .merge(lists::router())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .nest("/api", auth::router().merge(protected))
        .with_state(state)
        .layer(middleware::from_fn_with_state(cors_origin, cors))
        .layer(TraceLayer::new_for_http())
}
