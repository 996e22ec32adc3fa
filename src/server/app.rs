use axum::extract::{DefaultBodyLimit, FromRef};
use axum::{http::StatusCode, routing::get, Router};
use routes::{category_router, questions_router, quizzes_router, uploads_router};
use sqlx::SqlitePool;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use super::routes;
use crate::services::QuestionService;
use crate::storage::StorageClient;

const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub struct AppState<S> {
    pool: SqlitePool,
    questions: QuestionService<S>,
}

impl<S: StorageClient> AppState<S> {
    pub fn new(pool: SqlitePool, storage: S) -> Self {
        Self {
            questions: QuestionService::new(storage, pool.clone()),
            pool,
        }
    }
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            questions: self.questions.clone(),
        }
    }
}

impl<S> FromRef<AppState<S>> for SqlitePool {
    fn from_ref(state: &AppState<S>) -> Self {
        state.pool.clone()
    }
}

impl<S> FromRef<AppState<S>> for QuestionService<S> {
    fn from_ref(state: &AppState<S>) -> Self {
        state.questions.clone()
    }
}

pub fn build_router<S: StorageClient + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/health", get(|| async { StatusCode::OK }))
        .merge(category_router(state.clone()))
        .merge(quizzes_router(state.clone()))
        .merge(questions_router(state.clone()))
        .merge(uploads_router(state))
        .fallback(|| async {
            tracing::info!("Fallback");
            StatusCode::NOT_FOUND
        })
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
}

pub async fn run_server<S: StorageClient + 'static>(
    pool: SqlitePool,
    storage: S,
    addr: &str,
) -> anyhow::Result<()> {
    let app = build_router(AppState::new(pool, storage));
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Serving on {addr}");
    axum::serve(listener, app).await?;
    Ok(())
}
