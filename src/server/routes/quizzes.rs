use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use sqlx::SqlitePool;

use crate::{
    db::{queries::quizzes, Quiz},
    server::{app::AppState, auth::AdminUser, error::ApiResponse, requests::quiz::QuizRequest},
    storage::StorageClient,
};

async fn create_quiz(
    State(pool): State<SqlitePool>,
    QuizRequest(quiz): QuizRequest,
) -> ApiResponse<(StatusCode, Json<Quiz>)> {
    let id = quizzes::create_quiz(&pool, &quiz.title, quiz.timer, quiz.is_posted).await?;
    tracing::info!(quiz_id = id, is_posted = quiz.is_posted, "Quiz created");
    Ok((StatusCode::CREATED, Json(quizzes::get_quiz(&pool, id).await?)))
}

async fn update_quiz(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
    QuizRequest(quiz): QuizRequest,
) -> ApiResponse<Json<Quiz>> {
    quizzes::update_quiz(&pool, id, &quiz.title, quiz.timer, quiz.is_posted).await?;
    tracing::info!(quiz_id = id, is_posted = quiz.is_posted, "Quiz updated");
    Ok(Json(quizzes::get_quiz(&pool, id).await?))
}

async fn quiz(
    _: AdminUser,
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> ApiResponse<Json<Quiz>> {
    Ok(Json(quizzes::get_quiz(&pool, id).await?))
}

pub fn quizzes_router<S: StorageClient + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/quizzes", post(create_quiz))
        .route("/quizzes/{id}", get(quiz).put(update_quiz))
        .with_state(state)
}
