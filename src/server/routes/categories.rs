use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::{
    db::{queries::categories, Category},
    server::{app::AppState, auth::AdminUser, error::ApiResponse},
    storage::StorageClient,
};

#[derive(Deserialize)]
struct NewCategory {
    name: String,
}

async fn get_categories(
    _: AdminUser,
    State(pool): State<SqlitePool>,
) -> ApiResponse<Json<Vec<Category>>> {
    Ok(Json(categories::get_all_categories(&pool).await?))
}

async fn category(
    _: AdminUser,
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> ApiResponse<Json<Category>> {
    Ok(Json(categories::get_category(&pool, id).await?))
}

async fn create_category(
    _: AdminUser,
    State(pool): State<SqlitePool>,
    Json(new_category): Json<NewCategory>,
) -> ApiResponse<(StatusCode, Json<Category>)> {
    let id = categories::create_category(&pool, new_category.name.trim()).await?;
    tracing::info!(category_id = id, "Category created");
    Ok((
        StatusCode::CREATED,
        Json(categories::get_category(&pool, id).await?),
    ))
}

pub fn category_router<S: StorageClient + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/categories", get(get_categories).post(create_category))
        .route("/categories/{id}", get(category))
        .with_state(state)
}
