use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use axum_typed_multipart::{FieldData, TryFromMultipart, TypedMultipart};
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{choices, questions, quizzes},
        Choice, Question,
    },
    server::{app::AppState, auth::AdminUser, error::ApiResponse},
    services::{NewChoice, NewQuestion, QuestionService},
    storage::StorageClient,
};

use super::uploaded_file;

#[derive(TryFromMultipart)]
struct NewQuestionForm {
    category_id: i64,
    question_text: String,
    #[form_data(limit = "10MiB")]
    question_image: Option<FieldData<Bytes>>,
}

#[derive(TryFromMultipart)]
struct NewChoiceForm {
    choice_text: String,
    #[form_data(limit = "10MiB")]
    choice_image: Option<FieldData<Bytes>>,
    order_index: Option<i64>,
}

async fn quiz_questions(
    _: AdminUser,
    State(pool): State<SqlitePool>,
    Path(quiz_id): Path<i64>,
) -> ApiResponse<Json<Vec<Question>>> {
    let quiz = quizzes::get_quiz(&pool, quiz_id).await?;
    Ok(Json(questions::get_questions_for_quiz(&pool, quiz.id).await?))
}

async fn create_question<S: StorageClient + 'static>(
    _: AdminUser,
    State(pool): State<SqlitePool>,
    State(service): State<QuestionService<S>>,
    Path(quiz_id): Path<i64>,
    TypedMultipart(form): TypedMultipart<NewQuestionForm>,
) -> ApiResponse<(StatusCode, Json<Question>)> {
    let quiz = quizzes::get_quiz(&pool, quiz_id).await?;
    let question = service
        .create_question(
            &quiz,
            NewQuestion {
                category_id: form.category_id,
                question_text: form.question_text,
                question_image: uploaded_file(form.question_image),
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(question)))
}

async fn question_choices(
    _: AdminUser,
    State(pool): State<SqlitePool>,
    Path(question_id): Path<i64>,
) -> ApiResponse<Json<Vec<Choice>>> {
    let question = questions::get_question(&pool, question_id).await?;
    Ok(Json(
        choices::get_choices_for_question(&pool, question.id).await?,
    ))
}

async fn create_choice<S: StorageClient + 'static>(
    _: AdminUser,
    State(pool): State<SqlitePool>,
    State(service): State<QuestionService<S>>,
    Path(question_id): Path<i64>,
    TypedMultipart(form): TypedMultipart<NewChoiceForm>,
) -> ApiResponse<(StatusCode, Json<Choice>)> {
    let question = questions::get_question(&pool, question_id).await?;
    // Without an explicit position the choice goes after the existing ones.
    let index = match form.order_index {
        Some(index) => index,
        None => choices::count_choices(&pool, question.id).await?,
    };
    let choice = service
        .handle_choice(
            &question,
            NewChoice {
                choice_text: form.choice_text,
                choice_image: uploaded_file(form.choice_image),
            },
            index,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(choice)))
}

pub fn questions_router<S: StorageClient + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route(
            "/quizzes/{id}/questions",
            get(quiz_questions).post(create_question::<S>),
        )
        .route(
            "/questions/{id}/choices",
            get(question_choices).post(create_choice::<S>),
        )
        .with_state(state)
}
