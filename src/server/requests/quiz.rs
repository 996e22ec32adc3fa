//! Admin request for creating or updating a quiz.

use axum::extract::{FromRef, FromRequest, FromRequestParts, Request};
use axum::http::header;
use axum::{Form, Json};
use serde::Serialize;
use serde_json::Value;
use sqlx::SqlitePool;

use super::{validate, FieldRules, Messages, Payload, Rule, ValidationErrors};
use crate::db::User;
use crate::server::auth::CurrentUser;
use crate::server::error::ApiError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizInput {
    pub title: String,
    pub timer: Option<i64>,
    pub is_posted: bool,
}

impl QuizInput {
    fn from_validated(data: &Payload) -> Self {
        Self {
            title: data
                .get("title")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned(),
            timer: data.get("timer").and_then(Value::as_i64),
            is_posted: data
                .get("is_posted")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        }
    }
}

/// Only admins may create or update quizzes.
pub fn authorize(user: Option<&User>) -> bool {
    user.is_some_and(|user| user.role.can_manage_quizzes())
}

const QUIZ_RULES: &[FieldRules] = &[
    FieldRules {
        field: "title",
        rules: &[Rule::Required, Rule::String],
    },
    FieldRules {
        field: "timer",
        rules: &[Rule::Nullable, Rule::Integer],
    },
    FieldRules {
        field: "is_posted",
        rules: &[Rule::Nullable, Rule::Boolean],
    },
];

const QUIZ_MESSAGES: Messages = &[
    ("title.required", "The quiz title is required."),
    ("title.string", "The quiz title must be a string."),
    ("timer.integer", "The timer must be a number."),
    ("is_posted.boolean", "The posted status must be true or false."),
];

pub fn rules() -> &'static [FieldRules] {
    QUIZ_RULES
}

pub fn messages() -> Messages {
    QUIZ_MESSAGES
}

pub fn validated(payload: &Payload) -> Result<QuizInput, ValidationErrors> {
    let data = validate(payload, rules(), messages())?;
    let mut quiz = QuizInput::from_validated(&data);
    // Checkbox semantics: browsers omit unchecked boxes, so the key being
    // present is what marks the quiz as posted, whatever its value.
    quiz.is_posted = payload.contains_key("is_posted");
    Ok(quiz)
}

/// Extractor that authorizes the caller and validates a quiz payload sent as
/// JSON or as an urlencoded form.
pub struct QuizRequest(pub QuizInput);

impl<S> FromRequest<S> for QuizRequest
where
    S: Send + Sync,
    SqlitePool: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let (mut parts, body) = req.into_parts();
        let CurrentUser(user) = CurrentUser::from_request_parts(&mut parts, state).await?;
        if !authorize(user.as_ref()) {
            tracing::info!(user_id = ?user.as_ref().map(|user| user.id), "Quiz request is not authorized");
            return Err(ApiError::Forbidden);
        }

        let req = Request::from_parts(parts, body);
        let payload = read_payload(req, state).await?;
        validated(&payload).map(QuizRequest).map_err(ApiError::Validation)
    }
}

async fn read_payload<S: Send + Sync>(req: Request, state: &S) -> Result<Payload, ApiError> {
    let is_json = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"));

    if is_json {
        let Json(payload) = Json::<Payload>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        Ok(payload)
    } else {
        let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        Ok(pairs
            .into_iter()
            .map(|(key, value)| (key, Value::String(value)))
            .collect())
    }
}
