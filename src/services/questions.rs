//! Question and choice creation, including their image uploads.
//!
//! Every call that reaches the storage client goes through [`log_failure`],
//! so a failed upload is logged exactly once with the context of the call
//! site and then handed back to the caller unchanged. There is no retry: the
//! first failure aborts the operation and nothing is written to the database.

use std::future::Future;
use std::sync::Arc;

use sqlx::SqlitePool;
use thiserror::Error;
use uuid::Uuid;

use crate::db::queries::{categories, choices, questions};
use crate::db::{Choice, Question, Quiz};
use crate::storage::{StorageClient, StorageError, UploadedFile};

pub const QUESTIONS_FOLDER: &str = "questions";
pub const CHOICES_FOLDER: &str = "choices";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Upload(#[from] StorageError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub struct NewChoice {
    pub choice_text: String,
    pub choice_image: Option<UploadedFile>,
}

pub struct NewQuestion {
    pub category_id: i64,
    pub question_text: String,
    pub question_image: Option<UploadedFile>,
}

pub struct QuestionService<S> {
    storage: Arc<S>,
    pool: SqlitePool,
}

impl<S> Clone for QuestionService<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            pool: self.pool.clone(),
        }
    }
}

impl<S: StorageClient> QuestionService<S> {
    pub fn new(storage: S, pool: SqlitePool) -> Self {
        Self {
            storage: Arc::new(storage),
            pool,
        }
    }

    /// Uploads `file` into `folder` and returns its url. The url always
    /// contains `"{folder}/"`.
    pub async fn upload_file(&self, file: &UploadedFile, folder: &str) -> Result<String, StorageError> {
        log_failure(self.store(file, folder), |error| {
            tracing::error!(
                file = %file.file_name,
                folder,
                error = %error,
                "File upload to Supabase failed"
            );
        })
        .await
    }

    /// Creates the choice at position `index` of `question`, uploading its
    /// image first when one is given. A failed upload leaves no choice behind.
    pub async fn handle_choice(
        &self,
        question: &Question,
        choice: NewChoice,
        index: i64,
    ) -> Result<Choice, ServiceError> {
        let choice_image_url = match &choice.choice_image {
            Some(image) => Some(
                log_failure(self.store(image, CHOICES_FOLDER), |error| {
                    tracing::error!(
                        question_id = question.id,
                        index,
                        file = %image.file_name,
                        error = %error,
                        "Choice image upload failed"
                    );
                })
                .await?,
            ),
            None => None,
        };

        let choice = choices::create_choice(
            &self.pool,
            question.id,
            &choice.choice_text,
            choice_image_url.as_deref(),
            index,
        )
        .await?;
        tracing::info!(question_id = question.id, choice_id = choice.id, index, "Choice created");
        Ok(choice)
    }

    pub async fn create_question(
        &self,
        quiz: &Quiz,
        question: NewQuestion,
    ) -> Result<Question, ServiceError> {
        // Unknown categories must fail before anything is uploaded.
        categories::get_category(&self.pool, question.category_id).await?;

        let question_image_url = match &question.question_image {
            Some(image) => Some(self.upload_file(image, QUESTIONS_FOLDER).await?),
            None => None,
        };

        let id = questions::create_question(
            &self.pool,
            quiz.id,
            question.category_id,
            &question.question_text,
            question_image_url.as_deref(),
        )
        .await?;
        tracing::info!(quiz_id = quiz.id, question_id = id, "Question created");
        Ok(questions::get_question(&self.pool, id).await?)
    }

    async fn store(&self, file: &UploadedFile, folder: &str) -> Result<String, StorageError> {
        let path = object_path(folder, &file.file_name);
        self.storage.upload_image(file, &path).await
    }
}

/// Runs `operation`, calling `log` with the error if it fails. The result is
/// returned untouched.
async fn log_failure<T, E>(
    operation: impl Future<Output = Result<T, E>>,
    log: impl FnOnce(&E),
) -> Result<T, E> {
    let result = operation.await;
    if let Err(error) = &result {
        log(error);
    }
    result
}

fn object_path(folder: &str, file_name: &str) -> String {
    let name: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let name = if name.trim_matches('.').is_empty() {
        "upload".to_owned()
    } else {
        name
    };
    format!("{folder}/{}-{name}", Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use tracing::Level;

    use super::*;
    use crate::db::queries::users;
    use crate::db::Role;
    use crate::testing::{
        capture_logs, image, memory_pool, seed_question, seed_quiz, seed_user, FakeStorage,
    };

    #[test]
    fn object_path_keeps_folder_prefix_and_cleans_name() {
        let path = object_path("choices", "my photo (1).png");
        assert!(path.starts_with("choices/"));
        assert!(path.ends_with("-my_photo__1_.png"));

        let path = object_path("questions", "..");
        assert!(path.starts_with("questions/"));
        assert!(path.ends_with("-upload"));
    }

    #[tokio::test]
    async fn upload_file_logs_and_returns_error_on_failure() {
        let pool = memory_pool().await;
        let service = QuestionService::new(FakeStorage::failing(), pool);
        let logs = capture_logs();

        let error = service
            .upload_file(&image("test.png"), QUESTIONS_FOLDER)
            .await
            .unwrap_err();

        assert!(matches!(error, StorageError::Rejected { status: 500, .. }));
        let errors = logs.at_level(Level::ERROR);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message().contains("File upload to Supabase failed"));
        assert_eq!(errors[0].field("file"), Some("test.png"));
    }

    #[tokio::test]
    async fn handle_choice_logs_and_creates_nothing_on_upload_failure() {
        let pool = memory_pool().await;
        let question = seed_question(&pool).await;
        let service = QuestionService::new(FakeStorage::failing(), pool.clone());
        let logs = capture_logs();

        let result = service
            .handle_choice(
                &question,
                NewChoice {
                    choice_text: "A".to_owned(),
                    choice_image: Some(image("fail.png")),
                },
                0,
            )
            .await;

        assert!(matches!(result, Err(ServiceError::Upload(_))));
        let errors = logs.at_level(Level::ERROR);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message().contains("Choice image upload failed"));
        assert_eq!(errors[0].field("question_id"), Some(question.id.to_string().as_str()));
        assert_eq!(errors[0].field("index"), Some("0"));
        let stored = choices::get_choices_for_question(&pool, question.id).await.unwrap();
        assert!(stored.is_empty());
    }

    #[tokio::test]
    async fn upload_file_result_does_not_depend_on_user_role() {
        let pool = memory_pool().await;
        let storage = FakeStorage::default();
        let service = QuestionService::new(storage.clone(), pool.clone());

        for role in [Role::Admin, Role::User] {
            let user = seed_user(&pool, role).await;
            assert_eq!(users::get_user(&pool, user.id).await.unwrap().role, role);

            let url = service
                .upload_file(&image("test.png"), QUESTIONS_FOLDER)
                .await
                .unwrap();
            assert!(url.contains("questions/"));
        }
        assert_eq!(storage.uploaded_paths().len(), 2);
    }

    #[tokio::test]
    async fn handle_choice_uploads_image_and_creates_choice() {
        let pool = memory_pool().await;
        let question = seed_question(&pool).await;
        let storage = FakeStorage::default();
        let service = QuestionService::new(storage.clone(), pool.clone());

        let choice = service
            .handle_choice(
                &question,
                NewChoice {
                    choice_text: "A".to_owned(),
                    choice_image: Some(image("a.png")),
                },
                0,
            )
            .await
            .unwrap();

        assert_eq!(choice.question_id, question.id);
        assert_eq!(choice.choice_text, "A");
        assert_eq!(choice.order_index, 0);
        let url = choice.choice_image_url.unwrap();
        assert!(url.contains("choices/"));
        assert_eq!(storage.uploaded_paths().len(), 1);

        let stored = choices::get_choices_for_question(&pool, question.id).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].choice_text, "A");
    }

    #[tokio::test]
    async fn handle_choice_without_image_skips_storage() {
        let pool = memory_pool().await;
        let question = seed_question(&pool).await;
        let storage = FakeStorage::failing();
        let service = QuestionService::new(storage.clone(), pool.clone());

        let choice = service
            .handle_choice(
                &question,
                NewChoice {
                    choice_text: "B".to_owned(),
                    choice_image: None,
                },
                3,
            )
            .await
            .unwrap();

        assert_eq!(choice.order_index, 3);
        assert!(choice.choice_image_url.is_none());
        assert!(storage.uploaded_paths().is_empty());
    }

    #[tokio::test]
    async fn handle_choice_rejects_unknown_question() {
        let pool = memory_pool().await;
        let mut question = seed_question(&pool).await;
        question.id += 100;
        let service = QuestionService::new(FakeStorage::default(), pool.clone());

        let result = service
            .handle_choice(
                &question,
                NewChoice {
                    choice_text: "A".to_owned(),
                    choice_image: None,
                },
                0,
            )
            .await;

        assert!(matches!(result, Err(ServiceError::Database(_))));
    }

    #[tokio::test]
    async fn create_question_stores_image_url() {
        let pool = memory_pool().await;
        let (quiz, category) = seed_quiz(&pool).await;
        let service = QuestionService::new(FakeStorage::default(), pool.clone());

        let question = service
            .create_question(
                &quiz,
                NewQuestion {
                    category_id: category.id,
                    question_text: "2 + 2?".to_owned(),
                    question_image: Some(image("sum.png")),
                },
            )
            .await
            .unwrap();

        assert_eq!(question.quiz_id, quiz.id);
        assert!(question.question_image_url.unwrap().contains("questions/"));
    }

    #[tokio::test]
    async fn create_question_checks_category_before_upload() {
        let pool = memory_pool().await;
        let (quiz, category) = seed_quiz(&pool).await;
        let storage = FakeStorage::default();
        let service = QuestionService::new(storage.clone(), pool.clone());

        let result = service
            .create_question(
                &quiz,
                NewQuestion {
                    category_id: category.id + 1,
                    question_text: "2 + 2?".to_owned(),
                    question_image: Some(image("sum.png")),
                },
            )
            .await;

        assert!(matches!(
            result,
            Err(ServiceError::Database(sqlx::Error::RowNotFound))
        ));
        assert!(storage.uploaded_paths().is_empty());
    }
}
