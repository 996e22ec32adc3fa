//! Fixtures shared by unit tests: an in-memory database, a fake storage
//! client and a tracing layer that records emitted events.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::field::{Field, Visit};
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;
use uuid::Uuid;

use crate::db::queries::users::NewUser;
use crate::db::queries::{categories, questions, quizzes, users};
use crate::db::{Category, Question, Quiz, Role, User};
use crate::storage::{StorageClient, StorageError, UploadedFile};

pub async fn memory_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);
    // A single connection that never expires keeps the in-memory database alive.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .unwrap();
    crate::db::run_migrations(&pool).await.unwrap();
    pool
}

pub async fn seed_user(pool: &SqlitePool, role: Role) -> User {
    let api_token = Uuid::new_v4().to_string();
    let id = users::create_user(
        pool,
        NewUser {
            name: "Test User",
            role,
            api_token: &api_token,
            grade_level: None,
            school: None,
            coach_name: None,
        },
    )
    .await
    .unwrap();
    users::get_user(pool, id).await.unwrap()
}

pub async fn seed_quiz(pool: &SqlitePool) -> (Quiz, Category) {
    let quiz_id = quizzes::create_quiz(pool, "Fractions", Some(60), false)
        .await
        .unwrap();
    let category_id = categories::create_category(pool, &format!("Math {}", Uuid::new_v4()))
        .await
        .unwrap();
    (
        quizzes::get_quiz(pool, quiz_id).await.unwrap(),
        categories::get_category(pool, category_id).await.unwrap(),
    )
}

pub async fn seed_question(pool: &SqlitePool) -> Question {
    let (quiz, category) = seed_quiz(pool).await;
    let id = questions::create_question(pool, quiz.id, category.id, "1/2 + 1/4?", None)
        .await
        .unwrap();
    questions::get_question(pool, id).await.unwrap()
}

pub fn image(name: &str) -> UploadedFile {
    UploadedFile {
        file_name: name.to_owned(),
        content_type: Some("image/png".to_owned()),
        contents: Bytes::from_static(b"\x89PNG\r\n\x1a\n"),
    }
}

/// Storage client that either accepts every upload or rejects every upload.
#[derive(Clone, Default)]
pub struct FakeStorage {
    fail: bool,
    uploads: Arc<Mutex<Vec<String>>>,
}

impl FakeStorage {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn uploaded_paths(&self) -> Vec<String> {
        self.uploads.lock().unwrap().clone()
    }
}

impl StorageClient for FakeStorage {
    async fn upload_image(&self, _file: &UploadedFile, path: &str) -> Result<String, StorageError> {
        if self.fail {
            return Err(StorageError::Rejected {
                status: 500,
                message: "Upload failed".to_owned(),
            });
        }
        self.uploads.lock().unwrap().push(path.to_owned());
        Ok(format!("https://storage.test/{path}"))
    }
}

#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: Level,
    fields: BTreeMap<String, String>,
}

impl CapturedEvent {
    pub fn message(&self) -> &str {
        self.field("message").unwrap_or_default()
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// Records events emitted on the current thread until dropped.
pub struct LogCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
    _guard: DefaultGuard,
}

impl LogCapture {
    pub fn at_level(&self, level: Level) -> Vec<CapturedEvent> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|event| event.level == level)
            .cloned()
            .collect()
    }
}

pub fn capture_logs() -> LogCapture {
    let events = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry().with(CaptureLayer {
        events: Arc::clone(&events),
    });
    LogCapture {
        events,
        _guard: tracing::subscriber::set_default(subscriber),
    }
}

struct CaptureLayer {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            fields: visitor.0,
        });
    }
}

#[derive(Default)]
struct FieldVisitor(BTreeMap<String, String>);

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_owned(), value.to_owned());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_owned(), format!("{value:?}"));
    }
}
