use serde::Serialize;
use sqlx::SqlitePool;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Question {
    pub id: i64,
    pub quiz_id: i64,
    pub category_id: i64,
    pub question_text: String,
    pub question_image_url: Option<String>,
}

pub async fn get_question(pool: &SqlitePool, id: i64) -> sqlx::Result<Question> {
    sqlx::query_as::<_, Question>("SELECT * FROM questions WHERE questions.id = ?1")
        .bind(id)
        .fetch_one(pool)
        .await
}

pub async fn get_questions_for_quiz(pool: &SqlitePool, quiz_id: i64) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>("SELECT * FROM questions WHERE questions.quiz_id = ?1 ORDER BY id")
        .bind(quiz_id)
        .fetch_all(pool)
        .await
}

pub async fn create_question(
    pool: &SqlitePool,
    quiz_id: i64,
    category_id: i64,
    question_text: &str,
    question_image_url: Option<&str>,
) -> sqlx::Result<i64> {
    let mut conn = pool.acquire().await?;
    let id = sqlx::query(
        r#"
        INSERT INTO questions (quiz_id, category_id, question_text, question_image_url) VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(quiz_id)
    .bind(category_id)
    .bind(question_text)
    .bind(question_image_url)
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();
    Ok(id)
}
