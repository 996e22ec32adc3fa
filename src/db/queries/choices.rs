use serde::Serialize;
use sqlx::SqlitePool;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Choice {
    pub id: i64,
    pub question_id: i64,
    pub choice_text: String,
    pub choice_image_url: Option<String>,
    pub order_index: i64,
}

pub async fn get_choices_for_question(
    pool: &SqlitePool,
    question_id: i64,
) -> sqlx::Result<Vec<Choice>> {
    sqlx::query_as::<_, Choice>(
        "SELECT * FROM question_choices WHERE question_id = ?1 ORDER BY order_index, id",
    )
    .bind(question_id)
    .fetch_all(pool)
    .await
}

pub async fn count_choices(pool: &SqlitePool, question_id: i64) -> sqlx::Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM question_choices WHERE question_id = ?1")
        .bind(question_id)
        .fetch_one(pool)
        .await
}

pub async fn create_choice(
    pool: &SqlitePool,
    question_id: i64,
    choice_text: &str,
    choice_image_url: Option<&str>,
    order_index: i64,
) -> sqlx::Result<Choice> {
    let mut conn = pool.acquire().await?;
    sqlx::query_as::<_, Choice>(
        r#"
        INSERT INTO question_choices (question_id, choice_text, choice_image_url, order_index)
        VALUES (?1, ?2, ?3, ?4)
        RETURNING *
        "#,
    )
    .bind(question_id)
    .bind(choice_text)
    .bind(choice_image_url)
    .bind(order_index)
    .fetch_one(&mut *conn)
    .await
}
