use serde::Serialize;
use sqlx::SqlitePool;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Quiz {
    pub id: i64,
    pub title: String,
    pub timer: Option<i64>,
    pub is_posted: bool,
}

pub async fn get_quiz(pool: &SqlitePool, id: i64) -> sqlx::Result<Quiz> {
    sqlx::query_as::<_, Quiz>("SELECT * FROM quizzes WHERE quizzes.id = ?1")
        .bind(id)
        .fetch_one(pool)
        .await
}

pub async fn create_quiz(
    pool: &SqlitePool,
    title: &str,
    timer: Option<i64>,
    is_posted: bool,
) -> sqlx::Result<i64> {
    let mut conn = pool.acquire().await?;
    let id = sqlx::query("INSERT INTO quizzes (title, timer, is_posted) VALUES (?1, ?2, ?3)")
        .bind(title)
        .bind(timer)
        .bind(is_posted)
        .execute(&mut *conn)
        .await?
        .last_insert_rowid();
    Ok(id)
}

pub async fn update_quiz(
    pool: &SqlitePool,
    id: i64,
    title: &str,
    timer: Option<i64>,
    is_posted: bool,
) -> sqlx::Result<()> {
    get_quiz(pool, id).await?;
    let mut conn = pool.acquire().await?;

    sqlx::query("UPDATE quizzes SET title=?1, timer=?2, is_posted=?3 WHERE quizzes.id = ?4")
        .bind(title)
        .bind(timer)
        .bind(is_posted)
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}
