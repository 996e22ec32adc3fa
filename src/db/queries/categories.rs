use serde::Serialize;
use sqlx::SqlitePool;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

pub async fn get_all_categories(pool: &SqlitePool) -> sqlx::Result<Vec<Category>> {
    sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY name")
        .fetch_all(pool)
        .await
}

pub async fn get_category(pool: &SqlitePool, id: i64) -> sqlx::Result<Category> {
    sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE categories.id = ?1")
        .bind(id)
        .fetch_one(pool)
        .await
}

pub async fn create_category(pool: &SqlitePool, name: &str) -> sqlx::Result<i64> {
    let mut conn = pool.acquire().await?;
    let id = sqlx::query("INSERT INTO categories (name) VALUES (?1)")
        .bind(name)
        .execute(&mut *conn)
        .await?
        .last_insert_rowid();
    Ok(id)
}
