use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use sqlx::SqlitePool;

/// Role of an account. Capabilities are derived from the role, never from
/// separate user kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn can_manage_quizzes(self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => f.write_str("admin"),
            Role::User => f.write_str("user"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            other => Err(format!("Unknown role {other}, expected 'admin' or 'user'")),
        }
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub role: Role,
    #[serde(skip_serializing)]
    pub api_token: String,
    pub grade_level: Option<i64>,
    pub school: Option<String>,
    pub coach_name: Option<String>,
}

pub struct NewUser<'a> {
    pub name: &'a str,
    pub role: Role,
    pub api_token: &'a str,
    pub grade_level: Option<i64>,
    pub school: Option<&'a str>,
    pub coach_name: Option<&'a str>,
}

pub async fn get_user(pool: &SqlitePool, id: i64) -> sqlx::Result<User> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE users.id = ?1")
        .bind(id)
        .fetch_one(pool)
        .await
}

pub async fn get_user_by_token(pool: &SqlitePool, api_token: &str) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE users.api_token = ?1")
        .bind(api_token)
        .fetch_optional(pool)
        .await
}

pub async fn create_user(pool: &SqlitePool, user: NewUser<'_>) -> sqlx::Result<i64> {
    let mut conn = pool.acquire().await?;
    let user_id = sqlx::query(
        r#"
        INSERT INTO users (name, role, api_token, grade_level, school, coach_name) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(user.name)
    .bind(user.role)
    .bind(user.api_token)
    .bind(user.grade_level)
    .bind(user.school)
    .bind(user.coach_name)
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();

    Ok(user_id)
}
