use secrecy::Secret;
use sqlx::Result;

use crate::common::password::encode_password;
use crate::common::Pool;
use crate::model::{PagedResult, User, UserRole};

/// Return the user matching the username
#[tracing::instrument(skip(db))]
pub async fn get_user_by_username(db: &Pool, wanted_username: &str) -> Result<Option<User>> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, password, role FROM users WHERE username = $1
        "#,
    )
    .bind(wanted_username)
    .fetch_optional(db)
    .await
}

/// Return the user matching the id
#[tracing::instrument(skip(db), level = "debug")]
pub async fn get_user_by_id(db: &Pool, id: i32) -> Result<Option<User>> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, password, role FROM users WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

/// List all the users
#[tracing::instrument(skip(db))]
pub async fn list_users(db: &Pool, page_number: u64, page_size: u64) -> Result<PagedResult<User>> {
    let content = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, password, role FROM users
        ORDER BY id
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(page_size as i64)
    .bind((page_number as i64 - 1) * page_size as i64)
    .fetch_all(db)
    .await?;

    let total_items = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM users
        "#,
    )
    .fetch_one(db)
    .await? as u64;

    Ok(PagedResult::new(
        content,
        total_items,
        page_size,
        page_number,
    ))
}

/// Create a new user
#[tracing::instrument(skip(db, password))]
pub async fn create_user(
    db: &Pool,
    login: &str,
    password: &Secret<String>,
    user_role: UserRole,
) -> Result<User> {
    let encoded_password =
        encode_password(password).map_err(|e| sqlx::Error::Protocol(e.to_string()))?;

    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, password, role) VALUES ($1, $2, $3)
        RETURNING id, username, password, role
        "#,
    )
    .bind(login)
    .bind(encoded_password)
    .bind(user_role)
    .fetch_one(db)
    .await
}
