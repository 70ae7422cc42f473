use sqlx::Result;

use crate::common::Pool;
use crate::model::{PagedResult, UserFavorite};

/// Mark an article as favorite of a user. Returns true if the favorite
/// was created, false if the pair already existed. Uniqueness is enforced
/// by the database constraint, so concurrent calls can't create two rows.
#[tracing::instrument(skip(db))]
pub async fn insert_favorite(db: &Pool, user_id: i32, article_id: i32) -> Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO favorites (user_id, article_id) VALUES ($1, $2)
        ON CONFLICT (user_id, article_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(article_id)
    .execute(db)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Return a page of the favorites of a given user, with the articles they
/// point to, newest favorite first.
#[tracing::instrument(skip(db))]
pub async fn list_favorites_of_user(
    db: &Pool,
    user_id: i32,
    page_number: u64,
    page_size: u64,
) -> Result<PagedResult<UserFavorite>> {
    let content = sqlx::query_as::<_, UserFavorite>(
        r#"
        SELECT favorites.id,
               articles.id          AS article_id,
               articles.external_id,
               articles.title,
               articles.url,
               articles.news_site,
               articles.sentiment_score,
               articles.published_at,
               favorites.created_at AS favorited_at
        FROM favorites
                 JOIN articles ON articles.id = favorites.article_id
        WHERE favorites.user_id = $1
        ORDER BY favorites.created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(page_size as i64)
    .bind((page_number as i64 - 1) * page_size as i64)
    .fetch_all(db)
    .await?;

    let total_items = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM favorites WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_one(db)
    .await? as u64;

    Ok(PagedResult::new(
        content,
        total_items,
        page_size,
        page_number,
    ))
}
