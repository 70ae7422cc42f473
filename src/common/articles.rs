use sqlx::Result;

use crate::common::Pool;
use crate::model::{Article, MonthlyReportRow, NewArticle};

/// Insert an article, or refresh its fields if its external id is already
/// known. Returns the article's id.
#[tracing::instrument(skip(db, article), fields(external_id = article.external_id))]
pub async fn upsert_article(db: &Pool, article: &NewArticle) -> Result<i32> {
    sqlx::query_scalar::<_, i32>(
        r#"
        INSERT INTO articles (external_id, title, url, news_site, sentiment_score, published_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (external_id) DO UPDATE
            SET title           = EXCLUDED.title,
                url             = EXCLUDED.url,
                news_site       = EXCLUDED.news_site,
                sentiment_score = EXCLUDED.sentiment_score,
                published_at    = EXCLUDED.published_at,
                updated_at      = now()
        RETURNING id
        "#,
    )
    .bind(article.external_id)
    .bind(&article.title)
    .bind(&article.url)
    .bind(&article.news_site)
    .bind(article.sentiment_score)
    .bind(article.published_at)
    .fetch_one(db)
    .await
}

/// Return the article matching the id
#[tracing::instrument(skip(db))]
pub async fn get_article(db: &Pool, id: i32) -> Result<Option<Article>> {
    sqlx::query_as::<_, Article>(
        r#"
        SELECT id, external_id, title, url, news_site, sentiment_score, published_at
        FROM articles WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

/// Article count and most frequent news site, bucketed by publication
/// month, newest month first. Everything is computed by the database.
#[tracing::instrument(skip(db))]
pub async fn monthly_report(db: &Pool) -> Result<Vec<MonthlyReportRow>> {
    sqlx::query_as::<_, MonthlyReportRow>(
        r#"
        SELECT date_trunc('month', a.published_at) AS month,
               COUNT(*)                            AS total,
               (SELECT b.news_site
                FROM articles b
                WHERE date_trunc('month', b.published_at) = date_trunc('month', a.published_at)
                GROUP BY b.news_site
                ORDER BY COUNT(*) DESC
                LIMIT 1)                           AS top_site
        FROM articles a
        GROUP BY date_trunc('month', a.published_at)
        ORDER BY month DESC
        "#,
    )
    .fetch_all(db)
    .await
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use speculoos::prelude::*;
    use sqlx::PgPool;

    use super::*;

    fn article(external_id: i32, title: &str, news_site: &str) -> NewArticle {
        NewArticle {
            external_id,
            title: title.to_owned(),
            url: format!("http://test.com/{external_id}"),
            news_site: news_site.to_owned(),
            sentiment_score: 0,
            published_at: Utc.with_ymd_and_hms(2023, 12, 1, 0, 0, 0).unwrap(),
        }
    }

    #[sqlx::test]
    async fn upserting_the_same_external_id_never_duplicates(pool: PgPool) -> Result<()> {
        let first = upsert_article(&pool, &article(1001, "First title", "NASA")).await?;
        let second = upsert_article(&pool, &article(1001, "Refreshed title", "NASA")).await?;

        assert_that!(second).is_equal_to(first);

        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM articles")
            .fetch_one(&pool)
            .await?;
        assert_that!(total).is_equal_to(1);

        let stored = get_article(&pool, first).await?.unwrap();
        assert_that!(stored.title).is_equal_to(String::from("Refreshed title"));

        Ok(())
    }

    #[sqlx::test]
    async fn monthly_report_buckets_by_month_newest_first(pool: PgPool) -> Result<()> {
        upsert_article(&pool, &article(1, "One", "NASA")).await?;
        upsert_article(&pool, &article(2, "Two", "NASA")).await?;
        upsert_article(&pool, &article(3, "Three", "SpaceNews")).await?;

        let mut older = article(4, "Four", "SpaceNews");
        older.published_at = Utc.with_ymd_and_hms(2023, 11, 15, 0, 0, 0).unwrap();
        upsert_article(&pool, &older).await?;

        let rows = monthly_report(&pool).await?;

        assert_that!(rows).has_length(2);
        assert_that!(rows[0].total).is_equal_to(3);
        assert_that!(rows[0].top_site).is_equal_to(Some(String::from("NASA")));
        assert_that!(rows[1].total).is_equal_to(1);

        // Row counts sum to the total article count
        let sum: i64 = rows.iter().map(|row| row.total).sum();
        assert_that!(sum).is_equal_to(4);

        Ok(())
    }
}
