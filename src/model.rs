use std::fmt::Debug;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A space-news article, as stored after sync
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Article {
    pub id: i32,
    pub external_id: i32,
    pub title: String,
    pub url: String,
    pub news_site: String,
    pub sentiment_score: i32,
    pub published_at: DateTime<Utc>,
}

/// An article as produced by the sync routine, before it gets an id
#[derive(Debug, Clone, Serialize)]
pub struct NewArticle {
    pub external_id: i32,
    pub title: String,
    pub url: String,
    pub news_site: String,
    pub sentiment_score: i32,
    pub published_at: DateTime<Utc>,
}

/// A user of the API
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    #[serde(skip)] // Never ever serialize this field
    pub password: String,
    pub role: UserRole,
}

#[derive(sqlx::Type, Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Basic,
}

/// A favorite of a user, joined with the article it points to
#[derive(Debug, FromRow, Serialize)]
pub struct UserFavorite {
    pub id: i32,
    pub article_id: i32,
    pub external_id: i32,
    pub title: String,
    pub url: String,
    pub news_site: String,
    pub sentiment_score: i32,
    pub published_at: DateTime<Utc>,
    pub favorited_at: DateTime<Utc>,
}

/// One month of the aggregate report, as read from the database
#[derive(Debug, FromRow)]
pub struct MonthlyReportRow {
    pub month: DateTime<Utc>,
    pub total: i64,
    pub top_site: Option<String>,
}

/// One month of the aggregate report, as served
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct MonthlyReport {
    pub month: String,
    pub total: i64,
    pub top_site: String,
}

impl From<MonthlyReportRow> for MonthlyReport {
    fn from(row: MonthlyReportRow) -> Self {
        MonthlyReport {
            month: row.month.format("%Y-%m").to_string(),
            total: row.total,
            top_site: row.top_site.unwrap_or_else(|| String::from("Unknown")),
        }
    }
}

/// Pagination query parameters
#[derive(Debug, Deserialize)]
pub struct PageParameters {
    page: Option<u64>,
    size: Option<u64>,
}

impl PageParameters {
    /// Return the asked page, or 1 as a default. Pages start at 1.
    pub fn get_page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Return the asked page size, or 20 as a default, capped at 200.
    pub fn get_size(&self) -> u64 {
        self.size.unwrap_or(20).clamp(1, 200)
    }
}

/// Page of elements
#[derive(Debug, Serialize)]
pub struct PagedResult<T> {
    /// Actual content.
    pub content: Vec<T>,
    /// Number of the page.
    pub page_number: u64,
    /// Desired size of the page.
    pub page_size: u64,
    /// Total number of pages.
    pub total_pages: u64,
    /// Number of elements returned.
    pub elements_number: usize,
    /// Total number of elements.
    pub total_items: u64,
}

impl<T> PagedResult<T>
where
    T: Serialize + Debug,
{
    pub fn new(content: Vec<T>, total_items: u64, page_size: u64, page_number: u64) -> Self {
        let elements_number = content.len();
        let total_pages = (total_items as f64 / page_size as f64).ceil() as u64;

        PagedResult {
            content,
            page_number,
            page_size,
            total_pages,
            elements_number,
            total_items,
        }
    }
}
