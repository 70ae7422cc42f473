use std::fmt;

use anyhow::bail;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::articles::upsert_article;
use crate::common::Pool;
use crate::model::NewArticle;
use crate::sync::client::SpaceflightClient;

pub mod client;

/// Articles mentioning one of these anywhere in title or summary are
/// dropped before they reach the database.
pub const CENSORED_KEYWORDS: [&str; 2] = ["spacex", "musk"];

/// A title mentioning one of these scores 1, everything else scores 0.
pub const SENTIMENT_KEYWORDS: [&str; 2] = ["mars", "moon"];

/// Outcome counts of one sync run
#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct SyncReport {
    pub processed: u32,
    pub saved: u32,
    pub filtered: u32,
    pub errored: u32,
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "processed: {}, saved: {}, filtered: {}, errored: {}",
            self.processed, self.saved, self.filtered, self.errored
        )
    }
}

/// An article entry as the external feed serves it
#[derive(Debug, Deserialize)]
struct FeedEntry {
    id: i32,
    title: String,
    url: String,
    news_site: String,
    #[serde(default)]
    summary: Option<String>,
    published_at: DateTime<Utc>,
}

/// What the content rules decided for one feed entry
#[derive(Debug)]
pub enum Screened {
    Censored,
    Kept(NewArticle),
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    let lowered = text.to_lowercase();
    keywords.iter().any(|keyword| lowered.contains(keyword))
}

fn is_censored(text: &str) -> bool {
    contains_any(text, &CENSORED_KEYWORDS)
}

fn sentiment_score(title: &str) -> i32 {
    i32::from(contains_any(title, &SENTIMENT_KEYWORDS))
}

/// Apply the content rules to one raw feed entry: drop censored ones,
/// reject entries missing a required field, score the rest. The title is
/// screened before anything else, so a censored entry counts as filtered
/// even when the rest of it is malformed.
pub fn screen(raw: serde_json::Value) -> anyhow::Result<Screened> {
    if let Some(title) = raw.get("title").and_then(|title| title.as_str()) {
        if is_censored(title) {
            return Ok(Screened::Censored);
        }
    }

    let entry: FeedEntry = serde_json::from_value(raw)?;

    if entry.title.is_empty() || entry.url.is_empty() || entry.news_site.is_empty() {
        bail!("entry {} is missing a required field", entry.id);
    }

    if entry.summary.as_deref().map(is_censored).unwrap_or(false) {
        return Ok(Screened::Censored);
    }

    let sentiment_score = sentiment_score(&entry.title);
    Ok(Screened::Kept(NewArticle {
        external_id: entry.id,
        title: entry.title,
        url: entry.url,
        news_site: entry.news_site,
        sentiment_score,
        published_at: entry.published_at,
    }))
}

/// Pull up to `limit` articles from the feed and upsert the ones passing
/// the content rules. A failing entry is counted and the loop moves on,
/// nothing is retried.
#[tracing::instrument(skip(db, client))]
pub async fn sync_articles(db: &Pool, client: &SpaceflightClient, limit: u32) -> SyncReport {
    let mut report = SyncReport::default();

    let entries = match client.fetch_articles(limit).await {
        Ok(entries) => entries,
        Err(error) => {
            tracing::error!("Could not fetch the article feed: {error}");
            report.errored += 1;
            return report;
        }
    };
    tracing::info!("Fetched {} entries from the feed", entries.len());

    for raw in entries {
        report.processed += 1;

        match screen(raw) {
            Ok(Screened::Censored) => report.filtered += 1,
            Ok(Screened::Kept(article)) => match upsert_article(db, &article).await {
                Ok(_) => report.saved += 1,
                Err(error) => {
                    tracing::error!(
                        external_id = article.external_id,
                        "Could not save article: {error}"
                    );
                    report.errored += 1;
                }
            },
            Err(error) => {
                tracing::error!("Could not read feed entry: {error}");
                report.errored += 1;
            }
        }
    }

    tracing::info!("Sync done. {report}");
    report
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use speculoos::prelude::*;

    use super::*;

    fn entry(id: i32, title: &str) -> serde_json::Value {
        json!({
            "id": id,
            "title": title,
            "url": format!("http://test.com/{id}"),
            "news_site": "NASA",
            "published_at": "2023-12-01T00:00:00Z"
        })
    }

    #[test]
    fn censored_keywords_are_dropped_regardless_of_case() {
        for title in [
            "SpaceX breaks launch record",
            "SPACEX BREAKS LAUNCH RECORD",
            "Elon Musk announces new plans",
            "the muskrat... wait, musk is in there",
        ] {
            assert!(matches!(
                screen(entry(1, title)).unwrap(),
                Screened::Censored
            ));
        }
    }

    #[test]
    fn censorship_also_looks_at_the_summary() {
        let raw = json!({
            "id": 4,
            "title": "A perfectly fine title",
            "url": "http://test.com/4",
            "news_site": "NASA",
            "summary": "An interview with Elon Musk.",
            "published_at": "2023-12-01T00:00:00Z"
        });

        assert!(matches!(screen(raw).unwrap(), Screened::Censored));
    }

    #[test]
    fn mars_and_moon_titles_score_one() {
        for title in [
            "NASA launches new Mars rover",
            "Back to the MOON",
            "marsquake detected",
        ] {
            match screen(entry(2, title)).unwrap() {
                Screened::Kept(article) => {
                    assert_that!(article.sentiment_score).is_equal_to(1)
                }
                other => panic!("expected a kept article, got {other:?}"),
            }
        }
    }

    #[test]
    fn other_titles_score_zero() {
        match screen(entry(3, "ISS resupply mission delayed")).unwrap() {
            Screened::Kept(article) => {
                assert_that!(article.sentiment_score).is_equal_to(0);
                assert_that!(article.external_id).is_equal_to(3);
            }
            other => panic!("expected a kept article, got {other:?}"),
        }
    }

    #[test]
    fn censored_title_wins_over_a_malformed_entry() {
        // No url, but the title alone is enough to drop it as filtered
        let raw = json!({
            "id": 8,
            "title": "SpaceX breaks launch record",
            "news_site": "NASA",
            "published_at": "2023-12-01T00:00:00Z"
        });

        assert!(matches!(screen(raw).unwrap(), Screened::Censored));
    }

    #[test]
    fn entries_missing_a_field_are_rejected() {
        let raw = json!({
            "id": 5,
            "title": "No url on this one",
            "news_site": "NASA",
            "published_at": "2023-12-01T00:00:00Z"
        });

        assert!(screen(raw).is_err());
    }

    #[test]
    fn entries_with_empty_fields_are_rejected() {
        let raw = json!({
            "id": 6,
            "title": "",
            "url": "http://test.com/6",
            "news_site": "NASA",
            "published_at": "2023-12-01T00:00:00Z"
        });

        assert!(screen(raw).is_err());
    }

    #[test]
    fn entries_with_a_broken_date_are_rejected() {
        let raw = json!({
            "id": 7,
            "title": "Fine title",
            "url": "http://test.com/7",
            "news_site": "NASA",
            "published_at": "not-a-date"
        });

        assert!(screen(raw).is_err());
    }
}
