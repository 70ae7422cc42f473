use std::time::Duration;

use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;
use serde::Deserialize;

use crate::common::errors::FeedError;

/// Fixed search keyword, the feed is only asked for articles matching it
const SEARCH_KEYWORD: &str = "NASA";
const ORDERING: &str = "-published_at";

/// Client for the Spaceflight News API v4
pub struct SpaceflightClient {
    client: ClientWithMiddleware,
    base_url: String,
}

/// A page of the paginated article feed. Entries are kept as raw JSON so
/// that one malformed entry does not sink the whole batch.
#[derive(Debug, Deserialize)]
struct ArticlesPage {
    #[serde(default)]
    results: Vec<serde_json::Value>,
}

impl SpaceflightClient {
    pub fn new(base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("spacenews-api sync")
            .build()
            .expect("Could not build client");
        let client = ClientBuilder::new(client)
            .with(TracingMiddleware::default())
            .build();

        SpaceflightClient {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    pub fn from_env() -> Self {
        let base_url = std::env::var("SPACEFLIGHT_API_URL")
            .unwrap_or_else(|_| String::from("https://api.spaceflightnewsapi.net"));
        SpaceflightClient::new(&base_url)
    }

    /// Fetch up to `limit` articles matching the search keyword, newest
    /// first.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_articles(&self, limit: u32) -> Result<Vec<serde_json::Value>, FeedError> {
        let response = self
            .client
            .get(format!("{}/v4/articles/", self.base_url))
            .query(&[
                ("search", SEARCH_KEYWORD),
                ("limit", &limit.to_string()),
                ("ordering", ORDERING),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FeedError::NonOkStatus(response.status().as_u16()));
        }

        let page: ArticlesPage = serde_json::from_slice(&response.bytes().await?)?;
        Ok(page.results)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use speculoos::prelude::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn fetch_articles_passes_the_feed_contract() {
        let mock = MockServer::start().await;

        let body = json!({
            "count": 2,
            "next": null,
            "previous": null,
            "results": [
                {
                    "id": 1,
                    "title": "NASA launches new Mars rover",
                    "url": "http://test.com/1",
                    "news_site": "NASA",
                    "published_at": "2023-12-01T00:00:00Z"
                },
                {
                    "id": 2,
                    "title": "Another day in orbit",
                    "url": "http://test.com/2",
                    "news_site": "SpaceNews",
                    "published_at": "2023-12-02T00:00:00Z"
                }
            ]
        });

        Mock::given(method("GET"))
            .and(path("/v4/articles/"))
            .and(query_param("search", "NASA"))
            .and(query_param("limit", "10"))
            .and(query_param("ordering", "-published_at"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&mock)
            .await;

        let client = SpaceflightClient::new(&mock.uri());
        let entries = client.fetch_articles(10).await.unwrap();

        assert_that!(entries).has_length(2);
    }

    #[tokio::test]
    async fn fetch_articles_rejects_non_ok_status() {
        let mock = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v4/articles/"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&mock)
            .await;

        let client = SpaceflightClient::new(&mock.uri());

        assert!(matches!(
            client.fetch_articles(10).await,
            Err(FeedError::NonOkStatus(503))
        ));
    }

    #[tokio::test]
    async fn fetch_articles_rejects_garbage_body() {
        let mock = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v4/articles/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("space lol"))
            .expect(1)
            .mount(&mock)
            .await;

        let client = SpaceflightClient::new(&mock.uri());

        assert!(matches!(
            client.fetch_articles(10).await,
            Err(FeedError::DecodeError(_))
        ));
    }
}
