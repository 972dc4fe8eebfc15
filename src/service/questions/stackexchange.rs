//! Stack Exchange implementation of the question source, over `reqwest`.
//!
//! The API always answers with a "wrapper" object holding `items` plus quota and
//! paging metadata, and compresses every response.

use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::base::{
    config::Config,
    types::{QuestionPage, QuestionQuery, Res},
};

use super::{GenericQuestionClient, QuestionClient};

/// Base URL of the Stack Exchange API.
pub const STACK_EXCHANGE_API_URL: &str = "https://api.stackexchange.com/2.3";

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

// Extra methods on `QuestionClient` applied by the stack exchange implementation.

impl QuestionClient {
    /// Creates a new Stack Exchange question client.
    pub fn stack_exchange(config: &Config) -> Res<Self> {
        let client = StackExchangeQuestionClient::new(&config.stack_site, &config.stack_api_url)?;
        Ok(Self { inner: Arc::new(client) })
    }
}

impl From<StackExchangeQuestionClient> for QuestionClient {
    fn from(client: StackExchangeQuestionClient) -> Self {
        Self { inner: Arc::new(client) }
    }
}

// Structs.

/// Error object returned by the API alongside a non-2xx status.
#[derive(Debug, Deserialize)]
struct StackExchangeError {
    error_id: u32,
    error_name: String,
    error_message: String,
}

/// Stack Exchange question client implementation.
#[derive(Clone)]
pub struct StackExchangeQuestionClient {
    http: reqwest::Client,
    base_url: String,
    site: String,
}

impl StackExchangeQuestionClient {
    /// Create a new Stack Exchange client for `site`, rooted at `base_url`.
    pub fn new(site: impl Into<String>, base_url: impl Into<String>) -> Res<Self> {
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            site: site.into(),
        })
    }

    /// Query string for the "all questions" endpoint.
    fn query_params(&self, query: &QuestionQuery) -> Vec<(&'static str, String)> {
        vec![
            ("site", self.site.clone()),
            ("fromdate", query.from_date.timestamp().to_string()),
            ("sort", "creation".to_string()),
            ("order", "asc".to_string()),
            ("tagged", query.tagged.clone()),
        ]
    }
}

#[async_trait]
impl GenericQuestionClient for StackExchangeQuestionClient {
    fn site(&self) -> &str {
        &self.site
    }

    #[instrument(name = "StackExchangeQuestionClient::get_questions", skip_all)]
    async fn get_questions(&self, query: &QuestionQuery) -> Res<QuestionPage> {
        let url = format!("{}/questions", self.base_url);

        let response = self.http.get(&url).query(&self.query_params(query)).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();

            return Err(match serde_json::from_str::<StackExchangeError>(&body) {
                Ok(e) => anyhow!("{} ({}): {}", e.error_name, e.error_id, e.error_message),
                Err(_) => anyhow!("Stack Exchange returned {}: {}", status, body),
            });
        }

        let page: QuestionPage = response.json().await?;

        if let Some(backoff) = page.backoff {
            warn!("Stack Exchange asked for a {}s backoff before the next request.", backoff);
        }

        if page.has_more {
            debug!("More questions are available than fit in one page.");
        }

        if let Some(quota) = page.quota_remaining {
            debug!("Stack Exchange quota remaining: {}", quota);
        }

        Ok(page)
    }
}

// Tests.

#[cfg(test)]
mod tests {
    use chrono::DateTime;
    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;

    fn client(server: &MockServer) -> StackExchangeQuestionClient {
        StackExchangeQuestionClient::new("stackoverflow", server.base_url()).unwrap()
    }

    fn query() -> QuestionQuery {
        QuestionQuery::new(DateTime::from_timestamp(1_700_000_000, 0).unwrap(), "rust;tokio")
    }

    #[test]
    fn test_query_params() {
        let client = StackExchangeQuestionClient::new("superuser", STACK_EXCHANGE_API_URL).unwrap();

        let params = client.query_params(&query());

        assert_eq!(
            params,
            vec![
                ("site", "superuser".to_string()),
                ("fromdate", "1700000000".to_string()),
                ("sort", "creation".to_string()),
                ("order", "asc".to_string()),
                ("tagged", "rust;tokio".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_get_questions_returns_items_in_order() {
        let server = MockServer::start_async().await;

        let questions_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/questions")
                .query_param("site", "stackoverflow")
                .query_param("fromdate", "1700000000")
                .query_param("sort", "creation")
                .query_param("order", "asc")
                .query_param("tagged", "rust;tokio");
            then.status(200).json_body(json!({
                "items": [
                    {
                        "question_id": 1,
                        "title": "First",
                        "creation_date": 1_700_000_100,
                        "owner": { "display_name": "alice", "user_id": 10 },
                        "link": "https://stackoverflow.com/q/1"
                    },
                    {
                        "question_id": 2,
                        "title": "Second",
                        "creation_date": 1_700_000_200,
                        "owner": { "display_name": "bob" },
                        "link": "https://stackoverflow.com/q/2"
                    }
                ],
                "has_more": false,
                "quota_max": 300,
                "quota_remaining": 299
            }));
        });

        let page = client(&server).get_questions(&query()).await.unwrap();

        questions_mock.assert_calls(1);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].owner.display_name, "alice");
        assert_eq!(page.items[0].creation_date.timestamp(), 1_700_000_100);
        assert_eq!(page.items[1].link, "https://stackoverflow.com/q/2");
        assert_eq!(page.quota_remaining, Some(299));
        assert_eq!(page.total, None);
    }

    #[tokio::test]
    async fn test_get_questions_tolerates_missing_owner() {
        let server = MockServer::start_async().await;

        server.mock(|when, then| {
            when.method(GET).path("/questions");
            then.status(200).json_body(json!({
                "items": [
                    { "creation_date": 1_700_000_100, "link": "https://stackoverflow.com/q/3" }
                ],
                "has_more": true,
                "backoff": 10
            }));
        });

        let page = client(&server).get_questions(&query()).await.unwrap();

        assert_eq!(page.items[0].owner.display_name, "");
        assert!(page.has_more);
        assert_eq!(page.backoff, Some(10));
    }

    #[tokio::test]
    async fn test_get_questions_surfaces_api_error() {
        let server = MockServer::start_async().await;

        server.mock(|when, then| {
            when.method(GET).path("/questions");
            then.status(400).json_body(json!({
                "error_id": 400,
                "error_name": "bad_parameter",
                "error_message": "site is required"
            }));
        });

        let err = client(&server).get_questions(&query()).await.unwrap_err();
        let msg = err.to_string();

        assert!(msg.contains("bad_parameter"));
        assert!(msg.contains("site is required"));
    }

    #[tokio::test]
    async fn test_get_questions_surfaces_non_json_error() {
        let server = MockServer::start_async().await;

        server.mock(|when, then| {
            when.method(GET).path("/questions");
            then.status(502).body("bad gateway");
        });

        let err = client(&server).get_questions(&query()).await.unwrap_err();

        assert!(err.to_string().contains("502"));
        assert!(err.to_string().contains("bad gateway"));
    }
}
