// src/infrastructure/pinboard.rs
//! Blocking client for the Pinboard v1 API (JSON format).

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::remote::{RawPost, RemoteSource};
use chrono::DateTime;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

#[derive(Deserialize, Debug)]
struct UpdateResponse {
    update_time: String,
}

#[derive(Deserialize, Debug)]
struct RecentResponse {
    posts: Vec<ApiPost>,
}

#[derive(Deserialize, Debug)]
struct ApiPost {
    href: String,
    description: String,
    extended: String,
    tags: String,
    hash: String,
    time: String,
}

#[derive(Debug, Clone)]
pub struct PinboardClient {
    api_url: String,
    api_token: String,
}

impl PinboardClient {
    pub fn new(api_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            api_token: api_token.into(),
        }
    }

    /// Call an API method and deserialize the JSON response.
    /// The auth token goes into the query string but never into the logs.
    fn call<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        params: &[(&str, &str)],
    ) -> DomainResult<T> {
        if self.api_token.is_empty() {
            return Err(DomainError::Transport(
                "no Pinboard API token configured (set PINBOARD_API_TOKEN)".to_string(),
            ));
        }

        let url = format!("{}/{}", self.api_url, method);
        debug!("GET {} params={:?}", url, params);

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| DomainError::Transport(e.to_string()))?;

        let mut query: Vec<(&str, &str)> = vec![
            ("auth_token", self.api_token.as_str()),
            ("format", "json"),
        ];
        query.extend_from_slice(params);

        let response = client
            .get(&url)
            .query(&query)
            .send()
            .map_err(|e| DomainError::Transport(format!("{}: {}", method, e)))?;

        if !response.status().is_success() {
            return Err(DomainError::Transport(format!(
                "{}: HTTP {}",
                method,
                response.status()
            )));
        }

        response
            .json::<T>()
            .map_err(|e| DomainError::Transport(format!("{}: malformed response: {}", method, e)))
    }
}

/// Parse an ISO-8601 timestamp from the API into epoch seconds.
fn iso_to_unix(ts: &str) -> DomainResult<i64> {
    DateTime::parse_from_rfc3339(ts)
        .map(|dt| dt.timestamp())
        .map_err(|e| DomainError::Transport(format!("malformed timestamp '{}': {}", ts, e)))
}

impl RemoteSource for PinboardClient {
    #[instrument(skip_all, level = "debug")]
    fn latest_activity(&self) -> DomainResult<i64> {
        let update: UpdateResponse = self.call("posts/update", &[])?;
        iso_to_unix(&update.update_time)
    }

    #[instrument(skip_all, level = "debug", fields(count = count))]
    fn fetch_recent(&self, count: usize, tag: Option<&str>) -> DomainResult<Vec<RawPost>> {
        let count_str = count.to_string();
        let mut params: Vec<(&str, &str)> = vec![("count", count_str.as_str())];
        if let Some(tag) = tag {
            params.push(("tag", tag));
        }

        let recent: RecentResponse = self.call("posts/recent", &params)?;

        let mut posts = Vec::with_capacity(recent.posts.len());
        for post in recent.posts {
            posts.push(RawPost {
                ts: iso_to_unix(&post.time)?,
                url: post.href,
                title: post.description,
                body: post.extended,
                tags: post.tags,
                hash: post.hash,
            });
        }
        Ok(posts)
    }
}
