//! Read access to the media request server api

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::core::settings_config::ApiSettings;

pub mod season_information;

const API_KEY_HEADER: &str = "X-Api-Key";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error during request: {0}")]
    Network(reqwest::Error),
    #[error("server responded with status {0}")]
    Status(StatusCode),
    #[error("server responded with status {status}: {message}")]
    BadResponse { status: StatusCode, message: String },
    #[error("server responded with invalid json: {0}")]
    InvalidJson(json::Error),
    #[error("api error when deserializing json: unexpected '{0}'")]
    Deserialization(String, serde_json::Error),
    #[error("invalid api key header value")]
    InvalidApiKey,
}

/// The error body the server sends along with non 2xx statuses
#[derive(Debug, Deserialize, Clone)]
struct BadResponse {
    message: String,
}

/// Http client bound to one server
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    max_retries: u32,
}

impl ApiClient {
    pub fn new(settings: &ApiSettings) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert("Accept", HeaderValue::from_static("application/json"));
        if let Some(api_key) = &settings.api_key {
            let value = HeaderValue::from_str(api_key).map_err(|_| ApiError::InvalidApiKey)?;
            headers.insert(API_KEY_HEADER, value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(ApiError::Network)?;

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_owned(),
            max_retries: settings.max_retries,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the full url of an api path such as `/v1/tv/1/season/1`
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Requests the prettified json body of the provided api path
    ///
    /// Requests that fail before reaching the server are retried after a short
    /// random sleep, up to `max_retries` times.
    async fn get_pretty_json(&self, path: &str) -> Result<String, ApiError> {
        let url = self.url(path);

        let mut attempt = 0;
        let response = loop {
            match self.http.get(&url).send().await {
                Ok(response) => break response,
                Err(err) => {
                    if err.is_request() && attempt < self.max_retries {
                        attempt += 1;
                        warn!("request to '{}' failed, retrying ({}): {}", url, attempt, err);
                        random_async_sleep().await;
                    } else {
                        return Err(ApiError::Network(err));
                    }
                }
            }
        };

        let status = response.status();
        let text = response.text().await.map_err(ApiError::Network)?;

        if !status.is_success() {
            return Err(match try_bad_json(&text) {
                Some(message) => ApiError::BadResponse { status, message },
                None => ApiError::Status(status),
            });
        }

        let parsed = json::parse(&text).map_err(ApiError::InvalidJson)?;
        Ok(json::stringify_pretty(parsed, 1))
    }
}

fn try_bad_json(json_string: &str) -> Option<String> {
    serde_json::from_str::<BadResponse>(json_string)
        .ok()
        .map(|bad_response| bad_response.message)
}

pub fn deserialize_json<'a, T: serde::Deserialize<'a>>(
    prettified_json: &'a str,
) -> Result<T, ApiError> {
    serde_json::from_str::<T>(prettified_json).map_err(|err| {
        let line_number = err.line().saturating_sub(1);

        let errored_line = prettified_json
            .lines()
            .nth(line_number)
            .map(str::to_owned)
            .unwrap_or_default();
        ApiError::Deserialization(errored_line, err)
    })
}

/// Sleeps the current task asynchronously between 0-0.2 seconds choosing a random
/// value in between.
async fn random_async_sleep() {
    let random_val = rand::random::<u64>() / 100_000_000_000_000_000;
    tokio::time::sleep(Duration::from_millis(random_val)).await;
}
