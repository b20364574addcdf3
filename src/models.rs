use chrono::DateTime;
use reqwest::header::HeaderMap;
use reqwest::Response;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::Platform;
use crate::BoxError;

/// Envelope of the GitHub search endpoints (`/search/users`, `/search/repositories`).
#[derive(Debug, Deserialize)]
pub struct SearchResponse<T> {
    #[serde(default)]
    pub total_count: u64,
    pub items: Vec<T>,
}

/// A user or organization item from `/search/users`.
#[derive(Debug, Deserialize)]
pub struct GitHubAccount {
    pub login: String,
}

/// A repository item from `/search/repositories`.
#[derive(Debug, Deserialize)]
pub struct GitHubRepository {
    pub full_name: String,
}

/// Error body returned by both APIs on failure.
#[derive(Debug, Default, Deserialize)]
pub struct ApiErrorBody {
    pub message: Option<serde_json::Value>,
    pub error: Option<String>,
}

impl ApiErrorBody {
    /// Best available description of the failure.
    pub fn describe(&self) -> Option<String> {
        match (&self.message, &self.error) {
            (Some(serde_json::Value::String(msg)), _) => Some(msg.clone()),
            (Some(other), _) => Some(other.to_string()),
            (None, Some(err)) => Some(err.clone()),
            (None, None) => None,
        }
    }
}

/// A group from GitLab's `/groups`.
#[derive(Debug, Deserialize)]
pub struct GitLabGroup {
    pub full_path: String,
}

/// A user from GitLab's `/users`.
#[derive(Debug, Deserialize)]
pub struct GitLabUser {
    pub username: String,
}

/// A project from GitLab's `/projects`.
#[derive(Debug, Deserialize)]
pub struct GitLabProject {
    pub path_with_namespace: String,
}

/// Decode a successful JSON response, or turn a failed one into an error
/// carrying the status and the provider's message.
pub async fn decode_response<T: DeserializeOwned>(
    platform: Platform,
    response: Response,
) -> Result<T, BoxError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let reset = rate_limit_reset(response.headers());
    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ApiErrorBody>(&body)
        .ok()
        .and_then(|b| b.describe())
        .unwrap_or(body);

    let mut message = format!("{} API error ({}): {}", platform, status, detail.trim());
    if let Some(reset) = reset {
        message.push_str(&format!("; rate limit resets at {}", reset));
    }
    Err(message.into())
}

/// Reset time advertised by an exhausted GitHub rate limit, if any.
fn rate_limit_reset(headers: &HeaderMap) -> Option<String> {
    let remaining = headers.get("X-RateLimit-Remaining")?.to_str().ok()?;
    if remaining.trim() != "0" {
        return None;
    }
    let reset = headers
        .get("X-RateLimit-Reset")?
        .to_str()
        .ok()?
        .trim()
        .parse::<i64>()
        .ok()?;
    DateTime::from_timestamp(reset, 0).map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
}
