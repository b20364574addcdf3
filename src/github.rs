use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Client;
use tracing::debug;

use crate::config::{resolve_token, Category, Platform};
use crate::models::{decode_response, GitHubAccount, GitHubRepository, SearchResponse};
use crate::rate_limit::{RateLimitedClient, RateLimiter};
use crate::searcher::SearchBackend;
use crate::{Args, BoxError};

pub const GITHUB_TOKEN_VAR: &str = "GITHUB_ACCESS_TOKEN";

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// GitHub REST search client. Every request passes through the rate limiter.
pub struct GitHubClient {
    http: RateLimitedClient,
    base_url: String,
}

impl GitHubClient {
    /// Build a client from the command line, falling back to
    /// `GITHUB_ACCESS_TOKEN` for the token.
    pub fn from_args(args: &Args) -> Result<Self, BoxError> {
        let token = resolve_token(args.github_token.as_deref(), GITHUB_TOKEN_VAR)?;
        Self::new(&token, &args.github_api_url, RateLimiter::default())
    }

    pub fn new(token: &str, base_url: &str, limiter: RateLimiter) -> Result<Self, BoxError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert(
            HeaderName::from_static("x-github-api-version"),
            HeaderValue::from_static("2022-11-28"),
        );
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(GitHubClient {
            http: RateLimitedClient::new(client, limiter),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Organizations and users share `/search/users`; the `type:` qualifier
    /// tells them apart.
    async fn search_accounts(
        &self,
        qualifier: &str,
        query: &str,
        limit: u32,
    ) -> Result<Vec<String>, BoxError> {
        let q = format!("type:{} {}", qualifier, query);
        let response: SearchResponse<GitHubAccount> = self.get_search("users", &q, limit).await?;
        Ok(response.items.into_iter().map(|a| a.login).collect())
    }

    async fn search_repositories(&self, query: &str, limit: u32) -> Result<Vec<String>, BoxError> {
        let response: SearchResponse<GitHubRepository> =
            self.get_search("repositories", query, limit).await?;
        Ok(response.items.into_iter().map(|r| r.full_name).collect())
    }

    async fn get_search<T: serde::de::DeserializeOwned>(
        &self,
        kind: &str,
        q: &str,
        limit: u32,
    ) -> Result<SearchResponse<T>, BoxError> {
        let url = format!("{}/search/{}", self.base_url, kind);
        let request = self
            .http
            .get(&url)
            .query(&[("q", q.to_string()), ("per_page", limit.to_string())]);

        let response = self.http.send(request).await?;
        let parsed: SearchResponse<T> = decode_response(Platform::GitHub, response).await?;
        debug!(
            "GitHub {} search for '{}' returned {} of {} results",
            kind,
            q,
            parsed.items.len(),
            parsed.total_count
        );
        Ok(parsed)
    }
}

impl SearchBackend for GitHubClient {
    fn platform(&self) -> Platform {
        Platform::GitHub
    }

    async fn search(
        &self,
        category: Category,
        query: &str,
        limit: u32,
    ) -> Result<Vec<String>, BoxError> {
        match category {
            Category::Organization => self.search_accounts("org", query, limit).await,
            Category::Repository => self.search_repositories(query, limit).await,
            Category::User => self.search_accounts("user", query, limit).await,
        }
    }
}
