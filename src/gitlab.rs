use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::{resolve_token, Category, Platform};
use crate::models::{decode_response, GitLabGroup, GitLabProject, GitLabUser};
use crate::searcher::SearchBackend;
use crate::{Args, BoxError};

pub const GITLAB_TOKEN_VAR: &str = "GITLAB_ACCESS_TOKEN";

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// GitLab REST client. Groups stand in for organizations and projects for
/// repositories. Requests are not rate limited locally.
pub struct GitLabClient {
    client: Client,
    base_url: String,
}

impl GitLabClient {
    /// Build a client from the command line, falling back to
    /// `GITLAB_ACCESS_TOKEN` for the token.
    pub fn from_args(args: &Args) -> Result<Self, BoxError> {
        let token = resolve_token(args.gitlab_token.as_deref(), GITLAB_TOKEN_VAR)?;
        Self::new(&token, &args.gitlab_api_url)
    }

    pub fn new(token: &str, base_url: &str) -> Result<Self, BoxError> {
        let mut headers = HeaderMap::new();
        let mut private_token = HeaderValue::from_str(token)?;
        private_token.set_sensitive(true);
        headers.insert(HeaderName::from_static("private-token"), private_token);

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(GitLabClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// `GET /<resource>?search=<query>&per_page=<limit>`, first page only.
    async fn list<T: DeserializeOwned>(
        &self,
        resource: &str,
        query: &str,
        limit: u32,
    ) -> Result<Vec<T>, BoxError> {
        let url = format!("{}/{}", self.base_url, resource);
        debug!("Requesting URL: {} (search '{}')", url, query);

        let response = self
            .client
            .get(&url)
            .query(&[("search", query.to_string()), ("per_page", limit.to_string())])
            .send()
            .await?;

        let items: Vec<T> = decode_response(Platform::GitLab, response).await?;
        debug!("GitLab {} search for '{}' returned {} results", resource, query, items.len());
        Ok(items)
    }
}

impl SearchBackend for GitLabClient {
    fn platform(&self) -> Platform {
        Platform::GitLab
    }

    async fn search(
        &self,
        category: Category,
        query: &str,
        limit: u32,
    ) -> Result<Vec<String>, BoxError> {
        let names: Vec<String> = match category {
            Category::Organization => self
                .list::<GitLabGroup>("groups", query, limit)
                .await?
                .into_iter()
                .map(|g| g.full_path)
                .collect(),
            Category::User => self
                .list::<GitLabUser>("users", query, limit)
                .await?
                .into_iter()
                .map(|u| u.username)
                .collect(),
            Category::Repository => self
                .list::<GitLabProject>("projects", query, limit)
                .await?
                .into_iter()
                .map(|p| p.path_with_namespace)
                .collect(),
        };
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockServer;

    #[tokio::test]
    async fn groups_map_to_full_paths() {
        let server = MockServer::start(vec![(
            200,
            r#"[{"id": 1, "full_path": "acme"}, {"id": 2, "full_path": "acme/platform"}]"#,
        )])
        .await;

        let client = GitLabClient::new("glpat-secret", &server.base_url).unwrap();
        let names = client.search(Category::Organization, "acme", 10).await.unwrap();

        assert_eq!(names, vec!["acme", "acme/platform"]);
        assert_eq!(
            server.request_lines(),
            vec!["GET /groups?search=acme&per_page=10 HTTP/1.1"]
        );
        assert!(server.requests()[0]
            .to_lowercase()
            .contains("private-token: glpat-secret"));
    }

    #[tokio::test]
    async fn users_and_projects_use_their_own_endpoints() {
        let server = MockServer::start(vec![
            (200, r#"[{"id": 7, "username": "acme-bot"}]"#),
            (200, r#"[{"id": 9, "path_with_namespace": "acme/widgets"}]"#),
        ])
        .await;

        let client = GitLabClient::new("t", &server.base_url).unwrap();
        let users = client.search(Category::User, "acme corp", 3).await.unwrap();
        let projects = client.search(Category::Repository, "widgets", 3).await.unwrap();

        assert_eq!(users, vec!["acme-bot"]);
        assert_eq!(projects, vec!["acme/widgets"]);
        assert_eq!(
            server.request_lines(),
            vec![
                "GET /users?search=acme+corp&per_page=3 HTTP/1.1",
                "GET /projects?search=widgets&per_page=3 HTTP/1.1",
            ]
        );
    }

    #[tokio::test]
    async fn unauthorized_reports_gitlab_error() {
        let server = MockServer::start(vec![(401, r#"{"message": "401 Unauthorized"}"#)]).await;

        let client = GitLabClient::new("bad", &server.base_url).unwrap();
        let err = client.search(Category::Repository, "x", 1).await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "GitLab API error (401 Unauthorized): 401 Unauthorized"
        );
    }
}
