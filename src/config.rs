use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::Args;

/// Class of entity being searched for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Organization,
    Repository,
    User,
}

/// Code hosting service a search runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    GitHub,
    GitLab,
}

impl Platform {
    /// Categories in the order they are searched for each word.
    pub fn category_order(self) -> [Category; 3] {
        match self {
            Platform::GitHub => [Category::Organization, Category::Repository, Category::User],
            Platform::GitLab => [Category::Organization, Category::User, Category::Repository],
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::GitHub => f.write_str("GitHub"),
            Platform::GitLab => f.write_str("GitLab"),
        }
    }
}

/// A (platform, category) pair. Each target has its own result file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Target {
    pub platform: Platform,
    pub category: Category,
}

impl Target {
    pub fn new(platform: Platform, category: Category) -> Self {
        Target { platform, category }
    }

    /// Human-readable name, e.g. `GitLab groups`.
    pub fn label(&self) -> String {
        format!("{} {}", self.platform, self.noun())
    }

    /// Fixed file the results for this target are written to.
    pub fn file_name(&self) -> String {
        let platform = match self.platform {
            Platform::GitHub => "github",
            Platform::GitLab => "gitlab",
        };
        format!("{}_{}.txt", platform, self.noun())
    }

    fn noun(&self) -> &'static str {
        match (self.platform, self.category) {
            (Platform::GitHub, Category::Organization) => "organizations",
            (Platform::GitHub, Category::Repository) => "repositories",
            (Platform::GitLab, Category::Organization) => "groups",
            (Platform::GitLab, Category::Repository) => "projects",
            (_, Category::User) => "users",
        }
    }
}

/// Use the explicit token when it is non-blank, else the environment variable.
pub fn resolve_token(explicit: Option<&str>, var: &str) -> Result<String, ConfigError> {
    match explicit {
        Some(t) if !t.trim().is_empty() => Ok(t.trim().to_string()),
        _ => match env::var(var) {
            Ok(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
            _ => Err(ConfigError::MissingToken(var.to_string())),
        },
    }
}

/// Unusable configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("At least one search flag (-o, -r, or -u) must be specified")]
    NoCategory,

    #[error("{0} environment variable is not set")]
    MissingToken(String),
}

/// Immutable run configuration built once from the parsed arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    pub org: bool,
    pub repo: bool,
    pub user: bool,
    pub max_results: u32,
    pub clean_urls: bool,
    pub github_only: bool,
    pub gitlab_only: bool,
    pub simple: bool,
    pub verbose: bool,
    pub output_dir: PathBuf,
}

impl SearchConfig {
    /// Validate the arguments. At least one category flag is required.
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        if !(args.org || args.repo || args.user) {
            return Err(ConfigError::NoCategory);
        }

        Ok(SearchConfig {
            org: args.org,
            repo: args.repo,
            user: args.user,
            max_results: args.max,
            clean_urls: args.clean,
            github_only: args.github_only,
            gitlab_only: args.gitlab_only,
            simple: args.simple,
            verbose: args.verbose,
            output_dir: args.output_dir.clone(),
        })
    }

    pub fn wants(&self, category: Category) -> bool {
        match category {
            Category::Organization => self.org,
            Category::Repository => self.repo,
            Category::User => self.user,
        }
    }

    /// Whether a platform takes part in this run. Passing both `-gh` and
    /// `-gl` excludes both platforms.
    pub fn searches(&self, platform: Platform) -> bool {
        match platform {
            Platform::GitHub => !self.gitlab_only,
            Platform::GitLab => !self.github_only,
        }
    }

    /// Enabled targets for a platform, in search order.
    pub fn targets(&self, platform: Platform) -> Vec<Target> {
        platform
            .category_order()
            .into_iter()
            .filter(|category| self.wants(*category))
            .map(|category| Target::new(platform, category))
            .collect()
    }
}
