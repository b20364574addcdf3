use indicatif::{ProgressBar, ProgressStyle};
use tokio::time::Duration;
use tracing::{debug, error, info};

use crate::config::{Category, Platform, SearchConfig, Target};
use crate::github::GitHubClient;
use crate::gitlab::GitLabClient;
use crate::report::Reporter;
use crate::words::WordSet;
use crate::{Args, BoxError};

/// A platform that can look names up by category.
#[allow(async_fn_in_trait)]
pub trait SearchBackend {
    fn platform(&self) -> Platform;

    /// Up to `limit` matching names from the first page of results, in the
    /// order the provider returned them.
    async fn search(&self, category: Category, query: &str, limit: u32)
        -> Result<Vec<String>, BoxError>;
}

/// Outcome counts for a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SearchSummary {
    pub succeeded: usize,
    pub failed: usize,
}

/// Runs every enabled (platform, category) search for each word, one call at
/// a time.
pub struct NameSearcher<G, L> {
    config: SearchConfig,
    github: Option<G>,
    gitlab: Option<L>,
    reporter: Reporter,
}

impl NameSearcher<GitHubClient, GitLabClient> {
    /// Create clients for the enabled platforms. A platform whose client
    /// cannot be created (usually a missing token) is skipped for the run.
    pub fn new(config: SearchConfig, args: &Args) -> Self {
        let github = if config.searches(Platform::GitHub) {
            match GitHubClient::from_args(args) {
                Ok(client) => Some(client),
                Err(e) => {
                    error!("Error creating GitHub client: {}", e);
                    None
                }
            }
        } else {
            None
        };

        let gitlab = if config.searches(Platform::GitLab) {
            match GitLabClient::from_args(args) {
                Ok(client) => Some(client),
                Err(e) => {
                    error!("Error creating GitLab client: {}", e);
                    None
                }
            }
        } else {
            None
        };

        NameSearcher::with_backends(config, github, gitlab)
    }
}

impl<G: SearchBackend, L: SearchBackend> NameSearcher<G, L> {
    pub fn with_backends(config: SearchConfig, github: Option<G>, gitlab: Option<L>) -> Self {
        let reporter = Reporter::new(&config);
        NameSearcher {
            config,
            github,
            gitlab,
            reporter,
        }
    }

    /// Search every word: GitHub first, then GitLab. Failures are logged and
    /// counted; they never stop the run.
    pub async fn run(&self, words: &WordSet) -> SearchSummary {
        let mut summary = SearchSummary::default();

        for word in words.iter() {
            if self.config.searches(Platform::GitHub) {
                if let Some(github) = &self.github {
                    self.reporter
                        .progress(&format!("Searching GitHub for word: {}", word));
                    self.search_platform(github, word, &mut summary).await;
                }
            }

            if self.config.searches(Platform::GitLab) {
                if let Some(gitlab) = &self.gitlab {
                    self.reporter
                        .progress(&format!("Searching GitLab for word: {}", word));
                    self.search_platform(gitlab, word, &mut summary).await;
                }
            }
        }

        info!(
            "Finished {} searches over {} words ({} failed)",
            summary.succeeded + summary.failed,
            words.len(),
            summary.failed
        );
        summary
    }

    async fn search_platform<B: SearchBackend>(
        &self,
        backend: &B,
        word: &str,
        summary: &mut SearchSummary,
    ) {
        for target in self.config.targets(backend.platform()) {
            match self.search_target(backend, target, word).await {
                Ok(()) => summary.succeeded += 1,
                Err(e) => {
                    error!("Error searching {}: {}", target.label(), e);
                    summary.failed += 1;
                }
            }
        }
    }

    /// One remote call. On failure nothing is printed or written.
    async fn search_target<B: SearchBackend>(
        &self,
        backend: &B,
        target: Target,
        word: &str,
    ) -> Result<(), BoxError> {
        let spinner = self.spinner(target, word);
        let result = backend
            .search(target.category, word, self.config.max_results)
            .await;
        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }

        let results = result?;
        let path = self.reporter.report(target, word, &results).await?;
        debug!(
            "{} results for '{}' written to '{}'",
            target.label(),
            word,
            path.display()
        );
        Ok(())
    }

    /// Spinner on stderr while a call is in flight. Only in the default
    /// output mode; simple and verbose output stay plain.
    fn spinner(&self, target: Target, word: &str) -> Option<ProgressBar> {
        if self.config.simple || self.config.verbose {
            return None;
        }

        let pb = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
        pb.set_style(style);
        pb.set_message(format!("Searching {} for '{}'", target.label(), word));
        pb.enable_steady_tick(Duration::from_millis(80));
        Some(pb)
    }
}
