//! # Forge Name Searching
//!
//! A Rust library for finding GitHub and GitLab organizations, repositories
//! and users whose names match a list of candidate words.
//!
//! ## Main Components
//!
//! - [`words`]: collects input words and derives URL-stripped, compact and
//!   hyphenated variants
//! - [`NameSearcher`]: dispatches each word to the enabled platforms and
//!   categories
//! - [`GitHubClient`] / [`GitLabClient`]: the platform search clients; GitHub
//!   requests go through a token-bucket [`RateLimiter`]
//! - [`Reporter`]: prints results and writes one file per platform and
//!   category
//! - [`Args`] / [`SearchConfig`]: command line and the validated run
//!   configuration
//!
//! ## Example
//!
//! ```no_run
//! use forge_name_searching_lib::{words, Args, NameSearcher, SearchConfig};
//! use clap::Parser;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let args = Args::parse_from(["forge-name-searching", "-o", "-r", "acme corp"]);
//!     let config = SearchConfig::from_args(&args)?;
//!
//!     let words = words::collect_from_args(&args.words, &config);
//!     let searcher = NameSearcher::new(config, &args);
//!     searcher.run(&words).await;
//!
//!     Ok(())
//! }
//! ```

mod args;
pub mod config;
pub mod github;
pub mod gitlab;
pub mod models;
pub mod rate_limit;
pub mod report;
pub mod searcher;
pub mod words;

#[cfg(test)]
mod test_support;

/// Error type used across the crate.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub use crate::args::{normalize_legacy_flags, Args};
pub use crate::config::{Category, ConfigError, Platform, SearchConfig, Target};
pub use crate::github::GitHubClient;
pub use crate::gitlab::GitLabClient;
pub use crate::rate_limit::{RateLimitedClient, RateLimiter};
pub use crate::report::Reporter;
pub use crate::searcher::{NameSearcher, SearchBackend, SearchSummary};
pub use crate::words::WordSet;
