use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;

/// Multi-letter flags that have always been spelled with a single dash.
const LEGACY_LONG_FLAGS: [&str; 3] = ["max", "gh", "gl"];

/// Search GitHub and GitLab for organizations, repositories and users whose
/// names match a list of candidate words.
#[derive(Parser, Debug, Clone)]
#[clap(
    author,
    version,
    about,
    long_about = "Reads candidate words from the command line or standard input, derives \
                  URL-stripped, compact and hyphenated variants, and looks each of them up on \
                  GitHub and GitLab. Results are printed and saved to one text file per \
                  platform and category."
)]
pub struct Args {
    /// Words to search for. Read line by line from standard input when omitted.
    #[clap(value_name = "WORD")]
    pub words: Vec<String>,

    /// Search for organization names (GitHub organizations, GitLab groups).
    #[clap(short = 'o', long = "org")]
    pub org: bool,

    /// Search for repository names (GitHub repositories, GitLab projects).
    #[clap(short = 'r', long = "repo")]
    pub repo: bool,

    /// Search for username matches.
    #[clap(short = 'u', long = "user")]
    pub user: bool,

    /// Maximum search results per category.
    #[clap(long = "max", value_name = "N", default_value = "10")]
    pub max: u32,

    /// Reduce URL inputs to their host name before searching.
    #[clap(short = 'c', long = "clean")]
    pub clean: bool,

    /// Search only GitHub.
    #[clap(long = "gh")]
    pub github_only: bool,

    /// Search only GitLab.
    #[clap(long = "gl")]
    pub gitlab_only: bool,

    /// Simple output style for piping to another tool.
    #[clap(short = 's', long = "simple")]
    pub simple: bool,

    /// Print progress messages and enable debug logging.
    #[clap(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Directory the result files are written to.
    #[clap(short = 'd', long, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// GitHub API token. Falls back to GITHUB_ACCESS_TOKEN.
    #[clap(long)]
    pub github_token: Option<String>,

    /// GitLab API token. Falls back to GITLAB_ACCESS_TOKEN.
    #[clap(long)]
    pub gitlab_token: Option<String>,

    /// Base URL of the GitHub REST API.
    #[clap(long, env = "GITHUB_API_URL", default_value = "https://api.github.com")]
    pub github_api_url: String,

    /// Base URL of the GitLab REST API.
    #[clap(long, env = "GITLAB_API_URL", default_value = "https://gitlab.com/api/v4")]
    pub gitlab_api_url: String,
}

impl Args {
    /// Parse process arguments, accepting `-max`, `-gh` and `-gl` as well as
    /// their double-dash forms.
    pub fn parse_with_legacy_flags() -> Self {
        Self::parse_from(normalize_legacy_flags(std::env::args_os()))
    }
}

/// Rewrite `-max`, `-max=N`, `-gh` and `-gl` to the `--` spelling clap
/// understands. Everything after a bare `--` is left untouched.
pub fn normalize_legacy_flags<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut out = Vec::new();
    let mut passthrough = false;

    for arg in args {
        if passthrough {
            out.push(arg);
            continue;
        }

        let rewritten = arg.to_str().and_then(|s| {
            if s == "--" {
                return None;
            }
            let body = s.strip_prefix('-').filter(|b| !b.starts_with('-'))?;
            let name = body.split('=').next().unwrap_or(body);
            LEGACY_LONG_FLAGS
                .contains(&name)
                .then(|| OsString::from(format!("-{}", s)))
        });

        if arg == "--" {
            passthrough = true;
        }
        out.push(rewritten.unwrap_or(arg));
    }

    out
}
