use std::io::Write;
use std::path::PathBuf;

use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::config::{SearchConfig, Target};
use crate::BoxError;

/// Prints results and saves them to the per-target result files.
pub struct Reporter {
    simple: bool,
    verbose: bool,
    output_dir: PathBuf,
}

impl Reporter {
    pub fn new(config: &SearchConfig) -> Self {
        Reporter {
            simple: config.simple,
            verbose: config.verbose,
            output_dir: config.output_dir.clone(),
        }
    }

    /// Progress line on standard output, only in verbose mode.
    pub fn progress(&self, message: &str) {
        if self.verbose {
            println!("{}", message);
        }
    }

    /// Text printed for one result list. Simple mode is the bare names, one
    /// per line; otherwise a header followed by bulleted names.
    pub fn render(&self, target: Target, query: &str, results: &[String]) -> String {
        let mut out = String::new();
        if self.simple {
            for result in results {
                out.push_str(result);
                out.push('\n');
            }
        } else {
            out.push_str(&format!("\n{} matching '{}':\n", target.label(), query));
            for result in results {
                out.push_str(&format!("- {}\n", result));
            }
        }
        out
    }

    /// Print the results, then overwrite the target's result file with them.
    pub async fn report(
        &self,
        target: Target,
        query: &str,
        results: &[String],
    ) -> Result<PathBuf, BoxError> {
        let text = self.render(target, query, results);
        {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
        }
        self.persist(target, results).await
    }

    /// Truncate and rewrite the result file: one name per line.
    pub async fn persist(&self, target: Target, results: &[String]) -> Result<PathBuf, BoxError> {
        fs::create_dir_all(&self.output_dir).await?;
        let path = self.output_dir.join(target.file_name());

        let mut file = File::create(&path).await?;
        for result in results {
            file.write_all(result.as_bytes()).await?;
            file.write_all(b"\n").await?;
        }
        file.flush().await?;

        debug!("Saved {} results to '{}'", results.len(), path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Category, Platform};
    use crate::Args;
    use clap::Parser;
    use tempfile::tempdir;

    fn reporter(extra: &[&str], dir: &std::path::Path) -> Reporter {
        let mut argv = vec!["bin", "-o", "-d", dir.to_str().unwrap()];
        argv.extend_from_slice(extra);
        Reporter::new(&SearchConfig::from_args(&Args::parse_from(argv)).unwrap())
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn default_mode_prints_header_and_bullets() {
        let dir = tempdir().unwrap();
        let target = Target::new(Platform::GitHub, Category::Organization);
        let text = reporter(&[], dir.path()).render(target, "acme", &names(&["acme", "acme-io"]));

        assert_eq!(
            text,
            "\nGitHub organizations matching 'acme':\n- acme\n- acme-io\n"
        );
    }

    #[test]
    fn simple_mode_prints_bare_names_in_order() {
        let dir = tempdir().unwrap();
        let target = Target::new(Platform::GitLab, Category::Repository);
        let text = reporter(&["-s"], dir.path()).render(target, "w", &names(&["z/b", "a/c"]));

        assert_eq!(text, "z/b\na/c\n");
        assert!(!text.contains("matching"));
    }

    #[tokio::test]
    async fn persist_overwrites_previous_results() {
        let dir = tempdir().unwrap();
        let reporter = reporter(&[], dir.path());
        let target = Target::new(Platform::GitLab, Category::User);

        reporter.persist(target, &names(&["first", "second", "third"])).await.unwrap();
        let path = reporter.persist(target, &names(&["latest"])).await.unwrap();

        assert_eq!(path, dir.path().join("gitlab_users.txt"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "latest\n");
    }

    #[tokio::test]
    async fn empty_results_leave_an_empty_file() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("out");
        let reporter = reporter(&[], &nested);
        let target = Target::new(Platform::GitHub, Category::Repository);

        let path = reporter.persist(target, &[]).await.unwrap();

        assert_eq!(std::fs::read_to_string(path).unwrap(), "");
    }
}
