use std::env;
use std::io;
use std::process::ExitCode;

use dotenv::dotenv;
use forge_name_searching_lib::{words, Args, NameSearcher, Reporter, SearchConfig};
use tracing::{debug, error};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();

    let args = Args::parse_with_legacy_flags();

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(log_filter(args.verbose, env::var("RUST_LOG").ok().as_deref()))
        .try_init();

    let config = match SearchConfig::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let reporter = Reporter::new(&config);
    reporter.progress("Flags validated.");
    debug!("Search configuration: {:?}", config);

    reporter.progress("Reading and cleaning words...");
    let words = if args.words.is_empty() {
        match words::collect_from_reader(io::stdin().lock(), &config) {
            Ok(words) => words,
            Err(e) => {
                error!("Error reading stdin: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        words::collect_from_args(&args.words, &config)
    };
    reporter.progress("Words cleaned.");

    reporter.progress("Searching platforms...");
    let searcher = NameSearcher::new(config, &args);
    searcher.run(&words).await;
    reporter.progress("Platform search completed.");

    ExitCode::SUCCESS
}

/// `RUST_LOG` when set, otherwise WARN, or DEBUG with `-v`.
fn log_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    match rust_log {
        Some(directives) if !directives.trim().is_empty() => EnvFilter::new(directives),
        _ if verbose => EnvFilter::new("debug"),
        _ => EnvFilter::new("warn"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(filter: EnvFilter) -> String {
        filter.to_string().to_lowercase()
    }

    #[test]
    fn rust_log_replaces_the_default_level() {
        assert_eq!(rendered(log_filter(false, Some("debug"))), "debug");
        assert_eq!(rendered(log_filter(true, Some("reqwest=trace"))), "reqwest=trace");
    }

    #[test]
    fn verbose_flag_picks_the_default_level() {
        assert_eq!(rendered(log_filter(false, None)), "warn");
        assert_eq!(rendered(log_filter(true, Some("  "))), "debug");
    }
}
