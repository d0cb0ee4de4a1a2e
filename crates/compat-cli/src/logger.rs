//! Logging setup for the `compat` CLI.
//!
//! Logs go to stderr so `compat list` output on stdout stays pipeable.
//!
//! The level is chosen in this order:
//! 1. `--verbose`: debug for the compat crates
//! 2. `--quiet`: errors only
//! 3. `RUST_LOG`, if set
//! 4. Warnings from the libraries, info from the CLI

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const VERBOSE_FILTER: &str = "compat_matrix=debug,compat_engine=debug,compat_cli=debug";
const QUIET_FILTER: &str = "error";
const DEFAULT_FILTER: &str = "compat_matrix=warn,compat_engine=warn,compat_cli=info";

/// Builds the filter for the given flags.
pub fn filter_for(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Installs the global tracing subscriber. Call once, before any logging.
///
/// ```rust,no_run
/// use compat_cli::logger::init_logger;
///
/// init_logger(false, false, false);
/// tracing::info!("Loaded {} probes", 42);
/// ```
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    // A second call (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter_for(verbose, quiet))
        .with(fmt_layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_wins_over_quiet() {
        let filter = filter_for(true, true).to_string();
        assert!(filter.contains("compat_engine=debug"));
    }

    #[test]
    fn quiet_is_errors_only() {
        assert_eq!(filter_for(false, true).to_string(), "error");
    }

    #[test]
    fn init_twice_does_not_panic() {
        init_logger(false, true, true);
        init_logger(true, false, true);
    }
}
