//! Logging setup for the wext CLI.
//!
//! Structured logging via the `tracing` ecosystem: `--verbose` bumps the wext
//! crates to debug, `--quiet` drops to errors only, and `RUST_LOG` overrides
//! the default info filter when neither flag is set.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global tracing subscriber. Call once, before any logging.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let filter = if verbose {
        EnvFilter::new("wext_cli=debug,wext_pipeline=debug,wext_config=debug")
    } else if quiet {
        EnvFilter::new("wext_cli=error,wext_pipeline=error,wext_config=error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("wext_cli=info,wext_pipeline=info,wext_config=info")
        })
    };

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    // The subscriber is global and can only be installed once per process, so
    // these only exercise filter construction.

    #[test]
    fn verbose_filter_parses() {
        let _ = EnvFilter::new("wext_cli=debug,wext_pipeline=debug,wext_config=debug");
    }

    #[test]
    fn quiet_filter_parses() {
        let _ = EnvFilter::new("wext_cli=error,wext_pipeline=error,wext_config=error");
    }
}
