//! Logging setup for the `bsg` binary.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global tracing subscriber
///
/// `verbose` wins over `quiet`; with neither set, `RUST_LOG` is honoured and
/// falls back to info level for this crate.
pub fn init_logger(verbose: bool, quiet: bool) {
    let filter = if verbose {
        EnvFilter::new("bsg=debug")
    } else if quiet {
        EnvFilter::new("bsg=error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bsg=info"))
    };

    let fmt_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    // A subscriber may already be installed when embedded in another tool
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
