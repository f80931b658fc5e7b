//! Logging setup for the command line tool.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install a stderr subscriber.
///
/// `RUST_LOG` takes precedence; otherwise the level is `debug` when `verbose` is set and
/// `info` when it is not. Calling this twice is a no-op.
pub fn init_logging(verbose: bool) {
  let default_level = if verbose { "debug" } else { "info" };
  let filter =
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

  let stderr_layer = fmt::layer()
    .with_writer(std::io::stderr)
    .with_target(verbose);

  let _ = tracing_subscriber::registry()
    .with(filter)
    .with(stderr_layer)
    .try_init();
}
