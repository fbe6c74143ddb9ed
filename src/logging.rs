use tracing_subscriber::EnvFilter;

/// Install a stderr `tracing` subscriber.
///
/// `RUST_LOG` wins when set; otherwise `verbose` selects between
/// `warn,jobpoll=info` and `warn,jobpoll=debug`.
pub fn init_logging(verbose: bool) {
    let default_directives = if verbose {
        "warn,jobpoll=debug"
    } else {
        "warn,jobpoll=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives));

    // Ignore the error when a subscriber is already installed.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
