use tracing_subscriber::EnvFilter;

/// Installs the fmt subscriber on stderr, filtered by `RUST_LOG` (default `engine=info`).
/// `verbose` raises the default to debug.
pub fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "engine=debug" } else { "engine=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
