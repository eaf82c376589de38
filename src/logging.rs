use tracing_subscriber::EnvFilter;

/// Installe le subscriber fmt. Filtre lu dans RUST_LOG, `info` par défaut.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_line_number(false)
        .init();
}
