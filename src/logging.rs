use tracing::Level;

/// Install the global tracing subscriber. Calling it again is a no-op.
///
/// `level` is used when no filter comes from the environment; it falls back
/// to DEBUG in debug builds and INFO otherwise.
pub fn init_logging(level: Option<&str>) {
    let max_level = level
        .and_then(|l| l.trim().parse::<Level>().ok())
        .unwrap_or(if cfg!(debug_assertions) {
            Level::DEBUG
        } else {
            Level::INFO
        });
    install(max_level);
}

#[cfg(target_arch = "wasm32")]
fn install(max_level: Level) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_wasm::WASMLayerConfigBuilder;

    let mut builder = WASMLayerConfigBuilder::new();
    builder.set_max_level(max_level);
    let config = builder.build();
    let _ = tracing_subscriber::registry()
        .with(tracing_wasm::WASMLayer::new(config))
        .try_init();
    console_error_panic_hook::set_once();
}

#[cfg(not(target_arch = "wasm32"))]
fn install(max_level: Level) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(max_level.as_str().to_ascii_lowercase()));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
