use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber: JSON lines on stdout, level
/// controlled by `RUST_LOG`. Call once from `main`.
///
/// Calling again is a no-op rather than a panic, so test binaries that
/// initialize eagerly stay quiet.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().json())
        .try_init();
}
