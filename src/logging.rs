use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the tracing subscriber for standalone (non-UI-hosted) use.
///
/// Filtering defaults to `info` for this crate's target and can be overridden
/// with `RUST_LOG`. Calling this more than once is harmless.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("carrickmore=info"));
    let _ = fmt().with_env_filter(filter).try_init();
}
