//! Logging initialization.
//!
//! Controlled by `PATREV_LOG`:
//! - unset → no-op (the TUI owns the terminal; logging stays off)
//! - `"stderr"` → JSON events to stderr via tracing-subscriber
//!
//! The event filter follows `RUST_LOG` when set, defaulting to `info`.

use tracing_subscriber::EnvFilter;

/// Initialize logging based on `PATREV_LOG`. Call once, before any UI is
/// constructed.
pub fn init() {
    if std::env::var("PATREV_LOG").as_deref() == Ok("stderr") {
        init_stderr();
    }
}

/// JSON events to stderr via tracing-subscriber's JSON formatter.
fn init_stderr() {
    use tracing_subscriber::layer::SubscriberExt as _;
    use tracing_subscriber::util::SubscriberInitExt as _;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr),
        )
        .init();
}
