//! Centralized tracing initialization for the workcell nodes.
//!
//! Uses a thread-local subscriber so node logging does not fight with the
//! global subscriber Dora installs for its own runtime.

use tracing::subscriber::DefaultGuard;
use tracing_subscriber::EnvFilter;

/// Initialize tracing with a thread-local subscriber.
///
/// Respects `RUST_LOG` (defaults to "info") and emits compact lines
/// without target/file/line noise.
///
/// # Returns
/// A `DefaultGuard` that keeps the subscriber active. Keep it in scope for
/// the lifetime of the node.
///
/// # Example
/// ```no_run
/// use arm_pilot_lib::init_tracing;
///
/// fn main() {
///     let _guard = init_tracing();
///     // node event loop
/// }
/// ```
pub fn init_tracing() -> DefaultGuard {
    use tracing_subscriber::layer::SubscriberExt;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_file(false)
        .with_line_number(false);

    let subscriber = tracing_subscriber::Registry::default()
        .with(env_filter)
        .with(fmt_layer);

    tracing::subscriber::set_default(subscriber)
}
