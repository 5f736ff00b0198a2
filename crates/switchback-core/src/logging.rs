//! Logging integration for the switchback routing engine.
//!
//! Provides a helper for configuring [`tracing`]-based logging from
//! [`SiteSettings`](crate::settings::SiteSettings) and for creating
//! per-dispatch spans.

use crate::settings::SiteSettings;

/// Sets up the global tracing subscriber based on the given settings.
///
/// The log filter is read from `settings.log_level`. In debug mode a pretty,
/// human-readable format is used; otherwise a structured JSON format is used.
/// Installing a subscriber twice is a no-op.
pub fn setup_logging(settings: &SiteSettings) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(&settings.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    if settings.debug {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .pretty()
            .try_init()
            .ok();
    } else {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .try_init()
            .ok();
    }
}

/// Creates a tracing span covering one dispatch.
///
/// # Examples
///
/// ```
/// use switchback_core::logging::dispatch_span;
///
/// let span = dispatch_span("GET", "/users/42");
/// let _guard = span.enter();
/// tracing::debug!("dispatching");
/// ```
pub fn dispatch_span(method: &str, path: &str) -> tracing::Span {
    tracing::info_span!("dispatch", %method, %path)
}
