//! Error types for the switchback routing engine.
//!
//! Two layers of errors exist: [`PatternError`], raised while compiling a
//! route pattern and surfaced immediately to the code registering the route,
//! and [`RouterError`], raised during a dispatch and routed through the
//! error-handler chain of the router level that observed it.

use thiserror::Error;

/// An error produced while compiling a route pattern string.
///
/// Pattern errors are fatal at registration time: a router refuses to accept
/// a handler whose pattern does not compile.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// An optional group was opened but never closed, or closed without
    /// being opened.
    #[error("unbalanced optional group in route pattern `{pattern}`")]
    UnbalancedGroup {
        /// The offending pattern text.
        pattern: String,
    },

    /// The same capture name appeared more than once in one pattern.
    #[error("duplicate parameter `{name}` in route pattern `{pattern}`")]
    DuplicateParameter {
        /// The offending pattern text.
        pattern: String,
        /// The repeated capture name.
        name: String,
    },

    /// The translated pattern was rejected by the regex engine.
    #[error("route pattern `{pattern}` failed to compile: {reason}")]
    Syntax {
        /// The offending pattern text.
        pattern: String,
        /// The rejection reason reported by the regex engine.
        reason: String,
    },
}

/// The primary error type for the switchback routing engine.
///
/// A `RouterError` raised by a handler is caught by the dispatch loop of the
/// same router level and offered to that level's error-handler chain. If no
/// error handler consumes it, it propagates to the router's caller.
///
/// The type is `Clone` so that one failure can be recorded on the dispatch
/// context (where error handlers inspect it) while also propagating upward.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouterError {
    /// A route pattern failed to compile.
    #[error(transparent)]
    Pattern(#[from] PatternError),

    /// A handler required a context field that was absent at runtime.
    ///
    /// This signals a composition error, such as dispatching without a
    /// seeded route remainder.
    #[error("dispatch context is missing the `{0}` field")]
    MissingContextField(&'static str),

    /// A named callback could not be resolved through the action registry.
    #[error("no action named `{0}` is registered")]
    UnknownAction(String),

    /// An action failed while matching or triggering.
    #[error("handler failure: {0}")]
    Handler(String),

    /// A configuration value is missing or invalid.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl RouterError {
    /// Creates a [`RouterError::Handler`] from any displayable message.
    ///
    /// # Examples
    ///
    /// ```
    /// use switchback_core::RouterError;
    ///
    /// let err = RouterError::handler("database connection lost");
    /// assert_eq!(err.to_string(), "handler failure: database connection lost");
    /// ```
    pub fn handler(message: impl Into<String>) -> Self {
        Self::Handler(message.into())
    }
}

/// A convenience type alias for `Result<T, RouterError>`.
pub type RouterResult<T> = Result<T, RouterError>;
