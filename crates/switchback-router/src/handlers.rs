//! Handler variants and the dispatch outcome type.
//!
//! Every handler exposes [`Handler::handle`], returning an explicit
//! three-way [`Outcome`]: the handler matched and routing stops, the handler
//! did not match and the chain continues, or the handler failed and the
//! failure enters the error-handler chain of the router that observed it.

use std::sync::Arc;

use switchback_core::{PatternError, RouterError, RouterResult};

use crate::action::{normalize_namespace, Callback, IntoCallback};
use crate::context::DispatchContext;
use crate::pattern::RoutePattern;
use crate::router::Router;

/// The result of offering a request to one handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The handler matched; routing stops here.
    Matched,
    /// The handler did not match; the next handler is tried.
    NotMatched,
    /// The handler raised a failure.
    Failed(RouterError),
}

impl Outcome {
    /// Returns `true` for [`Outcome::Matched`].
    pub const fn is_matched(&self) -> bool {
        matches!(self, Self::Matched)
    }

    /// Converts into a `Result`, mapping matched/not-matched to a boolean.
    pub fn into_result(self) -> RouterResult<bool> {
        match self {
            Self::Matched => Ok(true),
            Self::NotMatched => Ok(false),
            Self::Failed(failure) => Err(failure),
        }
    }

    /// Lifts an action result into an outcome for a handler that matched.
    fn from_trigger(result: RouterResult<()>) -> Self {
        match result {
            Ok(()) => Self::Matched,
            Err(failure) => Self::Failed(failure),
        }
    }
}

/// A polymorphic routing unit.
///
/// Handlers are stateless with respect to the context between dispatches,
/// and `Send + Sync` so a registered router can serve concurrent dispatches
/// from multiple threads.
pub trait Handler<S>: Send + Sync {
    /// Reacts to the request carried by `context`.
    fn handle(&self, context: &mut DispatchContext<S>) -> Outcome;
}

/// Matches unconditionally and triggers its action.
///
/// Registered last, this is the catch-all behind
/// [`Router::not_found`](crate::Router::not_found); as an error handler it
/// is the generic fallback behind [`Router::error`](crate::Router::error).
pub struct Always<S> {
    callback: Callback<S>,
}

impl<S> Always<S> {
    /// Creates the handler.
    pub fn new(callback: impl IntoCallback<S>) -> Self {
        Self {
            callback: callback.into_callback(),
        }
    }
}

impl<S> Handler<S> for Always<S> {
    fn handle(&self, context: &mut DispatchContext<S>) -> Outcome {
        Outcome::from_trigger(self.callback.invoke(context))
    }
}

/// Triggers its action and lets routing continue.
///
/// The action runs purely for its side effects, typically to compute or
/// record something on the context for later handlers to read. Routing
/// never stops here, but a failure still enters the error chain.
pub struct Tap<S> {
    callback: Callback<S>,
}

impl<S> Tap<S> {
    /// Creates the handler.
    pub fn new(callback: impl IntoCallback<S>) -> Self {
        Self {
            callback: callback.into_callback(),
        }
    }
}

impl<S> Handler<S> for Tap<S> {
    fn handle(&self, context: &mut DispatchContext<S>) -> Outcome {
        match self.callback.invoke(context) {
            Ok(()) => Outcome::NotMatched,
            Err(failure) => Outcome::Failed(failure),
        }
    }
}

/// The predicate type used by [`Condition`].
pub type Predicate<S> = Arc<dyn Fn(&DispatchContext<S>) -> bool + Send + Sync>;

/// Triggers its action when a custom predicate holds.
pub struct Condition<S> {
    predicate: Predicate<S>,
    callback: Callback<S>,
}

impl<S> Condition<S> {
    /// Creates the handler.
    pub fn new<P>(predicate: P, callback: impl IntoCallback<S>) -> Self
    where
        P: Fn(&DispatchContext<S>) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(predicate),
            callback: callback.into_callback(),
        }
    }
}

impl<S> Handler<S> for Condition<S> {
    fn handle(&self, context: &mut DispatchContext<S>) -> Outcome {
        if (self.predicate)(context) {
            Outcome::from_trigger(self.callback.invoke(context))
        } else {
            Outcome::NotMatched
        }
    }
}

/// Matches the full remaining route against a pattern.
///
/// On match, captured parameters are merged into the context (later
/// duplicate keys overwrite earlier ones) before the action fires.
pub struct Route<S> {
    pattern: RoutePattern,
    callback: Callback<S>,
}

impl<S> Route<S> {
    /// Compiles the pattern and creates the handler.
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] when the pattern is malformed.
    pub fn new(route: &str, callback: impl IntoCallback<S>) -> Result<Self, PatternError> {
        Ok(Self {
            pattern: RoutePattern::compile(route)?,
            callback: callback.into_callback(),
        })
    }
}

impl<S> Handler<S> for Route<S> {
    fn handle(&self, context: &mut DispatchContext<S>) -> Outcome {
        let captured = match context.route() {
            Some(route) => self.pattern.matches(route),
            None => return Outcome::Failed(RouterError::MissingContextField("route")),
        };
        let Some(captured) = captured else {
            return Outcome::NotMatched;
        };
        context.merge_parameters(captured);
        Outcome::from_trigger(self.callback.invoke(context))
    }
}

/// Matches a method and a full route pattern together.
///
/// When the path matches but the method does not, the declared method is
/// recorded in the context's available-methods set and the handler reports
/// no match. The captured parameters stay merged in that case, so later
/// handlers for the same path see them.
pub struct Endpoint<S> {
    method: String,
    pattern: RoutePattern,
    callback: Callback<S>,
}

impl<S> Endpoint<S> {
    /// Compiles the pattern and creates the handler. The declared method is
    /// canonicalized to upper-case.
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] when the pattern is malformed.
    pub fn new(
        method: &str,
        route: &str,
        callback: impl IntoCallback<S>,
    ) -> Result<Self, PatternError> {
        Ok(Self {
            method: method.to_ascii_uppercase(),
            pattern: RoutePattern::compile(route)?,
            callback: callback.into_callback(),
        })
    }
}

impl<S> Handler<S> for Endpoint<S> {
    fn handle(&self, context: &mut DispatchContext<S>) -> Outcome {
        let captured = match context.route() {
            Some(route) => self.pattern.matches(route),
            None => return Outcome::Failed(RouterError::MissingContextField("route")),
        };
        let Some(captured) = captured else {
            return Outcome::NotMatched;
        };
        context.merge_parameters(captured);
        if context.method().eq_ignore_ascii_case(&self.method) {
            Outcome::from_trigger(self.callback.invoke(context))
        } else {
            context.record_available_method(&self.method);
            Outcome::NotMatched
        }
    }
}

/// Fires when an earlier handler matched the path but not the method.
///
/// The action can read the allowed methods from the context's
/// available-methods set, typically to produce a `405` with an `Allow`
/// header.
pub struct BadMethod<S> {
    callback: Callback<S>,
}

impl<S> BadMethod<S> {
    /// Creates the handler.
    pub fn new(callback: impl IntoCallback<S>) -> Self {
        Self {
            callback: callback.into_callback(),
        }
    }
}

impl<S> Handler<S> for BadMethod<S> {
    fn handle(&self, context: &mut DispatchContext<S>) -> Outcome {
        if context.available_methods().is_empty() {
            Outcome::NotMatched
        } else {
            Outcome::from_trigger(self.callback.invoke(context))
        }
    }
}

/// Sets the namespace under which later named callbacks resolve.
///
/// Never matches; it only communicates with later handlers.
pub struct SetNamespace {
    namespace: String,
}

impl SetNamespace {
    /// Creates the handler, normalizing the value once.
    pub fn new(value: &str) -> Self {
        Self {
            namespace: normalize_namespace(value),
        }
    }
}

impl<S> Handler<S> for SetNamespace {
    fn handle(&self, context: &mut DispatchContext<S>) -> Outcome {
        context.set_namespace(self.namespace.clone());
        Outcome::NotMatched
    }
}

/// Embeds a sub-router at a path prefix.
///
/// Matches if and only if the sub-router matches. A mount that does not
/// match is fully transparent: sibling handlers tried next see the original
/// route and parameter state untouched.
pub struct Mount<S> {
    pattern: RoutePattern,
    router: Router<S>,
}

impl<S> Mount<S> {
    /// Compiles the mount-point pattern and creates the handler.
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] when the pattern is malformed.
    pub fn new(route: &str, router: Router<S>) -> Result<Self, PatternError> {
        Ok(Self {
            pattern: RoutePattern::compile(route)?,
            router,
        })
    }
}

impl<S: 'static> Handler<S> for Mount<S> {
    fn handle(&self, context: &mut DispatchContext<S>) -> Outcome {
        let (captured, rest) = match context.route() {
            Some(route) => match self.pattern.match_prefix(route) {
                Some((captured, rest)) => (captured, rest.to_string()),
                None => return Outcome::NotMatched,
            },
            None => return Outcome::Failed(RouterError::MissingContextField("route")),
        };

        // Make the route relative to the mount point for the sub-router,
        // remembering enough to undo everything on a non-match.
        let saved_route = context.replace_route(Some(rest));
        let saved_parameters = context.save_parameters();
        context.merge_parameters(captured);

        let outcome = self.router.run(context);

        // The full route comes back regardless of outcome. Parameters
        // captured at the mount point stay only when the sub-router matched;
        // a failure propagates unmodified, past the rollback.
        context.replace_route(saved_route);
        if !outcome.is_matched() {
            context.restore_parameters(saved_parameters);
        }
        outcome
    }
}
