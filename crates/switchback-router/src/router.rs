//! The router: two ordered handler chains and the dispatch engine.

use std::fmt;

use tracing::{debug, trace};

use switchback_core::{logging, PatternError, SiteSettings};

use crate::action::IntoCallback;
use crate::context::{DispatchContext, RequestInfo};
use crate::handlers::{
    Always, BadMethod, Condition, Endpoint, Handler, Mount, Outcome, Route, SetNamespace, Tap,
};

/// An ordered chain of request handlers plus an ordered chain of error
/// handlers.
///
/// Handlers are tried in registration order until one matches. A failing
/// handler hands control to the error-handler chain, which follows the same
/// ordering rule. Registration must complete before dispatching begins;
/// after that the router is immutable and can serve concurrent dispatches
/// from multiple threads.
///
/// A router is itself a [`Handler`], which is what makes
/// [`mount`](Router::mount) nest to arbitrary depth.
///
/// # Examples
///
/// ```
/// use switchback_router::{act, DispatchContext, Router};
///
/// let mut router: Router<Option<String>> = Router::new();
/// router
///     .get("/users/:id", act(|ctx| {
///         let id = ctx.parameter("id").map(String::from);
///         *ctx.state_mut() = id;
///         Ok(())
///     }))
///     .unwrap();
///
/// let mut ctx = DispatchContext::new("GET", "/users/42", None);
/// assert!(router.run(&mut ctx).is_matched());
/// assert_eq!(ctx.state().as_deref(), Some("42"));
/// ```
pub struct Router<S> {
    handlers: Vec<Box<dyn Handler<S>>>,
    error_handlers: Vec<Box<dyn Handler<S>>>,
}

impl<S> fmt::Debug for Router<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("handlers", &self.handlers.len())
            .field("error_handlers", &self.error_handlers.len())
            .finish()
    }
}

impl<S: 'static> Default for Router<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: 'static> Router<S> {
    /// Creates a router with empty handler chains.
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
            error_handlers: Vec::new(),
        }
    }

    // ── Registration ─────────────────────────────────────────────────

    /// Appends a handler to the request handler chain.
    pub fn handler(&mut self, handler: impl Handler<S> + 'static) -> &mut Self {
        self.handlers.push(Box::new(handler));
        self
    }

    /// Appends a handler to the error handler chain.
    pub fn error_handler(&mut self, handler: impl Handler<S> + 'static) -> &mut Self {
        self.error_handlers.push(Box::new(handler));
        self
    }

    /// Registers a callback that fires on every dispatch reaching it.
    ///
    /// Routing always continues afterwards: the callback exists to compute
    /// or record something on the context for later handlers, not to answer
    /// the request. A failing callback still enters the error chain. A
    /// callback that should end routing belongs behind a predicate
    /// ([`condition`](Router::condition)) or a custom [`Handler`].
    pub fn callback(&mut self, callback: impl IntoCallback<S>) -> &mut Self {
        self.handler(Tap::new(callback))
    }

    /// Registers a conditional handler: the callback fires, and routing
    /// stops, when the predicate holds.
    pub fn condition<P>(&mut self, predicate: P, callback: impl IntoCallback<S>) -> &mut Self
    where
        P: Fn(&DispatchContext<S>) -> bool + Send + Sync + 'static,
    {
        self.handler(Condition::new(predicate, callback))
    }

    /// Sets the namespace prefixed to the names of later named callbacks.
    pub fn set_namespace(&mut self, value: &str) -> &mut Self {
        self.handler(SetNamespace::new(value))
    }

    /// Handles all requests to a certain path, regardless of method.
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] when the pattern is malformed.
    pub fn route(
        &mut self,
        route: &str,
        callback: impl IntoCallback<S>,
    ) -> Result<&mut Self, PatternError> {
        let handler = Route::new(route, callback)?;
        Ok(self.handler(handler))
    }

    /// Handles all requests to a certain combination of method and path.
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] when the pattern is malformed.
    pub fn endpoint(
        &mut self,
        method: &str,
        route: &str,
        callback: impl IntoCallback<S>,
    ) -> Result<&mut Self, PatternError> {
        let handler = Endpoint::new(method, route, callback)?;
        Ok(self.handler(handler))
    }

    /// Handles a `GET` request to a certain path.
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] when the pattern is malformed.
    pub fn get(
        &mut self,
        route: &str,
        callback: impl IntoCallback<S>,
    ) -> Result<&mut Self, PatternError> {
        self.endpoint("GET", route, callback)
    }

    /// Handles a `POST` request to a certain path.
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] when the pattern is malformed.
    pub fn post(
        &mut self,
        route: &str,
        callback: impl IntoCallback<S>,
    ) -> Result<&mut Self, PatternError> {
        self.endpoint("POST", route, callback)
    }

    /// Handles a `PUT` request to a certain path.
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] when the pattern is malformed.
    pub fn put(
        &mut self,
        route: &str,
        callback: impl IntoCallback<S>,
    ) -> Result<&mut Self, PatternError> {
        self.endpoint("PUT", route, callback)
    }

    /// Handles a `DELETE` request to a certain path.
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] when the pattern is malformed.
    pub fn delete(
        &mut self,
        route: &str,
        callback: impl IntoCallback<S>,
    ) -> Result<&mut Self, PatternError> {
        self.endpoint("DELETE", route, callback)
    }

    /// Mounts a sub-router at a path prefix.
    ///
    /// Routing stops if and only if the sub-router matches; it continues
    /// past a non-matching sub-router even when the mount point itself
    /// matched.
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] when the pattern is malformed.
    pub fn mount(&mut self, route: &str, router: Self) -> Result<&mut Self, PatternError> {
        let handler = Mount::new(route, router)?;
        Ok(self.handler(handler))
    }

    /// Handles any request whose path was matched earlier but whose method
    /// was not.
    pub fn bad_method(&mut self, callback: impl IntoCallback<S>) -> &mut Self {
        self.handler(BadMethod::new(callback))
    }

    /// Handles any request no earlier handler matched.
    pub fn not_found(&mut self, callback: impl IntoCallback<S>) -> &mut Self {
        self.handler(Always::new(callback))
    }

    /// Handles any failure raised by a request handler at this level.
    ///
    /// The failure is available to the callback through
    /// [`DispatchContext::failure`].
    pub fn error(&mut self, callback: impl IntoCallback<S>) -> &mut Self {
        self.error_handler(Always::new(callback))
    }

    // ── Dispatch ─────────────────────────────────────────────────────

    /// Walks the handler chain for one request.
    ///
    /// Handlers run in registration order until one matches. When a handler
    /// fails, the failure is recorded on the context and the error-handler
    /// chain runs, once, under the same ordering rule:
    ///
    /// - an error handler that matches consumes the failure and ends the
    ///   dispatch as matched;
    /// - an error handler that itself fails ends the dispatch immediately
    ///   with that new failure;
    /// - an exhausted error chain re-raises the original failure to the
    ///   caller (a parent mount, or the composing application).
    ///
    /// An exhausted request chain reports [`Outcome::NotMatched`]; partial
    /// mutations such as recorded methods or a namespace remain visible to
    /// the caller.
    pub fn run(&self, context: &mut DispatchContext<S>) -> Outcome {
        for (index, handler) in self.handlers.iter().enumerate() {
            match handler.handle(context) {
                Outcome::Matched => {
                    trace!(index, "handler matched");
                    return Outcome::Matched;
                }
                Outcome::NotMatched => {}
                Outcome::Failed(failure) => {
                    debug!(index, error = %failure, "handler failed, entering error chain");
                    context.set_failure(failure.clone());
                    for error_handler in &self.error_handlers {
                        match error_handler.handle(context) {
                            Outcome::Matched => {
                                context.clear_failure();
                                return Outcome::Matched;
                            }
                            Outcome::NotMatched => {}
                            Outcome::Failed(secondary) => {
                                context.clear_failure();
                                return Outcome::Failed(secondary);
                            }
                        }
                    }
                    context.clear_failure();
                    return Outcome::Failed(failure);
                }
            }
        }
        Outcome::NotMatched
    }

    /// Runs the handler chain inside a tracing span for the dispatch.
    ///
    /// This is the entry point an application calls after seeding a context
    /// with [`DispatchContext::from_request`].
    pub fn dispatch(&self, context: &mut DispatchContext<S>) -> Outcome {
        let span = logging::dispatch_span(context.method(), context.route().unwrap_or(""));
        let _guard = span.enter();
        self.run(context)
    }

    /// Seeds a context from a request and dispatches it in one call.
    ///
    /// The route is the request path with the configured base path stripped;
    /// a path outside the base path leaves the route unset, so the first
    /// route-reading handler raises into the error chain. Callers that need
    /// the context afterwards (captured parameters, recorded methods) seed
    /// it themselves with [`DispatchContext::from_request`] and call
    /// [`dispatch`](Router::dispatch).
    pub fn respond(
        &self,
        request: &impl RequestInfo,
        settings: &SiteSettings,
        state: S,
    ) -> Outcome {
        let mut context = DispatchContext::from_request(request, settings, state);
        self.dispatch(&mut context)
    }
}

impl<S: 'static> Handler<S> for Router<S> {
    fn handle(&self, context: &mut DispatchContext<S>) -> Outcome {
        self.run(context)
    }
}
