//! The mutable record threaded through one request's handler chain.
//!
//! A [`DispatchContext`] is created per request, owned exclusively by one
//! in-flight dispatch, and discarded afterwards. It is a fixed record: no
//! fields are added at runtime, and everything a handler may touch is an
//! explicit, optional field.

use std::fmt;
use std::sync::Arc;

use switchback_core::{RouterError, SiteSettings};

use crate::action::ActionRegistry;

/// An insertion-ordered mapping of captured parameter names to values.
///
/// Iteration order is first-capture order across nested scopes; overwriting
/// an existing key keeps its original position.
///
/// # Examples
///
/// ```
/// use switchback_router::Params;
///
/// let mut params = Params::new();
/// params.insert("year", "2024");
/// params.insert("slug", "hello");
/// params.insert("year", "2025");
///
/// assert_eq!(params.get("year"), Some("2025"));
/// let names: Vec<_> = params.names().collect();
/// assert_eq!(names, ["year", "slug"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: Vec<(String, String)>,
}

impl Params {
    /// Creates an empty parameter map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value captured under `name`, if any.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Inserts a capture, overwriting the value of an existing key in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = value;
        } else {
            self.entries.push((name, value));
        }
    }

    /// Merges another map into this one; keys from `other` win on collision.
    pub fn merge(&mut self, other: Self) {
        for (name, value) in other.entries {
            self.insert(name, value);
        }
    }

    /// Iterates over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Iterates over names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// Returns the number of captured parameters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no parameters have been captured.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Read-only view of the request being dispatched.
///
/// The engine reads `method` and `path` exactly once per dispatch, when the
/// context is seeded. Implement this for whatever request abstraction the
/// surrounding application uses.
pub trait RequestInfo {
    /// The HTTP method of the request (`GET`, `POST`, ...).
    fn method(&self) -> &str;
    /// The absolute request path.
    fn path(&self) -> &str;
}

/// The mutable state of one in-flight dispatch.
///
/// `S` is an opaque caller payload, typically a bundle of the request,
/// response, and application state the actions operate on.
pub struct DispatchContext<S> {
    method: String,
    route: Option<String>,
    parameters: Option<Params>,
    available_methods: Vec<String>,
    namespace: Option<String>,
    failure: Option<RouterError>,
    actions: Arc<ActionRegistry<S>>,
    state: S,
}

impl<S> fmt::Debug for DispatchContext<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchContext")
            .field("method", &self.method)
            .field("route", &self.route)
            .field("parameters", &self.parameters)
            .field("available_methods", &self.available_methods)
            .field("namespace", &self.namespace)
            .field("failure", &self.failure)
            .finish_non_exhaustive()
    }
}

impl<S> DispatchContext<S> {
    /// Creates a context with an already-relative route.
    pub fn new(method: impl Into<String>, route: impl Into<String>, state: S) -> Self {
        Self {
            method: method.into(),
            route: Some(route.into()),
            parameters: None,
            available_methods: Vec::new(),
            namespace: None,
            failure: None,
            actions: Arc::new(ActionRegistry::default()),
            state,
        }
    }

    /// Seeds a context from a request, stripping the configured base path.
    ///
    /// The request's method and path are read exactly once, here. When the
    /// base path is not a prefix of the request path the route field stays
    /// unset, so the first route-reading handler raises
    /// [`RouterError::MissingContextField`] into the error chain.
    pub fn from_request(request: &impl RequestInfo, settings: &SiteSettings, state: S) -> Self {
        Self {
            method: request.method().to_string(),
            route: settings.strip_path(request.path()),
            parameters: None,
            available_methods: Vec::new(),
            namespace: None,
            failure: None,
            actions: Arc::new(ActionRegistry::default()),
            state,
        }
    }

    /// Attaches an action registry for resolving named callbacks.
    #[must_use]
    pub fn with_actions(mut self, actions: Arc<ActionRegistry<S>>) -> Self {
        self.actions = actions;
        self
    }

    /// The request method, as the request reported it.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The remaining route, relative to the router currently dispatching.
    pub fn route(&self) -> Option<&str> {
        self.route.as_deref()
    }

    /// The parameters captured so far, if any capture has happened.
    pub fn parameters(&self) -> Option<&Params> {
        self.parameters.as_ref()
    }

    /// Looks up a single captured parameter.
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters.as_ref().and_then(|p| p.get(name))
    }

    /// Methods that would have matched the path so far, in registration
    /// order. Populated only when a path matched but its method did not.
    pub fn available_methods(&self) -> &[String] {
        &self.available_methods
    }

    /// The current callback namespace, normalized.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// The failure being offered to the error-handler chain, if one is
    /// running.
    pub fn failure(&self) -> Option<&RouterError> {
        self.failure.as_ref()
    }

    /// Borrows the caller payload.
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Mutably borrows the caller payload.
    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }

    /// Consumes the context, returning the caller payload.
    pub fn into_state(self) -> S {
        self.state
    }

    pub(crate) fn actions(&self) -> &Arc<ActionRegistry<S>> {
        &self.actions
    }

    /// Swaps the route field, returning the previous value. Mounts use this
    /// to trim the route on entry and restore it on exit.
    pub(crate) fn replace_route(&mut self, route: Option<String>) -> Option<String> {
        std::mem::replace(&mut self.route, route)
    }

    /// Merges captures into the context; the new captures win on collision.
    pub(crate) fn merge_parameters(&mut self, captured: Params) {
        match &mut self.parameters {
            Some(existing) => existing.merge(captured),
            None => self.parameters = Some(captured),
        }
    }

    /// Clones the parameter field, including its absence, for rollback.
    pub(crate) fn save_parameters(&self) -> Option<Params> {
        self.parameters.clone()
    }

    /// Restores a previously saved parameter field.
    pub(crate) fn restore_parameters(&mut self, saved: Option<Params>) {
        self.parameters = saved;
    }

    pub(crate) fn record_available_method(&mut self, method: &str) {
        if !self.available_methods.iter().any(|m| m == method) {
            self.available_methods.push(method.to_string());
        }
    }

    pub(crate) fn set_namespace(&mut self, namespace: String) {
        self.namespace = Some(namespace);
    }

    pub(crate) fn set_failure(&mut self, failure: RouterError) {
        self.failure = Some(failure);
    }

    pub(crate) fn clear_failure(&mut self) {
        self.failure = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_insertion_order() {
        let mut params = Params::new();
        params.insert("a", "1");
        params.insert("b", "2");
        params.insert("c", "3");
        let pairs: Vec<_> = params.iter().collect();
        assert_eq!(pairs, [("a", "1"), ("b", "2"), ("c", "3")]);
    }

    #[test]
    fn test_params_overwrite_keeps_position() {
        let mut params = Params::new();
        params.insert("a", "1");
        params.insert("b", "2");
        params.insert("a", "9");
        let pairs: Vec<_> = params.iter().collect();
        assert_eq!(pairs, [("a", "9"), ("b", "2")]);
    }

    #[test]
    fn test_params_merge_inner_wins() {
        let mut outer = Params::new();
        outer.insert("x", "outer");
        outer.insert("y", "kept");
        let mut inner = Params::new();
        inner.insert("x", "inner");
        outer.merge(inner);
        assert_eq!(outer.get("x"), Some("inner"));
        assert_eq!(outer.get("y"), Some("kept"));
        assert_eq!(outer.len(), 2);
    }

    #[test]
    fn test_context_seeding() {
        let ctx = DispatchContext::new("GET", "/users/7", ());
        assert_eq!(ctx.method(), "GET");
        assert_eq!(ctx.route(), Some("/users/7"));
        assert!(ctx.parameters().is_none());
        assert!(ctx.available_methods().is_empty());
        assert!(ctx.namespace().is_none());
        assert!(ctx.failure().is_none());
    }

    #[test]
    fn test_from_request_strips_base_path() {
        struct Req;
        impl RequestInfo for Req {
            fn method(&self) -> &str {
                "GET"
            }
            fn path(&self) -> &str {
                "/app/users/7"
            }
        }

        let settings = SiteSettings {
            path: "app".to_string(),
            ..SiteSettings::default()
        };
        let ctx = DispatchContext::from_request(&Req, &settings, ());
        assert_eq!(ctx.route(), Some("users/7"));

        let settings = SiteSettings {
            path: "other".to_string(),
            ..SiteSettings::default()
        };
        let ctx = DispatchContext::from_request(&Req, &settings, ());
        assert_eq!(ctx.route(), None);
    }

    #[test]
    fn test_record_available_method_deduplicates() {
        let mut ctx = DispatchContext::new("PUT", "/items", ());
        ctx.record_available_method("GET");
        ctx.record_available_method("POST");
        ctx.record_available_method("GET");
        assert_eq!(ctx.available_methods(), ["GET", "POST"]);
    }
}
