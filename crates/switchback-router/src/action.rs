//! Actions, named-action resolution, and the action registry.
//!
//! A [`Callback`] is what a handler fires when it matches. It is a tagged
//! value: either a [`Callback::Direct`] invocable, or a [`Callback::Named`]
//! lookup token resolved at dispatch time through the context's
//! [`ActionRegistry`], prefixed with the context's current namespace when one
//! is set.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use switchback_core::{RouterError, RouterResult};

use crate::context::DispatchContext;

/// An opaque invocable fired when a handler matches.
///
/// The return value of a successful action is ignored; a failure enters the
/// error-handler chain of the router level that observed it.
pub type Action<S> = Arc<dyn Fn(&mut DispatchContext<S>) -> RouterResult<()> + Send + Sync>;

/// Wraps a closure as a [`Callback::Direct`].
///
/// # Examples
///
/// ```
/// use switchback_router::{act, DispatchContext, Router};
///
/// let mut router: Router<Vec<String>> = Router::new();
/// router.not_found(act(|ctx: &mut DispatchContext<Vec<String>>| {
///     ctx.state_mut().push("not found".to_string());
///     Ok(())
/// }));
/// ```
pub fn act<S, F>(f: F) -> Callback<S>
where
    F: Fn(&mut DispatchContext<S>) -> RouterResult<()> + Send + Sync + 'static,
{
    Callback::Direct(Arc::new(f))
}

/// A direct invocable or a named lookup token.
pub enum Callback<S> {
    /// An action invoked as-is.
    Direct(Action<S>),
    /// A name resolved through the context's action registry at dispatch
    /// time, prefixed with the current namespace if one is set.
    Named(String),
}

impl<S> Clone for Callback<S> {
    fn clone(&self) -> Self {
        match self {
            Self::Direct(action) => Self::Direct(Arc::clone(action)),
            Self::Named(name) => Self::Named(name.clone()),
        }
    }
}

impl<S> fmt::Debug for Callback<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct(_) => f.write_str("Callback::Direct(..)"),
            Self::Named(name) => f.debug_tuple("Callback::Named").field(name).finish(),
        }
    }
}

impl<S> Callback<S> {
    /// Invokes the action, resolving a named token first.
    pub(crate) fn invoke(&self, context: &mut DispatchContext<S>) -> RouterResult<()> {
        match self {
            Self::Direct(action) => action(context),
            Self::Named(name) => {
                let qualified = match context.namespace() {
                    Some(namespace) => format!("{namespace}{name}"),
                    None => name.clone(),
                };
                let action = context
                    .actions()
                    .get(&qualified)
                    .map(Arc::clone)
                    .ok_or(RouterError::UnknownAction(qualified))?;
                action(context)
            }
        }
    }
}

/// Conversion into a [`Callback`], implemented for callbacks themselves and
/// for string names. Closures go through [`act`].
pub trait IntoCallback<S> {
    /// Performs the conversion.
    fn into_callback(self) -> Callback<S>;
}

impl<S> IntoCallback<S> for Callback<S> {
    fn into_callback(self) -> Callback<S> {
        self
    }
}

impl<S> IntoCallback<S> for &str {
    fn into_callback(self) -> Callback<S> {
        Callback::Named(self.to_string())
    }
}

impl<S> IntoCallback<S> for String {
    fn into_callback(self) -> Callback<S> {
        Callback::Named(self)
    }
}

/// Normalizes a namespace value so that it is always wrapped with the `:`
/// separator: `admin` becomes `:admin:`, the empty string becomes `:`.
pub fn normalize_namespace(value: &str) -> String {
    let trimmed = value.trim_matches(':');
    if trimmed.is_empty() {
        ":".to_string()
    } else {
        format!(":{trimmed}:")
    }
}

/// A caller-supplied table resolving action names to invocables.
///
/// # Examples
///
/// ```
/// use switchback_router::ActionRegistry;
///
/// let mut registry: ActionRegistry<()> = ActionRegistry::new();
/// registry.register("index", |_ctx| Ok(()));
/// registry.register_in("admin", "index", |_ctx| Ok(()));
///
/// assert!(registry.get("index").is_some());
/// assert!(registry.get(":admin:index").is_some());
/// ```
pub struct ActionRegistry<S> {
    actions: HashMap<String, Action<S>>,
}

impl<S> Default for ActionRegistry<S> {
    fn default() -> Self {
        Self {
            actions: HashMap::new(),
        }
    }
}

impl<S> fmt::Debug for ActionRegistry<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("names", &self.actions.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<S> ActionRegistry<S> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an action under a bare name.
    pub fn register<F>(&mut self, name: impl Into<String>, action: F) -> &mut Self
    where
        F: Fn(&mut DispatchContext<S>) -> RouterResult<()> + Send + Sync + 'static,
    {
        self.actions.insert(name.into(), Arc::new(action));
        self
    }

    /// Registers an action under a namespace-qualified name, using the same
    /// normalization a [`SetNamespace`](crate::handlers::SetNamespace)
    /// handler applies.
    pub fn register_in<F>(&mut self, namespace: &str, name: &str, action: F) -> &mut Self
    where
        F: Fn(&mut DispatchContext<S>) -> RouterResult<()> + Send + Sync + 'static,
    {
        let qualified = format!("{}{name}", normalize_namespace(namespace));
        self.actions.insert(qualified, Arc::new(action));
        self
    }

    /// Looks up an action by its (possibly qualified) name.
    pub fn get(&self, name: &str) -> Option<&Action<S>> {
        self.actions.get(name)
    }

    /// Returns the number of registered actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns `true` when no actions are registered.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
