//! # switchback-router
//!
//! The routing engine: a pattern compiler, a set of handler variants, and a
//! dispatch state machine with precise rollback semantics for nested mounts.
//!
//! ## Modules
//!
//! - [`pattern`]: route-pattern compilation (`:name`, `*name`, `(...)`)
//! - [`context`]: the per-dispatch mutable record
//! - [`action`]: direct and named callbacks, plus the action registry
//! - [`handlers`]: handler variants (`Always`, `Tap`, `Condition`, `Route`,
//!   `Endpoint`, `BadMethod`, `SetNamespace`, `Mount`)
//! - [`router`]: the dispatch engine and registration shortcuts
//!
//! # Examples
//!
//! ```
//! use switchback_router::{act, DispatchContext, Router};
//!
//! let mut api: Router<Vec<String>> = Router::new();
//! api.get("/posts/:id", act(|ctx: &mut DispatchContext<Vec<String>>| {
//!     let id = ctx.parameter("id").unwrap_or_default().to_string();
//!     ctx.state_mut().push(format!("post {id}"));
//!     Ok(())
//! }))
//! .unwrap();
//!
//! let mut app: Router<Vec<String>> = Router::new();
//! app.mount("/api", api).unwrap();
//! app.not_found(act(|ctx: &mut DispatchContext<Vec<String>>| {
//!     ctx.state_mut().push("404".to_string());
//!     Ok(())
//! }));
//!
//! let mut ctx = DispatchContext::new("GET", "/api/posts/7", Vec::new());
//! assert!(app.run(&mut ctx).is_matched());
//! assert_eq!(ctx.state(), &["post 7"]);
//! ```

pub mod action;
pub mod context;
pub mod handlers;
pub mod pattern;
pub mod router;

// Re-export the public surface at the crate root.
pub use action::{act, Action, ActionRegistry, Callback, IntoCallback};
pub use context::{DispatchContext, Params, RequestInfo};
pub use handlers::{Handler, Outcome};
pub use pattern::RoutePattern;
pub use router::Router;

// The error types live in switchback-core; re-export them for convenience.
pub use switchback_core::{PatternError, RouterError, RouterResult};
