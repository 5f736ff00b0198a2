//! # switchback
//!
//! A mountable request-routing engine. Given a request path and method,
//! switchback walks an ordered chain of handlers, extracts named parameters
//! through a small pattern language, nests whole routers at path prefixes,
//! and recovers from handler failures through a secondary error-handler
//! chain.
//!
//! This crate re-exports the public API of the workspace:
//!
//! - [`switchback_router`] — pattern compiler, handlers, dispatch engine
//! - [`switchback_core`] — errors, site settings, logging setup
//!
//! # Examples
//!
//! ```
//! use switchback::{act, DispatchContext, Outcome, Router};
//!
//! let mut router: Router<Vec<String>> = Router::new();
//! router
//!     .get("/hello/:name", act(|ctx: &mut DispatchContext<Vec<String>>| {
//!         let name = ctx.parameter("name").unwrap_or("world").to_string();
//!         ctx.state_mut().push(format!("hello {name}"));
//!         Ok(())
//!     }))
//!     .unwrap();
//!
//! let mut ctx = DispatchContext::new("GET", "/hello/ada", Vec::new());
//! assert_eq!(router.run(&mut ctx), Outcome::Matched);
//! assert_eq!(ctx.state(), &["hello ada"]);
//! ```

pub use switchback_core::{
    logging, settings, PatternError, RouterError, RouterResult, SiteSettings,
};
pub use switchback_router::{
    act, Action, ActionRegistry, Callback, DispatchContext, Handler, IntoCallback, Outcome,
    Params, RequestInfo, RoutePattern, Router,
};
