//! Module trait for groups of related routes.
//!
//! Each resource of the service (records, cities, the bootstrap pages)
//! implements `Module` and registers its routes on the shared router.
//!
//! # Example
//!
//! ```ignore
//! use cadastro::{Module, Router};
//!
//! pub struct Health;
//!
//! impl Module for Health {
//!     fn name(&self) -> &'static str {
//!         "health"
//!     }
//!
//!     fn routes(&self, router: &mut Router) {
//!         router.get("/health", |_ctx| async move {
//!             cadastro::response::ok(&serde_json::json!({ "status": "ok" }))
//!         });
//!     }
//! }
//! ```

use crate::router::Router;

/// A group of routes registered together.
pub trait Module: Send + Sync {
    /// Module name for identification and logging.
    fn name(&self) -> &'static str;

    /// Register routes with the router.
    fn routes(&self, router: &mut Router);
}
