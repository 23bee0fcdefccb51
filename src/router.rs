//! HTTP routing with matchit.
//!
//! Provides a simple router for registering and dispatching HTTP handlers.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::Result;
use crate::config::SharedConfig;
use crate::response::HttpResponse;
use hyper::Method;

/// Boxed future for async handlers.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Handler context passed to route handlers.
pub struct Context {
    /// The request headers.
    pub headers: hyper::http::HeaderMap,
    /// Route parameters (e.g., {id} from path).
    pub params: HashMap<String, String>,
    /// The request body, pre-read as bytes.
    pub body: Bytes,
    /// Database handle.
    pub db: crate::db::Handle,
    /// Service configuration.
    pub config: SharedConfig,
}

impl Context {
    /// Parse the request body as JSON.
    ///
    /// The request must declare an `application/json` content type.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        let is_json = self
            .header("content-type")
            .and_then(|ct| ct.split(';').next())
            .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"));
        if !is_json {
            return Err(crate::Error::UnsupportedMediaType {
                expected: "application/json".to_string(),
            });
        }

        serde_json::from_slice(&self.body)
            .map_err(|e| crate::Error::BadRequest(format!("Invalid request body: {e}")))
    }

    /// Get a header value by name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Get a route parameter by name.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(|s| s.as_str())
    }

    /// Get a required route parameter, returning BadRequest if missing.
    pub fn require_param(&self, name: &str) -> Result<&str> {
        self.param(name)
            .ok_or_else(|| crate::Error::BadRequest(format!("Missing parameter: {name}")))
    }

    /// Get an integer route parameter. A value that is not an integer does
    /// not address any resource, so it is reported as `NotFound`.
    pub fn id_param(&self, name: &str) -> Result<i64> {
        parse_id(self.require_param(name)?).ok_or(crate::Error::NotFound)
    }
}

/// Parse a path id the way an unsigned integer route segment is matched:
/// ASCII digits only, no sign or whitespace.
fn parse_id(raw: &str) -> Option<i64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// Handler function type.
/// Takes a Context and returns a future resolving to a Response.
pub type Handler = Box<dyn Fn(Context) -> BoxFuture<'static, Result<HttpResponse>> + Send + Sync>;

/// A registered route with method-specific handlers.
struct RouteEntry {
    handlers: HashMap<Method, Handler>,
}

/// HTTP router for registering and dispatching requests.
pub struct Router {
    routes: matchit::Router<usize>,
    entries: Vec<RouteEntry>,
}

impl Router {
    /// Create a new router.
    pub fn new() -> Self {
        Self {
            routes: matchit::Router::new(),
            entries: Vec::new(),
        }
    }

    /// Register a handler for a method and path.
    ///
    /// # Example
    /// ```ignore
    /// router.route(Method::GET, "/dados", |ctx| async move {
    ///     response::ok(&records::list(&ctx.db).await?)
    /// });
    /// ```
    pub fn route<F, Fut>(&mut self, method: Method, path: &str, handler: F)
    where
        F: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<HttpResponse>> + Send + 'static,
    {
        // Find or create route entry for this path
        let entry_idx = match self.routes.at(path) {
            Ok(matched) => *matched.value,
            Err(_) => {
                let idx = self.entries.len();
                self.entries.push(RouteEntry {
                    handlers: HashMap::new(),
                });
                self.routes.insert(path, idx).ok();
                idx
            }
        };

        // Add handler for this method
        let boxed: Handler = Box::new(move |ctx| Box::pin(handler(ctx)));
        self.entries[entry_idx].handlers.insert(method, boxed);
    }

    /// Convenience method for GET requests.
    pub fn get<F, Fut>(&mut self, path: &str, handler: F)
    where
        F: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<HttpResponse>> + Send + 'static,
    {
        self.route(Method::GET, path, handler);
    }

    /// Convenience method for POST requests.
    pub fn post<F, Fut>(&mut self, path: &str, handler: F)
    where
        F: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<HttpResponse>> + Send + 'static,
    {
        self.route(Method::POST, path, handler);
    }

    /// Convenience method for PUT requests.
    pub fn put<F, Fut>(&mut self, path: &str, handler: F)
    where
        F: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<HttpResponse>> + Send + 'static,
    {
        self.route(Method::PUT, path, handler);
    }

    /// Convenience method for DELETE requests.
    pub fn delete<F, Fut>(&mut self, path: &str, handler: F)
    where
        F: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<HttpResponse>> + Send + 'static,
    {
        self.route(Method::DELETE, path, handler);
    }

    /// Register every route of a module.
    pub fn mount<M: crate::Module + ?Sized>(&mut self, module: &M) {
        tracing::debug!("Mounting module {}", module.name());
        module.routes(self);
    }

    /// Convert to a thread-safe handle for use in request handling.
    pub fn into_handle(self) -> Arc<RouterHandle> {
        Arc::new(RouterHandle {
            routes: self.routes,
            entries: self.entries,
        })
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

/// Thread-safe router handle for use in request handling.
pub struct RouterHandle {
    routes: matchit::Router<usize>,
    entries: Vec<RouteEntry>,
}

/// Result of matching a request to a route.
pub enum RouteMatch<'a> {
    /// Route matched with handler.
    Matched {
        handler: &'a Handler,
        params: HashMap<String, String>,
    },
    /// Path matched but method not allowed.
    MethodNotAllowed,
    /// Path not found.
    NotFound,
}

impl RouterHandle {
    /// Match a request to a route.
    pub fn match_route(&self, method: &Method, path: &str) -> RouteMatch<'_> {
        match self.routes.at(path) {
            Ok(matched) => {
                let entry = &self.entries[*matched.value];

                // Convert params to owned HashMap
                let params: HashMap<String, String> = matched
                    .params
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect();

                match entry.handlers.get(method) {
                    Some(handler) => RouteMatch::Matched { handler, params },
                    None => RouteMatch::MethodNotAllowed,
                }
            }
            Err(_) => RouteMatch::NotFound,
        }
    }
}
