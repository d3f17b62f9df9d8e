//! Radix-tree request router.
//!
//! One tree per HTTP method, O(path-length) lookup. Static segments win over
//! parameters, so `/api/products/search` is never captured by
//! `/api/products/{id}`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use matchit::Router as MatchitRouter;
use tracing::info;

use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::middleware::Middleware;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// The application router, owning the state every handler receives.
///
/// Build it once at startup and pass it to [`Server::serve`](crate::Server::serve).
/// Each [`Router::on`] call returns `self` so registrations chain naturally.
pub struct Router<S> {
    state: Arc<S>,
    routes: HashMap<Method, MatchitRouter<BoxedHandler<S>>>,
    middleware: Vec<Box<dyn Middleware>>,
}

impl<S: Send + Sync + 'static> Router<S> {
    pub fn new(state: S) -> Self {
        Self { state: Arc::new(state), routes: HashMap::new(), middleware: Vec::new() }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves them.
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route or conflicts with one already
    /// registered for `method`. Routes are fixed at startup.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler<S>) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    /// Append a middleware layer.
    pub fn layer(mut self, middleware: impl Middleware) -> Self {
        self.middleware.push(Box::new(middleware));
        self
    }

    /// The shared state handlers receive.
    pub fn state(&self) -> &Arc<S> {
        &self.state
    }

    /// Runs one request through middleware, routing and the matched handler,
    /// and logs the outcome.
    pub async fn handle(&self, mut req: Request) -> Response {
        let started = Instant::now();
        let method = req.method();
        let path = req.path().to_owned();

        let early = self.middleware.iter().find_map(|m| m.before(&req));
        let mut response = match early {
            Some(res) => res,
            None => match self.lookup(method, &path) {
                Some((handler, params)) => {
                    req.set_params(params);
                    handler.call(Arc::clone(&self.state), req).await
                }
                None => Response::builder().status(Status::NotFound).text("Not Found"),
            },
        };

        for m in &self.middleware {
            m.after(&mut response);
        }

        info!(
            %method,
            %path,
            status = response.status_code(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "request"
        );
        response
    }

    pub(crate) fn lookup(
        &self,
        method: Method,
        path: &str,
    ) -> Option<(BoxedHandler<S>, HashMap<String, String>)> {
        let tree = self.routes.get(&method)?;
        // One trailing slash is optional: `/api/products/` routes like `/api/products`.
        let matched = tree.at(path).ok().or_else(|| {
            path.strip_suffix('/')
                .filter(|trimmed| !trimmed.is_empty())
                .and_then(|trimmed| tree.at(trimmed).ok())
        })?;
        let handler = Arc::clone(matched.value);
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((handler, params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn echo_id(_state: Arc<()>, req: Request) -> String {
        format!("id={}", req.param("id").unwrap_or("-"))
    }

    async fn fixed(_state: Arc<()>, _req: Request) -> &'static str {
        "static"
    }

    async fn count(state: Arc<u32>, _req: Request) -> String {
        state.to_string()
    }

    fn router() -> Router<()> {
        Router::new(())
            .on(Method::Get, "/items/{id}", echo_id)
            .on(Method::Get, "/items/search", fixed)
    }

    #[tokio::test]
    async fn extracts_path_params() {
        let res = router().handle(Request::new(Method::Get, "/items/42", "")).await;
        assert_eq!(res.body(), b"id=42");
    }

    #[tokio::test]
    async fn static_segment_beats_param() {
        let res = router().handle(Request::new(Method::Get, "/items/search?q=x", "")).await;
        assert_eq!(res.body(), b"static");
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let res = router().handle(Request::new(Method::Get, "/nope", "")).await;
        assert_eq!(res.status_code(), 404);
        let res = router().handle(Request::new(Method::Delete, "/items/1", "")).await;
        assert_eq!(res.status_code(), 404);
    }

    #[tokio::test]
    async fn trailing_slash_is_optional() {
        let res = router().handle(Request::new(Method::Get, "/items/42/", "")).await;
        assert_eq!(res.body(), b"id=42");
        let res = router().handle(Request::new(Method::Get, "/items/42//", "")).await;
        assert_eq!(res.status_code(), 404);
    }

    #[tokio::test]
    async fn handlers_receive_state() {
        let router = Router::new(7u32).on(Method::Get, "/", count);
        let res = router.handle(Request::new(Method::Get, "/", "")).await;
        assert_eq!(res.body(), b"7");
    }

    #[test]
    #[should_panic(expected = "invalid route")]
    fn conflicting_routes_panic() {
        let _ = Router::new(())
            .on(Method::Get, "/items/{id}", echo_id)
            .on(Method::Get, "/items/{name}", echo_id);
    }
}
