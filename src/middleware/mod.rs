//! Middleware layer.
//!
//! Middleware sees every request before routing and every response on the
//! way out, including 404s and responses it produced itself. Register with
//! [`Router::layer`](crate::Router::layer); layers run in registration order.

mod cors;

pub use cors::Cors;

use crate::request::Request;
use crate::response::Response;

/// A cross-cutting request/response hook.
pub trait Middleware: Send + Sync + 'static {
    /// Runs before routing. Returning a response skips the router entirely.
    fn before(&self, _req: &Request) -> Option<Response> {
        None
    }

    /// Runs on every outgoing response.
    fn after(&self, _res: &mut Response) {}
}
