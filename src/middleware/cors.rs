//! Cross-origin resource sharing.

use crate::method::Method;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

use super::Middleware;

/// CORS headers for browser clients on other origins.
///
/// Every `OPTIONS` request is treated as a preflight and answered with
/// `204 No Content` without reaching a handler.
pub struct Cors {
    allow_origin: String,
    allow_methods: String,
}

impl Cors {
    /// Any origin, the usual CRUD verbs, and whatever headers the browser
    /// asks for.
    pub fn permissive() -> Self {
        let methods = [Method::Get, Method::Head, Method::Put, Method::Patch, Method::Post, Method::Delete];
        Self {
            allow_origin: "*".to_owned(),
            allow_methods: methods.map(Method::as_str).join(","),
        }
    }
}

impl Middleware for Cors {
    fn before(&self, req: &Request) -> Option<Response> {
        if req.method() != Method::Options {
            return None;
        }
        let mut res = Response::builder()
            .status(Status::NoContent)
            .header("access-control-allow-methods", &self.allow_methods)
            .no_body();
        if let Some(requested) = req.header("access-control-request-headers") {
            res.set_header("access-control-allow-headers", requested);
            res.set_header("vary", "Access-Control-Request-Headers");
        }
        Some(res)
    }

    fn after(&self, res: &mut Response) {
        res.set_header("access-control-allow-origin", &self.allow_origin);
    }
}
