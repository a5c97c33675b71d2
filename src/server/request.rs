//! Inbound request wrapper
//!
//! What a handler sees: method, path, headers, extracted route parameters,
//! and the request body stream.

use crate::error::EmitError;
use crate::http::range::{parse_range_header, RangeSpec};
use crate::routing::RouteParams;
use http_body_util::BodyExt;
use hyper::body::{Bytes, Incoming};
use hyper::http::HeaderMap;
use hyper::{Method, Request, Uri};
use std::io;

/// Per-request context handed to route handlers. Exclusively owned by the
/// handling task.
pub struct RequestContext {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    params: RouteParams,
    body: Incoming,
}

impl RequestContext {
    pub(crate) fn new(request: Request<Incoming>, params: RouteParams) -> Self {
        let (parts, body) = request.into_parts();
        Self {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            params,
            body,
        }
    }

    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.uri.query()
    }

    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Header value as a string, if present and valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    #[must_use]
    pub const fn params(&self) -> &RouteParams {
        &self.params
    }

    /// Value of a named route parameter.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    /// The request's byte range, when a well-formed `Range` header is
    /// present.
    #[must_use]
    pub fn range(&self) -> Option<RangeSpec> {
        parse_range_header(self.header("range"))
    }

    /// Collect the request body into memory.
    pub async fn read_body(self) -> Result<Bytes, EmitError> {
        let collected = self
            .body
            .collect()
            .await
            .map_err(|e| EmitError::Io(io::Error::other(e)))?;
        Ok(collected.to_bytes())
    }
}
