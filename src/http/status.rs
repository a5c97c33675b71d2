//! Canned status responses
//!
//! Fixed responses for dispatch failures. Builder errors here are next to
//! impossible; when one happens it is logged and a bare response goes out
//! instead.

use crate::logger;
use crate::response::body::{self, ResponseBody};
use hyper::body::Bytes;
use hyper::Response;

/// Build 404 Not Found response
#[must_use]
pub fn build_404_response() -> Response<ResponseBody> {
    Response::builder()
        .status(404)
        .header("Content-Type", "text/plain")
        .body(body::full(Bytes::from("404 Not Found")))
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            Response::new(body::full(Bytes::from("404 Not Found")))
        })
}

/// Build 405 Method Not Allowed response
#[must_use]
pub fn build_405_response() -> Response<ResponseBody> {
    Response::builder()
        .status(405)
        .header("Content-Type", "text/plain")
        .header("Allow", "GET, POST, PUT, DELETE")
        .body(body::full(Bytes::from("405 Method Not Allowed")))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(body::full(Bytes::from("405 Method Not Allowed")))
        })
}

/// Build 500 Internal Server Error response
#[must_use]
pub fn build_500_response() -> Response<ResponseBody> {
    Response::builder()
        .status(500)
        .header("Content-Type", "text/plain")
        .body(body::full(Bytes::from("500 Internal Server Error")))
        .unwrap_or_else(|e| {
            log_build_error("500", &e);
            Response::new(body::full(Bytes::from("500 Internal Server Error")))
        })
}

fn log_build_error(status: &str, error: &hyper::http::Error) {
    logger::log_error(&format!("Failed to build {status} response: {error}"));
}
