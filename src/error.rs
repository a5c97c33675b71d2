//! Error types for the response emission surface.

use thiserror::Error;

/// Failure raised while assembling or emitting a response.
///
/// Transfer-phase I/O failures inside a detached emission task are handled
/// by the task itself (logged, or forwarded into the body stream in strict
/// mode) and never reach this type; `EmitError` covers everything that can
/// go wrong before the body starts flowing.
#[derive(Debug, Error)]
pub enum EmitError {
    /// Opening or inspecting a body source failed.
    #[error("i/o failure while preparing response: {0}")]
    Io(#[from] std::io::Error),

    /// The serializer capability rejected the value.
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The page renderer capability failed.
    #[error("page rendering failed: {0}")]
    Render(String),

    /// Header-set construction was rejected by the HTTP layer.
    #[error("invalid response header: {0}")]
    Header(#[from] hyper::http::Error),
}
