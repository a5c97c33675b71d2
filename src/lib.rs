//! servkit — embeddable HTTP response delivery and request routing.
//!
//! Two subsystems carry the interesting logic:
//!
//! - the range-aware transfer engine ([`response::transfer`]): copies a
//!   body source (buffer, stream, or file) into a response sink in fixed
//!   chunks, honoring a resolved byte window or a gzip filter, and closes
//!   the sink exactly once on every exit path;
//! - the segment-based route matcher ([`routing`]): compiles patterns with
//!   `:name` wildcard segments at registration time and dispatches
//!   first-match-wins in registration order.
//!
//! Around them sit the response assembler ([`response::Responder`], one
//! entry point per body flavor), the serializer and page-renderer plugin
//! seams, and a thin tokio/hyper server shell ([`server::App`]).

pub mod config;
pub mod error;
pub mod http;
pub mod logger;
pub mod response;
pub mod routing;
pub mod server;

pub use config::Config;
pub use error::EmitError;
pub use response::{Plugins, Responder, ResponseBody};
pub use routing::{RouteParams, RouteTable};
pub use server::{App, RequestContext};
