//! Server shell module
//!
//! Route registration, request dispatch, and the connection accept loop.
//! Handlers receive a [`RequestContext`] and a [`Responder`] and return the
//! assembled response; dispatch applies the strict/lenient error policy
//! around them.

mod listener;
mod request;

pub use request::RequestContext;

use crate::config::Config;
use crate::error::EmitError;
use crate::http::status;
use crate::logger;
use crate::response::{EmitterSettings, Plugins, Responder, ResponseBody};
use crate::routing::{split_segments, RouteTable};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response};
use hyper_util::rt::TokioIo;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Boxed future returned by route handlers.
pub type HandlerFuture =
    Pin<Box<dyn Future<Output = Result<Response<ResponseBody>, EmitError>> + Send>>;

/// A registered route handler.
pub type Handler = Box<dyn Fn(RequestContext, Responder) -> HandlerFuture + Send + Sync>;

fn boxed<F, Fut>(handler: F) -> Handler
where
    F: Fn(RequestContext, Responder) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response<ResponseBody>, EmitError>> + Send + 'static,
{
    Box::new(move |ctx, res| Box::pin(handler(ctx, res)))
}

/// Route tables partitioned by method. Built during registration, read-only
/// while serving.
#[derive(Default)]
struct RouteSet {
    get: RouteTable<Handler>,
    post: RouteTable<Handler>,
    put: RouteTable<Handler>,
    delete: RouteTable<Handler>,
}

impl RouteSet {
    fn for_method(&self, method: &Method) -> Option<&RouteTable<Handler>> {
        match *method {
            Method::GET => Some(&self.get),
            Method::POST => Some(&self.post),
            Method::PUT => Some(&self.put),
            Method::DELETE => Some(&self.delete),
            _ => None,
        }
    }
}

/// The embeddable server: configuration, plugins, and per-method route
/// tables.
pub struct App {
    config: Config,
    plugins: Arc<Plugins>,
    routes: RouteSet,
}

impl App {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self::with_plugins(config, Plugins::default())
    }

    /// Build with caller-supplied serializer/renderer capabilities.
    #[must_use]
    pub fn with_plugins(config: Config, plugins: Plugins) -> Self {
        Self {
            config,
            plugins: Arc::new(plugins),
            routes: RouteSet::default(),
        }
    }

    pub fn get<F, Fut>(&mut self, pattern: &str, handler: F) -> &mut Self
    where
        F: Fn(RequestContext, Responder) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response<ResponseBody>, EmitError>> + Send + 'static,
    {
        self.routes.get.register(pattern, boxed(handler));
        self
    }

    pub fn post<F, Fut>(&mut self, pattern: &str, handler: F) -> &mut Self
    where
        F: Fn(RequestContext, Responder) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response<ResponseBody>, EmitError>> + Send + 'static,
    {
        self.routes.post.register(pattern, boxed(handler));
        self
    }

    pub fn put<F, Fut>(&mut self, pattern: &str, handler: F) -> &mut Self
    where
        F: Fn(RequestContext, Responder) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response<ResponseBody>, EmitError>> + Send + 'static,
    {
        self.routes.put.register(pattern, boxed(handler));
        self
    }

    pub fn delete<F, Fut>(&mut self, pattern: &str, handler: F) -> &mut Self
    where
        F: Fn(RequestContext, Responder) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response<ResponseBody>, EmitError>> + Send + 'static,
    {
        self.routes.delete.register(pattern, boxed(handler));
        self
    }

    /// Bind the configured address and serve until the process exits.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr = self.config.socket_addr()?;
        let listener = listener::bind(addr, self.config.server.backlog)?;
        logger::log_server_start(&addr);
        self.serve(listener).await
    }

    /// Serve connections from an already-bound listener.
    pub async fn serve(
        self,
        listener: TcpListener,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let shared = Arc::new(Shared {
            settings: Arc::new(EmitterSettings::from_config(&self.config.http)),
            access_log: self.config.logging.access_log,
            plugins: self.plugins,
            routes: self.routes,
        });

        loop {
            match listener.accept().await {
                Ok((stream, peer_addr)) => {
                    if shared.access_log {
                        logger::log_connection_accepted(&peer_addr);
                    }
                    let shared = Arc::clone(&shared);
                    tokio::spawn(async move {
                        let io = TokioIo::new(stream);
                        let service = service_fn(move |req| {
                            let shared = Arc::clone(&shared);
                            async move { dispatch(req, shared).await }
                        });
                        if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                            logger::log_error(&format!("Failed to serve connection: {e:?}"));
                        }
                    });
                }
                Err(e) => {
                    logger::log_error(&format!("Failed to accept connection: {e}"));
                }
            }
        }
    }
}

/// Read-only state shared by every connection task.
struct Shared {
    routes: RouteSet,
    plugins: Arc<Plugins>,
    settings: Arc<EmitterSettings>,
    access_log: bool,
}

/// Match the request against the route tables and run the winning handler,
/// applying the strict/lenient policy to its outcome.
async fn dispatch(
    req: Request<Incoming>,
    shared: Arc<Shared>,
) -> Result<Response<ResponseBody>, EmitError> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    if shared.access_log {
        logger::log_request(&method, &path);
    }

    let Some(table) = shared.routes.for_method(&method) else {
        logger::log_warning(&format!("Method not allowed: {method}"));
        return Ok(status::build_405_response());
    };

    let segments = split_segments(&path);
    let Some(found) = table.lookup(&segments) else {
        return Ok(status::build_404_response());
    };

    let responder = Responder::from_parts(
        Arc::clone(&shared.settings),
        Arc::clone(&shared.plugins),
    );
    let ctx = RequestContext::new(req, found.params);

    match found.route.handler()(ctx, responder).await {
        Ok(response) => {
            if shared.access_log {
                let body_bytes = response
                    .headers()
                    .get("Content-Length")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(0);
                logger::log_response(response.status().as_u16(), body_bytes);
            }
            Ok(response)
        }
        Err(e) if shared.settings.strict => Err(e),
        Err(e) => {
            logger::log_error(&format!("Handler failed for {method} {path}: {e}"));
            Ok(status::build_500_response())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::StatusCode;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    fn test_app() -> App {
        let mut app = App::new(Config::default());
        app.get("/hello", |_ctx, res| async move {
            res.send_text("hello there", "text/plain", StatusCode::OK)
        });
        app.get("/users/:id", |ctx, res| async move {
            let id = ctx.param("id").unwrap_or_default().to_string();
            res.send_text(id, "text/plain", StatusCode::OK)
        });
        app.post("/echo", |ctx, res| async move {
            let body = ctx.read_body().await?;
            res.send_bytes(body, Some("application/octet-stream"), None, StatusCode::OK)
        });
        app
    }

    async fn roundtrip(request: &str) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(test_app().serve(listener));

        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut response = Vec::new();
        stream.read_to_end(&mut response).await.unwrap();
        String::from_utf8_lossy(&response).into_owned()
    }

    #[tokio::test]
    async fn test_serves_matched_route() {
        let response =
            roundtrip("GET /hello HTTP/1.1\r\nHost: test\r\nConnection: close\r\n\r\n").await;
        assert!(response.starts_with("HTTP/1.1 200 OK"));
        assert!(response.ends_with("hello there"));
    }

    #[tokio::test]
    async fn test_extracts_route_param() {
        let response =
            roundtrip("GET /users/42 HTTP/1.1\r\nHost: test\r\nConnection: close\r\n\r\n").await;
        assert!(response.starts_with("HTTP/1.1 200 OK"));
        assert!(response.ends_with("42"));
    }

    #[tokio::test]
    async fn test_unknown_path_is_404() {
        let response =
            roundtrip("GET /nowhere HTTP/1.1\r\nHost: test\r\nConnection: close\r\n\r\n").await;
        assert!(response.starts_with("HTTP/1.1 404"));
    }

    #[tokio::test]
    async fn test_unsupported_method_is_405() {
        let response =
            roundtrip("PATCH /hello HTTP/1.1\r\nHost: test\r\nConnection: close\r\n\r\n").await;
        assert!(response.starts_with("HTTP/1.1 405"));
    }

    #[tokio::test]
    async fn test_echo_posts_body_back() {
        let response = roundtrip(
            "POST /echo HTTP/1.1\r\nHost: test\r\nContent-Length: 9\r\nConnection: close\r\n\r\npayload-x",
        )
        .await;
        assert!(response.starts_with("HTTP/1.1 200 OK"));
        assert!(response.ends_with("payload-x"));
    }
}
