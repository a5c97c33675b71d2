//! Response assembly module
//!
//! One entry point per body flavor — text, bytes, ranged bytes, stream,
//! file, ranged file, download, rendered page, serialized object, redirect.
//! Each builds the header set and hands body emission to the transfer
//! engine on a detached task.

pub mod body;
pub mod render;
pub mod serialize;
pub mod transfer;

pub use body::ResponseBody;
pub use render::{PageRenderer, RenderParams, TagRenderer};
pub use serialize::{JsonSerializer, Serializer};
pub use transfer::{BodyFilter, BodySource, TransferSink, DEFAULT_CHUNK_SIZE};

use crate::config::HttpConfig;
use crate::error::EmitError;
use crate::http::mime;
use crate::http::range::{self, ByteWindow, RangeSpec};
use hyper::body::Bytes;
use hyper::http::response::Builder;
use hyper::{Response, StatusCode};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::AsyncRead;

const OCTET_STREAM: &str = "application/octet-stream";

/// Outbound capabilities, resolved once at startup.
pub struct Plugins {
    pub serializer: Arc<dyn Serializer>,
    pub renderer: Arc<dyn PageRenderer>,
}

impl Default for Plugins {
    fn default() -> Self {
        Self {
            serializer: Arc::new(JsonSerializer),
            renderer: Arc::new(TagRenderer),
        }
    }
}

/// Emission settings derived from configuration, shared across requests.
pub(crate) struct EmitterSettings {
    pub strict: bool,
    pub chunk_size: usize,
    pub server_header: Option<String>,
}

impl EmitterSettings {
    pub fn from_config(http: &HttpConfig) -> Self {
        Self {
            strict: http.strict_errors,
            chunk_size: http.chunk_size,
            server_header: http
                .server_header
                .then(|| format!("servkit/{}", env!("CARGO_PKG_VERSION"))),
        }
    }
}

/// Per-request response assembler. Cheap to clone; holds only shared
/// handles.
#[derive(Clone)]
pub struct Responder {
    settings: Arc<EmitterSettings>,
    plugins: Arc<Plugins>,
}

impl Responder {
    #[must_use]
    pub fn new(http: &HttpConfig, plugins: Arc<Plugins>) -> Self {
        Self::from_parts(Arc::new(EmitterSettings::from_config(http)), plugins)
    }

    pub(crate) fn from_parts(settings: Arc<EmitterSettings>, plugins: Arc<Plugins>) -> Self {
        Self { settings, plugins }
    }

    /// A parameter collection wired to the installed serializer.
    #[must_use]
    pub fn render_params(&self) -> RenderParams {
        RenderParams::new(Arc::clone(&self.plugins.serializer))
    }

    fn base(&self, status: StatusCode) -> Builder {
        let mut builder = Response::builder().status(status);
        if let Some(ref server) = self.settings.server_header {
            builder = builder.header("Server", server.as_str());
        }
        builder
    }

    fn emit(
        &self,
        source: BodySource,
        window: Option<ByteWindow>,
        filter: BodyFilter,
    ) -> ResponseBody {
        body::detached(
            source,
            window,
            filter,
            self.settings.chunk_size,
            self.settings.strict,
        )
    }

    fn buffered(&self, data: Bytes) -> ResponseBody {
        self.emit(BodySource::Buffer(data), None, BodyFilter::Identity)
    }

    /// Send text with the given content type.
    pub fn send_text(
        &self,
        text: impl Into<String>,
        content_type: &str,
        status: StatusCode,
    ) -> Result<Response<ResponseBody>, EmitError> {
        let data = Bytes::from(text.into());
        Ok(self
            .base(status)
            .header("Content-Type", content_type)
            .header("Content-Length", data.len())
            .body(self.buffered(data))?)
    }

    /// Send raw bytes for in-browser delivery.
    pub fn send_bytes(
        &self,
        data: Bytes,
        content_type: Option<&str>,
        filename: Option<&str>,
        status: StatusCode,
    ) -> Result<Response<ResponseBody>, EmitError> {
        let mut builder = self
            .base(status)
            .header("Content-Type", content_type.unwrap_or(OCTET_STREAM))
            .header("Accept-Ranges", "bytes")
            .header("Content-Length", data.len());
        if let Some(name) = filename {
            builder = builder.header("Content-Disposition", disposition("inline", Some(name)));
        }
        Ok(builder.body(self.buffered(data))?)
    }

    /// Send a byte range of a resident buffer as 206 Partial Content.
    pub fn send_byte_range(
        &self,
        data: Bytes,
        requested: &RangeSpec,
        content_type: Option<&str>,
        filename: Option<&str>,
    ) -> Result<Response<ResponseBody>, EmitError> {
        let window = requested.resolve(data.len() as u64);
        let mut builder = self
            .base(StatusCode::PARTIAL_CONTENT)
            .header("Content-Type", content_type.unwrap_or(OCTET_STREAM))
            .header("Accept-Ranges", "bytes")
            .header("Content-Range", range::content_range(&window))
            .header("Content-Length", window.len);
        if let Some(name) = filename {
            builder = builder.header("Content-Disposition", disposition("inline", Some(name)));
        }
        Ok(builder.body(self.emit(
            BodySource::Buffer(data),
            Some(window),
            BodyFilter::Identity,
        ))?)
    }

    /// Send from an open reader, optionally gzip-compressed.
    ///
    /// `length` is the raw content length; compressed responses omit
    /// `Content-Length` because the encoded size is unknown up front.
    pub fn send_stream(
        &self,
        reader: impl AsyncRead + Send + Unpin + 'static,
        length: u64,
        compress: bool,
        content_type: Option<&str>,
        filename: Option<&str>,
        status: StatusCode,
    ) -> Result<Response<ResponseBody>, EmitError> {
        let mut builder = self
            .base(status)
            .header("Content-Type", content_type.unwrap_or(OCTET_STREAM));
        if compress {
            builder = builder.header("Content-Encoding", "gzip");
        } else {
            builder = builder.header("Content-Length", length);
        }
        if let Some(name) = filename {
            builder = builder.header("Content-Disposition", disposition("inline", Some(name)));
        }
        let filter = if compress {
            BodyFilter::Gzip
        } else {
            BodyFilter::Identity
        };
        Ok(builder.body(self.emit(BodySource::Stream(Box::new(reader)), None, filter))?)
    }

    /// Send a whole file for in-browser delivery. Content type falls back
    /// to the extension lookup, then to the binary default.
    pub async fn send_file(
        &self,
        path: impl AsRef<Path>,
        content_type: Option<&str>,
        status: StatusCode,
    ) -> Result<Response<ResponseBody>, EmitError> {
        let path = path.as_ref();
        let file = File::open(path).await?;
        let total = file.metadata().await?.len();

        let mut builder = self
            .base(status)
            .header("Content-Type", resolve_content_type(content_type, path))
            .header("Accept-Ranges", "bytes")
            .header("Content-Length", total);
        if let Some(name) = file_name(path) {
            builder = builder.header("Content-Disposition", disposition("inline", Some(name)));
        }
        Ok(builder.body(self.emit(BodySource::File(file), None, BodyFilter::Identity))?)
    }

    /// Send a byte range of a file as 206 Partial Content.
    pub async fn send_file_range(
        &self,
        path: impl AsRef<Path>,
        requested: &RangeSpec,
        content_type: Option<&str>,
    ) -> Result<Response<ResponseBody>, EmitError> {
        let path = path.as_ref();
        let file = File::open(path).await?;
        let total = file.metadata().await?.len();
        let window = requested.resolve(total);

        let mut builder = self
            .base(StatusCode::PARTIAL_CONTENT)
            .header("Content-Type", resolve_content_type(content_type, path))
            .header("Accept-Ranges", "bytes")
            .header("Content-Range", range::content_range(&window))
            .header("Content-Length", window.len);
        if let Some(name) = file_name(path) {
            builder = builder.header("Content-Disposition", disposition("inline", Some(name)));
        }
        Ok(builder.body(self.emit(
            BodySource::File(file),
            Some(window),
            BodyFilter::Identity,
        ))?)
    }

    /// Send a file as an attachment download. `filename` overrides the name
    /// the client saves under; defaults to the file's own name.
    pub async fn download(
        &self,
        path: impl AsRef<Path>,
        filename: Option<&str>,
        content_type: Option<&str>,
        status: StatusCode,
    ) -> Result<Response<ResponseBody>, EmitError> {
        let path = path.as_ref();
        let file = File::open(path).await?;
        let total = file.metadata().await?.len();
        let name = filename.or_else(|| file_name(path));

        Ok(self
            .base(status)
            .header("Content-Type", resolve_content_type(content_type, path))
            .header("Content-Disposition", disposition("attachment", name))
            .header("Content-Length", total)
            .body(self.emit(BodySource::File(file), None, BodyFilter::Identity))?)
    }

    /// Render a page template through the installed renderer and send it as
    /// HTML.
    pub fn render_page(
        &self,
        template_path: impl AsRef<Path>,
        params: &RenderParams,
        status: StatusCode,
    ) -> Result<Response<ResponseBody>, EmitError> {
        let page = self
            .plugins
            .renderer
            .render(template_path.as_ref(), params)?;
        let data = Bytes::from(page);
        Ok(self
            .base(status)
            .header("Content-Type", "text/html")
            .header("Content-Length", data.len())
            .body(self.buffered(data))?)
    }

    /// Serialize a value through the installed serializer and send the
    /// resulting text.
    pub fn send_serialized<T: Serialize>(
        &self,
        value: &T,
        status: StatusCode,
    ) -> Result<Response<ResponseBody>, EmitError> {
        let value = serde_json::to_value(value)?;
        let text = self.plugins.serializer.serialize(&value)?;
        let data = Bytes::from(text);
        Ok(self
            .base(status)
            .header("Content-Type", self.plugins.serializer.content_type())
            .header("Content-Length", data.len())
            .body(self.buffered(data))?)
    }

    /// Redirect the client to another path or URL.
    pub fn redirect(&self, target: &str) -> Result<Response<ResponseBody>, EmitError> {
        Ok(self
            .base(StatusCode::FOUND)
            .header("Location", target)
            .body(body::empty())?)
    }
}

fn disposition(mode: &str, filename: Option<&str>) -> String {
    match filename {
        Some(name) => format!("{mode}; filename=\"{name}\""),
        None => mode.to_string(),
    }
}

fn resolve_content_type<'a>(explicit: Option<&'a str>, path: &Path) -> &'a str {
    explicit.unwrap_or_else(|| {
        mime::content_type_for(path.extension().and_then(|e| e.to_str()))
    })
}

fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}
