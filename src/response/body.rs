//! Streaming body bridge
//!
//! Connects the transfer engine to hyper: a detached task pumps the engine
//! into a bounded channel whose receiving side is exposed as the response
//! body. Callers get the framed response immediately; nobody awaits body
//! completion.

use super::transfer::{transfer, BodyFilter, BodySource, TransferSink};
use crate::http::range::ByteWindow;
use crate::logger;
use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Full};
use hyper::body::{Body, Bytes, Frame};
use std::io;
use std::pin::Pin;
use std::task::{ready, Context, Poll};
use tokio::io::AsyncWrite;
use tokio::sync::mpsc;
use tokio_util::sync::PollSender;

/// The body type every assembled response carries.
pub type ResponseBody = BoxBody<Bytes, io::Error>;

type BodyItem = Result<Bytes, io::Error>;

/// A resident body, already fully in memory.
#[must_use]
pub fn full(data: Bytes) -> ResponseBody {
    Full::new(data).map_err(|never| match never {}).boxed()
}

#[must_use]
pub fn empty() -> ResponseBody {
    full(Bytes::new())
}

fn receiver_gone() -> io::Error {
    io::Error::new(io::ErrorKind::BrokenPipe, "response body receiver dropped")
}

/// `AsyncWrite` half of the body channel: each write hands one chunk to the
/// receiver, with channel backpressure as the suspension point.
struct BodyWriter {
    tx: PollSender<BodyItem>,
}

impl AsyncWrite for BodyWriter {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let this = self.get_mut();
        if ready!(this.tx.poll_reserve(cx)).is_err() {
            return Poll::Ready(Err(receiver_gone()));
        }
        if this.tx.send_item(Ok(Bytes::copy_from_slice(buf))).is_err() {
            return Poll::Ready(Err(receiver_gone()));
        }
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        // Chunks are handed off as they are written; nothing is buffered here
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        self.get_mut().tx.close();
        Poll::Ready(Ok(()))
    }
}

/// Receiving half of the body channel, exposed to hyper as a `Body`.
struct ChannelBody {
    rx: mpsc::Receiver<BodyItem>,
}

impl Body for ChannelBody {
    type Data = Bytes;
    type Error = io::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        self.get_mut()
            .rx
            .poll_recv(cx)
            .map(|item| item.map(|result| result.map(Frame::data)))
    }
}

/// Emit a body as a detached task.
///
/// The transfer engine runs to completion (or failure) on its own task; the
/// returned body streams whatever it produces. On failure the error is
/// logged; in strict mode it is additionally forwarded into the body stream
/// so the connection aborts visibly, while lenient mode ends the stream
/// early and the response simply truncates.
pub(crate) fn detached(
    source: BodySource,
    window: Option<ByteWindow>,
    filter: BodyFilter,
    chunk_size: usize,
    strict: bool,
) -> ResponseBody {
    let (tx, rx) = mpsc::channel::<BodyItem>(4);
    let err_tx = tx.clone();
    let mut sink = TransferSink::new(BodyWriter {
        tx: PollSender::new(tx),
    });

    tokio::spawn(async move {
        if let Err(e) = transfer(source, &mut sink, window, filter, chunk_size).await {
            logger::log_error(&format!("Body transfer failed: {e}"));
            if strict {
                let _ = err_tx.send(Err(e)).await;
            }
        }
    });

    BoxBody::new(ChannelBody { rx })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncRead;
    use tokio::io::ReadBuf;

    struct FailingReader;

    impl AsyncRead for FailingReader {
        fn poll_read(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            Poll::Ready(Err(io::Error::other("source failed mid-read")))
        }
    }

    #[tokio::test]
    async fn test_detached_buffer_streams_all_bytes() {
        let data: Vec<u8> = (0..=255).collect();
        let body = detached(
            BodySource::Buffer(Bytes::from(data.clone())),
            None,
            BodyFilter::Identity,
            32,
            false,
        );
        let collected = body.collect().await.unwrap().to_bytes();
        assert_eq!(collected.as_ref(), data.as_slice());
    }

    #[tokio::test]
    async fn test_strict_failure_surfaces_in_stream() {
        let body = detached(
            BodySource::Stream(Box::new(FailingReader)),
            None,
            BodyFilter::Identity,
            32,
            true,
        );
        assert!(body.collect().await.is_err());
    }

    #[tokio::test]
    async fn test_lenient_failure_truncates_cleanly() {
        let body = detached(
            BodySource::Stream(Box::new(FailingReader)),
            None,
            BodyFilter::Identity,
            32,
            false,
        );
        let collected = body.collect().await.unwrap().to_bytes();
        assert!(collected.is_empty());
    }
}
