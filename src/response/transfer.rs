//! Chunked body transfer module
//!
//! Copies bytes from a body source to a response sink in fixed-size
//! chunks, honoring an optional byte window and an optional gzip filter.
//! Whatever happens, the sink is flushed and shut down exactly once.

use crate::http::range::ByteWindow;
use flate2::write::GzEncoder;
use flate2::Compression;
use hyper::body::Bytes;
use std::io::{self, Write};
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeekExt, AsyncWrite, AsyncWriteExt};

/// Default transfer buffer size; overridable via `[http] chunk_size`.
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// A response body source. The transfer engine consumes it and releases it
/// on every exit path.
pub enum BodySource {
    /// Resident bytes, written directly (optionally sliced by a window).
    Buffer(Bytes),
    /// An open sequential reader. Not seekable: a window start is consumed
    /// by reading and discarding.
    Stream(Box<dyn AsyncRead + Send + Unpin>),
    /// An open file; window starts are reached by seeking.
    File(File),
}

/// Optional on-the-fly body filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFilter {
    Identity,
    Gzip,
}

/// Write destination for a response body. `close` flushes and shuts the
/// writer down exactly once; later calls are no-ops, so cleanup paths can
/// always call it without tracking state.
#[derive(Debug)]
pub struct TransferSink<W> {
    writer: Option<W>,
}

impl<W: AsyncWrite + Unpin> TransferSink<W> {
    pub const fn new(writer: W) -> Self {
        Self { writer: Some(writer) }
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.writer.is_some()
    }

    async fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        match self.writer.as_mut() {
            Some(w) => w.write_all(buf).await,
            None => Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "sink already closed",
            )),
        }
    }

    /// Flush and shut down the underlying writer. Idempotent.
    pub async fn close(&mut self) -> io::Result<()> {
        let Some(mut writer) = self.writer.take() else {
            return Ok(());
        };
        writer.flush().await?;
        writer.shutdown().await
    }
}

/// Copy `source` into `sink`, bounded by `window` when given, through the
/// gzip filter when requested.
///
/// Windows and compression are mutually exclusive: a window addresses the
/// raw resource, so when both are supplied the window wins and the filter
/// is ignored.
///
/// The sink is closed on every exit. On the failure path the close is
/// best-effort and its own error never replaces the transfer error; I/O
/// errors abort the transfer and propagate without retry.
pub async fn transfer<W: AsyncWrite + Unpin>(
    source: BodySource,
    sink: &mut TransferSink<W>,
    window: Option<ByteWindow>,
    filter: BodyFilter,
    chunk_size: usize,
) -> io::Result<()> {
    let outcome = copy_source(source, sink, window, filter, chunk_size).await;
    let closed = sink.close().await;
    outcome.and(closed)
}

async fn copy_source<W: AsyncWrite + Unpin>(
    source: BodySource,
    sink: &mut TransferSink<W>,
    window: Option<ByteWindow>,
    filter: BodyFilter,
    chunk_size: usize,
) -> io::Result<()> {
    match source {
        BodySource::Buffer(data) => {
            if let Some(window) = window {
                return sink.write_all(slice_window(&data, &window)).await;
            }
            match filter {
                BodyFilter::Identity => sink.write_all(&data).await,
                BodyFilter::Gzip => {
                    let mut reader: &[u8] = &data;
                    copy_compressed(&mut reader, sink, chunk_size).await
                }
            }
        }
        BodySource::File(mut file) => {
            if let Some(window) = window {
                if window.start > 0 {
                    file.seek(io::SeekFrom::Start(window.start)).await?;
                }
                return copy_bounded(&mut file, sink, window.len, chunk_size).await;
            }
            match filter {
                BodyFilter::Identity => copy_to_end(&mut file, sink, chunk_size).await,
                BodyFilter::Gzip => copy_compressed(&mut file, sink, chunk_size).await,
            }
        }
        BodySource::Stream(mut reader) => {
            if let Some(window) = window {
                if window.start > 0 {
                    discard(&mut reader, window.start, chunk_size).await?;
                }
                return copy_bounded(&mut reader, sink, window.len, chunk_size).await;
            }
            match filter {
                BodyFilter::Identity => copy_to_end(&mut reader, sink, chunk_size).await,
                BodyFilter::Gzip => copy_compressed(&mut reader, sink, chunk_size).await,
            }
        }
    }
}

fn slice_window<'a>(data: &'a Bytes, window: &ByteWindow) -> &'a [u8] {
    let start = usize::try_from(window.start)
        .unwrap_or(usize::MAX)
        .min(data.len());
    let len = usize::try_from(window.len).unwrap_or(usize::MAX);
    let end = start.saturating_add(len).min(data.len());
    &data[start..end]
}

async fn copy_to_end<R, W>(
    reader: &mut R,
    sink: &mut TransferSink<W>,
    chunk_size: usize,
) -> io::Result<()>
where
    R: AsyncRead + Unpin + ?Sized,
    W: AsyncWrite + Unpin,
{
    let mut buf = vec![0u8; chunk_size.max(1)];
    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            return Ok(());
        }
        sink.write_all(&buf[..n]).await?;
    }
}

async fn copy_bounded<R, W>(
    reader: &mut R,
    sink: &mut TransferSink<W>,
    mut remaining: u64,
    chunk_size: usize,
) -> io::Result<()>
where
    R: AsyncRead + Unpin + ?Sized,
    W: AsyncWrite + Unpin,
{
    let mut buf = vec![0u8; chunk_size.max(1)];
    while remaining > 0 {
        let want = usize::try_from(remaining.min(buf.len() as u64)).unwrap_or(buf.len());
        let n = reader.read(&mut buf[..want]).await?;
        if n == 0 {
            // Source exhausted before the window was satisfied
            return Ok(());
        }
        sink.write_all(&buf[..n]).await?;
        remaining -= n as u64;
    }
    Ok(())
}

/// Read and throw away `count` bytes; the seek substitute for sources that
/// only support sequential reads.
async fn discard<R>(reader: &mut R, mut count: u64, chunk_size: usize) -> io::Result<()>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut buf = vec![0u8; chunk_size.max(1)];
    while count > 0 {
        let want = usize::try_from(count.min(buf.len() as u64)).unwrap_or(buf.len());
        let n = reader.read(&mut buf[..want]).await?;
        if n == 0 {
            return Ok(());
        }
        count -= n as u64;
    }
    Ok(())
}

async fn copy_compressed<R, W>(
    reader: &mut R,
    sink: &mut TransferSink<W>,
    chunk_size: usize,
) -> io::Result<()>
where
    R: AsyncRead + Unpin + ?Sized,
    W: AsyncWrite + Unpin,
{
    let mut encoder = GzEncoder::new(Vec::with_capacity(chunk_size), Compression::default());
    let mut buf = vec![0u8; chunk_size.max(1)];
    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        encoder.write_all(&buf[..n])?;
        if !encoder.get_ref().is_empty() {
            let pending = std::mem::take(encoder.get_mut());
            sink.write_all(&pending).await?;
        }
    }
    let tail = encoder.finish()?;
    sink.write_all(&tail).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::range;
    use std::io::Read;

    async fn run_transfer(
        source: BodySource,
        window: Option<ByteWindow>,
        filter: BodyFilter,
    ) -> Vec<u8> {
        let (writer, mut reader) = tokio::io::duplex(1 << 20);
        let mut sink = TransferSink::new(writer);
        transfer(source, &mut sink, window, filter, 16).await.unwrap();
        assert!(!sink.is_open());

        let mut out = Vec::new();
        reader.read_to_end(&mut out).await.unwrap();
        out
    }

    fn sample(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 251) as u8).collect()
    }

    #[tokio::test]
    async fn test_buffer_full_transfer() {
        let data = sample(1000);
        let out = run_transfer(
            BodySource::Buffer(Bytes::from(data.clone())),
            None,
            BodyFilter::Identity,
        )
        .await;
        assert_eq!(out, data);
    }

    #[tokio::test]
    async fn test_buffer_windowed_transfer() {
        let data = sample(1000);
        let window = range::resolve(1000, Some(200), Some(299));
        let out = run_transfer(
            BodySource::Buffer(Bytes::from(data.clone())),
            Some(window),
            BodyFilter::Identity,
        )
        .await;
        assert_eq!(out.len(), 100);
        assert_eq!(out, &data[200..300]);
    }

    #[tokio::test]
    async fn test_stream_bounded_stops_at_eof() {
        let data = sample(40);
        let reader = std::io::Cursor::new(data.clone());
        let window = ByteWindow { start: 0, len: 500 };
        let out = run_transfer(
            BodySource::Stream(Box::new(reader)),
            Some(window),
            BodyFilter::Identity,
        )
        .await;
        // Requested more than the source holds: stops cleanly at EOF
        assert_eq!(out, data);
    }

    #[tokio::test]
    async fn test_stream_discards_to_window_start() {
        let data = sample(100);
        let reader = std::io::Cursor::new(data.clone());
        let window = ByteWindow { start: 30, len: 20 };
        let out = run_transfer(
            BodySource::Stream(Box::new(reader)),
            Some(window),
            BodyFilter::Identity,
        )
        .await;
        assert_eq!(out, &data[30..50]);
    }

    #[tokio::test]
    async fn test_file_windowed_transfer() {
        let path = std::env::temp_dir().join(format!(
            "transfer-window-{}.bin",
            std::process::id()
        ));
        let data = sample(256);
        tokio::fs::write(&path, &data).await.unwrap();

        let file = File::open(&path).await.unwrap();
        let window = ByteWindow { start: 10, len: 5 };
        let out = run_transfer(BodySource::File(file), Some(window), BodyFilter::Identity).await;
        assert_eq!(out, &data[10..15]);

        tokio::fs::remove_file(&path).await.ok();
    }

    #[tokio::test]
    async fn test_gzip_roundtrip() {
        let data = b"hello hello hello hello hello".repeat(20);
        let out = run_transfer(
            BodySource::Buffer(Bytes::from(data.clone())),
            None,
            BodyFilter::Gzip,
        )
        .await;
        assert!(!out.is_empty());
        assert_ne!(out, data);

        let mut decoded = Vec::new();
        flate2::read::GzDecoder::new(&out[..])
            .read_to_end(&mut decoded)
            .unwrap();
        assert_eq!(decoded, data);
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let (writer, _reader) = tokio::io::duplex(64);
        let mut sink = TransferSink::new(writer);
        sink.close().await.unwrap();
        // Second close is a no-op, not an error
        sink.close().await.unwrap();
        assert!(!sink.is_open());
    }

    #[tokio::test]
    async fn test_write_after_close_fails() {
        let (writer, _reader) = tokio::io::duplex(64);
        let mut sink = TransferSink::new(writer);
        sink.close().await.unwrap();
        let err = sink.write_all(b"late").await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
