//! Byte-range resolution module
//!
//! Turns a client-requested byte range into a concrete window over a
//! resource of known length, and formats the matching `Content-Range`
//! value. Parsing covers the single-range `bytes=` forms only.

/// A requested byte range, before resolution against a resource length.
///
/// `end` is inclusive. `start == None` selects the suffix form: `end` then
/// holds a suffix byte count ("the last n bytes") rather than an offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSpec {
    pub start: Option<u64>,
    pub end: Option<u64>,
}

impl RangeSpec {
    /// Range covering the whole resource.
    #[must_use]
    pub const fn full() -> Self {
        Self { start: None, end: None }
    }

    /// Inclusive `start..=end` range.
    #[must_use]
    pub const fn bounded(start: u64, end: u64) -> Self {
        Self { start: Some(start), end: Some(end) }
    }

    /// Open-ended range from `start` to the end of the resource.
    #[must_use]
    pub const fn from_offset(start: u64) -> Self {
        Self { start: Some(start), end: None }
    }

    /// The last `count` bytes of the resource.
    #[must_use]
    pub const fn suffix(count: u64) -> Self {
        Self { start: None, end: Some(count) }
    }

    /// Resolve against a resource of `total` bytes.
    #[must_use]
    pub fn resolve(&self, total: u64) -> ByteWindow {
        resolve(total, self.start, self.end)
    }
}

/// A resolved `(start, len)` byte span. Invariant: `start + len <= total`
/// for the `total` it was resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteWindow {
    pub start: u64,
    pub len: u64,
}

impl ByteWindow {
    /// Offset of the last byte in the window. Zero-length windows report
    /// their start.
    #[must_use]
    pub const fn last(&self) -> u64 {
        (self.start + self.len).saturating_sub(1)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Compute the effective `(start, len)` window for a requested range.
///
/// * `start == None` is the suffix form: `end` is a suffix byte count and
///   the window covers the final `end` bytes.
/// * `end == None` extends the window to the end of the resource.
/// * Both given: the inclusive span `start..=end`.
///
/// Out-of-bounds requests are clamped rather than rejected: `start` to the
/// resource length, `end` to the final byte, an inverted span to the empty
/// window.
///
/// # Examples
/// ```
/// use servkit::http::range::resolve;
///
/// let w = resolve(1000, Some(0), Some(99));
/// assert_eq!((w.start, w.len), (0, 100));
///
/// // Suffix form: the last 500 bytes.
/// let w = resolve(1000, None, Some(500));
/// assert_eq!((w.start, w.len), (500, 500));
/// ```
#[must_use]
pub fn resolve(total: u64, start: Option<u64>, end: Option<u64>) -> ByteWindow {
    if total == 0 {
        return ByteWindow { start: 0, len: 0 };
    }
    match (start, end) {
        (None, None) => ByteWindow { start: 0, len: total },
        (None, Some(suffix)) => {
            let start = total.saturating_sub(suffix);
            ByteWindow { start, len: total - start }
        }
        (Some(s), None) => {
            let start = s.min(total);
            ByteWindow { start, len: total - start }
        }
        (Some(s), Some(e)) => {
            let start = s.min(total);
            let end = e.min(total - 1);
            let len = (end + 1).saturating_sub(start);
            ByteWindow { start, len }
        }
    }
}

/// Parse a `Range` header value (single range, `bytes` unit only).
///
/// Supported forms: `bytes=start-end`, `bytes=start-`, `bytes=-suffix`.
/// Anything else — other units, multiple ranges, inverted or non-numeric
/// bounds — parses to `None` and the caller serves the full resource.
#[must_use]
pub fn parse_range_header(header: Option<&str>) -> Option<RangeSpec> {
    let header = header?.strip_prefix("bytes=")?;

    // Multi-range requests are out of scope; treat as absent.
    if header.contains(',') {
        return None;
    }

    let (start_str, end_str) = header.split_once('-')?;
    let (start_str, end_str) = (start_str.trim(), end_str.trim());

    // Suffix form: "-500" means the last 500 bytes
    if start_str.is_empty() {
        let suffix = end_str.parse::<u64>().ok()?;
        if suffix == 0 {
            return None;
        }
        return Some(RangeSpec::suffix(suffix));
    }

    let start = start_str.parse::<u64>().ok()?;
    if end_str.is_empty() {
        return Some(RangeSpec::from_offset(start));
    }

    let end = end_str.parse::<u64>().ok()?;
    if start > end {
        return None;
    }
    Some(RangeSpec::bounded(start, end))
}

/// Format a `Content-Range` value for a resolved window.
///
/// The figure after the slash is the end of the served span
/// (`start + len`), not the full resource length. Callers needing strict
/// RFC 7233 semantics should substitute the resource total there.
#[must_use]
pub fn content_range(window: &ByteWindow) -> String {
    format!(
        "bytes {}-{}/{}",
        window.start,
        window.last(),
        window.start + window.len
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_bounded() {
        let w = resolve(1000, Some(0), Some(99));
        assert_eq!(w, ByteWindow { start: 0, len: 100 });

        let w = resolve(1000, Some(200), Some(299));
        assert_eq!(w, ByteWindow { start: 200, len: 100 });
    }

    #[test]
    fn test_resolve_suffix() {
        let w = resolve(1000, None, Some(500));
        assert_eq!(w, ByteWindow { start: 500, len: 500 });

        // Suffix larger than the resource covers the whole resource
        let w = resolve(100, None, Some(500));
        assert_eq!(w, ByteWindow { start: 0, len: 100 });
    }

    #[test]
    fn test_resolve_open_ended() {
        let w = resolve(1000, Some(400), None);
        assert_eq!(w, ByteWindow { start: 400, len: 600 });
    }

    #[test]
    fn test_resolve_unspecified() {
        let w = resolve(1000, None, None);
        assert_eq!(w, ByteWindow { start: 0, len: 1000 });
    }

    #[test]
    fn test_resolve_clamps_out_of_bounds() {
        // End past the resource is clamped to the final byte
        let w = resolve(100, Some(50), Some(5000));
        assert_eq!(w, ByteWindow { start: 50, len: 50 });

        // Start past the resource yields the empty window
        let w = resolve(100, Some(200), None);
        assert_eq!(w, ByteWindow { start: 100, len: 0 });

        // Inverted span yields the empty window
        let w = resolve(100, Some(60), Some(40));
        assert!(w.is_empty());

        let w = resolve(0, Some(10), Some(20));
        assert_eq!(w, ByteWindow { start: 0, len: 0 });
    }

    #[test]
    fn test_parse_bounded() {
        let spec = parse_range_header(Some("bytes=0-99")).unwrap();
        assert_eq!(spec, RangeSpec::bounded(0, 99));
    }

    #[test]
    fn test_parse_open_ended() {
        let spec = parse_range_header(Some("bytes=50-")).unwrap();
        assert_eq!(spec, RangeSpec::from_offset(50));
    }

    #[test]
    fn test_parse_suffix() {
        let spec = parse_range_header(Some("bytes=-20")).unwrap();
        assert_eq!(spec, RangeSpec::suffix(20));
        assert_eq!(spec.resolve(100), ByteWindow { start: 80, len: 20 });
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(parse_range_header(None).is_none());
        assert!(parse_range_header(Some("bytes=a-b")).is_none());
        assert!(parse_range_header(Some("bytes=0-9,20-29")).is_none());
        assert!(parse_range_header(Some("items=0-9")).is_none());
        assert!(parse_range_header(Some("bytes=9-3")).is_none());
        assert!(parse_range_header(Some("bytes=-0")).is_none());
    }

    #[test]
    fn test_content_range_convention() {
        let w = resolve(1000, Some(200), Some(299));
        assert_eq!(content_range(&w), "bytes 200-299/300");

        let w = resolve(1000, None, None);
        assert_eq!(content_range(&w), "bytes 0-999/1000");
    }
}
