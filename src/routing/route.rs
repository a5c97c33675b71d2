//! Route pattern compilation
//!
//! Patterns are compiled once at registration time into a flat segment
//! array; named segments (`:id`) become wildcards with their name and
//! position recorded. Compiled routes are read-only afterwards, so lookup
//! needs no synchronization.

use super::RouteParams;

/// One compiled pattern segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Must equal the incoming segment byte-for-byte.
    Literal(String),
    /// Matches any incoming segment and captures it.
    Wildcard,
}

/// A registered route: compiled segments, named-parameter positions, and
/// the associated handler.
#[derive(Debug)]
pub struct CompiledRoute<H> {
    segments: Vec<Segment>,
    params: Vec<(usize, String)>,
    handler: H,
}

impl<H> CompiledRoute<H> {
    /// Compile a pattern string. Empty segments are dropped, so `/a//b`,
    /// `a/b` and `/a/b/` all compile to the same route. A segment starting
    /// with `:` becomes a wildcard named after the rest of the segment.
    pub fn new(pattern: &str, handler: H) -> Self {
        let mut segments = Vec::new();
        let mut params = Vec::new();

        for (position, raw) in pattern.split('/').filter(|s| !s.is_empty()).enumerate() {
            match raw.strip_prefix(':') {
                Some(name) => {
                    params.push((position, name.to_string()));
                    segments.push(Segment::Wildcard);
                }
                None => segments.push(Segment::Literal(raw.to_string())),
            }
        }

        Self { segments, params, handler }
    }

    pub const fn handler(&self) -> &H {
        &self.handler
    }

    /// Number of segments in the compiled pattern.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Whether this route matches the incoming segment list: counts must be
    /// equal, literals byte-equal, wildcards match anything.
    #[must_use]
    pub fn matches(&self, incoming: &[&str]) -> bool {
        if incoming.len() != self.segments.len() {
            return false;
        }
        self.segments
            .iter()
            .zip(incoming)
            .all(|(own, seg)| match own {
                Segment::Wildcard => true,
                Segment::Literal(lit) => lit.as_str() == *seg,
            })
    }

    /// Extract the named parameters from a segment list this route matches,
    /// in the order the wildcards appear in the pattern.
    #[must_use]
    pub fn capture(&self, incoming: &[&str]) -> RouteParams {
        RouteParams::new(
            self.params
                .iter()
                .filter_map(|(position, name)| {
                    incoming
                        .get(*position)
                        .map(|value| (name.clone(), (*value).to_string()))
                })
                .collect(),
        )
    }

    /// O(1) probe: does the pattern segment at `step` equal any of the
    /// candidate literals? False when `step` is out of bounds or the stored
    /// segment is a wildcard.
    #[must_use]
    pub fn has_segment(&self, step: usize, candidates: &[&str]) -> bool {
        match self.segments.get(step) {
            Some(Segment::Literal(lit)) => candidates.iter().any(|c| *c == lit.as_str()),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_literals_and_wildcards() {
        let route = CompiledRoute::new("/users/:id/:action", ());
        assert_eq!(route.segment_count(), 3);
        assert!(route.matches(&["users", "42", "edit"]));
        assert!(!route.matches(&["users", "42"]));
        assert!(!route.matches(&["posts", "42", "edit"]));
    }

    #[test]
    fn test_empty_segments_dropped() {
        let route = CompiledRoute::new("/a//b/", ());
        assert_eq!(route.segment_count(), 2);
        assert!(route.matches(&["a", "b"]));
    }

    #[test]
    fn test_capture_order() {
        let route = CompiledRoute::new("/users/:id/:action", ());
        let params = route.capture(&["users", "42", "edit"]);
        let pairs: Vec<_> = params.iter().collect();
        assert_eq!(pairs, vec![("id", "42"), ("action", "edit")]);
    }

    #[test]
    fn test_has_segment() {
        let route = CompiledRoute::new("/static/:file", ());
        assert!(route.has_segment(0, &["static", "assets"]));
        assert!(!route.has_segment(0, &["media"]));
        // Wildcard never equals a literal probe
        assert!(!route.has_segment(1, &["file", ":file"]));
        // Out of bounds
        assert!(!route.has_segment(2, &["static"]));
        assert!(!route.has_segment(99, &["static"]));
    }
}
