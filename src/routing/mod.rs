//! Routing module
//!
//! Segment-based route matching with named parameters:
//! - pattern compilation at registration time (`:name` wildcard segments)
//! - first-match-wins lookup in registration order
//! - positional segment probes for branching on path shape

mod route;
mod table;

pub use route::{CompiledRoute, Segment};
pub use table::{RouteMatch, RouteTable};

/// Split a request path into its non-empty segments. Leading, trailing and
/// duplicate slashes disappear, so `/a//b/` yields `["a", "b"]`.
#[must_use]
pub fn split_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Named parameters extracted by a route match, in pattern order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams(Vec<(String, String)>);

impl RouteParams {
    pub(crate) fn new(pairs: Vec<(String, String)>) -> Self {
        Self(pairs)
    }

    /// Value captured for a named wildcard, if the pattern had one.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Pairs in the order the wildcards appear in the pattern.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_segments() {
        assert_eq!(split_segments("/a/b/c"), vec!["a", "b", "c"]);
        assert_eq!(split_segments("/a//b/"), vec!["a", "b"]);
        assert_eq!(split_segments("/"), Vec::<&str>::new());
        assert_eq!(split_segments(""), Vec::<&str>::new());
    }

    #[test]
    fn test_params_access() {
        let params = RouteParams::new(vec![
            ("id".to_string(), "42".to_string()),
            ("action".to_string(), "edit".to_string()),
        ]);
        assert_eq!(params.get("id"), Some("42"));
        assert_eq!(params.get("missing"), None);
        assert_eq!(params.len(), 2);
    }
}
