//! Route table
//!
//! Registration-order lookup over compiled routes. The table is built
//! before serving starts and never mutated afterwards, so concurrent
//! lookups are lock-free.

use super::route::CompiledRoute;
use super::RouteParams;

/// An ordered table of compiled routes sharing a handler type.
#[derive(Debug)]
pub struct RouteTable<H> {
    routes: Vec<CompiledRoute<H>>,
}

/// A successful lookup: the winning route and its extracted parameters.
#[derive(Debug)]
pub struct RouteMatch<'a, H> {
    pub route: &'a CompiledRoute<H>,
    pub params: RouteParams,
}

impl<H> Default for RouteTable<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> RouteTable<H> {
    #[must_use]
    pub const fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Compile and append a pattern. Precedence is registration order: the
    /// first registered route that fully matches a path wins.
    pub fn register(&mut self, pattern: &str, handler: H) {
        self.routes.push(CompiledRoute::new(pattern, handler));
    }

    /// Find the first route matching the incoming segment list and extract
    /// its named parameters.
    #[must_use]
    pub fn lookup(&self, segments: &[&str]) -> Option<RouteMatch<'_, H>> {
        self.routes
            .iter()
            .find(|route| route.matches(segments))
            .map(|route| RouteMatch {
                route,
                params: route.capture(segments),
            })
    }

    #[must_use]
    pub fn routes(&self) -> &[CompiledRoute<H>] {
        &self.routes
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
