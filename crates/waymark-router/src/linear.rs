//! Linear router: per-method lists of compiled patterns scanned in
//! registration order.
//!
//! O(routes for the method) per lookup. Used when tables are small or when
//! first-registered-wins semantics across overlapping patterns are wanted.

use crate::error::RouterError;
use crate::log::SharedLogger;
use crate::method::{Method, MethodTable};
use crate::pattern::{path_segments, Pattern};
use crate::request::request_path;
use crate::route::{Match, RouteEntry};
use crate::Router;

#[derive(Debug)]
struct LinearRoute<T> {
    pattern: Pattern,
    payload: T,
}

/// Router that tests every candidate pattern in order.
#[derive(Debug)]
pub struct LinearRouter<T> {
    routes: Vec<LinearRoute<T>>,
    /// Method -> indices into `routes`, registration order.
    table: MethodTable<usize>,
    logger: SharedLogger,
}

impl<T> LinearRouter<T> {
    /// Build a router from normalized entries.
    pub fn new(entries: impl IntoIterator<Item = RouteEntry<T>>) -> Result<Self, RouterError> {
        Self::with_logger(entries, SharedLogger::default())
    }

    /// Build a router that reports to `logger`.
    pub fn with_logger(
        entries: impl IntoIterator<Item = RouteEntry<T>>,
        logger: SharedLogger,
    ) -> Result<Self, RouterError> {
        let mut routes = Vec::new();
        let mut table = MethodTable::new();

        for entry in entries {
            let compiled = entry.compile()?;
            logger.route_registered(compiled.pattern.as_str(), &compiled.methods);

            let index = routes.len();
            for method in compiled.methods {
                table.insert(method, index);
            }
            routes.push(LinearRoute {
                pattern: compiled.pattern,
                payload: compiled.payload,
            });
        }

        Ok(Self {
            routes,
            table,
            logger,
        })
    }

    fn resolve<'a>(&'a self, index: usize, segments: &[&str]) -> Option<Match<'a, T>> {
        let route = self.routes.get(index)?;
        route.pattern.match_segments(segments).map(|params| Match {
            payload: &route.payload,
            params,
        })
    }
}

impl<T: Send + Sync> Router<T> for LinearRouter<T> {
    /// The method's list is selected first (falling back to the wildcard list
    /// only when the method has no list at all), then scanned in order.
    fn lookup(&self, method: &str, url: &str) -> Option<Match<'_, T>> {
        let path = request_path(url);
        let segments = path_segments(path);

        let found = self.table.get(method).and_then(|candidates| {
            candidates
                .iter()
                .find_map(|&index| self.resolve(index, &segments))
        });

        self.logger
            .route_resolved(method, path, usize::from(found.is_some()));
        found
    }

    fn lookup_all(&self, method: &str, url: &str) -> Vec<Match<'_, T>> {
        let path = request_path(url);
        let segments = path_segments(path);

        let found: Vec<_> = self
            .table
            .matching(method)
            .filter_map(|&index| self.resolve(index, &segments))
            .collect();

        self.logger.route_resolved(method, path, found.len());
        found
    }

    fn allowed_methods(&self, url: &str) -> Vec<Method> {
        let segments = path_segments(request_path(url));

        self.table
            .methods()
            .filter(|method| !method.is_any())
            .filter(|method| {
                self.table.exact(method.as_str()).is_some_and(|candidates| {
                    candidates
                        .iter()
                        .any(|&index| self.resolve(index, &segments).is_some())
                })
            })
            .cloned()
            .collect()
    }

    fn len(&self) -> usize {
        self.routes.len()
    }
}
