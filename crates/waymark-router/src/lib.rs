//! Request router with two interchangeable backends.
//!
//! Routes are registered once as `(pattern, methods, payload)` triples and
//! compiled into either a [`RadixRouter`] (segment-compressed prefix tree) or a
//! [`LinearRouter`] (ordered pattern lists). After construction a router is
//! immutable: lookups are pure reads and can run concurrently.
//!
//! ```
//! use waymark_router::{create_router, RouteEntry, RouterConfig};
//!
//! let routes = vec![
//!     RouteEntry::new("/users/:id", ["GET"], "get_user"),
//!     RouteEntry::new("/users/:id", ["*"], "any_user"),
//! ];
//! let router = create_router(routes, &RouterConfig::default()).unwrap();
//!
//! let found = router.lookup("GET", "/users/42?expand=1").unwrap();
//! assert_eq!(*found.payload, "get_user");
//! assert_eq!(found.params.get("id"), Some("42"));
//!
//! let all: Vec<_> = router.lookup_all("GET", "/users/42").iter().map(|m| *m.payload).collect();
//! assert_eq!(all, ["get_user", "any_user"]);
//! ```

pub mod error;
pub mod linear;
pub mod log;
pub mod method;
pub mod pattern;
pub mod radix;
pub mod request;
pub mod route;
pub mod table;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use error::{PatternError, RouterError};
pub use linear::LinearRouter;
pub use log::{NoopLogger, RouterLogger, SharedLogger, TracingLogger};
pub use method::{Method, MethodTable};
pub use pattern::{Params, Pattern, Segment};
pub use radix::RadixRouter;
pub use request::{RequestTarget, RouteRequest};
pub use route::{Match, RouteEntry};
pub use table::{build_route_table, build_route_table_with, RouteDef, RouteSource};

/// The lookup surface shared by both backends.
///
/// `lookup` returns the single best payload; `lookup_all` returns every
/// matching payload, exact-method payloads before wildcard ones for the same
/// route. Neither ever fails: no match is `None` or an empty list.
pub trait Router<T>: Send + Sync {
    /// First match for `method` and `url`.
    fn lookup(&self, method: &str, url: &str) -> Option<Match<'_, T>>;

    /// Every match for `method` and `url`, in a stable order.
    fn lookup_all(&self, method: &str, url: &str) -> Vec<Match<'_, T>>;

    /// Non-wildcard methods registered on any route matching `url`.
    fn allowed_methods(&self, url: &str) -> Vec<Method>;

    /// Number of registered entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// [`Router::lookup`] for a request.
    fn match_request(&self, request: &dyn RouteRequest) -> Option<Match<'_, T>> {
        self.lookup(request.method(), request.target())
    }

    /// [`Router::lookup_all`] for a request.
    fn match_all(&self, request: &dyn RouteRequest) -> Vec<Match<'_, T>> {
        self.lookup_all(request.method(), request.target())
    }
}

/// Which backend [`create_router`] builds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Prefix tree, most specific route wins.
    #[default]
    Radix,
    /// Ordered scan, first registered route wins.
    Linear,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Radix => "radix",
            Strategy::Linear => "linear",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "radix" => Ok(Strategy::Radix),
            "linear" => Ok(Strategy::Linear),
            other => Err(format!("unknown router strategy '{}'", other)),
        }
    }
}

/// Router construction options.
#[derive(Debug, Clone, Default)]
pub struct RouterConfig {
    pub strategy: Strategy,
    pub logger: SharedLogger,
}

impl RouterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_logger(mut self, logger: impl RouterLogger + 'static) -> Self {
        self.logger = SharedLogger::new(logger);
        self
    }
}

/// Build the configured backend from normalized entries.
pub fn create_router<T>(
    routes: impl IntoIterator<Item = RouteEntry<T>>,
    config: &RouterConfig,
) -> Result<Box<dyn Router<T>>, RouterError>
where
    T: Send + Sync + 'static,
{
    let logger = config.logger.clone();
    Ok(match config.strategy {
        Strategy::Radix => Box::new(RadixRouter::with_logger(routes, logger)?),
        Strategy::Linear => Box::new(LinearRouter::with_logger(routes, logger)?),
    })
}
