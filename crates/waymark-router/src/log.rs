//! Router trace hooks.
//!
//! Routers take an optional logger at construction instead of consulting any
//! process-wide debug flag. The default is [`NoopLogger`].

use std::fmt;
use std::sync::Arc;

use crate::method::Method;

/// Standard event names emitted by [`TracingLogger`].
pub mod events {
    /// A route entry was compiled into a router.
    pub const ROUTE_REGISTERED: &str = "route_registered";

    /// A lookup produced at least one payload.
    pub const ROUTE_MATCHED: &str = "route_matched";

    /// A lookup produced nothing.
    pub const ROUTE_NOT_MATCHED: &str = "route_not_matched";
}

/// Observer for router construction and lookups.
///
/// Implementations must be cheap and must not block: `route_resolved` runs on
/// every lookup.
pub trait RouterLogger: Send + Sync {
    /// Called once per entry while the router is built.
    fn route_registered(&self, path: &str, methods: &[Method]);

    /// Called after each lookup with the number of payloads returned.
    fn route_resolved(&self, method: &str, path: &str, matches: usize);
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl RouterLogger for NoopLogger {
    fn route_registered(&self, _path: &str, _methods: &[Method]) {}

    fn route_resolved(&self, _method: &str, _path: &str, _matches: usize) {}
}

/// Forwards router events to `tracing` at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl RouterLogger for TracingLogger {
    fn route_registered(&self, path: &str, methods: &[Method]) {
        let methods = methods
            .iter()
            .map(Method::as_str)
            .collect::<Vec<_>>()
            .join(",");
        tracing::debug!(
            event = events::ROUTE_REGISTERED,
            path = %path,
            methods = %methods,
            "route registered"
        );
    }

    fn route_resolved(&self, method: &str, path: &str, matches: usize) {
        if matches == 0 {
            tracing::debug!(
                event = events::ROUTE_NOT_MATCHED,
                method = %method,
                path = %path,
                "no route matched"
            );
        } else {
            tracing::debug!(
                event = events::ROUTE_MATCHED,
                method = %method,
                path = %path,
                matches,
                "route matched"
            );
        }
    }
}

/// Shared logger handle stored by routers.
#[derive(Clone)]
pub struct SharedLogger(Arc<dyn RouterLogger>);

impl SharedLogger {
    pub fn new(logger: impl RouterLogger + 'static) -> Self {
        Self(Arc::new(logger))
    }

    pub fn from_arc(logger: Arc<dyn RouterLogger>) -> Self {
        Self(logger)
    }
}

impl Default for SharedLogger {
    fn default() -> Self {
        Self::new(NoopLogger)
    }
}

impl fmt::Debug for SharedLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedLogger")
    }
}

impl std::ops::Deref for SharedLogger {
    type Target = dyn RouterLogger;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}
