//! Route table builder.
//!
//! Turns named, caller-declared route objects into the uniform
//! [`RouteEntry`] list both routers accept. A route without a path or without
//! methods, with a malformed method token or with a malformed pattern is an
//! error naming its key; nothing is silently dropped.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::error::RouterError;
use crate::method::Method;
use crate::pattern::Pattern;
use crate::route::RouteEntry;

/// Something that declares a route: a path and the methods it answers.
pub trait RouteSource {
    /// The path pattern, if one has been set.
    fn path(&self) -> Option<&str>;

    /// The declared methods, possibly empty.
    fn methods(&self) -> Vec<String>;
}

/// A plain declarative route, as found in manifests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDef {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub methods: Vec<String>,
}

impl RouteDef {
    pub fn new<M, S>(path: impl Into<String>, methods: M) -> Self
    where
        M: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path: Some(path.into()),
            methods: methods.into_iter().map(Into::into).collect(),
        }
    }
}

impl RouteSource for RouteDef {
    fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    fn methods(&self) -> Vec<String> {
        self.methods.clone()
    }
}

impl<S: RouteSource + ?Sized> RouteSource for &S {
    fn path(&self) -> Option<&str> {
        (**self).path()
    }

    fn methods(&self) -> Vec<String> {
        (**self).methods()
    }
}

/// Normalize named route sources; each source becomes its own payload.
pub fn build_route_table<K, S, I>(routes: I) -> Result<Vec<RouteEntry<S>>, RouterError>
where
    I: IntoIterator<Item = (K, S)>,
    K: Display,
    S: RouteSource,
{
    build_route_table_with(routes, |_, source| source)
}

/// Normalize named route sources, deriving each payload with `payload`.
///
/// Output order follows input order, which is the registration order the
/// routers use for tie-breaks.
pub fn build_route_table_with<K, S, I, T, F>(
    routes: I,
    mut payload: F,
) -> Result<Vec<RouteEntry<T>>, RouterError>
where
    I: IntoIterator<Item = (K, S)>,
    K: Display,
    S: RouteSource,
    F: FnMut(&K, S) -> T,
{
    let routes = routes.into_iter();
    let mut entries = Vec::with_capacity(routes.size_hint().0);

    for (key, source) in routes {
        // "" is the root pattern; whitespace alone is not a path.
        let path = match source.path() {
            Some(path) if path.is_empty() || !path.trim().is_empty() => path.trim().to_string(),
            _ => {
                return Err(RouterError::MissingPath {
                    key: key.to_string(),
                })
            }
        };

        Pattern::parse(&path).map_err(|source| RouterError::InvalidRoutePattern {
            key: key.to_string(),
            path: path.clone(),
            source,
        })?;

        let mut methods = Vec::new();
        for raw in source.methods() {
            if raw.trim().is_empty() {
                continue;
            }
            let method = Method::parse(&raw).ok_or_else(|| RouterError::InvalidRouteMethod {
                key: key.to_string(),
                method: raw.clone(),
            })?;
            methods.push(method.as_str().to_string());
        }
        if methods.is_empty() {
            return Err(RouterError::MissingMethods {
                key: key.to_string(),
            });
        }

        let payload = payload(&key, source);
        entries.push(RouteEntry {
            path,
            methods,
            payload,
        });
    }

    Ok(entries)
}
