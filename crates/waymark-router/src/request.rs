//! The request shape the routers consume.
//!
//! Anything exposing an HTTP method and a request target (absolute URL,
//! origin-form path, with or without query string) can be routed.

/// A request as seen by the router.
pub trait RouteRequest {
    /// The request method, any case.
    fn method(&self) -> &str;

    /// The request target: a path, optionally with query, or an absolute URL.
    fn target(&self) -> &str;
}

impl<B> RouteRequest for http::Request<B> {
    fn method(&self) -> &str {
        http::Request::method(self).as_str()
    }

    fn target(&self) -> &str {
        let uri = self.uri();
        uri.path_and_query()
            .map_or_else(|| uri.path(), |pq| pq.as_str())
    }
}

/// A plain method + URL pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTarget {
    pub method: String,
    pub url: String,
}

impl RequestTarget {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
        }
    }
}

impl RouteRequest for RequestTarget {
    fn method(&self) -> &str {
        &self.method
    }

    fn target(&self) -> &str {
        &self.url
    }
}

/// Reduce a request target to its path component.
///
/// Strips `scheme://authority` from absolute URLs and `//authority` from
/// protocol-relative ones, then the query string and fragment. The result is
/// not normalized; see [`crate::pattern::path_segments`].
pub fn request_path(url: &str) -> &str {
    let mut rest = url;

    if let Some(idx) = rest.find("://") {
        let scheme = &rest[..idx];
        let is_scheme = !scheme.is_empty()
            && scheme
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'-' | b'.'));
        if is_scheme {
            rest = skip_authority(&rest[idx + 3..]);
        }
    } else if let Some(after) = rest.strip_prefix("//") {
        rest = skip_authority(after);
    }

    let end = rest.find(['?', '#']).unwrap_or(rest.len());
    &rest[..end]
}

/// Everything from the first `/`, `?` or `#` after an authority.
fn skip_authority(after: &str) -> &str {
    after
        .find(['/', '?', '#'])
        .map_or("", |start| &after[start..])
}
