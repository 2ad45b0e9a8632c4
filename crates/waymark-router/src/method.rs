//! HTTP method tokens and the per-path method index.
//!
//! Methods are normalized to uppercase once at registration. Request methods
//! are compared ASCII case-insensitively so the lookup path never allocates.

use std::fmt;

/// The wildcard method token.
pub const ANY: &str = "*";

/// An uppercased HTTP method token, or the `*` wildcard.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Method(Box<str>);

impl Method {
    /// Parse and uppercase a method token.
    ///
    /// Returns `None` for empty tokens or tokens with characters outside the
    /// HTTP `tchar` set.
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        if token.is_empty() || !token.bytes().all(is_tchar) {
            return None;
        }
        Some(Self(token.to_ascii_uppercase().into_boxed_str()))
    }

    /// The wildcard method, matching any request method.
    pub fn any() -> Self {
        Self(ANY.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the `*` wildcard.
    pub fn is_any(&self) -> bool {
        &*self.0 == ANY
    }

    /// Case-insensitive comparison against a raw request method.
    pub fn matches(&self, method: &str) -> bool {
        self.0.eq_ignore_ascii_case(method)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&http::Method> for Method {
    fn from(method: &http::Method) -> Self {
        Self(method.as_str().to_ascii_uppercase().into_boxed_str())
    }
}

impl From<http::Method> for Method {
    fn from(method: http::Method) -> Self {
        Self::from(&method)
    }
}

/// RFC 9110 token characters.
fn is_tchar(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b'!' | b'#'
                | b'$'
                | b'%'
                | b'&'
                | b'\''
                | b'*'
                | b'+'
                | b'-'
                | b'.'
                | b'^'
                | b'_'
                | b'`'
                | b'|'
                | b'~'
        )
}

/// Mapping from method to an ordered list of values for one path (or, in the
/// linear backend, for the whole table).
///
/// Keys keep first-registration order; values keep insertion order per key.
/// Tables hold a handful of methods, so a vector scan beats hashing here.
#[derive(Debug, Clone)]
pub struct MethodTable<V> {
    entries: Vec<(Method, Vec<V>)>,
}

impl<V> Default for MethodTable<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> MethodTable<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value under a method key.
    pub fn insert(&mut self, method: Method, value: V) {
        match self.entries.iter_mut().find(|(m, _)| *m == method) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((method, vec![value])),
        }
    }

    /// Values registered for exactly this method.
    pub fn exact(&self, method: &str) -> Option<&[V]> {
        self.entries
            .iter()
            .find(|(m, _)| m.matches(method))
            .map(|(_, values)| values.as_slice())
    }

    /// Values registered under the `*` wildcard.
    pub fn wildcard(&self) -> Option<&[V]> {
        self.exact(ANY)
    }

    /// Exact-method values if present, otherwise the wildcard values.
    pub fn get(&self, method: &str) -> Option<&[V]> {
        self.exact(method).or_else(|| self.wildcard())
    }

    /// Exact-method values followed by wildcard values.
    pub fn matching<'a>(&'a self, method: &str) -> impl Iterator<Item = &'a V> + 'a {
        let exact = self.exact(method).unwrap_or_default();
        let wildcard: &[V] = if method == ANY {
            &[]
        } else {
            self.wildcard().unwrap_or_default()
        };
        exact.iter().chain(wildcard.iter())
    }

    /// Registered method keys, wildcard included, in first-registration order.
    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.entries.iter().map(|(m, _)| m)
    }

    /// Total number of values across all methods.
    pub fn len(&self) -> usize {
        self.entries.iter().map(|(_, v)| v.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
