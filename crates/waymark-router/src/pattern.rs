//! Path patterns: literal segments, `:name` parameters and trailing catch-alls.

use std::collections::HashSet;
use std::fmt;

use crate::error::PatternError;

/// A parsed pattern segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text, matched case-sensitively.
    Static(String),
    /// `:name`, exactly one non-empty segment.
    Param(String),
    /// `:name+`, one or more trailing segments joined by `/`.
    OneOrMore(String),
    /// `:name*` or a bare `*`, zero or more trailing segments.
    ZeroOrMore(Option<String>),
}

impl Segment {
    fn parse(raw: &str) -> Result<Self, PatternError> {
        if raw == "*" {
            return Ok(Segment::ZeroOrMore(None));
        }
        let Some(param) = raw.strip_prefix(':') else {
            return Ok(Segment::Static(raw.to_string()));
        };

        if let Some(name) = param.strip_suffix('+') {
            Ok(Segment::OneOrMore(validate_name(name)?))
        } else if let Some(name) = param.strip_suffix('*') {
            Ok(Segment::ZeroOrMore(Some(validate_name(name)?)))
        } else {
            Ok(Segment::Param(validate_name(param)?))
        }
    }

    /// Whether this segment swallows the rest of the path.
    pub fn is_catch_all(&self) -> bool {
        matches!(self, Segment::OneOrMore(_) | Segment::ZeroOrMore(_))
    }

    /// The bound parameter name, if any.
    pub fn name(&self) -> Option<&str> {
        match self {
            Segment::Static(_) | Segment::ZeroOrMore(None) => None,
            Segment::Param(name) | Segment::OneOrMore(name) => Some(name.as_str()),
            Segment::ZeroOrMore(Some(name)) => Some(name.as_str()),
        }
    }
}

fn validate_name(name: &str) -> Result<String, PatternError> {
    if name.is_empty() {
        return Err(PatternError::EmptyParamName);
    }
    if let Some(bad) = name.chars().find(|c| !c.is_ascii_alphanumeric() && *c != '_') {
        return Err(PatternError::InvalidParamName(name.to_string(), bad));
    }
    Ok(name.to_string())
}

/// Split a concrete path into its non-empty segments.
///
/// Empty segments are dropped, so trailing slashes and runs of `/` are not
/// significant: `/users//42/` yields `["users", "42"]`.
pub fn path_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// A compiled path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    source: String,
    segments: Vec<Segment>,
}

impl Pattern {
    /// Parse a pattern such as `/users/:id` or `/files/:path+`.
    ///
    /// Rejects multiple or non-trailing catch-alls, malformed parameter names
    /// and duplicate parameters.
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        let segments = path_segments(pattern)
            .into_iter()
            .map(Segment::parse)
            .collect::<Result<Vec<_>, _>>()?;

        let catch_alls = segments.iter().filter(|s| s.is_catch_all()).count();
        if catch_alls > 1 {
            return Err(PatternError::MultipleCatchAll);
        }
        if let Some(pos) = segments.iter().position(Segment::is_catch_all) {
            if pos + 1 != segments.len() {
                let raw = path_segments(pattern)[pos].to_string();
                return Err(PatternError::CatchAllNotTrailing(raw));
            }
        }

        let mut seen = HashSet::new();
        for name in segments.iter().filter_map(Segment::name) {
            if !seen.insert(name) {
                return Err(PatternError::DuplicateParam(name.to_string()));
            }
        }

        Ok(Self {
            source: pattern.to_string(),
            segments,
        })
    }

    /// The pattern as registered.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Parameter names in declaration order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(Segment::name)
    }

    /// Match a concrete path (query string and fragment allowed).
    pub fn matches(&self, path: &str) -> Option<Params> {
        let path = crate::request::request_path(path);
        self.match_segments(&path_segments(path))
    }

    /// Match pre-split path segments.
    pub(crate) fn match_segments(&self, path: &[&str]) -> Option<Params> {
        let mut params = Params::new();

        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Static(literal) => {
                    if *path.get(i)? != literal.as_str() {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    params.push(name, *path.get(i)?);
                }
                Segment::OneOrMore(name) => {
                    let rest = path.get(i..)?;
                    if rest.is_empty() {
                        return None;
                    }
                    params.push(name, rest.join("/"));
                    return Some(params);
                }
                Segment::ZeroOrMore(name) => {
                    if let Some(name) = name {
                        let rest = path.get(i..).unwrap_or_default();
                        params.push(name, rest.join("/"));
                    }
                    return Some(params);
                }
            }
        }

        (path.len() == self.segments.len()).then_some(params)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Parameters captured by a match, in pattern order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    pairs: Vec<(String, String)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((name.into(), value.into()));
    }

    pub(crate) fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }

    /// Value bound to `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
