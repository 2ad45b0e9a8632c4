use crate::error::RouterError;
use crate::method::Method;
use crate::pattern::{Params, Pattern};

/// The unit of registration: a path pattern, its methods, and an opaque payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry<T> {
    pub path: String,
    pub methods: Vec<String>,
    pub payload: T,
}

impl<T> RouteEntry<T> {
    pub fn new<M, S>(path: impl Into<String>, methods: M, payload: T) -> Self
    where
        M: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path: path.into(),
            methods: methods.into_iter().map(Into::into).collect(),
            payload,
        }
    }

    /// Validate and split the entry into its compiled parts.
    pub(crate) fn compile(self) -> Result<CompiledEntry<T>, RouterError> {
        if self.methods.is_empty() {
            return Err(RouterError::EmptyMethods { path: self.path });
        }

        let mut methods = Vec::with_capacity(self.methods.len());
        for raw in &self.methods {
            let method = Method::parse(raw).ok_or_else(|| RouterError::InvalidMethod {
                path: self.path.clone(),
                method: raw.clone(),
            })?;
            if !methods.contains(&method) {
                methods.push(method);
            }
        }

        let pattern = Pattern::parse(&self.path).map_err(|source| RouterError::InvalidPattern {
            path: self.path.clone(),
            source,
        })?;

        Ok(CompiledEntry {
            pattern,
            methods,
            payload: self.payload,
        })
    }
}

pub(crate) struct CompiledEntry<T> {
    pub pattern: Pattern,
    pub methods: Vec<Method>,
    pub payload: T,
}

/// A resolved route: the payload plus the parameters bound while matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match<'a, T> {
    pub payload: &'a T,
    pub params: Params,
}
