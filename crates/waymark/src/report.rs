//! Command output, as text or JSON.

use serde::{Serialize, Serializer};

use waymark_router::{request::request_path, Method, RouteEntry, Router, Strategy};

/// One normalized route, as printed by `waymark routes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteReport {
    pub name: String,
    pub path: String,
    pub methods: Vec<String>,
}

impl RouteReport {
    pub fn from_entry(entry: &RouteEntry<String>) -> Self {
        Self {
            name: entry.payload.clone(),
            path: entry.path.clone(),
            methods: entry.methods.clone(),
        }
    }

    pub fn render_text(&self) -> String {
        format!("{}\t{}\t{}", self.name, self.methods.join(","), self.path)
    }
}

/// One resolved route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchedRoute {
    pub route: String,
    /// Bindings in pattern order, written as a JSON object.
    #[serde(serialize_with = "params_as_map")]
    pub params: Vec<(String, String)>,
}

fn params_as_map<S: Serializer>(params: &[(String, String)], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_map(params.iter().map(|(name, value)| (name, value)))
}

/// Result of `waymark match`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchReport {
    pub method: String,
    pub path: String,
    pub strategy: Strategy,
    pub matches: Vec<MatchedRoute>,
    /// Methods that would have matched; only filled when nothing did.
    pub allowed: Vec<String>,
}

impl MatchReport {
    /// Resolve `method url` against `router`, first match or all matches.
    pub fn resolve(
        router: &dyn Router<String>,
        strategy: Strategy,
        method: &str,
        url: &str,
        all: bool,
    ) -> Self {
        let found = if all {
            router.lookup_all(method, url)
        } else {
            router.lookup(method, url).into_iter().collect()
        };

        let matches: Vec<MatchedRoute> = found
            .into_iter()
            .map(|m| MatchedRoute {
                route: m.payload.clone(),
                params: m
                    .params
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            })
            .collect();

        let allowed = if matches.is_empty() {
            router
                .allowed_methods(url)
                .iter()
                .map(Method::to_string)
                .collect()
        } else {
            Vec::new()
        };

        Self {
            method: method.to_ascii_uppercase(),
            path: request_path(url).to_string(),
            strategy,
            matches,
            allowed,
        }
    }

    pub fn render_text(&self) -> String {
        if self.matches.is_empty() {
            let mut out = String::from("no match");
            if !self.allowed.is_empty() {
                out.push_str(&format!("\nallowed: {}", self.allowed.join(", ")));
            }
            return out;
        }

        self.matches
            .iter()
            .map(|m| {
                let mut line = m.route.clone();
                for (name, value) in &m.params {
                    line.push_str(&format!(" {}={}", name, value));
                }
                line
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
