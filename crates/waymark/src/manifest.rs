//! Route manifests: a YAML (or JSON) file naming every route.
//!
//! ```yaml
//! router:
//!   strategy: radix
//! routes:
//!   listUsers:
//!     path: /users
//!     methods: [GET]
//! ```
//!
//! Route order in the file is registration order.

use std::fmt;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use waymark_router::{build_route_table_with, RouteDef, RouteEntry, RouterError, Strategy};

/// Errors produced while loading a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The file could not be read.
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid YAML/JSON or has the wrong shape.
    #[error("failed to parse manifest: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Router options carried by the manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouterSection {
    #[serde(default)]
    pub strategy: Option<Strategy>,
}

/// A parsed route manifest.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub router: RouterSection,

    /// Named routes in file order.
    #[serde(default, deserialize_with = "ordered_routes")]
    pub routes: Vec<(String, RouteDef)>,
}

impl Manifest {
    /// Read and parse a manifest file.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parse manifest text. JSON is accepted as a YAML subset.
    pub fn parse(content: &str) -> Result<Self, ManifestError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Normalize the routes; each payload is the route's key.
    pub fn route_table(&self) -> Result<Vec<RouteEntry<String>>, RouterError> {
        build_route_table_with(
            self.routes.iter().map(|(key, def)| (key.as_str(), def)),
            |key, _| key.to_string(),
        )
    }
}

/// Deserialize a map into a vector, keeping key order and rejecting duplicates.
fn ordered_routes<'de, D>(deserializer: D) -> Result<Vec<(String, RouteDef)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct OrderedMap(PhantomData<fn() -> Vec<(String, RouteDef)>>);

    impl<'de> Visitor<'de> for OrderedMap {
        type Value = Vec<(String, RouteDef)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of route names to routes")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut routes: Vec<(String, RouteDef)> = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((key, def)) = map.next_entry::<String, Option<RouteDef>>()? {
                if routes.iter().any(|(existing, _)| *existing == key) {
                    return Err(serde::de::Error::custom(format!(
                        "duplicate route name '{}'",
                        key
                    )));
                }
                // `name:` with no body still registers, and fails normalization by name.
                routes.push((key, def.unwrap_or_default()));
            }
            Ok(routes)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(OrderedMap(PhantomData))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"
router:
  strategy: linear
routes:
  zeta:
    path: /z
    methods: [get]
  alpha:
    path: /users/:id
    methods: ["GET", "*"]
"#;

    #[test]
    fn parse_keeps_file_order() {
        let manifest = Manifest::parse(MANIFEST).expect("valid manifest");
        assert_eq!(manifest.router.strategy, Some(Strategy::Linear));

        let names: Vec<_> = manifest.routes.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
    }

    #[test]
    fn route_table_uses_keys_as_payloads() {
        let manifest = Manifest::parse(MANIFEST).expect("valid manifest");
        let table = manifest.route_table().expect("valid table");

        assert_eq!(table[0].payload, "zeta");
        assert_eq!(table[0].methods, vec!["GET"]);
        assert_eq!(table[1].path, "/users/:id");
        assert_eq!(table[1].methods, vec!["GET", "*"]);
    }

    #[test]
    fn json_manifests_parse() {
        let manifest = Manifest::parse(
            r#"{"routes": {"health": {"path": "/health", "methods": ["GET"]}}}"#,
        )
        .expect("valid manifest");
        assert_eq!(manifest.router, RouterSection::default());
        assert_eq!(manifest.routes.len(), 1);
    }

    #[test]
    fn empty_routes_section() {
        let manifest = Manifest::parse("routes:\n").expect("valid manifest");
        assert!(manifest.routes.is_empty());
        assert!(manifest.route_table().expect("valid table").is_empty());
    }

    #[test]
    fn route_without_body_fails_normalization_by_name() {
        let manifest = Manifest::parse("routes:\n  ghost:\n").expect("valid manifest");
        assert_eq!(
            manifest.route_table().err(),
            Some(RouterError::MissingPath {
                key: "ghost".to_string()
            })
        );
    }

    #[test]
    fn missing_methods_fail_by_name() {
        let manifest =
            Manifest::parse("routes:\n  noMethods:\n    path: /a\n").expect("valid manifest");
        assert_eq!(
            manifest.route_table().err(),
            Some(RouterError::MissingMethods {
                key: "noMethods".to_string()
            })
        );
    }

    #[test]
    fn invalid_method_fails_by_name() {
        let manifest = Manifest::parse(
            "routes:\n  a:\n    path: /a\n    methods: [GET]\n  b:\n    path: /a\n    methods: [\"GE T\"]\n",
        )
        .expect("valid manifest");
        assert_eq!(
            manifest.route_table().err(),
            Some(RouterError::InvalidRouteMethod {
                key: "b".to_string(),
                method: "GE T".to_string(),
            })
        );
    }

    #[test]
    fn unknown_strategy_is_a_parse_error() {
        let err = Manifest::parse("router:\n  strategy: trie\nroutes: {}\n");
        assert!(matches!(err, Err(ManifestError::Parse(_))));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Manifest::load(Path::new("/definitely/not/here.yaml"));
        assert!(matches!(err, Err(ManifestError::Io { .. })));
    }
}
