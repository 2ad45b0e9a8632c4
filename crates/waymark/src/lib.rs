//! waymark: route manifests and the command-line inspector built on
//! `waymark-router`.

pub mod manifest;
pub mod report;

pub use manifest::{Manifest, ManifestError, RouterSection};
pub use report::{MatchReport, RouteReport};
