//! Test harnesses for waymark.
//!
//! `ManifestDir` writes throwaway manifests for tests that need a file on
//! disk; the `cli` module drives the `waymark` binary end to end.

#[cfg(test)]
pub mod cli;

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use waymark::{Manifest, ManifestError};

/// A temporary directory holding route manifests.
pub struct ManifestDir {
    dir: TempDir,
}

impl ManifestDir {
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            dir: TempDir::new()?,
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `content` to `name` inside the directory and return its path.
    pub fn write(&self, name: &str, content: &str) -> std::io::Result<PathBuf> {
        let path = self.dir.path().join(name);
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// Write a manifest and confirm it parses before handing it out.
    pub fn write_manifest(&self, name: &str, content: &str) -> Result<PathBuf, ManifestError> {
        let path = self.write(name, content).map_err(|source| ManifestError::Io {
            path: self.dir.path().join(name),
            source,
        })?;
        Manifest::load(&path)?;
        Ok(path)
    }
}
