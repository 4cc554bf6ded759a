//! Clone registry
//!
//! In-process record of the working directories this facade instance has
//! cloned. Paths are normalized once at insertion; lookups normalize the
//! query the same way, so `./repo` and `repo` always refer to the same
//! entry. Invariant: every entry corresponds to a working directory this
//! process created, and removal keeps the list and the filesystem in sync.

use crate::{HubkitError, Result};
use std::path::{Component, Path, PathBuf};

/// Ordered record of cloned working directories
#[derive(Debug, Default)]
pub struct CloneRegistry {
    paths: Vec<PathBuf>,
}

/// Canonical form used for both insertion and lookup: drop `.` components,
/// then canonicalize when the path exists on disk
fn normalize(path: &Path) -> PathBuf {
    let trimmed: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    trimmed.canonicalize().unwrap_or(trimmed)
}

impl CloneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a freshly cloned working directory, returning the stored form
    pub fn record(&mut self, path: &Path) -> PathBuf {
        let normalized = normalize(path);
        if !self.paths.contains(&normalized) {
            self.paths.push(normalized.clone());
        }
        normalized
    }

    /// Look up an entry by any spelling of its path
    pub fn find(&self, path: &Path) -> Option<PathBuf> {
        let normalized = normalize(path);
        self.paths.iter().find(|p| **p == normalized).cloned()
    }

    /// Drop an entry; the path must have been recorded by this registry
    pub fn remove(&mut self, path: &Path) -> Result<PathBuf> {
        let normalized = normalize(path);
        match self.paths.iter().position(|p| *p == normalized) {
            Some(index) => Ok(self.paths.remove(index)),
            None => Err(HubkitError::CloneRegistry(path.display().to_string())),
        }
    }

    /// Read-only view of the recorded paths, in clone order
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_record_and_find() {
        let mut registry = CloneRegistry::new();
        let stored = registry.record(Path::new("scratch/repo"));
        assert_eq!(registry.find(Path::new("scratch/repo")), Some(stored));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_find_tolerates_dot_prefix() {
        let mut registry = CloneRegistry::new();
        registry.record(Path::new("scratch/repo"));
        assert!(registry.find(Path::new("./scratch/repo")).is_some());

        let mut registry = CloneRegistry::new();
        registry.record(Path::new("./scratch/repo"));
        assert!(registry.find(Path::new("scratch/repo")).is_some());
    }

    #[test]
    fn test_existing_directories_normalize_to_one_entry() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("repo");
        std::fs::create_dir(&path).unwrap();

        let mut registry = CloneRegistry::new();
        registry.record(&path);
        registry.record(&path);
        assert_eq!(registry.len(), 1);
        assert!(registry.find(&path).is_some());
    }

    #[test]
    fn test_remove_unrecorded_path_fails() {
        let mut registry = CloneRegistry::new();
        registry.record(Path::new("scratch/repo"));

        let err = registry.remove(Path::new("scratch/other")).unwrap_err();
        assert!(matches!(err, HubkitError::CloneRegistry(_)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_keeps_order_of_remaining() {
        let mut registry = CloneRegistry::new();
        registry.record(Path::new("a"));
        registry.record(Path::new("b"));
        registry.record(Path::new("c"));

        registry.remove(Path::new("./b")).unwrap();
        let rest: Vec<_> = registry.paths().iter().map(|p| p.to_path_buf()).collect();
        assert_eq!(rest, vec![PathBuf::from("a"), PathBuf::from("c")]);
    }
}
