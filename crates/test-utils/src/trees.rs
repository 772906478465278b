//! On-disk database directory trees for locator tests.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Name of the data file the locator looks for.
pub const DATA_FILE: &str = "ordered_output.nc4";

/// A temporary directory populated with (empty) database files.
///
/// The directory is removed when the tree is dropped.
pub struct DatabaseTree {
    dir: TempDir,
}

impl DatabaseTree {
    /// An empty tree.
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// A reciprocal database with the given single-force components,
    /// laid out as `<TAG>/Data/ordered_output.nc4`.
    pub fn reciprocal(tags: &[&str]) -> Self {
        tags.iter()
            .fold(Self::new(), |tree, tag| tree.with_data_file(&format!("{}/Data", tag)))
    }

    /// A forward database with all four moment tensor components.
    pub fn forward() -> Self {
        Self::reciprocal(&["MZZ", "MXX_P_MYY", "MXZ_MYZ", "MXY_MXX_M_MYY"])
    }

    /// Add a data file inside `relative_dir` (`/`-separated).
    pub fn with_data_file(self, relative_dir: &str) -> Self {
        self.with_file(relative_dir, DATA_FILE)
    }

    /// Add an arbitrary file inside `relative_dir`.
    pub fn with_file(self, relative_dir: &str, name: &str) -> Self {
        let dir = self.dir_path(relative_dir);
        fs::create_dir_all(&dir).expect("Failed to create directory");
        fs::write(dir.join(name), b"").expect("Failed to write file");
        self
    }

    /// Root of the tree.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Absolute path of the data file inside `relative_dir`.
    pub fn data_file(&self, relative_dir: &str) -> PathBuf {
        self.dir_path(relative_dir).join(DATA_FILE)
    }

    fn dir_path(&self, relative_dir: &str) -> PathBuf {
        relative_dir
            .split('/')
            .filter(|s| !s.is_empty())
            .fold(self.dir.path().to_path_buf(), |p, s| p.join(s))
    }
}

impl Default for DatabaseTree {
    fn default() -> Self {
        Self::new()
    }
}
