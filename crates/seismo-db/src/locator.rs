//! Discovery of database files in a directory tree.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{DatabaseError, DbResult};
use crate::layout::{ComponentRole, DatabaseKind, DatabaseLayout};

/// Name of the per-component data file.
pub const DATA_FILE_NAME: &str = "ordered_output.nc4";

/// Directories this many levels below the root are searched for data files
/// but not descended into.
pub const MAX_DIRECTORY_DEPTH: usize = 4;

/// Number of data files a valid database can consist of.
const VALID_FILE_COUNTS: [usize; 3] = [1, 2, 4];

/// Locate and classify the data files of a database rooted at `root`.
///
/// A file is assigned the first [`ComponentRole`] (in declaration order)
/// whose tag equals one of its path segments below `root`.
pub fn locate(root: &Path) -> DbResult<DatabaseLayout> {
    let found = find_data_files(root);

    if found.is_empty() {
        return Err(DatabaseError::NotFound(format!(
            "No suitable netCDF files found under '{}'",
            root.display()
        )));
    }
    if !VALID_FILE_COUNTS.contains(&found.len()) {
        return Err(DatabaseError::Config(format!(
            "1, 2 or 4 netCDF files must be present in the folder structure. Found {}:\n\t{}",
            found.len(),
            join_paths(&found)
        )));
    }

    let mut by_role: BTreeMap<ComponentRole, Vec<PathBuf>> = BTreeMap::new();
    for path in found {
        match classify(root, &path) {
            Some(role) => by_role.entry(role).or_default().push(path),
            None => debug!(path = %path.display(), "Data file carries no component tag"),
        }
    }

    let mut files = BTreeMap::new();
    for (role, mut paths) in by_role {
        if paths.len() != 1 {
            return Err(DatabaseError::Config(format!(
                "Found {} files for component {}:\n\t{}",
                paths.len(),
                role,
                join_paths(&paths)
            )));
        }
        if let Some(path) = paths.pop() {
            files.insert(role, path);
        }
    }

    let kind = if files.contains_key(&ComponentRole::Px) || files.contains_key(&ComponentRole::Pz)
    {
        DatabaseKind::Reciprocal
    } else if files.keys().any(ComponentRole::is_moment_tensor) {
        let complete = files.len() == ComponentRole::MOMENT_TENSOR.len()
            && ComponentRole::MOMENT_TENSOR
                .iter()
                .all(|role| files.contains_key(role));
        if !complete {
            return Err(DatabaseError::Config(
                "Expecting all four elemental moment tensor subfolders to be present.".to_string(),
            ));
        }
        DatabaseKind::Forward
    } else {
        return Err(DatabaseError::Config(format!(
            "Could not find any suitable netCDF files. Did you pass the correct directory? \
             E.g. if the '{}' files are located in '/path/to/PZ/Data', please pass '/path/to/'.",
            DATA_FILE_NAME
        )));
    };

    Ok(DatabaseLayout { kind, files })
}

/// All data files under `root`, sorted by path.
///
/// Unreadable directories are skipped with a warning.
pub fn find_data_files(root: &Path) -> Vec<PathBuf> {
    let walker = WalkDir::new(root)
        .follow_links(true)
        .max_depth(MAX_DIRECTORY_DEPTH + 1)
        .sort_by_file_name();

    let mut found = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(root = %root.display(), error = %e, "Skipping unreadable path");
                continue;
            }
        };
        if entry.file_type().is_file() && entry.file_name() == DATA_FILE_NAME {
            debug!(path = %entry.path().display(), depth = entry.depth(), "Found data file");
            found.push(entry.into_path());
        }
    }
    found.sort();
    found
}

/// Role of a single data file, judged by its path segments below `root`.
pub fn classify(root: &Path, path: &Path) -> Option<ComponentRole> {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let segments: Vec<&str> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => s.to_str(),
            _ => None,
        })
        .collect();

    ComponentRole::ALL
        .into_iter()
        .find(|role| segments.contains(&role.tag()))
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join("\n\t")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_single_tag() {
        let root = Path::new("/db");
        assert_eq!(
            classify(root, Path::new("/db/PZ/Data/ordered_output.nc4")),
            Some(ComponentRole::Pz)
        );
        assert_eq!(
            classify(root, Path::new("/db/MXZ_MYZ/Data/ordered_output.nc4")),
            Some(ComponentRole::MxzMyz)
        );
    }

    #[test]
    fn test_classify_first_tag_wins() {
        let root = Path::new("/db");
        let path = Path::new("/db/MZZ/PX/ordered_output.nc4");
        assert_eq!(classify(root, path), Some(ComponentRole::Px));
    }

    #[test]
    fn test_classify_ignores_segments_above_root() {
        let root = Path::new("/data/PX/db");
        let path = Path::new("/data/PX/db/other/ordered_output.nc4");
        assert_eq!(classify(root, path), None);
    }

    #[test]
    fn test_classify_requires_whole_segment() {
        let root = Path::new("/db");
        assert_eq!(classify(root, Path::new("/db/PZX/ordered_output.nc4")), None);
        assert_eq!(classify(root, Path::new("/db/pz/ordered_output.nc4")), None);
    }
}
