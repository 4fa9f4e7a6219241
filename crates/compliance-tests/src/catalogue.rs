//! Discovery of tool descriptor files.

use crate::errors::HarnessError;
use std::path::{Path, PathBuf};

/// One descriptor file found in the commands directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogueEntry {
    /// File name, used to label the test case.
    pub file_name: String,
    pub path: PathBuf,
}

/// List descriptor files (`*.yml`, `*.yaml`) in `dir`, sorted by file name.
///
/// Sub-directories and hidden files are ignored. Files are not parsed here;
/// a malformed descriptor fails its own case, not the whole catalogue.
pub fn discover(dir: &Path) -> Result<Vec<CatalogueEntry>, HarnessError> {
    let io_err = |source| HarnessError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        if !entry.file_type().map_err(io_err)?.is_file() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy().into_owned();
        if file_name.starts_with('.') || !is_descriptor_file(&file_name) {
            continue;
        }

        entries.push(CatalogueEntry {
            file_name,
            path: entry.path(),
        });
    }

    entries.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    Ok(entries)
}

fn is_descriptor_file(file_name: &str) -> bool {
    file_name.ends_with(".yml") || file_name.ends_with(".yaml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discover_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b-tool.yml"), "").unwrap();
        std::fs::write(dir.path().join("a-tool.yaml"), "").unwrap();
        std::fs::write(dir.path().join("README.md"), "").unwrap();
        std::fs::write(dir.path().join(".hidden.yml"), "").unwrap();
        std::fs::create_dir(dir.path().join("nested.yml")).unwrap();

        let entries = discover(dir.path()).unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.file_name.as_str()).collect();

        assert_eq!(names, vec!["a-tool.yaml", "b-tool.yml"]);
        assert_eq!(entries[0].path, dir.path().join("a-tool.yaml"));
    }

    #[test]
    fn test_discover_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = discover(&dir.path().join("absent")).unwrap_err();

        assert!(matches!(err, HarnessError::Io { .. }));
    }
}
