//! Input discovery.
//!
//! Command-line arguments may name archives or directories. Directories are
//! searched one level deep for files with a `.crs` extension in any case.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Returns true if `path` has a `.crs` extension, ignoring case.
pub fn is_crs(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("crs"))
}

/// Expands `paths` into a deduplicated list of archives.
///
/// Files are kept in argument order; each directory contributes its
/// archives sorted by name. Arguments that are neither are reported on
/// stderr and skipped.
pub fn find_archives(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    let mut found = Vec::new();

    for path in paths {
        if path.is_file() {
            if is_crs(path) {
                if seen.insert(path.clone()) {
                    found.push(path.clone());
                }
            } else {
                eprintln!("Warning: {} is not a CRS file", path.display());
            }
        } else if path.is_dir() {
            let mut entries: Vec<PathBuf> = WalkDir::new(path)
                .min_depth(1)
                .max_depth(1)
                .into_iter()
                .filter_map(|entry| match entry {
                    Ok(e) => Some(e),
                    Err(e) => {
                        eprintln!("Warning: {}", e);
                        None
                    }
                })
                .filter(|e| e.file_type().is_file() && is_crs(e.path()))
                .map(|e| e.into_path())
                .collect();
            entries.sort();
            for entry in entries {
                if seen.insert(entry.clone()) {
                    found.push(entry);
                }
            }
        } else {
            eprintln!("Warning: {} does not exist", path.display());
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_crs() {
        assert!(is_crs(Path::new("PEBBLE.CRS")));
        assert!(is_crs(Path::new("dir/pebble.crs")));
        assert!(is_crs(Path::new("Mixed.Crs")));
        assert!(!is_crs(Path::new("PEBBLE.CRS.bak")));
        assert!(!is_crs(Path::new("CRS")));
    }

    #[test]
    fn test_find_archives() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["B.CRS", "a.crs", "notes.txt"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        std::fs::create_dir(dir.path().join("patched")).unwrap();
        std::fs::write(dir.path().join("patched").join("C.CRS"), b"").unwrap();

        let explicit = dir.path().join("B.CRS");
        let found = find_archives(&[explicit.clone(), dir.path().to_path_buf()]);

        assert_eq!(found, vec![explicit, dir.path().join("a.crs")]);
    }
}
