//! Filesystem operations
//!
//! Handles file and directory operations.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use walkdir::WalkDir;

use crate::error::FilesystemError;

/// Create a directory and all parent directories
///
/// Succeeds if the directory already exists, including when another thread
/// creates it concurrently.
pub fn create_dir_all(path: &Path) -> Result<(), FilesystemError> {
    std::fs::create_dir_all(path).map_err(|source| FilesystemError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a file, returning `None` if it does not exist
pub fn read_optional(path: &Path) -> Result<Option<String>, FilesystemError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(FilesystemError::ReadFile {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Replace a file's content atomically
///
/// Content goes to a temporary file in the target's directory, which is then
/// renamed over the target. Readers see either the old or the new content.
pub fn write_atomic(path: &Path, content: &str) -> Result<(), FilesystemError> {
    let write_error = |source| FilesystemError::WriteFile {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir).map_err(write_error)?;
    file.write_all(content.as_bytes()).map_err(write_error)?;
    file.as_file().sync_all().map_err(write_error)?;
    file.persist(path).map_err(|e| write_error(e.error))?;
    Ok(())
}

/// List regular files directly inside `dir` whose name ends with `suffix`
///
/// Returns an empty list if `dir` does not exist. Paths are sorted.
pub fn list_with_suffix(dir: &Path, suffix: &str) -> Result<Vec<PathBuf>, FilesystemError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| FilesystemError::ListDir {
            path: dir.to_path_buf(),
            source: e.into(),
        })?;
        let matches = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.ends_with(suffix) && name.len() > suffix.len());
        if entry.file_type().is_file() && matches {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Barrier;
    use std::thread;
    use tempfile::TempDir;

    #[test]
    fn test_read_optional_missing_file() {
        let temp = TempDir::new().unwrap();
        let content = read_optional(&temp.path().join("absent")).unwrap();
        assert!(content.is_none());
    }

    #[test]
    fn test_read_optional_directory_is_error() {
        let temp = TempDir::new().unwrap();
        let err = read_optional(temp.path()).unwrap_err();
        assert!(matches!(err, FilesystemError::ReadFile { .. }));
    }

    #[test]
    fn test_write_atomic_replaces_content() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("file.txt");

        write_atomic(&path, "first\nsecond\n").unwrap();
        write_atomic(&path, "third\n").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "third\n");
        // No temporary files left behind
        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_atomic_missing_directory_fails() {
        let temp = TempDir::new().unwrap();
        let err = write_atomic(&temp.path().join("missing").join("f"), "x").unwrap_err();
        assert!(matches!(err, FilesystemError::WriteFile { .. }));
    }

    #[test]
    fn test_create_dir_all_twice_concurrently() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("a").join("b").join("locks");
        let barrier = Barrier::new(2);

        thread::scope(|scope| {
            let handles: Vec<_> = (0..2)
                .map(|_| {
                    scope.spawn(|| {
                        barrier.wait();
                        create_dir_all(&target)
                    })
                })
                .collect();
            for handle in handles {
                handle.join().unwrap().unwrap();
            }
        });

        assert!(target.is_dir());
        assert_eq!(std::fs::read_dir(target.parent().unwrap()).unwrap().count(), 1);
    }

    #[test]
    fn test_list_with_suffix() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("compile.lockfile"), "").unwrap();
        std::fs::write(temp.path().join("runtime.lockfile"), "").unwrap();
        std::fs::write(temp.path().join("notes.txt"), "").unwrap();
        std::fs::write(temp.path().join(".lockfile"), "").unwrap();
        std::fs::create_dir(temp.path().join("nested.lockfile")).unwrap();

        let files = list_with_suffix(temp.path(), ".lockfile").unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["compile.lockfile", "runtime.lockfile"]);
    }

    #[test]
    fn test_list_with_suffix_missing_dir() {
        let temp = TempDir::new().unwrap();
        assert!(list_with_suffix(&temp.path().join("none"), ".lockfile")
            .unwrap()
            .is_empty());
    }
}
