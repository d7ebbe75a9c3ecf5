//! Directory listing used by the digest walk

use crate::error::{CsspipeError, CsspipeResult};
use std::ffi::OsString;
use std::path::Path;

/// Type of a directory entry, without following symlinks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    /// Symlinks, sockets and anything else the walk ignores
    Other,
}

/// One entry of a directory listing
///
/// The name is kept as the platform gives it, so non-UTF-8 names still join
/// back to a path that exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryInfo {
    pub name: OsString,
    pub kind: EntryKind,
}

impl DirEntryInfo {
    pub fn new(name: impl Into<OsString>, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Lists a directory's entries with their types
pub trait DirLister: Send + Sync {
    fn read_dir_with_types(&self, dir: &Path) -> CsspipeResult<Vec<DirEntryInfo>>;
}

/// [`DirLister`] over `std::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct StdDirLister;

impl DirLister for StdDirLister {
    fn read_dir_with_types(&self, dir: &Path) -> CsspipeResult<Vec<DirEntryInfo>> {
        let read_err = |e| CsspipeError::io(format!("reading directory {}", dir.display()), e);

        let mut entries = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(read_err)? {
            let entry = entry.map_err(read_err)?;
            let file_type = entry.file_type().map_err(read_err)?;
            let kind = if file_type.is_file() {
                EntryKind::File
            } else if file_type.is_dir() {
                EntryKind::Dir
            } else {
                EntryKind::Other
            };
            entries.push(DirEntryInfo::new(entry.file_name(), kind));
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn lists_files_and_dirs() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("a.css"), "a{}").unwrap();
        std::fs::create_dir(temp.path().join("nested")).unwrap();

        let mut entries = StdDirLister.read_dir_with_types(temp.path()).unwrap();
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(
            entries,
            vec![
                DirEntryInfo::new("a.css", EntryKind::File),
                DirEntryInfo::new("nested", EntryKind::Dir),
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_other() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("real.css"), "a{}").unwrap();
        std::os::unix::fs::symlink(temp.path().join("real.css"), temp.path().join("link.css"))
            .unwrap();

        let entries = StdDirLister.read_dir_with_types(temp.path()).unwrap();
        let link = entries.iter().find(|e| e.name == "link.css").unwrap();
        assert_eq!(link.kind, EntryKind::Other);
    }

    #[test]
    fn missing_dir_errors() {
        let temp = TempDir::new().unwrap();
        let err = StdDirLister
            .read_dir_with_types(&temp.path().join("missing"))
            .unwrap_err();
        assert!(err.to_string().contains("reading directory"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn non_utf8_names_are_kept() {
        use std::os::unix::ffi::OsStrExt;

        let temp = TempDir::new().unwrap();
        let name = std::ffi::OsStr::from_bytes(b"bad\xffname.css");
        std::fs::write(temp.path().join(name), "a{}").unwrap();

        let entries = StdDirLister.read_dir_with_types(temp.path()).unwrap();
        assert_eq!(entries, vec![DirEntryInfo::new(name, EntryKind::File)]);
        assert!(temp.path().join(&entries[0].name).is_file());
    }
}
