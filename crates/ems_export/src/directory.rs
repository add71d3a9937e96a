use ems_core::{ArtifactKind, ExportArtifact};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::ExportError;

/// The shared output location every artifact is written into.
///
/// Artifacts sit flat in one directory. There is no index or sidecar
/// file: the listing plus the filename convention is the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDirectory {
    root: PathBuf,
}

impl ExportDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Create the directory (and parents) if needed and check that files
    /// can be created in it.
    ///
    /// Calling this on an existing writable directory leaves its contents
    /// unchanged.
    pub fn ensure(&self) -> Result<&Path, ExportError> {
        let unwritable = |source: io::Error| ExportError::DirectoryUnwritable {
            path: self.root.clone(),
            source,
        };
        std::fs::create_dir_all(&self.root).map_err(unwritable)?;
        tempfile::Builder::new()
            .prefix(".ems-write-check-")
            .tempfile_in(&self.root)
            .map_err(unwritable)?;
        Ok(&self.root)
    }

    pub fn artifact_path(&self, file_name: &str) -> PathBuf {
        self.root.join(file_name)
    }

    /// Write `bytes` as `file_name`, replacing any existing file of that name.
    pub fn write_artifact(
        &self,
        file_name: &str,
        kind: ArtifactKind,
        bytes: &[u8],
    ) -> Result<ExportArtifact, ExportError> {
        let path = self.artifact_path(file_name);
        write_file(&path, bytes)?;
        debug!(path = %path.display(), kind = %kind, bytes = bytes.len(), "artifact written");
        Ok(ExportArtifact::new(path, kind))
    }

    /// Artifacts currently present, sorted by file name. A directory that
    /// does not exist yet lists as empty.
    pub fn list(&self) -> io::Result<Vec<ExportArtifact>> {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut artifacts = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let path = entry.path();
            if let Some(kind) = ArtifactKind::from_path(&path) {
                artifacts.push(ExportArtifact::new(path, kind));
            }
        }
        artifacts.sort_by_key(|a| a.file_name());
        Ok(artifacts)
    }

    /// Delete one artifact by file name.
    pub fn remove(&self, file_name: &str) -> io::Result<()> {
        if !is_plain_file_name(file_name) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("not a file name inside the export directory: {file_name}"),
            ));
        }
        std::fs::remove_file(self.artifact_path(file_name))
    }
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
}

/// Write a whole file; a partially written file is removed on failure.
pub(crate) fn write_file(path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    std::fs::write(path, bytes).map_err(|e| {
        if let Err(cleanup) = std::fs::remove_file(path) {
            if cleanup.kind() != io::ErrorKind::NotFound {
                warn!(path = %path.display(), "could not discard partial file: {cleanup}");
            }
        }
        ExportError::render(&format!("failed to write {}", path.display()), e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_creates_nested_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = ExportDirectory::new(tmp.path().join("a").join("exports"));
        assert!(!dir.path().exists());
        dir.ensure().unwrap();
        assert!(dir.path().is_dir());
    }

    #[test]
    fn test_ensure_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = ExportDirectory::new(tmp.path().join("exports"));
        dir.ensure().unwrap();
        std::fs::write(dir.artifact_path("keep.pdf"), b"x").unwrap();
        let before = dir.list().unwrap();

        dir.ensure().unwrap();
        assert_eq!(dir.list().unwrap(), before);
        assert!(dir.artifact_path("keep.pdf").exists());
    }

    #[test]
    fn test_ensure_fails_under_a_file() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("not_a_dir");
        std::fs::write(&blocker, b"file").unwrap();

        let dir = ExportDirectory::new(blocker.join("exports"));
        let err = dir.ensure().unwrap_err();
        assert!(err.is_fatal());
        assert!(matches!(err, ExportError::DirectoryUnwritable { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_ensure_fails_on_read_only_directory() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("exports");
        std::fs::create_dir(&root).unwrap();
        std::fs::set_permissions(&root, std::fs::Permissions::from_mode(0o555)).unwrap();

        // Permission bits do not bind the superuser; nothing to check then.
        let bypassed = std::fs::write(root.join("x"), b"x").is_ok();

        let result = ExportDirectory::new(&root).ensure().map(|_| ());
        std::fs::set_permissions(&root, std::fs::Permissions::from_mode(0o755)).unwrap();
        if bypassed {
            return;
        }

        let err = result.unwrap_err();
        assert!(err.is_fatal());
        assert!(matches!(err, ExportError::DirectoryUnwritable { .. }));
    }

    #[test]
    fn test_ensure_leaves_no_check_file_behind() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = ExportDirectory::new(tmp.path().join("exports"));
        dir.ensure().unwrap();
        dir.ensure().unwrap();
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_write_artifact_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = ExportDirectory::new(tmp.path());
        dir.write_artifact("r.pdf", ArtifactKind::Pdf, b"first").unwrap();
        let artifact = dir.write_artifact("r.pdf", ArtifactKind::Pdf, b"second!").unwrap();
        assert_eq!(artifact.byte_size().unwrap(), 7);
        assert_eq!(std::fs::read(artifact.path()).unwrap(), b"second!");
    }

    #[test]
    fn test_write_into_missing_directory_is_render_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = ExportDirectory::new(tmp.path().join("missing"));
        let err = dir
            .write_artifact("r.pdf", ArtifactKind::Pdf, b"x")
            .unwrap_err();
        assert!(matches!(err, ExportError::Render(_)));
        assert!(!dir.artifact_path("r.pdf").exists());
    }

    #[test]
    fn test_list_filters_and_sorts() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = ExportDirectory::new(tmp.path());
        for name in ["b.xlsx", "a.pdf", "notes.txt", "c.zip"] {
            std::fs::write(dir.artifact_path(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.artifact_path("sub.pdf")).unwrap();

        let names: Vec<String> = dir.list().unwrap().iter().map(|a| a.file_name()).collect();
        assert_eq!(names, vec!["a.pdf", "b.xlsx", "c.zip"]);
    }

    #[test]
    fn test_list_missing_directory_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = ExportDirectory::new(tmp.path().join("nope"));
        assert!(dir.list().unwrap().is_empty());
    }

    #[test]
    fn test_remove_rejects_paths() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = ExportDirectory::new(tmp.path().join("exports"));
        dir.ensure().unwrap();
        std::fs::write(tmp.path().join("outside.pdf"), b"x").unwrap();

        let err = dir.remove("../outside.pdf").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert!(tmp.path().join("outside.pdf").exists());

        std::fs::write(dir.artifact_path("inside.pdf"), b"x").unwrap();
        dir.remove("inside.pdf").unwrap();
        assert!(!dir.artifact_path("inside.pdf").exists());
    }
}
