//! # Staging files
//!
//! Scratch files used while converting between separators. Every file lives in
//! a single configured directory and is named by a random uuid, so concurrent
//! conversions never share a file and need no locking.
//!
//! A [`StagingFile`] removes itself when dropped. Removal is best effort: a
//! failure is logged and never surfaced, so it cannot mask the error that
//! aborted the conversion or fail a conversion that otherwise succeeded.

use std::{
    fs::{self, File, OpenOptions},
    io,
    path::{Path, PathBuf},
};

use log::{debug, warn};
use uuid::Uuid;

/// The directory in which staging files are allocated.
#[derive(Debug, Clone)]
pub struct StagingArea {
    dir: PathBuf,
}

impl StagingArea {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Creates a new, empty, uniquely named staging file.
    ///
    /// The staging directory is created first if it does not exist yet.
    /// The returned handle is open for writing.
    pub fn create(&self) -> io::Result<(StagingFile, File)> {
        fs::create_dir_all(&self.dir)?;

        let path = self.dir.join(Uuid::new_v4().to_string());
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)?;

        debug!("Created staging file {}", path.display());
        Ok((StagingFile { path: Some(path) }, file))
    }
}

/// A scratch file owned by whoever holds this value.
///
/// Dropping it deletes the file. Call [`StagingFile::into_path`] to take over
/// the file and its deletion yourself.
#[derive(Debug)]
pub struct StagingFile {
    path: Option<PathBuf>,
}

impl StagingFile {
    pub fn path(&self) -> &Path {
        // Only `into_path` clears the path, and it consumes `self`.
        self.path.as_deref().unwrap_or_else(|| Path::new(""))
    }

    /// Opens the staging file for reading from its start.
    pub fn open(&self) -> io::Result<File> {
        File::open(self.path())
    }

    /// Releases ownership: the file is no longer deleted on drop.
    pub fn into_path(mut self) -> PathBuf {
        self.path.take().unwrap_or_default()
    }
}

impl Drop for StagingFile {
    fn drop(&mut self) {
        if let Some(path) = self.path.take() {
            match fs::remove_file(&path) {
                Ok(()) => debug!("Removed staging file {}", path.display()),
                Err(error) if error.kind() == io::ErrorKind::NotFound => {}
                Err(error) => warn!(
                    "Unable to remove staging file {}: {}",
                    path.display(),
                    error
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn staging_files_are_unique_and_removed_on_drop() -> io::Result<()> {
        let dir = TempDir::new()?;
        let area = StagingArea::new(dir.path().join("nested"));

        let (first, _) = area.create()?;
        let (second, _) = area.create()?;
        assert_ne!(first.path(), second.path());
        assert!(first.path().starts_with(area.dir()));

        let first_path = first.path().to_path_buf();
        drop(first);
        assert!(!first_path.exists());
        assert!(second.path().exists());

        Ok(())
    }

    #[test]
    fn into_path_keeps_the_file() -> io::Result<()> {
        let dir = TempDir::new()?;
        let area = StagingArea::new(dir.path());

        let (staging, mut file) = area.create()?;
        file.write_all(b"kept")?;
        drop(file);

        let path = staging.into_path();
        assert_eq!(fs::read_to_string(&path)?, "kept");

        fs::remove_file(path)
    }

    #[test]
    fn dropping_an_already_deleted_file_is_silent() -> io::Result<()> {
        let dir = TempDir::new()?;
        let area = StagingArea::new(dir.path());

        let (staging, _) = area.create()?;
        fs::remove_file(staging.path())?;
        drop(staging);

        Ok(())
    }
}
