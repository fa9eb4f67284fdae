//! Artifact delivery.
//!
//! The converter hands every finished artifact to a [`Downloads`] sink as
//! `(file name, bytes)`. [`DirectoryDownloads`] writes them into a directory;
//! tests use a recording sink instead.

use std::io;
use std::path::PathBuf;

/// Receives one call per converted image.
pub trait Downloads: Sync {
    /// Deliver an artifact and return where it ended up.
    fn deliver(&self, name: &str, bytes: &[u8]) -> io::Result<PathBuf>;
}

/// Writes artifacts into a directory, overwriting files with the same name.
#[derive(Debug, Clone)]
pub struct DirectoryDownloads {
    dir: PathBuf,
}

impl DirectoryDownloads {
    /// Create the sink, creating `dir` if needed.
    pub fn create(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }
}

impl Downloads for DirectoryDownloads {
    fn deliver(&self, name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        let path = self.dir.join(name);
        std::fs::write(&path, bytes)?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "artifact written");
        Ok(path)
    }
}
