use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

/// A uniquely named extraction directory owned by one analysis run.
/// The directory and everything in it is removed when the value is dropped.
#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    /// Creates `<root>/<uuid>`, creating `root` first if needed. Only the
    /// per-run directory is removed on drop; `root` is shared between runs
    /// and stays in place.
    pub fn create_in(root: &Path) -> std::io::Result<Self> {
        fs::create_dir_all(root)?;
        let path = root.join(Uuid::new_v4().to_string());
        fs::create_dir(&path)?;
        debug!(path = %path.display(), "Created scratch directory");
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn join(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        match fs::remove_dir_all(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Removed scratch directory"),
            Err(e) => warn!(path = %self.path.display(), error = %e, "Failed to remove scratch directory"),
        }
    }
}
