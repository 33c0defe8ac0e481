use std::path::{Path, PathBuf};

use tracing::warn;

/// Temporary output file owned for the duration of one run.
///
/// [`ScratchFile::remove`] deletes the file once it has been published. If the
/// handle is dropped while the file still exists (a failure before or during
/// upload), the file is removed best-effort. Removal failures are logged and
/// never surface as errors.
#[derive(Debug)]
pub struct ScratchFile {
    path: PathBuf,
    removed: bool,
}

impl ScratchFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            removed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the file. Returns whether the delete succeeded.
    pub fn remove(mut self) -> bool {
        self.removed = true;
        remove_logged(&self.path)
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        if !self.removed && self.path.exists() {
            remove_logged(&self.path);
        }
    }
}

fn remove_logged(path: &Path) -> bool {
    match std::fs::remove_file(path) {
        Ok(()) => true,
        Err(e) => {
            warn!("Failed to remove temporary file {}: {}", path.display(), e);
            false
        }
    }
}
