use crate::core::Storage;
use crate::utils::error::Result;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Filesystem-backed storage for the rendered workbook. The base directory is
/// either a temporary directory dropped after the run or a configured output
/// directory that keeps the artifact.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Storage rooted in a fresh temporary directory. The returned guard
    /// removes the directory, and any workbook inside it, when dropped —
    /// the caller must keep it alive until the run is over and must not
    /// bypass its destructor.
    pub fn temporary() -> Result<(Self, TempDir)> {
        let dir = TempDir::new()?;
        let storage = Self::new(dir.path());
        Ok((storage, dir))
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.base_path.join(path);
        let data = fs::read(full_path)?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.base_path.join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, data)?;
        Ok(())
    }
}
