//! Temporary directory holding the inputs and outputs of one test.

use std::path::{Path, PathBuf};

use epaper_dither::Raster;
use photoframe::rendering::write_png;

pub struct TestWorkspace {
    dir: tempfile::TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Create a subdirectory and return its path
    pub fn subdir(&self, name: &str) -> PathBuf {
        let path = self.path(name);
        std::fs::create_dir_all(&path).expect("Failed to create subdir");
        path
    }

    /// Write `raster` as a PNG at `name`
    pub fn write_png(&self, name: &str, raster: &Raster) -> PathBuf {
        let path = self.path(name);
        write_png(&path, raster).expect("Failed to write PNG");
        path
    }

    /// Write raw bytes at `name`
    pub fn write(&self, name: &str, contents: impl AsRef<[u8]>) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, contents).expect("Failed to write file");
        path
    }

    pub fn read(&self, path: &Path) -> Vec<u8> {
        std::fs::read(path).unwrap_or_else(|e| panic!("Failed to read {}: {e}", path.display()))
    }
}
