//! Filesystem abstraction layer for testability
//!
//! Config loading and script output go through the [`FileSystem`] trait so
//! the pipeline can be exercised without touching the real filesystem.
//! Uses mockall for automatic mock generation in test builds.

use std::io;
use std::path::Path;

#[cfg(test)]
use mockall::automock;

/// Trait abstracting filesystem operations for dependency injection.
///
/// # Example (testing)
/// ```ignore
/// use rosdrop::fs_abstraction::MockFileSystem;
/// use std::path::Path;
///
/// let mut mock_fs = MockFileSystem::new();
/// mock_fs.expect_write()
///     .withf(|p, _| p == Path::new("build/spamhaus-drop-v4.rsc"))
///     .returning(|_, _| Ok(()));
/// ```
#[cfg_attr(test, automock)]
pub trait FileSystem: Send + Sync {
    /// Read file contents as a string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write bytes to a file, creating it if it doesn't exist.
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    /// Check if a path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;
}

/// Real filesystem implementation using std::fs.
#[derive(Default, Clone, Copy)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        std::fs::write(path, contents)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }
}

static REAL_FS: RealFileSystem = RealFileSystem;

/// Get a reference to the global real filesystem instance.
///
/// For testing, create a `MockFileSystem` instead.
pub fn real_fs() -> &'static RealFileSystem {
    &REAL_FS
}
