/// Filesystem seam for the watch cycle.
///
/// Stat, read, write, and touch are the only operations the watcher performs
/// against disk. They sit behind a trait so tests can substitute an in-memory
/// filesystem with fault injection instead of real disk state.
use std::fs::OpenOptions;
use std::io::{self, Write as _};
use std::path::Path;

use filetime::FileTime;

/// Metadata snapshot from the stat step, reported in each cycle's status record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub name: String,
    pub size: u64,
    /// Permission bits, logged in octal.
    pub mode: u32,
}

pub trait WatchFs {
    fn stat(&self, path: &Path) -> io::Result<FileInfo>;
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
    /// Replace the file's content in full, creating it (mode 0600) if absent.
    fn write(&self, path: &Path, contents: &str) -> io::Result<()>;
    /// Refresh access/modification times to now, creating the file (mode 0600)
    /// if absent. Must never truncate existing content.
    fn touch(&self, path: &Path) -> io::Result<()>;
}

impl<T: WatchFs + ?Sized> WatchFs for &T {
    fn stat(&self, path: &Path) -> io::Result<FileInfo> {
        (**self).stat(path)
    }
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        (**self).read_to_string(path)
    }
    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        (**self).write(path, contents)
    }
    fn touch(&self, path: &Path) -> io::Result<()> {
        (**self).touch(path)
    }
}

/// Real-disk implementation used by the daemon.
pub struct RealFs;

impl WatchFs for RealFs {
    fn stat(&self, path: &Path) -> io::Result<FileInfo> {
        let meta = std::fs::metadata(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(FileInfo {
            name,
            size: meta.len(),
            mode: mode_bits(&meta),
        })
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        let mut file = open_0600(path, true)?;
        file.write_all(contents.as_bytes())
    }

    fn touch(&self, path: &Path) -> io::Result<()> {
        // Open without truncate so an existing file keeps its content.
        let _ = open_0600(path, false)?;
        let now = FileTime::now();
        filetime::set_file_times(path, now, now)
    }
}

#[cfg(unix)]
fn mode_bits(meta: &std::fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn mode_bits(meta: &std::fs::Metadata) -> u32 {
    if meta.permissions().readonly() {
        0o444
    } else {
        0o644
    }
}

#[cfg(unix)]
fn open_0600(path: &Path, truncate: bool) -> io::Result<std::fs::File> {
    use std::os::unix::fs::OpenOptionsExt;
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(truncate)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn open_0600(path: &Path, truncate: bool) -> io::Result<std::fs::File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(truncate)
        .open(path)
}
