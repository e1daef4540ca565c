use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::trace;

const RETRY_EVERY: Duration = Duration::from_millis(10);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Exclusive hold on a store file, for one read-modify-write.
///
/// The flock lives on a sibling `<store>.lock` file that is created once
/// and never removed, so every process contends on the same inode.
/// Released when dropped.
#[derive(Debug)]
pub struct StoreLock {
    _file: File,
}

#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("could not open lock file {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("timed out waiting for {path}: another tick process is writing")]
    Timeout { path: PathBuf },
}

/// `store.json` is guarded by `store.json.lock` in the same directory
pub fn lock_path_for(store_path: &Path) -> PathBuf {
    let mut name = store_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".lock");
    store_path.with_file_name(name)
}

impl StoreLock {
    /// Wait up to `timeout` for exclusive access to `store_path`
    pub fn acquire(store_path: &Path, timeout: Duration) -> Result<Self, LockError> {
        let path = lock_path_for(store_path);
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map_err(|source| LockError::Open {
                path: path.clone(),
                source,
            })?;

        let deadline = Instant::now() + timeout;
        while !try_flock(&file) {
            if Instant::now() >= deadline {
                return Err(LockError::Timeout { path });
            }
            std::thread::sleep(RETRY_EVERY);
        }
        trace!(lock = %path.display(), "store locked");
        Ok(StoreLock { _file: file })
    }
}

// Closing the descriptor drops the flock; the file itself stays.

#[cfg(unix)]
fn try_flock(file: &File) -> bool {
    use std::os::unix::io::AsRawFd;
    unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) == 0 }
}

#[cfg(not(unix))]
fn try_flock(_file: &File) -> bool {
    true
}
