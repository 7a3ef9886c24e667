//! Per-project lock serializing mutating commands.
//!
//! The lock is `.whys/session.lock` holding the owner's pid. A lock whose pid
//! is no longer running is removed and retaken.

use std::fs::OpenOptions;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use whys_config::PROJECT_DIR;

const LOCK_FILE: &str = "session.lock";
const LOCK_WAIT_TIMEOUT: Duration = Duration::from_secs(60);
const LOCK_RETRY_DELAY: Duration = Duration::from_millis(200);

/// Removes the lock file on drop.
#[derive(Debug)]
pub struct WriteLockGuard {
    path: PathBuf,
}

impl Drop for WriteLockGuard {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

pub async fn acquire_for_project(project_root: &Path) -> anyhow::Result<WriteLockGuard> {
    let lock_path = project_root.join(PROJECT_DIR).join(LOCK_FILE);
    let started = std::time::Instant::now();

    loop {
        match try_acquire(&lock_path) {
            Ok(guard) => return Ok(guard),
            Err(LockState::Stale(pid)) => {
                tracing::warn!(pid, path = %lock_path.display(), "removing stale session lock");
                let _ = std::fs::remove_file(&lock_path);
            }
            Err(state) => {
                if started.elapsed() >= LOCK_WAIT_TIMEOUT {
                    match state {
                        LockState::HeldBy(pid) => anyhow::bail!(
                            "another whys command is updating sessions (pid {pid}); try again after it finishes"
                        ),
                        _ => anyhow::bail!(
                            "could not acquire session lock at {}; remove it if no whys process is running",
                            lock_path.display()
                        ),
                    }
                }
                tokio::time::sleep(LOCK_RETRY_DELAY).await;
            }
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum LockState {
    HeldBy(u32),
    Stale(u32),
    Unreadable,
}

fn try_acquire(lock_path: &Path) -> Result<WriteLockGuard, LockState> {
    if let Some(parent) = lock_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    match OpenOptions::new().create_new(true).write(true).open(lock_path) {
        Ok(mut file) => {
            let _ = writeln!(file, "{}", std::process::id());
            Ok(WriteLockGuard {
                path: lock_path.to_path_buf(),
            })
        }
        Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
            let mut contents = String::new();
            if OpenOptions::new()
                .read(true)
                .open(lock_path)
                .and_then(|mut file| file.read_to_string(&mut contents))
                .is_err()
            {
                return Err(LockState::Unreadable);
            }
            match contents.trim().parse::<u32>() {
                Ok(pid) if is_process_running(pid) => Err(LockState::HeldBy(pid)),
                Ok(pid) => Err(LockState::Stale(pid)),
                Err(_) => Err(LockState::Unreadable),
            }
        }
        Err(_) => Err(LockState::Unreadable),
    }
}

fn is_process_running(pid: u32) -> bool {
    std::process::Command::new("kill")
        .arg("-0")
        .arg(pid.to_string())
        .status()
        .is_ok_and(|status| status.success())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquires_and_releases_lock_file() {
        let temp = tempfile::tempdir().expect("tempdir should create");
        let lock_path = temp.path().join(".whys/session.lock");

        let guard = try_acquire(&lock_path).expect("lock should acquire");
        assert!(lock_path.is_file());
        drop(guard);
        assert!(!lock_path.exists());
    }

    #[test]
    fn live_holder_blocks_second_acquire() {
        let temp = tempfile::tempdir().expect("tempdir should create");
        let lock_path = temp.path().join(".whys/session.lock");

        let _guard = try_acquire(&lock_path).expect("lock should acquire");
        let err = try_acquire(&lock_path).unwrap_err();
        assert_eq!(err, LockState::HeldBy(std::process::id()));
    }

    #[tokio::test]
    async fn unreadable_pid_lock_is_not_stolen() {
        let temp = tempfile::tempdir().expect("tempdir should create");
        let lock_path = temp.path().join(".whys/session.lock");
        std::fs::create_dir_all(lock_path.parent().unwrap()).unwrap();
        std::fs::write(&lock_path, "not-a-pid\n").unwrap();

        assert_eq!(try_acquire(&lock_path).unwrap_err(), LockState::Unreadable);
        assert!(lock_path.exists());
    }
}
