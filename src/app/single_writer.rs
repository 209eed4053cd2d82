//! Single-writer advisory lock for SQLite. A second process on the same
//! database file exits with a clear error instead of contending for writes.

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::mpsc;
use std::thread;

const ALREADY_RUNNING: &str = "Another instance of prodtrack is already using this database. Stop it first or use a different DATABASE_URL.";

/// Lock file next to the database file: `<db file>.lock`. In-memory databases need no lock.
fn lock_path(url: &str) -> Result<Option<PathBuf>, String> {
    if url.contains(":memory:") {
        return Ok(None);
    }

    let options = sqlx::sqlite::SqliteConnectOptions::from_str(url)
        .map_err(|e| format!("DATABASE_URL: {}", e))?;
    let db_file = options.get_filename().to_path_buf();
    let display = db_file.to_string_lossy();
    if display.is_empty() || display.contains(":memory:") {
        return Ok(None);
    }

    let name = db_file
        .file_name()
        .map(|n| format!("{}.lock", n.to_string_lossy()))
        .unwrap_or_else(|| "db.lock".into());
    Ok(Some(
        db_file
            .parent()
            .map(|dir| dir.join(&name))
            .unwrap_or_else(|| PathBuf::from(name)),
    ))
}

/// Take the lock for `url`. `Ok(None)` when the database needs no lock.
/// The lock is held by a dedicated thread until the guard is dropped.
pub fn acquire(url: &str) -> Result<Option<SingleWriterGuard>, String> {
    let Some(path) = lock_path(url)? else {
        return Ok(None);
    };

    let file = std::fs::OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&path)
        .map_err(|e| format!("Lock file {}: {}", path.display(), e))?;

    let (result_tx, result_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel::<()>();
    let join = thread::spawn(move || {
        let mut lock = fd_lock::RwLock::new(file);
        let guard = lock.try_write();
        match &guard {
            Ok(_) => {
                let _ = result_tx.send(Ok(()));
                let _ = release_rx.recv();
            }
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                let _ = result_tx.send(Err(ALREADY_RUNNING.to_string()));
            }
            Err(e) => {
                let _ = result_tx.send(Err(e.to_string()));
            }
        }
        drop(guard);
    });

    result_rx
        .recv()
        .map_err(|_| "Lock thread exited without reporting".to_string())??;

    tracing::debug!(lock_file = %path.display(), "acquired single-writer lock");
    Ok(Some(SingleWriterGuard {
        release_tx,
        join: Some(join),
    }))
}

/// Releases the lock on drop.
pub struct SingleWriterGuard {
    release_tx: mpsc::Sender<()>,
    join: Option<thread::JoinHandle<()>>,
}

impl Drop for SingleWriterGuard {
    fn drop(&mut self) {
        let _ = self.release_tx.send(());
        if let Some(handle) = self.join.take() {
            let _ = handle.join();
        }
    }
}
