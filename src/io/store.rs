use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, error, warn};

use crate::model::TaskList;

/// File name of the task store inside its directory
pub const STORE_FILE_NAME: &str = "task.json";

/// Error type for store writes. Reads never fail; see [`TaskStore::load`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not create {path}: {source}")]
    Create {
        path: PathBuf,
        source: io::Error,
    },
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        source: io::Error,
    },
    #[error("could not serialize tasks: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Handle on the JSON file that holds the task list.
///
/// Each CLI invocation builds one of these, loads once, and saves at most
/// once. There is no locking: two processes saving at the same time race
/// and the last writer wins.
#[derive(Debug, Clone)]
pub struct TaskStore {
    path: PathBuf,
}

impl TaskStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TaskStore { path: path.into() }
    }

    /// Store at `dir/task.json`
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(STORE_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where a corrupt file is copied before it can be overwritten
    pub fn backup_path(&self) -> PathBuf {
        self.path.with_extension("json.bak")
    }

    /// Create the file holding an empty array if it does not exist yet.
    pub fn ensure_exists(&self) -> Result<(), StoreError> {
        if self.path.exists() {
            return Ok(());
        }
        debug!(path = %self.path.display(), "creating empty task file");
        fs::write(&self.path, "[]").map_err(|e| StoreError::Create {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Read the task list.
    ///
    /// A missing, empty, unreadable or unparsable file yields an empty list.
    /// Corrupt content is backed up to [`backup_path`](Self::backup_path)
    /// first so that the next save does not destroy it without a trace.
    pub fn load(&self) -> TaskList {
        let content = match fs::read(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return TaskList::default(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "could not read task file");
                return TaskList::default();
            }
        };
        if content.iter().all(u8::is_ascii_whitespace) {
            return TaskList::default();
        }

        // Invalid UTF-8 surfaces here too, so it takes the backup path
        match serde_json::from_slice::<TaskList>(&content) {
            Ok(list) => list,
            Err(e) => {
                let bak = self.backup_path();
                match fs::copy(&self.path, &bak) {
                    Ok(_) => warn!(
                        path = %self.path.display(),
                        backup = %bak.display(),
                        error = %e,
                        "could not parse task file, starting empty"
                    ),
                    Err(copy_err) => warn!(
                        path = %self.path.display(),
                        error = %e,
                        backup_error = %copy_err,
                        "could not parse task file or back it up, starting empty"
                    ),
                }
                TaskList::default()
            }
        }
    }

    /// Replace the file with the pretty-printed list (2-space indent, no
    /// trailing newline, the same bytes `ensure_exists` writes for `[]`).
    pub fn save(&self, list: &TaskList) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(list)?;
        if let Err(e) = atomic_write(&self.path, content.as_bytes()) {
            error!(path = %self.path.display(), error = %e, "could not save tasks");
            return Err(StoreError::Write {
                path: self.path.clone(),
                source: e,
            });
        }
        debug!(path = %self.path.display(), count = list.len(), "saved tasks");
        Ok(())
    }
}

/// Write through a temp file in the same directory, then rename over `path`.
///
/// An existing file keeps its permissions.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    if let Ok(meta) = fs::metadata(path) {
        tmp.as_file().set_permissions(meta.permissions())?;
    }
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
