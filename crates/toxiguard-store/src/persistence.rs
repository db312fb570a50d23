//! File-backed comment persistence
//!
//! Comments are stored as JSON lines in a single append-only file:
//! - Each append writes one complete line and flushes it before the record
//!   becomes visible to readers
//! - A failed write is truncated away so a torn line never survives
//! - Lines that fail to parse at load time are skipped

use crate::store::{CommentStore, MemoryCommentStore};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use toxiguard_core::{CommentId, CommentRecord, Error, Result};
use tracing::{debug, info, warn};

/// Which store implementation to open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Records are lost on shutdown
    Memory,
    /// JSON-lines file
    #[default]
    Jsonl,
}

/// Configuration for comment persistence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Backend to use
    #[serde(default)]
    pub backend: StoreBackend,

    /// Path of the JSON-lines file
    #[serde(default = "default_path")]
    pub path: PathBuf,

    /// `fsync` after every append
    #[serde(default)]
    pub fsync: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            path: default_path(),
            fsync: false,
        }
    }
}

fn default_path() -> PathBuf {
    PathBuf::from("./data/comments.jsonl")
}

/// Open the configured store
pub fn open_store(config: &StoreConfig) -> Result<Arc<dyn CommentStore>> {
    match config.backend {
        StoreBackend::Memory => {
            info!("Using in-memory comment store");
            Ok(Arc::new(MemoryCommentStore::new()))
        }
        StoreBackend::Jsonl => Ok(Arc::new(JsonlCommentStore::open(config)?)),
    }
}

struct FileState {
    file: File,
    len: u64,
}

/// Append-only JSON-lines comment store.
///
/// The full contents are mirrored in memory; the file is only read once at
/// open. Writers are serialised by the file mutex.
pub struct JsonlCommentStore {
    path: PathBuf,
    fsync: bool,
    file: Mutex<FileState>,
    records: RwLock<Vec<CommentRecord>>,
    ids: RwLock<HashSet<CommentId>>,
}

impl JsonlCommentStore {
    /// Open (or create) the store file and load existing records
    pub fn open(config: &StoreConfig) -> Result<Self> {
        let path = config.path.clone();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let records = load_records(&path)?;
        let ids = records.iter().map(|r| r.id).collect();

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&path)?;
        let len = terminate_last_line(&mut file)?;

        info!(
            path = %path.display(),
            records = records.len(),
            "Opened comment store"
        );

        Ok(Self {
            path,
            fsync: config.fsync,
            file: Mutex::new(FileState { file, len }),
            records: RwLock::new(records),
            ids: RwLock::new(ids),
        })
    }

    /// Open a store at `path` with default settings
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::open(&StoreConfig {
            backend: StoreBackend::Jsonl,
            path: path.as_ref().to_path_buf(),
            fsync: false,
        })
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CommentStore for JsonlCommentStore {
    fn append(&self, record: CommentRecord) -> Result<CommentId> {
        let mut line = serde_json::to_vec(&record)
            .map_err(|e| Error::store_write(format!("failed to encode comment: {e}")))?;
        line.push(b'\n');

        let mut state = self.file.lock();
        if self.ids.read().contains(&record.id) {
            return Err(Error::store_write(format!("duplicate comment id {}", record.id)));
        }

        let mut writer = &state.file;
        if let Err(e) = write_or_rollback(&state.file, &mut writer, state.len, &line, self.fsync) {
            warn!(error = %e, path = %self.path.display(), "Comment write failed");
            return Err(Error::store_write(e.to_string()));
        }
        state.len += line.len() as u64;

        let id = record.id;
        self.ids.write().insert(id);
        self.records.write().push(record);
        metrics::counter!("toxiguard_store_appends_total", "backend" => "jsonl").increment(1);
        debug!(id = %id, "Appended comment");

        Ok(id)
    }

    fn list_all(&self) -> Result<Vec<CommentRecord>> {
        Ok(self.records.read().clone())
    }

    fn filter_by(&self, predicate: &dyn Fn(&CommentRecord) -> bool) -> Result<Vec<CommentRecord>> {
        Ok(self
            .records
            .read()
            .iter()
            .filter(|record| predicate(*record))
            .cloned()
            .collect())
    }

    fn count(&self) -> Result<usize> {
        Ok(self.records.read().len())
    }
}

/// Write one line through `writer`; on failure cut `file` back to `len`
fn write_or_rollback<W: Write>(
    file: &File,
    writer: &mut W,
    len: u64,
    line: &[u8],
    fsync: bool,
) -> std::io::Result<()> {
    let written = writer
        .write_all(line)
        .and_then(|_| writer.flush())
        .and_then(|_| if fsync { file.sync_data() } else { Ok(()) });

    if written.is_err() {
        if let Err(trunc) = file.set_len(len) {
            warn!(error = %trunc, "Failed to truncate torn comment line");
        }
    }
    written
}

fn load_records(path: &Path) -> Result<Vec<CommentRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)
        .map_err(|e| Error::store_read(format!("{}: {}", path.display(), e)))?;
    let reader = BufReader::new(file);

    let mut records = Vec::new();
    let mut seen = HashSet::new();
    for (number, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| Error::store_read(format!("{}: {}", path.display(), e)))?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<CommentRecord>(&line) {
            Ok(record) => {
                if seen.insert(record.id) {
                    records.push(record);
                } else {
                    warn!(line = number + 1, id = %record.id, "Skipping duplicate comment id");
                }
            }
            Err(e) => {
                warn!(line = number + 1, error = %e, "Skipping unreadable comment line");
            }
        }
    }

    Ok(records)
}

/// Make sure the next append starts on a fresh line; returns the file length
fn terminate_last_line(file: &mut File) -> std::io::Result<u64> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(0);
    }

    file.seek(SeekFrom::Start(len - 1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    if last[0] == b'\n' {
        return Ok(len);
    }

    file.write_all(b"\n")?;
    file.flush()?;
    Ok(len + 1)
}
