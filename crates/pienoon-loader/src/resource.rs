//! The resource contract and two ready-made resources.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::{debug, warn};

/// Something that loads in two phases: slow work on the worker thread, then
/// a cheap hand-off on the thread that calls
/// [`AsyncLoader::try_finalize`](crate::AsyncLoader::try_finalize).
///
/// Both phases take `&self`; implementations keep their state behind interior
/// mutability. Failures are the resource's own business: record them and
/// leave the resource in a state callers can inspect.
pub trait AsyncResource: Send + Sync {
    /// Identity of the resource, used in logs.
    fn filename(&self) -> &str;

    /// Do the slow part. Runs on the worker thread.
    fn load(&self);

    /// Publish the result. Runs on the finalizing thread, after `load`.
    fn finalize(&self);
}

/// A resource built from two closures.
pub struct FnResource<L, F> {
    filename: String,
    load: L,
    finalize: F,
}

impl<L, F> FnResource<L, F>
where
    L: Fn() + Send + Sync,
    F: Fn() + Send + Sync,
{
    /// Create a resource that calls `load` and `finalize`.
    pub fn new(filename: impl Into<String>, load: L, finalize: F) -> Self {
        Self {
            filename: filename.into(),
            load,
            finalize,
        }
    }
}

impl<L, F> AsyncResource for FnResource<L, F>
where
    L: Fn() + Send + Sync,
    F: Fn() + Send + Sync,
{
    fn filename(&self) -> &str {
        &self.filename
    }

    fn load(&self) {
        (self.load)();
    }

    fn finalize(&self) {
        (self.finalize)();
    }
}

impl<L, F> fmt::Debug for FnResource<L, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnResource")
            .field("filename", &self.filename)
            .finish_non_exhaustive()
    }
}

/// Where a [`FileResource`] is in its life.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    /// Queued, not yet read.
    Pending,
    /// Read on the worker; waiting for finalize.
    Loaded,
    /// Finalized with this many bytes available.
    Ready(usize),
    /// The read failed; the message is kept for reporting.
    Failed(String),
}

#[derive(Debug)]
struct FileState {
    status: FileStatus,
    data: Vec<u8>,
}

/// Reads a whole file on the worker thread.
///
/// The bytes become visible through [`FileResource::data`] only after
/// finalize, so the main thread never sees a half-published resource.
#[derive(Debug)]
pub struct FileResource {
    path: PathBuf,
    filename: String,
    state: Mutex<FileState>,
}

impl FileResource {
    /// Create a resource for the file at `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        Self {
            filename: path.display().to_string(),
            path,
            state: Mutex::new(FileState {
                status: FileStatus::Pending,
                data: Vec::new(),
            }),
        }
    }

    /// Path of the file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current status.
    pub fn status(&self) -> FileStatus {
        self.state.lock().status.clone()
    }

    /// The file's bytes, once finalized.
    pub fn data(&self) -> Option<Vec<u8>> {
        let state = self.state.lock();
        match state.status {
            FileStatus::Ready(_) => Some(state.data.clone()),
            _ => None,
        }
    }
}

impl AsyncResource for FileResource {
    fn filename(&self) -> &str {
        &self.filename
    }

    fn load(&self) {
        // Read outside the lock so status() stays responsive.
        let result = fs::read(&self.path);
        let mut state = self.state.lock();
        match result {
            Ok(data) => {
                debug!(file = %self.filename, bytes = data.len(), "read file");
                state.data = data;
                state.status = FileStatus::Loaded;
            }
            Err(e) => {
                warn!(file = %self.filename, error = %e, "failed to read file");
                state.status = FileStatus::Failed(e.to_string());
            }
        }
    }

    fn finalize(&self) {
        let mut state = self.state.lock();
        if state.status == FileStatus::Loaded {
            state.status = FileStatus::Ready(state.data.len());
        }
    }
}
