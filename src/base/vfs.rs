//! The virtual file system resolvers read through.
//!
//! Resolution only ever asks two questions of the file system: does a path
//! exist, and what is its current text. [`FileSystem`] captures exactly that,
//! so the same resolver code runs against the editor's in-memory buffers
//! ([`MemoryFs`]) or the disk ([`DiskFs`]).

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;

/// A stable handle for a file registered in a [`MemoryFs`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct FileId(pub u32);

impl FileId {
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileId({})", self.0)
    }
}

/// Read-only view of a file system keyed by path.
pub trait FileSystem: Send + Sync {
    /// Whether a file (not a directory) exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Current text of the file at `path`.
    fn read(&self, path: &Path) -> Option<Arc<str>>;
}

/// In-memory file system holding the host's current buffers.
///
/// Binary resources (images) are registered with empty contents: resolvers
/// only test them for existence.
#[derive(Debug, Default)]
pub struct MemoryFs {
    inner: RwLock<MemoryFsInner>,
}

#[derive(Debug, Default)]
struct MemoryFsInner {
    path_to_id: IndexMap<PathBuf, FileId>,
    id_to_path: IndexMap<FileId, PathBuf>,
    contents: IndexMap<FileId, Arc<str>>,
    next_id: u32,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or assign the [`FileId`] for `path`.
    pub fn file_id(&self, path: &Path) -> FileId {
        if let Some(&id) = self.inner.read().path_to_id.get(path) {
            return id;
        }

        let mut inner = self.inner.write();
        if let Some(&id) = inner.path_to_id.get(path) {
            return id;
        }
        let id = FileId::new(inner.next_id);
        inner.next_id += 1;
        inner.path_to_id.insert(path.to_owned(), id);
        inner.id_to_path.insert(id, path.to_owned());
        id
    }

    /// Register `path` with `contents`, replacing any previous text.
    pub fn insert(&self, path: impl AsRef<Path>, contents: impl Into<Arc<str>>) -> FileId {
        let id = self.file_id(path.as_ref());
        self.set_contents(id, contents);
        id
    }

    /// The id of an already registered path.
    pub fn lookup(&self, path: &Path) -> Option<FileId> {
        self.inner.read().path_to_id.get(path).copied()
    }

    pub fn path(&self, file: FileId) -> Option<PathBuf> {
        self.inner.read().id_to_path.get(&file).cloned()
    }

    pub fn set_contents(&self, file: FileId, contents: impl Into<Arc<str>>) {
        self.inner.write().contents.insert(file, contents.into());
    }

    pub fn contents(&self, file: FileId) -> Option<Arc<str>> {
        self.inner.read().contents.get(&file).cloned()
    }

    /// Run `edit` against the text of `file` under the write lock.
    ///
    /// The new text is stored only when `edit` returns `true`, so a rejected
    /// edit leaves the buffer untouched.
    pub fn edit(&self, file: FileId, edit: impl FnOnce(&mut String) -> bool) -> bool {
        let mut inner = self.inner.write();
        let Some(current) = inner.contents.get(&file) else {
            return false;
        };
        let mut text = current.to_string();
        if !edit(&mut text) {
            return false;
        }
        inner.contents.insert(file, Arc::from(text));
        true
    }

    pub fn remove(&self, file: FileId) {
        let mut inner = self.inner.write();
        if let Some(path) = inner.id_to_path.swap_remove(&file) {
            inner.path_to_id.swap_remove(&path);
        }
        inner.contents.swap_remove(&file);
    }

    /// All registered files, in registration order.
    pub fn files(&self) -> Vec<FileId> {
        self.inner.read().id_to_path.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.read().path_to_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FileSystem for MemoryFs {
    fn exists(&self, path: &Path) -> bool {
        self.inner.read().path_to_id.contains_key(path)
    }

    fn read(&self, path: &Path) -> Option<Arc<str>> {
        let inner = self.inner.read();
        let id = inner.path_to_id.get(path)?;
        inner.contents.get(id).cloned()
    }
}

/// The real file system.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiskFs;

impl FileSystem for DiskFs {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read(&self, path: &Path) -> Option<Arc<str>> {
        std::fs::read_to_string(path).ok().map(Arc::from)
    }
}
