//! Foundation types shared by every layer.
//!
//! - [`FileId`], [`FileSystem`], [`MemoryFs`], [`DiskFs`] - the virtual file system
//! - [`TextRange`], [`TextSize`] - byte positions
//! - [`LineCol`], [`LineIndex`] - line/column conversion
//!
//! This module has NO dependencies on other xref modules.

mod span;
mod vfs;

pub use span::{LineCol, LineIndex, TextRange, TextSize};
pub use vfs::{DiskFs, FileId, FileSystem, MemoryFs};

// Re-export text-size types for convenience
pub use text_size;
