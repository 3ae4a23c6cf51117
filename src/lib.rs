//! # xref-base
//!
//! Cross-reference resolution for UI framework projects: image resource
//! chains, localization chains, route path literals and missing imports.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! ide      → resolvers, folding, links, goto-def, import fixes
//!   ↓
//! project  → project detection, configuration, loading from disk
//!   ↓
//! hir      → declaration index, symbol resolution, diagnostics
//!   ↓
//! syntax   → logos lexer + rowan tree + parser
//!   ↓
//! base     → primitives (FileId, TextRange, LineIndex, file systems)
//! ```

/// Foundation types: FileId, ranges, line index, virtual file system
pub mod base;

/// Semantic layer: declaration index, resolver, diagnostics
pub mod hir;

/// IDE features: reference resolvers and editor-facing results
pub mod ide;

/// Project detection, configuration and loading
pub mod project;

/// Lossless syntax tree
pub mod syntax;

// Re-export commonly needed items
pub use base::{FileId, FileSystem, LineCol, LineIndex, MemoryFs, TextRange, TextSize};
pub use ide::{Analysis, AnalysisHost};
pub use project::{ProjectContext, XrefConfig, load_project};
