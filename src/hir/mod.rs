//! Semantic layer: declaration index, name resolution and diagnostics.
//!
//! ```text
//! DeclIndex      → top-level declarations of every file, by name
//!   ↓
//! TreeResolver   → NAME_REF → declaring node (SymbolResolver)
//!   ↓
//! check_file     → unresolved-reference diagnostics
//! ```

mod diagnostics;
mod index;
mod resolve;

pub use diagnostics::{
    Diagnostic, DiagnosticCollector, ReferenceChecker, Severity, check_file, codes,
};
pub use index::{DeclIndex, class_members, find_member, top_level_decls};
pub use resolve::{SymbolResolver, TreeResolver, enclosing_class};
