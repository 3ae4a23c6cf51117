//! Everything a single resolution call may consult.

use std::path::Path;

use crate::base::FileSystem;
use crate::hir::SymbolResolver;
use crate::project::ProjectContext;

/// Borrowed inputs of one resolution call.
///
/// Nothing here is mutated. A context is cheap to build and is built per
/// request.
#[derive(Clone, Copy)]
pub struct ResolveCtx<'a> {
    pub project: &'a ProjectContext,
    pub fs: &'a dyn FileSystem,
    pub symbols: &'a dyn SymbolResolver,
    /// Path of the file the node under resolution comes from.
    pub file_path: &'a Path,
}

impl<'a> ResolveCtx<'a> {
    pub fn new(
        project: &'a ProjectContext,
        fs: &'a dyn FileSystem,
        symbols: &'a dyn SymbolResolver,
        file_path: &'a Path,
    ) -> Self {
        Self {
            project,
            fs,
            symbols,
            file_path,
        }
    }

    /// `None` for projects the resolvers do not understand.
    pub(crate) fn recognized(&self) -> Option<()> {
        self.project.is_recognized().then_some(())
    }
}
