//! Shared setup for resolver unit tests.

use std::path::{Path, PathBuf};

use crate::base::{FileId, MemoryFs};
use crate::hir::{DeclIndex, TreeResolver};
use crate::ide::ResolveCtx;
use crate::project::{ProjectContext, XrefConfig};
use crate::syntax::{SyntaxKind, SyntaxNode, parse};

pub(crate) const ROOT: &str = "/app";

/// An in-memory project rooted at [`ROOT`]. Dart files are parsed and
/// indexed, everything else is only stored.
pub(crate) struct Fixture {
    pub fs: MemoryFs,
    pub project: ProjectContext,
    pub index: DeclIndex,
}

impl Fixture {
    pub fn new(files: &[(&str, &str)]) -> Self {
        Self::with_config(XrefConfig::default(), files)
    }

    pub fn with_config(config: XrefConfig, files: &[(&str, &str)]) -> Self {
        let fs = MemoryFs::new();
        let mut index = DeclIndex::new();
        for (path, text) in files {
            let file = fs.insert(Path::new(ROOT).join(path), *text);
            if path.ends_with(".dart") {
                index.add_file(file, parse(text).syntax_node());
            }
        }
        Self {
            fs,
            project: ProjectContext::new(ROOT, config),
            index,
        }
    }

    pub fn resolver(&self) -> TreeResolver<'_> {
        TreeResolver::new(&self.index)
    }

    pub fn path(&self, path: &str) -> PathBuf {
        Path::new(ROOT).join(path)
    }

    pub fn ctx<'a>(&'a self, path: &'a Path, resolver: &'a TreeResolver<'a>) -> ResolveCtx<'a> {
        ResolveCtx::new(&self.project, &self.fs, resolver, path)
    }

    fn root(&self, path: &str) -> &SyntaxNode {
        let file: FileId = self.fs.lookup(&self.path(path)).unwrap();
        self.index.root(file).unwrap()
    }

    /// The first node of `kind` in `path` whose text is `text`.
    pub fn find(&self, path: &str, kind: SyntaxKind, text: &str) -> SyntaxNode {
        self.root(path)
            .descendants()
            .find(|n| n.kind() == kind && n.text() == text)
            .unwrap_or_else(|| panic!("no {kind:?} `{text}` in {path}"))
    }

    /// Like [`Fixture::find`], but the last match.
    pub fn find_last(&self, path: &str, kind: SyntaxKind, text: &str) -> SyntaxNode {
        self.root(path)
            .descendants()
            .filter(|n| n.kind() == kind && n.text() == text)
            .last()
            .unwrap_or_else(|| panic!("no {kind:?} `{text}` in {path}"))
    }
}
