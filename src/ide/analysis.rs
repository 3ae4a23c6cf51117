//! `AnalysisHost` owns the project state; `Analysis` is a read-only
//! snapshot answering requests.
//!
//! ```ignore
//! let mut host = AnalysisHost::new(ProjectContext::new("/app", XrefConfig::default()));
//! let file = host.set_file_content("/app/lib/main.dart", "final t = S.current.title;");
//!
//! let analysis = host.analysis();
//! let folds = analysis.folding_ranges(file);
//! ```

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use rayon::prelude::*;

use super::context::ResolveCtx;
use super::document_links::{DocumentLink, document_links};
use super::folding::{FoldingRange, folding_ranges};
use super::goto::{GotoTarget, goto_definition};
use super::imports::{ImportFix, ImportFixState, SuggestionIndex};
use crate::base::{FileId, FileSystem, LineIndex, MemoryFs, TextRange, TextSize};
use crate::hir::{DeclIndex, Diagnostic, TreeResolver, check_file, codes};
use crate::project::ProjectContext;
use crate::syntax::{Parse, SyntaxNode, parse};

/// Extension of the analyzed source files.
pub const SOURCE_EXTENSION: &str = "dart";

/// Owns every buffer, parse and suggestion index of one project.
///
/// Mutation happens only through `&mut self`, so an import insertion can
/// never race a snapshot taken with [`AnalysisHost::analysis`].
#[derive(Debug)]
pub struct AnalysisHost {
    fs: MemoryFs,
    parses: IndexMap<FileId, Parse>,
    project: ProjectContext,
    /// Module root -> suggestions for files under it.
    suggestions: IndexMap<PathBuf, SuggestionIndex>,
}

impl AnalysisHost {
    pub fn new(project: ProjectContext) -> Self {
        Self {
            fs: MemoryFs::new(),
            parses: IndexMap::new(),
            project,
            suggestions: IndexMap::new(),
        }
    }

    pub fn project(&self) -> &ProjectContext {
        &self.project
    }

    pub fn set_project(&mut self, project: ProjectContext) {
        self.project = project;
    }

    pub fn fs(&self) -> &MemoryFs {
        &self.fs
    }

    /// Set the text of `path`. Source files are parsed immediately.
    pub fn set_file_content(&mut self, path: impl AsRef<Path>, text: &str) -> FileId {
        let path = path.as_ref();
        let file = self.fs.insert(path, text);
        if is_source(path) {
            self.parses.insert(file, parse(text));
        } else {
            self.parses.shift_remove(&file);
        }
        file
    }

    /// Set the text of a source file parsed elsewhere.
    pub fn set_parsed_file(&mut self, path: impl AsRef<Path>, text: &str, parse: Parse) -> FileId {
        let file = self.fs.insert(path, text);
        self.parses.insert(file, parse);
        file
    }

    /// Register a binary resource. Only its existence is ever queried.
    pub fn add_resource(&mut self, path: impl AsRef<Path>) -> FileId {
        self.fs.insert(path, "")
    }

    pub fn remove_file(&mut self, path: &Path) {
        if let Some(file) = self.fs.lookup(path) {
            self.parses.shift_remove(&file);
            self.fs.remove(file);
        }
    }

    pub fn file_id(&self, path: &Path) -> Option<FileId> {
        self.fs.lookup(path)
    }

    /// Source files, in insertion order.
    pub fn source_files(&self) -> impl Iterator<Item = FileId> + '_ {
        self.parses.keys().copied()
    }

    /// Install the suggestion index for files under `module_root`.
    pub fn set_suggestions(&mut self, module_root: impl Into<PathBuf>, index: SuggestionIndex) {
        self.suggestions.insert(module_root.into(), index);
    }

    /// The index of the innermost module containing `path`.
    pub fn suggestions_for(&self, path: &Path) -> Option<&SuggestionIndex> {
        self.suggestions
            .iter()
            .filter(|(root, _)| path.starts_with(root))
            .max_by_key(|(root, _)| root.components().count())
            .map(|(_, index)| index)
    }

    /// A snapshot over the current parses.
    pub fn analysis(&self) -> Analysis<'_> {
        let mut index = DeclIndex::new();
        for (&file, parse) in &self.parses {
            index.add_file(file, parse.syntax_node());
        }
        Analysis { host: self, index }
    }

    /// Apply a ready import fix to its file and reparse it.
    ///
    /// The file text is re-checked under the buffer's write lock, so applying
    /// the same fix twice, or two fixes for the same import, inserts one line.
    pub fn apply_import_fix(&mut self, fix: &mut ImportFix) -> bool {
        let file = fix.diagnostic.file;
        if !matches!(fix.state(), ImportFixState::EditReady(_)) {
            return false;
        }
        let inserted = self.fs.edit(file, |text| fix.apply(text));
        if inserted {
            if let Some(text) = self.fs.contents(file) {
                self.parses.insert(file, parse(&text));
            }
            tracing::debug!(file = ?file, "applied import fix");
        }
        inserted
    }

    /// Folding ranges of every source file, computed in parallel.
    ///
    /// Syntax nodes are thread-local, so each worker builds its own
    /// snapshot from the shared green trees.
    pub fn fold_all_files(&self) -> Vec<(FileId, Vec<FoldingRange>)> {
        let files: Vec<FileId> = self.source_files().collect();
        files
            .into_par_iter()
            .map_init(|| self.analysis(), |analysis, file| (file, analysis.folding_ranges(file)))
            .collect()
    }
}

fn is_source(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION)
}

/// Read-only view of an [`AnalysisHost`] answering IDE requests.
pub struct Analysis<'a> {
    host: &'a AnalysisHost,
    index: DeclIndex,
}

impl<'a> Analysis<'a> {
    pub fn index(&self) -> &DeclIndex {
        &self.index
    }

    pub fn file_path(&self, file: FileId) -> Option<PathBuf> {
        self.host.fs.path(file)
    }

    pub fn root(&self, file: FileId) -> Option<&SyntaxNode> {
        self.index.root(file)
    }

    pub fn line_index(&self, file: FileId) -> Option<LineIndex> {
        self.host.fs.contents(file).map(|text| LineIndex::new(&text))
    }

    /// Run `f` with a resolution context for `file`.
    fn with_ctx<T>(&self, file: FileId, f: impl FnOnce(&ResolveCtx<'_>, &SyntaxNode) -> T) -> Option<T> {
        let root = self.index.root(file)?;
        let path = self.file_path(file)?;
        let resolver = TreeResolver::new(&self.index);
        let fs: &dyn FileSystem = &self.host.fs;
        let cx = ResolveCtx::new(&self.host.project, fs, &resolver, &path);
        Some(f(&cx, root))
    }

    pub fn goto_definition(&self, file: FileId, offset: TextSize) -> Option<GotoTarget> {
        self.with_ctx(file, |cx, root| goto_definition(cx, &self.index, root, offset))
            .flatten()
    }

    pub fn folding_ranges(&self, file: FileId) -> Vec<FoldingRange> {
        let Some(lines) = self.line_index(file) else {
            return Vec::new();
        };
        self.with_ctx(file, |cx, root| folding_ranges(cx, root, &lines))
            .unwrap_or_default()
    }

    pub fn document_links(&self, file: FileId) -> Vec<DocumentLink> {
        let Some(lines) = self.line_index(file) else {
            return Vec::new();
        };
        self.with_ctx(file, |cx, root| document_links(cx, root, &lines))
            .unwrap_or_default()
    }

    /// Syntax errors and unresolved references of `file`.
    ///
    /// The parser covers only the constructs resolution needs, so its
    /// recovery points are reported as warnings.
    pub fn diagnostics(&self, file: FileId) -> Vec<Diagnostic> {
        let (Some(parse), Some(root)) = (self.host.parses.get(&file), self.index.root(file)) else {
            return Vec::new();
        };
        let mut diagnostics: Vec<Diagnostic> = parse
            .errors()
            .iter()
            .map(|err| {
                Diagnostic::warning(file, TextRange::empty(err.offset), "", err.message.as_str())
                    .with_code(codes::SYNTAX_ERROR)
            })
            .collect();
        diagnostics.extend(check_file(file, root, &TreeResolver::new(&self.index)));
        diagnostics
    }

    /// Checked import fixes for the unresolved references of `file`.
    ///
    /// Fixes in every state are returned; callers apply the `EditReady` ones
    /// through [`AnalysisHost::apply_import_fix`].
    pub fn import_fixes(&self, file: FileId) -> Vec<ImportFix> {
        let (Some(root), Some(path)) = (self.index.root(file), self.file_path(file)) else {
            return Vec::new();
        };
        let empty = SuggestionIndex::new();
        let suggestions = self.host.suggestions_for(&path).unwrap_or(&empty);

        self.diagnostics(file)
            .into_iter()
            .filter(Diagnostic::is_unresolved_reference)
            .map(|diagnostic| {
                let mut fix = ImportFix::new(diagnostic);
                fix.check(root, suggestions);
                fix
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hir::Severity;
    use crate::project::XrefConfig;

    fn host() -> AnalysisHost {
        let mut host = AnalysisHost::new(ProjectContext::new("/app", XrefConfig::default()));
        host.set_file_content("/app/lib/l10n/intl_en.arb", r#"{ "title": "Home" }"#);
        host.set_file_content(
            "/app/lib/main.dart",
            "import 'package:flutter/material.dart';\n\nfinal w = HomePage(S.current.title);\n",
        );
        host.set_suggestions("/app", [("HomePage", "package:app/home.dart")].into_iter().collect());
        host
    }

    #[test]
    fn test_source_files_only_are_parsed() {
        let host = host();
        assert_eq!(host.source_files().count(), 1);
        assert!(host.fs().exists(Path::new("/app/lib/l10n/intl_en.arb")));
    }

    #[test]
    fn test_import_fix_applies_once() {
        let mut host = host();
        let file = host.file_id(Path::new("/app/lib/main.dart")).unwrap();

        let mut fixes = host.analysis().import_fixes(file);
        assert_eq!(fixes.len(), 1);
        assert!(matches!(fixes[0].state(), ImportFixState::EditReady(_)));

        let mut stale = fixes[0].clone();
        assert!(host.apply_import_fix(&mut fixes[0]));
        assert!(!host.apply_import_fix(&mut fixes[0]));
        assert!(!host.apply_import_fix(&mut stale));

        let text = host.fs().contents(file).unwrap();
        assert_eq!(text.matches("import 'package:app/home.dart';").count(), 1);

        // The reparsed file now carries the import, so no new fix is proposed.
        let fixes = host.analysis().import_fixes(file);
        assert!(matches!(fixes[0].state(), ImportFixState::AlreadyImported));
    }

    #[test]
    fn test_suggestions_by_innermost_module() {
        let mut host = host();
        host.set_suggestions("/app/example", SuggestionIndex::new());

        assert_eq!(host.suggestions_for(Path::new("/app/lib/a.dart")).map(|i| i.len()), Some(1));
        assert_eq!(host.suggestions_for(Path::new("/app/example/a.dart")).map(|i| i.len()), Some(0));
        assert!(host.suggestions_for(Path::new("/other/a.dart")).is_none());
    }

    #[test]
    fn test_fold_all_files_matches_serial() {
        let mut host = host();
        host.set_file_content("/app/lib/b.dart", "final a = S.current.title;\nfinal b = S.current.title;");
        let parallel = host.fold_all_files();
        let analysis = host.analysis();

        assert_eq!(parallel.len(), 2);
        for (file, folds) in parallel {
            assert_eq!(folds, analysis.folding_ranges(file));
        }
    }

    #[test]
    fn test_diagnostics_by_severity() {
        let mut host = host();
        let file = host.set_file_content("/app/lib/broken.dart", "class Broken {\n  final w = Missing();\n");
        let diagnostics = host.analysis().diagnostics(file);

        let syntax: Vec<_> = diagnostics
            .iter()
            .filter(|d| d.code.as_deref() == Some(codes::SYNTAX_ERROR))
            .collect();
        assert!(!syntax.is_empty());
        assert!(syntax.iter().all(|d| d.severity == Severity::Warning));

        let unresolved: Vec<_> = diagnostics.iter().filter(|d| d.is_unresolved_reference()).collect();
        assert_eq!(unresolved.len(), 1);
        assert_eq!(unresolved[0].severity, Severity::Error);
        assert_eq!(unresolved[0].symbol, "Missing()");
    }

    #[test]
    fn test_remove_file() {
        let mut host = host();
        host.remove_file(Path::new("/app/lib/main.dart"));
        assert_eq!(host.source_files().count(), 0);
        assert!(host.file_id(Path::new("/app/lib/main.dart")).is_none());
    }
}
