//! Import quick fixes for unresolved references.
//!
//! A diagnostic moves through [`ImportFixState`] once:
//!
//! ```text
//! Unchecked ──check──> NoSuggestion | AlreadyImported | EditReady
//! EditReady ──apply──> Applied
//! ```

use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use text_size::TextSize;

use crate::hir::Diagnostic;
use crate::syntax::{SyntaxKind, SyntaxNode, parse};

/// A name some library exports, and the URI to import it from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Suggestion {
    pub name: SmolStr,
    pub library_uri: Option<SmolStr>,
}

impl Suggestion {
    pub fn new(name: impl Into<SmolStr>, library_uri: Option<&str>) -> Self {
        Self {
            name: name.into(),
            library_uri: library_uri.filter(|uri| !uri.is_empty()).map(SmolStr::new),
        }
    }
}

/// Exact-name lookup of [`Suggestion`]s for one module.
#[derive(Debug, Clone, Default)]
pub struct SuggestionIndex {
    by_name: FxHashMap<SmolStr, Suggestion>,
}

impl SuggestionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a suggestion. The first suggestion for a name wins.
    pub fn insert(&mut self, suggestion: Suggestion) {
        self.by_name.entry(suggestion.name.clone()).or_insert(suggestion);
    }

    pub fn lookup(&self, name: &str) -> Option<&Suggestion> {
        self.by_name.get(name)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl<N: Into<SmolStr>, U: AsRef<str>> FromIterator<(N, U)> for SuggestionIndex {
    fn from_iter<I: IntoIterator<Item = (N, U)>>(iter: I) -> Self {
        let mut index = Self::new();
        for (name, uri) in iter {
            index.insert(Suggestion::new(name, Some(uri.as_ref())));
        }
        index
    }
}

/// A single import line to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportEdit {
    /// Insertion point in the text the edit was computed against.
    pub offset: TextSize,
    /// The full line, newline included.
    pub text: String,
    pub uri: SmolStr,
    /// What the editor shows before applying.
    pub preview: String,
}

impl ImportEdit {
    /// The edit inserting `uri` at `offset`. `leading_newline` is set when
    /// the offset ends a line that has no newline yet.
    fn new(uri: &str, offset: TextSize, leading_newline: bool) -> Self {
        let line = format!("import '{uri}';");
        let text = if leading_newline {
            format!("\n{line}\n")
        } else {
            format!("{line}\n")
        };
        Self {
            offset,
            text,
            uri: SmolStr::new(uri),
            preview: format!("Add `{line}`"),
        }
    }
}

/// Where a diagnostic stands on its way to an import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportFixState {
    Unchecked,
    NoSuggestion,
    AlreadyImported,
    EditReady(ImportEdit),
    Applied,
}

/// The quick fix for one diagnostic instance.
#[derive(Debug, Clone)]
pub struct ImportFix {
    pub diagnostic: Diagnostic,
    state: ImportFixState,
}

impl ImportFix {
    pub fn new(diagnostic: Diagnostic) -> Self {
        Self {
            diagnostic,
            state: ImportFixState::Unchecked,
        }
    }

    pub fn state(&self) -> &ImportFixState {
        &self.state
    }

    /// Evaluate against the file tree. Only an unchecked fix moves.
    pub fn check(&mut self, tree: &SyntaxNode, index: &SuggestionIndex) -> &ImportFixState {
        if self.state == ImportFixState::Unchecked {
            self.state = classify(&self.diagnostic, tree, index);
        }
        &self.state
    }

    /// Apply a ready edit to `text`. Returns whether text was inserted.
    pub fn apply(&mut self, text: &mut String) -> bool {
        let ImportFixState::EditReady(edit) = &self.state else {
            return false;
        };
        let inserted = apply_import(text, edit);
        self.state = ImportFixState::Applied;
        inserted
    }
}

/// The name a diagnostic's symbol text refers to: `PageA(x)` -> `PageA`.
pub fn strip_call_suffix(symbol: &str) -> &str {
    symbol.split('(').next().unwrap_or(symbol).trim()
}

/// Propose an import for an unresolved-reference diagnostic.
pub fn suggest_import(
    diagnostic: &Diagnostic,
    tree: &SyntaxNode,
    index: &SuggestionIndex,
) -> Option<ImportEdit> {
    match classify(diagnostic, tree, index) {
        ImportFixState::EditReady(edit) => Some(edit),
        _ => None,
    }
}

fn classify(diagnostic: &Diagnostic, tree: &SyntaxNode, index: &SuggestionIndex) -> ImportFixState {
    if !diagnostic.is_unresolved_reference() {
        return ImportFixState::NoSuggestion;
    }
    let name = strip_call_suffix(&diagnostic.symbol);
    let Some(uri) = index.lookup(name).and_then(|s| s.library_uri.as_deref()) else {
        tracing::trace!(name, "no import suggestion");
        return ImportFixState::NoSuggestion;
    };
    if has_import(tree, uri) {
        return ImportFixState::AlreadyImported;
    }
    ImportFixState::EditReady(import_edit(tree, uri))
}

/// Whether `tree` already imports `uri`, in either quote style.
pub fn has_import(tree: &SyntaxNode, uri: &str) -> bool {
    let single = format!("'{uri}'");
    let double = format!("\"{uri}\"");
    tree.children()
        .filter(|item| item.kind() == SyntaxKind::IMPORT_DIRECTIVE)
        .filter_map(|import| {
            import
                .children()
                .find(|c| c.kind() == SyntaxKind::STRING_LITERAL)
        })
        .any(|literal| literal.text() == single.as_str() || literal.text() == double.as_str())
}

/// Start of the first item that is not a `library`, `import` or `export`
/// directive, or the end of the file.
///
/// A `part` directive ends the header: imports must precede it.
pub fn import_anchor(tree: &SyntaxNode) -> TextSize {
    tree.children()
        .find(|item| !is_import_header(item))
        .map_or_else(|| tree.text_range().end(), |item| item.text_range().start())
}

fn is_import_header(item: &SyntaxNode) -> bool {
    match item.kind() {
        SyntaxKind::IMPORT_DIRECTIVE => true,
        SyntaxKind::DIRECTIVE => item
            .first_token()
            .is_some_and(|token| token.kind() != SyntaxKind::PART_KW),
        _ => false,
    }
}

/// The edit importing `uri` into `tree`, anchored by [`import_anchor`].
fn import_edit(tree: &SyntaxNode, uri: &str) -> ImportEdit {
    let offset = import_anchor(tree);
    let unterminated = offset == tree.text_range().end()
        && tree
            .last_token()
            .is_some_and(|token| !token.text().ends_with('\n'));
    ImportEdit::new(uri, offset, unterminated)
}

/// Insert `edit` into `text` unless the import is already there.
///
/// The text is re-parsed first, so a stale edit neither duplicates an
/// import nor lands at an outdated offset.
pub fn apply_import(text: &mut String, edit: &ImportEdit) -> bool {
    let tree = parse(text).syntax_node();
    if has_import(&tree, &edit.uri) {
        tracing::debug!(uri = %edit.uri, "import already present");
        return false;
    }
    let fresh = import_edit(&tree, &edit.uri);
    text.insert_str(usize::from(fresh.offset), &fresh.text);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::FileId;
    use crate::hir::codes;
    use rstest::rstest;
    use text_size::TextRange;

    fn diagnostic(symbol: &str) -> Diagnostic {
        Diagnostic::error(FileId::new(0), TextRange::empty(0.into()), symbol, "undefined")
            .with_code(codes::UNDEFINED_REFERENCE)
    }

    fn index() -> SuggestionIndex {
        [
            ("HomePage", "package:app/pages/home.dart"),
            ("Blank", ""),
        ]
        .into_iter()
        .collect()
    }

    const SOURCE: &str = "import 'package:flutter/material.dart';\n\nclass App {}\n";

    #[rstest]
    #[case("HomePage()", "HomePage")]
    #[case("HomePage(title: 'x')", "HomePage")]
    #[case("HomePage", "HomePage")]
    fn test_strip_call_suffix(#[case] symbol: &str, #[case] name: &str) {
        assert_eq!(strip_call_suffix(symbol), name);
    }

    #[test]
    fn test_edit_before_first_item() {
        let tree = parse(SOURCE).syntax_node();
        let edit = suggest_import(&diagnostic("HomePage()"), &tree, &index()).unwrap();

        assert_eq!(edit.text, "import 'package:app/pages/home.dart';\n");
        assert_eq!(usize::from(edit.offset), SOURCE.find("class").unwrap());
        assert!(edit.preview.contains("package:app/pages/home.dart"));
    }

    #[rstest]
    #[case("import 'package:app/pages/home.dart';\nclass A {}")]
    #[case("import \"package:app/pages/home.dart\";\nclass A {}")]
    fn test_existing_import_in_either_quote_style(#[case] source: &str) {
        let tree = parse(source).syntax_node();
        let mut fix = ImportFix::new(diagnostic("HomePage"));

        assert_eq!(fix.check(&tree, &index()), &ImportFixState::AlreadyImported);
        assert!(suggest_import(&diagnostic("HomePage"), &tree, &index()).is_none());
    }

    #[test]
    fn test_no_suggestion_cases() {
        let tree = parse(SOURCE).syntax_node();

        for symbol in ["Unknown()", "Blank"] {
            let mut fix = ImportFix::new(diagnostic(symbol));
            assert_eq!(fix.check(&tree, &index()), &ImportFixState::NoSuggestion);
        }

        let other = Diagnostic::error(FileId::new(0), TextRange::empty(0.into()), "HomePage", "x");
        assert!(suggest_import(&other, &tree, &index()).is_none());
    }

    #[test]
    fn test_apply_is_idempotent() {
        let mut text = SOURCE.to_string();
        let tree = parse(&text).syntax_node();
        let mut fix = ImportFix::new(diagnostic("HomePage()"));
        assert!(matches!(fix.check(&tree, &index()), ImportFixState::EditReady(_)));

        let ImportFixState::EditReady(edit) = fix.state().clone() else {
            unreachable!()
        };
        assert!(fix.apply(&mut text));
        assert_eq!(fix.state(), &ImportFixState::Applied);
        assert!(!fix.apply(&mut text));
        assert!(!apply_import(&mut text, &edit));

        assert_eq!(text.matches("package:app/pages/home.dart").count(), 1);
        assert_eq!(
            text,
            "import 'package:flutter/material.dart';\n\nimport 'package:app/pages/home.dart';\nclass App {}\n"
        );
    }

    #[test]
    fn test_anchor_in_file_without_items() {
        let tree = parse("import 'a.dart';\n").syntax_node();
        assert_eq!(usize::from(import_anchor(&tree)), "import 'a.dart';\n".len());

        let empty = parse("").syntax_node();
        assert_eq!(import_anchor(&empty), TextSize::from(0));
    }

    #[rstest]
    #[case("library app;\nimport 'a.dart';\nexport 'b.dart';\nclass A {}", "class A {}")]
    #[case("import 'a.dart';\npart 'b.dart';\nclass A {}", "part 'b.dart';")]
    #[case("part of 'app.dart';\nclass A {}", "part of 'app.dart';")]
    fn test_anchor_stops_at_part(#[case] source: &str, #[case] first_body: &str) {
        let tree = parse(source).syntax_node();
        assert_eq!(usize::from(import_anchor(&tree)), source.find(first_body).unwrap());
    }

    #[test]
    fn test_import_lands_before_part() {
        let mut text = "import 'a.dart';\npart 'b.dart';\nclass A {}".to_string();
        let tree = parse(&text).syntax_node();
        let edit = suggest_import(&diagnostic("HomePage"), &tree, &index()).unwrap();

        assert!(apply_import(&mut text, &edit));
        assert_eq!(
            text,
            "import 'a.dart';\nimport 'package:app/pages/home.dart';\npart 'b.dart';\nclass A {}"
        );
    }

    #[test]
    fn test_import_after_unterminated_last_line() {
        let mut text = "import 'a.dart';".to_string();
        let tree = parse(&text).syntax_node();
        let edit = suggest_import(&diagnostic("HomePage"), &tree, &index()).unwrap();
        assert_eq!(edit.text, "\nimport 'package:app/pages/home.dart';\n");

        assert!(apply_import(&mut text, &edit));
        assert_eq!(text, "import 'a.dart';\nimport 'package:app/pages/home.dart';\n");
    }
}
