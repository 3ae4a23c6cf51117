//! Diagnostics: unresolved-reference reporting.
//!
//! This is the diagnostics feed consumed by the import suggestion engine.
//! Each diagnostic carries the source text of the offending reference so a
//! quick fix can look it up by name.

use std::sync::Arc;

use smol_str::SmolStr;
use text_size::TextRange;

use super::resolve::{SymbolResolver, is_member_name};
use crate::base::FileId;
use crate::syntax::{SyntaxKind, SyntaxNode, expr_children, name_ref_text};

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    /// Convert to LSP severity number.
    pub fn to_lsp(&self) -> u32 {
        match self {
            Severity::Error => 1,
            Severity::Warning => 2,
        }
    }
}

/// A diagnostic message with location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// The file containing this diagnostic.
    pub file: FileId,
    /// Byte range of the offending reference.
    pub range: TextRange,
    pub severity: Severity,
    /// Error/warning code (e.g., "E0001").
    pub code: Option<Arc<str>>,
    pub message: Arc<str>,
    /// Source text of the reference, call suffix included (`PageA()`).
    pub symbol: SmolStr,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(
        file: FileId,
        range: TextRange,
        symbol: impl Into<SmolStr>,
        message: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            file,
            range,
            severity: Severity::Error,
            code: None,
            message: message.into(),
            symbol: symbol.into(),
        }
    }

    /// Create a new warning diagnostic.
    pub fn warning(
        file: FileId,
        range: TextRange,
        symbol: impl Into<SmolStr>,
        message: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(file, range, symbol, message)
        }
    }

    /// Set the error code.
    pub fn with_code(mut self, code: impl Into<Arc<str>>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Whether this diagnostic reports a name that failed to resolve.
    pub fn is_unresolved_reference(&self) -> bool {
        self.code.as_deref() == Some(codes::UNDEFINED_REFERENCE)
    }
}

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

/// Standard diagnostic codes.
pub mod codes {
    /// Undefined reference (name not found).
    pub const UNDEFINED_REFERENCE: &str = "E0001";
    /// Syntax error reported by the parser.
    pub const SYNTAX_ERROR: &str = "E0100";
}

// ============================================================================
// DIAGNOSTIC COLLECTOR
// ============================================================================

/// Collects diagnostics during a check pass.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Add an undefined reference error.
    pub fn undefined_reference(&mut self, file: FileId, range: TextRange, symbol: SmolStr, name: &str) {
        self.add(
            Diagnostic::error(file, range, symbol, format!("undefined reference: '{}'", name))
                .with_code(codes::UNDEFINED_REFERENCE),
        );
    }
}

// ============================================================================
// REFERENCE CHECKER
// ============================================================================

/// Types every source file sees without an import.
const BUILTIN_TYPES: &[&str] = &[
    "BigInt", "Comparable", "DateTime", "Duration", "Error", "Exception", "Function", "Future",
    "FutureOr", "Iterable", "Iterator", "List", "Map", "Never", "Null", "Object", "Record",
    "RegExp", "Set", "Stream", "String", "StringBuffer", "Symbol", "Type", "Uri", "bool",
    "double", "dynamic", "int", "num", "void",
];

/// Reports unresolved type-like references in one file.
///
/// Only capitalized names are checked: class references, constructor calls
/// and declared types. Lowercase names are usually members of types this
/// crate cannot see, and would drown the feed.
pub struct ReferenceChecker<'a> {
    file: FileId,
    resolver: &'a dyn SymbolResolver,
    collector: DiagnosticCollector,
}

impl<'a> ReferenceChecker<'a> {
    pub fn new(file: FileId, resolver: &'a dyn SymbolResolver) -> Self {
        Self {
            file,
            resolver,
            collector: DiagnosticCollector::new(),
        }
    }

    /// Check every reference under `root`.
    pub fn check(&mut self, root: &SyntaxNode) {
        for node in root.descendants() {
            match node.kind() {
                SyntaxKind::NAME_REF => self.check_name_ref(&node),
                SyntaxKind::TYPE_REF => self.check_type_ref(&node),
                _ => {}
            }
        }
    }

    fn check_name_ref(&mut self, name_ref: &SyntaxNode) {
        let Some(name) = name_ref_text(name_ref) else {
            return;
        };
        if !is_type_like(&name) {
            return;
        }
        let parent = name_ref.parent();
        if parent.as_ref().is_some_and(|p| is_member_name(name_ref, p)) {
            return;
        }
        if self.resolver.resolve_symbol(name_ref).is_some() {
            return;
        }

        // A called reference reports the whole call so fixes see `Name(...)`.
        let reported = parent
            .filter(|p| {
                p.kind() == SyntaxKind::CALL_EXPR && expr_children(p).next().as_ref() == Some(name_ref)
            })
            .unwrap_or_else(|| name_ref.clone());
        let symbol = SmolStr::new(reported.text().to_string().trim());
        self.collector
            .undefined_reference(self.file, reported.text_range(), symbol, &name);
    }

    fn check_type_ref(&mut self, type_ref: &SyntaxNode) {
        let mut idents = type_ref
            .children_with_tokens()
            .filter_map(|element| element.into_token())
            .filter(|token| !token.kind().is_trivia());
        let Some(head) = idents.next().filter(|t| t.kind() == SyntaxKind::IDENT) else {
            return;
        };
        // Prefixed types (`ui.Image`) belong to an import we already have.
        if idents.next().is_some_and(|t| t.kind() == SyntaxKind::DOT) {
            return;
        }
        let name = head.text();
        if !is_type_like(name) || self.resolver.resolve_type(name).is_some() {
            return;
        }
        self.collector
            .undefined_reference(self.file, head.text_range(), SmolStr::new(name), name);
    }

    /// Get the collected diagnostics.
    pub fn finish(self) -> Vec<Diagnostic> {
        self.collector.diagnostics
    }
}

/// Capitalized, not a builtin, and not a single-letter type parameter.
fn is_type_like(name: &str) -> bool {
    name.len() > 1
        && name.starts_with(|c: char| c.is_ascii_uppercase())
        && !BUILTIN_TYPES.contains(&name)
}

/// Check a file and return diagnostics.
pub fn check_file(file: FileId, root: &SyntaxNode, resolver: &dyn SymbolResolver) -> Vec<Diagnostic> {
    let mut checker = ReferenceChecker::new(file, resolver);
    checker.check(root);
    let diagnostics = checker.finish();
    tracing::debug!(file = ?file, count = diagnostics.len(), "checked references");
    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hir::{DeclIndex, TreeResolver};
    use crate::syntax::parse;
    use text_size::TextSize;

    fn check(source: &str) -> Vec<Diagnostic> {
        let root = parse(source).syntax_node();
        let mut index = DeclIndex::new();
        index.add_file(FileId::new(0), root.clone());
        check_file(FileId::new(0), &root, &TreeResolver::new(&index))
    }

    #[test]
    fn test_diagnostic_builders() {
        let range = TextRange::new(TextSize::from(2), TextSize::from(5));
        let diag = Diagnostic::warning(FileId::new(0), range, "Foo", "test")
            .with_code(codes::UNDEFINED_REFERENCE);

        assert_eq!(diag.severity, Severity::Warning);
        assert_eq!(diag.code.as_deref(), Some("E0001"));
        assert!(diag.is_unresolved_reference());
    }

    #[test]
    fn test_collector_undefined_reference() {
        let range = TextRange::empty(TextSize::from(0));
        let mut collector = DiagnosticCollector::new();
        collector.undefined_reference(FileId::new(0), range, SmolStr::new("Foo()"), "Foo");

        let [diag] = collector.diagnostics.as_slice() else {
            panic!("expected one diagnostic");
        };
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(&*diag.message, "undefined reference: 'Foo'");
        assert!(diag.is_unresolved_reference());
    }

    #[test]
    fn test_severity_to_lsp() {
        assert_eq!(Severity::Error.to_lsp(), 1);
        assert_eq!(Severity::Warning.to_lsp(), 2);
    }

    #[test]
    fn test_unresolved_call_reports_whole_call() {
        let source = "void main() { runApp(MyApp()); }";
        let diagnostics = check(source);

        assert_eq!(diagnostics.len(), 1);
        let diag = &diagnostics[0];
        assert_eq!(diag.symbol, "MyApp()");
        assert_eq!(&source[diag.range], "MyApp()");
        assert!(diag.message.contains("undefined reference: 'MyApp'"));
    }

    #[test]
    fn test_resolved_and_builtin_references_are_silent() {
        let diagnostics = check(
            "class Home {}\nclass Box<T> { T value; List<String> names = []; }\nfinal h = Home();\nfinal s = String.fromCharCode(1);",
        );
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
    }

    #[test]
    fn test_unresolved_type_and_receiver() {
        let diagnostics = check("class A { Widget child; void f() { Colors.red; } }");
        let symbols: Vec<_> = diagnostics.iter().map(|d| d.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["Widget", "Colors"]);
    }
}
