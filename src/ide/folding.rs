//! Folding ranges: localization chains collapsed to their translation.
//!
//! Each outermost chain that resolves through the catalog becomes one fold
//! whose placeholder is the rendered text, so `S.current.greet(name)` reads
//! as `Hello ${name}` in the editor.

use rowan::WalkEvent;

use super::context::ResolveCtx;
use super::i18n::resolve_i18n_ref;
use crate::base::{LineIndex, TextRange};
use crate::syntax::{SyntaxKind, SyntaxNode};

/// A folding range with position information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldingRange {
    pub range: TextRange,
    /// Start line (0-indexed)
    pub start_line: u32,
    /// Start column (0-indexed)
    pub start_col: u32,
    /// End line (0-indexed)
    pub end_line: u32,
    /// End column (0-indexed)
    pub end_col: u32,
    /// Text shown while folded.
    pub placeholder: String,
}

/// Get folding ranges for a file.
///
/// Chains nested inside a folded chain (its arguments) are not folded
/// again: their text is already part of the outer placeholder.
pub fn folding_ranges(cx: &ResolveCtx<'_>, root: &SyntaxNode, lines: &LineIndex) -> Vec<FoldingRange> {
    let mut ranges = Vec::new();
    if !cx.project.is_recognized() {
        return ranges;
    }

    let mut walk = root.preorder();
    while let Some(event) = walk.next() {
        let WalkEvent::Enter(node) = event else {
            continue;
        };
        if !matches!(node.kind(), SyntaxKind::MEMBER_EXPR | SyntaxKind::CALL_EXPR) {
            continue;
        }
        let Some(placeholder) = resolve_i18n_ref(cx, &node) else {
            continue;
        };

        let range = node.text_range();
        let start = lines.line_col(range.start());
        let end = lines.line_col(range.end());
        ranges.push(FoldingRange {
            range,
            start_line: start.line,
            start_col: start.col,
            end_line: end.line,
            end_col: end.col,
            placeholder,
        });
        walk.skip_subtree();
    }

    ranges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ide::fixture::Fixture;

    #[test]
    fn test_outermost_chains_fold_once() {
        let source = "void f(n) {\n  a(S.current.greet(S.current.name, n));\n  b(S.current.title.length);\n  c(S.current.missing);\n}";
        let fx = Fixture::new(&[
            ("lib/main.dart", source),
            (
                "lib/l10n/intl_en.arb",
                r#"{ "greet": "Hi {a} #{b}", "name": "Ann", "title": "Home" }"#,
            ),
        ]);
        let resolver = fx.resolver();
        let path = fx.path("lib/main.dart");
        let cx = fx.ctx(&path, &resolver);
        let root = fx.index.root(fx.fs.lookup(&path).unwrap()).unwrap();

        let folds = folding_ranges(&cx, root, &LineIndex::new(source));
        let placeholders: Vec<_> = folds.iter().map(|f| f.placeholder.as_str()).collect();
        assert_eq!(placeholders, vec!["Hi Ann #${n}", "Home"]);

        assert_eq!(&source[folds[0].range], "S.current.greet(S.current.name, n)");
        assert_eq!((folds[0].start_line, folds[0].start_col), (1, 4));
        assert_eq!(&source[folds[1].range], "S.current.title");
    }
}
