//! Go-to-definition across every reference kind.

use std::path::PathBuf;

use rowan::TokenAtOffset;
use smol_str::SmolStr;

use super::context::ResolveCtx;
use super::i18n::locate_i18n_key;
use super::image::resolve_image_ref;
use super::routes::resolve_route;
use super::shape::chain_root;
use crate::base::{FileId, TextRange, TextSize};
use crate::hir::DeclIndex;
use crate::syntax::{SyntaxKind, SyntaxNode, SyntaxToken, decl_name};

/// Where a navigation lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GotoTarget {
    /// A declaration in an analyzed source file.
    Declaration {
        file: FileId,
        /// The whole declaration.
        full_range: TextRange,
        /// The declared name, or the whole declaration when unnamed.
        focus_range: TextRange,
        name: Option<SmolStr>,
    },
    /// A resource file, such as an image.
    File(PathBuf),
    /// A range inside a non-source file, such as a catalog entry.
    FileRange { path: PathBuf, range: TextRange },
}

impl GotoTarget {
    fn declaration(index: &DeclIndex, decl: &SyntaxNode) -> Option<Self> {
        let file = index.file_of(decl)?;
        let full_range = decl.text_range();
        let focus_range = decl
            .children()
            .find(|c| c.kind() == SyntaxKind::NAME)
            .map_or(full_range, |name| name.text_range());
        Some(Self::Declaration {
            file,
            full_range,
            focus_range,
            name: decl_name(decl),
        })
    }
}

/// Resolve the reference at `offset`.
///
/// Tried in order: a route path literal, an image chain, a localization
/// chain, then plain symbol resolution of the identifier.
pub fn goto_definition(
    cx: &ResolveCtx<'_>,
    index: &DeclIndex,
    root: &SyntaxNode,
    offset: TextSize,
) -> Option<GotoTarget> {
    let token = significant_token(root, offset)?;
    let node = token.parent()?;

    match node.kind() {
        SyntaxKind::STRING_LITERAL => {
            let page = resolve_route(cx, &node)?;
            GotoTarget::declaration(index, &page)
        }
        SyntaxKind::NAME_REF => {
            let chain = chain_root(&node);
            if let Some(asset) = resolve_image_ref(cx, &chain) {
                return Some(GotoTarget::File(asset));
            }
            if let Some((path, range)) = locate_i18n_key(cx, &chain) {
                return Some(GotoTarget::FileRange { path, range });
            }
            let decl = cx.symbols.resolve_symbol(&node)?;
            GotoTarget::declaration(index, &decl)
        }
        _ => None,
    }
}

/// The non-trivia token touching `offset`, preferring the right one.
fn significant_token(root: &SyntaxNode, offset: TextSize) -> Option<SyntaxToken> {
    if !root.text_range().contains_inclusive(offset) {
        return None;
    }
    match root.token_at_offset(offset) {
        TokenAtOffset::None => None,
        TokenAtOffset::Single(token) => Some(token),
        TokenAtOffset::Between(left, right) if right.kind().is_trivia() => Some(left),
        TokenAtOffset::Between(_, right) => Some(right),
    }
    .filter(|token| !token.kind().is_trivia())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ide::fixture::Fixture;

    const MAIN: &str = r#"class Home {
  static final getPages = [Entry('/home', () => Home())];
  void build(context) {
    final logo = R.image.logo;
    final title = S.of(context).title;
    push('/home');
    build(context);
  }
}
"#;

    fn fixture() -> Fixture {
        Fixture::new(&[
            ("lib/main.dart", MAIN),
            (
                "lib/r.dart",
                "class R { static const image = _I(); }\nclass _I { String get logo => 'assets/logo.png'; }",
            ),
            ("assets/logo.png", ""),
            ("lib/l10n/intl_en.arb", "{\n  \"title\": \"Home\"\n}"),
        ])
    }

    fn goto(fx: &Fixture, needle: &str, delta: usize) -> Option<GotoTarget> {
        let resolver = fx.resolver();
        let path = fx.path("lib/main.dart");
        let cx = fx.ctx(&path, &resolver);
        let root = fx.index.root(fx.fs.lookup(&path).unwrap()).unwrap();
        let offset = TextSize::try_from(MAIN.find(needle).unwrap() + delta).unwrap();
        goto_definition(&cx, &fx.index, root, offset)
    }

    #[test]
    fn test_image_chain_goes_to_asset() {
        let fx = fixture();
        assert_eq!(goto(&fx, "image.logo", 0), Some(GotoTarget::File(fx.path("assets/logo.png"))));
    }

    #[test]
    fn test_i18n_chain_goes_to_catalog_key() {
        let fx = fixture();
        let Some(GotoTarget::FileRange { path, range }) = goto(&fx, "title;", 1) else {
            panic!("expected a catalog location");
        };
        assert_eq!(path, fx.path("lib/l10n/intl_en.arb"));
        assert_eq!(u32::from(range.start()), 4);
    }

    #[test]
    fn test_route_literal_goes_to_page() {
        let fx = fixture();
        let Some(GotoTarget::Declaration { name, .. }) = goto(&fx, "'/home');", 2) else {
            panic!("expected the page class");
        };
        assert_eq!(name.as_deref(), Some("Home"));
    }

    #[test]
    fn test_plain_symbol_and_misses() {
        let fx = fixture();
        let Some(GotoTarget::Declaration { focus_range, .. }) = goto(&fx, "build(context);", 0) else {
            panic!("expected the method");
        };
        assert_eq!(&MAIN[focus_range], "build");

        assert_eq!(goto(&fx, "    final logo", 0), None);
        assert_eq!(goto(&fx, "static", 0), None);
    }
}
