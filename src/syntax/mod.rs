//! Lossless syntax tree for UI framework sources.
//!
//! The tree is a rowan green/red tree tagged with [`SyntaxKind`]. Resolvers
//! only rely on category tags, token text, child order, parent links and
//! byte ranges, so any parser producing this tree shape can feed them.

mod kind;
mod lexer;
mod parser;

use smol_str::SmolStr;
use text_size::TextSize;

pub use kind::{DartLanguage, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};
pub use lexer::{Token, tokenize};
pub use parser::{Parse, parse};

/// A recoverable parse error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at offset {offset:?}")]
pub struct ParseError {
    pub message: String,
    pub offset: TextSize,
}

/// The name a declaration node introduces (`class A`, `get logo`, `x = 1`).
pub fn decl_name(node: &SyntaxNode) -> Option<SmolStr> {
    if !node.kind().is_declaration() {
        return None;
    }
    node.children()
        .find(|child| child.kind() == SyntaxKind::NAME)
        .and_then(|name| first_ident(&name))
}

/// The identifier of a `NAME_REF` node.
pub fn name_ref_text(node: &SyntaxNode) -> Option<SmolStr> {
    if node.kind() != SyntaxKind::NAME_REF {
        return None;
    }
    node.children_with_tokens()
        .filter_map(|element| element.into_token())
        .find(|token| !token.kind().is_trivia())
        .map(|token| SmolStr::new(token.text()))
}

/// Expression children of `node`, in source order.
pub fn expr_children(node: &SyntaxNode) -> impl Iterator<Item = SyntaxNode> {
    node.children().filter(|child| child.kind().is_expr())
}

/// The declared type name of a declaration (`String get x`, `List<T> f()`).
///
/// Variables carry their type on the enclosing declaration node.
pub fn declared_type_name(decl: &SyntaxNode) -> Option<SmolStr> {
    let holder = if decl.kind() == SyntaxKind::VARIABLE {
        decl.parent()?
    } else {
        decl.clone()
    };
    holder
        .children()
        .find(|child| child.kind() == SyntaxKind::TYPE_REF)
        .and_then(|ty| first_ident(&ty))
}

fn first_ident(node: &SyntaxNode) -> Option<SmolStr> {
    node.children_with_tokens()
        .filter_map(|element| element.into_token())
        .find(|token| token.kind() == SyntaxKind::IDENT)
        .map(|token| SmolStr::new(token.text()))
}
