//! Shape matching: structural tests every resolver gates on.
//!
//! Each matcher looks at one node, returns the extracted parts on success and
//! `None` on any mismatch. None of them allocate tree nodes or look beyond the
//! node's own subtree (except [`chain_root`], which walks upward).

use smol_str::SmolStr;

use crate::syntax::{SyntaxKind, SyntaxNode, SyntaxToken, expr_children, name_ref_text};

/// One identifier of a qualified chain, optionally called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainSegment {
    pub name: SmolStr,
    /// The `NAME_REF` the segment was read from.
    pub name_ref: SyntaxNode,
    /// The `CALL_EXPR` applying this segment, if any.
    pub call: Option<SyntaxNode>,
}

/// A dotted chain `a.b(x).c`, outermost segment last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedChain {
    pub segments: Vec<ChainSegment>,
}

impl QualifiedChain {
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segment names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(|segment| segment.name.as_str())
    }

    pub fn last(&self) -> Option<&ChainSegment> {
        self.segments.last()
    }
}

/// Collapse nested member accesses and calls into identifier segments.
///
/// Each segment must be a plain identifier, called at most once. Any other
/// receiver (literal, index, parenthesized expression) fails the match.
pub fn match_qualified_chain(node: &SyntaxNode) -> Option<QualifiedChain> {
    let mut segments = Vec::new();
    collect_segments(node, &mut segments)?;
    Some(QualifiedChain { segments })
}

fn collect_segments(node: &SyntaxNode, segments: &mut Vec<ChainSegment>) -> Option<()> {
    match node.kind() {
        SyntaxKind::NAME_REF => {
            let name = name_ref_text(node).filter(|name| is_identifier(name))?;
            segments.push(ChainSegment {
                name,
                name_ref: node.clone(),
                call: None,
            });
        }
        SyntaxKind::MEMBER_EXPR => {
            let mut exprs = expr_children(node);
            let receiver = exprs.next()?;
            let member = exprs.next().filter(|m| m.kind() == SyntaxKind::NAME_REF)?;
            collect_segments(&receiver, segments)?;
            collect_segments(&member, segments)?;
        }
        SyntaxKind::CALL_EXPR => {
            let callee = expr_children(node)
                .next()
                .filter(|c| matches!(c.kind(), SyntaxKind::NAME_REF | SyntaxKind::MEMBER_EXPR))?;
            collect_segments(&callee, segments)?;
            let last = segments.last_mut()?;
            if last.call.is_some() {
                return None;
            }
            last.call = Some(node.clone());
        }
        _ => return None,
    }
    Some(())
}

/// Positional arguments of a call, unwrapping a `new`/`const` wrapper.
///
/// Fails when the call has no positional arguments.
pub fn match_call_arguments(node: &SyntaxNode) -> Option<Vec<SyntaxNode>> {
    let call = match node.kind() {
        SyntaxKind::NEW_EXPR => expr_children(node).next()?,
        _ => node.clone(),
    };
    if call.kind() != SyntaxKind::CALL_EXPR {
        return None;
    }
    let args = call.children().find(|c| c.kind() == SyntaxKind::ARG_LIST)?;
    let positional: Vec<_> = expr_children(&args).collect();
    (!positional.is_empty()).then_some(positional)
}

/// The value of a string literal without interpolation.
///
/// Adjacent literals are concatenated. Raw strings are taken verbatim.
pub fn match_string_literal(node: &SyntaxNode) -> Option<String> {
    if node.kind() != SyntaxKind::STRING_LITERAL {
        return None;
    }
    let mut value = String::new();
    let mut any = false;
    for token in string_tokens(node) {
        value.push_str(&unquote(token.text())?);
        any = true;
    }
    any.then_some(value)
}

/// Elements of a list literal.
pub fn match_list_literal(node: &SyntaxNode) -> Option<Vec<SyntaxNode>> {
    (node.kind() == SyntaxKind::LIST_LITERAL).then(|| expr_children(node).collect())
}

/// The expression a declaration or closure yields: a variable's
/// initializer, or the body of a getter, method, function or closure when
/// that body is `=> expr` or a block holding a single `return expr;`.
pub fn match_yielded_expr(decl: &SyntaxNode) -> Option<SyntaxNode> {
    match decl.kind() {
        SyntaxKind::VARIABLE => expr_children(decl).next(),
        SyntaxKind::GETTER_DECL
        | SyntaxKind::METHOD_DECL
        | SyntaxKind::FUNCTION_DECL
        | SyntaxKind::CLOSURE => {
            let body = decl
                .children()
                .find(|c| matches!(c.kind(), SyntaxKind::EXPR_BODY | SyntaxKind::BLOCK))?;
            match body.kind() {
                SyntaxKind::EXPR_BODY => expr_children(&body).next(),
                _ => {
                    let mut stmts = body.children();
                    let only = stmts.next().filter(|s| s.kind() == SyntaxKind::RETURN_STMT)?;
                    if stmts.next().is_some() {
                        return None;
                    }
                    expr_children(&only).next()
                }
            }
        }
        _ => None,
    }
}

/// The outermost chain expression `node` is part of.
///
/// Climbs while `node` is the receiver of a member access, the member of
/// one, or the callee of a call.
pub fn chain_root(node: &SyntaxNode) -> SyntaxNode {
    let mut current = node.clone();
    while let Some(parent) = current.parent() {
        let continues = match parent.kind() {
            SyntaxKind::MEMBER_EXPR => true,
            SyntaxKind::CALL_EXPR => expr_children(&parent).next().as_ref() == Some(&current),
            _ => false,
        };
        if !continues {
            break;
        }
        current = parent;
    }
    current
}

/// Whether `text` is a single identifier of the analyzed language.
pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first == '_' || first == '$' || unicode_ident::is_xid_start(first))
        && chars.all(|c| c == '$' || unicode_ident::is_xid_continue(c))
}

fn string_tokens(node: &SyntaxNode) -> impl Iterator<Item = SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|element| element.into_token())
        .filter(|token| token.kind() == SyntaxKind::STRING)
}

/// Strip quotes and decode escapes of one string token.
fn unquote(text: &str) -> Option<String> {
    let (raw, text) = match text.strip_prefix('r') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let quote = ["'''", "\"\"\"", "'", "\""]
        .into_iter()
        .find(|q| text.len() >= 2 * q.len() && text.starts_with(q) && text.ends_with(q))?;
    let body = &text[quote.len()..text.len() - quote.len()];

    if raw {
        return Some(body.to_string());
    }
    unescape(body)
}

/// Decode escapes; `None` when the body interpolates.
fn unescape(body: &str) -> Option<String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        match c {
            '$' => return None,
            '\\' => match chars.next()? {
                'n' => out.push('\n'),
                't' => out.push('\t'),
                'r' => out.push('\r'),
                'b' => out.push('\u{8}'),
                'f' => out.push('\u{c}'),
                'v' => out.push('\u{b}'),
                'x' => {
                    let hex: String = chars.by_ref().take(2).collect();
                    out.push(char::from_u32(u32::from_str_radix(&hex, 16).ok()?)?);
                }
                'u' => {
                    let rest = chars.as_str();
                    let (hex, consumed) = match rest.strip_prefix('{') {
                        Some(braced) => {
                            let end = braced.find('}')?;
                            (&braced[..end], end + 2)
                        }
                        None => (rest.get(..4)?, 4),
                    };
                    out.push(char::from_u32(u32::from_str_radix(hex, 16).ok()?)?);
                    chars = rest.get(consumed..)?.chars();
                }
                other => out.push(other),
            },
            _ => out.push(c),
        }
    }
    Some(out)
}
