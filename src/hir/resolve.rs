//! Name resolution: mapping an identifier to its declaring node.
//!
//! Resolution is deliberately shallow. A plain name is looked up lexically
//! (block locals, parameters, enclosing class members, then the top level of
//! every indexed file). A member name `recv.name` is looked up in the class
//! that `recv` statically denotes: a class reference, a declared type, or the
//! class constructed by an initializer.

use smol_str::SmolStr;

use super::index::{DeclIndex, find_member};
use crate::syntax::{
    SyntaxKind, SyntaxNode, decl_name, declared_type_name, expr_children, name_ref_text,
};

/// Maximum receiver nesting followed when typing a member access.
const MAX_TYPING_DEPTH: usize = 16;

/// Maps an identifier node to the node declaring it.
///
/// Implementations must return nodes of the same tree model and must not
/// mutate anything.
pub trait SymbolResolver {
    /// Resolve a `NAME_REF` node to its declaration.
    fn resolve_symbol(&self, name_ref: &SyntaxNode) -> Option<SyntaxNode>;

    /// The class a type name refers to.
    fn resolve_type(&self, name: &str) -> Option<SyntaxNode>;
}

/// [`SymbolResolver`] over a [`DeclIndex`].
#[derive(Clone, Copy, Debug)]
pub struct TreeResolver<'a> {
    index: &'a DeclIndex,
}

impl<'a> TreeResolver<'a> {
    pub fn new(index: &'a DeclIndex) -> Self {
        Self { index }
    }

    fn resolve_at_depth(&self, name_ref: &SyntaxNode, depth: usize) -> Option<SyntaxNode> {
        let name = name_ref_text(name_ref)?;
        let parent = name_ref.parent()?;

        if is_member_name(name_ref, &parent) {
            let receiver = expr_children(&parent).next()?;
            let class = self.class_of_expr(&receiver, depth + 1)?;
            return find_member(&class, &name);
        }

        if name == "this" {
            return enclosing_class(name_ref);
        }
        self.resolve_lexically(name_ref, &name)
    }

    fn resolve_lexically(&self, name_ref: &SyntaxNode, name: &str) -> Option<SyntaxNode> {
        for scope in name_ref.ancestors() {
            let found = match scope.kind() {
                SyntaxKind::BLOCK => block_decls(&scope).find(|decl| is_named(decl, name)),
                SyntaxKind::METHOD_DECL
                | SyntaxKind::FUNCTION_DECL
                | SyntaxKind::CONSTRUCTOR_DECL
                | SyntaxKind::CLOSURE => params(&scope).find(|param| is_named(param, name)),
                SyntaxKind::CLASS_DECL => find_member(&scope, name),
                SyntaxKind::SOURCE_FILE => super::index::top_level_decls(&scope)
                    .find(|decl| is_named(decl, name)),
                _ => None,
            };
            if found.is_some() {
                return found;
            }
        }

        self.index.lookup(name).first().cloned()
    }

    /// The class an expression statically denotes.
    fn class_of_expr(&self, expr: &SyntaxNode, depth: usize) -> Option<SyntaxNode> {
        if depth > MAX_TYPING_DEPTH {
            return None;
        }
        match expr.kind() {
            SyntaxKind::NAME_REF => {
                let decl = self.resolve_at_depth(expr, depth)?;
                self.class_of_decl(&decl, depth)
            }
            SyntaxKind::MEMBER_EXPR => {
                let member = expr.children().filter(|c| c.kind() == SyntaxKind::NAME_REF).last()?;
                let decl = self.resolve_at_depth(&member, depth)?;
                self.class_of_decl(&decl, depth)
            }
            SyntaxKind::CALL_EXPR => {
                let callee = expr_children(expr).next()?;
                let callee_name = match callee.kind() {
                    SyntaxKind::NAME_REF => callee,
                    SyntaxKind::MEMBER_EXPR => callee
                        .children()
                        .filter(|c| c.kind() == SyntaxKind::NAME_REF)
                        .last()?,
                    _ => return None,
                };
                let decl = self.resolve_at_depth(&callee_name, depth)?;
                match decl.kind() {
                    SyntaxKind::CLASS_DECL => Some(decl),
                    SyntaxKind::CONSTRUCTOR_DECL => enclosing_class(&decl),
                    _ => self.index.lookup_class(&declared_type_name(&decl)?),
                }
            }
            SyntaxKind::NEW_EXPR | SyntaxKind::PAREN_EXPR => {
                self.class_of_expr(&expr_children(expr).next()?, depth + 1)
            }
            _ => None,
        }
    }

    /// The class a declaration's value belongs to.
    fn class_of_decl(&self, decl: &SyntaxNode, depth: usize) -> Option<SyntaxNode> {
        match decl.kind() {
            SyntaxKind::CLASS_DECL => return Some(decl.clone()),
            SyntaxKind::CONSTRUCTOR_DECL => return enclosing_class(decl),
            _ => {}
        }
        if let Some(type_name) = declared_type_name(decl) {
            return self.index.lookup_class(&type_name);
        }
        let value = match decl.kind() {
            SyntaxKind::VARIABLE => expr_children(decl).next()?,
            SyntaxKind::GETTER_DECL => decl
                .children()
                .find(|c| c.kind() == SyntaxKind::EXPR_BODY)
                .and_then(|body| expr_children(&body).next())?,
            _ => return None,
        };
        self.class_of_expr(&value, depth + 1)
    }
}

impl SymbolResolver for TreeResolver<'_> {
    fn resolve_symbol(&self, name_ref: &SyntaxNode) -> Option<SyntaxNode> {
        if name_ref.kind() != SyntaxKind::NAME_REF {
            return None;
        }
        let resolved = self.resolve_at_depth(name_ref, 0);
        if resolved.is_none() {
            tracing::trace!(name = %name_ref.text(), "unresolved symbol");
        }
        resolved
    }

    fn resolve_type(&self, name: &str) -> Option<SyntaxNode> {
        self.index.lookup_class(name)
    }
}

/// Whether `name_ref` is the member side of `recv.name`.
pub(crate) fn is_member_name(name_ref: &SyntaxNode, parent: &SyntaxNode) -> bool {
    parent.kind() == SyntaxKind::MEMBER_EXPR
        && expr_children(parent).next().as_ref() != Some(name_ref)
}

/// The innermost class declaration containing `node`.
pub fn enclosing_class(node: &SyntaxNode) -> Option<SyntaxNode> {
    node.ancestors()
        .skip(1)
        .find(|ancestor| ancestor.kind() == SyntaxKind::CLASS_DECL)
}

fn is_named(decl: &SyntaxNode, name: &str) -> bool {
    decl_name(decl).is_some_and(|decl_name: SmolStr| decl_name == name)
}

fn block_decls(block: &SyntaxNode) -> impl Iterator<Item = SyntaxNode> {
    block.children().flat_map(|stmt| match stmt.kind() {
        SyntaxKind::LOCAL_VAR => stmt
            .children()
            .filter(|c| c.kind() == SyntaxKind::VARIABLE)
            .collect::<Vec<_>>(),
        SyntaxKind::FUNCTION_DECL => vec![stmt],
        _ => Vec::new(),
    })
}

fn params(function: &SyntaxNode) -> impl Iterator<Item = SyntaxNode> {
    function
        .children()
        .filter(|c| c.kind() == SyntaxKind::PARAM_LIST)
        .flat_map(|list| list.children())
        .filter(|c| c.kind() == SyntaxKind::PARAM)
}
