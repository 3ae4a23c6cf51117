//! Route references: a `'/path'` literal -> the page registered for it.
//!
//! Routes are read from a member of the enclosing class (by default
//! `getPages`) yielding a list of calls `Entry('/path', () => Page(), ...)`.

use smol_str::SmolStr;

use super::context::ResolveCtx;
use super::shape::{
    match_call_arguments, match_list_literal, match_string_literal, match_yielded_expr,
};
use crate::hir::{enclosing_class, find_member};
use crate::syntax::{SyntaxKind, SyntaxNode, decl_name, declared_type_name, expr_children};

/// Type names accepted on a declared route member.
const LIST_TYPES: &[&str] = &["List"];

/// Resolve a route path literal to the declaration of the page it builds.
///
/// The route member of the innermost enclosing class is used; configured
/// route tables are searched when no enclosing class declares one. The
/// member's list is taken directly or through exactly one reference hop.
pub fn resolve_route(cx: &ResolveCtx<'_>, literal: &SyntaxNode) -> Option<SyntaxNode> {
    cx.recognized()?;
    let path = match_string_literal(literal).filter(|path| path.starts_with('/'))?;
    let member = route_member(cx, literal)?;
    let entries = route_entries(cx, &member)?;

    for entry in entries {
        let Some(args) = match_call_arguments(&entry).filter(|args| args.len() >= 2) else {
            continue;
        };
        if match_string_literal(&args[0]).as_deref() != Some(path.as_str()) {
            continue;
        }
        let target = page_target(cx, &args[1]);
        if target.is_none() {
            tracing::debug!(%path, "route matched but its page does not resolve");
        }
        return target;
    }
    tracing::trace!(%path, "no route entry");
    None
}

/// The route member visible from `node`.
fn route_member(cx: &ResolveCtx<'_>, node: &SyntaxNode) -> Option<SyntaxNode> {
    let config = cx.project.config();
    let name = config.route_member.as_str();

    let tables = config
        .route_tables
        .iter()
        .filter_map(|table| cx.symbols.resolve_type(table));
    let member = enclosing_class(node)
        .into_iter()
        .chain(tables)
        .find_map(|class| find_member(&class, name))?;

    if let Some(type_name) = declared_type_name(&member) {
        if !LIST_TYPES.contains(&type_name.as_str()) {
            tracing::debug!(%type_name, "route member is not list-typed");
            return None;
        }
    }
    Some(member)
}

/// Elements of the member's route list, following at most one hop.
fn route_entries(cx: &ResolveCtx<'_>, member: &SyntaxNode) -> Option<Vec<SyntaxNode>> {
    let value = match_yielded_expr(member)?;
    if let Some(entries) = match_list_literal(&value) {
        return Some(entries);
    }
    // `routes` or `Routes.pages`: the hop is through the trailing name.
    let reference = match value.kind() {
        SyntaxKind::NAME_REF => value.clone(),
        SyntaxKind::MEMBER_EXPR => value
            .children()
            .filter(|child| child.kind() == SyntaxKind::NAME_REF)
            .last()?,
        _ => return None,
    };
    let target = cx.symbols.resolve_symbol(&reference)?;
    if target.kind() != SyntaxKind::VARIABLE {
        return None;
    }
    let entries = match_yielded_expr(&target).and_then(|init| match_list_literal(&init));
    if entries.is_none() {
        tracing::debug!(reference = %value.text(), "route list is more than one hop away");
    }
    entries
}

/// Declaration constructed by a route's page builder.
fn page_target(cx: &ResolveCtx<'_>, builder: &SyntaxNode) -> Option<SyntaxNode> {
    let body = match builder.kind() {
        SyntaxKind::CLOSURE => match_yielded_expr(builder)?,
        _ => builder.clone(),
    };
    let constructed = match body.kind() {
        SyntaxKind::NEW_EXPR => expr_children(&body).next()?,
        _ => body,
    };
    let name_ref = match constructed.kind() {
        SyntaxKind::NAME_REF => constructed,
        SyntaxKind::CALL_EXPR => constructor_name(&expr_children(&constructed).next()?)?,
        _ => return None,
    };
    cx.symbols.resolve_symbol(&name_ref)
}

/// `Page` in `Page(...)` and `Page.named(...)`.
fn constructor_name(callee: &SyntaxNode) -> Option<SyntaxNode> {
    match callee.kind() {
        SyntaxKind::NAME_REF => Some(callee.clone()),
        SyntaxKind::MEMBER_EXPR => expr_children(callee)
            .next()
            .filter(|receiver| receiver.kind() == SyntaxKind::NAME_REF),
        _ => None,
    }
}

/// Every `(path, page declaration name)` pair a route member registers.
///
/// Used for listing; resolution goes through [`resolve_route`].
pub fn route_table(cx: &ResolveCtx<'_>, class: &SyntaxNode) -> Vec<(String, SmolStr)> {
    let Some(member) = find_member(class, &cx.project.config().route_member) else {
        return Vec::new();
    };
    route_entries(cx, &member)
        .unwrap_or_default()
        .iter()
        .filter_map(|entry| {
            let args = match_call_arguments(entry).filter(|args| args.len() >= 2)?;
            let path = match_string_literal(&args[0])?;
            let page = page_target(cx, &args[1]).and_then(|decl| decl_name(&decl))?;
            Some((path, page))
        })
        .collect()
}
