//! Image references: `R.image.logo` -> asset file.

use std::path::PathBuf;

use super::assets::AssetLocator;
use super::context::ResolveCtx;
use super::shape::{match_qualified_chain, match_string_literal, match_yielded_expr};
use crate::syntax::{SyntaxKind, SyntaxNode};

/// Resolve a three-segment resource chain to the asset file it names.
///
/// The first segment must be a configured resource namespace and no segment
/// may be called. The last segment must resolve to a getter or property
/// whose body (or initializer) is a single string literal: that literal is
/// the logical asset path handed to the [`AssetLocator`].
pub fn resolve_image_ref(cx: &ResolveCtx<'_>, node: &SyntaxNode) -> Option<PathBuf> {
    cx.recognized()?;
    let chain = match_qualified_chain(node)?;
    if chain.len() != 3 || chain.segments.iter().any(|segment| segment.call.is_some()) {
        return None;
    }
    let config = cx.project.config();
    if !config.is_resource_namespace(&chain.segments[0].name) {
        return None;
    }

    let leaf = chain.last()?;
    let Some(decl) = cx.symbols.resolve_symbol(&leaf.name_ref) else {
        tracing::debug!(name = %leaf.name, "image accessor does not resolve");
        return None;
    };
    if !matches!(decl.kind(), SyntaxKind::GETTER_DECL | SyntaxKind::VARIABLE) {
        tracing::debug!(name = %leaf.name, kind = ?decl.kind(), "image accessor is not a getter or property");
        return None;
    }
    let logical = match_yielded_expr(&decl).and_then(|value| match_string_literal(&value))?;

    AssetLocator::new(cx.fs, config.density_variants).locate(cx.project.root(), &logical)
}
