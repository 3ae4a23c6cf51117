//! Localization references: `S.current.key` / `S.of(context).key(args)`.

use std::path::PathBuf;

use smol_str::SmolStr;
use text_size::TextRange;

use super::catalog::{Catalog, find_key_range, substitute_placeholders};
use super::context::ResolveCtx;
use super::shape::{match_call_arguments, match_qualified_chain, match_string_literal};
use crate::syntax::{SyntaxKind, SyntaxNode};

/// A chain recognized as a catalog lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct I18nRef {
    pub key: SmolStr,
    /// The call supplying placeholder arguments, if the key is called.
    pub call: Option<SyntaxNode>,
}

/// Recognize `S.current.key` or `S.of(ctx).key`, optionally called.
///
/// Any other prefix shape fails.
pub fn match_i18n_chain(cx: &ResolveCtx<'_>, node: &SyntaxNode) -> Option<I18nRef> {
    cx.recognized()?;
    let chain = match_qualified_chain(node)?;
    let [class, accessor, key] = chain.segments.as_slice() else {
        return None;
    };
    let config = cx.project.config();
    if class.name != config.i18n_class.as_str() || class.call.is_some() {
        return None;
    }
    let field_form = accessor.name == config.i18n_field_accessor.as_str() && accessor.call.is_none();
    let call_form = accessor.name == config.i18n_call_accessor.as_str() && accessor.call.is_some();
    if !field_form && !call_form {
        return None;
    }
    Some(I18nRef {
        key: key.name.clone(),
        call: key.call.clone(),
    })
}

/// Resolve a localization chain to its translated text.
///
/// Positional arguments fill `{…}` placeholders left to right, each rendered
/// by [`render_argument`]. Missing catalogs or keys yield `None`.
pub fn resolve_i18n_ref(cx: &ResolveCtx<'_>, node: &SyntaxNode) -> Option<String> {
    let reference = match_i18n_chain(cx, node)?;
    let catalog_path = cx.project.catalog_path(cx.file_path);
    let catalog = match Catalog::load(cx.fs, &catalog_path) {
        Ok(catalog) => catalog,
        Err(err) => {
            tracing::debug!(%err, "catalog unavailable");
            return None;
        }
    };
    let Some(template) = catalog.get(&reference.key) else {
        tracing::debug!(key = %reference.key, catalog = %catalog_path.display(), "missing catalog key");
        return None;
    };

    let args: Vec<String> = reference
        .call
        .as_ref()
        .and_then(match_call_arguments)
        .unwrap_or_default()
        .iter()
        .map(|arg| render_argument(cx, arg))
        .collect();
    Some(substitute_placeholders(template, &args))
}

/// Display text for one placeholder argument.
///
/// A nested localization chain renders as its own translation. String and
/// number literals render as their value. Anything else renders as an
/// interpolation marker around its source text.
pub fn render_argument(cx: &ResolveCtx<'_>, arg: &SyntaxNode) -> String {
    if let Some(text) = resolve_i18n_ref(cx, arg) {
        return text;
    }
    if let Some(value) = match_string_literal(arg) {
        return value;
    }
    let source = arg.text().to_string();
    if arg.kind() == SyntaxKind::LITERAL && source.starts_with(|c: char| c.is_ascii_digit()) {
        return source;
    }
    format!("${{{source}}}")
}

/// Catalog file and key range a localization chain points at.
pub fn locate_i18n_key(cx: &ResolveCtx<'_>, node: &SyntaxNode) -> Option<(PathBuf, TextRange)> {
    let reference = match_i18n_chain(cx, node)?;
    let catalog_path = cx.project.catalog_path(cx.file_path);
    let text = cx.fs.read(&catalog_path)?;
    let range = find_key_range(&text, &reference.key)?;
    Some((catalog_path, range))
}
