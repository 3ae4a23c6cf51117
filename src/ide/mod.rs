//! IDE features: cross-references for UI framework projects.
//!
//! This module sits between the syntax/semantic layers and an editor
//! front-end. Every resolver is a function of a syntax node plus a
//! [`ResolveCtx`], and returns `None` whenever the reference does not have
//! the exact expected shape.
//!
//! ## Design Principles
//!
//! 1. **Fail closed**: a partial match never yields a partial answer
//! 2. **No editor types**: results use our own types, converted at the boundary
//! 3. **Explicit context**: project, file system and symbol resolver are passed in
//!
//! ## Usage
//!
//! The recommended way to use this module is through `AnalysisHost`:
//!
//! ```ignore
//! use xref::ide::AnalysisHost;
//!
//! let mut host = xref::project::load_project("/path/to/app")?;
//! let file = host.file_id(Path::new("/path/to/app/lib/main.dart")).unwrap();
//!
//! let analysis = host.analysis();
//! let links = analysis.document_links(file);
//! ```

mod analysis;
mod assets;
mod catalog;
mod context;
mod document_links;
mod folding;
mod goto;
mod i18n;
mod image;
mod imports;
mod routes;
mod shape;

#[cfg(test)]
mod fixture;

pub use analysis::{Analysis, AnalysisHost, SOURCE_EXTENSION};
pub use assets::{AssetLocator, DENSITY_VARIANTS, candidates};
pub use catalog::{
    Catalog, CatalogError, count_placeholders, find_key_range, substitute_placeholders,
};
pub use context::ResolveCtx;
pub use document_links::{DocumentLink, document_links};
pub use folding::{FoldingRange, folding_ranges};
pub use goto::{GotoTarget, goto_definition};
pub use i18n::{I18nRef, locate_i18n_key, match_i18n_chain, render_argument, resolve_i18n_ref};
pub use image::resolve_image_ref;
pub use imports::{
    ImportEdit, ImportFix, ImportFixState, Suggestion, SuggestionIndex, apply_import, has_import,
    import_anchor, strip_call_suffix, suggest_import,
};
pub use routes::{resolve_route, route_table};
pub use shape::{
    ChainSegment, QualifiedChain, chain_root, is_identifier, match_call_arguments,
    match_list_literal, match_qualified_chain, match_string_literal, match_yielded_expr,
};
