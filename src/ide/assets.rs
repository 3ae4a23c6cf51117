//! Resource variant lookup: logical asset path -> concrete file.

use std::path::{Path, PathBuf};

use crate::base::FileSystem;

/// Density directories, highest density first.
pub const DENSITY_VARIANTS: [&str; 4] = ["4.0x", "3.0x", "2.0x", "1.5x"];

/// Paths probed for `logical` under `base`, in preference order.
///
/// With density variants on, `assets/images/logo.png` probes
/// `assets/images/4.0x/logo.png` down to `1.5x` before the base path.
pub fn candidates(base: &Path, logical: &str, density_variants: bool) -> Vec<PathBuf> {
    let logical = Path::new(logical.trim_start_matches('/'));
    let mut paths = Vec::with_capacity(DENSITY_VARIANTS.len() + 1);

    if density_variants {
        if let Some(name) = logical.file_name() {
            let dir = base.join(logical.parent().unwrap_or(Path::new("")));
            paths.extend(DENSITY_VARIANTS.iter().map(|variant| dir.join(variant).join(name)));
        }
    }
    paths.push(base.join(logical));
    paths
}

/// Finds the best existing file for a logical asset path.
#[derive(Clone, Copy)]
pub struct AssetLocator<'a> {
    fs: &'a dyn FileSystem,
    density_variants: bool,
}

impl<'a> AssetLocator<'a> {
    pub fn new(fs: &'a dyn FileSystem, density_variants: bool) -> Self {
        Self {
            fs,
            density_variants,
        }
    }

    /// The first existing candidate, or `None`.
    pub fn locate(&self, base: &Path, logical: &str) -> Option<PathBuf> {
        if logical.is_empty() {
            return None;
        }
        let found = candidates(base, logical, self.density_variants)
            .into_iter()
            .find(|path| self.fs.exists(path));
        if found.is_none() {
            tracing::debug!(logical, base = %base.display(), "asset not found");
        }
        found
    }
}
