//! Translation catalogs (ARB/JSON) and placeholder substitution.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use text_size::{TextRange, TextSize};

use crate::base::FileSystem;

/// Error loading a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog not found: {}", .0.display())]
    Missing(PathBuf),
    #[error("malformed catalog: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("catalog is not a JSON object")]
    NotAnObject,
}

/// Key -> translated text.
///
/// Only string-valued top-level keys are entries. Metadata objects
/// (`"@key": {...}`) and other values are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: IndexMap<String, String>,
}

impl Catalog {
    pub fn parse(text: &str) -> Result<Self, CatalogError> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        let serde_json::Value::Object(map) = value else {
            return Err(CatalogError::NotAnObject);
        };
        let entries = map
            .into_iter()
            .filter_map(|(key, value)| match value {
                serde_json::Value::String(text) => Some((key, text)),
                _ => None,
            })
            .collect();
        Ok(Self { entries })
    }

    /// Read and parse the catalog at `path`. Never cached: every call sees
    /// the current buffer.
    pub fn load(fs: &dyn FileSystem, path: &Path) -> Result<Self, CatalogError> {
        let text = fs
            .read(path)
            .ok_or_else(|| CatalogError::Missing(path.to_owned()))?;
        Self::parse(&text)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Replace `{…}` placeholders left to right with `args`.
///
/// Placeholders beyond the last argument stay as written. Arguments beyond
/// the last placeholder are ignored. Substituted text is never rescanned.
pub fn substitute_placeholders(template: &str, args: &[String]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut args = args.iter();
    let mut rest = template;

    while let Some((start, end)) = next_placeholder(rest) {
        let Some(arg) = args.next() else {
            break;
        };
        out.push_str(&rest[..start]);
        out.push_str(arg);
        rest = &rest[end..];
    }
    out.push_str(rest);
    out
}

/// Number of `{…}` placeholders in `text`.
pub fn count_placeholders(text: &str) -> usize {
    let mut count = 0;
    let mut rest = text;
    while let Some((_, end)) = next_placeholder(rest) {
        count += 1;
        rest = &rest[end..];
    }
    count
}

/// Byte span of the first `{name}` in `text`, closing brace included.
fn next_placeholder(text: &str) -> Option<(usize, usize)> {
    let mut start = text.find('{')?;
    loop {
        let len = text[start + 1..].find(|c: char| c == '{' || c == '}')?;
        let close = start + 1 + len;
        if text.as_bytes()[close] == b'}' {
            return Some((start, close + 1));
        }
        // `{{x}` : the inner brace opens the placeholder.
        start = close;
    }
}

/// Range of the quoted top-level key `key` in catalog source text.
///
/// Keys of nested objects, such as the placeholders of an `@key` metadata
/// block, are never matched. Keys are compared as written, escapes included.
pub fn find_key_range(text: &str, key: &str) -> Option<TextRange> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'{' | b'[' => depth += 1,
            b'}' | b']' => depth = depth.saturating_sub(1),
            b'"' => {
                let start = i;
                i += 1;
                while i < bytes.len() && bytes[i] != b'"' {
                    if bytes[i] == b'\\' {
                        i += 1;
                    }
                    i += 1;
                }
                if i >= bytes.len() {
                    return None;
                }
                let end = i + 1;
                if depth == 1
                    && text.get(start + 1..i) == Some(key)
                    && text[end..].trim_start().starts_with(':')
                {
                    return Some(TextRange::new(
                        TextSize::try_from(start).ok()?,
                        TextSize::try_from(end).ok()?,
                    ));
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}
