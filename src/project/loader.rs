//! Loading a project directory from disk into an [`AnalysisHost`].

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use walkdir::WalkDir;

use super::config::{CONFIG_FILE, ConfigError, XrefConfig};
use super::context::ProjectContext;
use crate::base::DiskFs;
use crate::ide::{AnalysisHost, SOURCE_EXTENSION, SuggestionIndex};
use crate::syntax::{Parse, parse};

/// Directories never descended into, besides hidden ones.
pub const SKIP_DIRECTORIES: &[&str] = &["build", "node_modules", "ios", "android"];

/// Files read as text. Everything else is registered as a resource.
const TEXT_EXTENSIONS: &[&str] = &[SOURCE_EXTENSION, "arb", "json", "yaml"];

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("directory not found: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

enum Loaded {
    Source(String, Parse),
    Text(String),
    Resource,
}

/// Load every file under `root`.
///
/// Source files are read and parsed in parallel. The configuration comes
/// from `root/xref.json` when present; a `xref:` section in `pubspec.yaml`
/// overrides it, merging suggestions. A module root with its own `xref.json` gets its own
/// suggestion index.
pub fn load_project(root: impl AsRef<Path>) -> Result<AnalysisHost, LoadError> {
    let root = root.as_ref();
    if !root.is_dir() {
        return Err(LoadError::NotADirectory(root.to_owned()));
    }

    let config = read_config(root)?.unwrap_or_default();
    let project = ProjectContext::detect(&DiskFs, root, config);
    let paths = collect_file_paths(root);
    tracing::debug!(root = %root.display(), files = paths.len(), "loading project");

    let loaded: Vec<(PathBuf, Loaded)> = paths
        .into_par_iter()
        .filter_map(|path| match load_file(&path) {
            Ok(loaded) => Some((path, loaded)),
            Err(err) => {
                tracing::warn!(%err, "skipping unreadable file");
                None
            }
        })
        .collect();

    let mut host = AnalysisHost::new(project);
    for (path, loaded) in loaded {
        match loaded {
            Loaded::Source(text, parse) => {
                host.set_parsed_file(&path, &text, parse);
            }
            Loaded::Text(text) => {
                host.set_file_content(&path, &text);
            }
            Loaded::Resource => {
                host.add_resource(&path);
            }
        }
    }

    install_suggestions(&mut host)?;
    Ok(host)
}

/// Every file under `root`, skipping hidden and build directories.
pub fn collect_file_paths(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            if entry.depth() == 0 || !entry.file_type().is_dir() {
                return true;
            }
            let name = entry.file_name().to_string_lossy();
            !name.starts_with('.') && !SKIP_DIRECTORIES.contains(&name.as_ref())
        })
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .collect()
}

fn load_file(path: &Path) -> Result<Loaded, LoadError> {
    let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or_default();
    if !TEXT_EXTENSIONS.contains(&extension) {
        return Ok(Loaded::Resource);
    }
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_owned(),
        source,
    })?;
    if extension == SOURCE_EXTENSION {
        let parse = parse(&text);
        if !parse.errors().is_empty() {
            tracing::trace!(path = %path.display(), errors = parse.errors().len(), "parsed with errors");
        }
        Ok(Loaded::Source(text, parse))
    } else {
        Ok(Loaded::Text(text))
    }
}

fn read_config(dir: &Path) -> Result<Option<XrefConfig>, LoadError> {
    let path = dir.join(CONFIG_FILE);
    if !path.is_file() {
        return Ok(None);
    }
    let text = std::fs::read_to_string(&path).map_err(|source| LoadError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(Some(XrefConfig::from_json(&text)?))
}

fn suggestion_index(config: &XrefConfig) -> SuggestionIndex {
    config
        .suggestions
        .iter()
        .map(|(name, uri)| (name.as_str(), uri.as_str()))
        .collect()
}

fn install_suggestions(host: &mut AnalysisHost) -> Result<(), LoadError> {
    let project = host.project().clone();
    host.set_suggestions(project.root(), suggestion_index(project.config()));

    if let Some(secondary) = project.secondary_root() {
        if let Some(config) = read_config(&secondary)? {
            host.set_suggestions(secondary, suggestion_index(&config));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(root: &Path, path: &str, text: &str) {
        let path = root.join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }

    #[test]
    fn test_skips_hidden_and_build_directories() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "lib/main.dart", "class A {}");
        write(dir.path(), "build/gen.dart", "class B {}");
        write(dir.path(), ".dart_tool/x.dart", "class C {}");

        let paths = collect_file_paths(dir.path());
        assert_eq!(paths, vec![dir.path().join("lib/main.dart")]);
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_project(dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, LoadError::NotADirectory(_)));
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), CONFIG_FILE, "{ not json");
        assert!(matches!(load_project(dir.path()), Err(LoadError::Config(_))));
    }

    #[test]
    fn test_secondary_module_suggestions() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), CONFIG_FILE, r#"{ "suggestions": { "Home": "package:app/home.dart" } }"#);
        write(
            dir.path(),
            "example/xref.json",
            r#"{ "suggestions": { "Demo": "package:demo/demo.dart" } }"#,
        );

        let host = load_project(dir.path()).unwrap();
        let main = host.suggestions_for(&dir.path().join("lib/main.dart")).unwrap();
        let example = host.suggestions_for(&dir.path().join("example/lib/main.dart")).unwrap();

        assert!(main.lookup("Home").is_some());
        assert!(example.lookup("Home").is_none());
        assert!(example.lookup("Demo").is_some());
    }
}
