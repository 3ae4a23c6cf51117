//! The project a resolution runs against.

use std::path::{Path, PathBuf};

use super::config::{Pubspec, XrefConfig};
use crate::base::FileSystem;

/// Project root, configuration, and whether the project is one the
/// resolvers understand.
///
/// Passed explicitly to every resolver. An unrecognized project makes every
/// resolver return nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectContext {
    root: PathBuf,
    config: XrefConfig,
    recognized: bool,
}

impl ProjectContext {
    /// A recognized project at `root`.
    pub fn new(root: impl Into<PathBuf>, config: XrefConfig) -> Self {
        Self {
            root: root.into(),
            config,
            recognized: true,
        }
    }

    /// A project the resolvers must ignore.
    pub fn unrecognized(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            config: XrefConfig::default(),
            recognized: false,
        }
    }

    /// Inspect `root/pubspec.yaml`: the project is recognized when it
    /// depends on `flutter`.
    ///
    /// A `xref:` section there overrides `config`, except that suggestions
    /// are merged, the section winning on a shared name. Without a readable
    /// pubspec the project is unrecognized but keeps `config`.
    pub fn detect(fs: &dyn FileSystem, root: impl Into<PathBuf>, config: XrefConfig) -> Self {
        let root = root.into();
        let pubspec_path = root.join("pubspec.yaml");
        let Some(text) = fs.read(&pubspec_path) else {
            tracing::debug!(root = %root.display(), "no pubspec.yaml, project not recognized");
            return Self {
                root,
                config,
                recognized: false,
            };
        };

        let pubspec = match Pubspec::parse(&text) {
            Ok(pubspec) => pubspec,
            Err(err) => {
                tracing::debug!(%err, "unreadable pubspec.yaml, project not recognized");
                return Self {
                    root,
                    config,
                    recognized: false,
                };
            }
        };
        let recognized = pubspec.is_flutter();
        tracing::debug!(
            root = %root.display(),
            name = pubspec.name.as_deref().unwrap_or("<unnamed>"),
            recognized,
            "detected project"
        );

        let config = match pubspec.xref {
            Some(mut section) => {
                for (name, uri) in config.suggestions {
                    section.suggestions.entry(name).or_insert(uri);
                }
                section
            }
            None => config,
        };
        Self {
            root,
            config,
            recognized,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &XrefConfig {
        &self.config
    }

    pub fn is_recognized(&self) -> bool {
        self.recognized
    }

    /// Root of the secondary module, if configured.
    pub fn secondary_root(&self) -> Option<PathBuf> {
        self.config.secondary_root.as_ref().map(|dir| self.root.join(dir))
    }

    /// Module root a source file belongs to: the secondary root when the
    /// file lies under it, the project root otherwise.
    pub fn module_root(&self, file: &Path) -> PathBuf {
        match self.secondary_root() {
            Some(secondary) if file.starts_with(&secondary) => secondary,
            _ => self.root.clone(),
        }
    }

    /// The catalog that translates references made from `file`.
    pub fn catalog_path(&self, file: &Path) -> PathBuf {
        self.module_root(file).join(&self.config.catalog_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::MemoryFs;

    #[test]
    fn test_detect_flutter_project() {
        let fs = MemoryFs::new();
        fs.insert("/app/pubspec.yaml", "name: app\ndependencies:\n  flutter:\n    sdk: flutter\n");

        let cx = ProjectContext::detect(&fs, "/app", XrefConfig::default());
        assert!(cx.is_recognized());
        assert_eq!(cx.root(), Path::new("/app"));
    }

    #[test]
    fn test_detect_without_flutter() {
        let fs = MemoryFs::new();
        fs.insert("/tool/pubspec.yaml", "name: tool\ndependencies:\n  args: ^2.0.0\n");

        assert!(!ProjectContext::detect(&fs, "/tool", XrefConfig::default()).is_recognized());
        assert!(!ProjectContext::detect(&fs, "/missing", XrefConfig::default()).is_recognized());
    }

    #[test]
    fn test_unrecognized_project_keeps_config() {
        let config = XrefConfig {
            suggestions: [("Home".to_string(), "package:app/home.dart".to_string())].into(),
            ..XrefConfig::default()
        };

        let cx = ProjectContext::detect(&MemoryFs::new(), "/app", config.clone());
        assert!(!cx.is_recognized());
        assert_eq!(cx.config(), &config);

        let fs = MemoryFs::new();
        fs.insert("/app/pubspec.yaml", "name: [unclosed");
        assert_eq!(ProjectContext::detect(&fs, "/app", config.clone()).config(), &config);
    }

    #[test]
    fn test_pubspec_section_merges_suggestions() {
        let fs = MemoryFs::new();
        fs.insert(
            "/app/pubspec.yaml",
            "name: app\ndependencies:\n  flutter:\n    sdk: flutter\nxref:\n  i18n_class: L\n  suggestions:\n    Home: package:app/pages/home.dart\n",
        );
        let config = XrefConfig {
            suggestions: [
                ("Home".to_string(), "package:app/home.dart".to_string()),
                ("Demo".to_string(), "package:app/demo.dart".to_string()),
            ]
            .into(),
            ..XrefConfig::default()
        };

        let cx = ProjectContext::detect(&fs, "/app", config);
        let suggestions = &cx.config().suggestions;
        assert_eq!(cx.config().i18n_class, "L");
        assert_eq!(suggestions["Home"], "package:app/pages/home.dart");
        assert_eq!(suggestions["Demo"], "package:app/demo.dart");
    }

    #[test]
    fn test_catalog_selection_by_module() {
        let cx = ProjectContext::new("/app", XrefConfig::default());

        assert_eq!(
            cx.catalog_path(Path::new("/app/lib/main.dart")),
            PathBuf::from("/app/lib/l10n/intl_en.arb")
        );
        assert_eq!(
            cx.catalog_path(Path::new("/app/example/lib/main.dart")),
            PathBuf::from("/app/example/lib/l10n/intl_en.arb")
        );
        // A sibling that merely shares the prefix text is not the secondary module.
        assert_eq!(
            cx.catalog_path(Path::new("/app/examples/main.dart")),
            PathBuf::from("/app/lib/l10n/intl_en.arb")
        );
    }
}
