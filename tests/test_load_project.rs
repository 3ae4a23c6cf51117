//! Loading a Flutter project from disk.

use std::fs;
use std::path::Path;

use xref::ide::GotoTarget;
use xref::project::load_project;

fn write(root: &Path, path: &str, text: &str) {
    let path = root.join(path);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}

fn flutter_project(root: &Path) {
    write(
        root,
        "pubspec.yaml",
        "name: demo\ndependencies:\n  flutter:\n    sdk: flutter\n",
    );
    write(root, "lib/l10n/intl_en.arb", r#"{ "title": "Demo" }"#);
    write(root, "lib/main.dart", "final title = S.current.title;\nfinal logo = R.image.logo;\n");
    write(
        root,
        "lib/r.dart",
        "class R { static const image = _I(); }\nclass _I { String get logo => 'assets/logo.png'; }\n",
    );
    write(root, "assets/logo.png", "\u{89}PNG");
    write(root, "build/generated.dart", "class Generated {}");
}

#[test]
fn test_loaded_project_resolves_references() {
    let dir = tempfile::tempdir().unwrap();
    flutter_project(dir.path());

    let host = load_project(dir.path()).unwrap();
    assert!(host.project().is_recognized());
    assert!(host.file_id(&dir.path().join("build/generated.dart")).is_none());

    let main = host.file_id(&dir.path().join("lib/main.dart")).unwrap();
    let analysis = host.analysis();

    let folds = analysis.folding_ranges(main);
    assert_eq!(folds.len(), 1);
    assert_eq!(folds[0].placeholder, "Demo");

    let links = analysis.document_links(main);
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].target, dir.path().join("assets/logo.png"));

    let source = fs::read_to_string(dir.path().join("lib/main.dart")).unwrap();
    let offset = source.find("logo;").unwrap() as u32;
    assert_eq!(
        analysis.goto_definition(main, offset.into()),
        Some(GotoTarget::File(dir.path().join("assets/logo.png")))
    );
}

#[test]
fn test_pubspec_section_configures_resolvers() {
    let dir = tempfile::tempdir().unwrap();
    flutter_project(dir.path());
    write(
        dir.path(),
        "pubspec.yaml",
        "name: demo\ndependencies:\n  flutter:\n    sdk: flutter\nxref:\n  i18n_class: L\n",
    );
    write(dir.path(), "lib/main.dart", "final a = S.current.title;\nfinal b = L.current.title;\n");

    let host = load_project(dir.path()).unwrap();
    let main = host.file_id(&dir.path().join("lib/main.dart")).unwrap();
    let folds = host.analysis().folding_ranges(main);

    assert_eq!(folds.len(), 1);
    assert_eq!(folds[0].start_line, 1);
}

#[test]
fn test_project_without_flutter_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    flutter_project(dir.path());
    write(dir.path(), "pubspec.yaml", "name: plain\ndependencies:\n  http: ^1.0.0\n");

    let host = load_project(dir.path()).unwrap();
    assert!(!host.project().is_recognized());

    let main = host.file_id(&dir.path().join("lib/main.dart")).unwrap();
    assert!(host.analysis().folding_ranges(main).is_empty());
}
