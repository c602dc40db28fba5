use dupesweep::actions::Resolver;
use dupesweep::duplicates::{DuplicateFinder, FinderConfig, PairOutcome};
use dupesweep::output::TextOutput;
use dupesweep::rules::{Rule, RuleSet};
use dupesweep::scanner::WalkerConfig;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write(path: &Path, content: &[u8]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn resolver(keep: &Path, remove: &Path) -> Resolver {
    Resolver::new(
        RuleSet::new(vec![Rule::new(keep, remove).unwrap()]).unwrap(),
        false,
    )
}

#[test]
fn test_decomposed_directory_name_matches_composed_rule() {
    let dir = tempdir().unwrap();
    let keep_on_disk = dir.path().join("cafe\u{0301}");
    let remove = dir.path().join("inbox");
    write(&keep_on_disk.join("menu.jpg"), b"menu");
    write(&remove.join("menu.jpg"), b"menu");

    let finder = DuplicateFinder::with_defaults();
    let report = finder
        .run(dir.path(), &resolver(&dir.path().join("café"), &remove))
        .unwrap();

    let pair = report.pairs().next().unwrap();
    assert!(matches!(pair.outcome, PairOutcome::WouldDelete { .. }));
    assert_eq!(pair.outcome.target(), Some(&remove.join("menu.jpg")));
}

#[test]
fn test_rule_with_trailing_separator_and_dot() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a");
    let b = dir.path().join("b");
    write(&a.join("x"), b"dup");
    write(&b.join("x"), b"dup");

    let keep = format!("{}/./", a.display());
    let remove = format!("{}//", b.display());

    let finder = DuplicateFinder::with_defaults();
    let report = finder
        .run(dir.path(), &resolver(Path::new(&keep), Path::new(&remove)))
        .unwrap();

    assert_eq!(report.summary.would_delete, 1);
}

#[test]
fn test_parent_component_in_root_still_matches_rule() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a");
    let b = dir.path().join("b");
    write(&a.join("x.png"), b"identical pixels");
    write(&b.join("y.png"), b"identical pixels");

    let finder = DuplicateFinder::with_defaults();
    let report = finder.run(&a.join(".."), &resolver(&a, &b)).unwrap();

    let pair = report.pairs().next().unwrap();
    assert!(matches!(pair.outcome, PairOutcome::WouldDelete { .. }));
    assert_eq!(report.summary.unresolved, 0);
}

#[test]
fn test_parent_component_in_rule_is_resolved() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a");
    let b = dir.path().join("b");
    write(&a.join("x"), b"dup");
    write(&b.join("x"), b"dup");

    let finder = DuplicateFinder::with_defaults();
    let report = finder
        .run(dir.path(), &resolver(&b.join("../a"), &a.join("../b")))
        .unwrap();

    assert_eq!(report.summary.would_delete, 1);
    assert_eq!(report.pairs().next().unwrap().outcome.target(), Some(&b.join("x")));
}

#[test]
fn test_nested_directory_does_not_match_parent_rule() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a");
    let b = dir.path().join("b");
    write(&a.join("x"), b"dup");
    write(&b.join("nested/x"), b"dup");

    let finder = DuplicateFinder::with_defaults();
    let report = finder.run(dir.path(), &resolver(&a, &b)).unwrap();

    // Rules compare the immediate parent only.
    assert_eq!(report.pairs().next().unwrap().outcome, PairOutcome::Unresolved);
}

#[cfg(unix)]
#[test]
fn test_symlinks_are_not_followed() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a");
    write(&a.join("x"), b"target");
    std::os::unix::fs::symlink(a.join("x"), dir.path().join("link_to_x")).unwrap();
    std::os::unix::fs::symlink(&a, dir.path().join("link_to_a")).unwrap();

    let finder = DuplicateFinder::with_defaults();
    let report = finder
        .run(dir.path(), &resolver(Path::new("/k"), Path::new("/r")))
        .unwrap();

    assert_eq!(report.summary.total_files, 1);
    assert_eq!(report.pairs().count(), 0);
}

#[test]
fn test_skip_hidden_entries() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("visible/x"), b"dup");
    write(&dir.path().join(".cache/x"), b"dup");
    write(&dir.path().join("visible/.x"), b"dup");

    let config = FinderConfig::default().with_walker_config(WalkerConfig::new(true, None));
    let finder = DuplicateFinder::new(config);
    let report = finder
        .run(dir.path(), &resolver(Path::new("/k"), Path::new("/r")))
        .unwrap();

    assert_eq!(report.summary.total_files, 1);
    assert_eq!(report.pairs().count(), 0);

    let all = DuplicateFinder::with_defaults()
        .run(dir.path(), &resolver(Path::new("/k"), Path::new("/r")))
        .unwrap();
    assert_eq!(all.summary.total_files, 3);
    assert_eq!(all.pairs().count(), 2);
}

#[test]
fn test_empty_files_are_duplicates() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a");
    let b = dir.path().join("b");
    write(&a.join("empty"), b"");
    write(&b.join("also_empty"), b"");

    let finder = DuplicateFinder::with_defaults();
    let report = finder.run(dir.path(), &resolver(&a, &b)).unwrap();

    assert_eq!(report.summary.would_delete, 1);
    assert_eq!(report.summary.reclaimable_bytes, 0);
}

#[test]
fn test_shared_base_names_listed() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("cam1/IMG_0001.JPG"), b"first camera");
    write(&dir.path().join("cam2/IMG_0001.JPG"), b"second camera");
    write(&dir.path().join("cam2/IMG_0002.JPG"), b"another");

    let config = FinderConfig::default().with_report_names(true);
    let report = DuplicateFinder::new(config)
        .run(dir.path(), &resolver(Path::new("/k"), Path::new("/r")))
        .unwrap();

    assert_eq!(report.shared_names.len(), 1);
    assert_eq!(report.shared_names[0].base_name, "IMG_0001.JPG");
    assert_eq!(report.shared_names[0].paths.len(), 2);
    assert_eq!(report.pairs().count(), 0);

    let text = TextOutput::new(&report).render().unwrap();
    assert!(text.contains("Files sharing a base name:"));
}

#[test]
fn test_names_off_by_default() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("one/same"), b"1");
    write(&dir.path().join("two/same"), b"2");

    let report = DuplicateFinder::with_defaults()
        .run(dir.path(), &resolver(Path::new("/k"), Path::new("/r")))
        .unwrap();

    assert!(report.shared_names.is_empty());
}
