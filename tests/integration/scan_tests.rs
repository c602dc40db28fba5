use dupesweep::actions::Resolver;
use dupesweep::duplicates::{DuplicateFinder, FinderConfig, PairOutcome};
use dupesweep::error::ExitCode;
use dupesweep::output::{JsonOutput, TextOutput};
use dupesweep::rules::{Rule, RuleSet};
use dupesweep::scanner::{FileEntry, WalkerConfig};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write(path: &Path, content: &[u8]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn resolver<P: AsRef<Path>>(rules: &[(P, P)], live: bool) -> Resolver {
    let rules = rules
        .iter()
        .map(|(keep, remove)| Rule::new(keep, remove).unwrap())
        .collect();
    Resolver::new(RuleSet::new(rules).unwrap(), live)
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let finder = DuplicateFinder::with_defaults();
    let report = finder
        .run(dir.path(), &resolver(&[(Path::new("/a"), Path::new("/b"))], false))
        .unwrap();

    assert!(report.events.is_empty());
    assert_eq!(report.summary.total_files, 0);
    assert_eq!(ExitCode::from_summary(&report.summary), ExitCode::NoDuplicates);
}

#[test]
fn test_dry_run_would_delete_and_keeps_both() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a");
    let b = dir.path().join("b");
    write(&a.join("x.png"), b"identical pixels");
    write(&b.join("y.png"), b"identical pixels");

    let finder = DuplicateFinder::with_defaults();
    let report = finder.run(dir.path(), &resolver(&[(&a, &b)], false)).unwrap();

    let pairs: Vec<_> = report.pairs().collect();
    assert_eq!(pairs.len(), 1);
    assert_eq!(
        pairs[0].outcome,
        PairOutcome::WouldDelete {
            keep: a.join("x.png"),
            remove: b.join("y.png"),
            rule_index: 0,
        }
    );

    let text = TextOutput::new(&report).render().unwrap();
    assert!(text.contains(&format!("would delete {}", b.join("y.png").display())));
    assert!(a.join("x.png").exists());
    assert!(b.join("y.png").exists());
}

#[test]
fn test_every_file_is_reported() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("one"), b"1");
    write(&dir.path().join("two"), b"2");
    write(&dir.path().join("sub/three"), b"3");
    write(&dir.path().join("sub/empty"), b"");

    let finder = DuplicateFinder::with_defaults();
    let report = finder
        .run(dir.path(), &resolver(&[(Path::new("/a"), Path::new("/b"))], false))
        .unwrap();

    assert_eq!(report.summary.total_files, 4);
    assert_eq!(report.summary.total_bytes, 3);
    assert_eq!(report.pairs().count(), 0);
}

#[test]
fn test_no_rule_match_is_unresolved() {
    let dir = tempdir().unwrap();
    let c = dir.path().join("c");
    let d = dir.path().join("d");
    write(&c.join("x"), b"same");
    write(&d.join("x"), b"same");

    let finder = DuplicateFinder::with_defaults();
    let report = finder
        .run(
            dir.path(),
            &resolver(&[(&dir.path().join("a"), &dir.path().join("b"))], true),
        )
        .unwrap();

    let pair = report.pairs().next().unwrap();
    assert_eq!(pair.outcome, PairOutcome::Unresolved);
    assert_eq!(report.summary.unresolved, 1);
    assert!(c.join("x").exists());
    assert!(d.join("x").exists());

    let text = TextOutput::new(&report).render().unwrap();
    assert!(text.contains("(no rule found)"));
}

#[test]
fn test_forged_collision_never_deletes() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a");
    let b = dir.path().join("b");
    write(&a.join("x.png"), b"content one");
    write(&b.join("y.png"), b"content two");

    let forged = [0x5a; 32];
    let entries = vec![
        FileEntry::new(a.join("x.png"), 11).with_digest(forged),
        FileEntry::new(b.join("y.png"), 11).with_digest(forged),
    ];

    let finder = DuplicateFinder::with_defaults();
    let report = finder
        .resolve_all(&entries, &resolver(&[(&a, &b)], true))
        .unwrap();

    assert_eq!(report.pairs().next().unwrap().outcome, PairOutcome::NotIdentical);
    assert_eq!(report.summary.hash_collisions, 1);
    assert_eq!(report.summary.deleted, 0);
    assert!(b.join("y.png").exists());

    let text = TextOutput::new(&report).render().unwrap();
    assert!(text.contains("Hash collision but not identical"));
}

#[test]
fn test_rule_symmetric_in_discovery_order() {
    // Sorted walk: "a_remove" is visited before "z_keep", so the
    // representative sits in the remove directory.
    let dir = tempdir().unwrap();
    let keep = dir.path().join("z_keep");
    let remove = dir.path().join("a_remove");
    write(&keep.join("x"), b"dup");
    write(&remove.join("x"), b"dup");

    let finder = DuplicateFinder::with_defaults();
    let report = finder
        .run(dir.path(), &resolver(&[(&keep, &remove)], false))
        .unwrap();

    let pair = report.pairs().next().unwrap();
    assert_eq!(pair.original, remove.join("x"));
    assert_eq!(pair.outcome.target(), Some(&remove.join("x")));
}

#[test]
fn test_first_matching_rule_wins() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a");
    let b = dir.path().join("b");
    write(&a.join("x"), b"dup");
    write(&b.join("x"), b"dup");

    // Contradictory rules: the first one decides.
    let finder = DuplicateFinder::with_defaults();
    let report = finder
        .run(dir.path(), &resolver(&[(&b, &a), (&a, &b)], false))
        .unwrap();

    match &report.pairs().next().unwrap().outcome {
        PairOutcome::WouldDelete {
            remove, rule_index, ..
        } => {
            assert_eq!(remove, &a.join("x"));
            assert_eq!(*rule_index, 0);
        }
        other => panic!("unexpected outcome: {other:?}"),
    };
}

#[test]
fn test_single_representative_pairs() {
    let dir = tempdir().unwrap();
    for name in ["a", "b", "c"] {
        write(&dir.path().join(name).join("x"), b"triplicate");
    }

    let finder = DuplicateFinder::with_defaults();
    let report = finder
        .run(dir.path(), &resolver(&[(Path::new("/k"), Path::new("/r"))], false))
        .unwrap();

    let originals: Vec<_> = report.pairs().map(|p| p.original.clone()).collect();
    let first = dir.path().join("a").join("x");
    assert_eq!(originals, vec![first.clone(), first]);
}

#[test]
fn test_dry_run_is_idempotent() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a");
    let b = dir.path().join("b");
    write(&a.join("x"), b"dup");
    write(&b.join("x"), b"dup");
    write(&b.join("z"), b"unique");

    let finder = DuplicateFinder::with_defaults();
    let rules = resolver(&[(&a, &b)], false);

    let first = finder.run(dir.path(), &rules).unwrap();
    let second = finder.run(dir.path(), &rules).unwrap();

    assert_eq!(first.events, second.events);
    let json_first = JsonOutput::new(&first, ExitCode::Success).to_json().unwrap();
    let json_second = JsonOutput::new(&second, ExitCode::Success).to_json().unwrap();
    assert_eq!(json_first, json_second);
}

#[test]
fn test_min_size_filter() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a/small"), b"x");
    write(&dir.path().join("b/small"), b"x");
    write(&dir.path().join("a/large"), b"large enough");

    let config =
        FinderConfig::default().with_walker_config(WalkerConfig::new(false, Some(5)));
    let finder = DuplicateFinder::new(config);
    let report = finder
        .run(dir.path(), &resolver(&[(Path::new("/a"), Path::new("/b"))], false))
        .unwrap();

    assert_eq!(report.summary.total_files, 1);
    assert_eq!(report.pairs().count(), 0);
}
