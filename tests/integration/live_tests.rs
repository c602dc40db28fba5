use dupesweep::actions::Resolver;
use dupesweep::duplicates::{DuplicateFinder, PairOutcome};
use dupesweep::error::ExitCode;
use dupesweep::rules::{Rule, RuleSet};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write(path: &Path, content: &[u8]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn resolver(keep: &Path, remove: &Path, live: bool) -> Resolver {
    Resolver::new(
        RuleSet::new(vec![Rule::new(keep, remove).unwrap()]).unwrap(),
        live,
    )
}

#[test]
fn test_live_deletes_remove_side_only() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a");
    let b = dir.path().join("b");
    write(&a.join("x.png"), b"identical pixels");
    write(&b.join("y.png"), b"identical pixels");

    let finder = DuplicateFinder::with_defaults();
    let report = finder.run(dir.path(), &resolver(&a, &b, true)).unwrap();

    assert_eq!(report.summary.deleted, 1);
    assert_eq!(report.summary.reclaimable_bytes, 16);
    assert!(a.join("x.png").exists());
    assert!(!b.join("y.png").exists());
    assert_eq!(ExitCode::from_summary(&report.summary), ExitCode::Success);
}

#[test]
fn test_live_round_trip_rescan_is_clean() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a");
    let b = dir.path().join("b");
    for i in 0..3 {
        let content = format!("photo {i}");
        write(&a.join(format!("{i}.jpg")), content.as_bytes());
        write(&b.join(format!("copy_{i}.jpg")), content.as_bytes());
    }

    let finder = DuplicateFinder::with_defaults();
    let live = finder.run(dir.path(), &resolver(&a, &b, true)).unwrap();
    assert_eq!(live.summary.deleted, 3);

    let rescan = finder.run(dir.path(), &resolver(&a, &b, false)).unwrap();
    assert_eq!(rescan.summary.total_files, 3);
    assert_eq!(rescan.pairs().count(), 0);
    assert_eq!(
        ExitCode::from_summary(&rescan.summary),
        ExitCode::NoDuplicates
    );
}

#[test]
fn test_live_keeps_unmatched_and_collided_files() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a");
    let b = dir.path().join("b");
    let c = dir.path().join("c");
    write(&a.join("x"), b"dup");
    write(&c.join("x"), b"dup");
    write(&b.join("y"), b"other");

    let finder = DuplicateFinder::with_defaults();
    let report = finder.run(dir.path(), &resolver(&a, &b, true)).unwrap();

    // a/x and c/x are identical but no rule covers a/c.
    assert_eq!(report.summary.unresolved, 1);
    assert_eq!(report.summary.deleted, 0);
    assert!(a.join("x").exists());
    assert!(c.join("x").exists());
    assert!(b.join("y").exists());
}

#[cfg(unix)]
#[test]
fn test_delete_failure_continues_run() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let a = dir.path().join("a");
    let b = dir.path().join("b");
    write(&a.join("one"), b"first pair");
    write(&b.join("one"), b"first pair");
    write(&a.join("two"), b"second pair");
    write(&b.join("two"), b"second pair");
    fs::set_permissions(&b, fs::Permissions::from_mode(0o555)).unwrap();

    let finder = DuplicateFinder::with_defaults();
    let result = finder.run(dir.path(), &resolver(&a, &b, true));

    fs::set_permissions(&b, fs::Permissions::from_mode(0o755)).unwrap();
    let report = result.unwrap();

    // Root bypasses directory permissions; only check the failure path
    // when the deletions were actually refused.
    if b.join("one").exists() {
        let failures: Vec<_> = report
            .pairs()
            .filter(|p| matches!(p.outcome, PairOutcome::DeleteFailed { .. }))
            .collect();
        assert_eq!(failures.len(), 2);
        assert_eq!(report.summary.delete_failures, 2);
        assert_eq!(
            ExitCode::from_summary(&report.summary),
            ExitCode::PartialSuccess
        );
    }
    assert_eq!(report.pairs().count(), 2);
    assert!(a.join("one").exists());
    assert!(a.join("two").exists());
}
