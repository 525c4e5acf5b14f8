use later_core::{CommandError, CommandRouter, RecordStore, SqliteStore, StoreLocation};
use tempfile::TempDir;

// ── Helpers ──────────────────────────────────────────────────────────

/// One CLI invocation: open, run, close.
fn invoke(location: &StoreLocation, args: &[&str]) -> Result<String, CommandError> {
    let store = SqliteStore::open(location).unwrap();
    let mut out = Vec::new();
    let result = CommandRouter::new(&store).handle(args, &mut out);
    store.close().unwrap();
    result.map(|()| String::from_utf8(out).unwrap())
}

// ── Tests ────────────────────────────────────────────────────────────

#[test]
fn push_list_delete_count_pop() {
    let tmp = TempDir::new().unwrap();
    let location = StoreLocation::in_base_dir(tmp.path());

    assert_eq!(invoke(&location, &["push", "buy", "milk"]).unwrap(), "");
    assert_eq!(invoke(&location, &["push", "call", "Alice"]).unwrap(), "");

    let listed = invoke(&location, &["list"]).unwrap();
    let lines: Vec<&str> = listed.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("2. call Alice (created at: "));
    assert!(lines[1].starts_with("1. buy milk (created at: "));
    assert!(lines.iter().all(|l| l.ends_with(')')));

    invoke(&location, &["delete", "1"]).unwrap();
    let listed = invoke(&location, &["list"]).unwrap();
    let lines: Vec<&str> = listed.lines().collect();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("2. call Alice"));

    assert_eq!(invoke(&location, &["count"]).unwrap(), "1\n");
    invoke(&location, &["pop"]).unwrap();
    assert_eq!(invoke(&location, &["count"]).unwrap(), "0\n");
}

#[test]
fn clean_then_next_invocation_starts_fresh() {
    let tmp = TempDir::new().unwrap();
    let location = StoreLocation::in_base_dir(tmp.path());

    invoke(&location, &["push", "a"]).unwrap();
    invoke(&location, &["push", "b"]).unwrap();
    invoke(&location, &["clean"]).unwrap();
    assert!(!tmp.path().join(".later").exists());

    assert_eq!(invoke(&location, &["count"]).unwrap(), "0\n");
    invoke(&location, &["push", "again"]).unwrap();
    assert_eq!(invoke(&location, &["show", "1"]).unwrap(), "again\n");
}

#[test]
fn count_equals_list_length() {
    let tmp = TempDir::new().unwrap();
    let location = StoreLocation::File(tmp.path().join("tasks.db"));

    for text in ["one", "two", "three", "four"] {
        invoke(&location, &["push", text]).unwrap();
    }
    invoke(&location, &["delete", "2"]).unwrap();
    invoke(&location, &["delete", "200"]).unwrap();

    let listed = invoke(&location, &["list"]).unwrap();
    let count: usize = invoke(&location, &["count"]).unwrap().trim().parse().unwrap();
    assert_eq!(listed.lines().count(), count);
    assert_eq!(count, 3);
}

#[test]
fn show_missing_id_fails() {
    let tmp = TempDir::new().unwrap();
    let location = StoreLocation::in_base_dir(tmp.path());

    let err = invoke(&location, &["show", "5"]).unwrap_err();
    assert!(matches!(err, CommandError::Storage { .. }));
}

#[test]
fn router_works_through_trait_object() {
    let store: Box<dyn RecordStore> = Box::new(SqliteStore::open_memory().unwrap());
    let router = CommandRouter::new(&*store);
    let mut out = Vec::new();
    router.handle(&["push", "boxed"], &mut out).unwrap();
    router.handle(&["show", "1"], &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "boxed\n");
    store.close().unwrap();
}
