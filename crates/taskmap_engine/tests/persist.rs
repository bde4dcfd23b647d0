use std::fs;

use taskmap_engine::write_atomically;
use tempfile::TempDir;

#[test]
fn creates_missing_parent_dirs() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("nested").join("map.json");
    write_atomically(&target, "{}").unwrap();
    assert_eq!(fs::read_to_string(&target).unwrap(), "{}");
}

#[test]
fn replaces_existing_file() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("map.json");
    write_atomically(&target, "first").unwrap();
    write_atomically(&target, "second").unwrap();
    assert_eq!(fs::read_to_string(&target).unwrap(), "second");
    // No stray temp files left behind.
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
}

#[test]
fn fails_when_parent_is_a_file() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("not_a_dir");
    fs::write(&blocker, "x").unwrap();

    let result = write_atomically(&blocker.join("map.json"), "data");
    assert!(result.is_err());
    assert_eq!(fs::read_to_string(&blocker).unwrap(), "x");
}
