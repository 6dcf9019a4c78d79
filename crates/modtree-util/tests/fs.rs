use modtree_util::fs::{ensure_dir, expand_home, home_dir, write_with_parents};
use tempfile::TempDir;

#[test]
fn test_ensure_dir_creates_nested() {
    let tmp = TempDir::new().unwrap();
    let deep = tmp.path().join("x").join("y").join("z");
    assert!(!deep.exists());
    ensure_dir(&deep).unwrap();
    assert!(deep.is_dir());
}

#[test]
fn test_ensure_dir_idempotent() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("already");
    std::fs::create_dir(&dir).unwrap();
    ensure_dir(&dir).unwrap();
    assert!(dir.is_dir());
}

#[test]
fn test_write_with_parents() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("github.com").join("a").join("b").join("go.mod");
    write_with_parents(&file, b"module x\n").unwrap();
    assert_eq!(std::fs::read(&file).unwrap(), b"module x\n");
}

#[test]
fn test_expand_home_prefix() {
    let expanded = expand_home("~/.modtree/manifests");
    assert_eq!(expanded, home_dir().join(".modtree/manifests"));
}

#[test]
fn test_expand_home_leaves_absolute_paths() {
    assert_eq!(
        expand_home("/var/tmp/modtree"),
        std::path::PathBuf::from("/var/tmp/modtree")
    );
}
