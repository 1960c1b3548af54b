use super::*;
use std::fs;
use std::path::{Path, PathBuf};

fn collect_relative_paths(walker: Walker) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    for entry in walker {
        let entry = entry.expect("walker entry");
        if entry.is_root() {
            continue;
        }
        paths.push(entry.relative_path().to_path_buf());
    }
    paths
}

#[test]
fn walk_errors_when_root_missing() {
    let error = match WalkBuilder::new("/nonexistent/path/for/walker").build() {
        Ok(_) => panic!("missing root should fail"),
        Err(error) => error,
    };
    assert_eq!(error.action(), WalkAction::InspectRoot);
    assert_eq!(error.path(), Path::new("/nonexistent/path/for/walker"));
    assert_eq!(error.io_kind(), std::io::ErrorKind::NotFound);
}

#[test]
fn walk_single_file_emits_root_entry() {
    let temp = tempfile::tempdir().expect("tempdir");
    let file = temp.path().join("file.txt");
    fs::write(&file, b"contents").expect("write");

    let mut walker = WalkBuilder::new(&file).build().expect("build walker");
    let entry = walker.next().expect("entry").expect("entry ok");
    assert!(entry.is_root());
    assert_eq!(entry.kind(), EntryKind::File);
    assert_eq!(entry.len(), 8);
    assert_eq!(entry.full_path(), file);
    assert!(walker.next().is_none());
}

#[test]
fn walk_directory_yields_parents_before_children_in_name_order() {
    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path().join("root");
    fs::create_dir(&root).expect("create root");
    fs::create_dir(root.join("b")).expect("dir b");
    fs::create_dir(root.join("a")).expect("dir a");
    fs::write(root.join("a/inner.txt"), b"data").expect("write inner");
    fs::write(root.join("c.txt"), b"data").expect("write file");

    let walker = WalkBuilder::new(&root).build().expect("build walker");
    assert_eq!(
        collect_relative_paths(walker),
        vec![
            PathBuf::from("a"),
            PathBuf::from("a/inner.txt"),
            PathBuf::from("b"),
            PathBuf::from("c.txt"),
        ]
    );
}

#[test]
fn include_root_false_skips_root_entry() {
    let temp = tempfile::tempdir().expect("tempdir");
    fs::write(temp.path().join("only.txt"), b"x").expect("write");

    let entries: Vec<_> = WalkBuilder::new(temp.path())
        .include_root(false)
        .build()
        .expect("build walker")
        .map(|entry| entry.expect("entry"))
        .collect();
    assert_eq!(entries.len(), 1);
    assert!(!entries[0].is_root());
    assert_eq!(entries[0].depth(), 1);
}

#[test]
fn empty_directory_yields_only_root() {
    let temp = tempfile::tempdir().expect("tempdir");
    let mut walker = WalkBuilder::new(temp.path()).build().expect("build walker");
    let root = walker.next().expect("root").expect("root ok");
    assert_eq!(root.kind(), EntryKind::Directory);
    assert!(walker.next().is_none());
}

#[test]
fn depth_tracks_nesting() {
    let temp = tempfile::tempdir().expect("tempdir");
    fs::create_dir_all(temp.path().join("x/y")).expect("mkdir");
    fs::write(temp.path().join("x/y/z.bin"), b"12345").expect("write");

    let depths: Vec<_> = WalkBuilder::new(temp.path())
        .build()
        .expect("build walker")
        .map(|entry| entry.expect("entry").depth())
        .collect();
    assert_eq!(depths, vec![0, 1, 2, 3]);
}

#[cfg(unix)]
#[test]
fn walk_does_not_follow_symlink_by_default() {
    use std::os::unix::fs::symlink;

    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path().join("root");
    let target = temp.path().join("target");
    fs::create_dir(&root).expect("create root");
    fs::create_dir(&target).expect("create target");
    fs::write(target.join("inner.txt"), b"data").expect("write inner");
    symlink(&target, root.join("link")).expect("create symlink");

    let mut walker = WalkBuilder::new(&root)
        .include_root(false)
        .build()
        .expect("build walker");
    let link = walker.next().expect("link").expect("link ok");
    assert!(link.is_symlink());
    assert_eq!(link.kind(), EntryKind::Other);
    assert!(walker.next().is_none());
}

#[cfg(unix)]
#[test]
fn walk_follows_symlinks_when_enabled() {
    use std::os::unix::fs::symlink;

    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path().join("root");
    let target = temp.path().join("target");
    fs::create_dir(&root).expect("create root");
    fs::create_dir(&target).expect("create target");
    fs::write(target.join("inner.txt"), b"data").expect("write inner");
    fs::write(temp.path().join("blob"), b"123456").expect("write blob");
    symlink(&target, root.join("link")).expect("dir symlink");
    symlink(temp.path().join("blob"), root.join("file_link")).expect("file symlink");

    let entries: Vec<_> = WalkBuilder::new(&root)
        .follow_symlinks(true)
        .include_root(false)
        .build()
        .expect("build walker")
        .map(|entry| entry.expect("entry"))
        .collect();

    let summary: Vec<_> = entries
        .iter()
        .map(|entry| (entry.relative_path().to_path_buf(), entry.kind(), entry.len()))
        .collect();
    assert_eq!(summary[0].0, PathBuf::from("file_link"));
    assert_eq!(summary[0].1, EntryKind::File);
    assert_eq!(summary[0].2, 6);
    assert_eq!(summary[1].0, PathBuf::from("link"));
    assert_eq!(summary[1].1, EntryKind::Directory);
    assert_eq!(summary[2].0, PathBuf::from("link/inner.txt"));
    assert_eq!(entries[2].full_path(), root.join("link/inner.txt"));
    assert_eq!(entries.len(), 3);
}

#[cfg(unix)]
#[test]
fn dangling_symlink_is_reported_as_other() {
    use std::os::unix::fs::symlink;

    let temp = tempfile::tempdir().expect("tempdir");
    symlink(temp.path().join("missing"), temp.path().join("broken")).expect("symlink");

    let entries: Vec<_> = WalkBuilder::new(temp.path())
        .follow_symlinks(true)
        .include_root(false)
        .build()
        .expect("build walker")
        .map(|entry| entry.expect("entry"))
        .collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].kind(), EntryKind::Other);
}

#[cfg(unix)]
#[test]
fn walk_root_symlink_followed_when_enabled() {
    use std::os::unix::fs::symlink;

    let temp = tempfile::tempdir().expect("tempdir");
    let target = temp.path().join("target");
    fs::create_dir(&target).expect("create target");
    fs::write(target.join("file.txt"), b"data").expect("write file");
    let link = temp.path().join("link");
    symlink(&target, &link).expect("create symlink");

    let mut walker = WalkBuilder::new(&link)
        .follow_symlinks(true)
        .build()
        .expect("build walker");

    let root = walker.next().expect("root entry").expect("root ok");
    assert!(root.is_root());
    assert!(root.is_symlink());
    assert_eq!(root.kind(), EntryKind::Directory);

    let child = walker.next().expect("child entry").expect("child ok");
    assert_eq!(child.relative_path(), Path::new("file.txt"));
    assert_eq!(child.full_path(), link.join("file.txt"));
    assert!(walker.next().is_none());
}

#[cfg(unix)]
#[test]
fn walk_detects_symlink_cycles() {
    use std::os::unix::fs::symlink;

    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path().join("root");
    fs::create_dir(&root).expect("create root");
    symlink(&root, root.join("self")).expect("symlink");

    let walker = WalkBuilder::new(&root)
        .follow_symlinks(true)
        .build()
        .expect("build walker");
    assert_eq!(collect_relative_paths(walker), vec![PathBuf::from("self")]);
}

#[test]
fn walk_entry_file_name_matches_tail_component() {
    use std::ffi::OsStr;

    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path().join("root");
    let nested_dir = root.join("nested");
    fs::create_dir_all(&nested_dir).expect("create nested");
    fs::write(nested_dir.join("file.txt"), b"data").expect("write nested file");

    let mut walker = WalkBuilder::new(&root).build().expect("build walker");
    assert_eq!(walker.root(), root.as_path());
    let root_entry = walker.next().expect("root entry").expect("root ok");
    assert!(root_entry.file_name().is_none());

    let dir_entry = walker.next().expect("dir entry").expect("dir ok");
    assert_eq!(dir_entry.file_name(), Some(OsStr::new("nested")));

    let file_entry = walker.next().expect("file entry").expect("file ok");
    assert_eq!(file_entry.file_name(), Some(OsStr::new("file.txt")));
}
