/*!
 * Tests for treepack functionality
 */

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use indicatif::ProgressBar;
use tempfile::tempdir;

use crate::archive::{parse_script, render_script};
use crate::clipboard::NoopClipboard;
use crate::scanner::Scanner;
use crate::types::{FileContents, FileMap};
use crate::unpack::Unpacker;
use crate::writer::ScriptWriter;

// Helper function to create a test directory structure under `<tmp>/proj`
fn setup_test_directory() -> io::Result<tempfile::TempDir> {
    let temp_dir = tempdir()?;
    let root = temp_dir.path().join("proj");

    fs::create_dir_all(root.join("src").join("nested"))?;
    fs::create_dir(root.join("docs"))?;

    let mut readme = File::create(root.join("README.md"))?;
    writeln!(readme, "# proj")?;

    fs::write(root.join("src").join("main.rs"), "fn main() {}\n")?;
    fs::write(
        root.join("src").join("nested").join("mod.rs"),
        "pub mod deep;\n// ünïcödé\n",
    )?;
    fs::write(root.join("docs").join("empty.txt"), "")?;

    // Version control metadata and build output are never packed
    fs::create_dir(root.join(".git"))?;
    fs::write(
        root.join(".git").join("config"),
        "[core]\n\trepositoryformatversion = 0\n",
    )?;
    fs::create_dir_all(root.join("target").join("debug"))?;
    fs::write(root.join("target").join("debug").join("proj"), "binary")?;

    Ok(temp_dir)
}

fn scan(root: &Path) -> (FileMap, crate::scanner::ScannerStatistics) {
    let scanner = Scanner::new(root, Arc::new(ProgressBar::hidden()));
    let files = scanner.scan().unwrap();
    (files, scanner.get_statistics())
}

fn as_text_map(files: &FileMap) -> BTreeMap<String, String> {
    files
        .iter()
        .map(|e| (e.path.clone(), e.contents.as_text().to_string()))
        .collect()
}

// Read a directory tree back into path -> contents, keyed relative to `base`
fn read_tree(base: &Path) -> BTreeMap<String, String> {
    let mut tree = BTreeMap::new();
    for entry in walkdir::WalkDir::new(base) {
        let entry = entry.unwrap();
        if entry.file_type().is_file() {
            let rel = entry.path().strip_prefix(base).unwrap();
            let key = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy().to_string())
                .collect::<Vec<_>>()
                .join("/");
            tree.insert(key, fs::read_to_string(entry.path()).unwrap());
        }
    }
    tree
}

#[test]
fn test_collect_files() -> io::Result<()> {
    let temp_dir = setup_test_directory()?;
    let (files, stats) = scan(&temp_dir.path().join("proj"));

    let expected: BTreeMap<String, String> = [
        ("proj/README.md", "# proj\n"),
        ("proj/docs/empty.txt", ""),
        ("proj/src/main.rs", "fn main() {}\n"),
        ("proj/src/nested/mod.rs", "pub mod deep;\n// ünïcödé\n"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    assert_eq!(as_text_map(&files), expected);
    assert_eq!(files.unreadable().count(), 0);
    assert_eq!(stats.files_processed, 4);
    assert_eq!(stats.text_files, 4);
    assert_eq!(stats.total_bytes, files.text_bytes());

    Ok(())
}

#[test]
fn test_git_directory_is_excluded() -> io::Result<()> {
    let temp_dir = tempdir()?;
    let root = temp_dir.path().join("a");
    fs::create_dir_all(root.join(".git"))?;
    fs::write(root.join("x.txt"), "hello")?;
    fs::write(root.join(".git").join("ignored"), "secret")?;

    let (files, _) = scan(&root);

    assert_eq!(files.len(), 1);
    assert_eq!(files.get("a/x.txt"), Some(&FileContents::text("hello")));

    Ok(())
}

#[test]
fn test_git_file_is_not_excluded() -> io::Result<()> {
    // Submodules use a plain `.git` file; only directories are pruned
    let temp_dir = tempdir()?;
    let root = temp_dir.path().join("sub");
    fs::create_dir(&root)?;
    fs::write(root.join(".git"), "gitdir: ../.git/modules/sub\n")?;

    let (files, _) = scan(&root);

    assert_eq!(files.paths().collect::<Vec<_>>(), vec!["sub/.git"]);

    Ok(())
}

#[test]
fn test_undecodable_file_is_marked_unreadable() -> io::Result<()> {
    let temp_dir = setup_test_directory()?;
    let root = temp_dir.path().join("proj");
    let mut bin_file = File::create(root.join("logo.png"))?;
    bin_file.write_all(&[0x89u8, 0x50, 0x4e, 0x47, 0xff, 0xfe])?;

    let (files, stats) = scan(&root);

    let contents = files.get("proj/logo.png").unwrap();
    assert!(contents.is_unreadable());
    assert_eq!(contents.as_text(), "");
    assert_eq!(stats.unreadable_files, vec!["proj/logo.png".to_string()]);

    // Everything else is still packed
    assert_eq!(files.len(), 5);
    assert_eq!(
        files.get("proj/src/main.rs"),
        Some(&FileContents::text("fn main() {}\n"))
    );

    Ok(())
}

#[cfg(unix)]
#[test]
fn test_unreadable_permissions_are_tolerated() -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = tempdir()?;
    let root = temp_dir.path().join("p");
    fs::create_dir(&root)?;
    fs::write(root.join("ok.txt"), "ok")?;
    let locked = root.join("locked.txt");
    fs::write(&locked, "private")?;
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000))?;

    // Root can read anything, so only check the outcome when the read fails
    let readable = fs::read(&locked).is_ok();
    let (files, _) = scan(&root);

    assert_eq!(files.get("p/ok.txt"), Some(&FileContents::text("ok")));
    if !readable {
        assert!(files.get("p/locked.txt").unwrap().is_unreadable());
    }

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644))?;
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_symlinked_file_is_followed() -> io::Result<()> {
    let temp_dir = tempdir()?;
    let root = temp_dir.path().join("p");
    fs::create_dir(&root)?;
    fs::write(root.join("real.txt"), "real")?;
    std::os::unix::fs::symlink(root.join("real.txt"), root.join("link.txt"))?;
    std::os::unix::fs::symlink(root.join("missing.txt"), root.join("dangling.txt"))?;

    let (files, _) = scan(&root);

    assert_eq!(files.get("p/link.txt"), Some(&FileContents::text("real")));
    assert!(files.get("p/dangling.txt").is_none());

    Ok(())
}

#[test]
fn test_output_file_inside_root_is_skipped() -> io::Result<()> {
    let temp_dir = tempdir()?;
    let root = temp_dir.path().join("p");
    fs::create_dir(&root)?;
    fs::write(root.join("x.txt"), "x")?;
    let previous = root.join("create_tree.sh");
    fs::write(&previous, "#!/bin/sh\n")?;

    let scanner = Scanner::new(&root, Arc::new(ProgressBar::hidden())).skip_file(&previous);
    let files = scanner.scan().unwrap();

    assert_eq!(files.paths().collect::<Vec<_>>(), vec!["p/x.txt"]);

    Ok(())
}

#[test]
fn test_missing_root_is_an_error() {
    let temp_dir = tempdir().unwrap();
    let scanner = Scanner::new(temp_dir.path().join("nope"), Arc::new(ProgressBar::hidden()));
    assert!(scanner.scan().is_err());
}

#[test]
fn test_render_is_deterministic_for_scanned_tree() -> io::Result<()> {
    let temp_dir = setup_test_directory()?;
    let (first, _) = scan(&temp_dir.path().join("proj"));
    let (second, _) = scan(&temp_dir.path().join("proj"));

    assert_eq!(
        render_script(&first).unwrap(),
        render_script(&second).unwrap()
    );

    Ok(())
}

#[test]
fn test_pack_and_unpack_round_trip() -> io::Result<()> {
    let temp_dir = setup_test_directory()?;
    let root = temp_dir.path().join("proj");
    let (files, _) = scan(&root);

    let out_dir = tempdir()?;
    let script_path = out_dir.path().join("create_tree.sh");
    ScriptWriter::new(&script_path, &NoopClipboard)
        .emit_and_publish(&render_script(&files).unwrap())
        .unwrap();

    let dest = tempdir()?;
    let archive = parse_script(&fs::read_to_string(&script_path)?).unwrap();
    Unpacker::new(dest.path()).unpack(&archive).unwrap();

    assert_eq!(read_tree(dest.path()), as_text_map(&files));

    Ok(())
}

#[test]
fn test_src_only_keeps_src_prefix() -> io::Result<()> {
    let temp_dir = setup_test_directory()?;
    let (files, _) = scan(&temp_dir.path().join("proj").join("src"));

    let mut paths: Vec<&str> = files.paths().collect();
    paths.sort_unstable();
    assert_eq!(paths, vec!["src/main.rs", "src/nested/mod.rs"]);

    Ok(())
}
