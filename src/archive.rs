/*!
 * Archive format embedded in generated scripts
 *
 * A generated script is a fixed shell preamble, a marker line, and a JSON
 * document listing every packed file. The preamble never changes with the
 * data: it hands the script to `treepack-unpack` when installed, and falls
 * back to a fixed python3 replay routine so the script works on its own.
 */

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{FileEntry, FileMap};

/// Value of the `format` field
pub const ARCHIVE_FORMAT: &str = "treepack";

/// Current archive version
pub const ARCHIVE_VERSION: u32 = 1;

/// Line separating the shell preamble from the archive JSON
pub const ARCHIVE_MARKER: &str = "__TREEPACK_ARCHIVE__";

const SCRIPT_PREAMBLE: &str = r#"#!/bin/sh
# Recreates the packed directory tree in the current directory, then copies
# this script back to the clipboard. Existing files are overwritten.
#
# Usage:
#     sh create_tree.sh
#
# Uses treepack-unpack when it is installed, python3 otherwise.
# TREEPACK_CLIPBOARD picks the clipboard command (default pbcopy, "none" to skip).
if command -v treepack-unpack >/dev/null 2>&1; then
    exec treepack-unpack "$0"
fi
if command -v python3 >/dev/null 2>&1; then
    exec python3 - "$0" <<'TREEPACK_REPLAY'
import json, os, subprocess, sys

MARKER = "__TREEPACK_" + "ARCHIVE__"


def load_archive(source):
    offset = 0
    for line in source.split("\n"):
        offset += len(line) + 1
        if line.rstrip("\r") == MARKER:
            archive = json.loads(source[offset:])
            if archive.get("format") != "treepack" or archive.get("version") != 1:
                sys.exit("unsupported archive format")
            return archive
    sys.exit("no archive marker found in script")


def safe_path(raw):
    parts = [p for p in raw.split("/") if p not in ("", ".")]
    if raw.startswith("/") or not parts or ".." in parts or ":" in parts[0]:
        sys.exit("unsafe path in archive: %r" % raw)
    return os.path.join(*parts)


def create_files(entries):
    targets = [safe_path(entry["path"]) for entry in entries]
    for entry, target in zip(entries, targets):
        if entry.get("kind") != "text":
            print("Skipping %s: contents were not packed (%s)"
                  % (entry["path"], entry.get("reason", "")), file=sys.stderr)
            continue
        dir_path = os.path.dirname(target)
        if dir_path and not os.path.exists(dir_path):
            os.makedirs(dir_path, exist_ok=True)
            print("Created directory: %s" % dir_path)
        with open(target, "w", encoding="utf-8", newline="") as f:
            f.write(entry["contents"])
        print("Created file: %s" % target)


def copy_self_to_clipboard(source):
    choice = os.environ.get("TREEPACK_CLIPBOARD", "").strip()
    if choice.lower() == "none":
        return
    command = choice.split() or ["pbcopy"]
    try:
        subprocess.run(command, input=source, encoding="utf-8", check=True,
                       stdout=subprocess.DEVNULL)
        print("The script's contents have been copied to the clipboard.")
    except Exception as e:
        print("Failed to copy script to clipboard: %s" % e, file=sys.stderr)


with open(sys.argv[1], encoding="utf-8", newline="") as f:
    SOURCE = f.read()
create_files(load_archive(SOURCE)["entries"])
copy_self_to_clipboard(SOURCE)
TREEPACK_REPLAY
fi
echo "neither treepack-unpack nor python3 found on PATH; cannot unpack this archive" >&2
exit 127
"#;

/// Serialized form of a [`FileMap`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Archive {
    pub format: String,
    pub version: u32,
    pub entries: Vec<FileEntry>,
}

impl Archive {
    /// Snapshot a file map
    pub fn from_file_map(files: &FileMap) -> Self {
        Self {
            format: ARCHIVE_FORMAT.to_string(),
            version: ARCHIVE_VERSION,
            entries: files.iter().cloned().collect(),
        }
    }

    /// Rebuild the file map, preserving entry order
    pub fn into_file_map(self) -> FileMap {
        self.entries.into_iter().collect()
    }

    /// Decode and check an archive JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        let archive: Archive = serde_json::from_str(json)?;
        crate::ensure!(
            archive.format == ARCHIVE_FORMAT,
            Archive,
            "unknown archive format '{}'",
            archive.format
        );
        crate::ensure!(
            archive.version == ARCHIVE_VERSION,
            Archive,
            "unsupported archive version {} (expected {})",
            archive.version,
            ARCHIVE_VERSION
        );
        Ok(archive)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Render the generated script for `files`
///
/// Pure and deterministic: the output depends only on `files`.
pub fn render_script(files: &FileMap) -> Result<String> {
    let json = Archive::from_file_map(files).to_json()?;

    let mut script = String::with_capacity(SCRIPT_PREAMBLE.len() + json.len() + 32);
    script.push_str(SCRIPT_PREAMBLE);
    script.push_str(ARCHIVE_MARKER);
    script.push('\n');
    script.push_str(&json);
    script.push('\n');
    Ok(script)
}

/// Extract the archive embedded in a generated script
pub fn parse_script(script: &str) -> Result<Archive> {
    let mut offset = 0;
    for line in script.split_inclusive('\n') {
        offset += line.len();
        if line.trim_end_matches(['\n', '\r']) == ARCHIVE_MARKER {
            return Archive::from_json(&script[offset..]);
        }
    }
    crate::bail!(Archive, "no {} marker found in script", ARCHIVE_MARKER)
}
