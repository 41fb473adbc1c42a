// File tools - read, write, list, find
//
// All paths handed to these functions have already been resolved through
// the sandbox; nothing here touches the filesystem on a raw model-supplied
// path.

use crate::executor::error::Result;
use std::path::Path;
use tracing::debug;

/// Maximum number of find_files matches returned
const MAX_FIND_RESULTS: usize = 20;

/// Minimum content length accepted for recognized source/markup files
const MIN_SOURCE_CONTENT_LEN: usize = 100;

/// Extensions for which a short write is treated as model truncation
const SOURCE_EXTENSIONS: &[&str] = &["py", "js", "html", "css", "rs"];

/// Read a text file
pub fn read_text(path: &Path) -> Result<String> {
    let content = std::fs::read_to_string(path)?;
    debug!(path = %path.display(), bytes = content.len(), "file read");
    Ok(content)
}

/// Write a text file, creating parent directories as needed
pub fn write_text(path: &Path, content: &str) -> Result<String> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    debug!(path = %path.display(), bytes = content.len(), "file written");
    Ok(format!("File written: {}", path.display()))
}

/// Heuristic proxy for "the model truncated its output": suspiciously short
/// content destined for a recognized source/markup file.
pub fn source_content_too_short(path: &str, content: &str) -> bool {
    let extension = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());
    match extension {
        Some(ext) if SOURCE_EXTENSIONS.contains(&ext.as_str()) => {
            content.len() < MIN_SOURCE_CONTENT_LEN
        }
        _ => false,
    }
}

/// List a directory: one entry per line, directories marked with a trailing
/// slash, hidden entries skipped.
pub fn list_dir(path: &Path) -> Result<String> {
    let mut entries = Vec::new();
    for entry in std::fs::read_dir(path)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') {
            continue;
        }
        if entry.file_type()?.is_dir() {
            entries.push(format!("{}/", name));
        } else {
            entries.push(name);
        }
    }
    entries.sort();
    Ok(entries.join("\n"))
}

/// Find files under `root` whose name contains `query`, recursively,
/// skipping hidden directories. Capped at `MAX_FIND_RESULTS` matches.
pub fn find_files(root: &Path, query: &str) -> Result<Vec<String>> {
    let mut matches = Vec::new();
    walk(root, query, &mut matches)?;
    matches.sort();
    matches.truncate(MAX_FIND_RESULTS);
    Ok(matches)
}

fn walk(dir: &Path, query: &str, matches: &mut Vec<String>) -> Result<()> {
    if matches.len() >= MAX_FIND_RESULTS {
        return Ok(());
    }
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') {
            continue;
        }
        if path.is_dir() {
            walk(&path, query, matches)?;
        } else if name.contains(query) {
            matches.push(path.display().to_string());
        }
        if matches.len() >= MAX_FIND_RESULTS {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_content_too_short() {
        assert!(source_content_too_short("main.py", "print(1)"));
        assert!(source_content_too_short("app.JS", "x"));
        assert!(!source_content_too_short("notes.txt", "x"));
        assert!(!source_content_too_short(
            "main.py",
            &"# a full module\n".repeat(10)
        ));
    }

    #[test]
    fn test_no_extension_not_flagged() {
        assert!(!source_content_too_short("Makefile", "all:"));
    }
}
