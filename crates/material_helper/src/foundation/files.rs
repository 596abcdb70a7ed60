//! File discovery and asset path helpers
//!
//! Asset paths are relative, `/`-separated strings (`models/brick.mat`).
//! VMT files may use either separator, so every helper here accepts both.

use std::io;
use std::path::{Path, PathBuf};

/// Recursively collect every regular file under `root` in name order
pub fn walk_files(root: &Path, out: &mut Vec<PathBuf>) -> io::Result<()> {
    let mut entries: Vec<_> = std::fs::read_dir(root)?
        .filter_map(Result::ok)
        .collect();
    entries.sort_by_key(std::fs::DirEntry::file_name);

    for entry in entries {
        let path = entry.path();
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            walk_files(&path, out)?;
        } else if file_type.is_file() {
            out.push(path);
        }
    }
    Ok(())
}

/// Find all files under `root` whose extension matches `extension` (case-insensitive)
pub fn find_files_with_extension(root: &Path, extension: &str) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    walk_files(root, &mut files)?;
    files.retain(|path| has_extension(path, extension));
    files.sort();
    Ok(files)
}

/// Check a filesystem path's extension, ignoring case
pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

/// Convert a relative filesystem path into an asset path
pub fn to_asset_path(path: &Path) -> String {
    normalize_separators(&path.to_string_lossy())
}

/// Replace backslashes and strip leading/trailing separators
pub fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/").trim_matches('/').to_string()
}

/// Join two asset path fragments, skipping empty ones
pub fn join_asset_path(prefix: &str, relative: &str) -> String {
    let prefix = normalize_separators(prefix);
    let relative = normalize_separators(relative);
    match (prefix.is_empty(), relative.is_empty()) {
        (true, _) => relative,
        (false, true) => prefix,
        (false, false) => format!("{prefix}/{relative}"),
    }
}

/// Last path component, accepting either separator
pub fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Last path component without its extension (`brick/diffuse.png` -> `diffuse`)
pub fn bare_file_name(path: &str) -> &str {
    let name = file_name(path);
    match name.rfind('.') {
        Some(0) | None => name,
        Some(dot) => &name[..dot],
    }
}

/// Directory part of an asset path, `None` for top-level entries
pub fn parent_asset_dir(path: &str) -> Option<&str> {
    path.rfind('/').map(|slash| &path[..slash]).filter(|dir| !dir.is_empty())
}

/// Swap the extension of the final path component
pub fn replace_extension(path: &str, extension: &str) -> String {
    let name_start = path.rfind(['/', '\\']).map_or(0, |sep| sep + 1);
    let stem_end = match path[name_start..].rfind('.') {
        Some(0) | None => path.len(),
        Some(dot) => name_start + dot,
    };
    format!("{}.{}", &path[..stem_end], extension)
}

/// If `path` ends in `.{from}` (any case), return it with `.{to}` instead
pub fn substitute_extension(path: &str, from: &str, to: &str) -> Option<String> {
    let suffix_len = from.len() + 1;
    if path.len() < suffix_len || !path.is_char_boundary(path.len() - suffix_len) {
        return None;
    }
    let (stem, suffix) = path.split_at(path.len() - suffix_len);
    let matches = suffix.starts_with('.') && suffix[1..].eq_ignore_ascii_case(from);
    matches.then(|| format!("{stem}.{to}"))
}
