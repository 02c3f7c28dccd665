use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use super::database::ContentFingerprint;

/// Every `.xml` under `dir`, keyed by its `/`-joined relative path and sorted
/// so the fingerprint does not depend on directory iteration order.
pub(crate) fn collect_xml_files(dir: &Path) -> io::Result<Vec<(String, PathBuf)>> {
    let mut files = Vec::<(String, PathBuf)>::new();
    collect_recursive(dir, dir, &mut files)?;
    files.sort_by(|(a, _), (b, _)| a.cmp(b));
    Ok(files)
}

/// Hashes `(relative path, 0, bytes)` for each file in order.
pub(crate) fn fingerprint_files(files: &[(String, Vec<u8>)]) -> ContentFingerprint {
    let mut hasher = Sha256::new();
    for (normalized_rel, bytes) in files {
        hasher.update(normalized_rel.as_bytes());
        hasher.update([0u8]);
        hasher.update(bytes);
    }
    ContentFingerprint {
        xml_file_count: files.len(),
        hash_hex: to_hex_lower(&hasher.finalize()),
    }
}

fn collect_recursive(
    root: &Path,
    current: &Path,
    files: &mut Vec<(String, PathBuf)>,
) -> io::Result<()> {
    for entry in fs::read_dir(current)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_recursive(root, &path, files)?;
            continue;
        }
        if !is_xml_file(&path) {
            continue;
        }
        let Ok(rel) = path.strip_prefix(root) else {
            continue;
        };
        let normalized = normalize_rel_path(rel);
        files.push((normalized, path));
    }
    Ok(())
}

fn is_xml_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"))
}

fn normalize_rel_path(path: &Path) -> String {
    path.components()
        .map(|component| component.as_os_str().to_string_lossy().to_string())
        .collect::<Vec<_>>()
        .join("/")
}

fn to_hex_lower(bytes: &[u8]) -> String {
    let mut output = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        use std::fmt::Write as _;
        let _ = write!(&mut output, "{byte:02x}");
    }
    output
}
