use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::atomic_io::write_text_atomic;

pub(crate) const CONTENT_MANIFEST_VERSION: u16 = 1;

/// Summary of the last content load, kept so a later start can report that
/// the authored files changed underneath existing saves.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub(crate) struct ContentManifest {
    pub manifest_version: u16,
    pub compiler_version: String,
    pub fingerprint_hex: String,
    pub xml_file_count: usize,
    pub map_names: Vec<String>,
}

#[derive(Debug, Clone)]
pub(crate) enum ManifestReadState {
    Missing,
    Unreadable(String),
    Present(ContentManifest),
}

pub(crate) fn manifest_path(cache_dir: &Path) -> PathBuf {
    cache_dir.join("content.manifest.json")
}

pub(crate) fn read_manifest(path: &Path) -> ManifestReadState {
    if !path.exists() {
        return ManifestReadState::Missing;
    }
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) => return ManifestReadState::Unreadable(error.to_string()),
    };
    match serde_json::from_str::<ContentManifest>(&raw) {
        Ok(manifest) if manifest.manifest_version == CONTENT_MANIFEST_VERSION => {
            ManifestReadState::Present(manifest)
        }
        Ok(manifest) => ManifestReadState::Unreadable(format!(
            "unsupported manifest_version {}",
            manifest.manifest_version
        )),
        Err(error) => ManifestReadState::Unreadable(error.to_string()),
    }
}

pub(crate) fn write_manifest_atomic(path: &Path, manifest: &ContentManifest) -> Result<(), String> {
    let text = serde_json::to_string_pretty(manifest)
        .map_err(|error| format!("failed to encode manifest json: {error}"))?;
    write_text_atomic(path, &text).map_err(|error| format!("failed to write manifest: {error}"))
}
