use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use thiserror::Error;
use tracing::{info, warn};

use crate::AppPaths;

use super::compiler::{compile_content_document, CompiledDocument, ContentCompileError};
use super::database::{ContentDatabase, MapDef, StringTable};
use super::hashing::{collect_xml_files, fingerprint_files};
use super::manifest::{
    manifest_path, read_manifest, write_manifest_atomic, ContentManifest, ManifestReadState,
    CONTENT_MANIFEST_VERSION,
};

const COMPILER_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Error)]
pub enum ContentPipelineError {
    #[error("failed to read content directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read content file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Compile(#[from] ContentCompileError),
    #[error("map '{name}' is defined in both {first} and {second}")]
    DuplicateMap {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },
    #[error("strings for language '{lang}' are defined in both {first} and {second}")]
    DuplicateLanguage {
        lang: String,
        first: PathBuf,
        second: PathBuf,
    },
    #[error("no <MapDef> found under {0}")]
    NoMaps(PathBuf),
}

/// Compiles every XML file under the base content directory into one
/// database. Any compile error is fatal; the cache manifest is advisory.
pub fn load_content_database(app_paths: &AppPaths) -> Result<ContentDatabase, ContentPipelineError> {
    let content_dir = &app_paths.base_content_dir;
    let files = collect_xml_files(content_dir).map_err(|source| ContentPipelineError::ReadDir {
        path: content_dir.clone(),
        source,
    })?;

    let mut raw_files = Vec::<(String, Vec<u8>)>::with_capacity(files.len());
    let mut maps = BTreeMap::<String, MapDef>::new();
    let mut tables = BTreeMap::<String, (PathBuf, StringTable)>::new();

    for (normalized_rel, path) in files {
        let bytes = fs::read(&path).map_err(|source| ContentPipelineError::ReadFile {
            path: path.clone(),
            source,
        })?;
        let raw = String::from_utf8_lossy(&bytes).into_owned();
        match compile_content_document(&path, &raw)? {
            CompiledDocument::Maps(defs) => {
                for def in defs {
                    if let Some(existing) = maps.get(&def.name) {
                        return Err(ContentPipelineError::DuplicateMap {
                            name: def.name.clone(),
                            first: existing.source.clone(),
                            second: def.source.clone(),
                        });
                    }
                    maps.insert(def.name.clone(), def);
                }
            }
            CompiledDocument::Strings(table) => {
                if let Some((first, _)) = tables.get(&table.lang) {
                    return Err(ContentPipelineError::DuplicateLanguage {
                        lang: table.lang.clone(),
                        first: first.clone(),
                        second: path.clone(),
                    });
                }
                tables.insert(table.lang.clone(), (path.clone(), table));
            }
        }
        raw_files.push((normalized_rel, bytes));
    }

    if maps.is_empty() {
        return Err(ContentPipelineError::NoMaps(content_dir.clone()));
    }

    let fingerprint = fingerprint_files(&raw_files);
    let manifest = ContentManifest {
        manifest_version: CONTENT_MANIFEST_VERSION,
        compiler_version: COMPILER_VERSION.to_string(),
        fingerprint_hex: fingerprint.hash_hex.clone(),
        xml_file_count: fingerprint.xml_file_count,
        map_names: maps.keys().cloned().collect(),
    };
    refresh_manifest(app_paths, &manifest);

    let database = ContentDatabase::new(
        maps.into_values().collect(),
        tables.into_values().map(|(_, table)| table).collect(),
        fingerprint,
    );
    info!(
        map_count = database.map_count(),
        languages = ?database
            .string_tables()
            .map(|table| table.lang.as_str())
            .collect::<Vec<_>>(),
        xml_file_count = database.fingerprint().xml_file_count,
        fingerprint = %database.fingerprint().hash_hex,
        "content_loaded"
    );
    Ok(database)
}

fn refresh_manifest(app_paths: &AppPaths, manifest: &ContentManifest) {
    let path = manifest_path(&app_paths.cache_dir);
    match read_manifest(&path) {
        ManifestReadState::Present(previous) if previous == *manifest => return,
        ManifestReadState::Present(previous) => {
            if previous.fingerprint_hex != manifest.fingerprint_hex {
                warn!(
                    previous = %previous.fingerprint_hex,
                    current = %manifest.fingerprint_hex,
                    "content_fingerprint_changed"
                );
            }
        }
        ManifestReadState::Missing => {}
        ManifestReadState::Unreadable(reason) => {
            warn!(path = %path.display(), reason = %reason, "content_manifest_unreadable");
        }
    }
    if let Err(reason) = write_manifest_atomic(&path, manifest) {
        warn!(path = %path.display(), reason = %reason, "content_manifest_write_failed");
    }
}
