use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod app;
pub mod content;

pub use app::{
    run_app, AppError, CanvasLayout, Color, DrawSurface, InputAction, InputSnapshot, LoopConfig,
    PixelCanvas, Renderer, Scene, Viewport, CELL_HEIGHT_PX, CELL_WIDTH_PX,
};
pub use content::{
    compile_content_document, load_content_database, write_text_atomic, CompiledDocument,
    ContentCompileError, ContentDatabase, ContentErrorCode, ContentFingerprint,
    ContentPipelineError, GenderedText, Genre, ItemDescriptionDef, MapDef, ObstacleDef,
    ObstacleVisibilityDef, PvColorDef, SourceLocation, SpawnerDef, StringTable, TeleportDef,
    TextLabelDef, MAP_COLUMNS, MAP_ROWS,
};

pub const ROOT_ENV_VAR: &str = "LABYRINTH_ROOT";
pub const SAVE_DIR_ENV_VAR: &str = "LABYRINTH_SAVE_DIR";

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub root: PathBuf,
    pub base_content_dir: PathBuf,
    pub cache_dir: PathBuf,
    pub save_dir: PathBuf,
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to read environment variable {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("failed to resolve current executable path: {0}")]
    CurrentExe(#[source] std::io::Error),
    #[error("current executable path has no parent directory: {0}")]
    ExeHasNoParent(PathBuf),
    #[error("failed to create directory at {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(
        "LABYRINTH_ROOT is set but does not point to a valid project root: {path}\n\
A valid root must contain Cargo.toml and either crates/ or assets/."
    )]
    InvalidEnvRoot { path: PathBuf },
    #[error(
        "Could not detect project root by walking upward from executable directory: {start_dir}\n\
Expected a directory containing Cargo.toml and either crates/ or assets/.\n\
Set {env_var} explicitly, for example:\n\
Bash/zsh: export {env_var}=\"/path/to/labyrinth\""
    )]
    RootNotFound {
        start_dir: PathBuf,
        env_var: &'static str,
    },
}

pub fn resolve_app_paths() -> Result<AppPaths, StartupError> {
    let root = resolve_root()?;
    let base_content_dir = root.join("assets").join("base");
    let cache_dir = root.join("cache");
    let save_dir = resolve_save_dir(&cache_dir)?;

    for dir in [&cache_dir, &save_dir] {
        fs::create_dir_all(dir).map_err(|source| StartupError::CreateDir {
            path: dir.clone(),
            source,
        })?;
    }

    Ok(AppPaths {
        root,
        base_content_dir,
        cache_dir,
        save_dir,
    })
}

fn resolve_save_dir(cache_dir: &Path) -> Result<PathBuf, StartupError> {
    match env::var(SAVE_DIR_ENV_VAR) {
        Ok(value) if !value.trim().is_empty() => Ok(PathBuf::from(value.trim())),
        Ok(_) | Err(env::VarError::NotPresent) => Ok(cache_dir.join("saves")),
        Err(source) => Err(StartupError::EnvVar {
            var: SAVE_DIR_ENV_VAR,
            source,
        }),
    }
}

fn resolve_root() -> Result<PathBuf, StartupError> {
    match env::var(ROOT_ENV_VAR) {
        Ok(value) => {
            let raw = PathBuf::from(value);
            let normalized = normalize_path(&raw);
            if is_repo_marker(&normalized) {
                Ok(normalized)
            } else {
                Err(StartupError::InvalidEnvRoot { path: normalized })
            }
        }
        Err(env::VarError::NotPresent) => {
            let exe = env::current_exe().map_err(StartupError::CurrentExe)?;
            let exe_dir = exe
                .parent()
                .map(Path::to_path_buf)
                .ok_or_else(|| StartupError::ExeHasNoParent(exe.clone()))?;

            for candidate in exe_dir.ancestors() {
                if is_repo_marker(candidate) {
                    return Ok(normalize_path(candidate));
                }
            }

            Err(StartupError::RootNotFound {
                start_dir: normalize_path(&exe_dir),
                env_var: ROOT_ENV_VAR,
            })
        }
        Err(source) => Err(StartupError::EnvVar {
            var: ROOT_ENV_VAR,
            source,
        }),
    }
}

fn is_repo_marker(path: &Path) -> bool {
    let cargo_toml = path.join("Cargo.toml").is_file();
    let has_crates = path.join("crates").is_dir();
    let has_assets = path.join("assets").is_dir();

    cargo_toml && (has_crates || has_assets)
}

fn normalize_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
