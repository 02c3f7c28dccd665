use labyrinth_engine::{
    load_content_database, resolve_app_paths, ContentPipelineError, LoopConfig, Scene,
    StartupError,
};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::gameplay::{self, MapLoadError};

#[derive(Debug, Error)]
pub(crate) enum BootstrapError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error(transparent)]
    Content(#[from] ContentPipelineError),
    #[error("invalid map data: {0}")]
    MapLoad(#[from] MapLoadError),
}

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) scene: Box<dyn Scene>,
}

pub(crate) fn build_app() -> Result<AppWiring, BootstrapError> {
    init_tracing();
    info!("=== Labyrinth Startup ===");

    let paths = resolve_app_paths()?;
    info!(
        root = %paths.root.display(),
        saves = %paths.save_dir.display(),
        "app_paths_resolved"
    );
    let content = load_content_database(&paths)?;
    let scene = gameplay::build_session(content, &paths.save_dir)?;

    Ok(AppWiring {
        config: LoopConfig::default(),
        scene,
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}
