//! The labyrinth game: map model, tick engine, persistence and the session
//! that ties them to the host loop.

use std::path::Path;

use labyrinth_engine::{ContentDatabase, Scene};

mod combat;
mod entities;
mod geometry;
mod i18n;
mod level_map;
mod menu;
mod movement;
mod projectiles;
mod save;
mod session;
mod spawner;
mod state;
mod storage;
mod symbols;
mod tick;
mod view;

#[cfg(test)]
mod fixtures;

pub(crate) use level_map::MapLoadError;

use session::Session;
use storage::FileStore;

/// Builds the playable scene over file-backed save slots in `save_dir`.
pub(crate) fn build_session(
    content: ContentDatabase,
    save_dir: &Path,
) -> Result<Box<dyn Scene>, MapLoadError> {
    let session = Session::new(content, Box::new(FileStore::new(save_dir)))?;
    Ok(Box::new(session))
}
