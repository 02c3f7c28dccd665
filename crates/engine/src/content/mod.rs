mod atomic_io;
mod compiler;
mod database;
mod hashing;
mod manifest;
mod pipeline;

pub use atomic_io::write_text_atomic;
pub use compiler::{
    compile_content_document, CompiledDocument, ContentCompileError, ContentErrorCode,
    SourceLocation,
};
pub use database::{
    ContentDatabase, ContentFingerprint, GenderedText, Genre, ItemDescriptionDef, MapDef,
    ObstacleDef, ObstacleVisibilityDef, PvColorDef, SpawnerDef, StringTable, TeleportDef,
    TextLabelDef, MAP_COLUMNS, MAP_ROWS,
};
pub use pipeline::{load_content_database, ContentPipelineError};
