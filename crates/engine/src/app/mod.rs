mod input;
mod loop_runner;
mod rendering;
mod scene;

pub use input::InputAction;
pub use loop_runner::{run_app, AppError, LoopConfig};
pub use rendering::{
    CanvasLayout, Color, DrawSurface, PixelCanvas, Renderer, Viewport, CELL_HEIGHT_PX,
    CELL_WIDTH_PX,
};
pub use scene::{InputSnapshot, Scene};
