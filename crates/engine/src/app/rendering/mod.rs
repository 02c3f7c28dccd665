mod font;
mod renderer;
mod surface;
mod transform;

pub use renderer::{PixelCanvas, Renderer};
pub use surface::{Color, DrawSurface, CELL_HEIGHT_PX, CELL_WIDTH_PX};
pub use transform::{CanvasLayout, Viewport};
