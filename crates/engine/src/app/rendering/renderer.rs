use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture};
use winit::window::Window;

use super::font::{glyph_for, Glyph, GLYPH_COLUMNS, GLYPH_ROWS};
use super::surface::{Color, DrawSurface, CELL_WIDTH_PX};
use super::transform::{CanvasLayout, Viewport};
use crate::app::Scene;

const LETTERBOX_COLOR: [u8; 4] = [0, 0, 0, 255];
const GLYPH_PIXEL_PX: i32 = 2;
const GLYPH_OFFSET_X_PX: i32 = 1;
const GLYPH_OFFSET_Y_PX: i32 = 3;

pub struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    viewport: Viewport,
    layout: CanvasLayout,
}

impl Renderer {
    pub fn new(
        window: Arc<Window>,
        reference_width: u32,
        reference_height: u32,
    ) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(Arc::clone(&window), size.width, size.height)?;
        let viewport = Viewport {
            width: size.width,
            height: size.height,
        };
        Ok(Self {
            window,
            pixels,
            viewport,
            layout: CanvasLayout::fit(reference_width, reference_height, viewport),
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(Arc::clone(&self.window), width, height)?;
        self.viewport = Viewport { width, height };
        self.layout = CanvasLayout::fit(
            self.layout.reference_width,
            self.layout.reference_height,
            self.viewport,
        );
        Ok(())
    }

    pub fn layout(&self) -> CanvasLayout {
        self.layout
    }

    fn build_pixels(
        window: Arc<Window>,
        width: u32,
        height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(width, height, window);
        Pixels::new(width, height, surface)
    }

    pub(crate) fn render_scene(&mut self, scene: &dyn Scene) -> Result<(), Error> {
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Ok(());
        }

        let frame = self.pixels.frame_mut();
        for chunk in frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&LETTERBOX_COLOR);
        }
        let mut canvas = PixelCanvas::new(
            frame,
            self.viewport.width,
            self.viewport.height,
            self.layout,
        );
        scene.render(&mut canvas);
        self.pixels.render()
    }
}

/// RGBA frame buffer wrapped as a [`DrawSurface`]. Reference-canvas
/// coordinates go through the layout; everything outside the frame is clipped.
pub struct PixelCanvas<'a> {
    frame: &'a mut [u8],
    width: u32,
    height: u32,
    layout: CanvasLayout,
}

impl<'a> PixelCanvas<'a> {
    pub fn new(frame: &'a mut [u8], width: u32, height: u32, layout: CanvasLayout) -> Self {
        Self {
            frame,
            width,
            height,
            layout,
        }
    }

    fn fill_reference_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color) {
        if width <= 0 || height <= 0 {
            return;
        }
        let (left, top) = self.layout.to_window_px(x, y);
        let (right, bottom) = self.layout.to_window_px(x + width, y + height);
        draw_filled_rect(
            self.frame,
            self.width,
            self.height,
            left,
            top,
            right - left,
            bottom - top,
            color.to_rgba(),
        );
    }

    fn draw_glyph(&mut self, x: i32, y: i32, glyph: Glyph, color: Color) {
        for row in 0..GLYPH_ROWS {
            for column in 0..GLYPH_COLUMNS {
                if !glyph.is_lit(column, row) {
                    continue;
                }
                self.fill_reference_rect(
                    x + GLYPH_OFFSET_X_PX + column * GLYPH_PIXEL_PX,
                    y + GLYPH_OFFSET_Y_PX + row * GLYPH_PIXEL_PX,
                    GLYPH_PIXEL_PX,
                    GLYPH_PIXEL_PX,
                    color,
                );
            }
        }
    }
}

impl DrawSurface for PixelCanvas<'_> {
    fn clear(&mut self, color: Color) {
        let reference_width = self.layout.reference_width as i32;
        let reference_height = self.layout.reference_height as i32;
        self.fill_reference_rect(0, 0, reference_width, reference_height, color);
    }

    fn draw_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color) {
        self.fill_reference_rect(x, y, width, height, color);
    }

    fn draw_text(&mut self, mut x: i32, y: i32, text: &str, color: Color) {
        for ch in text.chars() {
            let glyph = glyph_for(ch).unwrap_or(Glyph::BLANK);
            self.draw_glyph(x, y, glyph, color);
            x += CELL_WIDTH_PX;
        }
    }
}

fn write_pixel_rgba(frame: &mut [u8], width: usize, x: usize, y: usize, color: [u8; 4]) {
    let Some(pixel_offset) = y.checked_mul(width).and_then(|row| row.checked_add(x)) else {
        return;
    };
    let Some(byte_offset) = pixel_offset.checked_mul(4) else {
        return;
    };
    let Some(end) = byte_offset.checked_add(4) else {
        return;
    };
    if end > frame.len() {
        return;
    }

    frame[byte_offset..end].copy_from_slice(&color);
}

#[allow(clippy::too_many_arguments)]
fn draw_filled_rect(
    frame: &mut [u8],
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    rect_width: i32,
    rect_height: i32,
    color: [u8; 4],
) {
    let start_x = x.max(0);
    let start_y = y.max(0);
    let end_x = (x + rect_width).min(width as i32);
    let end_y = (y + rect_height).min(height as i32);
    if end_x <= start_x || end_y <= start_y {
        return;
    }

    let width_usize = width as usize;
    for py in start_y..end_y {
        for px in start_x..end_x {
            write_pixel_rgba(frame, width_usize, px as usize, py as usize, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::rendering::CELL_HEIGHT_PX;

    fn unit_layout(width: u32, height: u32) -> CanvasLayout {
        CanvasLayout::fit(width, height, Viewport { width, height })
    }

    fn pixel_at(frame: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
        let offset = ((y * width + x) * 4) as usize;
        [
            frame[offset],
            frame[offset + 1],
            frame[offset + 2],
            frame[offset + 3],
        ]
    }

    #[test]
    fn renderer_type_is_non_generic() {
        let _renderer: Option<Renderer> = None;
    }

    #[test]
    fn clear_fills_reference_area() {
        let (width, height) = (16u32, 16u32);
        let mut frame = vec![0u8; (width * height * 4) as usize];
        let mut canvas = PixelCanvas::new(&mut frame, width, height, unit_layout(width, height));
        canvas.clear(Color::rgb(10, 20, 30));
        assert_eq!(pixel_at(&frame, width, 0, 0), [10, 20, 30, 255]);
        assert_eq!(pixel_at(&frame, width, 15, 15), [10, 20, 30, 255]);
    }

    #[test]
    fn rect_is_clipped_to_frame() {
        let (width, height) = (8u32, 8u32);
        let mut frame = vec![0u8; (width * height * 4) as usize];
        let mut canvas = PixelCanvas::new(&mut frame, width, height, unit_layout(width, height));
        canvas.draw_rect(-4, -4, 6, 6, Color::WHITE);
        assert_eq!(pixel_at(&frame, width, 1, 1), [255, 255, 255, 255]);
        assert_eq!(pixel_at(&frame, width, 2, 2), [0, 0, 0, 0]);
    }

    #[test]
    fn text_lights_pixels_inside_its_cell_only() {
        let width = CELL_WIDTH_PX as u32 * 2;
        let height = CELL_HEIGHT_PX as u32;
        let mut frame = vec![0u8; (width * height * 4) as usize];
        let mut canvas = PixelCanvas::new(&mut frame, width, height, unit_layout(width, height));
        canvas.draw_text(0, 0, "#", Color::WHITE);

        let lit_in_first_cell = (0..CELL_WIDTH_PX as u32)
            .flat_map(|x| (0..height).map(move |y| (x, y)))
            .any(|(x, y)| pixel_at(&frame, width, x, y) == [255, 255, 255, 255]);
        let lit_in_second_cell = (CELL_WIDTH_PX as u32..width)
            .flat_map(|x| (0..height).map(move |y| (x, y)))
            .any(|(x, y)| pixel_at(&frame, width, x, y)[3] != 0);
        assert!(lit_in_first_cell);
        assert!(!lit_in_second_cell);
    }

    #[test]
    fn scaled_layout_offsets_by_margin() {
        let layout = CanvasLayout::fit(
            4,
            4,
            Viewport {
                width: 16,
                height: 8,
            },
        );
        let mut frame = vec![0u8; 16 * 8 * 4];
        let mut canvas = PixelCanvas::new(&mut frame, 16, 8, layout);
        canvas.draw_rect(0, 0, 1, 1, Color::WHITE);
        assert_eq!(layout.margin_x, 4);
        assert_eq!(pixel_at(&frame, 16, 4, 0), [255, 255, 255, 255]);
        assert_eq!(pixel_at(&frame, 16, 5, 1), [255, 255, 255, 255]);
        assert_eq!(pixel_at(&frame, 16, 3, 0), [0, 0, 0, 0]);
    }
}
