#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Uniform scale plus centering margins that fit the fixed reference canvas
/// inside the current window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasLayout {
    pub scale: f32,
    pub margin_x: i32,
    pub margin_y: i32,
    pub reference_width: u32,
    pub reference_height: u32,
}

impl CanvasLayout {
    pub fn fit(reference_width: u32, reference_height: u32, viewport: Viewport) -> Self {
        let reference_width = reference_width.max(1);
        let reference_height = reference_height.max(1);
        let scale_x = viewport.width as f32 / reference_width as f32;
        let scale_y = viewport.height as f32 / reference_height as f32;
        let scale = scale_x.min(scale_y).max(0.0);
        let used_width = (reference_width as f32 * scale).round() as i32;
        let used_height = (reference_height as f32 * scale).round() as i32;

        Self {
            scale,
            margin_x: ((viewport.width as i32 - used_width) / 2).max(0),
            margin_y: ((viewport.height as i32 - used_height) / 2).max(0),
            reference_width,
            reference_height,
        }
    }

    pub fn to_window_px(&self, x: i32, y: i32) -> (i32, i32) {
        (
            self.margin_x + (x as f32 * self.scale).round() as i32,
            self.margin_y + (y as f32 * self.scale).round() as i32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_fit_has_unit_scale_and_no_margins() {
        let layout = CanvasLayout::fit(
            460,
            480,
            Viewport {
                width: 460,
                height: 480,
            },
        );
        assert!((layout.scale - 1.0).abs() < f32::EPSILON);
        assert_eq!((layout.margin_x, layout.margin_y), (0, 0));
        assert_eq!(layout.to_window_px(8, 16), (8, 16));
    }

    #[test]
    fn wide_window_is_letterboxed_horizontally() {
        let layout = CanvasLayout::fit(
            460,
            480,
            Viewport {
                width: 1920,
                height: 960,
            },
        );
        assert!((layout.scale - 2.0).abs() < f32::EPSILON);
        assert_eq!(layout.margin_x, (1920 - 920) / 2);
        assert_eq!(layout.margin_y, 0);
        assert_eq!(layout.to_window_px(10, 10), (500 + 20, 20));
    }

    #[test]
    fn zero_sized_viewport_collapses_scale() {
        let layout = CanvasLayout::fit(
            460,
            480,
            Viewport {
                width: 0,
                height: 0,
            },
        );
        assert_eq!(layout.scale, 0.0);
        assert_eq!(layout.to_window_px(100, 100), (0, 0));
    }
}
