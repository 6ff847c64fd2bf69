use image::{imageops, Rgba, RgbaImage};

use crate::geometry::{ImageBounds, SelectionRect};

const SELECTION_FILL: Rgba<u8> = Rgba([110, 200, 255, 51]);
const SELECTION_STROKE: Rgba<u8> = Rgba([110, 200, 255, 242]);
const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);
const STROKE_WIDTH: u32 = 2;
const DASH_ON: u32 = 6;
const DASH_PERIOD: u32 = 10;

/// Transparent layer the size of the canvas, holding only the in-progress selection preview.
#[derive(Debug, Clone)]
pub struct Overlay {
    surface: RgbaImage,
    selection: Option<SelectionRect>,
}

impl Default for Overlay {
    fn default() -> Self {
        Self::new(ImageBounds::new(0, 0))
    }
}

impl Overlay {
    pub fn new(bounds: ImageBounds) -> Self {
        Self {
            surface: RgbaImage::from_pixel(bounds.width, bounds.height, TRANSPARENT),
            selection: None,
        }
    }

    pub fn bounds(&self) -> ImageBounds {
        ImageBounds::of(&self.surface)
    }

    pub fn surface(&self) -> &RgbaImage {
        &self.surface
    }

    pub fn selection(&self) -> Option<SelectionRect> {
        self.selection
    }

    /// Replaces the surface with a transparent one of the new size.
    pub fn resize(&mut self, bounds: ImageBounds) {
        *self = Self::new(bounds);
    }

    pub fn clear(&mut self) {
        if let Some(previous) = self.selection.take() {
            fill_rect(&mut self.surface, previous, TRANSPARENT);
        }
    }

    pub fn draw_selection(&mut self, rect: SelectionRect) {
        self.clear();
        let Some(rect) = rect.clipped_to(self.bounds()) else {
            return;
        };

        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                let pixel = if is_dash_pixel(rect, x, y) {
                    SELECTION_STROKE
                } else {
                    SELECTION_FILL
                };
                self.surface.put_pixel(x, y, pixel);
            }
        }
        self.selection = Some(rect);
    }

    /// The painted part of the surface, for hosts that only repaint what changed.
    pub fn selection_region(&self) -> Option<(SelectionRect, RgbaImage)> {
        let rect = self.selection?;
        let region =
            imageops::crop_imm(&self.surface, rect.x, rect.y, rect.width, rect.height).to_image();
        Some((rect, region))
    }
}

fn is_dash_pixel(rect: SelectionRect, x: u32, y: u32) -> bool {
    let dx = x - rect.x;
    let dy = y - rect.y;
    let on_border = dx < STROKE_WIDTH
        || dy < STROKE_WIDTH
        || rect.right() - x <= STROKE_WIDTH
        || rect.bottom() - y <= STROKE_WIDTH;
    on_border && (dx + dy) % DASH_PERIOD < DASH_ON
}

fn fill_rect(surface: &mut RgbaImage, rect: SelectionRect, pixel: Rgba<u8>) {
    for y in rect.y..rect.bottom() {
        for x in rect.x..rect.right() {
            surface.put_pixel(x, y, pixel);
        }
    }
}
