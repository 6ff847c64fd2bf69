use image::{Rgba, RgbaImage};

use crate::geometry::SelectionRect;

pub const BLACKOUT_PIXEL: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Overwrites `region` with opaque black. The region must lie inside the buffer.
pub fn fill_black(buffer: &mut RgbaImage, region: SelectionRect) {
    let row_len = buffer.width() as usize * 4;
    let start_col = region.x as usize * 4;
    let span = region.width as usize * 4;
    let pixels: &mut [u8] = buffer;

    for row in region.y..region.bottom() {
        let start = row as usize * row_len + start_col;
        for pixel in pixels[start..start + span].chunks_exact_mut(4) {
            pixel.copy_from_slice(&BLACKOUT_PIXEL.0);
        }
    }
}
