use gtk4::cairo;
use image::RgbaImage;

use crate::editor::EditorSession;
use crate::geometry::{DisplayMapping, ImageBounds};

/// Cairo copy of the canvas buffer, rebuilt only when the session revision changes.
#[derive(Default)]
pub(super) struct CanvasSurfaceCache {
    revision: Option<u64>,
    surface: Option<cairo::ImageSurface>,
}

impl CanvasSurfaceCache {
    fn surface_for(&mut self, revision: u64, image: &RgbaImage) -> Option<cairo::ImageSurface> {
        if self.revision != Some(revision) || self.surface.is_none() {
            self.surface = rgba_image_to_cairo_surface(image);
            self.revision = Some(revision);
        }
        self.surface.clone()
    }
}

pub(super) fn paint_session(
    cr: &cairo::Context,
    widget_width: i32,
    widget_height: i32,
    session: &EditorSession,
    cache: &mut CanvasSurfaceCache,
) -> Result<(), cairo::Error> {
    let Some(image) = session.image() else {
        return Ok(());
    };
    let Some(canvas) = cache.surface_for(session.revision(), image) else {
        tracing::warn!("canvas buffer could not be converted for painting");
        return Ok(());
    };
    let mapping = DisplayMapping::fit(
        f64::from(widget_width),
        f64::from(widget_height),
        ImageBounds::of(image),
    );

    cr.save()?;
    cr.translate(mapping.origin_x, mapping.origin_y);
    cr.scale(mapping.zoom(), mapping.zoom());
    cr.set_source_surface(&canvas, 0.0, 0.0)?;
    cr.paint()?;

    if let Some((rect, region)) = session.overlay().selection_region() {
        if let Some(overlay) = rgba_image_to_cairo_surface(&region) {
            cr.set_source_surface(&overlay, f64::from(rect.x), f64::from(rect.y))?;
            cr.paint()?;
        }
    }

    cr.restore()
}

/// Converts straight RGBA into cairo's premultiplied native-endian ARGB32.
pub(super) fn rgba_image_to_cairo_surface(image: &RgbaImage) -> Option<cairo::ImageSurface> {
    let width = i32::try_from(image.width()).ok()?;
    let height = i32::try_from(image.height()).ok()?;
    let mut surface = cairo::ImageSurface::create(cairo::Format::ARgb32, width, height).ok()?;
    let stride = usize::try_from(surface.stride()).ok()?;

    {
        let mut data = surface.data().ok()?;
        let src_row_len = usize::try_from(image.width()).ok()?.checked_mul(4)?;
        let src = image.as_raw();

        for (row, src_row) in src.chunks_exact(src_row_len).enumerate() {
            let dst_row_offset = row.checked_mul(stride)?;
            let dst_row_end = dst_row_offset.checked_add(src_row_len)?;
            if dst_row_end > data.len() {
                return None;
            }
            let dst_row = &mut data[dst_row_offset..dst_row_end];

            for (src_pixel, dst_pixel) in src_row.chunks_exact(4).zip(dst_row.chunks_exact_mut(4)) {
                dst_pixel.copy_from_slice(&premultiplied_bgra(src_pixel));
            }
        }
    }

    surface.flush();
    Some(surface)
}

fn premultiplied_bgra(rgba: &[u8]) -> [u8; 4] {
    let (r, g, b, a) = (rgba[0], rgba[1], rgba[2], rgba[3]);
    match a {
        0 => [0, 0, 0, 0],
        255 => [b, g, r, 255],
        _ => {
            let alpha = u16::from(a);
            let premultiply = |channel: u8| ((u16::from(channel) * alpha + 127) / 255) as u8;
            [premultiply(b), premultiply(g), premultiply(r), a]
        }
    }
}
