//! Shared geometric primitives used by the gesture tracker, the editor session and the UI.

/// Minimum width and height, in buffer pixels, for a selection to be applied.
pub const MIN_SELECTION_SIZE: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImagePoint {
    pub x: u32,
    pub y: u32,
}

impl ImagePoint {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageBounds {
    pub width: u32,
    pub height: u32,
}

impl ImageBounds {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn of<I: image::GenericImageView>(image: &I) -> Self {
        let (width, height) = image.dimensions();
        Self { width, height }
    }

    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Axis-aligned rectangle in buffer pixel coordinates. Width and height are never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl SelectionRect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle spanned by two corner points, in either drag direction.
    pub fn from_corners(a: ImagePoint, b: ImagePoint) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: a.x.abs_diff(b.x),
            height: a.y.abs_diff(b.y),
        }
    }

    pub const fn meets_minimum_size(&self) -> bool {
        self.width >= MIN_SELECTION_SIZE && self.height >= MIN_SELECTION_SIZE
    }

    pub const fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    pub const fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    pub const fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Intersection with the image area, or `None` when nothing of the rectangle is left.
    pub fn clipped_to(&self, bounds: ImageBounds) -> Option<Self> {
        if bounds.is_empty() || self.x >= bounds.width || self.y >= bounds.height {
            return None;
        }

        let width = self.right().min(bounds.width) - self.x;
        let height = self.bottom().min(bounds.height) - self.y;
        if width == 0 || height == 0 {
            return None;
        }

        Some(Self::new(self.x, self.y, width, height))
    }
}

/// Placement of the buffer inside a widget of arbitrary size.
///
/// The image is shrunk to fit and centered, never enlarged. Pointer positions in widget
/// coordinates map back to buffer pixels through the native/rendered size ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayMapping {
    pub origin_x: f64,
    pub origin_y: f64,
    pub display_width: f64,
    pub display_height: f64,
    pub native: ImageBounds,
}

impl DisplayMapping {
    pub fn fit(widget_width: f64, widget_height: f64, native: ImageBounds) -> Self {
        let native_width = f64::from(native.width);
        let native_height = f64::from(native.height);
        let scale = if native.is_empty() || widget_width <= 0.0 || widget_height <= 0.0 {
            1.0
        } else {
            (widget_width / native_width)
                .min(widget_height / native_height)
                .min(1.0)
        };

        let display_width = native_width * scale;
        let display_height = native_height * scale;
        Self {
            origin_x: ((widget_width - display_width) / 2.0).max(0.0),
            origin_y: ((widget_height - display_height) / 2.0).max(0.0),
            display_width,
            display_height,
            native,
        }
    }

    pub fn scale_x(&self) -> f64 {
        if self.display_width > 0.0 {
            f64::from(self.native.width) / self.display_width
        } else {
            1.0
        }
    }

    pub fn scale_y(&self) -> f64 {
        if self.display_height > 0.0 {
            f64::from(self.native.height) / self.display_height
        } else {
            1.0
        }
    }

    /// Rendered pixels per buffer pixel, as used when painting.
    pub fn zoom(&self) -> f64 {
        1.0 / self.scale_x()
    }

    /// Whether a widget point lies on the rendered image rather than the letterbox around it.
    pub fn contains_widget_point(&self, widget_x: f64, widget_y: f64) -> bool {
        let offset_x = widget_x - self.origin_x;
        let offset_y = widget_y - self.origin_y;
        (0.0..=self.display_width).contains(&offset_x)
            && (0.0..=self.display_height).contains(&offset_y)
    }

    pub fn to_buffer_point(&self, widget_x: f64, widget_y: f64) -> ImagePoint {
        ImagePoint::new(
            scale_and_clamp(widget_x - self.origin_x, self.scale_x(), self.native.width),
            scale_and_clamp(widget_y - self.origin_y, self.scale_y(), self.native.height),
        )
    }
}

fn scale_and_clamp(offset: f64, scale: f64, max: u32) -> u32 {
    let scaled = (offset * scale).round();
    if !scaled.is_finite() || scaled <= 0.0 {
        0
    } else if scaled >= f64::from(max) {
        max
    } else {
        scaled as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_corners_normalizes_any_drag_direction() {
        let forward = SelectionRect::from_corners(ImagePoint::new(10, 12), ImagePoint::new(50, 40));
        let backward =
            SelectionRect::from_corners(ImagePoint::new(50, 40), ImagePoint::new(10, 12));
        assert_eq!(forward, SelectionRect::new(10, 12, 40, 28));
        assert_eq!(forward, backward);
    }

    #[test]
    fn minimum_size_requires_two_pixels_on_both_axes() {
        assert!(SelectionRect::new(0, 0, 2, 2).meets_minimum_size());
        assert!(!SelectionRect::new(0, 0, 1, 30).meets_minimum_size());
        assert!(!SelectionRect::new(0, 0, 30, 0).meets_minimum_size());
    }

    #[test]
    fn clipped_to_trims_overhang_and_rejects_outside_rects() {
        let bounds = ImageBounds::new(64, 48);
        assert_eq!(
            SelectionRect::new(40, 30, 100, 100).clipped_to(bounds),
            Some(SelectionRect::new(40, 30, 24, 18))
        );
        assert_eq!(SelectionRect::new(64, 0, 5, 5).clipped_to(bounds), None);
        assert_eq!(
            SelectionRect::new(0, 0, 5, 5).clipped_to(ImageBounds::new(0, 0)),
            None
        );
    }

    #[test]
    fn mapping_shrinks_large_images_and_centers_them() {
        let mapping = DisplayMapping::fit(400.0, 300.0, ImageBounds::new(800, 400));
        assert_eq!(mapping.display_width, 400.0);
        assert_eq!(mapping.display_height, 200.0);
        assert_eq!(mapping.origin_x, 0.0);
        assert_eq!(mapping.origin_y, 50.0);
        assert_eq!(mapping.scale_x(), 2.0);
        assert_eq!(mapping.zoom(), 0.5);
    }

    #[test]
    fn mapping_never_enlarges_small_images() {
        let mapping = DisplayMapping::fit(1000.0, 1000.0, ImageBounds::new(100, 50));
        assert_eq!(mapping.display_width, 100.0);
        assert_eq!(mapping.origin_x, 450.0);
        assert_eq!(mapping.origin_y, 475.0);
        assert_eq!(mapping.to_buffer_point(460.0, 485.0), ImagePoint::new(10, 10));
    }

    #[test]
    fn buffer_point_scales_and_clamps_to_image_edges() {
        let mapping = DisplayMapping::fit(400.0, 300.0, ImageBounds::new(800, 400));
        assert_eq!(mapping.to_buffer_point(100.0, 150.0), ImagePoint::new(200, 200));
        assert_eq!(mapping.to_buffer_point(-20.0, 10.0), ImagePoint::new(0, 0));
        assert_eq!(mapping.to_buffer_point(900.0, 900.0), ImagePoint::new(800, 400));
    }

    #[test]
    fn letterbox_points_are_outside_the_rendered_image() {
        let mapping = DisplayMapping::fit(400.0, 300.0, ImageBounds::new(800, 400));
        assert!(mapping.contains_widget_point(0.0, 50.0));
        assert!(mapping.contains_widget_point(400.0, 250.0));
        assert!(mapping.contains_widget_point(200.0, 150.0));
        assert!(!mapping.contains_widget_point(200.0, 20.0));
        assert!(!mapping.contains_widget_point(200.0, 280.0));
        assert!(!mapping.contains_widget_point(-1.0, 150.0));
    }
}
