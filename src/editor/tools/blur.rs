use image::{imageops, Rgba, Rgba32FImage, RgbaImage};

use crate::geometry::SelectionRect;

pub const BLUR_RADIUS_MIN: u8 = 1;
pub const BLUR_RADIUS_MAX: u8 = 50;
pub const DEFAULT_BLUR_RADIUS: u8 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlurOptions {
    pub radius: u8,
}

impl Default for BlurOptions {
    fn default() -> Self {
        Self {
            radius: DEFAULT_BLUR_RADIUS,
        }
    }
}

impl BlurOptions {
    pub fn with_radius(radius: u8) -> Self {
        let mut options = Self::default();
        options.set_radius(radius);
        options
    }

    pub fn set_radius(&mut self, radius: u8) {
        self.radius = clamp_u8_range(radius, BLUR_RADIUS_MIN, BLUR_RADIUS_MAX);
    }

    /// Gaussian standard deviation in buffer pixels. The radius is used as sigma directly.
    pub fn sigma(self) -> f32 {
        f32::from(self.radius)
    }
}

/// Blurs `region` in place. The region is copied out so the kernel only ever samples pixels
/// inside the selection; samples past the region edge repeat the nearest edge pixel.
///
/// The kernel runs on premultiplied color, so whatever RGB sits under fully transparent
/// pixels never bleeds into visible ones.
pub fn blur_region(buffer: &mut RgbaImage, region: SelectionRect, options: BlurOptions) {
    let isolated =
        imageops::crop_imm(&*buffer, region.x, region.y, region.width, region.height).to_image();
    let blurred = gaussian_blur(&premultiply(&isolated), options.sigma());
    imageops::replace(
        buffer,
        &unpremultiply(&blurred),
        i64::from(region.x),
        i64::from(region.y),
    );
}

/// Heavy blurs over large regions run on a reduced copy and are scaled back up.
pub(crate) fn blur_downsample_factor(width: u32, height: u32, sigma: f32) -> u32 {
    let area = width.saturating_mul(height);
    if area < 32_768 || sigma < 6.0 {
        return 1;
    }
    if area >= 262_144 && sigma >= 10.0 {
        return 4;
    }
    if area >= 65_536 && sigma >= 8.0 {
        return 3;
    }
    2
}

fn gaussian_blur(region: &Rgba32FImage, sigma: f32) -> Rgba32FImage {
    let (width, height) = region.dimensions();
    let downsample = blur_downsample_factor(width, height, sigma)
        .min(width.max(1))
        .min(height.max(1));
    if downsample <= 1 {
        return imageops::blur(region, sigma);
    }

    let reduced = imageops::resize(
        region,
        (width / downsample).max(1),
        (height / downsample).max(1),
        imageops::FilterType::Triangle,
    );
    let reduced_sigma = (sigma / downsample as f32).max(0.8);
    let blurred = imageops::blur(&reduced, reduced_sigma);
    imageops::resize(&blurred, width, height, imageops::FilterType::Triangle)
}

fn premultiply(image: &RgbaImage) -> Rgba32FImage {
    Rgba32FImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b, a] = image.get_pixel(x, y).0;
        let alpha = f32::from(a) / 255.0;
        let scale = |channel: u8| f32::from(channel) / 255.0 * alpha;
        Rgba([scale(r), scale(g), scale(b), alpha])
    })
}

fn unpremultiply(image: &Rgba32FImage) -> RgbaImage {
    RgbaImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b, a] = image.get_pixel(x, y).0;
        let alpha = unit_to_u8(a);
        if alpha == 0 {
            return Rgba([0, 0, 0, 0]);
        }
        let straight = |channel: f32| unit_to_u8(channel / a);
        Rgba([straight(r), straight(g), straight(b), alpha])
    })
}

fn unit_to_u8(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

const fn clamp_u8_range(value: u8, min: u8, max: u8) -> u8 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}
