mod blackout;
mod blur;

use image::RgbaImage;
use serde::Deserialize;

use crate::geometry::{ImageBounds, SelectionRect};

pub use blackout::{fill_black, BLACKOUT_PIXEL};
pub use blur::{blur_region, BlurOptions, BLUR_RADIUS_MAX, BLUR_RADIUS_MIN, DEFAULT_BLUR_RADIUS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolMode {
    #[default]
    Blackout,
    Blur,
}

impl ToolMode {
    pub const ALL: [ToolMode; 2] = [Self::Blackout, Self::Blur];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Blackout => "Blackout",
            Self::Blur => "Blur",
        }
    }

    /// The radius input is only meaningful while blurring.
    pub const fn shows_blur_radius(self) -> bool {
        matches!(self, Self::Blur)
    }

    pub fn position(self) -> u32 {
        Self::ALL
            .iter()
            .position(|mode| *mode == self)
            .and_then(|index| u32::try_from(index).ok())
            .unwrap_or(0)
    }

    pub fn from_position(position: u32) -> Option<Self> {
        usize::try_from(position)
            .ok()
            .and_then(|index| Self::ALL.get(index).copied())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ToolSettings {
    pub mode: ToolMode,
    pub blur: BlurOptions,
}

impl ToolSettings {
    pub fn new(mode: ToolMode, blur_radius: u8) -> Self {
        Self {
            mode,
            blur: BlurOptions::with_radius(blur_radius),
        }
    }

    pub fn select_tool(&mut self, mode: ToolMode) {
        self.mode = mode;
    }

    pub fn set_blur_radius(&mut self, radius: u8) {
        self.blur.set_radius(radius);
    }
}

/// Applies the active tool to `region`. Parts of the region outside the buffer are ignored.
pub fn apply_edit(buffer: &mut RgbaImage, region: SelectionRect, settings: ToolSettings) {
    let Some(region) = region.clipped_to(ImageBounds::of(&*buffer)) else {
        return;
    };

    match settings.mode {
        ToolMode::Blackout => fill_black(buffer, region),
        ToolMode::Blur => blur_region(buffer, region, settings.blur),
    }
}
