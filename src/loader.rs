//! Image decoding for file and clipboard sources, plus the generation counter that lets
//! the session drop decodes which finish after a newer request was made.

use std::io;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    File,
    Paste,
}

impl LoadSource {
    pub const fn success_message(self) -> &'static str {
        match self {
            Self::File => "Image loaded.",
            Self::Paste => "Image pasted.",
        }
    }

    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::File => "Could not load that image.",
            Self::Paste => "Could not load pasted image.",
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read image file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("decoded image has no pixels")]
    EmptyImage,
    #[error("clipboard image data was empty")]
    EmptyClipboard,
    #[error("failed to read clipboard image: {message}")]
    ClipboardRead { message: String },
    #[error("image decode worker stopped before finishing")]
    WorkerLost,
}

impl LoadError {
    pub fn user_message(&self, source: LoadSource) -> &'static str {
        match self {
            Self::EmptyClipboard => "Clipboard image data was empty.",
            _ => source.failure_message(),
        }
    }
}

pub type LoadResult<T> = std::result::Result<T, LoadError>;

/// Identifies one load request. Only the most recently issued ticket may apply its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    source: LoadSource,
}

impl LoadTicket {
    pub const fn generation(self) -> u64 {
        self.generation
    }

    pub const fn source(self) -> LoadSource {
        self.source
    }
}

#[derive(Debug, Default)]
pub struct LoadGeneration {
    latest: u64,
}

impl LoadGeneration {
    pub fn issue(&mut self, source: LoadSource) -> LoadTicket {
        self.latest = self.latest.wrapping_add(1);
        LoadTicket {
            generation: self.latest,
            source,
        }
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.generation == self.latest
    }
}

pub fn decode_image(bytes: &[u8]) -> LoadResult<RgbaImage> {
    if bytes.is_empty() {
        return Err(LoadError::EmptyImage);
    }
    let image = image::load_from_memory(bytes)?.to_rgba8();
    if image.width() == 0 || image.height() == 0 {
        return Err(LoadError::EmptyImage);
    }
    Ok(image)
}

pub fn read_image_file(path: &Path) -> LoadResult<RgbaImage> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    decode_image(&bytes)
}
