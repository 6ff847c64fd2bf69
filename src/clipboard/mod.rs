use std::io::{self, Write};
use std::process::{Command, Stdio};

use gtk4::gdk;
use gtk4::glib;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbaImage};
use serde::Deserialize;
use thiserror::Error;

const WL_COPY_COMMAND: &str = "wl-copy";
const MIME_IMAGE_PREFIX: &str = "image/";
pub const MIME_IMAGE_PNG: &str = "image/png";

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("no image is loaded")]
    NoImage,
    #[error("clipboard image output is not supported here")]
    Unsupported,
    #[error("failed to encode image as png: {source}")]
    Encode {
        #[source]
        source: image::ImageError,
    },
    #[error("failed to run clipboard command: {command}")]
    CommandIo {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to access default display for clipboard operations")]
    DisplayUnavailable,
    #[error("failed to set clipboard content: {source}")]
    SetContent {
        #[source]
        source: glib::BoolError,
    },
    #[error("wl-copy exited with non-zero status: {status}")]
    CommandFailed { status: String },
}

pub type ClipboardResult<T> = std::result::Result<T, ClipboardError>;

pub trait ClipboardBackend {
    /// Whether this environment can put an image on the clipboard at all.
    fn is_supported(&self) -> bool;
    fn write_png(&self, png: &[u8]) -> ClipboardResult<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClipboardBackendKind {
    #[default]
    Gdk,
    WlCopy,
}

impl ClipboardBackendKind {
    pub fn backend(self) -> Box<dyn ClipboardBackend> {
        match self {
            Self::Gdk => Box::new(GdkClipboardBackend),
            Self::WlCopy => Box::new(WlCopyBackend),
        }
    }
}

/// Offers the png through the display's own clipboard.
#[derive(Debug, Default)]
pub struct GdkClipboardBackend;

impl ClipboardBackend for GdkClipboardBackend {
    fn is_supported(&self) -> bool {
        gdk::Display::default().is_some()
    }

    fn write_png(&self, png: &[u8]) -> ClipboardResult<()> {
        let display = gdk::Display::default().ok_or(ClipboardError::DisplayUnavailable)?;
        let provider = gdk::ContentProvider::for_bytes(
            MIME_IMAGE_PNG,
            &glib::Bytes::from_owned(png.to_vec()),
        );
        display
            .clipboard()
            .set_content(Some(&provider))
            .map_err(|source| ClipboardError::SetContent { source })
    }
}

/// Pipes the png into `wl-copy`, which keeps serving it after this process exits.
#[derive(Debug, Default)]
pub struct WlCopyBackend;

impl ClipboardBackend for WlCopyBackend {
    fn is_supported(&self) -> bool {
        std::env::var_os("WAYLAND_DISPLAY").is_some() && command_on_path(WL_COPY_COMMAND)
    }

    fn write_png(&self, png: &[u8]) -> ClipboardResult<()> {
        let mut command = Command::new(WL_COPY_COMMAND);
        command.args(["--type", MIME_IMAGE_PNG]);
        pipe_into_command(command, png)
    }
}

/// Feeds `input` to the command's stdin and waits for it. The child is always reaped, even
/// when the write fails part way.
fn pipe_into_command(mut command: Command, input: &[u8]) -> ClipboardResult<()> {
    let program = command.get_program().to_string_lossy().into_owned();
    let command_io = |source| ClipboardError::CommandIo {
        command: program.clone(),
        source,
    };

    let mut child = command
        .stdin(Stdio::piped())
        .spawn()
        .map_err(command_io)?;
    let written = match child.stdin.take() {
        Some(mut stdin) => stdin.write_all(input),
        None => Ok(()),
    };
    if let Err(source) = written {
        if let Err(err) = child.kill() {
            tracing::debug!(%err, command = %program, "clipboard command already exited");
        }
        if let Err(err) = child.wait() {
            tracing::warn!(%err, command = %program, "failed to reap clipboard command");
        }
        return Err(command_io(source));
    }

    let status = child.wait().map_err(command_io)?;
    if status.success() {
        Ok(())
    } else {
        Err(ClipboardError::CommandFailed {
            status: status.to_string(),
        })
    }
}

fn command_on_path(command: &str) -> bool {
    std::env::var_os("PATH").is_some_and(|paths| {
        std::env::split_paths(&paths).any(|dir| dir.join(command).is_file())
    })
}

pub fn encode_png(image: &RgbaImage) -> ClipboardResult<Vec<u8>> {
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|source| ClipboardError::Encode { source })?;
    Ok(bytes)
}

/// First image mime type on offer, if any. Paste is only intercepted when this is `Some`.
pub fn pasted_image_mime_type<S: AsRef<str>>(mime_types: &[S]) -> Option<&str> {
    mime_types
        .iter()
        .map(S::as_ref)
        .find(|mime| mime.starts_with(MIME_IMAGE_PREFIX))
}
