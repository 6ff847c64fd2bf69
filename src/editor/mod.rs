//! The editing session: canvas buffer, overlay, gesture tracking, and undo/reset history.

pub mod history;
pub mod overlay;
pub mod status;
pub mod tools;

use image::RgbaImage;

use crate::clipboard::{self, ClipboardBackend, ClipboardError, ClipboardResult};
use crate::geometry::{ImageBounds, SelectionRect};
use crate::loader::{LoadGeneration, LoadResult, LoadSource, LoadTicket};
use crate::state::{GestureOutcome, PointerEvent, SelectionTracker};

pub use history::HistoryStack;
pub use overlay::Overlay;
pub use status::{ControlState, StatusMessage};
pub use tools::{ToolMode, ToolSettings};

const COPY_SUCCESS_MESSAGE: &str = "Image copied to clipboard.";
const COPY_UNSUPPORTED_MESSAGE: &str = "Copy is not supported in this environment.";
const COPY_FAILED_MESSAGE: &str = "Could not copy image. Clipboard permission may be blocked.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    Failed,
    /// A newer load was requested after this one started; the result was dropped.
    Stale,
}

#[derive(Debug)]
struct LoadedImage {
    buffer: RgbaImage,
    original: RgbaImage,
}

/// All mutable editor state for one window.
///
/// Created empty; the first successful load gives it an image, and every later load replaces
/// that image along with its history.
#[derive(Debug, Default)]
pub struct EditorSession {
    loaded: Option<LoadedImage>,
    overlay: Overlay,
    history: HistoryStack,
    tracker: SelectionTracker,
    settings: ToolSettings,
    status: Option<StatusMessage>,
    load_generation: LoadGeneration,
    revision: u64,
}

impl EditorSession {
    pub fn new(settings: ToolSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn has_image(&self) -> bool {
        self.loaded.is_some()
    }

    pub fn image(&self) -> Option<&RgbaImage> {
        self.loaded.as_ref().map(|loaded| &loaded.buffer)
    }

    pub fn original(&self) -> Option<&RgbaImage> {
        self.loaded.as_ref().map(|loaded| &loaded.original)
    }

    pub fn bounds(&self) -> Option<ImageBounds> {
        self.image().map(ImageBounds::of)
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn settings(&self) -> ToolSettings {
        self.settings
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    /// Bumped whenever the canvas buffer changes, so renderers can cache converted surfaces.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn controls(&self) -> ControlState {
        ControlState::derive(self.has_image(), self.history.len(), self.settings.mode)
    }

    pub fn select_tool(&mut self, mode: ToolMode) {
        tracing::debug!(tool = mode.label(), "tool selected");
        self.settings.select_tool(mode);
    }

    pub fn set_blur_radius(&mut self, radius: u8) {
        self.settings.set_blur_radius(radius);
    }

    pub fn set_status(&mut self, status: StatusMessage) {
        if status.is_error {
            tracing::warn!(message = %status.text, "status error");
        } else {
            tracing::info!(message = %status.text, "status");
        }
        self.status = Some(status);
    }

    /// Starts a load request; any request still in flight becomes stale.
    pub fn begin_load(&mut self, source: LoadSource) -> LoadTicket {
        let ticket = self.load_generation.issue(source);
        tracing::debug!(generation = ticket.generation(), ?source, "image load requested");
        ticket
    }

    /// Starts a paste load if the clipboard offers an image type. Anything else is ignored
    /// without touching the session, so the caller can let the key event through.
    pub fn begin_paste<S: AsRef<str>>(&mut self, offered_mime_types: &[S]) -> Option<LoadTicket> {
        let Some(mime_type) = clipboard::pasted_image_mime_type(offered_mime_types) else {
            tracing::debug!("paste without image data ignored");
            return None;
        };
        tracing::debug!(mime_type, "pasting image from clipboard");
        Some(self.begin_load(LoadSource::Paste))
    }

    pub fn finish_load(&mut self, ticket: LoadTicket, result: LoadResult<RgbaImage>) -> LoadOutcome {
        if !self.load_generation.is_current(ticket) {
            tracing::debug!(
                generation = ticket.generation(),
                "dropping stale image load result"
            );
            return LoadOutcome::Stale;
        }

        match result {
            Ok(image) => {
                let bounds = ImageBounds::of(&image);
                self.overlay.resize(bounds);
                self.history.clear();
                self.tracker.reset();
                self.loaded = Some(LoadedImage {
                    buffer: image.clone(),
                    original: image,
                });
                self.bump_revision();
                tracing::info!(
                    width = bounds.width,
                    height = bounds.height,
                    "image loaded into canvas"
                );
                self.set_status(StatusMessage::info(ticket.source().success_message()));
                LoadOutcome::Loaded
            }
            Err(err) => {
                tracing::warn!(%err, source = ?ticket.source(), "image load failed");
                self.set_status(StatusMessage::error(err.user_message(ticket.source())));
                LoadOutcome::Failed
            }
        }
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) -> GestureOutcome {
        if !self.has_image() {
            return GestureOutcome::Ignored;
        }

        let outcome = match self.tracker.transition(event) {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::trace!(%err, "pointer event ignored");
                return GestureOutcome::Ignored;
            }
        };

        match outcome {
            GestureOutcome::Preview(rect) => self.overlay.draw_selection(rect),
            GestureOutcome::Commit(rect) => {
                self.overlay.clear();
                self.apply_selection(rect);
            }
            GestureOutcome::Started | GestureOutcome::Discarded => self.overlay.clear(),
            GestureOutcome::Ignored => {}
        }
        outcome
    }

    /// Abandons the gesture in progress without applying it.
    pub fn cancel_selection(&mut self) -> bool {
        if !self.tracker.is_dragging() {
            return false;
        }
        self.tracker.reset();
        self.overlay.clear();
        tracing::debug!("selection abandoned");
        true
    }

    /// Snapshots the buffer, then applies the active tool to `rect`. Returns whether anything
    /// was applied.
    pub fn apply_selection(&mut self, rect: SelectionRect) -> bool {
        let Some(loaded) = self.loaded.as_mut() else {
            return false;
        };
        let Some(region) = rect.clipped_to(ImageBounds::of(&loaded.buffer)) else {
            tracing::debug!(?rect, "selection outside image; nothing applied");
            return false;
        };

        self.history.push(loaded.buffer.clone());
        tools::apply_edit(&mut loaded.buffer, region, self.settings);
        self.bump_revision();
        tracing::debug!(
            tool = self.settings.mode.label(),
            ?region,
            history = self.history.len(),
            "edit applied"
        );
        true
    }

    /// Restores the most recent snapshot. Empty history is a no-op.
    pub fn undo(&mut self) -> bool {
        let Some(loaded) = self.loaded.as_mut() else {
            return false;
        };
        let Some(previous) = self.history.pop() else {
            tracing::debug!("undo stack empty");
            return false;
        };

        loaded.buffer = previous;
        self.bump_revision();
        tracing::debug!(history = self.history.len(), "undo applied");
        true
    }

    /// Restores the image as loaded and forgets all history.
    pub fn reset(&mut self) -> bool {
        let Some(loaded) = self.loaded.as_mut() else {
            return false;
        };

        loaded.buffer = loaded.original.clone();
        self.history.clear();
        self.overlay.clear();
        self.tracker.reset();
        self.bump_revision();
        tracing::debug!("reset to original image");
        true
    }

    /// Writes the current buffer to the clipboard as png and reports the result in the status.
    pub fn copy_to_clipboard(&mut self, backend: &dyn ClipboardBackend) -> ClipboardResult<()> {
        let Some(loaded) = self.loaded.as_ref() else {
            return Err(ClipboardError::NoImage);
        };
        if !backend.is_supported() {
            self.set_status(StatusMessage::error(COPY_UNSUPPORTED_MESSAGE));
            return Err(ClipboardError::Unsupported);
        }

        let result = clipboard::encode_png(&loaded.buffer).and_then(|png| backend.write_png(&png));
        match &result {
            Ok(()) => self.set_status(StatusMessage::info(COPY_SUCCESS_MESSAGE)),
            Err(err) => {
                tracing::warn!(%err, "clipboard copy failed");
                self.set_status(StatusMessage::error(COPY_FAILED_MESSAGE));
            }
        }
        result
    }

    fn bump_revision(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ImagePoint;
    use crate::loader::LoadError;
    use image::Rgba;
    use std::cell::RefCell;

    struct RecordingBackend {
        supported: bool,
        fail: bool,
        written: RefCell<Vec<Vec<u8>>>,
    }

    impl RecordingBackend {
        fn new(supported: bool, fail: bool) -> Self {
            Self {
                supported,
                fail,
                written: RefCell::new(Vec::new()),
            }
        }
    }

    impl ClipboardBackend for RecordingBackend {
        fn is_supported(&self) -> bool {
            self.supported
        }

        fn write_png(&self, png: &[u8]) -> ClipboardResult<()> {
            if self.fail {
                return Err(ClipboardError::CommandFailed {
                    status: "exit status 1".to_string(),
                });
            }
            self.written.borrow_mut().push(png.to_vec());
            Ok(())
        }
    }

    fn gradient(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x * 3) as u8, (y * 5) as u8, ((x + y) * 2) as u8, 255])
        })
    }

    fn loaded_session(image: RgbaImage) -> EditorSession {
        let mut session = EditorSession::default();
        let ticket = session.begin_load(LoadSource::File);
        assert_eq!(session.finish_load(ticket, Ok(image)), LoadOutcome::Loaded);
        session
    }

    fn drag(session: &mut EditorSession, from: (u32, u32), to: (u32, u32)) -> GestureOutcome {
        session.handle_pointer(PointerEvent::Down(ImagePoint::new(from.0, from.1)));
        session.handle_pointer(PointerEvent::Move(ImagePoint::new(to.0, to.1)));
        session.handle_pointer(PointerEvent::Up)
    }

    #[test]
    fn load_sizes_overlay_and_sets_status() {
        let session = loaded_session(gradient(64, 40));
        assert_eq!(session.bounds(), Some(ImageBounds::new(64, 40)));
        assert_eq!(session.overlay().bounds(), ImageBounds::new(64, 40));
        assert_eq!(session.status(), Some(&StatusMessage::info("Image loaded.")));
        assert_eq!(session.image(), session.original());
    }

    #[test]
    fn failed_load_keeps_previous_image_and_history() {
        let mut session = loaded_session(gradient(32, 32));
        assert_eq!(
            drag(&mut session, (2, 2), (20, 20)),
            GestureOutcome::Commit(SelectionRect::new(2, 2, 18, 18))
        );
        let edited = session.image().cloned();

        let ticket = session.begin_load(LoadSource::Paste);
        let outcome = session.finish_load(ticket, Err(LoadError::EmptyImage));

        assert_eq!(outcome, LoadOutcome::Failed);
        assert_eq!(session.image().cloned(), edited);
        assert_eq!(session.history_len(), 1);
        assert_eq!(
            session.status(),
            Some(&StatusMessage::error("Could not load pasted image."))
        );
    }

    #[test]
    fn stale_load_result_is_dropped() {
        let mut session = EditorSession::default();
        let slow = session.begin_load(LoadSource::File);
        let fast = session.begin_load(LoadSource::Paste);

        assert_eq!(
            session.finish_load(fast, Ok(gradient(10, 10))),
            LoadOutcome::Loaded
        );
        assert_eq!(
            session.finish_load(slow, Ok(gradient(50, 50))),
            LoadOutcome::Stale
        );
        assert_eq!(session.bounds(), Some(ImageBounds::new(10, 10)));
        assert_eq!(session.status(), Some(&StatusMessage::info("Image pasted.")));
    }

    #[test]
    fn paste_without_image_type_issues_no_ticket() {
        let mut session = EditorSession::default();
        let pending = session.begin_load(LoadSource::File);

        assert_eq!(session.begin_paste(&["text/plain", "text/html"]), None);
        assert_eq!(session.begin_paste::<&str>(&[]), None);
        assert_eq!(session.status(), None);

        // The earlier request is still the latest one.
        assert_eq!(
            session.finish_load(pending, Ok(gradient(8, 8))),
            LoadOutcome::Loaded
        );
    }

    #[test]
    fn paste_with_image_type_issues_paste_ticket() {
        let mut session = EditorSession::default();
        let pending = session.begin_load(LoadSource::File);

        let ticket = session
            .begin_paste(&["text/plain", "image/png"])
            .expect("image payload should start a load");
        assert_eq!(ticket.source(), LoadSource::Paste);
        assert_eq!(
            session.finish_load(pending, Ok(gradient(8, 8))),
            LoadOutcome::Stale
        );
    }

    #[test]
    fn new_load_clears_history_and_gesture() {
        let mut session = loaded_session(gradient(32, 32));
        drag(&mut session, (0, 0), (10, 10));
        session.handle_pointer(PointerEvent::Down(ImagePoint::new(1, 1)));

        let ticket = session.begin_load(LoadSource::File);
        session.finish_load(ticket, Ok(gradient(16, 16)));

        assert_eq!(session.history_len(), 0);
        assert_eq!(
            session.handle_pointer(PointerEvent::Up),
            GestureOutcome::Ignored
        );
    }

    #[test]
    fn pointer_events_without_image_are_ignored() {
        let mut session = EditorSession::default();
        assert_eq!(drag(&mut session, (0, 0), (30, 30)), GestureOutcome::Ignored);
        assert_eq!(session.history_len(), 0);
    }

    #[test]
    fn preview_draws_on_overlay_and_commit_clears_it() {
        let mut session = loaded_session(gradient(32, 32));
        session.handle_pointer(PointerEvent::Down(ImagePoint::new(4, 4)));
        session.handle_pointer(PointerEvent::Move(ImagePoint::new(12, 12)));
        assert_eq!(
            session.overlay().selection(),
            Some(SelectionRect::new(4, 4, 8, 8))
        );
        assert_eq!(session.image(), session.original());

        session.handle_pointer(PointerEvent::Up);
        assert!(session.overlay().selection().is_none());
        assert_ne!(session.image(), session.original());
    }

    #[test]
    fn cancel_selection_drops_preview_without_editing() {
        let mut session = loaded_session(gradient(32, 32));
        session.handle_pointer(PointerEvent::Down(ImagePoint::new(4, 4)));
        session.handle_pointer(PointerEvent::Move(ImagePoint::new(20, 20)));

        assert!(session.cancel_selection());
        assert!(session.overlay().selection().is_none());
        assert_eq!(
            session.handle_pointer(PointerEvent::Up),
            GestureOutcome::Ignored
        );
        assert_eq!(session.history_len(), 0);
        assert!(!session.cancel_selection());
    }

    #[test]
    fn undo_and_reset_update_revision_and_controls() {
        let mut session = loaded_session(gradient(32, 32));
        assert!(!session.controls().undo_enabled);
        assert!(session.controls().copy_enabled);

        let before = session.revision();
        drag(&mut session, (0, 0), (8, 8));
        assert!(session.revision() > before);
        assert!(session.controls().undo_enabled);

        assert!(session.undo());
        assert!(!session.undo());
        assert!(!session.controls().undo_enabled);

        drag(&mut session, (0, 0), (8, 8));
        assert!(session.reset());
        assert_eq!(session.history_len(), 0);
        assert!(!session.undo());
        assert_eq!(session.image(), session.original());
    }

    #[test]
    fn blur_mode_uses_configured_radius() {
        let mut session = EditorSession::new(ToolSettings::new(ToolMode::Blur, 3));
        let ticket = session.begin_load(LoadSource::File);
        session.finish_load(ticket, Ok(gradient(32, 32)));
        session.set_blur_radius(200);
        assert_eq!(session.settings().blur.radius, tools::BLUR_RADIUS_MAX);
        assert!(session.controls().blur_radius_visible);

        session.select_tool(ToolMode::Blackout);
        assert!(!session.controls().blur_radius_visible);
    }

    #[test]
    fn copy_writes_png_and_reports_success() {
        let mut session = loaded_session(gradient(8, 8));
        let backend = RecordingBackend::new(true, false);

        session
            .copy_to_clipboard(&backend)
            .expect("copy should succeed");

        let written = backend.written.borrow();
        assert_eq!(written.len(), 1);
        let decoded = image::load_from_memory(&written[0])
            .expect("clipboard png should decode")
            .to_rgba8();
        assert_eq!(Some(&decoded), session.image());
        assert_eq!(
            session.status(),
            Some(&StatusMessage::info("Image copied to clipboard."))
        );
    }

    #[test]
    fn copy_failures_set_error_status() {
        let mut session = loaded_session(gradient(8, 8));

        let unsupported = session.copy_to_clipboard(&RecordingBackend::new(false, false));
        assert!(matches!(unsupported, Err(ClipboardError::Unsupported)));
        assert_eq!(
            session.status(),
            Some(&StatusMessage::error(
                "Copy is not supported in this environment."
            ))
        );

        let denied = session.copy_to_clipboard(&RecordingBackend::new(true, true));
        assert!(matches!(denied, Err(ClipboardError::CommandFailed { .. })));
        assert_eq!(
            session.status(),
            Some(&StatusMessage::error(
                "Could not copy image. Clipboard permission may be blocked."
            ))
        );
    }

    #[test]
    fn copy_without_image_is_silent() {
        let mut session = EditorSession::default();
        let backend = RecordingBackend::new(true, false);
        assert!(matches!(
            session.copy_to_clipboard(&backend),
            Err(ClipboardError::NoImage)
        ));
        assert!(session.status().is_none());
        assert!(backend.written.borrow().is_empty());
    }
}
