use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;

use gtk4::prelude::*;
use gtk4::{gdk, gio, glib};
use image::RgbaImage;

use crate::clipboard::ClipboardBackend;
use crate::editor::{EditorSession, LoadOutcome, ToolMode};
use crate::geometry::{DisplayMapping, ImagePoint};
use crate::input::ShortcutAction;
use crate::loader::{self, LoadError, LoadResult, LoadSource, LoadTicket};
use crate::notification;
use crate::state::{GestureOutcome, PointerEvent};

use super::render::CanvasSurfaceCache;
use super::window::EditorWidgets;
use super::worker::spawn_image_decode;

const STATUS_ERROR_CSS_CLASS: &str = "error";

/// Everything a signal handler needs; cloned into each closure.
#[derive(Clone)]
pub(super) struct EditorContext {
    pub(super) session: Rc<RefCell<EditorSession>>,
    pub(super) widgets: EditorWidgets,
    pub(super) surfaces: Rc<RefCell<CanvasSurfaceCache>>,
    pub(super) clipboard: Rc<dyn ClipboardBackend>,
    pub(super) notify_on_copy: bool,
}

impl EditorContext {
    /// Pushes derived session state into the widgets and schedules a repaint.
    pub(super) fn refresh(&self) {
        let session = self.session.borrow();
        let controls = session.controls();
        let widgets = &self.widgets;

        widgets.undo_button.set_sensitive(controls.undo_enabled);
        widgets.reset_button.set_sensitive(controls.reset_enabled);
        widgets.copy_button.set_sensitive(controls.copy_enabled);
        widgets
            .blur_radius_group
            .set_visible(controls.blur_radius_visible);
        widgets.placeholder.set_visible(controls.placeholder_visible);

        match session.status() {
            Some(status) => {
                widgets.status.set_text(&status.text);
                if status.is_error {
                    widgets.status.add_css_class(STATUS_ERROR_CSS_CLASS);
                } else {
                    widgets.status.remove_css_class(STATUS_ERROR_CSS_CLASS);
                }
            }
            None => widgets.status.set_text(""),
        }

        widgets.canvas.queue_draw();
    }

    fn display_mapping(&self) -> Option<DisplayMapping> {
        let bounds = self.session.borrow().bounds()?;
        let canvas = &self.widgets.canvas;
        Some(DisplayMapping::fit(
            f64::from(canvas.width()),
            f64::from(canvas.height()),
            bounds,
        ))
    }

    /// Maps a widget point to the buffer, clamping points dragged past the image edge.
    pub(super) fn buffer_point(&self, widget_x: f64, widget_y: f64) -> Option<ImagePoint> {
        self.display_mapping()
            .map(|mapping| mapping.to_buffer_point(widget_x, widget_y))
    }

    /// Like `buffer_point`, but only for presses that land on the rendered image.
    pub(super) fn image_point(&self, widget_x: f64, widget_y: f64) -> Option<ImagePoint> {
        self.display_mapping()
            .filter(|mapping| mapping.contains_widget_point(widget_x, widget_y))
            .map(|mapping| mapping.to_buffer_point(widget_x, widget_y))
    }

    pub(super) fn handle_pointer(&self, event: PointerEvent) {
        let outcome = self.session.borrow_mut().handle_pointer(event);
        match outcome {
            GestureOutcome::Ignored => {}
            GestureOutcome::Commit(_) => self.refresh(),
            GestureOutcome::Started | GestureOutcome::Preview(_) | GestureOutcome::Discarded => {
                self.widgets.canvas.queue_draw()
            }
        }
    }

    pub(super) fn select_tool(&self, mode: ToolMode) {
        self.session.borrow_mut().select_tool(mode);
        self.refresh();
    }

    pub(super) fn set_blur_radius(&self, radius: u8) {
        self.session.borrow_mut().set_blur_radius(radius);
    }

    pub(super) fn undo(&self) {
        if self.session.borrow_mut().undo() {
            self.refresh();
        }
    }

    pub(super) fn reset(&self) {
        if self.session.borrow_mut().reset() {
            self.refresh();
        }
    }

    pub(super) fn copy_image(&self) {
        let result = self
            .session
            .borrow_mut()
            .copy_to_clipboard(self.clipboard.as_ref());
        if result.is_ok() && self.notify_on_copy {
            notification::send("Image copied to clipboard.");
        }
        self.refresh();
    }

    pub(super) fn open_file_dialog(&self) {
        let filter = gtk4::FileFilter::new();
        filter.set_name(Some("Images"));
        filter.add_mime_type("image/*");
        let filters = gio::ListStore::new::<gtk4::FileFilter>();
        filters.append(&filter);

        let dialog = gtk4::FileDialog::new();
        dialog.set_title("Open image");
        dialog.set_modal(true);
        dialog.set_filters(Some(&filters));

        let context = self.clone();
        dialog.open(
            Some(&self.widgets.window),
            gio::Cancellable::NONE,
            move |result| {
                let file = match result {
                    Ok(file) => file,
                    Err(err) => {
                        tracing::debug!(%err, "file dialog closed without a selection");
                        return;
                    }
                };

                let ticket = context.session.borrow_mut().begin_load(LoadSource::File);
                match file.path() {
                    Some(path) => {
                        context.decode_in_background(ticket, move || {
                            loader::read_image_file(&path)
                        });
                    }
                    None => context.finish_load(
                        ticket,
                        Err(LoadError::ReadFile {
                            path: PathBuf::from(file.uri().as_str()),
                            source: io::Error::other("selected file has no local path"),
                        }),
                    ),
                }
            },
        );
    }

    /// Loads an image from the clipboard. Returns `Proceed` when the clipboard offers no
    /// image, leaving the key event to other handlers.
    pub(super) fn paste_from_clipboard(&self) -> glib::Propagation {
        let Some(display) = gdk::Display::default() else {
            return glib::Propagation::Proceed;
        };
        let board = display.clipboard();
        let mime_types = board
            .formats()
            .mime_types()
            .iter()
            .map(|mime| mime.to_string())
            .collect::<Vec<_>>();
        let Some(ticket) = self.session.borrow_mut().begin_paste(&mime_types) else {
            return glib::Propagation::Proceed;
        };
        let context = self.clone();
        board.read_texture_async(gio::Cancellable::NONE, move |result| match result {
            Ok(Some(texture)) => {
                let png = texture.save_to_png_bytes().to_vec();
                context.decode_in_background(ticket, move || loader::decode_image(&png));
            }
            Ok(None) => context.finish_load(ticket, Err(LoadError::EmptyClipboard)),
            Err(err) => context.finish_load(
                ticket,
                Err(LoadError::ClipboardRead {
                    message: err.to_string(),
                }),
            ),
        });
        glib::Propagation::Stop
    }

    pub(super) fn run_shortcut(&self, action: ShortcutAction) -> glib::Propagation {
        let has_image = self.session.borrow().has_image();
        match action {
            ShortcutAction::OpenImage => self.open_file_dialog(),
            ShortcutAction::PasteImage => return self.paste_from_clipboard(),
            ShortcutAction::CopyImage if has_image => self.copy_image(),
            ShortcutAction::Undo if has_image => self.undo(),
            ShortcutAction::Reset if has_image => self.reset(),
            ShortcutAction::SelectTool(mode) => {
                // The selector's notify handler updates the session.
                self.widgets.tool_selector.set_selected(mode.position());
            }
            ShortcutAction::CancelSelection => {
                if !self.session.borrow_mut().cancel_selection() {
                    return glib::Propagation::Proceed;
                }
                self.widgets.canvas.queue_draw();
            }
            ShortcutAction::CopyImage | ShortcutAction::Undo | ShortcutAction::Reset => {
                return glib::Propagation::Proceed;
            }
        }
        glib::Propagation::Stop
    }

    fn decode_in_background<W>(&self, ticket: LoadTicket, work: W)
    where
        W: FnOnce() -> LoadResult<RgbaImage> + Send + 'static,
    {
        let context = self.clone();
        spawn_image_decode(work, move |result| context.finish_load(ticket, result));
    }

    fn finish_load(&self, ticket: LoadTicket, result: LoadResult<RgbaImage>) {
        let outcome = self.session.borrow_mut().finish_load(ticket, result);
        if outcome != LoadOutcome::Stale {
            self.refresh();
        }
    }
}
