use gtk4::prelude::*;
use gtk4::{
    Align, Application, ApplicationWindow, Box as GtkBox, Button, DrawingArea, DropDown, Label,
    Orientation, Overlay, SpinButton,
};

use crate::editor::tools::{ToolMode, ToolSettings, BLUR_RADIUS_MAX, BLUR_RADIUS_MIN};

const WINDOW_TITLE: &str = "Redakt";
const WINDOW_DEFAULT_WIDTH: i32 = 960;
const WINDOW_DEFAULT_HEIGHT: i32 = 720;
const TOOLBAR_SPACING: i32 = 8;
const TOOLBAR_MARGIN: i32 = 8;
const PLACEHOLDER_TEXT: &str = "Open an image or paste one with Ctrl+V, then drag over what to hide.";

#[derive(Clone)]
pub(super) struct EditorWidgets {
    pub(super) window: ApplicationWindow,
    pub(super) canvas: DrawingArea,
    pub(super) placeholder: Label,
    pub(super) status: Label,
    pub(super) open_button: Button,
    pub(super) undo_button: Button,
    pub(super) reset_button: Button,
    pub(super) copy_button: Button,
    pub(super) tool_selector: DropDown,
    pub(super) blur_radius: SpinButton,
    pub(super) blur_radius_group: GtkBox,
}

pub(super) fn build_editor_widgets(
    application: &Application,
    settings: ToolSettings,
) -> EditorWidgets {
    let window = ApplicationWindow::builder()
        .application(application)
        .title(WINDOW_TITLE)
        .default_width(WINDOW_DEFAULT_WIDTH)
        .default_height(WINDOW_DEFAULT_HEIGHT)
        .build();

    let open_button = Button::with_label("Open…");
    let tool_labels = ToolMode::ALL.map(ToolMode::label);
    let tool_selector = DropDown::from_strings(&tool_labels);
    tool_selector.set_selected(settings.mode.position());
    tool_selector.set_tooltip_text(Some("Tool (X: blackout, B: blur)"));

    let blur_radius = SpinButton::with_range(
        f64::from(BLUR_RADIUS_MIN),
        f64::from(BLUR_RADIUS_MAX),
        1.0,
    );
    blur_radius.set_value(f64::from(settings.blur.radius));
    let blur_radius_group = GtkBox::new(Orientation::Horizontal, TOOLBAR_SPACING / 2);
    blur_radius_group.append(&Label::new(Some("Blur radius")));
    blur_radius_group.append(&blur_radius);
    blur_radius_group.set_visible(settings.mode.shows_blur_radius());

    let undo_button = Button::with_label("Undo");
    undo_button.set_tooltip_text(Some("Undo last edit (Ctrl+Z)"));
    let reset_button = Button::with_label("Reset");
    reset_button.set_tooltip_text(Some("Restore the original image (Ctrl+Shift+R)"));
    let copy_button = Button::with_label("Copy");
    copy_button.set_tooltip_text(Some("Copy image to clipboard (Ctrl+C)"));

    let toolbar = GtkBox::new(Orientation::Horizontal, TOOLBAR_SPACING);
    toolbar.set_margin_top(TOOLBAR_MARGIN);
    toolbar.set_margin_bottom(TOOLBAR_MARGIN);
    toolbar.set_margin_start(TOOLBAR_MARGIN);
    toolbar.set_margin_end(TOOLBAR_MARGIN);
    toolbar.append(&open_button);
    toolbar.append(&tool_selector);
    toolbar.append(&blur_radius_group);
    toolbar.append(&undo_button);
    toolbar.append(&reset_button);
    toolbar.append(&copy_button);

    let canvas = DrawingArea::new();
    canvas.set_hexpand(true);
    canvas.set_vexpand(true);

    let placeholder = Label::new(Some(PLACEHOLDER_TEXT));
    placeholder.set_halign(Align::Center);
    placeholder.set_valign(Align::Center);
    placeholder.set_can_target(false);

    let stage = Overlay::new();
    stage.set_child(Some(&canvas));
    stage.add_overlay(&placeholder);

    let status = Label::new(None);
    status.set_xalign(0.0);
    status.set_margin_top(TOOLBAR_MARGIN / 2);
    status.set_margin_bottom(TOOLBAR_MARGIN / 2);
    status.set_margin_start(TOOLBAR_MARGIN);
    status.set_margin_end(TOOLBAR_MARGIN);

    let root = GtkBox::new(Orientation::Vertical, 0);
    root.append(&toolbar);
    root.append(&stage);
    root.append(&status);
    window.set_child(Some(&root));

    EditorWidgets {
        window,
        canvas,
        placeholder,
        status,
        open_button,
        undo_button,
        reset_button,
        copy_button,
        tool_selector,
        blur_radius,
        blur_radius_group,
    }
}
