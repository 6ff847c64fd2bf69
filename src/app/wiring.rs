use gtk4::prelude::*;
use gtk4::{gdk, glib};

use crate::editor::tools::{ToolMode, BLUR_RADIUS_MAX, BLUR_RADIUS_MIN};
use crate::input::{resolve_shortcut, ShortcutKey, ShortcutModifiers};
use crate::state::PointerEvent;

use super::actions::EditorContext;
use super::render::paint_session;

pub(super) fn connect_editor(context: &EditorContext) {
    connect_canvas_drawing(context);
    connect_canvas_gestures(context);
    connect_toolbar(context);
    connect_shortcuts(context);
}

fn connect_canvas_drawing(context: &EditorContext) {
    let draw_context = context.clone();
    context
        .widgets
        .canvas
        .set_draw_func(move |_, cr, width, height| {
            let session = draw_context.session.borrow();
            let mut surfaces = draw_context.surfaces.borrow_mut();
            if let Err(err) = paint_session(cr, width, height, &session, &mut surfaces) {
                tracing::warn!(%err, "canvas paint failed");
            }
        });
}

fn connect_canvas_gestures(context: &EditorContext) {
    let drag = gtk4::GestureDrag::new();
    drag.set_button(gdk::BUTTON_PRIMARY);

    let begin_context = context.clone();
    drag.connect_drag_begin(move |_, x, y| {
        if let Some(point) = begin_context.image_point(x, y) {
            begin_context.handle_pointer(PointerEvent::Down(point));
        }
    });

    let update_context = context.clone();
    drag.connect_drag_update(move |gesture, offset_x, offset_y| {
        send_drag_move(&update_context, gesture, offset_x, offset_y);
    });

    let end_context = context.clone();
    drag.connect_drag_end(move |gesture, offset_x, offset_y| {
        send_drag_move(&end_context, gesture, offset_x, offset_y);
        end_context.handle_pointer(PointerEvent::Up);
    });

    let cancel_context = context.clone();
    drag.connect_cancel(move |_, _| {
        cancel_context.handle_pointer(PointerEvent::Cancel);
    });

    context.widgets.canvas.add_controller(drag);
}

fn send_drag_move(
    context: &EditorContext,
    gesture: &gtk4::GestureDrag,
    offset_x: f64,
    offset_y: f64,
) {
    let Some((start_x, start_y)) = gesture.start_point() else {
        return;
    };
    if let Some(point) = context.buffer_point(start_x + offset_x, start_y + offset_y) {
        context.handle_pointer(PointerEvent::Move(point));
    }
}

fn connect_toolbar(context: &EditorContext) {
    let widgets = &context.widgets;

    let open_context = context.clone();
    widgets
        .open_button
        .connect_clicked(move |_| open_context.open_file_dialog());

    let undo_context = context.clone();
    widgets
        .undo_button
        .connect_clicked(move |_| undo_context.undo());

    let reset_context = context.clone();
    widgets
        .reset_button
        .connect_clicked(move |_| reset_context.reset());

    let copy_context = context.clone();
    widgets
        .copy_button
        .connect_clicked(move |_| copy_context.copy_image());

    let tool_context = context.clone();
    widgets.tool_selector.connect_selected_notify(move |selector| {
        if let Some(mode) = ToolMode::from_position(selector.selected()) {
            tool_context.select_tool(mode);
        }
    });

    let radius_context = context.clone();
    widgets.blur_radius.connect_value_changed(move |spin| {
        let radius = spin
            .value_as_int()
            .clamp(i32::from(BLUR_RADIUS_MIN), i32::from(BLUR_RADIUS_MAX));
        radius_context.set_blur_radius(u8::try_from(radius).unwrap_or(BLUR_RADIUS_MAX));
    });
}

fn connect_shortcuts(context: &EditorContext) {
    let keys = gtk4::EventControllerKey::new();
    let key_context = context.clone();
    keys.connect_key_pressed(move |_, key, _, state| {
        let Some(shortcut_key) = shortcut_key(key) else {
            return glib::Propagation::Proceed;
        };
        let modifiers = ShortcutModifiers::new(
            state.contains(gdk::ModifierType::CONTROL_MASK),
            state.contains(gdk::ModifierType::SHIFT_MASK),
        );
        match resolve_shortcut(shortcut_key, modifiers) {
            Some(action) => key_context.run_shortcut(action),
            None => glib::Propagation::Proceed,
        }
    });
    context.widgets.window.add_controller(keys);
}

fn shortcut_key(key: gdk::Key) -> Option<ShortcutKey> {
    if key == gdk::Key::Escape {
        return Some(ShortcutKey::Escape);
    }
    key.to_lower().to_unicode().map(ShortcutKey::Character)
}
