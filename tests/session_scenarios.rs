use image::{Rgba, RgbaImage};
use redakt::editor::tools::BLACKOUT_PIXEL;
use redakt::editor::{EditorSession, LoadOutcome, ToolMode, ToolSettings};
use redakt::geometry::{ImageBounds, ImagePoint, SelectionRect};
use redakt::loader::{decode_image, LoadSource};
use redakt::state::{GestureOutcome, PointerEvent};

fn test_pattern(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        if ((x / 5) + (y / 5)) % 2 == 0 {
            Rgba([240, 240, 240, 255])
        } else {
            Rgba([20, 20, 20, 255])
        }
    })
}

fn session_with(image: RgbaImage, settings: ToolSettings) -> EditorSession {
    let mut session = EditorSession::new(settings);
    let ticket = session.begin_load(LoadSource::File);
    assert_eq!(session.finish_load(ticket, Ok(image)), LoadOutcome::Loaded);
    session
}

fn drag(session: &mut EditorSession, from: (u32, u32), to: (u32, u32)) -> GestureOutcome {
    session.handle_pointer(PointerEvent::Down(ImagePoint::new(from.0, from.1)));
    session.handle_pointer(PointerEvent::Move(ImagePoint::new(to.0, to.1)));
    session.handle_pointer(PointerEvent::Up)
}

fn mean_luma(image: &RgbaImage, rect: SelectionRect) -> f64 {
    let mut total = 0.0;
    for y in rect.y..rect.bottom() {
        for x in rect.x..rect.right() {
            let [r, g, b, _] = image.get_pixel(x, y).0;
            total += 0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b);
        }
    }
    total / f64::from(rect.width * rect.height)
}

#[test]
fn loaded_image_sizes_canvas_and_overlay() {
    for (width, height) in [(1, 1), (100, 100), (317, 41)] {
        let session = session_with(test_pattern(width, height), ToolSettings::default());
        assert_eq!(session.bounds(), Some(ImageBounds::new(width, height)));
        assert_eq!(session.overlay().bounds(), ImageBounds::new(width, height));
    }
}

#[test]
fn blackout_scenario_fills_rect_and_keeps_outside() {
    let original = test_pattern(100, 100);
    let mut session = session_with(original.clone(), ToolSettings::default());

    let outcome = drag(&mut session, (10, 10), (50, 50));
    let rect = SelectionRect::new(10, 10, 40, 40);
    assert_eq!(outcome, GestureOutcome::Commit(rect));
    assert_eq!(session.history_len(), 1);

    let image = session.image().expect("image loaded");
    for (x, y, pixel) in image.enumerate_pixels() {
        if rect.contains(x, y) {
            assert_eq!(*pixel, BLACKOUT_PIXEL, "pixel ({x}, {y}) should be black");
        } else {
            assert_eq!(pixel, original.get_pixel(x, y), "pixel ({x}, {y}) changed");
        }
    }
}

#[test]
fn blur_scenario_changes_rect_and_roughly_preserves_luminance() {
    let original = test_pattern(100, 100);
    let mut session = session_with(original.clone(), ToolSettings::new(ToolMode::Blur, 5));

    drag(&mut session, (10, 10), (50, 50));
    let rect = SelectionRect::new(10, 10, 40, 40);
    let image = session.image().expect("image loaded");

    let mut changed_inside = 0;
    for (x, y, pixel) in image.enumerate_pixels() {
        if rect.contains(x, y) {
            if pixel != original.get_pixel(x, y) {
                changed_inside += 1;
            }
        } else {
            assert_eq!(pixel, original.get_pixel(x, y), "pixel ({x}, {y}) changed");
        }
    }
    assert!(changed_inside > 0);

    let before = mean_luma(&original, rect);
    let after = mean_luma(image, rect);
    assert!(
        (before - after).abs() < 12.0,
        "mean luminance drifted from {before} to {after}"
    );
    assert_eq!(session.history_len(), 1);
}

#[test]
fn undoing_every_edit_restores_original_bytes() {
    let original = test_pattern(64, 64);
    let mut session = session_with(original.clone(), ToolSettings::default());

    let gestures = [((0, 0), (10, 10)), ((5, 5), (40, 20)), ((30, 30), (63, 63))];
    for (index, (from, to)) in gestures.into_iter().enumerate() {
        if index == 1 {
            session.select_tool(ToolMode::Blur);
        }
        drag(&mut session, from, to);
    }
    assert_eq!(session.history_len(), gestures.len());

    for remaining in (0..gestures.len()).rev() {
        assert!(session.undo());
        assert_eq!(session.history_len(), remaining);
    }
    assert_eq!(session.image().map(|image| image.as_raw()), Some(original.as_raw()));
}

#[test]
fn reset_restores_original_for_any_edit_count() {
    let original = test_pattern(48, 48);
    for edits in [0_u32, 1, 4] {
        let mut session = session_with(original.clone(), ToolSettings::default());
        for step in 0..edits {
            drag(&mut session, (step, step), (step + 10, step + 10));
        }

        assert!(session.reset());
        assert_eq!(session.history_len(), 0);
        assert_eq!(session.image(), Some(&original));
        assert_eq!(session.original(), Some(&original));
    }
}

#[test]
fn tiny_gestures_do_not_touch_history_or_buffer() {
    let original = test_pattern(40, 40);
    let mut session = session_with(original.clone(), ToolSettings::default());

    assert_eq!(drag(&mut session, (10, 10), (11, 30)), GestureOutcome::Discarded);
    assert_eq!(drag(&mut session, (10, 10), (30, 11)), GestureOutcome::Discarded);
    assert_eq!(drag(&mut session, (10, 10), (10, 10)), GestureOutcome::Discarded);

    assert_eq!(session.history_len(), 0);
    assert_eq!(session.image(), Some(&original));
}

#[test]
fn undo_on_empty_history_is_a_no_op() {
    let original = test_pattern(16, 16);
    let mut session = session_with(original.clone(), ToolSettings::default());
    let status_before = session.status().cloned();

    assert!(!session.undo());
    assert_eq!(session.image(), Some(&original));
    assert_eq!(session.status().cloned(), status_before);
}

#[test]
fn decode_failure_leaves_previous_image_in_place() {
    let original = test_pattern(20, 20);
    let mut session = session_with(original.clone(), ToolSettings::default());

    let ticket = session.begin_load(LoadSource::File);
    let outcome = session.finish_load(ticket, decode_image(b"\x89PNG\r\n\x1a\ncorrupt"));

    assert_eq!(outcome, LoadOutcome::Failed);
    assert_eq!(session.image(), Some(&original));
    let status = session.status().expect("failure should set status");
    assert!(status.is_error);
    assert_eq!(status.text, "Could not load that image.");
}

#[test]
fn non_image_paste_changes_nothing() {
    let original = test_pattern(20, 20);
    let mut session = session_with(original.clone(), ToolSettings::default());
    let status_before = session.status().cloned();
    let revision_before = session.revision();
    let pending = session.begin_load(LoadSource::File);

    assert!(session
        .begin_paste(&["text/plain;charset=utf-8", "text/html"])
        .is_none());

    assert_eq!(session.image(), Some(&original));
    assert_eq!(session.status().cloned(), status_before);
    assert_eq!(session.revision(), revision_before);
    // The ignored paste must not have superseded the load already in flight.
    assert_eq!(
        session.finish_load(pending, Ok(test_pattern(8, 8))),
        LoadOutcome::Loaded
    );
}

#[test]
fn image_paste_replaces_canvas_and_reports_paste() {
    let mut session = session_with(test_pattern(20, 20), ToolSettings::default());
    drag(&mut session, (0, 0), (10, 10));

    let ticket = session
        .begin_paste(&["image/png"])
        .expect("image payload should start a load");
    let pasted = test_pattern(12, 9);
    assert_eq!(session.finish_load(ticket, Ok(pasted.clone())), LoadOutcome::Loaded);

    assert_eq!(session.image(), Some(&pasted));
    assert_eq!(session.history_len(), 0);
    assert_eq!(session.status().map(|status| status.text.as_str()), Some("Image pasted."));
}
