#![allow(clippy::float_cmp)]

use pretty_assertions::assert_eq;

use super::*;
use crate::element::{ElementProps, ShapeKind, Symbology};
use crate::error::EditorError;
use crate::validate::ValidationError;

fn store() -> EditorStore {
    EditorStore::new(CanvasConfig::default())
}

fn barcode_props(symbology: Symbology, value: &str) -> ElementProps {
    ElementProps::Barcode {
        symbology,
        value: value.to_owned(),
        show_text: true,
        text_size_pt: 10.0,
    }
}

// =============================================================
// Dpi and CanvasConfig
// =============================================================

#[test]
fn dpi_roundtrips_through_numbers() {
    assert_eq!(u32::from(Dpi::Dpi203), 203);
    assert_eq!(Dpi::try_from(300).unwrap(), Dpi::Dpi300);
    assert!(Dpi::try_from(600).is_err());
}

#[test]
fn dpi_serde_is_numeric() {
    assert_eq!(serde_json::to_string(&Dpi::Dpi203).unwrap(), "203");
    let back: Dpi = serde_json::from_str("300").unwrap();
    assert_eq!(back, Dpi::Dpi300);
}

#[test]
fn config_from_label_mm_derives_pixels() {
    // 4x6 inch shipping label.
    let config = CanvasConfig::from_label_mm(101.6, 152.4, Dpi::Dpi203);
    assert_eq!(config.width_px, 812.0);
    assert_eq!(config.height_px, 1218.0);
    assert_eq!(config.zoom_percent, 100.0);

    let config = CanvasConfig::from_label_mm(101.6, 152.4, Dpi::Dpi300);
    assert_eq!(config.width_px, 1200.0);
    assert_eq!(config.height_px, 1800.0);
}

#[test]
fn config_set_dpi_rescales_pixel_grid() {
    let mut config = CanvasConfig::from_label_mm(101.6, 152.4, Dpi::Dpi203);
    config.set_dpi(Dpi::Dpi300);
    assert_eq!(config.width_px, 1200.0);
    assert_eq!(config.height_px, 1800.0);
    assert_eq!(config.dpi, Dpi::Dpi300);
}

#[test]
fn config_serde_roundtrip() {
    let config = CanvasConfig::from_label_mm(50.0, 25.0, Dpi::Dpi300);
    let json = serde_json::to_string(&config).unwrap();
    let back: CanvasConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
}

// =============================================================
// Element creation
// =============================================================

#[test]
fn add_element_assigns_top_z_and_selects() {
    let mut s = store();
    let a = s.add_element(ElementProps::text_default(), 0.0, 0.0);
    let b = s.add_element(ElementProps::barcode_default(), 10.0, 10.0);

    assert_eq!(s.element(&a).unwrap().z_index, 1);
    assert_eq!(s.element(&b).unwrap().z_index, 2);
    assert_eq!(s.selected_id(), Some(b));
}

#[test]
fn next_z_is_one_above_the_maximum() {
    let mut s = store();
    assert_eq!(s.next_z_index(), 1);
    let id = s.add_element(ElementProps::text_default(), 0.0, 0.0);
    s.update_element(&id, &PartialElement { z_index: Some(40), ..PartialElement::default() })
        .unwrap();
    assert_eq!(s.next_z_index(), 41);
}

#[test]
fn placement_click_offsets_by_quarter_size() {
    let mut s = store();
    let prior = s.add_element(ElementProps::shape_default(ShapeKind::Rectangle), 0.0, 0.0);
    let prior_z = s.element(&prior).unwrap().z_index;

    let id = s.add_element_at_click(ElementProps::text_default(), Point::new(50.0, 50.0));
    let el = s.element(&id).unwrap();
    assert_eq!(el.x, 0.0);
    assert_eq!(el.y, 40.0);
    assert_eq!(el.width, 200.0);
    assert_eq!(el.height, 40.0);
    assert_eq!(el.z_index, prior_z + 1);
}

#[test]
fn centered_creation_centers_on_canvas_midpoint() {
    let mut s = store();
    let id = s.add_element_centered(ElementProps::barcode_default());
    let el = s.element(&id).unwrap();
    // 812x1218 canvas, 200x80 element.
    assert_eq!(el.x, 306.0);
    assert_eq!(el.y, 569.0);
}

// =============================================================
// Updates and validation
// =============================================================

#[test]
fn update_moves_and_records_history() {
    let mut s = store();
    let id = s.add_element(ElementProps::text_default(), 0.0, 0.0);
    s.update_element(&id, &PartialElement::at(30.0, 40.0)).unwrap();
    assert_eq!(s.element(&id).unwrap().x, 30.0);

    assert!(s.undo());
    assert_eq!(s.element(&id).unwrap().x, 0.0);
}

#[test]
fn update_unknown_element_fails() {
    let mut s = store();
    let err = s.update_element(&uuid::Uuid::new_v4(), &PartialElement::at(0.0, 0.0)).unwrap_err();
    assert!(matches!(err, EditorError::UnknownElement(_)));
}

#[test]
fn update_cannot_switch_kind() {
    let mut s = store();
    let id = s.add_element(ElementProps::text_default(), 0.0, 0.0);
    let err = s
        .update_element(&id, &PartialElement::with_props(ElementProps::barcode_default()))
        .unwrap_err();
    assert!(matches!(err, EditorError::KindMismatch { .. }));
}

#[test]
fn invalid_barcode_value_keeps_last_valid_props() {
    let mut s = store();
    let id = s.add_element(barcode_props(Symbology::Ean13, "400638133393"), 0.0, 0.0);
    let undo_before = s.can_undo();

    // 10 digits is not a valid EAN13.
    let err = s
        .update_element(&id, &PartialElement::with_props(barcode_props(Symbology::Ean13, "1234567890")))
        .unwrap_err();
    assert_eq!(
        err,
        EditorError::Validation(ValidationError::WrongDigitCount {
            symbology: Symbology::Ean13,
            expected: "12 or 13",
            found: 10,
        })
    );

    let ElementProps::Barcode { ref value, .. } = s.element(&id).unwrap().props else {
        panic!("expected barcode props");
    };
    assert_eq!(value, "400638133393");
    // The rejected update must not have touched history either.
    assert_eq!(s.can_undo(), undo_before);
}

#[test]
fn oversized_text_update_is_rejected() {
    let mut s = store();
    let id = s.add_element(ElementProps::text_default(), 0.0, 0.0);
    let ElementProps::Text { font_family, font_size_pt, weight, color, align, .. } =
        ElementProps::text_default()
    else {
        panic!("expected text props");
    };
    let props = ElementProps::Text {
        content: "x".repeat(300),
        font_family,
        font_size_pt,
        weight,
        color,
        align,
    };
    assert!(s.update_element(&id, &PartialElement::with_props(props)).is_err());
}

#[test]
fn transient_update_skips_history() {
    let mut s = store();
    let id = s.add_element(ElementProps::text_default(), 0.0, 0.0);
    assert!(s.undo());
    assert!(!s.can_undo());
    s.redo();

    s.update_element_transient(&id, &PartialElement::at(5.0, 5.0)).unwrap();
    s.update_element_transient(&id, &PartialElement::at(9.0, 9.0)).unwrap();
    assert_eq!(s.element(&id).unwrap().x, 9.0);
    // Only the redo checkpoint exists; the transient moves added nothing.
    assert!(s.can_undo());
    assert!(s.undo());
    assert!(!s.can_undo());
}

#[test]
fn begin_transform_makes_a_gesture_one_undo_step() {
    let mut s = store();
    let id = s.add_element(ElementProps::text_default(), 0.0, 0.0);

    s.begin_transform(&id).unwrap();
    for step in 1..=10 {
        let d = f64::from(step);
        s.update_element_transient(&id, &PartialElement::at(d, d)).unwrap();
    }
    assert_eq!(s.element(&id).unwrap().x, 10.0);

    assert!(s.undo());
    assert_eq!(s.element(&id).unwrap().x, 0.0);
}

// =============================================================
// Delete / nudge
// =============================================================

#[test]
fn delete_clears_selection_of_deleted_element() {
    let mut s = store();
    let id = s.add_element(ElementProps::text_default(), 0.0, 0.0);
    assert_eq!(s.selected_id(), Some(id));
    s.delete_element(&id).unwrap();
    assert!(s.element(&id).is_none());
    assert_eq!(s.selected_id(), None);
}

#[test]
fn delete_keeps_unrelated_selection() {
    let mut s = store();
    let a = s.add_element(ElementProps::text_default(), 0.0, 0.0);
    let b = s.add_element(ElementProps::text_default(), 10.0, 10.0);
    assert!(s.select(&b));
    s.delete_element(&a).unwrap();
    assert_eq!(s.selected_id(), Some(b));
}

#[test]
fn nudge_moves_selected_without_bounds() {
    let mut s = store();
    let id = s.add_element(ElementProps::text_default(), 0.0, 0.0);
    assert!(s.nudge_selected(-10.0, 0.0));
    assert!(s.nudge_selected(-10.0, -1.0));
    let el = s.element(&id).unwrap();
    assert_eq!((el.x, el.y), (-20.0, -1.0));
}

#[test]
fn nudge_without_selection_is_noop() {
    let mut s = store();
    let _ = s.add_element(ElementProps::text_default(), 0.0, 0.0);
    s.deselect();
    assert!(!s.nudge_selected(1.0, 0.0));
}

// =============================================================
// Selection
// =============================================================

#[test]
fn selecting_b_fully_replaces_a() {
    let mut s = store();
    let a = s.add_element(ElementProps::text_default(), 0.0, 0.0);
    let b = s.add_element(ElementProps::text_default(), 10.0, 10.0);

    assert!(s.select(&a));
    assert_eq!(s.selected_id(), Some(a));
    assert!(s.select(&b));
    assert_eq!(s.selected_id(), Some(b));
    assert_eq!(s.selected_element().unwrap().id, b);
}

#[test]
fn select_unknown_id_is_rejected() {
    let mut s = store();
    let a = s.add_element(ElementProps::text_default(), 0.0, 0.0);
    assert!(!s.select(&uuid::Uuid::new_v4()));
    assert_eq!(s.selected_id(), Some(a));
}

// =============================================================
// Clipboard
// =============================================================

#[test]
fn copy_paste_clones_with_offset_and_top_z() {
    let mut s = store();
    let id = s.add_element(ElementProps::text_default(), 30.0, 40.0);
    assert!(s.copy(&id));

    let pasted = s.paste().expect("paste");
    assert_ne!(pasted, id);
    let src = s.element(&id).unwrap().clone();
    let el = s.element(&pasted).unwrap();
    assert_eq!((el.x, el.y), (50.0, 60.0));
    assert_eq!(el.props, src.props);
    assert_eq!(el.z_index, 2);
    assert_eq!(s.selected_id(), Some(pasted));
}

#[test]
fn clipboard_is_a_value_copy_at_copy_time() {
    let mut s = store();
    let id = s.add_element(ElementProps::text_default(), 30.0, 40.0);
    s.copy(&id);
    // Mutating the original after copy must not affect the paste.
    s.update_element(&id, &PartialElement::at(500.0, 500.0)).unwrap();

    let pasted = s.paste().expect("paste");
    let el = s.element(&pasted).unwrap();
    assert_eq!((el.x, el.y), (50.0, 60.0));
}

#[test]
fn paste_with_empty_clipboard_is_noop() {
    let mut s = store();
    assert_eq!(s.paste(), None);
    assert!(!s.can_undo());
}

#[test]
fn clipboard_survives_paste_for_repeat_pasting() {
    let mut s = store();
    let id = s.add_element(ElementProps::text_default(), 0.0, 0.0);
    s.copy(&id);
    let first = s.paste().unwrap();
    let second = s.paste().unwrap();
    assert_ne!(first, second);
    // Both offset from the same copied value.
    assert_eq!(s.element(&first).unwrap().x, s.element(&second).unwrap().x);
}

#[test]
fn duplicate_leaves_clipboard_alone() {
    let mut s = store();
    let a = s.add_element(ElementProps::text_default(), 0.0, 0.0);
    let b = s.add_element(ElementProps::barcode_default(), 100.0, 100.0);
    s.copy(&a);

    let dup = s.duplicate(&b).expect("duplicate");
    assert_eq!(s.element(&dup).unwrap().props, s.element(&b).unwrap().props);
    assert_eq!((s.element(&dup).unwrap().x, s.element(&dup).unwrap().y), (120.0, 120.0));

    // Clipboard still holds element a.
    let pasted = s.paste().unwrap();
    assert_eq!(s.element(&pasted).unwrap().props, s.element(&a).unwrap().props);
}

#[test]
fn copy_unknown_id_is_rejected() {
    let mut s = store();
    assert!(!s.copy(&uuid::Uuid::new_v4()));
    assert!(!s.has_clipboard());
}

// =============================================================
// Undo / redo
// =============================================================

#[test]
fn undo_restores_exact_pre_operation_state() {
    let mut s = store();
    let id = s.add_element(ElementProps::text_default(), 0.0, 0.0);
    let before = s.elements().to_vec();

    s.update_element(&id, &PartialElement::at(77.0, 88.0)).unwrap();
    let after = s.elements().to_vec();

    assert!(s.undo());
    assert_eq!(s.elements(), &before[..]);

    assert!(s.redo());
    assert_eq!(s.elements(), &after[..]);
}

#[test]
fn undo_with_empty_stack_is_total_noop() {
    let mut s = store();
    let snapshot = s.elements().to_vec();
    assert!(!s.undo());
    assert_eq!(s.elements(), &snapshot[..]);
    assert!(!s.can_redo());
}

#[test]
fn undo_of_add_drops_element_and_selection() {
    let mut s = store();
    let id = s.add_element(ElementProps::text_default(), 0.0, 0.0);
    assert!(s.undo());
    assert!(s.element(&id).is_none());
    assert_eq!(s.selected_id(), None);
}

#[test]
fn new_mutation_clears_redo() {
    let mut s = store();
    let id = s.add_element(ElementProps::text_default(), 0.0, 0.0);
    s.update_element(&id, &PartialElement::at(10.0, 10.0)).unwrap();
    assert!(s.undo());
    assert!(s.can_redo());

    s.update_element(&id, &PartialElement::at(20.0, 20.0)).unwrap();
    assert!(!s.can_redo());
}

#[test]
fn undo_redo_chain_over_delete() {
    let mut s = store();
    let id = s.add_element(ElementProps::text_default(), 0.0, 0.0);
    s.delete_element(&id).unwrap();
    assert!(s.element(&id).is_none());

    assert!(s.undo());
    assert!(s.element(&id).is_some());

    assert!(s.redo());
    assert!(s.element(&id).is_none());
}

// =============================================================
// Z-order operations
// =============================================================

#[test]
fn bring_to_front_and_send_to_back() {
    let mut s = store();
    let a = s.add_element(ElementProps::text_default(), 0.0, 0.0);
    let b = s.add_element(ElementProps::text_default(), 0.0, 0.0);
    let c = s.add_element(ElementProps::text_default(), 0.0, 0.0);

    s.bring_to_front(&a).unwrap();
    assert!(s.element(&a).unwrap().z_index > s.element(&c).unwrap().z_index);

    s.send_to_back(&a).unwrap();
    assert!(s.element(&a).unwrap().z_index < s.element(&b).unwrap().z_index);
}

#[test]
fn move_forward_swaps_with_next_above() {
    let mut s = store();
    let a = s.add_element(ElementProps::text_default(), 0.0, 0.0);
    let b = s.add_element(ElementProps::text_default(), 0.0, 0.0);
    let c = s.add_element(ElementProps::text_default(), 0.0, 0.0);

    s.move_forward(&a).unwrap();
    let order: Vec<_> = s.sorted_elements().iter().map(|e| e.id).collect();
    assert_eq!(order, vec![b, a, c]);
}

#[test]
fn move_backward_swaps_with_next_below() {
    let mut s = store();
    let a = s.add_element(ElementProps::text_default(), 0.0, 0.0);
    let b = s.add_element(ElementProps::text_default(), 0.0, 0.0);
    let c = s.add_element(ElementProps::text_default(), 0.0, 0.0);

    s.move_backward(&c).unwrap();
    let order: Vec<_> = s.sorted_elements().iter().map(|e| e.id).collect();
    assert_eq!(order, vec![a, c, b]);
}

#[test]
fn move_forward_at_top_is_noop() {
    let mut s = store();
    let a = s.add_element(ElementProps::text_default(), 0.0, 0.0);
    let b = s.add_element(ElementProps::text_default(), 0.0, 0.0);
    s.move_forward(&b).unwrap();
    let order: Vec<_> = s.sorted_elements().iter().map(|e| e.id).collect();
    assert_eq!(order, vec![a, b]);
}

// =============================================================
// Session boundaries
// =============================================================

#[test]
fn load_design_replaces_everything_and_resets_history() {
    let mut s = store();
    let _ = s.add_element(ElementProps::text_default(), 0.0, 0.0);

    let incoming = vec![LabelElement::new(5.0, 5.0, 9, ElementProps::barcode_default())];
    let config = CanvasConfig::from_label_mm(50.0, 25.0, Dpi::Dpi300);
    s.load_design(incoming.clone(), config);

    assert_eq!(s.elements(), &incoming[..]);
    assert_eq!(*s.config(), config);
    assert_eq!(s.selected_id(), None);
    assert!(!s.can_undo());
    assert!(!s.can_redo());
}

#[test]
fn load_design_sanitizes_incoming_geometry() {
    let mut s = store();
    let mut el = LabelElement::new(0.0, 0.0, 1, ElementProps::text_default());
    el.width = 1.0;
    el.rotation = -45.0;
    s.load_design(vec![el], CanvasConfig::default());

    let loaded = &s.elements()[0];
    assert_eq!(loaded.width, 10.0);
    assert_eq!(loaded.rotation, 315.0);
}

#[test]
fn set_zoom_clamps_and_leaves_geometry_alone() {
    let mut s = store();
    let id = s.add_element(ElementProps::text_default(), 10.0, 10.0);
    s.set_zoom(1000.0);
    assert_eq!(s.config().zoom_percent, 400.0);
    s.set_zoom(1.0);
    assert_eq!(s.config().zoom_percent, 25.0);
    assert_eq!(s.element(&id).unwrap().x, 10.0);
}
