use pretty_assertions::assert_eq;

use super::*;
use crate::element::ElementKind;
use crate::store::CanvasConfig;

fn store() -> EditorStore {
    EditorStore::new(CanvasConfig::default())
}

#[test]
fn controller_starts_idle() {
    let tool = ToolController::new();
    assert_eq!(tool.state(), ToolState::Idle);
    assert!(!tool.is_placing());
}

#[test]
fn text_tool_arms_placement_without_creating() {
    let mut s = store();
    let mut tool = ToolController::new();
    tool.activate_text();

    assert!(tool.is_placing());
    assert_eq!(tool.state(), ToolState::Placement(PlacementKind::Text));
    assert!(s.elements().is_empty());

    let id = tool.canvas_click(&mut s, Point::new(50.0, 50.0)).expect("placed");
    assert!(!tool.is_placing());
    let el = s.element(&id).unwrap();
    assert_eq!(el.props.kind(), ElementKind::Text);
    assert_eq!((el.x, el.y), (0.0, 40.0));
}

#[test]
fn placement_disarms_after_one_click() {
    let mut s = store();
    let mut tool = ToolController::new();
    tool.activate_text();
    tool.canvas_click(&mut s, Point::new(100.0, 100.0)).unwrap();

    assert_eq!(tool.canvas_click(&mut s, Point::new(200.0, 200.0)), None);
    assert_eq!(s.elements().len(), 1);
}

#[test]
fn cancel_leaves_placement_without_creating() {
    let mut s = store();
    let mut tool = ToolController::new();
    tool.activate_text();
    tool.cancel();

    assert!(!tool.is_placing());
    assert_eq!(tool.canvas_click(&mut s, Point::new(50.0, 50.0)), None);
    assert!(s.elements().is_empty());
}

#[test]
fn cancel_while_idle_is_harmless() {
    let mut tool = ToolController::new();
    tool.cancel();
    assert_eq!(tool.state(), ToolState::Idle);
}

#[test]
fn barcode_tool_creates_centered_immediately() {
    let mut s = store();
    let mut tool = ToolController::new();
    let id = tool.activate_barcode(&mut s);

    assert!(!tool.is_placing());
    let el = s.element(&id).unwrap();
    assert_eq!(el.props.kind(), ElementKind::Barcode);
    assert_eq!((el.x, el.y), (306.0, 569.0));
    assert_eq!(s.selected_id(), Some(id));
}

#[test]
fn shape_tool_creates_requested_kind() {
    let mut s = store();
    let mut tool = ToolController::new();
    let id = tool.activate_shape(&mut s, ShapeKind::Circle);

    let el = s.element(&id).unwrap();
    let ElementProps::Shape { kind, .. } = el.props else {
        panic!("expected shape props");
    };
    assert_eq!(kind, ShapeKind::Circle);
}

#[test]
fn image_upload_completion_creates_element_with_src() {
    let mut s = store();
    let mut tool = ToolController::new();
    let id = tool.finish_image_upload(&mut s, "https://cdn.example/logo.png".to_owned());

    let el = s.element(&id).unwrap();
    let ElementProps::Image { ref src, .. } = el.props else {
        panic!("expected image props");
    };
    assert_eq!(src, "https://cdn.example/logo.png");
}

#[test]
fn immediate_tools_do_not_disturb_an_armed_placement() {
    let mut s = store();
    let mut tool = ToolController::new();
    tool.activate_text();
    let _ = tool.activate_barcode(&mut s);

    // The pending text placement is still armed.
    assert!(tool.is_placing());
    assert!(tool.canvas_click(&mut s, Point::new(50.0, 50.0)).is_some());
}
