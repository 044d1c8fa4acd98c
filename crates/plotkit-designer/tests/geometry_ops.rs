//! End-to-end editing scenarios against the editor state.

use plotkit_designer::canvas::{EditorState, Role};
use plotkit_designer::shapes::{Line, Point, Shape, Stroke};

fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> Shape {
    Shape::Line(Line::new(Point::new(x1, y1), Point::new(x2, y2)))
}

#[test]
fn fillet_then_undo_then_redo() {
    let mut editor = EditorState::new();
    let a = editor.add_shape(line(0.0, 0.0, 100.0, 0.0), Stroke::default());
    let b = editor.add_shape(line(100.0, 0.0, 100.0, 80.0), Stroke::default());

    editor.fillet_corner(a, b, 10.0).unwrap();
    let filleted = editor.store.clone();
    assert!(editor
        .store
        .standard_records()
        .any(|r| matches!(r.shape, Shape::Arc(_))));

    assert!(editor.undo());
    assert!(editor.store.get(a).is_some());
    assert!(editor.store.get(b).is_some());
    assert!(!editor
        .store
        .standard_records()
        .any(|r| matches!(r.shape, Shape::Arc(_))));

    assert!(editor.redo());
    assert_eq!(editor.store, filleted);
}

#[test]
fn fillet_replacements_can_be_filleted_again() {
    let mut editor = EditorState::new();
    let a = editor.add_shape(line(0.0, 0.0, 100.0, 0.0), Stroke::default());
    let b = editor.add_shape(line(100.0, 0.0, 100.0, 80.0), Stroke::default());

    let diff = editor.fillet_corner(a, b, 10.0).unwrap();
    let new_lines: Vec<_> = diff
        .added
        .iter()
        .filter(|r| r.role == Role::Standard && matches!(r.shape, Shape::Line(_)))
        .map(|r| r.id)
        .collect();
    assert_eq!(new_lines.len(), 2);

    // The trimmed replacements still share a carrier intersection, so
    // the same corner accepts a second (smaller) fillet.
    editor
        .fillet_corner(new_lines[0], new_lines[1], 5.0)
        .unwrap();
}

#[test]
fn trim_then_extend_reaches_the_next_wall() {
    let mut editor = EditorState::new();
    let target = editor.add_shape(line(0.0, 50.0, 100.0, 50.0), Stroke::default());
    let boundary = editor.add_shape(line(60.0, 0.0, 60.0, 100.0), Stroke::default());
    let far_wall = editor.add_shape(line(90.0, 0.0, 90.0, 100.0), Stroke::default());

    // Keep the left part.
    let diff = editor
        .trim_line(target, boundary, Point::new(10.0, 50.0))
        .unwrap();
    let kept = diff.added_ids()[0];
    let Shape::Line(kept_line) = &editor.store.get(kept).unwrap().shape else {
        panic!("trim must yield a line");
    };
    assert!((kept_line.end.x - 60.0).abs() < 1e-9);

    // Extending the cut end runs forward to the next wall.
    let diff = editor
        .extend_line(kept, &[far_wall], Point::new(59.0, 50.0))
        .unwrap();
    let Shape::Line(extended) = &editor.store.get(diff.added_ids()[0]).unwrap().shape else {
        panic!("extend must yield a line");
    };
    assert!((extended.end.x - 90.0).abs() < 1e-9);
    assert!((extended.start.x - 0.0).abs() < 1e-9);
}

#[test]
fn trim_mid_between_two_walls() {
    let mut editor = EditorState::new();
    let t = editor.add_shape(line(0.0, 10.0, 100.0, 10.0), Stroke::default());
    let w1 = editor.add_shape(line(30.0, 0.0, 30.0, 20.0), Stroke::default());
    let w2 = editor.add_shape(line(70.0, 0.0, 70.0, 20.0), Stroke::default());

    let diff = editor.trim_mid_line(t, w1, w2).unwrap();
    let parts: Vec<Line> = diff
        .added
        .iter()
        .filter_map(|r| match &r.shape {
            Shape::Line(l) => Some(*l),
            _ => None,
        })
        .collect();
    assert_eq!(parts.len(), 2);
    // No part covers the removed middle.
    for part in &parts {
        assert!(part.distance_to_point(&Point::new(50.0, 10.0)) > 1.0);
    }
}

#[test]
fn failed_operation_does_not_pollute_history() {
    let mut editor = EditorState::new();
    let a = editor.add_shape(line(0.0, 0.0, 10.0, 0.0), Stroke::default());
    let b = editor.add_shape(line(0.0, 5.0, 10.0, 5.0), Stroke::default());
    let depth = editor.history.depth();

    // Parallel lines cannot be filleted.
    assert!(editor.fillet_corner(a, b, 1.0).is_err());
    assert_eq!(editor.history.depth(), depth);
}

#[test]
fn store_serializes_and_deserializes() {
    let mut editor = EditorState::new();
    let a = editor.add_shape(line(0.0, 0.0, 100.0, 0.0), Stroke::default());
    let b = editor.add_shape(line(100.0, 0.0, 100.0, 80.0), Stroke::default());
    editor.fillet_corner(a, b, 10.0).unwrap();

    let json = serde_json::to_string(&editor.store).unwrap();
    let restored: plotkit_designer::ShapeStore = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, editor.store);
}
