mod common;

use common::{FRAME, layout_with, settle, settled};
use wineglass_base::LayoutConfig;
use wineglass_geometry::Point2D;
use wineglass_view::{FocusState, PressState};

const SCREEN_CENTER: Point2D = Point2D { x: 400.0, y: 300.0 };

#[test]
fn tap_on_bubble_presses_and_focuses() {
    let mut layout = settled(7);
    layout.pointer_down(SCREEN_CENTER);
    assert_eq!(
        layout.bubble(0).expect("bubble").bubble().press_state(),
        PressState::Pressed
    );
    layout.tick(FRAME);
    assert!(layout.bubble(0).expect("bubble").bubble().highlight_opacity() < 1.0);

    layout.pointer_up(0.0, 0.0);
    assert_eq!(layout.delegate().press_indices(), vec![0]);
    assert_eq!(layout.focus(), FocusState::Focusing(0));

    settle(&mut layout);
    assert_eq!(layout.delegate().focus_indices(), vec![0]);
    assert_eq!(
        layout.bubble(0).expect("bubble").bubble().highlight_opacity(),
        1.0
    );
}

#[test]
fn small_jitter_is_still_a_tap() {
    let mut layout = settled(7);
    layout.pointer_down(SCREEN_CENTER);
    layout.pointer_move(4.0, -6.0);
    layout.pointer_up(0.0, 0.0);
    assert_eq!(layout.delegate().press_indices(), vec![0]);
    assert!(!layout.pan().dragging);
}

#[test]
fn leaving_bubble_cancels_press() {
    let mut layout = settled(7);
    let transform = layout.transforms()[0].expect("visible");
    let radius = layout.config().natural_size / 2.0 * transform.scale;
    let start = transform.center() + Point2D::new(radius * 0.93, 0.0);

    layout.pointer_down(start);
    layout.pointer_move(radius * 0.1, 0.0);
    assert!(!layout.bubble(0).expect("bubble").bubble().is_highlighted());
    layout.pointer_up(0.0, 0.0);

    assert!(layout.delegate().press_indices().is_empty());
    assert_eq!(layout.focus(), FocusState::Unfocused);
}

#[test]
fn tap_on_empty_space_blurs() {
    let mut layout = settled(7);
    layout.enter_focus(0);
    settle(&mut layout);

    layout.pointer_down(Point2D::new(5.0, 5.0));
    layout.pointer_up(0.0, 0.0);
    assert!(layout.delegate().press_indices().is_empty());
    assert_eq!(layout.delegate().blur_count(), 1);
}

#[test]
fn drag_steals_touch_and_snaps_to_nearest_bubble() {
    let mut layout = settled(7);
    layout.pointer_down(SCREEN_CENTER);
    layout.pointer_move(-130.0, 0.0);

    assert!(layout.pan().dragging);
    assert_eq!(layout.pan().offset, Point2D::new(-130.0, 0.0));
    assert_eq!(
        layout.bubble(0).expect("bubble").bubble().press_state(),
        PressState::Idle
    );

    let target = layout.find_snap_point(Point2D::new(130.0, 0.0));
    assert_ne!(target, Point2D::ZERO);
    layout.pointer_up(0.0, 0.0);
    assert!(!layout.pan().dragging);
    settle(&mut layout);

    assert!(layout.pan().offset.distance(-target) < 1.0e-2);
    assert!(layout.delegate().press_indices().is_empty());
}

#[test]
fn drag_exits_focus() {
    let mut layout = settled(7);
    layout.enter_focus(0);
    settle(&mut layout);

    layout.pointer_down(SCREEN_CENTER);
    layout.pointer_move(0.0, 40.0);
    assert_eq!(layout.focus(), FocusState::Blurring);
    assert_eq!(layout.delegate().blur_count(), 1);
}

#[test]
fn release_without_snapping_glides() {
    let config = LayoutConfig {
        snap_to_bubbles: false,
        ..LayoutConfig::default()
    };
    let mut layout = layout_with(7, config);
    settle(&mut layout);

    layout.pointer_down(Point2D::new(100.0, 100.0));
    layout.pointer_move(-50.0, 0.0);
    layout.pointer_up(0.5, 0.0);
    settle(&mut layout);

    let offset = layout.pan().offset;
    assert!(offset.x > -50.0);
    assert_eq!(offset.y, 0.0);
}

#[test]
fn cancel_drops_gesture() {
    let mut layout = settled(7);
    layout.pointer_down(SCREEN_CENTER);
    layout.pointer_cancel();
    layout.pointer_up(0.0, 0.0);
    assert!(layout.delegate().events.is_empty());
    assert!(!layout.bubble(0).expect("bubble").bubble().is_highlighted());
}

#[test]
fn drag_moves_bubbles_on_screen() {
    let mut layout = settled(7);
    let before = layout.transforms()[0].expect("visible").center();
    layout.pointer_down(SCREEN_CENTER);
    layout.pointer_move(0.0, 60.0);
    layout.tick(FRAME);
    let after = layout.transforms()[0].expect("visible").center();
    assert!(after.y > before.y);
    assert!((after.x - before.x).abs() < 1.0e-9);
}

#[test]
fn second_pointer_down_ends_first_press() {
    let mut layout = settled(7);
    let other = layout.transforms()[1].expect("visible").center();

    layout.pointer_down(SCREEN_CENTER);
    layout.tick(FRAME);
    layout.pointer_down(other);
    layout.pointer_up(0.0, 0.0);
    settle(&mut layout);

    let first = layout.bubble(0).expect("bubble").bubble();
    assert_eq!(first.press_state(), PressState::Idle);
    assert_eq!(first.highlight_opacity(), 1.0);
    assert_eq!(layout.delegate().press_indices(), vec![1]);
    assert_eq!(layout.delegate().focus_indices(), vec![1]);
}

#[test]
fn second_pointer_down_drops_unfinished_drag() {
    let mut layout = settled(7);
    layout.pointer_down(SCREEN_CENTER);
    layout.pointer_move(-40.0, 0.0);
    assert!(layout.pan().dragging);

    layout.pointer_down(SCREEN_CENTER);
    assert!(!layout.pan().dragging);
    assert!(!layout.pan_view().is_dragging());
    assert_eq!(layout.pan().offset, Point2D::new(-40.0, 0.0));
}
