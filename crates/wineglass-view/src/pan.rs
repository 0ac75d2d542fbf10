use tracing::debug;
use wineglass_geometry::Point2D;

use crate::animation::{AnimatedValue, Animation, SpringConfig};

pub const DRAG_THRESHOLD: f64 = 10.0;
/// Release velocities are clamped to this many units per millisecond on each axis.
pub const MAX_RELEASE_VELOCITY: f64 = 6.0;
/// Milliseconds of travel used to project where a released drag would land.
pub const RELEASE_INERTIA: f64 = 150.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PanPhase {
    #[default]
    Idle,
    Tracking,
    Dragging,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PanRelease {
    Ignored,
    Tap,
    Snap { target: Point2D },
    Glide { velocity: Point2D },
}

#[derive(Debug, Default)]
pub struct PanView {
    x: AnimatedValue,
    y: AnimatedValue,
    base: Point2D,
    phase: PanPhase,
}

impl PanView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self) -> Point2D {
        self.base + Point2D::new(self.x.value(), self.y.value())
    }

    pub fn phase(&self) -> PanPhase {
        self.phase
    }

    pub fn is_dragging(&self) -> bool {
        self.phase == PanPhase::Dragging
    }

    pub fn is_animating(&self) -> bool {
        self.x.is_animating() || self.y.is_animating()
    }

    pub fn start(&mut self) {
        if self.phase == PanPhase::Idle {
            self.phase = PanPhase::Tracking;
        }
    }

    pub fn move_to(&mut self, dx: f64, dy: f64) -> Option<Point2D> {
        match self.phase {
            PanPhase::Idle => None,
            PanPhase::Tracking => {
                if dx.abs() <= DRAG_THRESHOLD && dy.abs() <= DRAG_THRESHOLD {
                    return None;
                }
                self.grant();
                self.drag_to(dx, dy)
            }
            PanPhase::Dragging => self.drag_to(dx, dy),
        }
    }

    pub fn release<F>(&mut self, vx: f64, vy: f64, snap: Option<F>) -> PanRelease
    where
        F: FnOnce(Point2D) -> Point2D,
    {
        match self.phase {
            PanPhase::Idle => PanRelease::Ignored,
            PanPhase::Tracking => {
                self.phase = PanPhase::Idle;
                PanRelease::Tap
            }
            PanPhase::Dragging => {
                self.flatten();
                self.phase = PanPhase::Idle;
                let vx = vx.clamp(-MAX_RELEASE_VELOCITY, MAX_RELEASE_VELOCITY);
                let vy = vy.clamp(-MAX_RELEASE_VELOCITY, MAX_RELEASE_VELOCITY);
                let offset = self.offset();
                match snap {
                    Some(resolve) => {
                        let projected = Point2D::new(
                            -offset.x - vx * RELEASE_INERTIA,
                            -offset.y - vy * RELEASE_INERTIA,
                        );
                        let target = resolve(projected);
                        debug!(?projected, ?target, "pan release snapping");
                        self.x
                            .start(Animation::spring_with(-target.x, SpringConfig::SNAP, vx));
                        self.y
                            .start(Animation::spring_with(-target.y, SpringConfig::SNAP, vy));
                        PanRelease::Snap { target }
                    }
                    None => {
                        self.x.start(Animation::decay(vx));
                        self.y.start(Animation::decay(vy));
                        PanRelease::Glide {
                            velocity: Point2D::new(vx, vy),
                        }
                    }
                }
            }
        }
    }

    pub fn cancel(&mut self) {
        if self.phase == PanPhase::Dragging {
            self.flatten();
        }
        self.phase = PanPhase::Idle;
    }

    pub fn set_pan(&mut self, x: f64, y: f64, animate: bool) {
        self.stop();
        self.flatten();
        if animate {
            self.x.start(Animation::spring_with(-x, SpringConfig::SNAP, 0.0));
            self.y.start(Animation::spring_with(-y, SpringConfig::SNAP, 0.0));
        } else {
            self.x.set_value(-x);
            self.y.set_value(-y);
        }
    }

    pub fn tick(&mut self, dt: f64) -> Option<Point2D> {
        let before = self.offset();
        self.x.tick(dt);
        self.y.tick(dt);
        let after = self.offset();
        (after != before).then_some(after)
    }

    pub fn stop(&mut self) {
        self.x.stop();
        self.y.stop();
    }

    pub fn teardown(&mut self) {
        self.stop();
        self.x.remove_all_listeners();
        self.y.remove_all_listeners();
        self.phase = PanPhase::Idle;
    }

    pub fn listener_count(&self) -> usize {
        self.x.listener_count() + self.y.listener_count()
    }

    fn grant(&mut self) {
        self.stop();
        self.base = self.offset();
        self.x.set_value(0.0);
        self.y.set_value(0.0);
        self.phase = PanPhase::Dragging;
    }

    fn drag_to(&mut self, dx: f64, dy: f64) -> Option<Point2D> {
        self.x.set_value(dx);
        self.y.set_value(dy);
        Some(self.offset())
    }

    fn flatten(&mut self) {
        let offset = self.offset();
        self.base = Point2D::ZERO;
        self.x.set_value(offset.x);
        self.y.set_value(offset.y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: f64 = 1.0 / 60.0;

    fn run(pan: &mut PanView, seconds: f64) {
        let mut elapsed = 0.0;
        while elapsed < seconds {
            pan.tick(FRAME);
            elapsed += FRAME;
        }
    }

    #[test]
    fn small_moves_stay_a_tap() {
        let mut pan = PanView::new();
        pan.start();
        assert_eq!(pan.move_to(4.0, -9.0), None);
        assert_eq!(pan.release::<fn(Point2D) -> Point2D>(0.0, 0.0, None), PanRelease::Tap);
        assert_eq!(pan.offset(), Point2D::ZERO);
    }

    #[test]
    fn drag_accumulates_on_previous_offset() {
        let mut pan = PanView::new();
        pan.set_pan(-50.0, 0.0, false);
        pan.start();
        assert_eq!(pan.move_to(20.0, 5.0), Some(Point2D::new(70.0, 5.0)));
        assert!(pan.is_dragging());
        assert_eq!(pan.move_to(30.0, 5.0), Some(Point2D::new(80.0, 5.0)));
    }

    #[test]
    fn release_without_gesture_is_ignored() {
        let mut pan = PanView::new();
        let release = pan.release(1.0, 1.0, Some(|p: Point2D| p));
        assert_eq!(release, PanRelease::Ignored);
        assert!(!pan.is_animating());
    }

    #[test]
    fn snap_release_projects_with_clamped_velocity() {
        let mut pan = PanView::new();
        pan.start();
        pan.move_to(100.0, 0.0);
        let release = pan.release(50.0, 0.0, Some(|p: Point2D| p));
        // Offset 100, velocity clamped to 6: projected center = -100 - 6 * 150.
        assert_eq!(
            release,
            PanRelease::Snap {
                target: Point2D::new(-1000.0, 0.0)
            }
        );
        run(&mut pan, 5.0);
        assert!(!pan.is_animating());
        assert_eq!(pan.offset(), Point2D::new(1000.0, 0.0));
    }

    #[test]
    fn snap_settles_without_swinging_past_target() {
        let mut pan = PanView::new();
        pan.start();
        pan.move_to(-20.0, 0.0);
        let release = pan.release(-6.0, 0.0, Some(|p: Point2D| p * 0.5));
        let PanRelease::Snap { target } = release else {
            panic!("expected a snap, got {release:?}");
        };
        let end = -target.x;
        assert!(end < -20.0);

        let mut furthest = pan.offset().x;
        for _ in 0..600 {
            pan.tick(FRAME);
            furthest = furthest.min(pan.offset().x);
        }
        assert!(!pan.is_animating());
        assert!(furthest >= end - 1.0, "swung to {furthest}, target {end}");
        assert_eq!(pan.offset().x, end);
    }

    #[test]
    fn glide_keeps_moving_in_release_direction() {
        let mut pan = PanView::new();
        pan.start();
        pan.move_to(0.0, -20.0);
        let release = pan.release::<fn(Point2D) -> Point2D>(0.0, -1.0, None);
        assert!(matches!(release, PanRelease::Glide { .. }));
        run(&mut pan, 0.5);
        assert!(pan.offset().y < -20.0);
    }

    #[test]
    fn cancel_keeps_current_offset() {
        let mut pan = PanView::new();
        pan.start();
        pan.move_to(15.0, 0.0);
        pan.cancel();
        assert_eq!(pan.phase(), PanPhase::Idle);
        assert_eq!(pan.offset(), Point2D::new(15.0, 0.0));
        assert!(!pan.is_animating());
    }
}
