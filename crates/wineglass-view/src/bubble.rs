use wineglass_geometry::easing::ease_out_quad;
use wineglass_geometry::{Easing, Point2D, Point3D};

use crate::animation::{AnimatedValue, Animation};
use crate::surface::{BubbleTransform, RenderHandle, RenderSurface};

pub const HIGHLIGHT_OPACITY: f64 = 0.5;
pub const HIGHLIGHT_DURATION: f64 = 0.25;
pub const MIN_OPAQUE_RADIUS: f64 = 40.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PressState {
    #[default]
    Idle,
    Pressed,
}

#[derive(Debug)]
pub struct Bubble {
    handle: RenderHandle,
    natural_size: f64,
    visible: bool,
    opacity: f64,
    highlight: AnimatedValue,
    press: PressState,
    position: Point3D,
    transform: BubbleTransform,
}

impl Bubble {
    pub fn new(handle: RenderHandle, natural_size: f64) -> Self {
        Self {
            handle,
            natural_size,
            visible: false,
            opacity: 1.0,
            highlight: AnimatedValue::new(1.0),
            press: PressState::Idle,
            position: Point3D::ZERO,
            transform: BubbleTransform::default(),
        }
    }

    pub fn handle(&self) -> RenderHandle {
        self.handle
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    pub fn highlight_opacity(&self) -> f64 {
        self.highlight.value()
    }

    pub fn press_state(&self) -> PressState {
        self.press
    }

    pub fn is_highlighted(&self) -> bool {
        self.press == PressState::Pressed
    }

    pub fn position(&self) -> Point3D {
        self.position
    }

    pub fn transform(&self) -> &BubbleTransform {
        &self.transform
    }

    pub fn is_animating(&self) -> bool {
        self.highlight.is_animating()
    }

    pub fn set_position<S>(&mut self, position: Point3D, opacity: f64, surface: &mut S)
    where
        S: RenderSurface + ?Sized,
    {
        self.position = position;
        self.opacity = opacity;
        if position.z <= 0.0 || opacity <= 0.0 {
            if self.visible {
                self.visible = false;
                surface.set_visible(self.handle, false);
            }
            return;
        }
        if !self.visible {
            self.visible = true;
            surface.set_visible(self.handle, true);
        }
        self.refresh(surface);
    }

    pub fn refresh<S>(&mut self, surface: &mut S)
    where
        S: RenderSurface + ?Sized,
    {
        self.transform = transform_for(
            self.position,
            self.opacity * self.highlight.value(),
            self.natural_size,
        );
        surface.set_transform(self.handle, &self.transform);
    }

    pub fn hit_test(&self, local: Point2D) -> bool {
        let half = self.natural_size / 2.0;
        local.distance(Point2D::new(half, half)) < half
    }

    pub fn hit_test_screen(&self, point: Point2D) -> Option<Point2D> {
        if !self.visible {
            return None;
        }
        let local = self.transform.to_local(point, self.natural_size)?;
        self.hit_test(local).then_some(local)
    }

    pub fn touch_start(&mut self, local: Point2D) -> bool {
        if !self.visible || !self.hit_test(local) {
            return false;
        }
        if self.press == PressState::Idle {
            self.press = PressState::Pressed;
            self.fade_highlight_to(HIGHLIGHT_OPACITY);
        }
        true
    }

    pub fn touch_move(&mut self, local: Point2D) {
        if !self.hit_test(local) {
            self.end_highlight();
        }
    }

    pub fn touch_release(&mut self) -> bool {
        self.end_highlight()
    }

    pub fn touch_terminate(&mut self) {
        self.end_highlight();
    }

    pub fn tick<S>(&mut self, dt: f64, surface: &mut S) -> bool
    where
        S: RenderSurface + ?Sized,
    {
        if !self.highlight.is_animating() {
            return false;
        }
        let before = self.highlight.value();
        self.highlight.tick(dt);
        if self.visible && self.highlight.value() != before {
            self.refresh(surface);
        }
        self.highlight.is_animating()
    }

    pub fn teardown(&mut self) {
        self.highlight.stop();
        self.highlight.remove_all_listeners();
        self.press = PressState::Idle;
    }

    pub fn listener_count(&self) -> usize {
        self.highlight.listener_count()
    }

    fn end_highlight(&mut self) -> bool {
        if self.press != PressState::Pressed {
            return false;
        }
        self.press = PressState::Idle;
        self.fade_highlight_to(1.0);
        true
    }

    fn fade_highlight_to(&mut self, value: f64) {
        self.highlight.start(
            Animation::timing(value, HIGHLIGHT_DURATION).with_easing(Easing::InOutQuad),
        );
    }
}

fn transform_for(position: Point3D, base_opacity: f64, natural_size: f64) -> BubbleTransform {
    let Point3D { x, y, z } = position;
    let radius = z / 2.0;
    let opacity = if radius < MIN_OPAQUE_RADIUS {
        ease_out_quad(radius, -0.5, base_opacity + 0.5, MIN_OPAQUE_RADIUS).max(0.0)
    } else {
        base_opacity
    };
    let scale = if natural_size > 0.0 { z / natural_size } else { 0.0 };
    BubbleTransform {
        screen_x: x,
        screen_y: y,
        translate_x: x - natural_size / 2.0,
        translate_y: y - natural_size / 2.0,
        scale,
        opacity,
    }
}
