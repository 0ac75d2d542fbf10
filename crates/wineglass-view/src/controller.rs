use std::cell::Cell;
use std::rc::Rc;

use serde::Serialize;
use tracing::{debug, trace, warn};
use wineglass_base::LayoutConfig;
use wineglass_geometry::{Distorter, Easing, HexGrid, Point2D, Point3D};

use crate::animation::{AnimatedValue, AnimationEnd, AnimationId, Animation};
use crate::bubble::Bubble;
use crate::delegate::WineGlassDelegate;
use crate::frame::FrameRequester;
use crate::observer::Subscription;
use crate::pan::{PanRelease, PanView};
use crate::surface::{BubbleTransform, RenderHandle, RenderSurface};

pub const ENTRANCE_DURATION: f64 = 0.6;
pub const ENTRANCE_STAGGER: f64 = 0.1;
pub const CENTER_TOLERANCE: f64 = 10.0;
pub const FOCUS_BLUR_STRENGTH: f64 = 0.8;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "index", rename_all = "snake_case")]
pub enum FocusState {
    #[default]
    Unfocused,
    Focusing(usize),
    Focused(usize),
    Blurring,
}

impl FocusState {
    pub fn target(&self) -> Option<usize> {
        match self {
            Self::Focusing(index) | Self::Focused(index) => Some(*index),
            Self::Unfocused | Self::Blurring => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct PanState {
    pub offset: Point2D,
    pub dragging: bool,
}

#[derive(Debug)]
pub struct BubbleInfo<T> {
    pub position: Point3D,
    pub data: T,
    pub index: usize,
    bubble: Bubble,
}

impl<T> BubbleInfo<T> {
    pub fn handle(&self) -> RenderHandle {
        self.bubble.handle()
    }

    pub fn bubble(&self) -> &Bubble {
        &self.bubble
    }
}

#[derive(Debug)]
struct Entrance {
    progress: AnimatedValue,
    subscription: Option<Subscription>,
}

#[derive(Clone, Copy, Debug)]
struct Gesture {
    origin: Point2D,
    responder: Option<usize>,
}

#[derive(Clone, Copy, Debug)]
enum ZoomMotion {
    In { id: AnimationId, target: usize },
    Out { id: AnimationId },
}

pub struct WineGlass<T, S, D> {
    config: LayoutConfig,
    pending_items: Vec<T>,
    bubbles: Vec<BubbleInfo<T>>,
    entrances: Vec<Entrance>,
    laid_out: bool,
    torn_down: bool,
    width: f64,
    height: f64,
    distorter: Distorter,
    pan: PanState,
    pan_view: PanView,
    focus: FocusState,
    zoom: AnimatedValue,
    zoom_motion: Option<ZoomMotion>,
    zoom_progress: Rc<Cell<f64>>,
    zoom_subscription: Option<Subscription>,
    frames: FrameRequester,
    gesture: Option<Gesture>,
    recompute_count: usize,
    surface: S,
    delegate: D,
}

impl<T, S, D> WineGlass<T, S, D>
where
    S: RenderSurface,
    D: WineGlassDelegate<T>,
{
    pub fn new(items: Vec<T>, config: LayoutConfig, surface: S, delegate: D) -> Self {
        let frames = FrameRequester::new();
        let zoom_progress = Rc::new(Cell::new(0.0));
        let mut zoom = AnimatedValue::new(0.0);
        let zoom_subscription = {
            let progress = Rc::clone(&zoom_progress);
            let frames = frames.clone();
            zoom.subscribe(move |&value| {
                progress.set(value.clamp(0.0, 1.0));
                frames.request();
            })
        };
        Self {
            config,
            pending_items: items,
            bubbles: Vec::new(),
            entrances: Vec::new(),
            laid_out: false,
            torn_down: false,
            width: 0.0,
            height: 0.0,
            distorter: Distorter::new(config.sphere_radius, 0.0, 0.0, 1.0),
            pan: PanState::default(),
            pan_view: PanView::new(),
            focus: FocusState::Unfocused,
            zoom,
            zoom_motion: None,
            zoom_progress,
            zoom_subscription: Some(zoom_subscription),
            frames,
            gesture: None,
            recompute_count: 0,
            surface,
            delegate,
        }
    }

    pub fn on_layout(&mut self, width: f64, height: f64) {
        if self.torn_down {
            return;
        }
        self.width = width;
        self.height = height;
        self.distorter = Distorter::new(self.config.sphere_radius, width, height, 1.0);
        self.request_update();
        if self.laid_out {
            return;
        }
        self.laid_out = true;
        self.layout_bubbles();
        self.start_entrance();
        if self.config.initial_focus && !self.bubbles.is_empty() {
            self.enter_focus(0);
        }
    }

    pub fn request_update(&mut self) -> bool {
        if self.torn_down {
            return false;
        }
        self.frames.request()
    }

    pub fn tick(&mut self, dt: f64) -> bool {
        if self.torn_down {
            return false;
        }
        if let Some(offset) = self.pan_view.tick(dt) {
            self.on_pan(offset, self.pan_view.is_dragging());
        }
        if let Some(end) = self.zoom.tick(dt) {
            self.on_zoom_end(end);
        }
        self.tick_entrance(dt);
        for info in &mut self.bubbles {
            info.bubble.tick(dt, &mut self.surface);
        }
        if self.frames.take() {
            self.recompute();
        }
        self.needs_frame()
    }

    pub fn needs_frame(&self) -> bool {
        if self.torn_down {
            return false;
        }
        self.frames.is_pending()
            || self.pan_view.is_animating()
            || self.zoom.is_animating()
            || self.entrances.iter().any(|e| e.progress.is_animating())
            || self.bubbles.iter().any(|info| info.bubble.is_animating())
    }

    pub fn on_pan(&mut self, offset: Point2D, dragging: bool) {
        self.pan = PanState { offset, dragging };
        if dragging {
            self.exit_focus();
        }
        self.request_update();
    }

    pub fn set_pan(&mut self, x: f64, y: f64, animate: bool) {
        if self.torn_down {
            return;
        }
        self.pan_view.set_pan(x, y, animate);
        if !animate {
            self.on_pan(self.pan_view.offset(), false);
        }
    }

    pub fn enter_focus(&mut self, index: usize) {
        if self.torn_down {
            return;
        }
        if index >= self.bubbles.len() {
            warn!(index, count = self.bubbles.len(), "ignoring focus on unknown bubble");
            return;
        }
        match self.focus {
            FocusState::Unfocused | FocusState::Blurring => {
                let id = self.zoom.start(Animation::spring(1.0));
                self.zoom_motion = Some(ZoomMotion::In { id, target: index });
                self.focus = FocusState::Focusing(index);
                debug!(index, "focusing bubble");
            }
            FocusState::Focusing(current) if current != index => {
                self.focus = FocusState::Focusing(index);
                self.notify_focus(index);
            }
            FocusState::Focused(current) if current != index => {
                self.focus = FocusState::Focused(index);
                self.notify_focus(index);
            }
            FocusState::Focusing(_) | FocusState::Focused(_) => {}
        }
    }

    pub fn exit_focus(&mut self) {
        if self.torn_down || self.focus.target().is_none() {
            return;
        }
        let id = self.zoom.start(Animation::spring(0.0));
        self.zoom_motion = Some(ZoomMotion::Out { id });
        self.focus = FocusState::Blurring;
        debug!("leaving focus");
        self.delegate.on_item_blur();
    }

    pub fn find_nearest_bubble(&self, point: Point2D) -> Option<usize> {
        nearest_bubble(&self.bubbles, point)
    }

    pub fn find_snap_point(&self, point: Point2D) -> Point2D {
        snap_point(&self.bubbles, point)
    }

    pub fn press_bubble(&mut self, index: usize) {
        if self.torn_down {
            return;
        }
        let Some(info) = self.bubbles.get(index) else {
            warn!(index, "ignoring press on unknown bubble");
            return;
        };
        let position = info.position.xy();
        self.delegate.on_press(index);
        if (-self.pan.offset).distance(position) > CENTER_TOLERANCE {
            debug!(index, ?position, "centering pressed bubble");
            self.pan_view.set_pan(position.x, position.y, true);
        }
        self.enter_focus(index);
    }

    pub fn pointer_down(&mut self, point: Point2D) {
        if self.torn_down {
            return;
        }
        if let Some(previous) = self.gesture.take() {
            if let Some(index) = previous.responder {
                self.bubbles[index].bubble.touch_terminate();
            }
            self.pan_view.cancel();
            self.pan.dragging = false;
        }
        let hit = self.bubbles.iter().rev().find_map(|info| {
            info.bubble
                .hit_test_screen(point)
                .map(|local| (info.index, local))
        });
        let responder = match hit {
            Some((index, local)) if self.bubbles[index].bubble.touch_start(local) => Some(index),
            _ => None,
        };
        self.pan_view.start();
        self.gesture = Some(Gesture {
            origin: point,
            responder,
        });
    }

    /// `dx`/`dy` are the cumulative displacement since [`WineGlass::pointer_down`].
    pub fn pointer_move(&mut self, dx: f64, dy: f64) {
        let Some(gesture) = self.gesture else {
            return;
        };
        if let Some(offset) = self.pan_view.move_to(dx, dy) {
            if let Some(index) = gesture.responder {
                self.bubbles[index].bubble.touch_terminate();
                self.gesture = Some(Gesture {
                    responder: None,
                    ..gesture
                });
            }
            self.on_pan(offset, true);
            return;
        }
        let Some(index) = gesture.responder else {
            return;
        };
        let point = gesture.origin + Point2D::new(dx, dy);
        let bubble = &mut self.bubbles[index].bubble;
        match bubble.transform().to_local(point, self.config.natural_size) {
            Some(local) => bubble.touch_move(local),
            None => bubble.touch_terminate(),
        }
    }

    /// `vx`/`vy` are the release velocity in units per millisecond.
    pub fn pointer_up(&mut self, vx: f64, vy: f64) {
        let Some(gesture) = self.gesture.take() else {
            return;
        };
        let release = if self.config.snap_to_bubbles {
            let bubbles = &self.bubbles;
            self.pan_view
                .release(vx, vy, Some(|point| snap_point(bubbles, point)))
        } else {
            self.pan_view
                .release::<fn(Point2D) -> Point2D>(vx, vy, None)
        };
        match release {
            PanRelease::Snap { .. } | PanRelease::Glide { .. } => {
                self.pan.dragging = false;
            }
            PanRelease::Tap | PanRelease::Ignored => match gesture.responder {
                Some(index) => {
                    if self.bubbles[index].bubble.touch_release() {
                        self.press_bubble(index);
                    }
                }
                None => self.exit_focus(),
            },
        }
    }

    pub fn pointer_cancel(&mut self) {
        let Some(gesture) = self.gesture.take() else {
            return;
        };
        if let Some(index) = gesture.responder {
            self.bubbles[index].bubble.touch_terminate();
        }
        self.pan_view.cancel();
        self.pan.dragging = false;
    }

    fn layout_bubbles(&mut self) {
        let items = std::mem::take(&mut self.pending_items);
        let coords = HexGrid::with_spacing(self.config.bubble_distance).coords(items.len());
        self.bubbles = items
            .into_iter()
            .zip(coords)
            .enumerate()
            .map(|(index, (data, coord))| BubbleInfo {
                position: coord.with_z(0.0),
                data,
                index,
                bubble: Bubble::new(RenderHandle(index), self.config.natural_size),
            })
            .collect();
        self.surface.mount(self.bubbles.len());
        debug!(
            count = self.bubbles.len(),
            width = self.width,
            height = self.height,
            "bubbles laid out"
        );
    }

    fn start_entrance(&mut self) {
        self.entrances = (0..self.bubbles.len())
            .map(|index| {
                let mut progress = AnimatedValue::new(0.0);
                let frames = self.frames.clone();
                let subscription = progress.subscribe(move |_| {
                    frames.request();
                });
                progress.start(
                    Animation::timing(1.0, ENTRANCE_DURATION)
                        .with_easing(Easing::OutQuad)
                        .with_delay(ENTRANCE_STAGGER * index as f64),
                );
                Entrance {
                    progress,
                    subscription: Some(subscription),
                }
            })
            .collect();
    }

    fn tick_entrance(&mut self, dt: f64) {
        let size = self.config.bubble_size;
        for (info, entrance) in self.bubbles.iter_mut().zip(&mut self.entrances) {
            if !entrance.progress.is_animating() {
                continue;
            }
            let end = entrance.progress.tick(dt);
            info.position.z = entrance.progress.value() * size;
            if end.is_some() {
                if let Some(subscription) = entrance.subscription.take() {
                    entrance.progress.unsubscribe(subscription);
                }
            }
        }
    }

    fn on_zoom_end(&mut self, end: AnimationEnd) {
        if !end.finished {
            return;
        }
        match self.zoom_motion {
            Some(ZoomMotion::In { id, target }) if id == end.id => {
                self.zoom_motion = None;
                if let FocusState::Focusing(current) = self.focus {
                    self.focus = FocusState::Focused(current);
                    if current == target {
                        self.notify_focus(current);
                    }
                }
            }
            Some(ZoomMotion::Out { id }) if id == end.id => {
                self.zoom_motion = None;
                if self.focus == FocusState::Blurring {
                    self.focus = FocusState::Unfocused;
                }
            }
            _ => {}
        }
    }

    fn notify_focus(&mut self, index: usize) {
        if let Some(info) = self.bubbles.get(index) {
            debug!(index, "bubble focused");
            self.delegate.on_item_focus(&info.data, index);
        }
    }

    fn recompute(&mut self) {
        let progress = self.zoom_progress.get();
        let zoom = 1.0 + progress * (self.config.focus_zoom_scale - 1.0);
        self.distorter = Distorter::new(
            self.config.sphere_radius * zoom,
            self.width,
            self.height,
            zoom,
        );
        let center = Point2D::new(self.width / 2.0, self.height / 2.0);
        let spacing = self.config.bubble_distance;
        for info in &mut self.bubbles {
            let displayed = self.distorter.distort(info.position.translate(self.pan.offset));
            let strength = if spacing > 0.0 {
                (displayed.xy().length() / spacing).min(1.0)
            } else {
                1.0
            };
            let opacity = 1.0 - progress * strength * FOCUS_BLUR_STRENGTH;
            info.bubble.set_position(
                displayed.translate(center),
                opacity,
                &mut self.surface,
            );
        }
        self.recompute_count += 1;
        trace!(
            frame = self.recompute_count,
            zoom,
            pan_x = self.pan.offset.x,
            pan_y = self.pan.offset.y,
            "recomputed bubble transforms"
        );
    }
}

impl<T, S, D> WineGlass<T, S, D> {
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        if let Some(subscription) = self.zoom_subscription.take() {
            self.zoom.unsubscribe(subscription);
        }
        self.zoom.stop();
        self.zoom.remove_all_listeners();
        self.zoom_motion = None;
        for entrance in &mut self.entrances {
            entrance.progress.stop();
            entrance.progress.remove_all_listeners();
            entrance.subscription = None;
        }
        for info in &mut self.bubbles {
            info.bubble.teardown();
        }
        self.pan_view.teardown();
        self.frames.cancel();
        self.gesture = None;
        debug!(count = self.bubbles.len(), "layout torn down");
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn viewport(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn distorter(&self) -> &Distorter {
        &self.distorter
    }

    pub fn bubbles(&self) -> &[BubbleInfo<T>] {
        &self.bubbles
    }

    pub fn bubble(&self, index: usize) -> Option<&BubbleInfo<T>> {
        self.bubbles.get(index)
    }

    pub fn len(&self) -> usize {
        self.bubbles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bubbles.is_empty()
    }

    pub fn focus(&self) -> FocusState {
        self.focus
    }

    pub fn zoom_progress(&self) -> f64 {
        self.zoom_progress.get()
    }

    pub fn pan(&self) -> PanState {
        self.pan
    }

    pub fn pan_view(&self) -> &PanView {
        &self.pan_view
    }

    pub fn recompute_count(&self) -> usize {
        self.recompute_count
    }

    pub fn listener_count(&self) -> usize {
        self.zoom.listener_count()
            + self
                .entrances
                .iter()
                .map(|e| e.progress.listener_count())
                .sum::<usize>()
            + self
                .bubbles
                .iter()
                .map(|info| info.bubble.listener_count())
                .sum::<usize>()
            + self.pan_view.listener_count()
    }

    pub fn transforms(&self) -> Vec<Option<BubbleTransform>> {
        self.bubbles
            .iter()
            .map(|info| {
                info.bubble
                    .is_visible()
                    .then(|| *info.bubble.transform())
            })
            .collect()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn delegate(&self) -> &D {
        &self.delegate
    }

    pub fn delegate_mut(&mut self) -> &mut D {
        &mut self.delegate
    }
}

impl<T, S, D> Drop for WineGlass<T, S, D> {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn nearest_bubble<T>(bubbles: &[BubbleInfo<T>], point: Point2D) -> Option<usize> {
    let mut nearest: Option<(usize, f64)> = None;
    for info in bubbles {
        let distance = point.distance(info.position.xy());
        match nearest {
            Some((_, best)) if distance >= best => {}
            _ => nearest = Some((info.index, distance)),
        }
    }
    nearest.map(|(index, _)| index)
}

fn snap_point<T>(bubbles: &[BubbleInfo<T>], point: Point2D) -> Point2D {
    nearest_bubble(bubbles, point)
        .and_then(|index| bubbles.get(index))
        .map_or(Point2D::ZERO, |info| info.position.xy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delegate::EventLog;
    use crate::surface::SceneCollector;

    type Layout = WineGlass<&'static str, SceneCollector, EventLog<&'static str>>;

    fn line_of_three() -> Layout {
        let mut layout = WineGlass::new(
            vec!["a", "b", "c"],
            LayoutConfig::default(),
            SceneCollector::default(),
            EventLog::default(),
        );
        layout.on_layout(800.0, 600.0);
        for (info, x) in layout.bubbles.iter_mut().zip([0.0, 100.0, 200.0]) {
            info.position = Point3D::new(x, 0.0, info.position.z);
        }
        layout
    }

    #[test]
    fn nearest_bubble_is_closest_logical_position() {
        let layout = line_of_three();
        assert_eq!(layout.find_nearest_bubble(Point2D::new(90.0, 0.0)), Some(1));
        assert_eq!(
            layout.find_snap_point(Point2D::new(90.0, 0.0)),
            Point2D::new(100.0, 0.0)
        );
    }

    #[test]
    fn nearest_bubble_ties_go_to_first() {
        let layout = line_of_three();
        assert_eq!(layout.find_nearest_bubble(Point2D::new(50.0, 0.0)), Some(0));
    }

    #[test]
    fn snap_point_without_bubbles_is_origin() {
        let layout: Layout = WineGlass::new(
            Vec::new(),
            LayoutConfig::default(),
            SceneCollector::default(),
            EventLog::default(),
        );
        assert_eq!(layout.find_nearest_bubble(Point2D::new(5.0, 5.0)), None);
        assert_eq!(layout.find_snap_point(Point2D::new(5.0, 5.0)), Point2D::ZERO);
    }

    #[test]
    fn focus_state_reports_target() {
        assert_eq!(FocusState::Focusing(3).target(), Some(3));
        assert_eq!(FocusState::Focused(1).target(), Some(1));
        assert_eq!(FocusState::Blurring.target(), None);
        assert_eq!(FocusState::Unfocused.target(), None);
    }
}
