use serde::Serialize;
use wineglass_geometry::Point2D;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct RenderHandle(pub usize);

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct BubbleTransform {
    pub screen_x: f64,
    pub screen_y: f64,
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
    pub opacity: f64,
}

impl BubbleTransform {
    pub fn center(&self) -> Point2D {
        Point2D::new(self.screen_x, self.screen_y)
    }

    pub fn to_local(&self, point: Point2D, natural_size: f64) -> Option<Point2D> {
        if self.scale <= 0.0 {
            return None;
        }
        let half = natural_size / 2.0;
        Some(Point2D::new(
            (point.x - self.screen_x) / self.scale + half,
            (point.y - self.screen_y) / self.scale + half,
        ))
    }
}

pub trait RenderSurface {
    fn mount(&mut self, count: usize);
    fn set_visible(&mut self, handle: RenderHandle, visible: bool);
    fn set_transform(&mut self, handle: RenderHandle, transform: &BubbleTransform);
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SurfaceNode {
    pub visible: bool,
    pub transform: BubbleTransform,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct SceneCollector {
    pub nodes: Vec<SurfaceNode>,
    pub structural_updates: usize,
    pub transform_updates: usize,
}

impl SceneCollector {
    pub fn visible_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.visible).count()
    }

    pub fn node(&self, handle: RenderHandle) -> Option<&SurfaceNode> {
        self.nodes.get(handle.0)
    }
}

impl RenderSurface for SceneCollector {
    fn mount(&mut self, count: usize) {
        self.nodes = vec![SurfaceNode::default(); count];
        self.structural_updates += 1;
    }

    fn set_visible(&mut self, handle: RenderHandle, visible: bool) {
        if let Some(node) = self.nodes.get_mut(handle.0) {
            node.visible = visible;
            self.structural_updates += 1;
        }
    }

    fn set_transform(&mut self, handle: RenderHandle, transform: &BubbleTransform) {
        if let Some(node) = self.nodes.get_mut(handle.0) {
            node.transform = *transform;
            self.transform_updates += 1;
        }
    }
}
