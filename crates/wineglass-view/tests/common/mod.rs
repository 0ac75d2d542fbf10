#![allow(dead_code)]

use wineglass_base::LayoutConfig;
use wineglass_view::{EventLog, SceneCollector, WineGlass};

pub const FRAME: f64 = 1.0 / 60.0;

pub type Layout = WineGlass<String, SceneCollector, EventLog<String>>;

pub fn items(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("item-{i}")).collect()
}

pub fn layout_with(count: usize, config: LayoutConfig) -> Layout {
    let mut layout = WineGlass::new(
        items(count),
        config,
        SceneCollector::default(),
        EventLog::default(),
    );
    layout.on_layout(800.0, 600.0);
    layout
}

pub fn settled(count: usize) -> Layout {
    let mut layout = layout_with(count, LayoutConfig::default());
    settle(&mut layout);
    layout
}

pub fn settle(layout: &mut Layout) {
    for _ in 0..1200 {
        if !layout.tick(FRAME) {
            return;
        }
    }
}
