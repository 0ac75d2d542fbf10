use serde::Serialize;

pub trait WineGlassDelegate<T> {
    fn on_item_focus(&mut self, _item: &T, _index: usize) {}
    fn on_item_blur(&mut self) {}
    fn on_press(&mut self, _index: usize) {}
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoopDelegate;

impl<T> WineGlassDelegate<T> for NoopDelegate {}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LayoutEvent<T> {
    Focus { item: T, index: usize },
    Blur,
    Press { index: usize },
}

#[derive(Clone, Debug, Serialize)]
pub struct EventLog<T> {
    pub events: Vec<LayoutEvent<T>>,
}

impl<T> Default for EventLog<T> {
    fn default() -> Self {
        Self { events: Vec::new() }
    }
}

impl<T> EventLog<T> {
    pub fn focus_indices(&self) -> Vec<usize> {
        self.events
            .iter()
            .filter_map(|event| match event {
                LayoutEvent::Focus { index, .. } => Some(*index),
                _ => None,
            })
            .collect()
    }

    pub fn blur_count(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, LayoutEvent::Blur))
            .count()
    }

    pub fn press_indices(&self) -> Vec<usize> {
        self.events
            .iter()
            .filter_map(|event| match event {
                LayoutEvent::Press { index } => Some(*index),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl<T: Clone> WineGlassDelegate<T> for EventLog<T> {
    fn on_item_focus(&mut self, item: &T, index: usize) {
        self.events.push(LayoutEvent::Focus {
            item: item.clone(),
            index,
        });
    }

    fn on_item_blur(&mut self) {
        self.events.push(LayoutEvent::Blur);
    }

    fn on_press(&mut self, index: usize) {
        self.events.push(LayoutEvent::Press { index });
    }
}
