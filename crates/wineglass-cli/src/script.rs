use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use wineglass_base::LayoutConfig;
use wineglass_geometry::Point2D;
use wineglass_view::{
    BubbleTransform, EventLog, FocusState, LayoutEvent, SceneCollector, WineGlass,
};

const MAX_FRAMES: usize = 100_000;

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ScriptStep {
    pub at: f64,
    #[serde(flatten)]
    pub action: ScriptAction,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ScriptAction {
    Down {
        x: f64,
        y: f64,
    },
    Move {
        dx: f64,
        dy: f64,
    },
    /// Release velocity in units per millisecond.
    Up {
        #[serde(default)]
        vx: f64,
        #[serde(default)]
        vy: f64,
    },
    Cancel,
    Press {
        index: usize,
    },
    Focus {
        index: usize,
    },
    Blur,
    Pan {
        x: f64,
        y: f64,
        #[serde(default)]
        animate: bool,
    },
}

pub fn layout_config(path: Option<&Path>, bubble_size: Option<f64>) -> Result<LayoutConfig> {
    let config = match (path, bubble_size) {
        (Some(path), _) => LayoutConfig::load(path)
            .with_context(|| format!("failed to load layout config {}", path.display()))?,
        (None, Some(size)) => LayoutConfig::for_bubble_size(size),
        (None, None) => LayoutConfig::default(),
    };
    config.validate().context("invalid layout config")?;
    Ok(config)
}

pub fn parse_script(text: &str) -> Result<Vec<ScriptStep>> {
    let mut steps: Vec<ScriptStep> =
        serde_json::from_str(text).context("script is not a list of timed events")?;
    steps.sort_by(|a, b| a.at.total_cmp(&b.at));
    Ok(steps)
}

pub fn load_script(path: &Path) -> Result<Vec<ScriptStep>> {
    let text = std::fs::read_to_string(path)?;
    parse_script(&text)
}

#[derive(Debug, Serialize)]
pub struct BubbleReport {
    pub index: usize,
    pub item: String,
    pub position: Point2D,
    pub transform: Option<BubbleTransform>,
}

#[derive(Debug, Serialize)]
pub struct SessionReport {
    pub frames: usize,
    pub recomputes: usize,
    pub focus: FocusState,
    pub zoom_progress: f64,
    pub pan: Point2D,
    pub visible: usize,
    pub bubbles: Vec<BubbleReport>,
    pub events: Vec<LayoutEvent<String>>,
}

pub struct Session {
    layout: WineGlass<String, SceneCollector, EventLog<String>>,
    steps: Vec<ScriptStep>,
    next_step: usize,
    frames: usize,
}

impl Session {
    pub fn new(
        items: usize,
        config: LayoutConfig,
        width: f64,
        height: f64,
        steps: Vec<ScriptStep>,
    ) -> Self {
        let items = (0..items).map(|i| format!("item-{i}")).collect();
        let mut layout = WineGlass::new(
            items,
            config,
            SceneCollector::default(),
            EventLog::default(),
        );
        layout.on_layout(width, height);
        Self {
            layout,
            steps,
            next_step: 0,
            frames: 0,
        }
    }

    pub fn run(&mut self, dt: f64, frames: Option<usize>) -> usize {
        let limit = frames.unwrap_or(MAX_FRAMES);
        let start = self.frames;
        while self.frames - start < limit {
            let now = self.frames as f64 * dt;
            self.apply_due(now);
            let busy = self.layout.tick(dt);
            self.frames += 1;
            if frames.is_none() && !busy && self.next_step >= self.steps.len() {
                break;
            }
        }
        self.frames - start
    }

    pub fn report(&mut self) -> SessionReport {
        let bubbles = self
            .layout
            .bubbles()
            .iter()
            .zip(self.layout.transforms())
            .map(|(info, transform)| BubbleReport {
                index: info.index,
                item: info.data.clone(),
                position: info.position.xy(),
                transform,
            })
            .collect();
        SessionReport {
            frames: self.frames,
            recomputes: self.layout.recompute_count(),
            focus: self.layout.focus(),
            zoom_progress: self.layout.zoom_progress(),
            pan: self.layout.pan().offset,
            visible: self.layout.surface().visible_count(),
            bubbles,
            events: std::mem::take(&mut self.layout.delegate_mut().events),
        }
    }

    fn apply_due(&mut self, now: f64) {
        while let Some(step) = self.steps.get(self.next_step) {
            if step.at > now {
                break;
            }
            let action = step.action.clone();
            self.next_step += 1;
            self.apply(action);
        }
    }

    fn apply(&mut self, action: ScriptAction) {
        let layout = &mut self.layout;
        match action {
            ScriptAction::Down { x, y } => layout.pointer_down(Point2D::new(x, y)),
            ScriptAction::Move { dx, dy } => layout.pointer_move(dx, dy),
            ScriptAction::Up { vx, vy } => layout.pointer_up(vx, vy),
            ScriptAction::Cancel => layout.pointer_cancel(),
            ScriptAction::Press { index } => layout.press_bubble(index),
            ScriptAction::Focus { index } => layout.enter_focus(index),
            ScriptAction::Blur => layout.exit_focus(),
            ScriptAction::Pan { x, y, animate } => layout.set_pan(x, y, animate),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: f64 = 1.0 / 60.0;

    #[test]
    fn script_is_sorted_by_time() -> Result<()> {
        let steps = parse_script(
            r#"[
                {"at": 1.2, "event": "up"},
                {"at": 1.0, "event": "down", "x": 400, "y": 300},
                {"at": 1.1, "event": "move", "dx": 2, "dy": 0}
            ]"#,
        )?;
        let times: Vec<f64> = steps.iter().map(|step| step.at).collect();
        assert_eq!(times, vec![1.0, 1.1, 1.2]);
        assert_eq!(steps[2].action, ScriptAction::Up { vx: 0.0, vy: 0.0 });
        Ok(())
    }

    #[test]
    fn bubble_size_preset_drives_layout() -> Result<()> {
        let config = layout_config(None, Some(50.0))?;
        assert_eq!(config.bubble_size, 50.0);
        assert_eq!(config.bubble_distance, 60.0);
        assert_eq!(config.sphere_radius, 250.0);

        let mut session = Session::new(7, config, 800.0, 600.0, Vec::new());
        session.run(FRAME, None);
        let report = session.report();
        assert!((report.bubbles[1].position.length() - 60.0).abs() < 1.0e-9);
        Ok(())
    }

    #[test]
    fn non_positive_bubble_size_is_rejected() {
        assert!(layout_config(None, Some(0.0)).is_err());
        assert!(layout_config(None, Some(-4.0)).is_err());
    }

    #[test]
    fn unknown_event_is_rejected() {
        assert!(parse_script(r#"[{"at": 0, "event": "shake"}]"#).is_err());
    }

    #[test]
    fn tap_after_entrance_presses_center_bubble() -> Result<()> {
        let steps = parse_script(
            r#"[
                {"at": 2.0, "event": "down", "x": 400, "y": 300},
                {"at": 2.05, "event": "up"}
            ]"#,
        )?;
        let mut session = Session::new(7, LayoutConfig::default(), 800.0, 600.0, steps);
        session.run(FRAME, None);
        let report = session.report();

        assert_eq!(report.focus, FocusState::Focused(0));
        assert!(matches!(report.events[0], LayoutEvent::Press { index: 0 }));
        assert!(matches!(report.events[1], LayoutEvent::Focus { index: 0, .. }));
        assert_eq!(report.visible, 7);
        Ok(())
    }

    #[test]
    fn fixed_frame_count_is_honored() {
        let mut session = Session::new(3, LayoutConfig::default(), 400.0, 400.0, Vec::new());
        assert_eq!(session.run(FRAME, Some(5)), 5);
        let report = session.report();
        assert_eq!(report.frames, 5);
        assert_eq!(report.bubbles.len(), 3);
    }

    #[test]
    fn report_serializes_events() -> Result<()> {
        let steps = parse_script(r#"[{"at": 0.0, "event": "focus", "index": 1}]"#)?;
        let mut session = Session::new(3, LayoutConfig::default(), 400.0, 400.0, steps);
        session.run(FRAME, None);
        let json = serde_json::to_value(session.report())?;
        assert_eq!(json["focus"]["state"], "focused");
        assert_eq!(json["focus"]["index"], 1);
        assert_eq!(json["events"][0]["event"], "focus");
        assert_eq!(json["events"][0]["item"], "item-1");
        Ok(())
    }
}
