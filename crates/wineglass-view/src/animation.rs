use wineglass_geometry::Easing;

use crate::observer::{Listeners, Subscription};

const SPRING_REST_DISPLACEMENT: f64 = 1.0e-3;
const SPRING_REST_SPEED: f64 = 1.0e-3;
const SPRING_SUBSTEP: f64 = 1.0e-3;
const DECAY_REST_DELTA: f64 = 0.1;
pub const DEFAULT_DECELERATION: f64 = 0.998;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringConfig {
    pub tension: f64,
    pub friction: f64,
}

impl SpringConfig {
    pub const DEFAULT: Self = Self {
        tension: 40.0,
        friction: 7.0,
    };

    pub const SNAP: Self = Self {
        tension: 40.0,
        friction: 10.0,
    };

    pub fn stiffness(&self) -> f64 {
        (self.tension - 30.0) * 3.62 + 194.0
    }

    pub fn damping(&self) -> f64 {
        (self.friction - 8.0) * 3.0 + 25.0
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Animation {
    Timing {
        to: f64,
        duration: f64,
        delay: f64,
        easing: Easing,
    },
    /// Damped spring toward `to`; `velocity` is the initial speed in units per second.
    Spring {
        to: f64,
        config: SpringConfig,
        velocity: f64,
    },
    /// Exponential slow-down from `velocity` (units per millisecond).
    Decay { velocity: f64, deceleration: f64 },
}

impl Animation {
    pub fn timing(to: f64, duration: f64) -> Self {
        Self::Timing {
            to,
            duration,
            delay: 0.0,
            easing: Easing::Linear,
        }
    }

    pub fn spring(to: f64) -> Self {
        Self::spring_with(to, SpringConfig::DEFAULT, 0.0)
    }

    pub fn spring_with(to: f64, config: SpringConfig, velocity: f64) -> Self {
        Self::Spring {
            to,
            config,
            velocity,
        }
    }

    pub fn decay(velocity: f64) -> Self {
        Self::Decay {
            velocity,
            deceleration: DEFAULT_DECELERATION,
        }
    }

    pub fn with_delay(self, delay: f64) -> Self {
        match self {
            Self::Timing {
                to,
                duration,
                easing,
                ..
            } => Self::Timing {
                to,
                duration,
                delay,
                easing,
            },
            other => other,
        }
    }

    pub fn with_easing(self, easing: Easing) -> Self {
        match self {
            Self::Timing {
                to,
                duration,
                delay,
                ..
            } => Self::Timing {
                to,
                duration,
                delay,
                easing,
            },
            other => other,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AnimationId(u64);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationEnd {
    pub id: AnimationId,
    pub finished: bool,
    pub value: f64,
}

#[derive(Clone, Copy, Debug)]
struct Motion {
    id: AnimationId,
    animation: Animation,
    from: f64,
    elapsed: f64,
    position: f64,
    velocity: f64,
}

impl Motion {
    fn new(id: AnimationId, animation: Animation, from: f64) -> Self {
        let velocity = match animation {
            Animation::Spring { velocity, .. } => velocity,
            _ => 0.0,
        };
        Self {
            id,
            animation,
            from,
            elapsed: 0.0,
            position: from,
            velocity,
        }
    }

    fn step(&mut self, dt: f64) -> bool {
        let dt = dt.max(0.0);
        self.elapsed += dt;
        match self.animation {
            Animation::Timing {
                to,
                duration,
                delay,
                easing,
            } => {
                let active = self.elapsed - delay;
                if active < 0.0 {
                    return false;
                }
                let t = if duration <= 0.0 {
                    1.0
                } else {
                    (active / duration).clamp(0.0, 1.0)
                };
                if t >= 1.0 {
                    self.position = to;
                    return true;
                }
                self.position = self.from + (to - self.from) * easing.apply(t);
                false
            }
            Animation::Spring { to, config, .. } => {
                let stiffness = config.stiffness();
                let damping = config.damping();
                let steps = (dt / SPRING_SUBSTEP).ceil().max(1.0) as usize;
                let h = dt / steps as f64;
                for _ in 0..steps {
                    let force = -stiffness * (self.position - to) - damping * self.velocity;
                    self.velocity += force * h;
                    self.position += self.velocity * h;
                }
                let at_rest = (self.position - to).abs() <= SPRING_REST_DISPLACEMENT
                    && self.velocity.abs() <= SPRING_REST_SPEED;
                if at_rest || !self.position.is_finite() {
                    self.position = to;
                    self.velocity = 0.0;
                    return true;
                }
                false
            }
            Animation::Decay {
                velocity,
                deceleration,
            } => {
                let rate = 1.0 - deceleration;
                if rate <= 0.0 || velocity == 0.0 {
                    return true;
                }
                let elapsed_ms = self.elapsed * 1000.0;
                let next = self.from + velocity / rate * (1.0 - (-rate * elapsed_ms).exp());
                let delta = (next - self.position).abs();
                self.position = next;
                delta < DECAY_REST_DELTA
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct AnimatedValue {
    value: f64,
    motion: Option<Motion>,
    next_id: u64,
    listeners: Listeners<f64>,
}

impl AnimatedValue {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            ..Self::default()
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn is_animating(&self) -> bool {
        self.motion.is_some()
    }

    pub fn set_value(&mut self, value: f64) -> Option<AnimationEnd> {
        let stopped = self.stop();
        self.update(value);
        stopped
    }

    pub fn start(&mut self, animation: Animation) -> AnimationId {
        self.stop();
        let id = AnimationId(self.next_id);
        self.next_id += 1;
        self.motion = Some(Motion::new(id, animation, self.value));
        id
    }

    pub fn stop(&mut self) -> Option<AnimationEnd> {
        self.motion.take().map(|motion| AnimationEnd {
            id: motion.id,
            finished: false,
            value: self.value,
        })
    }

    pub fn tick(&mut self, dt: f64) -> Option<AnimationEnd> {
        let motion = self.motion.as_mut()?;
        let done = motion.step(dt);
        let id = motion.id;
        let position = motion.position;
        if done {
            self.motion = None;
        }
        self.update(position);
        done.then_some(AnimationEnd {
            id,
            finished: true,
            value: self.value,
        })
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&f64) + 'static) -> Subscription {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        self.listeners.unsubscribe(subscription)
    }

    pub fn remove_all_listeners(&mut self) {
        self.listeners.clear();
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn update(&mut self, value: f64) {
        if value != self.value {
            self.value = value;
            self.listeners.notify(&value);
        }
    }
}

#[cfg(test)]
pub(crate) fn run_to_end(value: &mut AnimatedValue, dt: f64, limit: f64) -> Option<AnimationEnd> {
    let mut elapsed = 0.0;
    while elapsed < limit {
        if let Some(end) = value.tick(dt) {
            return Some(end);
        }
        elapsed += dt;
    }
    None
}
