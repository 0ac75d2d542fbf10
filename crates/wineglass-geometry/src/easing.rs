use std::f64::consts::{FRAC_PI_2, PI};

pub fn ease_in_sine(t: f64, b: f64, c: f64, d: f64) -> f64 {
    -c * (t / d * FRAC_PI_2).cos() + c + b
}

pub fn ease_out_sine(t: f64, b: f64, c: f64, d: f64) -> f64 {
    c * (t / d * FRAC_PI_2).sin() + b
}

pub fn ease_in_out_sine(t: f64, b: f64, c: f64, d: f64) -> f64 {
    -c / 2.0 * ((PI * t / d).cos() - 1.0) + b
}

pub fn ease_out_cubic(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d - 1.0;
    c * (t * t * t + 1.0) + b
}

pub fn ease_out_quad(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d;
    -c * t * (t - 2.0) + b
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Easing {
    #[default]
    Linear,
    OutQuad,
    InOutQuad,
}

impl Easing {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1.0e-12;

    #[test]
    fn penner_curves_hit_their_endpoints() {
        for f in [ease_in_sine, ease_out_sine, ease_in_out_sine, ease_out_cubic, ease_out_quad] {
            assert!((f(0.0, 2.0, 3.0, 4.0) - 2.0).abs() < EPS);
            assert!((f(4.0, 2.0, 3.0, 4.0) - 5.0).abs() < EPS);
        }
    }

    #[test]
    fn normalized_curves_are_monotonic() {
        for easing in [Easing::Linear, Easing::OutQuad, Easing::InOutQuad] {
            let mut last = easing.apply(0.0);
            assert_eq!(last, 0.0);
            for step in 1..=20 {
                let value = easing.apply(f64::from(step) / 20.0);
                assert!(value >= last, "{easing:?} decreased at step {step}");
                last = value;
            }
            assert!((last - 1.0).abs() < EPS);
        }
    }
}
