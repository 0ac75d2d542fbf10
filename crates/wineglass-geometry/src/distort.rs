use crate::easing::{ease_in_out_sine, ease_in_sine, ease_out_cubic, ease_out_sine};
use crate::point::{Point3D, ortho_to_polar, polar_to_ortho};

pub const FISHEYE_CENTER_SCALE: f64 = 1.5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Distorter {
    sphere_radius: f64,
    screen_width: f64,
    screen_height: f64,
    zoom_factor: f64,
}

impl Distorter {
    pub fn new(sphere_radius: f64, screen_width: f64, screen_height: f64, zoom_factor: f64) -> Self {
        Self {
            sphere_radius,
            screen_width,
            screen_height,
            zoom_factor,
        }
    }

    pub fn sphere_radius(&self) -> f64 {
        self.sphere_radius
    }

    pub fn zoom_factor(&self) -> f64 {
        self.zoom_factor
    }

    pub fn distort(&self, input: Point3D) -> Point3D {
        self.zoom(self.edge_zoom(self.fisheye(input)))
    }

    pub fn fisheye(&self, input: Point3D) -> Point3D {
        if self.sphere_radius <= 0.0 {
            return input;
        }
        let polar = ortho_to_polar(input.x, input.y);
        let progress = (polar.r / self.sphere_radius).clamp(0.0, 1.0);
        let change = 1.0 - FISHEYE_CENTER_SCALE;

        let r = polar.r * ease_out_sine(progress, FISHEYE_CENTER_SCALE, change, 1.0);
        let scale = ease_out_cubic(progress, FISHEYE_CENTER_SCALE, change, 1.0);

        let point = polar_to_ortho(r, polar.rad);
        Point3D::new(point.x, point.y, input.z * scale)
    }

    pub fn edge_zoom(&self, input: Point3D) -> Point3D {
        let buffer = input.z;
        if buffer <= 0.0 {
            return input;
        }
        let distance_x = self.screen_width / 2.0 - input.x.abs();
        let distance_y = self.screen_height / 2.0 - input.y.abs();
        let distance = distance_x.min(distance_y);
        let edge = -buffer / 4.0;

        let scale = if distance < edge {
            0.0
        } else if distance - edge < buffer {
            ease_in_out_sine(distance - edge, 0.0, 1.0, buffer)
        } else {
            1.0
        };

        let band = edge + buffer;
        let x = if distance_x < band {
            abs_minus(input.x, edge_pull(distance_x, edge, buffer))
        } else {
            input.x
        };
        let y = if distance_y < band {
            abs_minus(input.y, edge_pull(distance_y, edge, buffer))
        } else {
            input.y
        };

        Point3D::new(x, y, input.z * scale)
    }

    pub fn zoom(&self, input: Point3D) -> Point3D {
        input * self.zoom_factor
    }
}

fn edge_pull(axis_distance: f64, edge: f64, buffer: f64) -> f64 {
    let band = edge + buffer;
    ease_in_sine(axis_distance - band, 0.0, buffer / 3.0, band)
}

fn abs_minus(x: f64, delta: f64) -> f64 {
    if x > delta {
        x - delta
    } else if x < -delta {
        x + delta
    } else {
        0.0
    }
}
