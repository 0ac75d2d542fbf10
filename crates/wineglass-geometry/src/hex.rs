use std::f64::consts::PI;
use std::iter::FusedIterator;

use crate::point::{Point2D, rotate};

pub const HEX_ORIENTATION: f64 = PI / 5.0;

const SPIRAL_START_DIRECTION: usize = 4;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct HexCube {
    pub q: i32,
    pub r: i32,
    pub s: i32,
}

impl HexCube {
    pub const ORIGIN: Self = Self { q: 0, r: 0, s: 0 };

    pub const DIRECTIONS: [Self; 6] = [
        Self { q: 1, r: 0, s: -1 },
        Self { q: 1, r: -1, s: 0 },
        Self { q: 0, r: -1, s: 1 },
        Self { q: -1, r: 0, s: 1 },
        Self { q: -1, r: 1, s: 0 },
        Self { q: 0, r: 1, s: -1 },
    ];

    pub const fn direction(direction: usize) -> Self {
        Self::DIRECTIONS[direction % 6]
    }

    pub const fn scale(self, k: i32) -> Self {
        Self {
            q: self.q * k,
            r: self.r * k,
            s: self.s * k,
        }
    }

    pub fn neighbor(self, direction: usize) -> Self {
        self + Self::direction(direction)
    }

    pub fn distance(self, other: Self) -> i32 {
        let d = self - other;
        (d.q.abs() + d.r.abs() + d.s.abs()) / 2
    }

    pub fn ring(self, radius: u32) -> impl Iterator<Item = Self> {
        let mut cursor = RingCursor::new(self, radius);
        let len = if radius == 0 { 1 } else { 6 * radius as usize };
        std::iter::from_fn(move || Some(cursor.advance())).take(len)
    }

    pub fn is_valid(self) -> bool {
        self.q + self.r + self.s == 0
    }
}

impl std::ops::Add for HexCube {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self {
            q: self.q + other.q,
            r: self.r + other.r,
            s: self.s + other.s,
        }
    }
}

impl std::ops::Sub for HexCube {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        Self {
            q: self.q - other.q,
            r: self.r - other.r,
            s: self.s - other.s,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct RingCursor {
    center: HexCube,
    radius: u32,
    side: usize,
    step: u32,
    cube: HexCube,
}

impl RingCursor {
    fn new(center: HexCube, radius: u32) -> Self {
        let start = HexCube::direction(SPIRAL_START_DIRECTION).scale(radius as i32);
        Self {
            center,
            radius,
            side: 0,
            step: 0,
            cube: center + start,
        }
    }

    fn advance(&mut self) -> HexCube {
        let current = self.cube;
        if self.radius == 0 {
            return current;
        }
        self.cube = self.cube.neighbor(self.side);
        self.step += 1;
        if self.step == self.radius {
            self.step = 0;
            self.side += 1;
            if self.side == 6 {
                *self = Self::new(self.center, self.radius);
            }
        }
        current
    }

    fn at_ring_start(&self) -> bool {
        self.side == 0 && self.step == 0
    }
}

#[derive(Clone, Debug)]
pub struct HexSpiral {
    center: HexCube,
    ring: Option<RingCursor>,
}

impl HexSpiral {
    pub fn new(center: HexCube) -> Self {
        Self { center, ring: None }
    }
}

impl Default for HexSpiral {
    fn default() -> Self {
        Self::new(HexCube::ORIGIN)
    }
}

impl Iterator for HexSpiral {
    type Item = HexCube;

    fn next(&mut self) -> Option<HexCube> {
        let Some(ring) = self.ring.as_mut() else {
            self.ring = Some(RingCursor::new(self.center, 1));
            return Some(self.center);
        };
        let cube = ring.advance();
        if ring.at_ring_start() {
            *ring = RingCursor::new(self.center, ring.radius + 1);
        }
        Some(cube)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

impl FusedIterator for HexSpiral {}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HexGrid {
    size: f64,
}

impl HexGrid {
    pub fn new(size: f64) -> Self {
        Self { size }
    }

    pub fn with_spacing(spacing: f64) -> Self {
        Self::new(spacing / 3.0_f64.sqrt())
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn hex_to_pixel(&self, hex: HexCube) -> Point2D {
        let q = f64::from(hex.q);
        let r = f64::from(hex.r);
        Point2D::new(
            self.size * 3.0_f64.sqrt() * (q + r / 2.0),
            self.size * 1.5 * r,
        )
    }

    pub fn coords(&self, length: usize) -> Vec<Point2D> {
        HexSpiral::default()
            .take(length)
            .map(|hex| {
                let pixel = self.hex_to_pixel(hex);
                rotate(pixel.x, pixel.y, HEX_ORIENTATION)
            })
            .collect()
    }
}
