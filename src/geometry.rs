//! World-space geometry shared by every system.
//!
//! Positions are `glam::Vec2` in world units (the same scale as the
//! viewport, one unit per pixel of the reference display).  The y axis
//! points down, matching screen space.

use glam::Vec2;

/// Axis-aligned rectangle stored by centre and full size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub center: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self { center, size }
    }

    pub fn from_top_left(top_left: Vec2, size: Vec2) -> Self {
        Self {
            center: top_left + size / 2.0,
            size,
        }
    }

    pub fn min(&self) -> Vec2 {
        self.center - self.size / 2.0
    }

    pub fn max(&self) -> Vec2 {
        self.center + self.size / 2.0
    }

    pub fn width(&self) -> f32 {
        self.size.x
    }

    pub fn height(&self) -> f32 {
        self.size.y
    }

    /// Strict overlap: rectangles that only share an edge do not collide.
    pub fn overlaps(&self, other: &Rect) -> bool {
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        a_min.x < b_max.x && b_min.x < a_max.x && a_min.y < b_max.y && b_min.y < a_max.y
    }

    pub fn translated(&self, offset: Vec2) -> Rect {
        Rect {
            center: self.center + offset,
            size: self.size,
        }
    }
}

/// Size of the axis-aligned box enclosing a `size` box rotated by `degrees`.
pub fn rotated_bounds(size: Vec2, degrees: f32) -> Vec2 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Vec2::new(
        (size.x * cos).abs() + (size.y * sin).abs(),
        (size.x * sin).abs() + (size.y * cos).abs(),
    )
}

/// Unit vector pointing from `org` towards `dst`.
///
/// `org` and `dst` must not coincide; callers keep a minimum separation
/// (see `GameConfig::pursuit_stop_distance`) before asking for a heading.
pub fn orientation(org: Vec2, dst: Vec2) -> Vec2 {
    let diff = dst - org;
    let norm = diff.length();
    debug_assert!(norm > 0.0, "orientation of coincident points");
    diff / norm
}

pub fn distance(org: Vec2, dst: Vec2) -> f32 {
    org.distance(dst)
}

/// One of the eight headings reachable with W/A/S/D.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction8 {
    Right,
    UpRight,
    Up,
    UpLeft,
    Left,
    DownLeft,
    Down,
    DownRight,
}

impl Direction8 {
    pub const ALL: [Direction8; 8] = [
        Direction8::Right,
        Direction8::UpRight,
        Direction8::Up,
        Direction8::UpLeft,
        Direction8::Left,
        Direction8::DownLeft,
        Direction8::Down,
        Direction8::DownRight,
    ];

    /// Classify a summed key vector.  `None` for the zero vector.
    pub fn from_steps(dx: i32, dy: i32) -> Option<Self> {
        match (dx.signum(), dy.signum()) {
            (1, 0) => Some(Direction8::Right),
            (1, -1) => Some(Direction8::UpRight),
            (0, -1) => Some(Direction8::Up),
            (-1, -1) => Some(Direction8::UpLeft),
            (-1, 0) => Some(Direction8::Left),
            (-1, 1) => Some(Direction8::DownLeft),
            (0, 1) => Some(Direction8::Down),
            (1, 1) => Some(Direction8::DownRight),
            _ => None,
        }
    }

    /// Unnormalised step, each component in {-1, 0, 1}.
    pub fn step(self) -> Vec2 {
        match self {
            Direction8::Right => Vec2::new(1.0, 0.0),
            Direction8::UpRight => Vec2::new(1.0, -1.0),
            Direction8::Up => Vec2::new(0.0, -1.0),
            Direction8::UpLeft => Vec2::new(-1.0, -1.0),
            Direction8::Left => Vec2::new(-1.0, 0.0),
            Direction8::DownLeft => Vec2::new(-1.0, 1.0),
            Direction8::Down => Vec2::new(0.0, 1.0),
            Direction8::DownRight => Vec2::new(1.0, 1.0),
        }
    }

    pub fn unit(self) -> Vec2 {
        self.step().normalize()
    }

    pub fn index(self) -> usize {
        match self {
            Direction8::Right => 0,
            Direction8::UpRight => 1,
            Direction8::Up => 2,
            Direction8::UpLeft => 3,
            Direction8::Left => 4,
            Direction8::DownLeft => 5,
            Direction8::Down => 6,
            Direction8::DownRight => 7,
        }
    }
}
