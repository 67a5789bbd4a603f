//! Integer block positions and floating-point world vectors.
//!
//! [`Position`] addresses a single cell of the voxel world; [`Vec3`] is a
//! continuous position used for agents and the camera. Position arithmetic
//! saturates at the `i32` range rather than wrapping.

use serde::{Deserialize, Serialize};

/// A cell in the voxel world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// East-west coordinate.
    pub x: i32,
    /// Vertical coordinate.
    pub y: i32,
    /// North-south coordinate.
    pub z: i32,
}

impl Position {
    /// The world origin `(0, 0, 0)`.
    pub const ORIGIN: Self = Self::new(0, 0, 0);

    /// Create a position from its three coordinates.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The cell directly above.
    #[must_use]
    pub const fn up(self) -> Self {
        Self::new(self.x, self.y.saturating_add(1), self.z)
    }

    /// The cell directly below.
    #[must_use]
    pub const fn down(self) -> Self {
        Self::new(self.x, self.y.saturating_sub(1), self.z)
    }

    /// Offset by the given deltas on each axis.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(
            self.x.saturating_add(dx),
            self.y.saturating_add(dy),
            self.z.saturating_add(dz),
        )
    }

    /// Whether this position lies inside the box spanned by `a` and `b`
    /// (inclusive, corners in any order).
    pub fn is_between(self, a: Self, b: Self) -> bool {
        let within = |v: i32, p: i32, q: i32| v >= p.min(q) && v <= p.max(q);
        within(self.x, a.x, b.x) && within(self.y, a.y, b.y) && within(self.z, a.z, b.z)
    }

    /// Iterate every cell of the box spanned by `a` and `b` (inclusive),
    /// x fastest, then z, then y.
    pub fn iterate_box(a: Self, b: Self) -> impl Iterator<Item = Self> {
        let (min_x, max_x) = (a.x.min(b.x), a.x.max(b.x));
        let (min_y, max_y) = (a.y.min(b.y), a.y.max(b.y));
        let (min_z, max_z) = (a.z.min(b.z), a.z.max(b.z));
        (min_y..=max_y).flat_map(move |y| {
            (min_z..=max_z).flat_map(move |z| (min_x..=max_x).map(move |x| Self::new(x, y, z)))
        })
    }

    /// Convert to a continuous vector at the cell's minimum corner.
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(f64::from(self.x), f64::from(self.y), f64::from(self.z))
    }
}

impl core::fmt::Display for Position {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// A continuous world-space vector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    /// East-west component.
    pub x: f64,
    /// Vertical component.
    pub y: f64,
    /// North-south component.
    pub z: f64,
}

impl Vec3 {
    /// Create a vector from its components.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Component-wise `self - other`.
    #[must_use]
    pub fn subtract(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}
