//! Colony border geometry.
//!
//! A colony's border is a square on the horizontal plane, one grid cell wide,
//! snapped to the grid so that every center inside the same cell produces the
//! same border. The half-cell offset follows the sign of the coordinate, with
//! zero counted as positive so a center at the origin still gets a non-zero
//! offset.

use std::num::NonZeroU32;

use colony_types::Position;
use serde::{Deserialize, Serialize};

/// Default border grid size in blocks.
pub const DEFAULT_BORDER_SIZE: NonZeroU32 = match NonZeroU32::new(64) {
    Some(size) => size,
    None => NonZeroU32::MIN,
};

/// A square region on the horizontal plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Border {
    /// Center on the x axis.
    pub center_x: f64,
    /// Center on the z axis.
    pub center_z: f64,
    /// Side length.
    pub size: f64,
}

impl Border {
    /// Minimum x edge.
    pub fn min_x(&self) -> f64 {
        self.center_x - self.size / 2.0
    }

    /// Maximum x edge.
    pub fn max_x(&self) -> f64 {
        self.center_x + self.size / 2.0
    }

    /// Minimum z edge.
    pub fn min_z(&self) -> f64 {
        self.center_z - self.size / 2.0
    }

    /// Maximum z edge.
    pub fn max_z(&self) -> f64 {
        self.center_z + self.size / 2.0
    }

    /// Whether a block column lies within the border (edges inclusive).
    pub fn contains(&self, x: i32, z: i32) -> bool {
        let (x, z) = (f64::from(x), f64::from(z));
        x >= self.min_x() && x <= self.max_x() && z >= self.min_z() && z <= self.max_z()
    }
}

/// Compute the border for a colony centered at `point`.
///
/// Returns `None` when `point` is `None`; otherwise always succeeds.
pub fn compute_border(point: Option<Position>, grid_size: NonZeroU32) -> Option<Border> {
    let point = point?;
    let grid = i64::from(grid_size.get());
    Some(Border {
        center_x: snap_axis(point.x, grid),
        center_z: snap_axis(point.z, grid),
        size: f64::from(grid_size.get()),
    })
}

/// `v - v % grid + sign(v) * grid / 2`, with `sign(0) = +1`.
fn snap_axis(value: i32, grid: i64) -> f64 {
    let value = i64::from(value);
    // grid > 0, so the remainder is always defined.
    let remainder = value.checked_rem(grid).unwrap_or(0);
    let base = value.saturating_sub(remainder);
    let sign = if value < 0 { -1.0 } else { 1.0 };
    #[allow(clippy::cast_precision_loss)]
    let snapped = base as f64 + sign * grid as f64 / 2.0;
    snapped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(size: u32) -> NonZeroU32 {
        NonZeroU32::new(size).unwrap_or(NonZeroU32::MIN)
    }

    #[test]
    fn absent_point_has_no_border() {
        assert!(compute_border(None, DEFAULT_BORDER_SIZE).is_none());
    }

    #[test]
    fn origin_gets_positive_offset_on_both_axes() {
        let border = compute_border(Some(Position::ORIGIN), grid(64));
        assert_eq!(
            border,
            Some(Border {
                center_x: 32.0,
                center_z: 32.0,
                size: 64.0,
            })
        );
    }

    #[test]
    fn negative_coordinates_snap_away_from_zero() {
        let border = compute_border(Some(Position::new(-10, 70, -130)), grid(64));
        let border = border.unwrap_or(Border {
            center_x: 0.0,
            center_z: 0.0,
            size: 0.0,
        });
        assert!((border.center_x - -32.0).abs() < f64::EPSILON);
        assert!((border.center_z - -160.0).abs() < f64::EPSILON);
    }

    #[test]
    fn centers_in_same_cell_share_a_border() {
        let a = compute_border(Some(Position::new(65, 0, 1)), grid(64));
        let b = compute_border(Some(Position::new(127, 300, 63)), grid(64));
        assert_eq!(a, b);
    }

    #[test]
    fn center_is_half_grid_off_a_grid_multiple() {
        for size in [2_u32, 16, 64, 100] {
            for x in [-1000, -65, -64, -1, 0, 1, 63, 64, 999] {
                let border = compute_border(Some(Position::new(x, 0, x)), grid(size));
                let Some(border) = border else {
                    continue;
                };
                let half = f64::from(size) / 2.0;
                let shifted = (border.center_x - half).rem_euclid(f64::from(size));
                let shifted_other = (border.center_x + half).rem_euclid(f64::from(size));
                assert!(shifted.abs() < 1e-9 || shifted_other.abs() < 1e-9);
                assert!(border.center_x.abs() >= half);
            }
        }
    }

    #[test]
    fn border_contains_its_center_column() {
        let point = Position::new(200, 64, -5);
        let border = compute_border(Some(point), grid(64));
        assert!(border.is_some_and(|b| b.contains(point.x, point.z)));
    }
}
