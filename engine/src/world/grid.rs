//! Placement grid for course blocks.
//!
//! Blocks snap on all three axes, so stacked blocks land on whole-unit
//! heights and a block slot is identified by its integer cell.

use glam::Vec3;

/// Integer cell a position rounds to. Used as the identity of a block slot.
pub type GridKey = (i32, i32, i32);

/// Largest coordinate magnitude a block may sit at (m). Inside it every
/// position has a distinct, exact [`GridKey`].
pub const GRID_EXTENT: f32 = 1.0e6;

/// Grid configuration for block placement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridConfig {
    /// Grid cell size in world units
    pub unit: f32,
    /// Grid snapping on/off
    pub snap_enabled: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            unit: 1.0,
            snap_enabled: true,
        }
    }
}

impl GridConfig {
    pub fn new(unit: f32) -> Self {
        Self {
            unit,
            snap_enabled: true,
        }
    }

    /// Snapped position, or `pos` unchanged when snapping is off.
    pub fn snap(&self, pos: Vec3) -> Vec3 {
        if !self.snap_enabled {
            return pos;
        }
        snap_to_grid(pos, self.unit)
    }
}

/// Snap every axis of `pos` to the nearest multiple of `unit`.
///
/// A non-positive unit leaves the position untouched.
pub fn snap_to_grid(pos: Vec3, unit: f32) -> Vec3 {
    if unit <= 0.0 {
        return pos;
    }
    (pos / unit).round() * unit
}

/// Whether every axis of `pos` lies within [`GRID_EXTENT`].
pub fn in_grid_range(pos: Vec3) -> bool {
    pos.is_finite() && pos.abs().max_element() <= GRID_EXTENT
}

/// Integer cell of a position, rounding each axis to the nearest whole unit.
/// Only meaningful for positions [`in_grid_range`].
pub fn grid_key(pos: Vec3) -> GridKey {
    let cell = pos.round();
    (cell.x as i32, cell.y as i32, cell.z as i32)
}
