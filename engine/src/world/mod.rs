//! World Module
//!
//! World-space configuration: the block placement grid.

pub mod grid;

pub use grid::{GRID_EXTENT, GridConfig, GridKey, grid_key, in_grid_range, snap_to_grid};
