//! Blocks Module
//!
//! Block catalog, placed block instances, and the render-adapter lookup.

pub mod block;
pub mod catalog;
pub mod visuals;

pub use block::{Block, BlockId};
pub use catalog::{BlockSpec, BlockType, Collision, Zone};
pub use visuals::{BlockVisual, MeshShape, PREVIEW_OPACITY, REMOVAL_HIGHLIGHT_COLOR, preview_visual, visual_for};
