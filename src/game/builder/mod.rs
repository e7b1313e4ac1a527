//! Builder Module
//!
//! Course editing: tool modes, hotkeys and the placement engine.

pub mod placement;
pub mod tools;

pub use placement::{PlacementEngine, SceneCommand};
pub use tools::{ToolMode, block_type_from_hotkey};
