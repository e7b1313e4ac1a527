//! Builder Tools
//!
//! Tool modes and the hotkeys that select tools and block types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game::blocks::BlockType;
use crate::input::KeyCode;

/// Active builder tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ToolMode {
    /// Place the selected block type at the preview
    #[default]
    Build,
    /// Delete the block under the pointer
    Remove,
    /// Orbit the camera, no world edits
    Camera,
}

impl ToolMode {
    /// Tool selected by a number key (1 build, 2 remove, 3 camera).
    pub fn from_hotkey(key: KeyCode) -> Option<ToolMode> {
        match key {
            KeyCode::Digit1 => Some(ToolMode::Build),
            KeyCode::Digit2 => Some(ToolMode::Remove),
            KeyCode::Digit3 => Some(ToolMode::Camera),
            _ => None,
        }
    }

    pub fn from_name(name: &str) -> Option<ToolMode> {
        match name {
            "build" => Some(ToolMode::Build),
            "remove" => Some(ToolMode::Remove),
            "camera" => Some(ToolMode::Camera),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ToolMode::Build => "build",
            ToolMode::Remove => "remove",
            ToolMode::Camera => "camera",
        }
    }
}

impl fmt::Display for ToolMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Block type picked with B followed by a number key.
///
/// Digit1..Digit8 walk [`BlockType::ALL`] in toolbar order.
pub fn block_type_from_hotkey(key: KeyCode) -> Option<BlockType> {
    let index = match key {
        KeyCode::Digit1 => 0,
        KeyCode::Digit2 => 1,
        KeyCode::Digit3 => 2,
        KeyCode::Digit4 => 3,
        KeyCode::Digit5 => 4,
        KeyCode::Digit6 => 5,
        KeyCode::Digit7 => 6,
        KeyCode::Digit8 => 7,
        _ => return None,
    };
    BlockType::ALL.get(index).copied()
}
