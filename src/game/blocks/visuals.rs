//! Block Visuals
//!
//! Render-adapter lookup: how a renderer should draw each block type. Kept
//! apart from the catalog so gameplay and collision never depend on
//! appearance.

use serde::Serialize;

use super::catalog::BlockType;

/// Color used to tint the block targeted by the remove tool (0xRRGGBB).
pub const REMOVAL_HIGHLIGHT_COLOR: u32 = 0xff5252;

/// Opacity of the placement ghost.
pub const PREVIEW_OPACITY: f32 = 0.45;

/// Mesh family the renderer should instantiate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MeshShape {
    Box,
    /// Box with a striped top, for start/finish pads
    Pad,
    /// Box with a glowing lava surface
    Hazard,
}

/// Drawing parameters for one block type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockVisual {
    pub shape: MeshShape,
    /// Base color as 0xRRGGBB
    pub color: u32,
    pub opacity: f32,
    pub emissive: bool,
}

/// Look up how a block type is drawn.
pub fn visual_for(block_type: BlockType) -> BlockVisual {
    let color = block_type.spec().color;
    match block_type {
        BlockType::Start => BlockVisual {
            shape: MeshShape::Pad,
            color,
            opacity: 1.0,
            emissive: false,
        },
        BlockType::Finish => BlockVisual {
            shape: MeshShape::Pad,
            color,
            opacity: 0.6,
            emissive: true,
        },
        BlockType::KillZone | BlockType::KillZoneLarge => BlockVisual {
            shape: MeshShape::Hazard,
            color,
            opacity: 0.9,
            emissive: true,
        },
        BlockType::Platform | BlockType::Floor | BlockType::Cube | BlockType::Pillar => BlockVisual {
            shape: MeshShape::Box,
            color,
            opacity: 1.0,
            emissive: false,
        },
    }
}

/// The placement ghost: the block's own look, translucent and unlit.
pub fn preview_visual(block_type: BlockType) -> BlockVisual {
    BlockVisual {
        opacity: PREVIEW_OPACITY,
        emissive: false,
        ..visual_for(block_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_volumes_are_translucent_or_glowing() {
        assert!(visual_for(BlockType::Finish).opacity < 1.0);
        assert!(visual_for(BlockType::KillZone).emissive);
        assert_eq!(visual_for(BlockType::Platform).shape, MeshShape::Box);
    }

    #[test]
    fn test_visual_color_matches_catalog() {
        for ty in BlockType::ALL {
            assert_eq!(visual_for(ty).color, ty.spec().color);
        }
    }

    #[test]
    fn test_preview_is_translucent_copy() {
        let ghost = preview_visual(BlockType::Finish);
        assert_eq!(ghost.shape, MeshShape::Pad);
        assert_eq!(ghost.opacity, PREVIEW_OPACITY);
        assert!(!ghost.emissive);
    }
}
