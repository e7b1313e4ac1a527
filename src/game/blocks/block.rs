//! Placed Blocks

use std::fmt;

use glam::Vec3;
use serde::Serialize;

use super::catalog::{BlockSpec, BlockType};
use crate::game::error::CourseResult;
use crate::physics::Aabb;
use crate::world::{GridKey, grid_key};

/// Handle of a placed block. Doubles as the renderer's instance id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct BlockId(pub u32);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A block placed in the course.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub id: BlockId,
    pub block_type: BlockType,
    /// Center of the block
    pub position: Vec3,
    /// Euler angles in degrees
    pub rotation: Vec3,
}

impl Block {
    pub fn new(id: BlockId, block_type: BlockType, position: Vec3, rotation: Vec3) -> Self {
        Self {
            id,
            block_type,
            position,
            rotation,
        }
    }

    /// Build a block from a document tag. Fails for tags outside the catalog.
    pub fn from_tag(id: BlockId, tag: &str, position: Vec3, rotation: Vec3) -> CourseResult<Self> {
        let block_type = BlockType::from_tag(tag)?;
        Ok(Self::new(id, block_type, position, rotation))
    }

    pub fn spec(&self) -> &'static BlockSpec {
        self.block_type.spec()
    }

    /// Full extents after yaw.
    pub fn dimensions(&self) -> Vec3 {
        self.aabb().size()
    }

    pub fn aabb(&self) -> Aabb {
        self.block_type.collision_box(self.position, self.rotation)
    }

    pub fn grid_key(&self) -> GridKey {
        grid_key(self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::error::CourseError;

    #[test]
    fn test_from_tag() {
        let block = Block::from_tag(BlockId(4), "killZone", Vec3::new(1.0, 0.25, 2.0), Vec3::ZERO).unwrap();
        assert_eq!(block.block_type, BlockType::KillZone);
        assert_eq!(block.dimensions(), Vec3::new(2.0, 0.5, 2.0));
        assert_eq!(block.grid_key(), (1, 0, 2));
    }

    #[test]
    fn test_unknown_tag_rejected() {
        let result = Block::from_tag(BlockId(1), "spring", Vec3::ZERO, Vec3::ZERO);
        assert!(matches!(result, Err(CourseError::UnknownBlockType(_))));
    }
}
