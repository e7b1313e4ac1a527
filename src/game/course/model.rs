//! Course Model
//!
//! In-memory course: what the builder edits and the player runs.

use glam::Vec3;

use super::template::CourseTemplate;
use crate::game::blocks::{Block, BlockType};
use crate::game::builder::ToolMode;
use crate::world::{GridKey, grid_key};

/// One block as stored in a course.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CourseBlock {
    pub block_type: BlockType,
    pub position: Vec3,
    /// Euler angles in degrees
    pub rotation: Vec3,
}

impl CourseBlock {
    pub fn new(block_type: BlockType, position: Vec3) -> Self {
        Self {
            block_type,
            position,
            rotation: Vec3::ZERO,
        }
    }

    pub fn grid_key(&self) -> GridKey {
        grid_key(self.position)
    }
}

impl From<&Block> for CourseBlock {
    fn from(block: &Block) -> Self {
        Self {
            block_type: block.block_type,
            position: block.position,
            rotation: block.rotation,
        }
    }
}

/// Builder camera pose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    /// Euler angles in degrees
    pub rotation: Vec3,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Course {
    pub name: String,
    pub template: CourseTemplate,
    pub blocks: Vec<CourseBlock>,
    pub start_position: Vec3,
    pub finish_position: Vec3,
    pub camera: CameraPose,
    pub selected_tool: ToolMode,
    pub selected_block_type: BlockType,
}

impl Course {
    /// Empty course laid out by `template`.
    pub fn from_template(template: CourseTemplate) -> Self {
        Self {
            name: template.default_name().to_string(),
            template,
            blocks: Vec::new(),
            start_position: template.start_position(),
            finish_position: template.finish_position(),
            camera: CameraPose {
                position: template.camera_position(),
                rotation: template.camera_rotation(),
            },
            selected_tool: ToolMode::Build,
            selected_block_type: BlockType::Platform,
        }
    }

    pub fn count_of(&self, block_type: BlockType) -> usize {
        self.blocks.iter().filter(|b| b.block_type == block_type).count()
    }

    pub fn first_of(&self, block_type: BlockType) -> Option<&CourseBlock> {
        self.blocks.iter().find(|b| b.block_type == block_type)
    }

    /// Re-derive start/finish markers from the placed start and finish blocks.
    pub fn sync_markers(&mut self) {
        if let Some(start) = self.first_of(BlockType::Start) {
            self.start_position = start.position;
        }
        if let Some(finish) = self.first_of(BlockType::Finish) {
            self.finish_position = finish.position;
        }
    }

    /// Feet position for a player spawning on this course: on top of the start
    /// block when there is one, otherwise the stored start marker.
    pub fn spawn_point(&self) -> Vec3 {
        match self.first_of(BlockType::Start) {
            Some(start) => {
                let top = BlockType::Start.collision_box(start.position, start.rotation).max.y;
                Vec3::new(start.position.x, top, start.position.z)
            }
            None => self.start_position,
        }
    }

    /// Keep the first block at each grid slot. Returns how many were dropped.
    pub fn dedupe(&mut self) -> usize {
        let before = self.blocks.len();
        let mut seen = std::collections::HashSet::new();
        self.blocks.retain(|b| seen.insert(b.grid_key()));
        before - self.blocks.len()
    }
}

impl Default for Course {
    fn default() -> Self {
        Self::from_template(CourseTemplate::default())
    }
}
