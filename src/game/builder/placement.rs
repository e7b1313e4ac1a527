//! Block Placement
//!
//! The builder state machine: tool mode × preview visibility. Pointer rays
//! move a snapped placement preview over the world; `place` and `remove`
//! edit the [`CollisionWorld`] the caller lends in.
//!
//! The engine never draws anything. Every visible change is queued as a
//! [`SceneCommand`] for the renderer to drain, and every edit raises a save
//! request for the autosave scheduler.

use glam::Vec3;
use serde::Serialize;

use super::tools::ToolMode;
use crate::camera::Ray;
use crate::game::blocks::{
    Block, BlockId, BlockType, BlockVisual, REMOVAL_HIGHLIGHT_COLOR, preview_visual, visual_for,
};
use crate::game::config::BuilderConfig;
use crate::game::error::ActionRejected;
use crate::game::physics::CollisionWorld;
use crate::world::{GridConfig, grid_key, in_grid_range};

/// Renderer instruction emitted by the builder. Spawns and previews carry
/// the block's [`BlockVisual`] so the renderer needs no catalog of its own.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SceneCommand {
    ShowPreview {
        block_type: BlockType,
        position: Vec3,
        visual: BlockVisual,
    },
    HidePreview,
    Spawn {
        id: BlockId,
        block_type: BlockType,
        position: Vec3,
        rotation: Vec3,
        visual: BlockVisual,
    },
    Despawn { id: BlockId },
    /// Restore every block to its base color
    ClearHighlights,
    Highlight { id: BlockId, color: u32 },
    /// Despawn everything (course cleared or reloaded)
    ClearAll,
}

impl SceneCommand {
    pub fn spawn(block: &Block) -> Self {
        SceneCommand::Spawn {
            id: block.id,
            block_type: block.block_type,
            position: block.position,
            rotation: block.rotation,
            visual: visual_for(block.block_type),
        }
    }

    pub fn show_preview(block_type: BlockType, position: Vec3) -> Self {
        SceneCommand::ShowPreview {
            block_type,
            position,
            visual: preview_visual(block_type),
        }
    }
}

/// Builder placement and removal.
#[derive(Debug, Clone)]
pub struct PlacementEngine {
    tool: ToolMode,
    selected: BlockType,
    preview: Option<Vec3>,
    highlighted: Option<BlockId>,
    grid: GridConfig,
    max_blocks: usize,
    removal_range: f32,
    save_requested: bool,
    commands: Vec<SceneCommand>,
}

impl PlacementEngine {
    pub fn new(config: &BuilderConfig) -> Self {
        Self {
            tool: ToolMode::Build,
            selected: BlockType::Platform,
            preview: None,
            highlighted: None,
            grid: GridConfig {
                unit: config.grid_unit,
                snap_enabled: config.snap_enabled,
            },
            max_blocks: config.max_blocks,
            removal_range: config.removal_range,
            save_requested: false,
            commands: Vec::new(),
        }
    }

    pub fn tool(&self) -> ToolMode {
        self.tool
    }

    pub fn selected_block_type(&self) -> BlockType {
        self.selected
    }

    /// Snapped placement position, if the preview is visible.
    pub fn preview(&self) -> Option<Vec3> {
        self.preview
    }

    pub fn highlighted(&self) -> Option<BlockId> {
        self.highlighted
    }

    pub fn max_blocks(&self) -> usize {
        self.max_blocks
    }

    /// Switch tools. Preview and highlight are always cleared.
    pub fn set_tool(&mut self, tool: ToolMode) {
        if tool != self.tool {
            log::debug!("Builder tool: {} -> {}", self.tool, tool);
        }
        self.tool = tool;
        self.clear_transient();
    }

    /// Change the block type `place` will use. The preview is hidden until the
    /// next pointer update recomputes it for the new height.
    pub fn select_block_type(&mut self, block_type: BlockType) {
        self.selected = block_type;
        self.hide_preview();
    }

    /// Restore the selection stored with an autosave.
    pub fn restore_selection(&mut self, tool: ToolMode, block_type: BlockType) {
        self.selected = block_type;
        self.set_tool(tool);
    }

    /// Recompute the placement preview from a pointer ray.
    ///
    /// The hit point is pushed out along the hit normal by half the selected
    /// block's height, then snapped on every axis. Returns the new preview.
    pub fn update_preview(&mut self, ray: &Ray, world: &CollisionWorld) -> Option<Vec3> {
        if self.tool != ToolMode::Build {
            self.hide_preview();
            return None;
        }

        let Some(hit) = world.raycast_first(ray.origin, ray.direction, &[]) else {
            self.hide_preview();
            return None;
        };

        let half_height = self.selected.size().y * 0.5;
        let position = self.grid.snap(hit.point() + hit.normal() * half_height);
        if !in_grid_range(position) {
            self.hide_preview();
            return None;
        }

        if self.preview != Some(position) {
            self.commands.push(SceneCommand::show_preview(self.selected, position));
        }
        self.preview = Some(position);
        Some(position)
    }

    /// Place a block of `block_type` at the current preview.
    pub fn place(&mut self, world: &mut CollisionWorld, block_type: BlockType) -> Result<BlockId, ActionRejected> {
        if self.tool != ToolMode::Build {
            return Err(ActionRejected::WrongTool {
                expected: ToolMode::Build.name(),
            });
        }
        let position = self.preview.ok_or(ActionRejected::NoPreview)?;

        if world.len() >= self.max_blocks {
            return Err(ActionRejected::BlockLimit { max: self.max_blocks });
        }
        if block_type.is_special() && world.count_of(block_type) > 0 {
            return Err(ActionRejected::DuplicateSpecial(block_type));
        }
        let key = grid_key(position);
        if world.occupant(key).is_some() {
            let (x, y, z) = key;
            return Err(ActionRejected::PositionOccupied { x, y, z });
        }

        let id = world.insert(block_type, position, Vec3::ZERO);
        if let Some(block) = world.get(id) {
            self.commands.push(SceneCommand::spawn(block));
        }
        self.save_requested = true;
        log::info!(
            "Placed {} {} at ({:.1}, {:.1}, {:.1}) [{} blocks]",
            block_type,
            id,
            position.x,
            position.y,
            position.z,
            world.len()
        );
        Ok(id)
    }

    /// Place the currently selected block type.
    pub fn place_selected(&mut self, world: &mut CollisionWorld) -> Result<BlockId, ActionRejected> {
        self.place(world, self.selected)
    }

    /// Remove the nearest block under the pointer if it is within range.
    ///
    /// Returns `Ok(None)` when nothing is in range.
    pub fn remove(&mut self, ray: &Ray, world: &mut CollisionWorld) -> Result<Option<Block>, ActionRejected> {
        if self.tool != ToolMode::Remove {
            return Err(ActionRejected::WrongTool {
                expected: ToolMode::Remove.name(),
            });
        }

        let Some(id) = self.target_in_range(ray, world) else {
            return Ok(None);
        };
        let Some(block) = world.remove(id) else {
            return Ok(None);
        };

        if self.highlighted == Some(id) {
            self.highlighted = None;
        }
        self.commands.push(SceneCommand::Despawn { id });
        self.save_requested = true;
        log::info!("Removed {} {} [{} blocks]", block.block_type, id, world.len());
        Ok(Some(block))
    }

    /// Tint the block `remove` would delete. Every other block is restored.
    pub fn highlight_for_removal(&mut self, ray: &Ray, world: &CollisionWorld) -> Option<BlockId> {
        self.commands.push(SceneCommand::ClearHighlights);
        self.highlighted = None;

        if self.tool != ToolMode::Remove {
            return None;
        }

        let id = self.target_in_range(ray, world)?;
        self.commands.push(SceneCommand::Highlight {
            id,
            color: REMOVAL_HIGHLIGHT_COLOR,
        });
        self.highlighted = Some(id);
        Some(id)
    }

    /// Drop preview and highlight, e.g. when leaving the builder or reloading.
    pub fn clear_transient(&mut self) {
        self.hide_preview();
        self.highlighted = None;
        self.commands.push(SceneCommand::ClearHighlights);
    }

    /// Take queued renderer commands.
    pub fn take_commands(&mut self) -> Vec<SceneCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Queue a renderer command from outside (course load, clear).
    pub fn push_command(&mut self, command: SceneCommand) {
        self.commands.push(command);
    }

    /// Whether an edit happened since the last call.
    pub fn take_save_request(&mut self) -> bool {
        std::mem::take(&mut self.save_requested)
    }

    fn target_in_range(&self, ray: &Ray, world: &CollisionWorld) -> Option<BlockId> {
        let hit = world.raycast_blocks(ray.origin, ray.direction, &[])?;
        if hit.distance() > self.removal_range {
            return None;
        }
        hit.block
    }

    fn hide_preview(&mut self) {
        if self.preview.take().is_some() {
            self.commands.push(SceneCommand::HidePreview);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down_at(x: f32, z: f32) -> Ray {
        Ray::new(Vec3::new(x, 20.0, z), Vec3::NEG_Y)
    }

    fn engine() -> PlacementEngine {
        PlacementEngine::new(&BuilderConfig::default())
    }

    #[test]
    fn test_preview_snaps_finish_onto_ground() {
        let world = CollisionWorld::default();
        let mut builder = engine();
        builder.select_block_type(BlockType::Finish);

        let preview = builder.update_preview(&down_at(3.4, 7.8), &world).unwrap();
        assert_eq!(preview, Vec3::new(3.0, 1.0, 8.0));
    }

    #[test]
    fn test_preview_hidden_without_hit() {
        let world = CollisionWorld::new(None);
        let mut builder = engine();
        assert!(builder.update_preview(&down_at(0.0, 0.0), &world).is_none());
        assert!(matches!(
            builder.place(&mut CollisionWorld::new(None), BlockType::Platform),
            Err(ActionRejected::NoPreview)
        ));
    }

    #[test]
    fn test_preview_stacks_on_block_top() {
        let mut world = CollisionWorld::default();
        world.insert(BlockType::Cube, Vec3::new(0.0, 0.5, 0.0), Vec3::ZERO);
        let mut builder = engine();
        builder.select_block_type(BlockType::Cube);
        // Top at 1.0 plus half a cube is 1.5, which rounds up a whole unit
        assert_eq!(
            builder.update_preview(&down_at(0.2, 0.1), &world),
            Some(Vec3::new(0.0, 2.0, 0.0))
        );
        assert!(builder.place_selected(&mut world).is_ok());
        assert_eq!(world.len(), 2);
    }

    #[test]
    fn test_wrong_tool_rejected() {
        let mut world = CollisionWorld::default();
        let mut builder = engine();
        builder.update_preview(&down_at(0.0, 0.0), &world);
        builder.set_tool(ToolMode::Camera);
        assert!(builder.preview().is_none());
        assert!(matches!(
            builder.place(&mut world, BlockType::Platform),
            Err(ActionRejected::WrongTool { expected: "build" })
        ));
        assert!(matches!(
            builder.remove(&down_at(0.0, 0.0), &mut world),
            Err(ActionRejected::WrongTool { expected: "remove" })
        ));
    }

    #[test]
    fn test_occupied_position_rejected() {
        let mut world = CollisionWorld::default();
        let mut builder = engine();
        builder.update_preview(&down_at(2.0, 2.0), &world);
        builder.place(&mut world, BlockType::Platform).unwrap();
        let result = builder.place(&mut world, BlockType::Cube);
        assert!(matches!(result, Err(ActionRejected::PositionOccupied { .. })));
        assert_eq!(world.len(), 1);
    }

    #[test]
    fn test_place_emits_spawn_and_save_request() {
        let mut world = CollisionWorld::default();
        let mut builder = engine();
        builder.update_preview(&down_at(1.0, 1.0), &world);
        builder.take_commands();

        let id = builder.place(&mut world, BlockType::Platform).unwrap();
        assert!(builder.take_save_request());
        assert!(!builder.take_save_request());
        let commands = builder.take_commands();
        assert!(matches!(commands.as_slice(), [SceneCommand::Spawn { id: spawned, .. }] if *spawned == id));
    }

    #[test]
    fn test_highlight_restores_other_blocks() {
        let mut world = CollisionWorld::default();
        let a = world.insert(BlockType::Cube, Vec3::new(0.0, 0.5, 0.0), Vec3::ZERO);
        world.insert(BlockType::Cube, Vec3::new(5.0, 0.5, 0.0), Vec3::ZERO);
        let mut builder = engine();
        builder.set_tool(ToolMode::Remove);
        builder.take_commands();

        assert_eq!(builder.highlight_for_removal(&down_at(0.0, 0.0), &world), Some(a));
        assert_eq!(
            builder.take_commands(),
            vec![
                SceneCommand::ClearHighlights,
                SceneCommand::Highlight {
                    id: a,
                    color: REMOVAL_HIGHLIGHT_COLOR
                }
            ]
        );

        assert_eq!(builder.highlight_for_removal(&down_at(9.0, 9.0), &world), None);
        assert_eq!(builder.take_commands(), vec![SceneCommand::ClearHighlights]);
        assert!(builder.highlighted().is_none());
    }

    #[test]
    fn test_tool_switch_clears_highlight() {
        let mut world = CollisionWorld::default();
        world.insert(BlockType::Cube, Vec3::new(0.0, 0.5, 0.0), Vec3::ZERO);
        let mut builder = engine();
        builder.set_tool(ToolMode::Remove);
        builder.highlight_for_removal(&down_at(0.0, 0.0), &world);
        assert!(builder.highlighted().is_some());

        builder.set_tool(ToolMode::Build);
        assert!(builder.highlighted().is_none());
    }

    #[test]
    fn test_remove_nothing_in_range_is_noop() {
        let mut world = CollisionWorld::default();
        let mut builder = engine();
        builder.set_tool(ToolMode::Remove);
        assert_eq!(builder.remove(&down_at(0.0, 0.0), &mut world).unwrap(), None);
        assert!(!builder.take_save_request());
    }
}
