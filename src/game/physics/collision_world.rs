//! Collision World
//!
//! The placed blocks plus an optional infinite ground plane, queryable by ray
//! and by box overlap. Every block collides through the box derived from its
//! catalog size and yaw; render meshes are never consulted.
//!
//! Trigger volumes (finish, kill zones) are ordinary entries here. Callers
//! choose what a query sees through the `exclude` list, usually
//! [`BlockType::trigger_types`] for solid queries and
//! [`BlockType::solid_types`] for zone queries.

use glam::Vec3;

use crate::game::blocks::{Block, BlockId, BlockType, Zone};
use crate::physics::{Aabb, RayHit, ray_aabb_hit, ray_ground_hit};
use crate::world::GridKey;

/// A ray hit against the world. `block` is `None` for the ground plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldHit {
    pub hit: RayHit,
    pub block: Option<BlockId>,
}

impl WorldHit {
    pub fn point(&self) -> Vec3 {
        self.hit.point
    }

    pub fn normal(&self) -> Vec3 {
        self.hit.normal
    }

    pub fn distance(&self) -> f32 {
        self.hit.distance
    }
}

/// Active blocks of a course.
#[derive(Debug, Clone)]
pub struct CollisionWorld {
    /// Insertion order; earlier blocks win exact distance ties
    blocks: Vec<Block>,
    ground: Option<f32>,
    next_id: u32,
}

impl Default for CollisionWorld {
    fn default() -> Self {
        Self::new(Some(0.0))
    }
}

impl CollisionWorld {
    /// Create an empty world. `ground` is the height of the ground plane, if any.
    pub fn new(ground: Option<f32>) -> Self {
        Self {
            blocks: Vec::new(),
            ground,
            next_id: 1,
        }
    }

    pub fn ground_height(&self) -> Option<f32> {
        self.ground
    }

    pub fn set_ground(&mut self, ground: Option<f32>) {
        self.ground = ground;
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn get(&self, id: BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    /// Insert a block and return its new handle.
    pub fn insert(&mut self, block_type: BlockType, position: Vec3, rotation: Vec3) -> BlockId {
        let id = BlockId(self.next_id);
        self.next_id += 1;
        self.blocks.push(Block::new(id, block_type, position, rotation));
        id
    }

    pub fn remove(&mut self, id: BlockId) -> Option<Block> {
        let index = self.blocks.iter().position(|b| b.id == id)?;
        Some(self.blocks.remove(index))
    }

    /// Drop every block. Handles are never reused.
    pub fn clear(&mut self) {
        self.blocks.clear();
    }

    /// Replace the contents with a fresh set of blocks.
    pub fn rebuild<I>(&mut self, blocks: I)
    where
        I: IntoIterator<Item = (BlockType, Vec3, Vec3)>,
    {
        self.clear();
        for (block_type, position, rotation) in blocks {
            self.insert(block_type, position, rotation);
        }
    }

    pub fn count_of(&self, block_type: BlockType) -> usize {
        self.blocks.iter().filter(|b| b.block_type == block_type).count()
    }

    pub fn first_of(&self, block_type: BlockType) -> Option<&Block> {
        self.blocks.iter().find(|b| b.block_type == block_type)
    }

    /// The block whose snapped position is `key`, if any.
    pub fn occupant(&self, key: GridKey) -> Option<BlockId> {
        self.blocks.iter().find(|b| b.grid_key() == key).map(|b| b.id)
    }

    /// Nearest hit against blocks and the ground plane.
    ///
    /// Blocks whose type is in `exclude` are ignored, as are blocks that
    /// contain the ray origin. On an exact tie the earliest placed block wins,
    /// and any block wins over the ground.
    pub fn raycast_first(&self, origin: Vec3, direction: Vec3, exclude: &[BlockType]) -> Option<WorldHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return None;
        }

        let block_hit = self.raycast_blocks(origin, direction, exclude);
        let ground_hit = self
            .ground
            .and_then(|height| ray_ground_hit(origin, direction, height))
            .map(|hit| WorldHit { hit, block: None });

        match (block_hit, ground_hit) {
            (Some(b), Some(g)) if g.distance() < b.distance() => Some(g),
            (Some(b), _) => Some(b),
            (None, g) => g,
        }
    }

    /// Nearest hit against blocks only, ground excluded.
    pub fn raycast_blocks(&self, origin: Vec3, direction: Vec3, exclude: &[BlockType]) -> Option<WorldHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return None;
        }

        let mut best: Option<WorldHit> = None;
        for block in self.blocks.iter().filter(|b| !exclude.contains(&b.block_type)) {
            let Some(hit) = ray_aabb_hit(origin, direction, &block.aabb()) else {
                continue;
            };
            if best.is_none_or(|current| hit.distance < current.distance()) {
                best = Some(WorldHit {
                    hit,
                    block: Some(block.id),
                });
            }
        }
        best
    }

    /// Every block whose box overlaps `aabb`, in placement order.
    pub fn box_overlaps(&self, aabb: &Aabb, exclude: &[BlockType]) -> Vec<&Block> {
        self.blocks
            .iter()
            .filter(|b| !exclude.contains(&b.block_type))
            .filter(|b| b.aabb().intersects(aabb))
            .collect()
    }

    /// Whether `aabb` overlaps any solid block.
    pub fn overlaps_solid(&self, aabb: &Aabb) -> bool {
        self.blocks
            .iter()
            .filter(|b| b.block_type.is_solid())
            .any(|b| b.aabb().intersects(aabb))
    }

    /// Trigger zones overlapping `aabb`.
    pub fn zones_at(&self, aabb: &Aabb) -> Vec<Zone> {
        self.box_overlaps(aabb, &BlockType::solid_types())
            .into_iter()
            .filter_map(|b| b.block_type.zone())
            .collect()
    }
}
