//! Block Catalog
//!
//! Every block a course can contain, keyed by its string tag. Each type maps
//! to immutable gameplay metadata: size, base color and how it collides.
//! Appearance beyond that lives in [`super::visuals`].

use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::game::error::{CourseError, CourseResult};
use crate::physics::Aabb;

/// Block type tag.
///
/// Serialized with the same camelCase tags the course documents use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockType {
    Platform,
    Floor,
    Start,
    Finish,
    KillZone,
    KillZoneLarge,
    Cube,
    Pillar,
}

/// How a block takes part in physics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    /// Blocks movement and can be stood on
    Solid,
    /// Detects overlap only
    Trigger(Zone),
}

/// Trigger volume behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Kill,
    Finish,
}

/// Immutable per-type metadata.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockSpec {
    pub tag: &'static str,
    pub display_name: &'static str,
    /// Full extents (width, height, depth) at zero rotation
    pub size: Vec3,
    /// Base color as 0xRRGGBB
    pub color: u32,
    pub collision: Collision,
}

const PLATFORM: BlockSpec = BlockSpec {
    tag: "platform",
    display_name: "Platform",
    size: Vec3::new(3.0, 0.5, 3.0),
    color: 0x8d6e63,
    collision: Collision::Solid,
};

const FLOOR: BlockSpec = BlockSpec {
    tag: "floor",
    display_name: "Floor",
    size: Vec3::new(10.0, 1.0, 10.0),
    color: 0x9e9e9e,
    collision: Collision::Solid,
};

const START: BlockSpec = BlockSpec {
    tag: "start",
    display_name: "Start",
    size: Vec3::new(2.0, 0.5, 2.0),
    color: 0x4caf50,
    collision: Collision::Solid,
};

const FINISH: BlockSpec = BlockSpec {
    tag: "finish",
    display_name: "Finish",
    size: Vec3::new(2.0, 2.0, 2.0),
    color: 0xffd700,
    collision: Collision::Trigger(Zone::Finish),
};

const KILL_ZONE: BlockSpec = BlockSpec {
    tag: "killZone",
    display_name: "Kill Zone",
    size: Vec3::new(2.0, 0.5, 2.0),
    color: 0xff3b30,
    collision: Collision::Trigger(Zone::Kill),
};

const KILL_ZONE_LARGE: BlockSpec = BlockSpec {
    tag: "killZoneLarge",
    display_name: "Large Kill Zone",
    size: Vec3::new(6.0, 0.5, 6.0),
    color: 0xd32f2f,
    collision: Collision::Trigger(Zone::Kill),
};

const CUBE: BlockSpec = BlockSpec {
    tag: "cube",
    display_name: "Cube",
    size: Vec3::new(1.0, 1.0, 1.0),
    color: 0x607d8b,
    collision: Collision::Solid,
};

const PILLAR: BlockSpec = BlockSpec {
    tag: "pillar",
    display_name: "Pillar",
    size: Vec3::new(1.0, 4.0, 1.0),
    color: 0xb0bec5,
    collision: Collision::Solid,
};

impl BlockType {
    /// All block types in toolbar order.
    pub const ALL: [BlockType; 8] = [
        BlockType::Platform,
        BlockType::Floor,
        BlockType::Start,
        BlockType::Finish,
        BlockType::KillZone,
        BlockType::KillZoneLarge,
        BlockType::Cube,
        BlockType::Pillar,
    ];

    /// Look up a type by its document tag.
    pub fn from_tag(tag: &str) -> CourseResult<BlockType> {
        BlockType::ALL
            .iter()
            .copied()
            .find(|ty| ty.tag() == tag)
            .ok_or_else(|| CourseError::UnknownBlockType(tag.to_string()))
    }

    pub fn spec(self) -> &'static BlockSpec {
        match self {
            BlockType::Platform => &PLATFORM,
            BlockType::Floor => &FLOOR,
            BlockType::Start => &START,
            BlockType::Finish => &FINISH,
            BlockType::KillZone => &KILL_ZONE,
            BlockType::KillZoneLarge => &KILL_ZONE_LARGE,
            BlockType::Cube => &CUBE,
            BlockType::Pillar => &PILLAR,
        }
    }

    pub fn tag(self) -> &'static str {
        self.spec().tag
    }

    pub fn size(self) -> Vec3 {
        self.spec().size
    }

    /// Start and finish may appear at most once per course.
    pub fn is_special(self) -> bool {
        matches!(self, BlockType::Start | BlockType::Finish)
    }

    pub fn is_solid(self) -> bool {
        self.spec().collision == Collision::Solid
    }

    pub fn zone(self) -> Option<Zone> {
        match self.spec().collision {
            Collision::Trigger(zone) => Some(zone),
            Collision::Solid => None,
        }
    }

    /// Trigger types (finish, kill zones) - excluded from solid queries.
    pub fn trigger_types() -> Vec<BlockType> {
        BlockType::ALL.iter().copied().filter(|ty| !ty.is_solid()).collect()
    }

    /// Solid types - excluded from zone queries.
    pub fn solid_types() -> Vec<BlockType> {
        BlockType::ALL.iter().copied().filter(|ty| ty.is_solid()).collect()
    }

    /// World-space collision box for a block of this type.
    ///
    /// Only yaw is honored: a quarter turn swaps width and depth. Pitch and
    /// roll are cosmetic.
    pub fn collision_box(self, position: Vec3, rotation_degrees: Vec3) -> Aabb {
        let size = self.size();
        let quarter_turns = (rotation_degrees.y / 90.0).round() as i32;
        let size = if quarter_turns.rem_euclid(2) == 1 {
            Vec3::new(size.z, size.y, size.x)
        } else {
            size
        };
        Aabb::from_center_size(position, size)
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
