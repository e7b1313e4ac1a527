//! Game Module
//!
//! Parkour course builder and player, built on the engine's camera, input,
//! physics and grid primitives.
//!
//! - [`blocks`] - block catalog, placed blocks and render lookup
//! - [`physics`] - collision world shared by builder and player
//! - [`builder`] - placement state machine
//! - [`player`] - body, physics stepper and animation state
//! - [`course`] - course model, JSON document, persistence and autosave
//! - [`bridge`] - host message contract
//! - [`session`] - top-level controller owning all of the above

pub mod blocks;
pub mod bridge;
pub mod builder;
pub mod config;
pub mod course;
pub mod error;
pub mod physics;
pub mod player;
pub mod session;

pub use blocks::{Block, BlockId, BlockType};
pub use bridge::{HostBridge, InboundMessage, OutboundMessage, RequestKind};
pub use builder::{PlacementEngine, SceneCommand, ToolMode};
pub use config::{BridgeConfig, BuilderConfig, GameConfig, PhysicsConfig};
pub use course::{Course, CourseBlock, CourseStateStore, CourseTemplate, LoadedCourse};
pub use error::{ActionRejected, BridgeError, CourseError, CourseResult, ExportRejected, StorageError};
pub use physics::{CollisionWorld, WorldHit};
pub use player::{AnimationState, PhysicsStepper, PlayerBody, PlayerEvent};
pub use session::{GameSession, Notice, NoticeLevel, SessionMode};
