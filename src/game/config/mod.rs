//! Config Module
//!
//! Centralized tuning for physics, builder and host bridge.

pub mod game_config;

pub use game_config::{BridgeConfig, BuilderConfig, GameConfig, PhysicsConfig};
