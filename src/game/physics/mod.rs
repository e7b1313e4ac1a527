//! Physics Module
//!
//! The queryable collision world the player and the builder share.

pub mod collision_world;

pub use collision_world::{CollisionWorld, WorldHit};
