//! Collision primitives shared by the builder and the player controller.
//!
//! Distances are meters; blocks sit on a 1 m grid by default.

pub mod collision;
pub mod types;

pub use collision::{Aabb, RayHit, ray_aabb_hit, ray_ground_hit};
pub use types::Vec3;
