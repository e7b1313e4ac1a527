//! Camera Module
//!
//! Pointer raycasting for the builder and the chase camera for play mode.
//! This module is window-system agnostic - it only deals with camera state and math.

pub mod follow;
pub mod raycast;

pub use follow::{FollowCamera, SpringConfig};
pub use raycast::{Ray, camera_basis, screen_to_ray};
