//! Player Body
//!
//! Kinematic state of the parkour player. The position is the point between
//! the feet; the collision box grows up from there.

use glam::Vec3;

use crate::physics::Aabb;

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerBody {
    /// Feet position
    pub position: Vec3,
    /// Vertical velocity (m/s, positive up)
    pub vertical_velocity: f32,
    /// Yaw in radians; forward is (sin yaw, 0, -cos yaw)
    pub facing: f32,
    pub on_ground: bool,
    /// Set by a jump, cleared on landing or death
    pub is_jumping: bool,
    pub is_dead: bool,
    /// Sticky until [`PlayerBody::reset`]
    pub is_level_complete: bool,
    /// Where a death puts the body back
    pub respawn_position: Vec3,
    /// Seconds left until respawn while dead
    pub respawn_timer: f32,
    /// Horizontal speed achieved in the last tick (m/s)
    pub horizontal_speed: f32,
}

impl PlayerBody {
    /// A body standing at `spawn`, which also becomes the respawn point.
    pub fn new(spawn: Vec3, facing: f32) -> Self {
        Self {
            position: spawn,
            vertical_velocity: 0.0,
            facing,
            on_ground: false,
            is_jumping: false,
            is_dead: false,
            is_level_complete: false,
            respawn_position: spawn,
            respawn_timer: 0.0,
            horizontal_speed: 0.0,
        }
    }

    /// Teleport and record the new position as the respawn point.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.respawn_position = position;
        self.vertical_velocity = 0.0;
        self.on_ground = false;
    }

    /// External reset: back to the respawn point, alive, level not complete.
    pub fn reset(&mut self) {
        self.position = self.respawn_position;
        self.vertical_velocity = 0.0;
        self.on_ground = false;
        self.is_jumping = false;
        self.is_dead = false;
        self.is_level_complete = false;
        self.respawn_timer = 0.0;
        self.horizontal_speed = 0.0;
    }

    /// Unit vector the body faces on the XZ plane.
    pub fn forward(&self) -> Vec3 {
        Vec3::new(self.facing.sin(), 0.0, -self.facing.cos())
    }

    /// Unit vector to the body's right on the XZ plane.
    pub fn right(&self) -> Vec3 {
        Vec3::new(self.facing.cos(), 0.0, self.facing.sin())
    }

    pub fn aabb(&self, radius: f32, height: f32) -> Aabb {
        Aabb::from_feet(self.position, radius, height)
    }
}
