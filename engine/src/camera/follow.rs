//! Follow Camera
//!
//! Third-person camera that trails the player during a run. The camera sits
//! behind and above the body's facing direction and chases that point with a
//! damped spring, so it never snaps.

use glam::Vec3;

/// Spring damping configuration for smooth camera follow
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringConfig {
    /// Spring stiffness (higher = faster response)
    pub stiffness: f32,
    /// Damping coefficient (higher = less oscillation)
    pub damping: f32,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            stiffness: 40.0,
            damping: 12.0,
        }
    }
}

/// Smoothed chase camera.
#[derive(Clone, Debug)]
pub struct FollowCamera {
    pub position: Vec3,
    /// Point the camera looks at (body position + look height)
    pub target: Vec3,
    velocity: Vec3,
    /// Distance behind the body
    pub distance: f32,
    /// Height above the body's feet
    pub height: f32,
    /// Height of the look-at point above the feet
    pub look_height: f32,
    pub spring: SpringConfig,
}

impl Default for FollowCamera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 4.0, 8.0),
            target: Vec3::ZERO,
            velocity: Vec3::ZERO,
            distance: 6.0,
            height: 3.0,
            look_height: 1.2,
            spring: SpringConfig::default(),
        }
    }
}

impl FollowCamera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Where the camera wants to be for a body at `feet` facing `yaw`.
    pub fn desired_position(&self, feet: Vec3, yaw: f32) -> Vec3 {
        let forward = Vec3::new(yaw.sin(), 0.0, -yaw.cos());
        feet - forward * self.distance + Vec3::Y * self.height
    }

    /// Jump straight to the desired pose (spawn, respawn, course load).
    pub fn snap_to(&mut self, feet: Vec3, yaw: f32) {
        self.position = self.desired_position(feet, yaw);
        self.target = feet + Vec3::Y * self.look_height;
        self.velocity = Vec3::ZERO;
    }

    /// Advance the spring toward the body.
    pub fn update(&mut self, feet: Vec3, yaw: f32, delta_time: f32) {
        let dt = delta_time.clamp(0.0, 0.1);
        let desired = self.desired_position(feet, yaw);

        // F = -k * (x - target) - c * v
        let displacement = self.position - desired;
        let spring_force = -self.spring.stiffness * displacement - self.spring.damping * self.velocity;
        self.velocity += spring_force * dt;
        self.position += self.velocity * dt;

        self.target = feet + Vec3::Y * self.look_height;
    }
}
