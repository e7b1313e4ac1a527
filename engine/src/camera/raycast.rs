//! Raycast Module
//!
//! Turns a pointer position on screen into a world-space ray for builder
//! picking.

use glam::Vec3;

/// A world-space ray. `direction` is always normalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray, normalizing the direction.
    ///
    /// A zero direction falls back to straight down.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        let direction = direction.try_normalize().unwrap_or(Vec3::NEG_Y);
        Self { origin, direction }
    }

    /// Point at distance `t` along the ray.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Convert screen coordinates to a world-space ray
///
/// # Arguments
/// * `screen_x` - Screen X coordinate in pixels
/// * `screen_y` - Screen Y coordinate in pixels (top = 0)
/// * `screen_width` - Screen width in pixels
/// * `screen_height` - Screen height in pixels
/// * `camera_position` - Camera position in world space
/// * `camera_forward` - Camera forward direction (normalized)
/// * `camera_right` - Camera right direction (normalized)
/// * `camera_fov` - Vertical field of view in radians
pub fn screen_to_ray(
    screen_x: f32,
    screen_y: f32,
    screen_width: f32,
    screen_height: f32,
    camera_position: Vec3,
    camera_forward: Vec3,
    camera_right: Vec3,
    camera_fov: f32,
) -> Ray {
    // Convert to normalized device coordinates (-1 to 1)
    let ndc_x = (2.0 * screen_x / screen_width) - 1.0;
    let ndc_y = 1.0 - (2.0 * screen_y / screen_height); // Flip Y

    let up = camera_right.cross(camera_forward).normalize();

    let aspect = screen_width / screen_height;
    let half_fov_tan = (camera_fov / 2.0).tan();

    let ray_dir = camera_forward
        + camera_right * ndc_x * half_fov_tan * aspect
        + up * ndc_y * half_fov_tan;

    Ray::new(camera_position, ray_dir)
}

/// Forward and right vectors for a camera with the given yaw/pitch (radians).
///
/// Yaw 0 looks toward -Z; positive pitch looks up.
pub fn camera_basis(yaw: f32, pitch: f32) -> (Vec3, Vec3) {
    let forward = Vec3::new(
        yaw.sin() * pitch.cos(),
        pitch.sin(),
        -yaw.cos() * pitch.cos(),
    )
    .normalize();
    let right = Vec3::new(yaw.cos(), 0.0, yaw.sin());
    (forward, right)
}
