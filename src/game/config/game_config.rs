//! Game Configuration
//!
//! Centralized tuning for the player physics, the course builder and the host
//! bridge. `Default` carries the tuned values; any subset can be overridden
//! from JSON with [`GameConfig::from_json_str`].

use serde::{Deserialize, Serialize};

/// Player movement and collision tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PhysicsConfig {
    /// Base horizontal speed (m/s)
    pub walk_speed: f32,
    /// Speed multiplier while sprint is held
    pub sprint_multiplier: f32,
    /// Facing rotation rate for turn input (rad/s)
    pub turn_rate: f32,
    /// Initial upward velocity of a jump (m/s)
    pub jump_velocity: f32,
    /// Gravity while rising with jump held (m/s^2)
    pub jump_gravity: f32,
    /// Gravity while falling or after jump release (m/s^2)
    pub fall_gravity: f32,
    /// Maximum fall speed (m/s)
    pub terminal_velocity: f32,
    /// Half-width of the player box (m)
    pub player_radius: f32,
    /// Height of the player box from the feet (m)
    pub player_height: f32,
    /// Tallest ledge the player lands on or steps over without jumping (m)
    pub step_height: f32,
    /// Number of probe rays fanned around the movement direction
    pub probe_rays: usize,
    /// Total angular spread of the probe fan (degrees)
    pub probe_spread_degrees: f32,
    /// Extra probe reach beyond the body radius (m)
    pub probe_skin: f32,
    /// Largest vertical gap between wall ray heights, knee to head (m)
    pub ray_spacing: f32,
    /// Fraction of the tangent movement kept when sliding along a wall
    pub slide_factor: f32,
    /// Re-probes after a slide before the move is cancelled
    pub slide_passes: u32,
    /// Whether the infinite ground plane exists
    pub ground_plane: bool,
    /// Height of the world floor (m)
    pub floor_height: f32,
    /// Falling below this height kills the player (m)
    pub fall_threshold: f32,
    /// Seconds between death and respawn
    pub respawn_delay: f32,
    /// Longest frame simulated in one step; longer frames are cut to this (s)
    pub max_frame_time: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            walk_speed: 6.0,
            sprint_multiplier: 1.6,
            turn_rate: 2.5,
            jump_velocity: 9.0,
            jump_gravity: 22.0,
            fall_gravity: 40.0,
            terminal_velocity: 30.0,
            player_radius: 0.4,
            player_height: 1.8,
            step_height: 0.35,
            probe_rays: 5,
            probe_spread_degrees: 90.0,
            probe_skin: 0.05,
            ray_spacing: 0.4,
            slide_factor: 0.8,
            slide_passes: 2,
            ground_plane: true,
            floor_height: 0.0,
            fall_threshold: -50.0,
            respawn_delay: 0.5,
            max_frame_time: 0.25,
        }
    }
}

/// Course builder limits.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BuilderConfig {
    /// Maximum blocks per course
    pub max_blocks: usize,
    /// Grid unit for snapping placements (m)
    pub grid_unit: f32,
    pub snap_enabled: bool,
    /// Furthest distance from the pointer ray origin the remove tool reaches (m)
    pub removal_range: f32,
    /// Seconds between periodic autosaves in builder mode
    pub autosave_interval: f32,
    /// Seconds a notice stays on screen
    pub notice_duration: f32,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            max_blocks: 100,
            grid_unit: 1.0,
            snap_enabled: true,
            removal_range: 30.0,
            autosave_interval: 10.0,
            notice_duration: 3.0,
        }
    }
}

/// Host message bridge tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BridgeConfig {
    /// Seconds to wait for a host answer before giving up
    pub request_timeout: f32,
    /// Smallest movement that produces a position update (m)
    pub position_epsilon: f32,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            request_timeout: 10.0,
            position_epsilon: 0.01,
        }
    }
}

/// Root configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub physics: PhysicsConfig,
    pub builder: BuilderConfig,
    pub bridge: BridgeConfig,
}

impl GameConfig {
    /// Parse a (possibly partial) JSON override. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GameConfig::default();
        assert_eq!(config.builder.max_blocks, 100);
        assert_eq!(config.builder.grid_unit, 1.0);
        assert_eq!(config.builder.autosave_interval, 10.0);
        assert!(config.physics.fall_gravity > config.physics.jump_gravity);
        assert!((config.physics.respawn_delay - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_partial_override() {
        let config = GameConfig::from_json_str(r#"{"physics": {"walkSpeed": 3.5}, "builder": {"maxBlocks": 20}}"#)
            .unwrap();
        assert_eq!(config.physics.walk_speed, 3.5);
        assert_eq!(config.physics.jump_velocity, PhysicsConfig::default().jump_velocity);
        assert_eq!(config.builder.max_blocks, 20);
        assert_eq!(config.bridge, BridgeConfig::default());
    }

    #[test]
    fn test_empty_override_is_default() {
        assert_eq!(GameConfig::from_json_str("{}").unwrap(), GameConfig::default());
    }

    #[test]
    fn test_malformed_override_fails() {
        assert!(GameConfig::from_json_str("{\"physics\": 3}").is_err());
    }
}
