//! Player Animation State
//!
//! Cosmetic pose the host renders, derived from the body after each tick.

use serde::{Deserialize, Serialize};

use super::body::PlayerBody;

/// Horizontal speed below which the body counts as standing (m/s).
const MOVING_THRESHOLD: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnimationState {
    #[default]
    Idle,
    Run,
    Sprint,
    Jump,
    Fall,
    Dead,
    Victory,
}

impl AnimationState {
    pub fn for_body(body: &PlayerBody, sprinting: bool) -> Self {
        if body.is_level_complete {
            AnimationState::Victory
        } else if body.is_dead {
            AnimationState::Dead
        } else if !body.on_ground {
            if body.vertical_velocity > 0.0 {
                AnimationState::Jump
            } else {
                AnimationState::Fall
            }
        } else if body.horizontal_speed > MOVING_THRESHOLD {
            if sprinting {
                AnimationState::Sprint
            } else {
                AnimationState::Run
            }
        } else {
            AnimationState::Idle
        }
    }
}
