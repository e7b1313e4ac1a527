//! Player Module
//!
//! The parkour body, its physics stepper and the cosmetic animation state.

pub mod animation;
pub mod body;
pub mod stepper;

pub use animation::AnimationState;
pub use body::PlayerBody;
pub use stepper::{DeathCause, PhysicsStepper, PlayerEvent};
