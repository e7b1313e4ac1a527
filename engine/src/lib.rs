//! Headless core of a 3D parkour course builder and player. The engine
//! modules provide window-system agnostic primitives; the game module builds
//! the builder, the player physics and the host contract on top of them.
//!
//! # Modules
//!
//! - [`camera`] - Pointer raycasting and the chase camera
//! - [`input`] - Platform-agnostic keyboard state
//! - [`physics`] - AABBs and ray intersection
//! - [`world`] - Placement grid
//! - [`game`] - Course builder, player, persistence and host session
//!
//! # Example
//!
//! ```ignore
//! use parkour_engine::game::{GameConfig, GameSession};
//!
//! let mut session = GameSession::new(GameConfig::default(), None);
//! session.handle_message(r#"{"type": "loadCourse", "data": {"courseJson": "..."}}"#);
//! session.handle_message(r#"{"type": "startGame"}"#);
//!
//! // Each frame:
//! session.key_event("KeyW", true);
//! let events = session.tick(1.0 / 60.0);
//! for message in session.drain_outbox() {
//!     // post to the host
//! }
//! ```

pub mod camera;
pub mod input;
pub mod physics;
pub mod world;

// Game layer lives in the top-level src/game tree
#[path = "../../src/game/mod.rs"]
pub mod game;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use game::{GameConfig, GameSession};
pub use input::{KeyCode, KeyboardState, MovementKeys};
pub use world::{GridConfig, GridKey, grid_key, snap_to_grid};
