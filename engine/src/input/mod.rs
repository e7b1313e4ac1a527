//! Input Module
//!
//! Platform-agnostic keyboard handling. The host page forwards DOM key
//! events as `KeyboardEvent.code` strings; nothing here depends on the DOM.
//!
//! # Example
//!
//! ```rust,ignore
//! use parkour_engine::input::{KeyboardState, KeyCode};
//!
//! let mut keyboard = KeyboardState::new();
//! keyboard.handle_key(KeyCode::from_dom_code("KeyW"), true);
//! if keyboard.movement.forward {
//!     // Run forward
//! }
//! ```

pub mod keyboard;

pub use keyboard::{KeyCode, KeyboardState, MovementKeys};
