//! Bridge Module
//!
//! Typed message contract with the embedding host.

pub mod host;
pub mod messages;

pub use host::HostBridge;
pub use messages::{InboundMessage, OutboundMessage, RequestKind};
