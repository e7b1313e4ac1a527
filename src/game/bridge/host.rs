//! Host Bridge
//!
//! Owns the outbound queue to the host and the bookkeeping for requests that
//! expect an answer. At most one request of each kind is in flight; one
//! that sees no answer within the timeout is reported once and dropped.

use std::collections::BTreeMap;

use glam::Vec3;

use super::messages::{OutboundMessage, RequestKind};
use crate::game::config::BridgeConfig;
use crate::game::error::BridgeError;
use crate::game::player::AnimationState;

#[derive(Debug, Clone, Copy, PartialEq)]
struct LastPosition {
    position: Vec3,
    on_ground: bool,
    animation: AnimationState,
}

#[derive(Debug, Clone)]
pub struct HostBridge {
    outbox: Vec<OutboundMessage>,
    ready_sent: bool,
    last_position: Option<LastPosition>,
    /// Seconds each outstanding request has waited
    pending: BTreeMap<RequestKind, f32>,
    request_timeout: f32,
    position_epsilon: f32,
}

impl HostBridge {
    pub fn new(config: &BridgeConfig) -> Self {
        Self {
            outbox: Vec::new(),
            ready_sent: false,
            last_position: None,
            pending: BTreeMap::new(),
            request_timeout: config.request_timeout,
            position_epsilon: config.position_epsilon,
        }
    }

    /// Queue `webViewReady`. Only the first call sends.
    pub fn announce_ready(&mut self) -> bool {
        if self.ready_sent {
            return false;
        }
        self.ready_sent = true;
        self.outbox.push(OutboundMessage::WebViewReady);
        true
    }

    /// Queue a position update if anything visible changed since the last one.
    pub fn send_position(&mut self, position: Vec3, on_ground: bool, animation: AnimationState) -> bool {
        let next = LastPosition {
            position,
            on_ground,
            animation,
        };
        if let Some(last) = self.last_position {
            let moved = last.position.distance(position) > self.position_epsilon;
            if !moved && last.on_ground == on_ground && last.animation == animation {
                return false;
            }
        }
        self.last_position = Some(next);
        self.outbox.push(OutboundMessage::PositionUpdate {
            x: position.x,
            y: position.y,
            z: position.z,
            on_ground,
            animation,
        });
        true
    }

    /// Forget the last reported position so the next update always sends.
    pub fn reset_position(&mut self) {
        self.last_position = None;
    }

    /// Queue a fire-and-forget message.
    pub fn send(&mut self, message: OutboundMessage) {
        if let Some(kind) = message.request_kind() {
            log::warn!("{} sent without tracking; use request()", kind);
        }
        self.outbox.push(message);
    }

    /// Queue a message that expects an answer.
    pub fn request(&mut self, message: OutboundMessage) -> Result<(), BridgeError> {
        let Some(kind) = message.request_kind() else {
            self.outbox.push(message);
            return Ok(());
        };
        if self.pending.contains_key(&kind) {
            return Err(BridgeError::RequestPending(kind));
        }
        self.pending.insert(kind, 0.0);
        self.outbox.push(message);
        log::debug!("Host request {} sent", kind);
        Ok(())
    }

    pub fn is_pending(&self, kind: RequestKind) -> bool {
        self.pending.contains_key(&kind)
    }

    /// The host answered. Returns whether the request was outstanding.
    pub fn complete(&mut self, kind: RequestKind) -> bool {
        let was_pending = self.pending.remove(&kind).is_some();
        if !was_pending {
            log::debug!("Ignoring answer to {}: nothing outstanding", kind);
        }
        was_pending
    }

    /// The host reported a failure for `kind`.
    pub fn fail(&mut self, kind: RequestKind, message: impl Into<String>) -> BridgeError {
        self.pending.remove(&kind);
        BridgeError::HostFailure {
            request: kind,
            message: message.into(),
        }
    }

    /// Age outstanding requests; returns the ones that just timed out.
    pub fn tick(&mut self, delta_time: f32) -> Vec<BridgeError> {
        let timeout = self.request_timeout;
        let mut expired = Vec::new();
        self.pending.retain(|kind, waited| {
            *waited += delta_time;
            if *waited >= timeout {
                expired.push(BridgeError::Timeout(*kind));
                false
            } else {
                true
            }
        });
        expired
    }

    /// Take everything queued for the host.
    pub fn drain_outbox(&mut self) -> Vec<OutboundMessage> {
        std::mem::take(&mut self.outbox)
    }
}
