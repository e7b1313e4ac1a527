//! Game Errors
//!
//! Error taxonomy for the course builder and player:
//!
//! - [`ActionRejected`]: a builder precondition failed. Never fatal; shown as a
//!   transient notice and the course is left untouched.
//! - [`CourseError`]: course data could not be built or loaded.
//! - [`ExportRejected`]: the course is not publishable yet.
//! - [`StorageError`]: the key-value store refused a read or write.
//! - [`BridgeError`]: a host message could not be used or a request failed.

use thiserror::Error;

use crate::game::blocks::BlockType;
use crate::game::bridge::RequestKind;

/// A builder action that was refused. State is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionRejected {
    #[error("switch to the {expected} tool first")]
    WrongTool { expected: &'static str },

    #[error("point at a surface to place a block")]
    NoPreview,

    #[error("block limit reached ({max} blocks)")]
    BlockLimit { max: usize },

    #[error("course already has a {0} block - remove it first")]
    DuplicateSpecial(BlockType),

    #[error("a block already occupies ({x}, {y}, {z})")]
    PositionOccupied { x: i32, y: i32, z: i32 },
}

/// Course construction or load failure.
#[derive(Debug, Error)]
pub enum CourseError {
    #[error("invalid course data: {0}")]
    InvalidCourseData(String),

    #[error("unknown block type '{0}'")]
    UnknownBlockType(String),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<serde_json::Error> for CourseError {
    fn from(e: serde_json::Error) -> Self {
        CourseError::InvalidCourseData(e.to_string())
    }
}

/// Why a course cannot be exported or played.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct ExportRejected {
    pub reason: String,
}

impl ExportRejected {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Key-value persistence failure.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Host bridge failure. Logged or shown as a notice; play continues locally.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BridgeError {
    #[error("malformed host message: {0}")]
    Malformed(String),

    #[error("unknown host message type '{0}'")]
    UnknownType(String),

    #[error("a {0} request is already in flight")]
    RequestPending(RequestKind),

    #[error("{0} request timed out")]
    Timeout(RequestKind),

    #[error("{request} request failed: {message}")]
    HostFailure { request: RequestKind, message: String },
}

pub type CourseResult<T> = Result<T, CourseError>;
