//! Course Module
//!
//! Course model, JSON document, templates, persistence and autosave.

pub mod autosave;
pub mod document;
pub mod model;
pub mod storage;
pub mod store;
pub mod template;

pub use autosave::AutosaveTimer;
pub use document::{BlockEntry, CourseDocument, Vec3Doc};
pub use model::{CameraPose, Course, CourseBlock};
pub use storage::{CourseStorage, FileStorage, MemoryStorage};
pub use store::{CourseStateStore, LoadedCourse, deserialize, serialize, serialize_autosave, validate_for_export};
pub use template::CourseTemplate;
