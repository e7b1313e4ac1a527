//! Course State Store
//!
//! Conversion between [`Course`] and its JSON document, export validation,
//! and the write-through persistence of builder state.
//!
//! Both directions collapse blocks that round to the same grid slot, keeping
//! the first one seen, so a document never holds two blocks in one place.

use super::document::{BlockEntry, CourseDocument, Vec3Doc};
use super::model::{CameraPose, Course, CourseBlock};
use super::storage::CourseStorage;
use super::template::CourseTemplate;
use crate::game::blocks::BlockType;
use crate::game::builder::ToolMode;
use crate::game::error::{CourseError, CourseResult, ExportRejected};
use crate::world::in_grid_range;

/// A course parsed from JSON plus anything that was coerced or skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedCourse {
    pub course: Course,
    pub warnings: Vec<String>,
}

/// Build the wire document. Builder state (camera, tool) is included only
/// for autosaves.
pub fn to_document(course: &Course, include_builder_state: bool) -> CourseDocument {
    let mut course = course.clone();
    let dropped = course.dedupe();
    if dropped > 0 {
        log::debug!("Collapsed {} duplicate block(s) while saving '{}'", dropped, course.name);
    }
    course.sync_markers();

    let blocks = course
        .blocks
        .iter()
        .map(|b| BlockEntry {
            block_type: b.block_type.tag().to_string(),
            position: b.position.into(),
            rotation: b.rotation.into(),
        })
        .collect();

    let mut doc = CourseDocument {
        name: Some(course.name.clone()),
        template: Some(course.template.tag().to_string()),
        blocks,
        start_position: Some(course.start_position.into()),
        finish_position: Some(course.finish_position.into()),
        ..Default::default()
    };
    if include_builder_state {
        doc.camera_position = Some(course.camera.position.into());
        doc.camera_rotation = Some(course.camera.rotation.into());
        doc.selected_tool = Some(course.selected_tool.name().to_string());
        doc.selected_block_type = Some(course.selected_block_type.tag().to_string());
    }
    doc
}

/// Serialize a course for publishing or host storage.
pub fn serialize(course: &Course) -> CourseResult<String> {
    Ok(serde_json::to_string(&to_document(course, false))?)
}

/// Serialize a course together with the builder's camera and tool state.
pub fn serialize_autosave(course: &Course) -> CourseResult<String> {
    Ok(serde_json::to_string(&to_document(course, true))?)
}

/// Parse a course document.
///
/// The shape must be valid JSON with a `blocks` array of `{type, position}`
/// objects, otherwise the load fails as [`CourseError::InvalidCourseData`].
/// Missing optional fields take the template's defaults. Unknown block types
/// and non-finite positions are skipped with a warning.
pub fn deserialize(json: &str) -> CourseResult<LoadedCourse> {
    let doc: CourseDocument = serde_json::from_str(json)?;
    from_document(doc)
}

pub fn from_document(doc: CourseDocument) -> CourseResult<LoadedCourse> {
    let mut warnings = Vec::new();

    let template = match doc.template.as_deref() {
        None => CourseTemplate::default(),
        Some(tag) => CourseTemplate::from_tag(tag).unwrap_or_else(|| {
            warnings.push(format!("unknown template '{}', using {}", tag, CourseTemplate::default()));
            CourseTemplate::default()
        }),
    };
    let mut course = Course::from_template(template);

    if let Some(name) = doc.name.filter(|n| !n.trim().is_empty()) {
        course.name = name;
    }

    for (index, entry) in doc.blocks.into_iter().enumerate() {
        let block_type = match BlockType::from_tag(&entry.block_type) {
            Ok(ty) => ty,
            Err(e) => {
                log::warn!("Skipping block {}: {}", index, e);
                warnings.push(format!("block {}: {}", index, e));
                continue;
            }
        };
        if !entry.position.is_finite() || !entry.rotation.is_finite() {
            log::warn!("Skipping block {}: non-finite transform", index);
            warnings.push(format!("block {}: non-finite transform", index));
            continue;
        }
        if !in_grid_range(entry.position.into()) {
            log::warn!("Skipping block {}: position outside the grid", index);
            warnings.push(format!("block {}: position outside the grid", index));
            continue;
        }
        course.blocks.push(CourseBlock {
            block_type,
            position: entry.position.into(),
            rotation: entry.rotation.into(),
        });
    }

    let dropped = course.dedupe();
    if dropped > 0 {
        warnings.push(format!("collapsed {} duplicate block(s)", dropped));
    }

    let finite = |v: Option<Vec3Doc>| v.filter(Vec3Doc::is_finite);
    if let Some(start) = finite(doc.start_position) {
        course.start_position = start.into();
    }
    if let Some(finish) = finite(doc.finish_position) {
        course.finish_position = finish.into();
    }
    course.sync_markers();

    course.camera = CameraPose {
        position: finite(doc.camera_position).map_or(course.camera.position, Into::into),
        rotation: finite(doc.camera_rotation).map_or(course.camera.rotation, Into::into),
    };

    if let Some(tag) = doc.selected_tool.as_deref() {
        match ToolMode::from_name(tag) {
            Some(tool) => course.selected_tool = tool,
            None => warnings.push(format!("unknown tool '{}'", tag)),
        }
    }
    if let Some(tag) = doc.selected_block_type.as_deref() {
        match BlockType::from_tag(tag) {
            Ok(ty) => course.selected_block_type = ty,
            Err(e) => warnings.push(format!("selected block type: {}", e)),
        }
    }

    Ok(LoadedCourse { course, warnings })
}

/// Check a course can be published and played: at least one block, exactly
/// one start and exactly one finish.
pub fn validate_for_export(course: &Course) -> Result<(), ExportRejected> {
    if course.blocks.is_empty() {
        return Err(ExportRejected::new("Course has no blocks"));
    }
    for (block_type, label) in [(BlockType::Start, "start"), (BlockType::Finish, "finish")] {
        match course.count_of(block_type) {
            0 => return Err(ExportRejected::new(format!("Course needs a {} block", label))),
            1 => {}
            n => {
                return Err(ExportRejected::new(format!(
                    "Course has {} {} blocks; exactly one is allowed",
                    n, label
                )));
            }
        }
    }
    Ok(())
}

/// Write-through persistence of one course slot.
///
/// Runtime state never reads back from here except to restore a session.
pub struct CourseStateStore {
    storage: Box<dyn CourseStorage>,
    key: String,
}

impl CourseStateStore {
    pub fn new(storage: Box<dyn CourseStorage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Persist builder state (autosave form).
    pub fn save(&mut self, course: &Course) -> CourseResult<()> {
        let json = serialize_autosave(course)?;
        self.storage.set(&self.key, &json)?;
        log::debug!("Saved '{}' ({} blocks) to {}", course.name, course.blocks.len(), self.key);
        Ok(())
    }

    /// Restore the saved course, if any.
    ///
    /// A stored document that fails to parse is deleted so the next session
    /// starts clean, and the parse error is returned.
    pub fn load(&mut self) -> CourseResult<Option<LoadedCourse>> {
        let Some(json) = self.storage.get(&self.key)? else {
            return Ok(None);
        };
        match deserialize(&json) {
            Ok(loaded) => Ok(Some(loaded)),
            Err(e @ CourseError::InvalidCourseData(_)) => {
                log::warn!("Discarding corrupted course state at {}: {}", self.key, e);
                if let Err(delete_err) = self.storage.delete(&self.key) {
                    log::warn!("Failed to delete {}: {}", self.key, delete_err);
                }
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    pub fn clear(&mut self) -> CourseResult<()> {
        self.storage.delete(&self.key)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::game::course::storage::MemoryStorage;

    fn playable() -> Course {
        let mut course = Course::from_template(CourseTemplate::Medium);
        course.blocks = vec![
            CourseBlock::new(BlockType::Start, Vec3::new(0.0, 0.0, 5.0)),
            CourseBlock::new(BlockType::Platform, Vec3::new(0.0, 1.0, 0.0)),
            CourseBlock::new(BlockType::Finish, Vec3::new(0.0, 1.0, -5.0)),
        ];
        course
    }

    #[test]
    fn test_export_validation() {
        assert!(validate_for_export(&playable()).is_ok());

        let empty = Course::default();
        assert_eq!(validate_for_export(&empty).unwrap_err().reason, "Course has no blocks");

        let mut no_finish = playable();
        no_finish.blocks.retain(|b| b.block_type != BlockType::Finish);
        assert!(validate_for_export(&no_finish).unwrap_err().reason.contains("finish"));

        let mut two_starts = playable();
        two_starts.blocks.push(CourseBlock::new(BlockType::Start, Vec3::new(9.0, 0.0, 9.0)));
        assert!(validate_for_export(&two_starts).unwrap_err().reason.contains("2 start"));
    }

    #[test]
    fn test_publish_form_omits_builder_state() {
        let json = serialize(&playable()).unwrap();
        assert!(!json.contains("selectedTool"));
        let autosave = serialize_autosave(&playable()).unwrap();
        assert!(autosave.contains("\"selectedTool\":\"build\""));
    }

    #[test]
    fn test_markers_follow_blocks() {
        let doc = to_document(&playable(), false);
        assert_eq!(doc.start_position, Some(Vec3Doc { x: 0.0, y: 0.0, z: 5.0 }));
        assert_eq!(doc.finish_position, Some(Vec3Doc { x: 0.0, y: 1.0, z: -5.0 }));
    }

    #[test]
    fn test_missing_fields_take_template_defaults() {
        let loaded = deserialize(r#"{"template": "large", "blocks": []}"#).unwrap();
        let course = loaded.course;
        assert_eq!(course.name, "Large Course");
        assert_eq!(course.camera.position, CourseTemplate::Large.camera_position());
        assert_eq!(course.start_position, CourseTemplate::Large.start_position());
        assert!(loaded.warnings.is_empty());
    }

    #[test]
    fn test_unknown_types_skipped_with_warning() {
        let json = r#"{"blocks": [
            {"type": "trampoline", "position": {"x": 0, "y": 0, "z": 0}},
            {"type": "cube", "position": {"x": 2, "y": 0.5, "z": 0}}
        ]}"#;
        let loaded = deserialize(json).unwrap();
        assert_eq!(loaded.course.blocks.len(), 1);
        assert_eq!(loaded.warnings.len(), 1);
        assert!(loaded.warnings[0].contains("trampoline"));
    }

    #[test]
    fn test_bad_shape_is_invalid_course_data() {
        for json in ["not json", "[]", r#"{"blocks": [{"type": "cube"}]}"#, r#"{"blocks": 3}"#] {
            assert!(
                matches!(deserialize(json), Err(CourseError::InvalidCourseData(_))),
                "{json} should be rejected"
            );
        }
    }

    #[test]
    fn test_store_save_and_load() {
        let mut store = CourseStateStore::new(Box::new(MemoryStorage::new()), "builder:test");
        assert!(store.load().unwrap().is_none());

        let mut course = playable();
        course.selected_block_type = BlockType::KillZone;
        store.save(&course).unwrap();

        let loaded = store.load().unwrap().unwrap().course;
        assert_eq!(loaded.selected_block_type, BlockType::KillZone);
        assert_eq!(loaded.blocks.len(), 3);
    }

    #[test]
    fn test_corrupted_state_is_deleted() {
        let mut storage = MemoryStorage::new();
        storage.set("builder:test", "{\"blocks\": [").unwrap();
        let mut store = CourseStateStore::new(Box::new(storage), "builder:test");

        assert!(matches!(store.load(), Err(CourseError::InvalidCourseData(_))));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_failure_surfaces_storage_error() {
        let mut storage = MemoryStorage::new();
        storage.set_offline(true);
        let mut store = CourseStateStore::new(Box::new(storage), "builder:test");
        assert!(matches!(store.save(&playable()), Err(CourseError::Storage(_))));
    }
}
