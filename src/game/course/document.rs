//! Course Document
//!
//! JSON wire shape of a course, camelCase, as the host persists it.
//! Optional fields stay optional here; [`super::store`] fills them from the
//! template when converting to a [`super::Course`].

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// `{x, y, z}` object as used by the document.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3Doc {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3Doc {
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl From<Vec3> for Vec3Doc {
    fn from(v: Vec3) -> Self {
        Self { x: v.x, y: v.y, z: v.z }
    }
}

impl From<Vec3Doc> for Vec3 {
    fn from(v: Vec3Doc) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}

/// One entry of `blocks`. The type stays a raw tag so unknown types can be
/// skipped individually instead of failing the whole document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockEntry {
    #[serde(rename = "type")]
    pub block_type: String,
    pub position: Vec3Doc,
    #[serde(default)]
    pub rotation: Vec3Doc,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    pub blocks: Vec<BlockEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_position: Option<Vec3Doc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_position: Option<Vec3Doc>,

    // Builder autosave only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera_position: Option<Vec3Doc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera_rotation: Option<Vec3Doc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_tool: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_block_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_document_parses() {
        let doc: CourseDocument =
            serde_json::from_str(r#"{"blocks": [{"type": "cube", "position": {"x": 1, "y": 2, "z": 3}}]}"#).unwrap();
        assert_eq!(doc.blocks.len(), 1);
        assert_eq!(doc.blocks[0].rotation, Vec3Doc::default());
        assert!(doc.name.is_none());
    }

    #[test]
    fn test_builder_fields_are_camel_case() {
        let doc = CourseDocument {
            selected_block_type: Some("finish".into()),
            camera_position: Some(Vec3::ONE.into()),
            ..Default::default()
        };
        let json = serde_json::to_string(&doc).unwrap();
        assert!(json.contains("\"selectedBlockType\":\"finish\""));
        assert!(json.contains("\"cameraPosition\""));
        assert!(!json.contains("startPosition"));
    }

    #[test]
    fn test_missing_blocks_is_an_error() {
        assert!(serde_json::from_str::<CourseDocument>(r#"{"name": "x"}"#).is_err());
    }
}
