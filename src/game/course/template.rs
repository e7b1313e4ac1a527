//! Course Templates
//!
//! A template only sizes the ground and frames the initial camera. It never
//! bounds collision.

use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseTemplate {
    #[default]
    Small,
    Medium,
    Large,
}

impl CourseTemplate {
    pub const ALL: [CourseTemplate; 3] = [CourseTemplate::Small, CourseTemplate::Medium, CourseTemplate::Large];

    /// Parse a template tag; unknown tags yield `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "small" => Some(CourseTemplate::Small),
            "medium" => Some(CourseTemplate::Medium),
            "large" => Some(CourseTemplate::Large),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            CourseTemplate::Small => "small",
            CourseTemplate::Medium => "medium",
            CourseTemplate::Large => "large",
        }
    }

    /// Side length of the square ground shown for this template (m).
    pub fn ground_size(self) -> f32 {
        match self {
            CourseTemplate::Small => 30.0,
            CourseTemplate::Medium => 60.0,
            CourseTemplate::Large => 100.0,
        }
    }

    pub fn default_name(self) -> &'static str {
        match self {
            CourseTemplate::Small => "Small Course",
            CourseTemplate::Medium => "Medium Course",
            CourseTemplate::Large => "Large Course",
        }
    }

    /// Builder camera framing the whole ground from behind the start side.
    pub fn camera_position(self) -> Vec3 {
        let size = self.ground_size();
        Vec3::new(0.0, size * 0.4, size * 0.6)
    }

    /// Camera Euler angles in degrees (pitched down toward the origin).
    pub fn camera_rotation(self) -> Vec3 {
        Vec3::new(-30.0, 0.0, 0.0)
    }

    pub fn start_position(self) -> Vec3 {
        Vec3::new(0.0, 0.0, self.ground_size() * 0.3)
    }

    pub fn finish_position(self) -> Vec3 {
        Vec3::new(0.0, 0.0, -self.ground_size() * 0.3)
    }
}

impl fmt::Display for CourseTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags() {
        for template in CourseTemplate::ALL {
            assert_eq!(CourseTemplate::from_tag(template.tag()), Some(template));
        }
        assert_eq!(CourseTemplate::from_tag("huge"), None);
    }

    #[test]
    fn test_sizes_grow() {
        assert!(CourseTemplate::Small.ground_size() < CourseTemplate::Medium.ground_size());
        assert!(CourseTemplate::Medium.ground_size() < CourseTemplate::Large.ground_size());
        assert!(CourseTemplate::Large.camera_position().y > CourseTemplate::Small.camera_position().y);
    }
}
