//! Export-space screens
//!
//! A Screen is one exported "room" snapshot: a start position and a list of
//! platforms flattened to vertex sets, all converted to the coordinate frame
//! the game runtime consumes. Screens own their vertex storage by value, so
//! nothing in a Screen aliases the Stage's working state.

use serde::{Serialize, Deserialize};
use super::geometry::Vec2;
use super::platform::Platform;

/// Pixels per export-space unit
pub const EXPORT_SCALE: f32 = 80.0;
/// Half the 1280-px grid width in export units
pub const EXPORT_HALF_WIDTH: f32 = 8.0;
/// Half the 720-px grid height in export units
pub const EXPORT_HALF_HEIGHT: f32 = 4.5;

/// Map a pixel-space point into the centered, Y-up export frame.
/// These constants are contractual with the game runtime.
pub fn to_export_space(p: Vec2) -> Vec2 {
    Vec2::new(
        p.x / EXPORT_SCALE - EXPORT_HALF_WIDTH,
        -(p.y / EXPORT_SCALE - EXPORT_HALF_HEIGHT),
    )
}

/// Map a pixel-space length into export units (no offset, no flip)
pub fn to_export_len(f: f32) -> f32 {
    f / EXPORT_SCALE
}

/// A platform flattened for export: transformed vertices plus wire tags.
/// Pure data, no identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportPlatform {
    pub vertices: Vec<Vec2>,
    pub kind_tag: u32,
    pub material_tag: u32,
}

impl ExportPlatform {
    pub fn from_platform(platform: &Platform) -> Self {
        Self {
            vertices: platform
                .vertices()
                .iter()
                .map(|&v| to_export_space(v.into()))
                .collect(),
            kind_tag: platform.kind().tag(),
            material_tag: platform.material().ordinal(),
        }
    }
}

/// One exported room snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Screen {
    pub start_position: Vec2,
    pub platforms: Vec<ExportPlatform>,
}
