//! Platform shapes placed on the editor grid
//!
//! A platform is either a grid-snapped rectangle or a free-form polygon
//! captured from the edge queue. Identity is by id, never by value: the
//! Stage deletes and merges platforms through their ids.

use serde::{Serialize, Deserialize};
use super::geometry::Vec2i;

/// Default rectangle size for a single grid cell placement
pub const DEFAULT_PLATFORM_SIZE: i32 = 40;

/// Surface material, written to the level file as a u32 ordinal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Material {
    /// Placement default, meaning "not assigned yet"
    NotYet,
    Stone,
    Glass,
    Cloud,
}

impl Material {
    pub fn ordinal(self) -> u32 {
        match self {
            Material::NotYet => 0,
            Material::Stone => 1,
            Material::Glass => 2,
            Material::Cloud => 3,
        }
    }

    pub fn from_ordinal(ordinal: u32) -> Option<Material> {
        match ordinal {
            0 => Some(Material::NotYet),
            1 => Some(Material::Stone),
            2 => Some(Material::Glass),
            3 => Some(Material::Cloud),
            _ => None,
        }
    }
}

/// Platform type, written to the level file as a u32 tag.
/// The runtime expects the first platform of an exported screen to be the
/// anchor when one exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlatformKind {
    Static,
    Anchor,
}

impl PlatformKind {
    pub fn tag(self) -> u32 {
        match self {
            PlatformKind::Static => 0,
            PlatformKind::Anchor => 1,
        }
    }

    pub fn from_tag(tag: u32) -> Option<PlatformKind> {
        match tag {
            0 => Some(PlatformKind::Static),
            1 => Some(PlatformKind::Anchor),
            _ => None,
        }
    }
}

/// Unique platform identity within a Stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlatformId(u64);

/// Hands out monotonically increasing platform ids.
///
/// Owned by the Stage and serialized with the session, so ids stay unique
/// across a save/load cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdAllocator {
    next_id: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self { next_id: 1 }
    }

    pub fn allocate(&mut self) -> PlatformId {
        let id = PlatformId(self.next_id);
        self.next_id += 1;
        id
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// A placed level-geometry shape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    id: PlatformId,
    kind: PlatformKind,
    material: Material,
    selected: bool,
    origin: Vec2i,
    width: i32,
    height: i32,
    vertices: Vec<Vec2i>,
}

impl Platform {
    /// Default-size rectangle centered on a grid cell center
    pub fn rect_at_cell_center(ids: &mut IdAllocator, center: Vec2i, kind: PlatformKind) -> Self {
        let half = DEFAULT_PLATFORM_SIZE / 2;
        Self::rect(
            ids,
            Vec2i::new(center.x - half, center.y - half),
            DEFAULT_PLATFORM_SIZE,
            DEFAULT_PLATFORM_SIZE,
            kind,
        )
    }

    /// Explicit-size rectangle. Vertices are top-left, bottom-left,
    /// bottom-right, top-right.
    pub fn rect(ids: &mut IdAllocator, origin: Vec2i, width: i32, height: i32, kind: PlatformKind) -> Self {
        let vertices = vec![
            origin,
            Vec2i::new(origin.x, origin.y + height),
            Vec2i::new(origin.x + width, origin.y + height),
            Vec2i::new(origin.x + width, origin.y),
        ];
        Self {
            id: ids.allocate(),
            kind,
            material: Material::NotYet,
            selected: false,
            origin,
            width,
            height,
            vertices,
        }
    }

    /// Polygon from an ordered vertex list. The bounding box is the per-axis
    /// min/max over all vertices; callers guarantee `vertices` is non-empty.
    pub fn from_vertices(
        ids: &mut IdAllocator,
        vertices: Vec<Vec2i>,
        kind: PlatformKind,
        material: Material,
    ) -> Self {
        let mut lower = vertices[0];
        let mut upper = vertices[0];
        for v in &vertices {
            lower.x = lower.x.min(v.x);
            lower.y = lower.y.min(v.y);
            upper.x = upper.x.max(v.x);
            upper.y = upper.y.max(v.y);
        }
        Self {
            id: ids.allocate(),
            kind,
            material,
            selected: false,
            origin: lower,
            width: upper.x - lower.x,
            height: upper.y - lower.y,
            vertices,
        }
    }

    /// Axis-aligned bounding-box hit test, inclusive on all four sides.
    /// Used for selection even on polygon platforms.
    pub fn contains_point(&self, p: Vec2i) -> bool {
        p.x >= self.origin.x
            && p.x <= self.origin.x + self.width
            && p.y >= self.origin.y
            && p.y <= self.origin.y + self.height
    }

    pub fn select(&mut self) {
        self.selected = true;
    }

    pub fn deselect(&mut self) {
        self.selected = false;
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn id(&self) -> PlatformId {
        self.id
    }

    pub fn kind(&self) -> PlatformKind {
        self.kind
    }

    pub fn set_kind(&mut self, kind: PlatformKind) {
        self.kind = kind;
    }

    pub fn material(&self) -> Material {
        self.material
    }

    pub fn origin(&self) -> Vec2i {
        self.origin
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn vertices(&self) -> &[Vec2i] {
        &self.vertices
    }
}

impl PartialEq for Platform {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Platform {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_vertices_closed_quad() {
        let mut ids = IdAllocator::new();
        let p = Platform::rect(&mut ids, Vec2i::new(40, 80), 120, 40, PlatformKind::Static);

        assert_eq!(p.vertices().len(), 4);
        assert_eq!(p.vertices()[0], Vec2i::new(40, 80));    // top-left
        assert_eq!(p.vertices()[1], Vec2i::new(40, 120));   // bottom-left
        assert_eq!(p.vertices()[2], Vec2i::new(160, 120));  // bottom-right
        assert_eq!(p.vertices()[3], Vec2i::new(160, 80));   // top-right
        assert_eq!(p.width(), 120);
        assert_eq!(p.height(), 40);
        assert_eq!(p.material(), Material::NotYet);
    }

    #[test]
    fn test_rect_at_cell_center() {
        let mut ids = IdAllocator::new();
        let p = Platform::rect_at_cell_center(&mut ids, Vec2i::new(60, 60), PlatformKind::Static);

        assert_eq!(p.origin(), Vec2i::new(40, 40));
        assert_eq!(p.width(), DEFAULT_PLATFORM_SIZE);
        assert_eq!(p.height(), DEFAULT_PLATFORM_SIZE);
    }

    #[test]
    fn test_polygon_bounding_box_per_axis() {
        let mut ids = IdAllocator::new();
        // Min x and min y come from different vertices
        let p = Platform::from_vertices(
            &mut ids,
            vec![Vec2i::new(80, 0), Vec2i::new(0, 120), Vec2i::new(200, 40)],
            PlatformKind::Static,
            Material::NotYet,
        );

        assert_eq!(p.origin(), Vec2i::new(0, 0));
        assert_eq!(p.width(), 200);
        assert_eq!(p.height(), 120);
        assert_eq!(p.vertices().len(), 3);
    }

    #[test]
    fn test_contains_point_inclusive_bounds() {
        let mut ids = IdAllocator::new();
        let p = Platform::rect(&mut ids, Vec2i::new(0, 0), 40, 40, PlatformKind::Static);

        assert!(p.contains_point(Vec2i::new(0, 0)));
        assert!(p.contains_point(Vec2i::new(40, 40)));
        assert!(p.contains_point(Vec2i::new(20, 40)));
        assert!(!p.contains_point(Vec2i::new(41, 20)));
        assert!(!p.contains_point(Vec2i::new(20, -1)));
    }

    #[test]
    fn test_identity_equality() {
        let mut ids = IdAllocator::new();
        let a = Platform::rect(&mut ids, Vec2i::new(0, 0), 40, 40, PlatformKind::Static);
        let b = Platform::rect(&mut ids, Vec2i::new(0, 0), 40, 40, PlatformKind::Static);

        assert_ne!(a, b);
        assert_eq!(a, a.clone());
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_enum_tags_round_trip() {
        assert_eq!(Material::from_ordinal(Material::Cloud.ordinal()), Some(Material::Cloud));
        assert_eq!(Material::from_ordinal(7), None);
        assert_eq!(PlatformKind::from_tag(PlatformKind::Anchor.tag()), Some(PlatformKind::Anchor));
        assert_eq!(PlatformKind::from_tag(2), None);
    }
}
