//! Stage: the aggregate editor state
//!
//! Owns the working platform list, the in-progress polygon edge queue, the
//! player start position, and the screens accumulated since the last flush.
//! All mutation happens synchronously from the editor's input loop.

use std::path::Path;
use serde::{Serialize, Deserialize};
use super::geometry::Vec2i;
use super::level::{self, LevelError};
use super::platform::{IdAllocator, Material, Platform, PlatformId, PlatformKind};
use super::screen::{to_export_space, ExportPlatform, Screen};

/// Grid cell size in pixels
pub const GRID_CELL: i32 = 40;

/// Error type for Stage operations
#[derive(Debug)]
pub enum StageError {
    /// Precondition violated (empty selection, empty queue, nothing to export)
    InvalidOperation(&'static str),
    /// Level file I/O or format failure during flush
    Level(LevelError),
}

impl From<LevelError> for StageError {
    fn from(e: LevelError) -> Self {
        StageError::Level(e)
    }
}

impl std::fmt::Display for StageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StageError::InvalidOperation(msg) => write!(f, "Invalid operation: {}", msg),
            StageError::Level(e) => write!(f, "{}", e),
        }
    }
}

/// The editor's working state
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Stage {
    platforms: Vec<Platform>,
    edge_queue: Vec<Vec2i>,
    start_position: Vec2i,
    screens: Vec<Screen>,
    ids: IdAllocator,
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    pub fn edge_queue(&self) -> &[Vec2i] {
        &self.edge_queue
    }

    pub fn start_position(&self) -> Vec2i {
        self.start_position
    }

    pub fn screens(&self) -> &[Screen] {
        &self.screens
    }

    pub fn add_platform(&mut self, platform: Platform) {
        self.platforms.push(platform);
    }

    /// Place a default-size rectangle in the grid cell under the cursor
    pub fn place_cell_platform(&mut self, mouse_px: Vec2i) {
        let corner = mouse_px.snap_to_grid(GRID_CELL);
        let center = Vec2i::new(corner.x + GRID_CELL / 2, corner.y + GRID_CELL / 2);
        let platform = Platform::rect_at_cell_center(&mut self.ids, center, PlatformKind::Static);
        println!(
            "Placed {}x{} platform at ({}, {})",
            platform.width(), platform.height(), platform.origin().x, platform.origin().y
        );
        self.add_platform(platform);
    }

    /// Toggle selection of every platform whose bounding box contains `p`
    pub fn toggle_select_at(&mut self, p: Vec2i) {
        for platform in &mut self.platforms {
            if platform.contains_point(p) {
                if platform.is_selected() {
                    platform.deselect();
                } else {
                    platform.select();
                }
            }
        }
    }

    /// Remove every selected platform. Stable filter pass, so any number of
    /// selections is removed without skipping entries.
    pub fn delete_selected(&mut self) {
        self.platforms.retain(|p| !p.is_selected());
    }

    /// Remove every platform whose id is in `ids`
    pub fn delete_platforms(&mut self, ids: &[PlatformId]) {
        self.platforms.retain(|p| !ids.contains(&p.id()));
    }

    /// Set the selected platforms' type (the "A" key retypes to Anchor)
    pub fn set_selected_kind(&mut self, kind: PlatformKind) {
        for platform in &mut self.platforms {
            if platform.is_selected() {
                platform.set_kind(kind);
            }
        }
    }

    /// Snap the click to the grid and store the cell's top-left corner
    pub fn set_start_position(&mut self, mouse_px: Vec2i) {
        self.start_position = mouse_px.snap_to_grid(GRID_CELL);
        println!(
            "Player start position placed at: {} | {}",
            self.start_position.x, self.start_position.y
        );
    }

    /// Append a grid-snapped point to the polygon edge queue
    pub fn begin_edge_capture(&mut self, point_px: Vec2i) {
        let point = point_px.snap_to_grid(GRID_CELL);
        println!("Edge point ({}, {}) added to queue", point.x, point.y);
        self.edge_queue.push(point);
    }

    pub fn clear_edge_queue(&mut self) {
        self.edge_queue.clear();
    }

    /// Turn the queued edge points into one polygon platform
    pub fn commit_edge_capture(&mut self, kind: PlatformKind) -> Result<(), StageError> {
        if self.edge_queue.is_empty() {
            return Err(StageError::InvalidOperation("edge queue is empty"));
        }
        let vertices = std::mem::take(&mut self.edge_queue);
        let platform = Platform::from_vertices(&mut self.ids, vertices, kind, Material::NotYet);
        self.add_platform(platform);
        Ok(())
    }

    /// Replace the selected platforms with a single rectangle covering their
    /// union bounding box
    pub fn merge_selected_into_rect(&mut self) -> Result<(), StageError> {
        let selected: Vec<&Platform> = self.platforms.iter().filter(|p| p.is_selected()).collect();
        let Some(first) = selected.first() else {
            return Err(StageError::InvalidOperation("no platforms selected to merge"));
        };

        let mut lower = first.origin();
        let mut upper = Vec2i::new(lower.x + first.width(), lower.y + first.height());
        for platform in &selected {
            let origin = platform.origin();
            lower.x = lower.x.min(origin.x);
            lower.y = lower.y.min(origin.y);
            upper.x = upper.x.max(origin.x + platform.width());
            upper.y = upper.y.max(origin.y + platform.height());
        }
        let ids: Vec<PlatformId> = selected.iter().map(|p| p.id()).collect();

        let merged = Platform::rect(
            &mut self.ids,
            lower,
            upper.x - lower.x,
            upper.y - lower.y,
            PlatformKind::Static,
        );
        self.add_platform(merged);
        self.delete_platforms(&ids);
        Ok(())
    }

    /// Snapshot the working platforms into an export-space Screen.
    ///
    /// If any platform is an Anchor, the exported order is rotated so the
    /// first Anchor leads the list; everything before it shifts to the end in
    /// original relative order. Clears the working list and edge queue.
    pub fn export_screen(&mut self) -> Result<(), StageError> {
        if self.platforms.is_empty() {
            return Err(StageError::InvalidOperation("no platforms to export"));
        }

        let mut platforms: Vec<ExportPlatform> =
            self.platforms.iter().map(ExportPlatform::from_platform).collect();
        if let Some(anchor) = self.platforms.iter().position(|p| p.kind() == PlatformKind::Anchor) {
            platforms.rotate_left(anchor);
        }

        println!("Exporting screen with {} platforms", platforms.len());
        self.screens.push(Screen {
            start_position: to_export_space(self.start_position.into()),
            platforms,
        });
        self.platforms.clear();
        self.edge_queue.clear();
        Ok(())
    }

    /// Write all accumulated screens to a binary level file.
    /// Screens are only dropped after a confirmed successful write.
    pub fn flush_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<usize, StageError> {
        if self.screens.is_empty() {
            return Err(StageError::InvalidOperation("no screens accumulated to flush"));
        }
        level::save_screens(path, &self.screens)?;
        let written = self.screens.len();
        self.screens.clear();
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::geometry::Vec2;

    fn assert_vec2_eq(a: Vec2, b: Vec2) {
        assert!((a.x - b.x).abs() < 0.001, "x: {} != {}", a.x, b.x);
        assert!((a.y - b.y).abs() < 0.001, "y: {} != {}", a.y, b.y);
    }

    fn stage_with_rects(origins: &[(i32, i32)]) -> Stage {
        let mut stage = Stage::new();
        for &(x, y) in origins {
            // Click inside the target cell; placement snaps to the cell
            stage.place_cell_platform(Vec2i::new(x + 1, y + 1));
        }
        stage
    }

    #[test]
    fn test_delete_selected_removes_exactly_the_selected() {
        let mut stage = stage_with_rects(&[(0, 0), (40, 0), (80, 0), (120, 0)]);
        stage.toggle_select_at(Vec2i::new(20, 20));
        stage.toggle_select_at(Vec2i::new(100, 20));

        stage.delete_selected();

        assert_eq!(stage.platforms().len(), 2);
        assert!(stage.platforms().iter().all(|p| !p.is_selected()));
        let origins: Vec<Vec2i> = stage.platforms().iter().map(|p| p.origin()).collect();
        assert_eq!(origins, vec![Vec2i::new(40, 0), Vec2i::new(120, 0)]);
    }

    #[test]
    fn test_delete_all_selected_when_every_platform_is_selected() {
        let mut stage = stage_with_rects(&[(0, 0), (40, 0), (80, 0)]);
        for x in [20, 60, 100] {
            stage.toggle_select_at(Vec2i::new(x, 20));
        }

        stage.delete_selected();
        assert!(stage.platforms().is_empty());
    }

    #[test]
    fn test_toggle_select_is_a_toggle() {
        let mut stage = stage_with_rects(&[(0, 0)]);
        stage.toggle_select_at(Vec2i::new(20, 20));
        assert!(stage.platforms()[0].is_selected());
        stage.toggle_select_at(Vec2i::new(20, 20));
        assert!(!stage.platforms()[0].is_selected());
    }

    #[test]
    fn test_set_start_position_snaps_to_cell() {
        let mut stage = Stage::new();
        stage.set_start_position(Vec2i::new(199, 77));
        assert_eq!(stage.start_position(), Vec2i::new(160, 40));
    }

    #[test]
    fn test_commit_edge_capture_builds_polygon_and_clears_queue() {
        let mut stage = Stage::new();
        stage.begin_edge_capture(Vec2i::new(45, 45));
        stage.begin_edge_capture(Vec2i::new(125, 45));
        stage.begin_edge_capture(Vec2i::new(85, 125));

        stage.commit_edge_capture(PlatformKind::Static).unwrap();

        assert!(stage.edge_queue().is_empty());
        assert_eq!(stage.platforms().len(), 1);
        let p = &stage.platforms()[0];
        assert_eq!(p.vertices(), &[Vec2i::new(40, 40), Vec2i::new(120, 40), Vec2i::new(80, 120)]);
        assert_eq!(p.origin(), Vec2i::new(40, 40));
        assert_eq!(p.width(), 80);
        assert_eq!(p.height(), 80);
    }

    #[test]
    fn test_commit_empty_edge_queue_fails() {
        let mut stage = Stage::new();
        assert!(matches!(
            stage.commit_edge_capture(PlatformKind::Static),
            Err(StageError::InvalidOperation(_))
        ));
        assert!(stage.platforms().is_empty());
    }

    #[test]
    fn test_merge_with_empty_selection_fails_and_leaves_stage_unchanged() {
        let mut stage = stage_with_rects(&[(0, 0), (40, 0)]);

        assert!(matches!(
            stage.merge_selected_into_rect(),
            Err(StageError::InvalidOperation(_))
        ));
        assert_eq!(stage.platforms().len(), 2);
    }

    #[test]
    fn test_merge_selected_covers_union_bounding_box() {
        let mut stage = stage_with_rects(&[(0, 0), (80, 40)]);
        stage.toggle_select_at(Vec2i::new(20, 20));
        stage.toggle_select_at(Vec2i::new(100, 60));

        stage.merge_selected_into_rect().unwrap();

        assert_eq!(stage.platforms().len(), 1);
        let merged = &stage.platforms()[0];
        assert_eq!(merged.origin(), Vec2i::new(0, 0));
        assert_eq!(merged.width(), 120);
        assert_eq!(merged.height(), 80);
        assert!(!merged.is_selected());
    }

    #[test]
    fn test_export_empty_stage_fails() {
        let mut stage = Stage::new();
        assert!(matches!(
            stage.export_screen(),
            Err(StageError::InvalidOperation(_))
        ));
        assert!(stage.screens().is_empty());
    }

    #[test]
    fn test_export_preserves_order_without_anchor() {
        let mut stage = stage_with_rects(&[(0, 0), (40, 0), (80, 0)]);
        stage.export_screen().unwrap();

        let screen = &stage.screens()[0];
        assert_eq!(screen.platforms.len(), 3);
        assert_vec2_eq(screen.platforms[0].vertices[0], to_export_space(Vec2::new(0.0, 0.0)));
        assert_vec2_eq(screen.platforms[1].vertices[0], to_export_space(Vec2::new(40.0, 0.0)));
        assert_vec2_eq(screen.platforms[2].vertices[0], to_export_space(Vec2::new(80.0, 0.0)));
        assert!(stage.platforms().is_empty());
    }

    #[test]
    fn test_export_rotates_first_anchor_to_front() {
        let mut stage = stage_with_rects(&[(0, 0), (40, 0), (80, 0), (120, 0)]);
        // Select and retype the third platform, then deselect it
        stage.toggle_select_at(Vec2i::new(100, 20));
        stage.set_selected_kind(PlatformKind::Anchor);
        stage.toggle_select_at(Vec2i::new(100, 20));

        stage.export_screen().unwrap();

        let screen = &stage.screens()[0];
        assert_eq!(screen.platforms[0].kind_tag, 1);
        // Stable rotation: [0, 1, A, 3] -> [A, 3, 0, 1]
        assert_vec2_eq(screen.platforms[0].vertices[0], to_export_space(Vec2::new(80.0, 0.0)));
        assert_vec2_eq(screen.platforms[1].vertices[0], to_export_space(Vec2::new(120.0, 0.0)));
        assert_vec2_eq(screen.platforms[2].vertices[0], to_export_space(Vec2::new(0.0, 0.0)));
        assert_vec2_eq(screen.platforms[3].vertices[0], to_export_space(Vec2::new(40.0, 0.0)));
    }

    #[test]
    fn test_two_cell_scenario_exports_transformed_coordinates() {
        // Platforms in cells (0,0) and (40,0): origins (0,0) and (40,0),
        // centers offset by 20 per the cell-center construction rule.
        let mut stage = Stage::new();
        stage.place_cell_platform(Vec2i::new(10, 10));
        stage.place_cell_platform(Vec2i::new(50, 10));
        assert_eq!(stage.platforms()[0].origin(), Vec2i::new(0, 0));
        assert_eq!(stage.platforms()[1].origin(), Vec2i::new(40, 0));

        stage.export_screen().unwrap();

        let screen = &stage.screens()[0];
        assert_eq!(screen.platforms.len(), 2);
        for (export, raw) in screen.platforms[1].vertices.iter().zip([
            Vec2::new(40.0, 0.0),
            Vec2::new(40.0, 40.0),
            Vec2::new(80.0, 40.0),
            Vec2::new(80.0, 0.0),
        ]) {
            assert_vec2_eq(*export, to_export_space(raw));
        }
    }

    #[test]
    fn test_flush_with_no_screens_fails() {
        let mut stage = Stage::new();
        assert!(matches!(
            stage.flush_to_file("unused.bin"),
            Err(StageError::InvalidOperation(_))
        ));
    }

    #[test]
    fn test_flush_failure_keeps_accumulated_screens() {
        let mut stage = stage_with_rects(&[(0, 0)]);
        stage.export_screen().unwrap();

        let result = stage.flush_to_file("/nonexistent-dir/Level_0.bin");
        assert!(matches!(result, Err(StageError::Level(LevelError::IoError(_)))));
        assert_eq!(stage.screens().len(), 1);
    }

    #[test]
    fn test_flush_clears_screens_after_successful_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Level_0.bin");
        let mut stage = stage_with_rects(&[(0, 0)]);
        stage.export_screen().unwrap();
        stage.place_cell_platform(Vec2i::new(90, 90));
        stage.export_screen().unwrap();

        let written = stage.flush_to_file(&path).unwrap();
        assert_eq!(written, 2);
        assert!(stage.screens().is_empty());

        let loaded = level::load_screens(&path).unwrap();
        assert_eq!(loaded.len(), 2);
    }

    #[test]
    fn test_full_round_trip_applies_transform_exactly_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Level_0.bin");

        let mut stage = Stage::new();
        stage.place_cell_platform(Vec2i::new(650, 370));
        stage.set_start_position(Vec2i::new(650, 370));
        stage.export_screen().unwrap();
        stage.flush_to_file(&path).unwrap();

        let loaded = level::load_screens(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        // Cell (16, 9) top-left corner is (640, 360); transformed once that
        // is the export-space origin.
        assert_vec2_eq(loaded[0].start_position, Vec2::new(0.0, 0.0));
        assert_vec2_eq(loaded[0].platforms[0].vertices[0], Vec2::new(0.0, 0.0));
        assert_vec2_eq(loaded[0].platforms[0].vertices[2], Vec2::new(0.5, -0.5));
    }
}
