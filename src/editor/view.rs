//! Editor drawing
//!
//! Immediate-mode rendering of the grid, axis lines, platform outlines, the
//! in-progress edge queue, and the status bar.

use macroquad::prelude::*;
use crate::world::{Platform, PlatformKind, Vec2i, GRID_CELL};
use super::state::EditorState;

/// Editor window width in pixels (32 grid cells)
pub const WINDOW_WIDTH: f32 = 1280.0;
/// Editor window height in pixels (18 grid cells)
pub const WINDOW_HEIGHT: f32 = 720.0;

const GRID_COLS: i32 = 32;
const GRID_ROWS: i32 = 18;

/// Draw one editor frame
pub fn draw(state: &EditorState) {
    clear_background(Color::from_rgba(25, 25, 25, 255));

    draw_gridlines();
    draw_cartesian_axes();

    for platform in state.stage.platforms() {
        draw_platform(platform);
    }
    draw_edge_queue(state.stage.edge_queue());
    draw_start_marker(state.stage.start_position());
    draw_status_bar(state);
}

fn draw_gridlines() {
    let color = Color::from_rgba(33, 33, 33, 255);
    for col in 0..=GRID_COLS {
        let x = (col * GRID_CELL) as f32;
        draw_line(x, 0.0, x, WINDOW_HEIGHT, 1.0, color);
    }
    for row in 0..=GRID_ROWS {
        let y = (row * GRID_CELL) as f32;
        draw_line(0.0, y, WINDOW_WIDTH, y, 1.0, color);
    }
}

fn draw_cartesian_axes() {
    draw_line(0.0, WINDOW_HEIGHT / 2.0, WINDOW_WIDTH, WINDOW_HEIGHT / 2.0, 1.0, RED);
    draw_line(WINDOW_WIDTH / 2.0, 0.0, WINDOW_WIDTH / 2.0, WINDOW_HEIGHT, 1.0, Color::from_rgba(0, 255, 60, 255));
}

fn platform_color(platform: &Platform) -> Color {
    if platform.is_selected() {
        GREEN
    } else if platform.kind() == PlatformKind::Anchor {
        MAGENTA
    } else {
        WHITE
    }
}

/// Outline the platform polygon, closing the loop back to the first vertex
fn draw_platform(platform: &Platform) {
    let color = platform_color(platform);
    let vertices = platform.vertices();
    for (i, v) in vertices.iter().enumerate() {
        let next = vertices[(i + 1) % vertices.len()];
        draw_line(v.x as f32, v.y as f32, next.x as f32, next.y as f32, 1.0, color);
    }
}

fn draw_edge_queue(points: &[Vec2i]) {
    for p in points {
        draw_circle(p.x as f32, p.y as f32, 2.0, WHITE);
    }
}

fn draw_start_marker(start: Vec2i) {
    draw_circle_lines(
        (start.x + GRID_CELL / 2) as f32,
        (start.y + GRID_CELL / 2) as f32,
        6.0,
        1.0,
        YELLOW,
    );
}

fn draw_status_bar(state: &EditorState) {
    if let Some(msg) = state.get_status() {
        draw_text(msg, 8.0, WINDOW_HEIGHT - 8.0, 14.0, WHITE);
    }
}
