//! NOT YET level editor
//!
//! An interactive 2D level-geometry editor: place, select, and merge
//! grid-snapped platform shapes, capture free-form polygons, then export
//! screens to the binary level format the game runtime consumes.
//!
//! Controls:
//! - Shift + left click: place a platform in the clicked cell
//! - "S" + left click: set the player start position
//! - Ctrl + left click: append a polygon vertex; Ctrl+"C" commits, releasing
//!   Ctrl abandons the capture
//! - Right click: toggle selection; Delete removes the selection
//! - "A": retype selection to Anchor; "M": merge selection into one rect
//! - "E": export the working platforms into a screen
//! - Shift+"R": flush accumulated screens to Level_<n>.bin
//! - Ctrl+"S" / Ctrl+"L": save / load the working session

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod editor;
mod world;

use macroquad::prelude::*;
use editor::EditorState;

fn window_conf() -> Conf {
    Conf {
        window_title: format!("Not Yet Level Editor v{}", VERSION),
        window_width: editor::WINDOW_WIDTH as i32,
        window_height: editor::WINDOW_HEIGHT as i32,
        window_resizable: false,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    // Initialize crash logging first
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    let mut state = EditorState::new();
    println!("=== NOT YET LEVEL EDITOR v{} ===", VERSION);

    loop {
        editor::handle_input(&mut state);
        editor::draw(&state);
        next_frame().await
    }
}
