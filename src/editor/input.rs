//! Input mapping for the editor loop
//!
//! Translates macroquad mouse/keyboard state into Stage operations, once per
//! frame. Recoverable errors land on the status line and the console; the
//! loop always continues.

use macroquad::prelude::*;
use crate::world::{load_session, save_session, PlatformKind, StageError, Vec2i};
use super::state::{EditorState, SESSION_PATH};

fn mouse_px() -> Vec2i {
    let (x, y) = mouse_position();
    Vec2i::new(x as i32, y as i32)
}

fn report(state: &mut EditorState, error: &StageError) {
    eprintln!("{}", error);
    state.set_status(&error.to_string(), 3.0);
}

/// Handle one frame of editor input
pub fn handle_input(state: &mut EditorState) {
    let ctrl = is_key_down(KeyCode::LeftControl) || is_key_down(KeyCode::RightControl);
    let shift = is_key_down(KeyCode::LeftShift) || is_key_down(KeyCode::RightShift);

    if is_mouse_button_pressed(MouseButton::Left) {
        if shift {
            state.stage.place_cell_platform(mouse_px());
        } else if is_key_down(KeyCode::S) {
            state.stage.set_start_position(mouse_px());
            let start = state.stage.start_position();
            state.set_status(&format!("Start position: ({}, {})", start.x, start.y), 2.0);
        } else if ctrl {
            state.stage.begin_edge_capture(mouse_px());
        }
    }

    if is_mouse_button_pressed(MouseButton::Right) {
        state.stage.toggle_select_at(mouse_px());
    }

    if is_key_pressed(KeyCode::Delete) {
        state.stage.delete_selected();
    }

    if ctrl && is_key_pressed(KeyCode::C) {
        match state.stage.commit_edge_capture(PlatformKind::Static) {
            Ok(()) => state.set_status("Committed edge queue into a platform", 2.0),
            Err(e) => report(state, &e),
        }
    }

    if is_key_pressed(KeyCode::A) {
        state.stage.set_selected_kind(PlatformKind::Anchor);
    }

    if is_key_pressed(KeyCode::E) {
        match state.stage.export_screen() {
            Ok(()) => {
                let count = state.stage.screens().len();
                state.set_status(&format!("Exported screen {}", count), 2.0);
            }
            Err(e) => report(state, &e),
        }
    }

    if is_key_pressed(KeyCode::M) {
        match state.stage.merge_selected_into_rect() {
            Ok(()) => state.set_status("Merged selection into one platform", 2.0),
            Err(e) => report(state, &e),
        }
    }

    if shift && is_key_pressed(KeyCode::R) {
        let path = state.flush_path();
        match state.stage.flush_to_file(&path) {
            Ok(written) => {
                state.mark_flushed();
                println!("Wrote {} screens to {}", written, path.display());
                state.set_status(&format!("Wrote {} screens to {}", written, path.display()), 3.0);
            }
            Err(e) => report(state, &e),
        }
    }

    if ctrl && is_key_pressed(KeyCode::S) {
        match save_session(&state.stage, SESSION_PATH) {
            Ok(()) => state.set_status(&format!("Session saved to {}", SESSION_PATH), 2.0),
            Err(e) => {
                eprintln!("Failed to save session: {}", e);
                state.set_status(&format!("Failed to save session: {}", e), 3.0);
            }
        }
    }

    if ctrl && is_key_pressed(KeyCode::L) {
        match load_session(SESSION_PATH) {
            Ok(stage) => {
                state.stage = stage;
                state.set_status(&format!("Session loaded from {}", SESSION_PATH), 2.0);
            }
            Err(e) => {
                eprintln!("Failed to load session: {}", e);
                state.set_status(&format!("Failed to load session: {}", e), 3.0);
            }
        }
    }

    // Releasing Ctrl abandons the in-progress polygon capture
    if is_key_released(KeyCode::LeftControl) || is_key_released(KeyCode::RightControl) {
        state.stage.clear_edge_queue();
    }
}
