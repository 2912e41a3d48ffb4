//! Editor state and data

use std::path::PathBuf;
use crate::world::Stage;

/// Fixed path for working-session save/load
pub const SESSION_PATH: &str = "Session.ron";

/// Top-level editor session state
pub struct EditorState {
    /// The working level geometry
    pub stage: Stage,
    /// Next `Level_<n>.bin` number, incremented per flush within the process
    flush_counter: u32,
    /// Current status message and its expiry time
    status_message: Option<(String, f64)>,
}

impl EditorState {
    pub fn new() -> Self {
        Self {
            stage: Stage::new(),
            flush_counter: 0,
            status_message: None,
        }
    }

    /// Set a status message that displays for `duration_secs`
    pub fn set_status(&mut self, message: &str, duration_secs: f64) {
        let expiry = macroquad::time::get_time() + duration_secs;
        self.status_message = Some((message.to_string(), expiry));
    }

    /// Get current status message if not expired
    pub fn get_status(&self) -> Option<&str> {
        if let Some((msg, expiry)) = &self.status_message {
            if macroquad::time::get_time() < *expiry {
                return Some(msg);
            }
        }
        None
    }

    /// Path for the next flush, numbered per flush within the process
    pub fn flush_path(&self) -> PathBuf {
        PathBuf::from(format!("Level_{}.bin", self.flush_counter))
    }

    /// Advance the flush number after a confirmed successful write
    pub fn mark_flushed(&mut self) {
        self.flush_counter += 1;
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new()
    }
}
