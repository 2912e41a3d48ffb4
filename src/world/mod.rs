//! World module - the editor's level-geometry model
//!
//! Platforms on a fixed 1280x720 pixel grid, the Stage aggregate that owns
//! the working state, export-space screens, and the binary level format the
//! game runtime consumes.
//!
//! Note: some API items are exercised only by the loaders and tests but are
//! part of the intended runtime-facing API.

#![allow(dead_code)]

mod geometry;
mod level;
mod platform;
mod screen;
mod session;
mod stage;

pub use geometry::*;
pub use level::*;
pub use platform::*;
pub use screen::*;
pub use session::*;
pub use stage::*;
