//! Interactive editor layer
//!
//! Thin macroquad wrapper over the world model:
//! - input mapping (mouse + keyboard state to Stage operations)
//! - grid/axis/platform drawing
//! - status line

mod input;
mod state;
mod view;

pub use input::*;
pub use state::*;
pub use view::*;
