//! Cursor positions, logical motion and caret geometry.

mod model;
mod movement;
mod position;

pub use model::{Caret, CursorModel};
pub use movement::CursorMovement;
pub use position::{CursorAffinity, CursorPosition};
