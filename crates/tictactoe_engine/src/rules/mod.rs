//! Game rules for tic-tac-toe.
//!
//! Pure functions over [`Board`](crate::Board) snapshots. Nothing here keeps
//! state between calls.

pub mod draw;
pub mod win;

pub use draw::{is_draw, is_full};
pub use win::{Line, Outcome, check_winner, evaluate};
