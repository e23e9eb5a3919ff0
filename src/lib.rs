pub mod board;
pub mod game;
pub mod history;
pub mod piece;
pub mod rules;
pub mod stats;

pub use board::*;
pub use game::*;
pub use history::*;
pub use piece::*;
pub use rules::*;
pub use stats::*;
