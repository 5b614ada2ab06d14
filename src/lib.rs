pub mod board;
pub mod engine;
pub mod player;

pub use board::*;
pub use engine::*;
pub use player::*;
