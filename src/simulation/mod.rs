pub mod game;

pub use game::{Game, GameEvent, TurnSummary};
