//! Shared pieces of the chess-vs-engine project: the game session both
//! sides keep, the JSON bodies they exchange, and the status rules that
//! drive the player-facing display.

pub mod difficulty;
pub mod moves;
pub mod protocol;
pub mod san;
pub mod session;
pub mod status;

pub use difficulty::Difficulty;
pub use moves::{MoveRecord, ParsedMove};
pub use session::GameSession;
pub use status::DisplayStatus;
