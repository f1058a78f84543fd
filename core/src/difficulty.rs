//! Difficulty presets offered in the client's selector.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// How hard the engine tries. Each level maps to the search depth the
/// server hands to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Difficulty {
    #[default]
    Easy,
    Hard,
    Master,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Hard, Difficulty::Master];

    pub fn search_depth(self) -> u8 {
        match self {
            Difficulty::Easy => 2,
            Difficulty::Hard => 4,
            Difficulty::Master => 6,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Hard => "hard",
            Difficulty::Master => "master",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid difficulty level. Choose 'easy', 'hard', or 'master'.")]
pub struct UnknownDifficulty;

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "hard" => Ok(Difficulty::Hard),
            "master" => Ok(Difficulty::Master),
            _ => Err(UnknownDifficulty),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_grows_with_level() {
        assert_eq!(Difficulty::Easy.search_depth(), 2);
        assert_eq!(Difficulty::Hard.search_depth(), 4);
        assert_eq!(Difficulty::Master.search_depth(), 6);
    }

    #[test]
    fn parses_known_levels() {
        assert_eq!("easy".parse(), Ok(Difficulty::Easy));
        assert_eq!(" Master ".parse(), Ok(Difficulty::Master));
        assert_eq!("HARD".parse(), Ok(Difficulty::Hard));
    }

    #[test]
    fn rejects_unknown_levels_with_a_readable_message() {
        let err = "grandmaster".parse::<Difficulty>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid difficulty level. Choose 'easy', 'hard', or 'master'."
        );
    }

    #[test]
    fn round_trips_through_display() {
        for level in Difficulty::ALL {
            assert_eq!(level.as_str().parse(), Ok(level));
        }
    }
}
