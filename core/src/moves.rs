//! Move records as they travel over the wire, and their validation.

use std::fmt;
use std::str::FromStr;

use chess::{Piece, Square};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A move the way the board client reports it: source and destination
/// squares in algebraic form, plus the piece to promote to when the
/// move happens to be a promotion. The client always asks for a queen;
/// the field only matters when a pawn reaches the last rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub from: String,
    pub to: String,
    #[serde(default = "default_promotion")]
    pub promotion: String,
}

fn default_promotion() -> String {
    "q".to_string()
}

impl MoveRecord {
    /// Record for dragging a piece from `from` to `to`, promoting to a
    /// queen if the move turns out to be a promotion.
    pub fn queen_promoting(from: Square, to: Square) -> Self {
        MoveRecord {
            from: from.to_string(),
            to: to.to_string(),
            promotion: "q".to_string(),
        }
    }

    /// Validate the record into typed squares and a promotion piece.
    pub fn parse(&self) -> Result<ParsedMove, MoveParseError> {
        let from = Square::from_str(&self.from.to_lowercase())
            .map_err(|_| MoveParseError::BadSquare(self.from.clone()))?;
        let to = Square::from_str(&self.to.to_lowercase())
            .map_err(|_| MoveParseError::BadSquare(self.to.clone()))?;
        let promotion = match self.promotion.to_lowercase().as_str() {
            "" | "q" => Piece::Queen,
            "r" => Piece::Rook,
            "b" => Piece::Bishop,
            "n" => Piece::Knight,
            _ => return Err(MoveParseError::BadPromotion(self.promotion.clone())),
        };
        Ok(ParsedMove {
            from,
            to,
            promotion,
        })
    }
}

impl fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

/// A validated move record. The promotion piece is only attached to the
/// actual chess move when the pawn really reaches the last rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Piece,
}

impl fmt::Display for ParsedMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

/// Rejection reasons for a wire move that never reaches the rules
/// library.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveParseError {
    #[error("invalid square \"{0}\"")]
    BadSquare(String),
    #[error("invalid promotion piece \"{0}\"")]
    BadPromotion(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_squares() {
        let record = MoveRecord {
            from: "e2".to_string(),
            to: "e4".to_string(),
            promotion: "q".to_string(),
        };
        let parsed = record.parse().unwrap();
        assert_eq!(parsed.from, Square::E2);
        assert_eq!(parsed.to, Square::E4);
        assert_eq!(parsed.promotion, Piece::Queen);
    }

    #[test]
    fn accepts_uppercase_input() {
        let record = MoveRecord {
            from: "G1".to_string(),
            to: "F3".to_string(),
            promotion: "N".to_string(),
        };
        let parsed = record.parse().unwrap();
        assert_eq!(parsed.from, Square::G1);
        assert_eq!(parsed.promotion, Piece::Knight);
    }

    #[test]
    fn rejects_garbage_squares() {
        let record = MoveRecord {
            from: "e9".to_string(),
            to: "e4".to_string(),
            promotion: "q".to_string(),
        };
        assert_eq!(
            record.parse(),
            Err(MoveParseError::BadSquare("e9".to_string()))
        );

        let record = MoveRecord {
            from: "e2".to_string(),
            to: "zz".to_string(),
            promotion: "q".to_string(),
        };
        assert_eq!(
            record.parse(),
            Err(MoveParseError::BadSquare("zz".to_string()))
        );
    }

    #[test]
    fn rejects_unknown_promotion_piece() {
        let record = MoveRecord {
            from: "e7".to_string(),
            to: "e8".to_string(),
            promotion: "k".to_string(),
        };
        assert_eq!(
            record.parse(),
            Err(MoveParseError::BadPromotion("k".to_string()))
        );
    }

    #[test]
    fn missing_promotion_defaults_to_queen() {
        let record: MoveRecord = serde_json::from_str(r#"{"from":"a7","to":"a8"}"#).unwrap();
        assert_eq!(record.promotion, "q");
        assert_eq!(record.parse().unwrap().promotion, Piece::Queen);
    }
}
