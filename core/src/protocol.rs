//! JSON bodies exchanged between the board client and the server.

use serde::{Deserialize, Serialize};

use crate::moves::MoveRecord;

/// Body of `POST /move`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    #[serde(rename = "move")]
    pub mv: MoveRecord,
}

/// Successful answer to `POST /move`. `best_move` is absent when the
/// player's move ended the game and the engine had nothing to say.
/// `fen` and `status` are extras a minimal server may omit; the client
/// gets by on `best_move` alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResponse {
    #[serde(rename = "bestMove", default, skip_serializing_if = "Option::is_none")]
    pub best_move: Option<String>,
    #[serde(default)]
    pub fen: String,
    #[serde(default)]
    pub status: String,
}

/// Body of `POST /set_difficulty`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyRequest {
    pub difficulty: String,
}

/// Acknowledgment for `POST /set_difficulty`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyResponse {
    pub status: String,
    pub difficulty: String,
}

/// Error body carried by 4xx and 5xx answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_request_wire_shape() {
        let request = MoveRequest {
            mv: MoveRecord {
                from: "e2".to_string(),
                to: "e4".to_string(),
                promotion: "q".to_string(),
            },
        };
        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"move":{"from":"e2","to":"e4","promotion":"q"}}"#
        );
    }

    #[test]
    fn move_response_uses_camel_case_best_move() {
        let response = MoveResponse {
            best_move: Some("e7e5".to_string()),
            fen: "fen goes here".to_string(),
            status: "black_turn".to_string(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains(r#""bestMove":"e7e5""#));
        assert!(!json.contains("best_move"));
    }

    #[test]
    fn finished_game_omits_best_move() {
        let response = MoveResponse {
            best_move: None,
            fen: "fen goes here".to_string(),
            status: "white_wins".to_string(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("bestMove"));

        let parsed: MoveResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.best_move, None);
    }

    #[test]
    fn reply_with_only_best_move_is_complete() {
        let parsed: MoveResponse = serde_json::from_str(r#"{"bestMove":"e7e5"}"#).unwrap();
        assert_eq!(parsed.best_move.as_deref(), Some("e7e5"));
        assert_eq!(parsed.fen, "");
        assert_eq!(parsed.status, "");
    }

    #[test]
    fn difficulty_round_trip() {
        let ack: DifficultyResponse =
            serde_json::from_str(r#"{"status":"success","difficulty":"hard"}"#).unwrap();
        assert_eq!(ack.status, "success");
        assert_eq!(ack.difficulty, "hard");
    }
}
