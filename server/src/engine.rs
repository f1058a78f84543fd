//! Where reply moves come from: an external UCI engine, or a random
//! mover when no engine is configured.

use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::str::FromStr;

use chess::{Board, ChessMove, MoveGen};
use log::{debug, info};
use rand::seq::SliceRandom;

use chess_vs_engine_core::Difficulty;

/// Source of reply moves. All chess knowledge sits behind this
/// boundary; the server only hands over positions and difficulty.
pub trait MoveProvider: Send {
    /// Best move in the position given as FEN, or `None` when the
    /// engine has no move to play there.
    fn best_move(&mut self, fen: &str, difficulty: Difficulty) -> io::Result<Option<ChessMove>>;

    fn name(&self) -> &str;
}

/// Uniform random choice among the legal moves. Stands in for a real
/// engine so the server works out of the box.
pub struct RandomMover;

impl MoveProvider for RandomMover {
    fn best_move(&mut self, fen: &str, _difficulty: Difficulty) -> io::Result<Option<ChessMove>> {
        let board = Board::from_str(fen)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
        let moves: Vec<ChessMove> = MoveGen::new_legal(&board).collect();
        Ok(moves.choose(&mut rand::thread_rng()).copied())
    }

    fn name(&self) -> &str {
        "random"
    }
}

/// A UCI engine running as a child process, driven over stdin/stdout.
pub struct UciEngine {
    child: Child,
    stdin: BufWriter<ChildStdin>,
    stdout: BufReader<ChildStdout>,
    name: String,
}

impl UciEngine {
    /// Start the engine binary at `path` and run the UCI handshake.
    pub fn spawn(path: &str) -> io::Result<Self> {
        let mut child = Command::new(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "engine stdin unavailable"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "engine stdout unavailable"))?;

        let mut engine = UciEngine {
            child,
            stdin: BufWriter::new(stdin),
            stdout: BufReader::new(stdout),
            name: "uci".to_string(),
        };
        engine.send("uci")?;
        engine.wait_for("uciok")?;
        engine.send("ucinewgame")?;
        engine.send("isready")?;
        engine.wait_for("readyok")?;
        info!("UCI handshake complete with {}", engine.name);
        Ok(engine)
    }

    fn send(&mut self, command: &str) -> io::Result<()> {
        debug!(">> {}", command);
        writeln!(self.stdin, "{}", command)?;
        self.stdin.flush()
    }

    fn read_line(&mut self) -> io::Result<String> {
        let mut line = String::new();
        let read = self.stdout.read_line(&mut line)?;
        if read == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "engine closed its pipe",
            ));
        }
        debug!("<< {}", line.trim_end());
        Ok(line)
    }

    /// Drain engine output until `token` shows up on its own line,
    /// remembering the engine's advertised name along the way.
    fn wait_for(&mut self, token: &str) -> io::Result<()> {
        loop {
            let line = self.read_line()?;
            let line = line.trim();
            if let Some(name) = line.strip_prefix("id name ") {
                self.name = name.to_string();
            }
            if line == token {
                return Ok(());
            }
        }
    }
}

impl MoveProvider for UciEngine {
    fn best_move(&mut self, fen: &str, difficulty: Difficulty) -> io::Result<Option<ChessMove>> {
        self.send(&format!("position fen {}", fen))?;
        self.send(&format!("go depth {}", difficulty.search_depth()))?;
        loop {
            let line = self.read_line()?;
            if line.trim_start().starts_with("bestmove") {
                return parse_bestmove(line.trim());
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for UciEngine {
    fn drop(&mut self) {
        let _ = self.send("quit");
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Extract the move from a `bestmove ...` line. `(none)` means the
/// engine sees no legal move.
fn parse_bestmove(line: &str) -> io::Result<Option<ChessMove>> {
    let mut parts = line.split_whitespace();
    parts.next(); // the "bestmove" keyword
    match parts.next() {
        None => Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "truncated bestmove line",
        )),
        Some("(none)") => Ok(None),
        Some(text) => ChessMove::from_str(text).map(Some).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("unparseable engine move \"{}\"", text),
            )
        }),
    }
}

/// Plays back a fixed list of replies. Test double for the routes.
#[cfg(test)]
pub struct ScriptedProvider {
    replies: std::collections::VecDeque<&'static str>,
}

#[cfg(test)]
impl ScriptedProvider {
    pub fn new(replies: &[&'static str]) -> Self {
        ScriptedProvider {
            replies: replies.iter().copied().collect(),
        }
    }
}

#[cfg(test)]
impl MoveProvider for ScriptedProvider {
    fn best_move(&mut self, _fen: &str, _difficulty: Difficulty) -> io::Result<Option<ChessMove>> {
        let text = self.replies.pop_front().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidData, "scripted replies exhausted")
        })?;
        ChessMove::from_str(text)
            .map(Some)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "bad scripted move"))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
