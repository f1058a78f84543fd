//! Talking to the server: message types between the UI and the worker
//! thread that does the actual HTTP.

use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use log::{error, info, warn};

use chess_vs_engine_core::moves::MoveRecord;
use chess_vs_engine_core::protocol::{
    DifficultyRequest, DifficultyResponse, ErrorResponse, MoveRequest, MoveResponse,
};
use chess_vs_engine_core::Difficulty;

/// Requests the UI hands to the network worker.
#[derive(Debug, Clone)]
pub enum UiToServer {
    SubmitMove(MoveRecord),
    SetDifficulty(Difficulty),
}

/// Results the worker hands back to the UI.
#[derive(Debug, Clone)]
pub enum ServerToUi {
    MoveReply(MoveResponse),
    MoveFailed(String),
    DifficultyFailed(String),
}

/// Spawn the worker thread. It serializes all HTTP traffic, one
/// request at a time, wakes the UI after each delivered message, and
/// dies when either channel closes.
pub fn spawn_worker(
    server_url: String,
    rx: Receiver<UiToServer>,
    tx: Sender<ServerToUi>,
    ctx: egui::Context,
) -> thread::JoinHandle<()> {
    thread::spawn(move || run_worker(server_url, rx, tx, ctx))
}

fn run_worker(base: String, rx: Receiver<UiToServer>, tx: Sender<ServerToUi>, ctx: egui::Context) {
    let client = match reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            error!("Could not build the HTTP client: {}", e);
            return;
        }
    };

    while let Ok(request) = rx.recv() {
        let message = match request {
            UiToServer::SubmitMove(record) => {
                info!("Submitting move {}", record);
                match post_move(&client, &base, &record) {
                    Ok(reply) => Some(ServerToUi::MoveReply(reply)),
                    Err(e) => {
                        warn!("Move submission failed: {}", e);
                        Some(ServerToUi::MoveFailed(e))
                    }
                }
            }
            UiToServer::SetDifficulty(level) => match post_difficulty(&client, &base, level) {
                Ok(ack) => {
                    info!("Server acknowledged difficulty {}", ack.difficulty);
                    None
                }
                Err(e) => {
                    warn!("Difficulty change failed: {}", e);
                    Some(ServerToUi::DifficultyFailed(e))
                }
            },
        };
        if let Some(message) = message {
            if tx.send(message).is_err() {
                break;
            }
            // The UI only drains the channel during a frame.
            ctx.request_repaint();
        }
    }
}

fn post_move(
    client: &reqwest::blocking::Client,
    base: &str,
    record: &MoveRecord,
) -> Result<MoveResponse, String> {
    let request = MoveRequest { mv: record.clone() };
    let response = client
        .post(format!("{}/move", base))
        .json(&request)
        .send()
        .map_err(describe)?;

    if !response.status().is_success() {
        return Err(rejection(response));
    }
    response
        .json::<MoveResponse>()
        .map_err(|e| format!("malformed server response: {}", e))
}

fn post_difficulty(
    client: &reqwest::blocking::Client,
    base: &str,
    level: Difficulty,
) -> Result<DifficultyResponse, String> {
    let request = DifficultyRequest {
        difficulty: level.to_string(),
    };
    let response = client
        .post(format!("{}/set_difficulty", base))
        .json(&request)
        .send()
        .map_err(describe)?;

    if !response.status().is_success() {
        return Err(rejection(response));
    }
    response
        .json::<DifficultyResponse>()
        .map_err(|e| format!("malformed server response: {}", e))
}

/// One line for the status area out of a transport-level failure.
fn describe(err: reqwest::Error) -> String {
    if err.is_timeout() {
        "request timed out".to_string()
    } else if err.is_connect() {
        "server unreachable".to_string()
    } else {
        format!("request failed: {}", err)
    }
}

/// One line out of a non-2xx answer, quoting the server's error field
/// when it sent one.
fn rejection(response: reqwest::blocking::Response) -> String {
    let status = response.status();
    let detail = response
        .json::<ErrorResponse>()
        .map(|body| body.error)
        .unwrap_or_else(|_| "no error detail".to_string());
    format!("server said {}: {}", status, detail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess::Square;
    use crossbeam_channel::unbounded;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    const REJECTION: &str = "HTTP/1.1 400 Bad Request\r\nContent-Type: application/json\r\nContent-Length: 24\r\nConnection: close\r\n\r\n{\"error\":\"Invalid move\"}";
    const GARBLED: &str = "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 9\r\nConnection: close\r\n\r\nnot json!";

    // One-shot HTTP server: reads a full request, answers with the
    // canned response, closes. Returns the base URL for the worker.
    fn serve_once(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request_complete(&request) {
                let read = stream.read(&mut buf).unwrap();
                if read == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..read]);
            }
            stream.write_all(response.as_bytes()).unwrap();
        });
        format!("http://{}", addr)
    }

    fn request_complete(request: &[u8]) -> bool {
        let text = String::from_utf8_lossy(request);
        let headers_end = match text.find("\r\n\r\n") {
            Some(index) => index,
            None => return false,
        };
        let body_len = text[..headers_end]
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        request.len() >= headers_end + 4 + body_len
    }

    fn submit_move_against(base: String, ctx: egui::Context) -> ServerToUi {
        let (tx, worker_rx) = unbounded();
        let (worker_tx, rx) = unbounded();
        let handle = spawn_worker(base, worker_rx, worker_tx, ctx);

        tx.send(UiToServer::SubmitMove(MoveRecord::queen_promoting(
            Square::E2,
            Square::E4,
        )))
        .unwrap();
        drop(tx);

        let message = rx.recv_timeout(Duration::from_secs(10)).unwrap();
        handle.join().unwrap();
        message
    }

    #[test]
    fn refused_connection_reads_as_unreachable() {
        // Bind and immediately release a port; connecting to it gets
        // refused.
        let port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();

        let message = submit_move_against(
            format!("http://127.0.0.1:{}", port),
            egui::Context::default(),
        );
        match message {
            ServerToUi::MoveFailed(line) => assert_eq!(line, "server unreachable"),
            other => panic!("unexpected message {:?}", other),
        }
    }

    #[test]
    fn http_rejection_quotes_status_and_detail() {
        let message = submit_move_against(serve_once(REJECTION), egui::Context::default());
        match message {
            ServerToUi::MoveFailed(line) => {
                assert_eq!(line, "server said 400 Bad Request: Invalid move")
            }
            other => panic!("unexpected message {:?}", other),
        }
    }

    #[test]
    fn garbled_reply_body_is_flagged() {
        let message = submit_move_against(serve_once(GARBLED), egui::Context::default());
        match message {
            ServerToUi::MoveFailed(line) => {
                assert!(line.starts_with("malformed server response"), "got {line}")
            }
            other => panic!("unexpected message {:?}", other),
        }
    }

    #[test]
    fn failed_difficulty_change_wakes_the_ui() {
        let (tx, worker_rx) = unbounded();
        let (worker_tx, rx) = unbounded();
        let ctx = egui::Context::default();
        let repainted = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&repainted);
        ctx.set_request_repaint_callback(move |_| flag.store(true, Ordering::SeqCst));
        let handle = spawn_worker(serve_once(REJECTION), worker_rx, worker_tx, ctx);

        tx.send(UiToServer::SetDifficulty(Difficulty::Hard)).unwrap();
        drop(tx);

        assert!(matches!(
            rx.recv_timeout(Duration::from_secs(10)).unwrap(),
            ServerToUi::DifficultyFailed(_)
        ));
        handle.join().unwrap();
        assert!(repainted.load(Ordering::SeqCst));
    }
}
