use crossbeam_channel::unbounded;
use log::info;
use std::env;

mod app;
mod board;
mod controller;
mod net;

use app::ChessApp;

fn main() -> Result<(), eframe::Error> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let server_url =
        env::var("SERVER_URL").unwrap_or_else(|_| "http://127.0.0.1:8080".to_string());
    info!("Board client talking to {}", server_url);

    let (ui_tx, worker_rx) = unbounded();
    let (worker_tx, ui_rx) = unbounded();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([760.0, 700.0])
            .with_min_inner_size([480.0, 460.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Chess vs Engine",
        options,
        Box::new(move |cc| {
            net::spawn_worker(server_url, worker_rx, worker_tx, cc.egui_ctx.clone());
            Box::new(ChessApp::new(ui_tx, ui_rx))
        }),
    )
}
