//! eframe application shell: panels around the board, and the pump
//! that feeds worker messages into the controller.

use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use egui::{Color32, RichText};

use chess_vs_engine_core::Difficulty;

use crate::board::BoardWidget;
use crate::controller::BoardController;
use crate::net::{ServerToUi, UiToServer};

pub struct ChessApp {
    controller: BoardController,
    board: BoardWidget,
    rx: Receiver<ServerToUi>,
}

impl ChessApp {
    pub fn new(tx: Sender<UiToServer>, rx: Receiver<ServerToUi>) -> Self {
        ChessApp {
            controller: BoardController::new(tx),
            board: BoardWidget::default(),
            rx,
        }
    }

    fn difficulty_selector(&mut self, ui: &mut egui::Ui) {
        let mut selected = self.controller.difficulty();
        egui::ComboBox::from_label("Difficulty")
            .selected_text(selected.to_string())
            .show_ui(ui, |ui| {
                for level in Difficulty::ALL {
                    ui.selectable_value(&mut selected, level, level.as_str());
                }
            });
        if selected != self.controller.difficulty() {
            self.controller.set_difficulty(selected);
        }
    }
}

impl eframe::App for ChessApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        while let Ok(message) = self.rx.try_recv() {
            self.controller.handle_server_message(message);
        }

        egui::TopBottomPanel::top("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(self.controller.status().text());
                if self.controller.awaiting_reply() {
                    ui.spinner();
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    self.difficulty_selector(ui);
                });
            });
        });

        egui::TopBottomPanel::bottom("history").show(ctx, |ui| {
            let history = self.controller.session().history_line();
            if history.is_empty() {
                ui.label(RichText::new("No moves yet").weak());
            } else {
                ui.monospace(history);
            }
            if let Some(line) = self.controller.connection_line() {
                ui.colored_label(Color32::from_rgb(0xc0, 0x39, 0x2b), line);
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                self.board.show(ui, &mut self.controller);
            });
        });

        // Keep polling while a reply is on its way.
        if self.controller.awaiting_reply() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
