use std::time::Duration;

use client_core::WidgetState;
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::Recommendation;
use tokio::sync::watch;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::{classify_backend_failure, UiEvent},
    orchestration::dispatch_backend_command,
};

pub const NO_SELECTION_LABEL: &str = "— Select user —";
const TAG_HINT: &str = "Enter Spotify user tag";

pub struct SocialSyncApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    state_rx: watch::Receiver<WidgetState>,
    state: WidgetState,
    /// Local copy of the tag text; the controller gets every edit via `SetTag`.
    tag_input: String,
    status: Option<String>,
}

pub fn selection_label(tag: &str) -> String {
    if tag.is_empty() {
        NO_SELECTION_LABEL.to_string()
    } else {
        tag.to_string()
    }
}

pub fn artist_caption(rec: &Recommendation) -> String {
    format!("by {}", rec.artist)
}

impl SocialSyncApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        state_rx: watch::Receiver<WidgetState>,
    ) -> Self {
        let state = state_rx.borrow().clone();
        Self {
            cmd_tx,
            ui_rx,
            tag_input: state.tag.clone(),
            state_rx,
            state,
            status: None,
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => tracing::info!("{message}"),
                UiEvent::Error(message) => {
                    tracing::error!("{message}");
                    self.status = Some(classify_backend_failure(&message));
                }
            }
        }
    }

    fn sync_state(&mut self) {
        if self.state_rx.has_changed().unwrap_or(false) {
            self.state = self.state_rx.borrow_and_update().clone();
        }
    }

    fn send(&mut self, cmd: BackendCommand) {
        dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status);
    }

    fn set_tag(&mut self, tag: String) {
        self.tag_input = tag.clone();
        self.send(BackendCommand::SetTag { tag });
    }

    fn show_tag_row(&mut self, ui: &mut egui::Ui) {
        let loading = self.state.loading;
        ui.horizontal(|ui| {
            let edit = egui::TextEdit::singleline(&mut self.tag_input).hint_text(TAG_HINT);
            if ui.add_enabled(!loading, edit).changed() {
                let tag = self.tag_input.clone();
                self.send(BackendCommand::SetTag { tag });
            }
            if ui
                .add_enabled(!loading, egui::Button::new("Add User"))
                .clicked()
            {
                self.send(BackendCommand::AddUser);
            }
        });
    }

    fn show_user_row(&mut self, ui: &mut egui::Ui) {
        if self.state.users.is_empty() {
            return;
        }
        let loading = self.state.loading;
        ui.horizontal(|ui| {
            let mut selected = self.tag_input.clone();
            ui.add_enabled_ui(!loading, |ui| {
                egui::ComboBox::from_id_salt("user_select")
                    .selected_text(selection_label(&selected))
                    .show_ui(ui, |ui| {
                        ui.selectable_value(&mut selected, String::new(), NO_SELECTION_LABEL);
                        for user in self.state.users.iter() {
                            ui.selectable_value(&mut selected, user.to_string(), user);
                        }
                    });
            });
            if selected != self.tag_input {
                self.set_tag(selected);
            }
            if ui
                .add_enabled(!loading, egui::Button::new("Get Recommendations"))
                .clicked()
            {
                self.send(BackendCommand::GetRecommendations);
            }
        });
    }

    fn show_feedback(&self, ui: &mut egui::Ui) {
        if self.state.loading {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading…");
            });
        }
        if let Some(error) = &self.state.error {
            ui.colored_label(ui.visuals().error_fg_color, error.as_str());
        }
        if let Some(status) = &self.status {
            ui.colored_label(ui.visuals().warn_fg_color, status.as_str());
        }
    }

    fn show_recommendations(&self, ui: &mut egui::Ui) {
        if self.state.recommendations.is_empty() {
            return;
        }
        ui.separator();
        egui::ScrollArea::vertical().show(ui, |ui| {
            for rec in &self.state.recommendations {
                ui.horizontal_wrapped(|ui| {
                    ui.label(egui::RichText::new(rec.title.as_str()).strong());
                    ui.label(artist_caption(rec));
                    if rec.has_listen_link() {
                        ui.hyperlink_to("▶ Listen", &rec.uri);
                    }
                });
            }
        });
    }
}

impl eframe::App for SocialSyncApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        self.sync_state();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("🎵 Social Sync");
            ui.add_space(8.0);
            self.show_tag_row(ui);
            self.show_user_row(ui);
            ui.add_space(4.0);
            self.show_feedback(ui);
            self.show_recommendations(ui);
        });

        if self.state.loading {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
