//! Backend worker: owns the tokio runtime that drives the widget controller.

use std::{sync::Arc, thread};

use client_core::{WidgetController, WidgetState};
use crossbeam_channel::{Receiver, Sender};
use tokio::{runtime::Runtime, sync::watch};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;

pub fn launch(
    controller: Arc<WidgetController>,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    egui_ctx: egui::Context,
) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(format!(
                    "backend worker startup failure: failed to build runtime: {err}"
                )));
                tracing::error!("failed to build backend runtime: {err}");
                egui_ctx.request_repaint();
                return;
            }
        };

        runtime.spawn(repaint_on_change(controller.subscribe(), egui_ctx.clone()));
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));

        while let Ok(cmd) = cmd_rx.recv() {
            handle_command(&runtime, &controller, cmd);
        }
        tracing::debug!("ui command queue closed; backend worker exiting");
    });
}

fn handle_command(runtime: &Runtime, controller: &Arc<WidgetController>, cmd: BackendCommand) {
    match cmd {
        BackendCommand::SetTag { tag } => controller.set_tag(tag),
        BackendCommand::AddUser => {
            let controller = controller.clone();
            runtime.spawn(async move {
                if let Err(err) = controller.add_user().await {
                    tracing::debug!("add user finished with error: {err}");
                }
            });
        }
        BackendCommand::GetRecommendations => {
            let controller = controller.clone();
            runtime.spawn(async move {
                if let Err(err) = controller.get_recommendations().await {
                    tracing::debug!("get recommendations finished with error: {err}");
                }
            });
        }
    }
}

async fn repaint_on_change(mut state_rx: watch::Receiver<WidgetState>, egui_ctx: egui::Context) {
    while state_rx.changed().await.is_ok() {
        egui_ctx.request_repaint();
    }
}
