use std::sync::Arc;

use anyhow::{anyhow, Context};
use clap::Parser;
use client_core::{load_settings, HttpRecommendationApi, WidgetController};
use crossbeam_channel::bounded;
use eframe::egui;

mod backend_bridge;
mod controller;
mod ui;

use backend_bridge::commands::BackendCommand;
use controller::events::UiEvent;
use ui::SocialSyncApp;

#[derive(Parser, Debug)]
struct Args {
    /// Backend base URL, overriding social_sync.toml and the environment.
    #[arg(long)]
    api_url: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut settings = load_settings().context("failed to load settings")?;
    if let Some(api_url) = args.api_url {
        settings.api_base_url = api_url;
    }
    tracing_subscriber::fmt()
        .with_env_filter(settings.log_filter.as_str())
        .init();

    let api = HttpRecommendationApi::from_settings(&settings)
        .with_context(|| format!("cannot use api url '{}'", settings.api_base_url))?;
    tracing::info!(api_url = %api.base_url(), "backend configured");
    let controller = Arc::new(WidgetController::new(Arc::new(api)));
    let state_rx = controller.subscribe();

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(64);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Social Sync")
            .with_inner_size([520.0, 640.0])
            .with_min_inner_size([360.0, 320.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Social Sync",
        options,
        Box::new(move |cc| {
            backend_bridge::runtime::launch(controller, cmd_rx, ui_tx, cc.egui_ctx.clone());
            Ok(Box::new(SocialSyncApp::new(cmd_tx, ui_rx, state_rx)))
        }),
    )
    .map_err(|err| anyhow!("desktop gui exited with error: {err}"))
}
