use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    load_settings, HttpRecommendationApi, RecommendationApi, WidgetController, WidgetState,
};
use shared::protocol::RefreshOptions;
use tracing::info;

mod render;
mod session;

#[derive(Parser, Debug)]
#[command(name = "social-sync", about = "Register Spotify tags and fetch recommendations")]
struct Args {
    /// Backend base URL, overriding social_sync.toml and the environment.
    #[arg(long)]
    api_url: Option<String>,
    /// Print results as JSON instead of text.
    #[arg(long)]
    json: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Register a user tag with the backend.
    AddUser { tag: String },
    /// Fetch recommendations for a tag.
    Recommend { tag: String },
    /// Force the backend to regenerate recommendations.
    Refresh {
        tag: String,
        #[arg(long, default_value_t = 20)]
        top_n: u32,
        #[arg(long, default_value_t = 30)]
        pop_cutoff: u32,
    },
    /// Read back the recommendations the backend last stored.
    Cached {
        tag: String,
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },
    /// Interactive session (the default).
    Session,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = load_settings().context("failed to load settings")?;
    if let Some(api_url) = args.api_url {
        settings.api_base_url = api_url;
    }
    tracing_subscriber::fmt()
        .with_env_filter(settings.log_filter.as_str())
        .with_writer(std::io::stderr)
        .init();

    let api = Arc::new(
        HttpRecommendationApi::from_settings(&settings)
            .with_context(|| format!("cannot use api url '{}'", settings.api_base_url))?,
    );
    info!(api_url = %api.base_url(), "backend configured");

    let controller = Arc::new(WidgetController::new(api.clone()));

    match args.command.unwrap_or(Command::Session) {
        Command::AddUser { tag } => {
            controller.set_tag(tag);
            let outcome = controller.add_user().await;
            report(&controller.state(), args.json)?;
            outcome?;
        }
        Command::Recommend { tag } => {
            controller.select_user(&tag);
            let outcome = controller.get_recommendations().await;
            report(&controller.state(), args.json)?;
            outcome?;
        }
        Command::Refresh {
            tag,
            top_n,
            pop_cutoff,
        } => {
            controller.select_user(&tag);
            let outcome = controller
                .refresh_recommendations(RefreshOptions { top_n, pop_cutoff })
                .await;
            report(&controller.state(), args.json)?;
            outcome?;
        }
        Command::Cached { tag, limit } => {
            let rows = api.cached_recommendations(&tag, limit).await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else if rows.is_empty() {
                println!("No stored recommendations.");
            } else {
                for row in rows {
                    println!("song_id={} score={}", row.song_id, row.score);
                }
            }
        }
        Command::Session => session::run(controller).await?,
    }

    Ok(())
}

fn report(state: &WidgetState, json: bool) -> Result<()> {
    if state.error.is_some() {
        return Ok(());
    }
    if json {
        let body = serde_json::json!({
            "users": state.users,
            "recommendations": state.recommendations,
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }
    if !state.users.is_empty() {
        println!("{}", render::users_line(state));
    }
    if !state.recommendations.is_empty() {
        for line in render::recommendation_lines(&state.recommendations) {
            println!("{line}");
        }
    }
    Ok(())
}
