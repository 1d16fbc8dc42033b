use std::{io, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{
    BuiltinScenarios, GameSessionController, HttpSessionApi, MissingSessionApi, SessionApi,
    SessionEndpoints, StartOptions,
};
use shared::domain::{GameVariant, Language};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod locale;
mod play;
mod render;

use config::CliOverrides;
use render::TerminalRenderer;

#[derive(Parser, Debug)]
#[command(about = "Play the ISO standards games in a terminal")]
struct Args {
    #[arg(long, default_value = "quiz.toml")]
    config: PathBuf,
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long)]
    game: Option<GameVariant>,
    #[arg(long)]
    language: Option<Language>,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    difficulty: Option<String>,
    /// Skip the backend and play the bundled scenarios.
    #[arg(long)]
    offline: bool,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            api_url: self.api_url.clone(),
            game: self.game,
            language: self.language,
            player_name: self.name.clone(),
            category: self.category.clone(),
            difficulty: self.difficulty.clone(),
            offline: self.offline,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = config::load_settings(&args.config)?;
    settings.apply_overrides(args.overrides());
    settings.api_url = config::normalize_api_url(&settings.api_url)?;

    let api: Arc<dyn SessionApi> = if settings.offline {
        Arc::new(MissingSessionApi)
    } else {
        Arc::new(
            HttpSessionApi::with_timeout(
                settings.api_url.clone(),
                SessionEndpoints::for_variant(settings.game),
                settings.request_timeout(),
            )
            .context("failed to build session api client")?,
        )
    };
    info!(
        game = settings.game.slug(),
        api_url = %settings.api_url,
        offline = settings.offline,
        language = %settings.language,
        "quiz: starting"
    );

    let mut controller = GameSessionController::new_with_dependencies(
        settings.game,
        settings.scoring_policy(),
        api,
        Arc::new(BuiltinScenarios::for_variant(settings.game)),
    );
    let mut renderer = TerminalRenderer::new(io::stdout(), settings.language);
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    play::run(
        &mut controller,
        &mut renderer,
        &mut input,
        StartOptions {
            player_name: settings.player_name,
            category: settings.category,
            difficulty: settings.difficulty,
            language: settings.language,
        },
    )
    .await
}
