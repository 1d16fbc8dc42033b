use std::{fs, io, path::Path, time::Duration};

use anyhow::{bail, Context};
use client_core::{scoring, ScoringPolicy, DEFAULT_PLAYER_NAME};
use serde::Deserialize;
use shared::domain::{GameVariant, Language};
use tracing::warn;
use url::Url;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_url: String,
    pub game: GameVariant,
    pub language: Language,
    pub player_name: String,
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub request_timeout_secs: u64,
    pub points_per_correct: u32,
    pub total_scenarios: usize,
    pub offline: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            game: GameVariant::QualityQuest,
            language: Language::En,
            player_name: DEFAULT_PLAYER_NAME.into(),
            category: None,
            difficulty: None,
            request_timeout_secs: client_core::DEFAULT_REQUEST_TIMEOUT.as_secs(),
            points_per_correct: scoring::DEFAULT_POINTS_PER_CORRECT,
            total_scenarios: scoring::DEFAULT_TOTAL_SCENARIOS,
            offline: false,
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn scoring_policy(&self) -> ScoringPolicy {
        ScoringPolicy::new(self.points_per_correct, self.total_scenarios)
    }

    pub fn apply_overrides(&mut self, overrides: CliOverrides) {
        if let Some(v) = overrides.api_url {
            self.api_url = v;
        }
        if let Some(v) = overrides.game {
            self.game = v;
        }
        if let Some(v) = overrides.language {
            self.language = v;
        }
        if let Some(v) = overrides.player_name {
            self.player_name = v;
        }
        if let Some(v) = overrides.category {
            self.category = Some(v);
        }
        if let Some(v) = overrides.difficulty {
            self.difficulty = Some(v);
        }
        if overrides.offline {
            self.offline = true;
        }
    }
}

/// Values given on the command line; they win over file and environment.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub api_url: Option<String>,
    pub game: Option<GameVariant>,
    pub language: Option<Language>,
    pub player_name: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub offline: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileSettings {
    api_url: Option<String>,
    game: Option<String>,
    language: Option<String>,
    player_name: Option<String>,
    category: Option<String>,
    difficulty: Option<String>,
    request_timeout_secs: Option<u64>,
    points_per_correct: Option<u32>,
    total_scenarios: Option<usize>,
    offline: Option<bool>,
}

pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    load_settings_with_env(path, |key| std::env::var(key).ok())
}

pub fn load_settings_with_env<F>(path: &Path, lookup: F) -> anyhow::Result<Settings>
where
    F: Fn(&str) -> Option<String>,
{
    let mut settings = Settings::default();

    match fs::read_to_string(path) {
        Ok(raw) => {
            let file_cfg: FileSettings = toml::from_str(&raw)
                .with_context(|| format!("failed to parse config file '{}'", path.display()))?;
            apply_file(&mut settings, file_cfg)
                .with_context(|| format!("invalid value in config file '{}'", path.display()))?;
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read config file '{}'", path.display()))
        }
    }

    apply_env(&mut settings, lookup);
    Ok(settings)
}

fn apply_file(settings: &mut Settings, file_cfg: FileSettings) -> anyhow::Result<()> {
    if let Some(v) = file_cfg.api_url {
        settings.api_url = v;
    }
    if let Some(v) = file_cfg.game {
        settings.game = v.parse().map_err(anyhow::Error::msg)?;
    }
    if let Some(v) = file_cfg.language {
        settings.language = v.parse().map_err(anyhow::Error::msg)?;
    }
    if let Some(v) = file_cfg.player_name {
        settings.player_name = v;
    }
    if file_cfg.category.is_some() {
        settings.category = file_cfg.category;
    }
    if file_cfg.difficulty.is_some() {
        settings.difficulty = file_cfg.difficulty;
    }
    if let Some(v) = file_cfg.request_timeout_secs {
        settings.request_timeout_secs = v;
    }
    if let Some(v) = file_cfg.points_per_correct {
        settings.points_per_correct = v;
    }
    if let Some(v) = file_cfg.total_scenarios {
        settings.total_scenarios = v;
    }
    if let Some(v) = file_cfg.offline {
        settings.offline = v;
    }
    Ok(())
}

/// `APP__*` names win over `QUIZ_*` names when both are set.
fn env_value<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(&format!("APP__{name}")).or_else(|| lookup(&format!("QUIZ_{name}")))
}

fn env_parsed<F, T>(lookup: &F, name: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = env_value(lookup, name)?;
    match raw.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            warn!(variable = name, value = %raw, error = %err, "config: ignoring invalid environment value");
            None
        }
    }
}

fn apply_env<F>(settings: &mut Settings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = env_value(&lookup, "API_URL") {
        settings.api_url = v;
    }
    if let Some(v) = env_parsed(&lookup, "GAME") {
        settings.game = v;
    }
    if let Some(v) = env_parsed(&lookup, "LANGUAGE") {
        settings.language = v;
    }
    if let Some(v) = env_value(&lookup, "PLAYER_NAME") {
        settings.player_name = v;
    }
    if let Some(v) = env_value(&lookup, "CATEGORY") {
        settings.category = Some(v);
    }
    if let Some(v) = env_value(&lookup, "DIFFICULTY") {
        settings.difficulty = Some(v);
    }
    if let Some(v) = env_parsed(&lookup, "REQUEST_TIMEOUT_SECS") {
        settings.request_timeout_secs = v;
    }
    if let Some(v) = env_parsed(&lookup, "POINTS_PER_CORRECT") {
        settings.points_per_correct = v;
    }
    if let Some(v) = env_parsed(&lookup, "TOTAL_SCENARIOS") {
        settings.total_scenarios = v;
    }
    if let Some(v) = env_parsed(&lookup, "OFFLINE") {
        settings.offline = v;
    }
}

/// Accepts bare `host:port` values and strips trailing slashes so endpoint
/// paths can be appended directly.
pub fn normalize_api_url(raw_api_url: &str) -> anyhow::Result<String> {
    let raw_api_url = raw_api_url.trim();

    if raw_api_url.is_empty() {
        return Ok(DEFAULT_API_URL.to_string());
    }

    let candidate = if raw_api_url.contains("://") {
        raw_api_url.to_string()
    } else {
        format!("http://{raw_api_url}")
    };

    let parsed = Url::parse(&candidate)
        .with_context(|| format!("invalid api url '{raw_api_url}'"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        bail!(
            "unsupported api url scheme '{}' (expected http or https)",
            parsed.scheme()
        );
    }
    if parsed.host_str().is_none() {
        bail!("api url '{raw_api_url}' has no host");
    }

    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
