//! Local scenario sets used when the Session API cannot be reached.

use serde::Deserialize;
use shared::{
    domain::{GameVariant, Language, Scenario},
    error::ProtocolError,
    protocol::{IdValue, OptionsPayload, ScenarioPayload},
};

const QUALITY_QUEST_SCENARIOS: &str = include_str!("../scenarios/quality_quest.json");
const REQUIREMENT_RALLY_SCENARIOS: &str = include_str!("../scenarios/requirement_rally.json");
const USABILITY_UNIVERSE_SCENARIOS: &str = include_str!("../scenarios/usability_universe.json");

pub trait ScenarioProvider: Send + Sync {
    fn scenarios(&self, language: Language) -> Result<Vec<Scenario>, ProtocolError>;
}

/// Bilingual scenario sets bundled with the crate, five per game.
#[derive(Debug, Clone, Copy)]
pub struct BuiltinScenarios {
    variant: GameVariant,
}

impl BuiltinScenarios {
    pub fn for_variant(variant: GameVariant) -> Self {
        Self { variant }
    }

    fn source(&self) -> &'static str {
        match self.variant {
            GameVariant::QualityQuest => QUALITY_QUEST_SCENARIOS,
            GameVariant::RequirementRally => REQUIREMENT_RALLY_SCENARIOS,
            GameVariant::UsabilityUniverse => USABILITY_UNIVERSE_SCENARIOS,
        }
    }
}

impl ScenarioProvider for BuiltinScenarios {
    fn scenarios(&self, language: Language) -> Result<Vec<Scenario>, ProtocolError> {
        let entries: Vec<LocalizedScenario> = serde_json::from_str(self.source())
            .map_err(|err| ProtocolError::Decode(err.to_string()))?;
        entries
            .into_iter()
            .map(|entry| Scenario::try_from(entry.localize(language)))
            .collect()
    }
}

/// Fixed, language-independent scenario list.
#[derive(Debug, Clone, Default)]
pub struct StaticScenarios(pub Vec<Scenario>);

impl ScenarioProvider for StaticScenarios {
    fn scenarios(&self, _language: Language) -> Result<Vec<Scenario>, ProtocolError> {
        Ok(self.0.clone())
    }
}

#[derive(Debug, Deserialize)]
struct LocalizedText {
    en: String,
    es: String,
}

impl LocalizedText {
    fn get(self, language: Language) -> String {
        match language {
            Language::En => self.en,
            Language::Es => self.es,
        }
    }
}

#[derive(Debug, Deserialize)]
struct LocalizedOptions {
    en: OptionsPayload,
    es: OptionsPayload,
}

#[derive(Debug, Deserialize)]
struct LocalizedScenario {
    id: String,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    difficulty: Option<String>,
    content: LocalizedText,
    options: LocalizedOptions,
    correct_answer: String,
    explanation: LocalizedText,
}

impl LocalizedScenario {
    fn localize(self, language: Language) -> ScenarioPayload {
        let options = match language {
            Language::En => self.options.en,
            Language::Es => self.options.es,
        };
        ScenarioPayload {
            id: Some(IdValue::Text(self.id)),
            content: Some(self.content.get(language)),
            options: Some(options),
            correct_answer: Some(self.correct_answer),
            explanation: Some(self.explanation.get(language)),
            difficulty: self.difficulty.map(serde_json::Value::String),
            category: self.category,
            ..ScenarioPayload::default()
        }
    }
}

/// Local play order: the provider's scenarios narrowed by category and
/// difficulty when that leaves at least one, repeated in order for any game
/// length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FallbackDeck {
    scenarios: Vec<Scenario>,
}

impl FallbackDeck {
    pub fn new(scenarios: Vec<Scenario>, category: Option<&str>, difficulty: Option<&str>) -> Self {
        let scenarios = narrow(scenarios, category, |scenario| scenario.category.as_deref());
        let scenarios = narrow(scenarios, difficulty, |scenario| {
            scenario.difficulty.as_deref()
        });
        Self { scenarios }
    }

    pub fn get(&self, index: usize) -> Option<&Scenario> {
        match self.scenarios.len() {
            0 => None,
            len => self.scenarios.get(index % len),
        }
    }

    /// Number of distinct scenarios, not the game length.
    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}

fn narrow<F>(scenarios: Vec<Scenario>, wanted: Option<&str>, field: F) -> Vec<Scenario>
where
    F: Fn(&Scenario) -> Option<&str>,
{
    let Some(wanted) = wanted.map(str::trim).filter(|wanted| !wanted.is_empty()) else {
        return scenarios;
    };
    let matching: Vec<Scenario> = scenarios
        .iter()
        .filter(|scenario| field(*scenario).is_some_and(|value| normalize(value) == normalize(wanted)))
        .cloned()
        .collect();
    if matching.is_empty() {
        scenarios
    } else {
        matching
    }
}

fn normalize(value: &str) -> String {
    value
        .trim()
        .to_ascii_lowercase()
        .replace(['_', '-'], " ")
}

#[cfg(test)]
#[path = "tests/fallback_tests.rs"]
mod tests;
