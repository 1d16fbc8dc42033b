use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

macro_rules! text_id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

text_id_newtype!(SessionId);
text_id_newtype!(ScenarioId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    #[default]
    En,
    Es,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Language::En),
            "es" | "spanish" | "español" | "espanol" => Ok(Language::Es),
            other => Err(format!("unsupported language '{other}' (expected en or es)")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameVariant {
    QualityQuest,
    RequirementRally,
    UsabilityUniverse,
}

impl GameVariant {
    pub const ALL: [GameVariant; 3] = [
        GameVariant::QualityQuest,
        GameVariant::RequirementRally,
        GameVariant::UsabilityUniverse,
    ];

    /// Identifier used by the backend in game-scoped routes.
    pub fn game_id(self) -> &'static str {
        match self {
            GameVariant::QualityQuest => "quality_quest",
            GameVariant::RequirementRally => "requirement_rally",
            GameVariant::UsabilityUniverse => "usability_universe",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            GameVariant::QualityQuest => "quality-quest",
            GameVariant::RequirementRally => "requirement-rally",
            GameVariant::UsabilityUniverse => "usability-universe",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            GameVariant::QualityQuest => "QualityQuest",
            GameVariant::RequirementRally => "RequirementRally",
            GameVariant::UsabilityUniverse => "UsabilityUniverse",
        }
    }
}

impl fmt::Display for GameVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for GameVariant {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        GameVariant::ALL
            .into_iter()
            .find(|variant| {
                variant.slug() == normalized || variant.title().to_ascii_lowercase() == normalized
            })
            .ok_or_else(|| {
                format!(
                    "unknown game '{value}' (expected quality-quest, requirement-rally or usability-universe)"
                )
            })
    }
}

/// Label of a multiple-choice option, e.g. `A`. Comparison ignores ASCII case.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionLabel(String);

impl OptionLabel {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into().trim().to_string())
    }

    /// Label for the option at `index` of a list-shaped option set.
    pub fn from_index(index: usize) -> Self {
        let letter = (b'A' + (index % 26) as u8) as char;
        Self(letter.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn matches(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other.trim())
    }
}

impl PartialEq for OptionLabel {
    fn eq(&self, other: &Self) -> bool {
        self.matches(&other.0)
    }
}

impl fmt::Display for OptionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioOption {
    pub label: OptionLabel,
    pub text: String,
}

/// One quiz question. Built through [`crate::protocol::ScenarioPayload`] validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: Option<ScenarioId>,
    pub content: String,
    pub options: Vec<ScenarioOption>,
    pub correct_answer: Option<OptionLabel>,
    pub explanation: Option<String>,
    pub difficulty: Option<String>,
    pub category: Option<String>,
}

impl Scenario {
    pub fn option(&self, label: &str) -> Option<&ScenarioOption> {
        self.options.iter().find(|option| option.label.matches(label))
    }

    pub fn is_correct(&self, selected: &OptionLabel) -> bool {
        self.correct_answer
            .as_ref()
            .is_some_and(|correct| correct == selected)
    }
}

/// Outcome of one submitted answer, whether scored by the backend or locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerResult {
    pub is_correct: bool,
    pub correct_answer: String,
    pub explanation: String,
    pub score: u32,
    pub game_completed: bool,
    pub next_scenario: Option<Scenario>,
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
