use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    domain::{Language, OptionLabel, Scenario, ScenarioId, ScenarioOption, SessionId},
    error::ProtocolError,
};

pub const MIN_OPTIONS: usize = 2;
pub const MAX_OPTIONS: usize = 8;
/// Upper bound on a backend-announced game length.
pub const MAX_TOTAL_SCENARIOS: usize = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    pub language: Language,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitAnswerRequest {
    pub selected_option: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario_id: Option<String>,
}

/// Identifiers arrive as strings from most backends and as integers from some.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdValue {
    Text(String),
    Number(i64),
}

impl IdValue {
    fn into_text(self) -> String {
        match self {
            IdValue::Text(text) => text.trim().to_string(),
            IdValue::Number(number) => number.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionEntry {
    #[serde(default, alias = "id", alias = "key")]
    pub label: Option<String>,
    #[serde(alias = "value", alias = "content")]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionsPayload {
    Labeled(BTreeMap<String, String>),
    Listed(Vec<String>),
    Described(Vec<OptionEntry>),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<IdValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<OptionsPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
    #[serde(
        default,
        rename = "correctOption",
        skip_serializing_if = "Option::is_none"
    )]
    pub correct_option: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl TryFrom<ScenarioPayload> for Scenario {
    type Error = ProtocolError;

    fn try_from(payload: ScenarioPayload) -> Result<Self, Self::Error> {
        let content = non_empty(payload.content).ok_or(ProtocolError::MissingField("content"))?;
        let options = validate_options(
            payload
                .options
                .ok_or(ProtocolError::MissingField("options"))?,
        )?;

        let correct_answer = match non_empty(payload.correct_answer.or(payload.correct_option)) {
            Some(raw) => Some(resolve_correct_answer(&options, &raw)?),
            None => None,
        };

        let difficulty = match payload.difficulty {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::String(text)) => non_empty(Some(text)),
            Some(serde_json::Value::Number(number)) => Some(number.to_string()),
            Some(other) => {
                return Err(ProtocolError::invalid(
                    "difficulty",
                    format!("expected string or number, got {other}"),
                ))
            }
        };

        Ok(Scenario {
            id: payload
                .id
                .map(IdValue::into_text)
                .filter(|id| !id.is_empty())
                .map(ScenarioId),
            content,
            options,
            correct_answer,
            explanation: non_empty(payload.explanation.or(payload.feedback)),
            difficulty,
            category: non_empty(payload.category),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

fn validate_options(payload: OptionsPayload) -> Result<Vec<ScenarioOption>, ProtocolError> {
    let options: Vec<ScenarioOption> = match payload {
        OptionsPayload::Labeled(map) => map
            .into_iter()
            .map(|(label, text)| ScenarioOption {
                label: OptionLabel::new(label),
                text,
            })
            .collect(),
        OptionsPayload::Listed(texts) => texts
            .into_iter()
            .enumerate()
            .map(|(index, text)| ScenarioOption {
                label: OptionLabel::from_index(index),
                text,
            })
            .collect(),
        OptionsPayload::Described(entries) => entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| ScenarioOption {
                label: non_empty(entry.label)
                    .map(OptionLabel::new)
                    .unwrap_or_else(|| OptionLabel::from_index(index)),
                text: entry.text,
            })
            .collect(),
    };

    if !(MIN_OPTIONS..=MAX_OPTIONS).contains(&options.len()) {
        return Err(ProtocolError::OptionCount {
            count: options.len(),
            min: MIN_OPTIONS,
            max: MAX_OPTIONS,
        });
    }

    for (index, option) in options.iter().enumerate() {
        if option.label.as_str().is_empty() {
            return Err(ProtocolError::invalid("options", "empty option label"));
        }
        if options[..index].iter().any(|seen| seen.label == option.label) {
            return Err(ProtocolError::DuplicateOption(option.label.to_string()));
        }
    }

    Ok(options)
}

/// Accepts either an option label (`"B"`) or the option's text (`"Security"`).
fn resolve_correct_answer(
    options: &[ScenarioOption],
    raw: &str,
) -> Result<OptionLabel, ProtocolError> {
    options
        .iter()
        .find(|option| option.label.matches(raw))
        .or_else(|| {
            options
                .iter()
                .find(|option| option.text.trim().eq_ignore_ascii_case(raw.trim()))
        })
        .map(|option| option.label.clone())
        .ok_or_else(|| ProtocolError::UnknownCorrectAnswer(raw.to_string()))
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateSessionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<IdValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<IdValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_scenario: Option<ScenarioPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_scenarios: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_scenarios: Option<Vec<ScenarioPayload>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionCreated {
    pub session_id: SessionId,
    pub current_scenario: Scenario,
    pub total_scenarios: Option<usize>,
    pub all_scenarios: Vec<Scenario>,
}

impl TryFrom<CreateSessionResponse> for SessionCreated {
    type Error = ProtocolError;

    fn try_from(payload: CreateSessionResponse) -> Result<Self, Self::Error> {
        let session_id = payload
            .session_id
            .or(payload.id)
            .map(IdValue::into_text)
            .filter(|id| !id.is_empty())
            .ok_or(ProtocolError::MissingField("session_id"))?;
        let current_scenario: Scenario = payload
            .current_scenario
            .ok_or(ProtocolError::MissingField("current_scenario"))?
            .try_into()?;

        let total_scenarios = payload
            .total_scenarios
            .map(|total| match usize::try_from(total) {
                Ok(total) if (1..=MAX_TOTAL_SCENARIOS).contains(&total) => Ok(total),
                _ => Err(ProtocolError::invalid(
                    "total_scenarios",
                    format!("must be between 1 and {MAX_TOTAL_SCENARIOS}, got {total}"),
                )),
            })
            .transpose()?;

        let all_scenarios = payload
            .all_scenarios
            .unwrap_or_default()
            .into_iter()
            .map(Scenario::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            session_id: SessionId(session_id),
            current_scenario,
            total_scenarios,
            all_scenarios,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmitAnswerResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points_earned: Option<i64>,
    #[serde(default)]
    pub game_completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_scenario: Option<ScenarioPayload>,
}

/// Backend verdict for one answer. The controller folds it into an
/// [`crate::domain::AnswerResult`].
#[derive(Debug, Clone, PartialEq)]
pub struct ServerVerdict {
    pub is_correct: bool,
    pub correct_answer: Option<String>,
    pub explanation: Option<String>,
    pub score: Option<u32>,
    pub points_earned: Option<u32>,
    pub game_completed: bool,
    pub next_scenario: Option<Scenario>,
}

impl TryFrom<SubmitAnswerResponse> for ServerVerdict {
    type Error = ProtocolError;

    fn try_from(payload: SubmitAnswerResponse) -> Result<Self, Self::Error> {
        let is_correct = payload
            .is_correct
            .or(payload.correct)
            .ok_or(ProtocolError::MissingField("is_correct"))?;
        let score = payload
            .score
            .map(|score| non_negative("score", score))
            .transpose()?;
        let points_earned = payload
            .points_earned
            .map(|points| non_negative("points_earned", points))
            .transpose()?;
        if score.is_none() && points_earned.is_none() {
            return Err(ProtocolError::MissingField("score"));
        }

        Ok(Self {
            is_correct,
            correct_answer: non_empty(payload.correct_answer),
            explanation: non_empty(payload.explanation.or(payload.feedback)),
            score,
            points_earned,
            game_completed: payload.game_completed,
            next_scenario: payload.next_scenario.map(Scenario::try_from).transpose()?,
        })
    }
}

fn non_negative(field: &'static str, value: i64) -> Result<u32, ProtocolError> {
    u32::try_from(value)
        .map_err(|_| ProtocolError::invalid(field, format!("out of range: {value}")))
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
