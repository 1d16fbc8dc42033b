use std::sync::Arc;

use chrono::{DateTime, Utc};
use shared::{
    domain::{AnswerResult, GameVariant, Language, OptionLabel, Scenario, SessionId},
    protocol::{CreateSessionRequest, ServerVerdict, SubmitAnswerRequest},
};
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

pub mod api;
pub mod error;
pub mod fallback;
pub mod scoring;

pub use api::{
    HttpSessionApi, MissingSessionApi, SessionApi, SessionEndpoints, DEFAULT_REQUEST_TIMEOUT,
};
pub use error::{ControllerError, SessionApiError};
pub use fallback::{BuiltinScenarios, FallbackDeck, ScenarioProvider, StaticScenarios};
pub use scoring::{PerformanceBand, ScoringPolicy};

pub const DEFAULT_PLAYER_NAME: &str = "Player";
const EVENT_CHANNEL_CAPACITY: usize = 256;
const LOCAL_SESSION_PREFIX: &str = "local-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamePhase {
    Idle,
    AwaitingScenario,
    ScenarioPresented,
    AnswerSubmitted,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionMode {
    Live(SessionId),
    Fallback(SessionId),
}

impl SessionMode {
    pub fn session_id(&self) -> &SessionId {
        match self {
            SessionMode::Live(id) | SessionMode::Fallback(id) => id,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, SessionMode::Fallback(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationSource {
    Server,
    Local,
}

#[derive(Debug, Clone, Default)]
pub struct StartOptions {
    pub player_name: String,
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub language: Language,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameSummary {
    pub player_name: String,
    pub score: u32,
    pub max_score: u32,
    pub correct_answers: usize,
    pub total_scenarios: usize,
    pub mode: Option<SessionMode>,
    pub band: PerformanceBand,
    pub elapsed_seconds: i64,
}

/// State-change notifications for renderers.
#[derive(Debug, Clone)]
pub enum ControllerEvent {
    PhaseChanged(GamePhase),
    FallbackActivated {
        reason: String,
    },
    ScenarioPresented {
        index: usize,
        total: usize,
        scenario: Scenario,
    },
    OptionSelected(OptionLabel),
    SelectionRequired,
    AnswerEvaluated {
        result: AnswerResult,
        source: EvaluationSource,
    },
    Completed(GameSummary),
    Reset,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Evaluated {
        result: AnswerResult,
        source: EvaluationSource,
    },
    AlreadySubmitted,
    SelectionRequired,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AdvanceOutcome {
    Presented { index: usize },
    Completed(GameSummary),
}

#[derive(Debug, Clone)]
pub struct GameState {
    pub phase: GamePhase,
    pub mode: Option<SessionMode>,
    pub player_name: String,
    pub language: Language,
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub index: usize,
    pub total_scenarios: usize,
    pub score: u32,
    pub correct_answers: usize,
    pub selected: Option<OptionLabel>,
    pub submitted: bool,
    pub current: Option<Scenario>,
    pub last_result: Option<AnswerResult>,
    session_scenarios: Vec<Scenario>,
    next_from_server: Option<Scenario>,
    fallback_deck: Option<FallbackDeck>,
    started_at: Option<DateTime<Utc>>,
}

impl GameState {
    fn initial(total_scenarios: usize) -> Self {
        Self {
            phase: GamePhase::Idle,
            mode: None,
            player_name: String::new(),
            language: Language::default(),
            category: None,
            difficulty: None,
            index: 0,
            total_scenarios,
            score: 0,
            correct_answers: 0,
            selected: None,
            submitted: false,
            current: None,
            last_result: None,
            session_scenarios: Vec::new(),
            next_from_server: None,
            fallback_deck: None,
            started_at: None,
        }
    }

    /// Completion is decided by position alone, never by the backend's flag.
    pub fn is_last_scenario(&self) -> bool {
        self.index + 1 >= self.total_scenarios
    }

    pub fn can_submit(&self) -> bool {
        self.phase == GamePhase::ScenarioPresented && self.selected.is_some() && !self.submitted
    }
}

/// Drives one play-through of a game against a [`SessionApi`], degrading to
/// the [`ScenarioProvider`]'s local content whenever the backend fails.
pub struct GameSessionController {
    variant: GameVariant,
    policy: ScoringPolicy,
    api: Arc<dyn SessionApi>,
    provider: Arc<dyn ScenarioProvider>,
    state: GameState,
    events: broadcast::Sender<ControllerEvent>,
}

impl GameSessionController {
    pub fn new(variant: GameVariant, api: Arc<dyn SessionApi>) -> Self {
        Self::new_with_dependencies(
            variant,
            ScoringPolicy::default(),
            api,
            Arc::new(BuiltinScenarios::for_variant(variant)),
        )
    }

    pub fn offline(variant: GameVariant, policy: ScoringPolicy) -> Self {
        Self::new_with_dependencies(
            variant,
            policy,
            Arc::new(MissingSessionApi),
            Arc::new(BuiltinScenarios::for_variant(variant)),
        )
    }

    pub fn new_with_dependencies(
        variant: GameVariant,
        policy: ScoringPolicy,
        api: Arc<dyn SessionApi>,
        provider: Arc<dyn ScenarioProvider>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            variant,
            policy,
            api,
            provider,
            state: GameState::initial(policy.total_scenarios),
            events,
        }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ControllerEvent> {
        self.events.subscribe()
    }

    pub fn variant(&self) -> GameVariant {
        self.variant
    }

    pub fn policy(&self) -> ScoringPolicy {
        self.policy
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn current_scenario(&self) -> Option<&Scenario> {
        self.state.current.as_ref()
    }

    /// Begins a new play-through, abandoning any previous one.
    ///
    /// Backend failures of any kind switch to fallback mode; the only error is
    /// a fallback provider with nothing to offer. Dropping the returned future
    /// leaves the controller in `AwaitingScenario` until [`Self::reset`] or
    /// another `start`.
    pub async fn start(&mut self, options: StartOptions) -> Result<SessionMode, ControllerError> {
        let player_name = match options.player_name.trim() {
            "" => DEFAULT_PLAYER_NAME.to_string(),
            name => name.to_string(),
        };
        let category = non_blank(options.category);
        let difficulty = non_blank(options.difficulty);

        self.state = GameState::initial(self.policy.total_scenarios);
        self.state.player_name = player_name.clone();
        self.state.language = options.language;
        self.state.category = category.clone();
        self.state.difficulty = difficulty.clone();
        self.state.started_at = Some(Utc::now());
        self.set_phase(GamePhase::AwaitingScenario);

        let request = CreateSessionRequest {
            name: player_name,
            category,
            difficulty,
            language: options.language,
        };

        match self.api.create_session(&request).await {
            Ok(created) => {
                let total = created
                    .total_scenarios
                    .unwrap_or(self.policy.total_scenarios);
                info!(
                    game = self.variant.slug(),
                    session_id = %created.session_id,
                    total_scenarios = total,
                    prefetched = created.all_scenarios.len(),
                    "session: live session created"
                );
                let mode = SessionMode::Live(created.session_id);
                self.state.total_scenarios = total;
                self.state.mode = Some(mode.clone());
                self.state.session_scenarios = created.all_scenarios;
                self.present(created.current_scenario);
                Ok(mode)
            }
            Err(err) => {
                warn!(
                    game = self.variant.slug(),
                    error = %err,
                    "session: create failed, switching to fallback scenarios"
                );
                self.activate_fallback(err.to_string())
            }
        }
    }

    fn activate_fallback(&mut self, reason: String) -> Result<SessionMode, ControllerError> {
        self.state.total_scenarios = self.policy.total_scenarios;
        let first = self.fallback_scenario(0);
        let Some(first) = first else {
            self.set_phase(GamePhase::Idle);
            return Err(ControllerError::ScenarioUnavailable { index: 0 });
        };

        let mode = SessionMode::Fallback(SessionId(format!(
            "{LOCAL_SESSION_PREFIX}{}",
            Uuid::new_v4()
        )));
        info!(
            game = self.variant.slug(),
            session_id = %mode.session_id(),
            total_scenarios = self.state.total_scenarios,
            "session: fallback session started"
        );
        self.state.mode = Some(mode.clone());
        let _ = self
            .events
            .send(ControllerEvent::FallbackActivated { reason });
        self.present(first);
        Ok(mode)
    }

    pub fn select_option(&mut self, label: &str) -> Result<(), ControllerError> {
        if self.state.phase != GamePhase::ScenarioPresented || self.state.submitted {
            return Err(ControllerError::InvalidPhase {
                operation: "select an option",
                phase: self.state.phase,
            });
        }
        let scenario = self
            .state
            .current
            .as_ref()
            .ok_or(ControllerError::InvalidPhase {
                operation: "select an option",
                phase: self.state.phase,
            })?;
        let chosen = scenario
            .option(label)
            .map(|option| option.label.clone())
            .ok_or_else(|| ControllerError::UnknownOption(label.trim().to_string()))?;

        debug!(option = %chosen, index = self.state.index, "session: option selected");
        self.state.selected = Some(chosen.clone());
        let _ = self.events.send(ControllerEvent::OptionSelected(chosen));
        Ok(())
    }

    /// Scores the selected option once per scenario.
    ///
    /// Live sessions ask the backend first; fallback sessions and failed
    /// requests are scored locally against the scenario's correct answer.
    /// Nothing is recorded until the answer has been evaluated, so dropping
    /// the returned future leaves the scenario open for another attempt.
    pub async fn submit(&mut self) -> Result<SubmitOutcome, ControllerError> {
        match self.state.phase {
            GamePhase::ScenarioPresented => {}
            GamePhase::AnswerSubmitted => return Ok(SubmitOutcome::AlreadySubmitted),
            phase => {
                return Err(ControllerError::InvalidPhase {
                    operation: "submit an answer",
                    phase,
                })
            }
        }
        if self.state.submitted {
            debug!(index = self.state.index, "session: duplicate submit ignored");
            return Ok(SubmitOutcome::AlreadySubmitted);
        }
        let Some(selected) = self.state.selected.clone() else {
            let _ = self.events.send(ControllerEvent::SelectionRequired);
            return Ok(SubmitOutcome::SelectionRequired);
        };
        let Some(scenario) = self.state.current.clone() else {
            return Err(ControllerError::InvalidPhase {
                operation: "submit an answer",
                phase: self.state.phase,
            });
        };

        let (result, source) = match self.state.mode.clone() {
            Some(SessionMode::Live(session_id)) => {
                let request = SubmitAnswerRequest {
                    selected_option: selected.to_string(),
                    scenario_id: Some(
                        scenario
                            .id
                            .as_ref()
                            .map(|id| id.to_string())
                            .unwrap_or_else(|| self.state.index.to_string()),
                    ),
                };
                match self.api.submit_answer(&session_id, &request).await {
                    Ok(verdict) => (
                        self.apply_verdict(verdict, &scenario),
                        EvaluationSource::Server,
                    ),
                    Err(err) => {
                        warn!(
                            game = self.variant.slug(),
                            session_id = %session_id,
                            index = self.state.index,
                            error = %err,
                            "session: submit failed, scoring locally"
                        );
                        (
                            self.evaluate_locally(&selected, &scenario),
                            EvaluationSource::Local,
                        )
                    }
                }
            }
            _ => (
                self.evaluate_locally(&selected, &scenario),
                EvaluationSource::Local,
            ),
        };

        info!(
            game = self.variant.slug(),
            index = self.state.index,
            is_correct = result.is_correct,
            score = result.score,
            source = ?source,
            "session: answer evaluated"
        );
        self.state.submitted = true;
        self.state.last_result = Some(result.clone());
        self.set_phase(GamePhase::AnswerSubmitted);
        let _ = self.events.send(ControllerEvent::AnswerEvaluated {
            result: result.clone(),
            source,
        });
        Ok(SubmitOutcome::Evaluated { result, source })
    }

    fn apply_verdict(&mut self, verdict: ServerVerdict, scenario: &Scenario) -> AnswerResult {
        let game_completed = self.state.is_last_scenario();
        if verdict.game_completed != game_completed {
            // Scenario count wins; mismatches are surfaced for follow-up.
            warn!(
                server_completed = verdict.game_completed,
                client_completed = game_completed,
                index = self.state.index,
                total_scenarios = self.state.total_scenarios,
                "session: backend completion flag disagrees with scenario count"
            );
        }

        let reported = verdict.score.unwrap_or_else(|| {
            self.state
                .score
                .saturating_add(verdict.points_earned.unwrap_or(0))
        });
        if reported < self.state.score {
            warn!(
                reported,
                local = self.state.score,
                "session: backend reported a lower score, keeping local score"
            );
        } else {
            self.state.score = reported;
        }
        if verdict.is_correct {
            self.state.correct_answers += 1;
        }

        self.state.next_from_server = verdict.next_scenario.clone();

        AnswerResult {
            is_correct: verdict.is_correct,
            correct_answer: verdict
                .correct_answer
                .or_else(|| scenario.correct_answer.as_ref().map(|label| label.to_string()))
                .unwrap_or_default(),
            explanation: verdict
                .explanation
                .or_else(|| scenario.explanation.clone())
                .unwrap_or_default(),
            score: self.state.score,
            game_completed,
            next_scenario: if game_completed {
                None
            } else {
                verdict.next_scenario
            },
        }
    }

    fn evaluate_locally(&mut self, selected: &OptionLabel, scenario: &Scenario) -> AnswerResult {
        if scenario.correct_answer.is_none() {
            warn!(
                index = self.state.index,
                "session: scenario has no known correct answer, scoring as incorrect"
            );
        }
        let is_correct = scenario.is_correct(selected);
        self.state.score = self
            .state
            .score
            .saturating_add(self.policy.award(is_correct));
        if is_correct {
            self.state.correct_answers += 1;
        }

        self.state.next_from_server = None;
        let game_completed = self.state.is_last_scenario();
        let next_scenario = if game_completed {
            None
        } else {
            self.scenario_at(self.state.index + 1)
        };

        AnswerResult {
            is_correct,
            correct_answer: scenario
                .correct_answer
                .as_ref()
                .map(|label| label.to_string())
                .unwrap_or_default(),
            explanation: scenario.explanation.clone().unwrap_or_default(),
            score: self.state.score,
            game_completed,
            next_scenario,
        }
    }

    /// Moves past the evaluated scenario, or finishes the game when the
    /// configured number of scenarios has been played.
    pub fn advance(&mut self) -> Result<AdvanceOutcome, ControllerError> {
        if self.state.phase != GamePhase::AnswerSubmitted {
            return Err(ControllerError::InvalidPhase {
                operation: "advance",
                phase: self.state.phase,
            });
        }

        let next_index = self.state.index + 1;
        if next_index >= self.state.total_scenarios {
            self.state.index = next_index;
            self.state.selected = None;
            self.state.submitted = false;
            self.set_phase(GamePhase::Completed);
            let summary = self.summary();
            info!(
                game = self.variant.slug(),
                score = summary.score,
                max_score = summary.max_score,
                correct_answers = summary.correct_answers,
                "session: game completed"
            );
            let _ = self.events.send(ControllerEvent::Completed(summary.clone()));
            return Ok(AdvanceOutcome::Completed(summary));
        }

        let Some(scenario) = self.scenario_at(next_index) else {
            error!(
                game = self.variant.slug(),
                index = next_index,
                "session: no scenario available to continue"
            );
            return Err(ControllerError::ScenarioUnavailable { index: next_index });
        };

        self.state.index = next_index;
        self.state.next_from_server = None;
        self.state.last_result = None;
        self.present(scenario);
        Ok(AdvanceOutcome::Presented { index: next_index })
    }

    /// Returns to `Idle`. A live backend session is abandoned, not closed.
    pub fn reset(&mut self) {
        let previous = self.state.phase;
        if let Some(mode) = &self.state.mode {
            debug!(session_id = %mode.session_id(), "session: abandoning session");
        }
        self.state = GameState::initial(self.policy.total_scenarios);
        if previous != GamePhase::Idle {
            let _ = self.events.send(ControllerEvent::PhaseChanged(GamePhase::Idle));
        }
        let _ = self.events.send(ControllerEvent::Reset);
    }

    pub fn summary(&self) -> GameSummary {
        let max_score = self.policy.max_score(self.state.total_scenarios);
        GameSummary {
            player_name: self.state.player_name.clone(),
            score: self.state.score,
            max_score,
            correct_answers: self.state.correct_answers,
            total_scenarios: self.state.total_scenarios,
            mode: self.state.mode.clone(),
            band: PerformanceBand::from_score(self.state.score, max_score),
            elapsed_seconds: self
                .state
                .started_at
                .map(|started| (Utc::now() - started).num_seconds())
                .unwrap_or_default(),
        }
    }

    /// Lookup order: the session's prefetched list, the scenario attached to
    /// the last submit response, then the local fallback list.
    fn scenario_at(&mut self, index: usize) -> Option<Scenario> {
        if let Some(scenario) = self.state.session_scenarios.get(index) {
            return Some(scenario.clone());
        }
        if let Some(scenario) = self.state.next_from_server.clone() {
            return Some(scenario);
        }
        if !self.state.mode.as_ref().is_some_and(SessionMode::is_fallback) {
            debug!(index, "session: using fallback scenario in live session");
        }
        self.fallback_scenario(index)
    }

    fn fallback_scenario(&mut self, index: usize) -> Option<Scenario> {
        if self.state.fallback_deck.is_none() {
            let scenarios = match self.provider.scenarios(self.state.language) {
                Ok(scenarios) => scenarios,
                Err(err) => {
                    error!(
                        game = self.variant.slug(),
                        error = %err,
                        "session: fallback scenarios failed to load"
                    );
                    Vec::new()
                }
            };
            self.state.fallback_deck = Some(FallbackDeck::new(
                scenarios,
                self.state.category.as_deref(),
                self.state.difficulty.as_deref(),
            ));
        }
        self.state
            .fallback_deck
            .as_ref()
            .and_then(|deck| deck.get(index))
            .cloned()
    }

    fn present(&mut self, scenario: Scenario) {
        self.state.current = Some(scenario.clone());
        self.state.selected = None;
        self.state.submitted = false;
        self.set_phase(GamePhase::ScenarioPresented);
        let _ = self.events.send(ControllerEvent::ScenarioPresented {
            index: self.state.index,
            total: self.state.total_scenarios,
            scenario,
        });
    }

    fn set_phase(&mut self, phase: GamePhase) {
        if self.state.phase != phase {
            self.state.phase = phase;
            let _ = self.events.send(ControllerEvent::PhaseChanged(phase));
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
