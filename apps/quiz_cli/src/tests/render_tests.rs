use super::*;
use client_core::{EvaluationSource, PerformanceBand};
use shared::domain::{OptionLabel, ScenarioOption};

fn rendered(language: Language, event: ControllerEvent) -> String {
    let mut out = Vec::new();
    TerminalRenderer::new(&mut out, language)
        .render(&event)
        .expect("render");
    String::from_utf8(out).expect("utf8")
}

fn result(is_correct: bool, explanation: &str) -> AnswerResult {
    AnswerResult {
        is_correct,
        correct_answer: "B".into(),
        explanation: explanation.into(),
        score: 30,
        game_completed: false,
        next_scenario: None,
    }
}

#[test]
fn scenario_screen_lists_options_with_position() {
    let scenario = Scenario {
        id: None,
        content: "Which characteristic is violated?".into(),
        options: vec![
            ScenarioOption {
                label: OptionLabel::new("A"),
                text: "Usability".into(),
            },
            ScenarioOption {
                label: OptionLabel::new("B"),
                text: "Security".into(),
            },
        ],
        correct_answer: None,
        explanation: None,
        difficulty: Some("easy".into()),
        category: Some("Security".into()),
    };

    let text = rendered(
        Language::En,
        ControllerEvent::ScenarioPresented {
            index: 1,
            total: 5,
            scenario,
        },
    );

    assert!(text.contains("Scenario 2 of 5"));
    assert!(text.contains("Category: Security"));
    assert!(text.contains("Difficulty: easy"));
    assert!(text.contains("  A) Usability\n  B) Security\n"));
}

#[test]
fn incorrect_answer_shows_correct_label_and_default_feedback() {
    let text = rendered(
        Language::Es,
        ControllerEvent::AnswerEvaluated {
            result: result(false, ""),
            source: EvaluationSource::Local,
        },
    );

    assert!(text.contains("Incorrecto."));
    assert!(text.contains("Respuesta correcta: B"));
    assert!(text.contains("¡Sigue practicando!"));
    assert!(text.contains("Puntuación: 30"));
}

#[test]
fn correct_answer_shows_explanation() {
    let text = rendered(
        Language::En,
        ControllerEvent::AnswerEvaluated {
            result: result(true, "Access control is a security concern."),
            source: EvaluationSource::Server,
        },
    );

    assert!(text.starts_with("Correct!\n"));
    assert!(!text.contains("Correct answer"));
    assert!(text.contains("Access control is a security concern."));
}

#[test]
fn results_screen_reports_band_and_time() {
    let summary = GameSummary {
        player_name: "Ada".into(),
        score: 40,
        max_score: 50,
        correct_answers: 4,
        total_scenarios: 5,
        mode: None,
        band: PerformanceBand::VeryGood,
        elapsed_seconds: 65,
    };

    let text = rendered(Language::En, ControllerEvent::Completed(summary));

    assert!(text.contains("Game complete, Ada!"));
    assert!(text.contains("Final score: 40/50 (80%)"));
    assert!(text.contains("Correct answers: 4/5"));
    assert!(text.contains("Very good!"));
    assert!(text.contains("Time played: 1m 05s"));
}

#[test]
fn quiet_events_render_nothing() {
    assert!(rendered(Language::En, ControllerEvent::Reset).is_empty());
    assert!(rendered(
        Language::En,
        ControllerEvent::OptionSelected(OptionLabel::new("A"))
    )
    .is_empty());
    assert!(rendered(Language::En, ControllerEvent::PhaseChanged(GamePhase::Completed)).is_empty());
}

#[test]
fn unknown_option_error_is_localized() {
    let mut out = Vec::new();
    TerminalRenderer::new(&mut out, Language::Es)
        .controller_error(&ControllerError::UnknownOption("Z".into()))
        .expect("render");
    assert_eq!(
        String::from_utf8(out).expect("utf8"),
        "Esa opción no está disponible: Z\n"
    );
}
