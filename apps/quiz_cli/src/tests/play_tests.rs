use super::*;
use std::sync::Arc;

use client_core::{MissingSessionApi, ScoringPolicy, StaticScenarios};
use shared::domain::{GameVariant, Language, OptionLabel, Scenario, ScenarioOption};
use tokio::io::AsyncBufReadExt;

async fn play_offline(game: GameVariant, language: Language, script: &str) -> String {
    let mut controller = GameSessionController::offline(game, ScoringPolicy::default());
    let mut out = Vec::new();
    let mut renderer = TerminalRenderer::new(&mut out, language);
    let mut input = script.as_bytes().lines();

    run(
        &mut controller,
        &mut renderer,
        &mut input,
        StartOptions {
            player_name: "Ada".into(),
            language,
            ..StartOptions::default()
        },
    )
    .await
    .expect("play");

    drop(renderer);
    String::from_utf8(out).expect("utf8")
}

#[tokio::test]
async fn full_offline_game_reaches_results() {
    let text = play_offline(
        GameVariant::QualityQuest,
        Language::En,
        "B\n\nA\n\nC\n\nC\n\nD\n\nn\n",
    )
    .await;

    assert!(text.starts_with("Welcome to QualityQuest\n"));
    assert!(text.contains("offline scenarios"));
    assert!(text.contains("Scenario 5 of 5"));
    assert!(text.contains("Game complete, Ada!"));
    assert!(text.contains("Final score: 40/50 (80%)"));
    assert!(text.trim_end().ends_with("Thanks for playing!"));
}

#[tokio::test]
async fn blank_and_unknown_answers_are_reprompted() {
    let text = play_offline(GameVariant::QualityQuest, Language::En, "\nZ\nq\n").await;

    assert!(text.contains("Please select an option before submitting."));
    assert!(text.contains("That option is not available: Z"));
    assert!(!text.contains("Score:"));
    assert!(text.trim_end().ends_with("Thanks for playing!"));
}

#[tokio::test]
async fn rematch_starts_a_fresh_game_in_spanish() {
    let round = "A\n\nB\n\nC\n\nB\n\nA\n\n";
    let script = format!("{round}s\n{round}n\n");

    let text = play_offline(GameVariant::RequirementRally, Language::Es, &script).await;

    assert_eq!(text.matches("Bienvenido a RequirementRally").count(), 2);
    assert_eq!(text.matches("Puntuación final: 50/50 (100%)").count(), 2);
    assert!(text.contains("¡Gracias por jugar!"));
}

#[tokio::test]
async fn closed_input_ends_the_session() {
    let text = play_offline(GameVariant::UsabilityUniverse, Language::En, "").await;

    assert!(text.contains("Scenario 1 of 5"));
    assert!(text.trim_end().ends_with("Thanks for playing!"));
}

#[tokio::test]
async fn option_labelled_q_is_an_answer_not_a_quit() {
    let scenario = Scenario {
        id: None,
        content: "Pick the quality characteristic".into(),
        options: ["P", "Q"]
            .into_iter()
            .map(|label| ScenarioOption {
                label: OptionLabel::new(label),
                text: format!("Option {label}"),
            })
            .collect(),
        correct_answer: Some(OptionLabel::new("Q")),
        explanation: None,
        difficulty: None,
        category: None,
    };
    let mut controller = GameSessionController::new_with_dependencies(
        GameVariant::QualityQuest,
        ScoringPolicy::new(10, 1),
        Arc::new(MissingSessionApi),
        Arc::new(StaticScenarios(vec![scenario])),
    );
    let mut out = Vec::new();
    let mut renderer = TerminalRenderer::new(&mut out, Language::En);
    let mut input = "q\n\nn\n".as_bytes().lines();

    run(&mut controller, &mut renderer, &mut input, StartOptions::default())
        .await
        .expect("play");
    drop(renderer);
    let text = String::from_utf8(out).expect("utf8");

    assert!(text.contains("Correct!"));
    assert!(text.contains("Final score: 10/10 (100%)"));
}
