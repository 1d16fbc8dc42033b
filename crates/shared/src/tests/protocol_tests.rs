use super::*;
use serde_json::json;

fn scenario_from(value: serde_json::Value) -> Result<Scenario, ProtocolError> {
    let payload: ScenarioPayload = serde_json::from_value(value).expect("decode payload");
    Scenario::try_from(payload)
}

#[test]
fn labeled_options_keep_their_labels_and_resolve_correct_answer() {
    let scenario = scenario_from(json!({
        "id": "qq-1",
        "content": "A banking app must keep balances confidential.",
        "options": {"A": "Performance", "B": "Security", "C": "Usability", "D": "Reliability"},
        "correct_answer": "b",
        "feedback": "Security protects confidentiality.",
        "difficulty": 2
    }))
    .expect("valid scenario");

    assert_eq!(scenario.id, Some(ScenarioId("qq-1".into())));
    assert_eq!(scenario.options.len(), 4);
    assert_eq!(scenario.options[1].label.as_str(), "B");
    assert_eq!(scenario.correct_answer, Some(OptionLabel::new("B")));
    assert_eq!(
        scenario.explanation.as_deref(),
        Some("Security protects confidentiality.")
    );
    assert_eq!(scenario.difficulty.as_deref(), Some("2"));
}

#[test]
fn listed_options_are_lettered_in_order() {
    let scenario = scenario_from(json!({
        "id": 17,
        "content": "The system must send a confirmation email.",
        "options": ["Functional", "Non-Functional", "Constraint", "Not a requirement"],
        "correctOption": "A"
    }))
    .expect("valid scenario");

    let labels: Vec<&str> = scenario
        .options
        .iter()
        .map(|option| option.label.as_str())
        .collect();
    assert_eq!(labels, ["A", "B", "C", "D"]);
    assert_eq!(scenario.id, Some(ScenarioId("17".into())));
    assert_eq!(scenario.correct_answer, Some(OptionLabel::new("A")));
}

#[test]
fn described_options_and_text_answers_are_accepted() {
    let scenario = scenario_from(json!({
        "content": "Users forget how to export reports after a week away.",
        "options": [
            {"id": "learn", "text": "Learnability"},
            {"id": "memo", "text": "Memorability"}
        ],
        "correct_answer": "Memorability"
    }))
    .expect("valid scenario");

    assert_eq!(scenario.correct_answer, Some(OptionLabel::new("memo")));
    assert!(scenario.id.is_none());
}

#[test]
fn scenario_without_content_is_malformed() {
    let err = scenario_from(json!({"options": ["a", "b"]})).expect_err("must fail");
    assert_eq!(err, ProtocolError::MissingField("content"));
}

#[test]
fn scenario_with_single_option_is_malformed() {
    let err = scenario_from(json!({"content": "x", "options": ["only"]})).expect_err("must fail");
    assert!(matches!(err, ProtocolError::OptionCount { count: 1, .. }));
}

#[test]
fn scenario_with_unknown_correct_answer_is_malformed() {
    let err = scenario_from(json!({
        "content": "x",
        "options": {"A": "one", "B": "two"},
        "correct_answer": "E"
    }))
    .expect_err("must fail");
    assert_eq!(err, ProtocolError::UnknownCorrectAnswer("E".into()));
}

#[test]
fn duplicate_labels_differing_only_in_case_are_rejected() {
    let err = scenario_from(json!({
        "content": "x",
        "options": [{"label": "a", "text": "one"}, {"label": "A", "text": "two"}]
    }))
    .expect_err("must fail");
    assert_eq!(err, ProtocolError::DuplicateOption("A".into()));
}

#[test]
fn session_created_accepts_id_alias_and_scenario_list() {
    let payload: CreateSessionResponse = serde_json::from_value(json!({
        "id": "abc",
        "current_scenario": {"content": "first", "options": ["x", "y"]},
        "total_scenarios": 3,
        "all_scenarios": [
            {"content": "first", "options": ["x", "y"]},
            {"content": "second", "options": ["x", "y"]}
        ]
    }))
    .expect("decode");

    let created = SessionCreated::try_from(payload).expect("valid session");
    assert_eq!(created.session_id, SessionId("abc".into()));
    assert_eq!(created.total_scenarios, Some(3));
    assert_eq!(created.all_scenarios.len(), 2);
    assert_eq!(created.current_scenario.content, "first");
}

#[test]
fn session_created_requires_current_scenario() {
    let payload: CreateSessionResponse =
        serde_json::from_value(json!({"session_id": "abc"})).expect("decode");
    let err = SessionCreated::try_from(payload).expect_err("must fail");
    assert_eq!(err, ProtocolError::MissingField("current_scenario"));
}

#[test]
fn session_created_rejects_non_positive_total() {
    let payload: CreateSessionResponse = serde_json::from_value(json!({
        "session_id": "abc",
        "current_scenario": {"content": "first", "options": ["x", "y"]},
        "total_scenarios": 0
    }))
    .expect("decode");
    let err = SessionCreated::try_from(payload).expect_err("must fail");
    assert!(matches!(
        err,
        ProtocolError::InvalidField {
            field: "total_scenarios",
            ..
        }
    ));
}

#[test]
fn session_created_rejects_oversized_total() {
    for total in [json!(MAX_TOTAL_SCENARIOS + 1), json!(3_000_000), json!(i64::MAX)] {
        let payload: CreateSessionResponse = serde_json::from_value(json!({
            "session_id": "abc",
            "current_scenario": {"content": "first", "options": ["x", "y"]},
            "total_scenarios": total
        }))
        .expect("decode");
        let err = SessionCreated::try_from(payload).expect_err("must fail");
        assert!(matches!(
            err,
            ProtocolError::InvalidField {
                field: "total_scenarios",
                ..
            }
        ));
    }

    let payload: CreateSessionResponse = serde_json::from_value(json!({
        "session_id": "abc",
        "current_scenario": {"content": "first", "options": ["x", "y"]},
        "total_scenarios": MAX_TOTAL_SCENARIOS
    }))
    .expect("decode");
    let created = SessionCreated::try_from(payload).expect("upper bound is accepted");
    assert_eq!(created.total_scenarios, Some(MAX_TOTAL_SCENARIOS));
}

#[test]
fn verdict_accepts_points_earned_without_score() {
    let payload: SubmitAnswerResponse = serde_json::from_value(json!({
        "correct": true,
        "explanation": "Nice.",
        "points_earned": 10,
        "game_completed": false
    }))
    .expect("decode");

    let verdict = ServerVerdict::try_from(payload).expect("valid verdict");
    assert!(verdict.is_correct);
    assert_eq!(verdict.score, None);
    assert_eq!(verdict.points_earned, Some(10));
    assert!(verdict.correct_answer.is_none());
}

#[test]
fn verdict_without_correctness_flag_is_malformed() {
    let payload: SubmitAnswerResponse =
        serde_json::from_value(json!({"score": 10, "correct_answer": "A"})).expect("decode");
    let err = ServerVerdict::try_from(payload).expect_err("must fail");
    assert_eq!(err, ProtocolError::MissingField("is_correct"));
}

#[test]
fn verdict_with_negative_score_is_malformed() {
    let payload: SubmitAnswerResponse =
        serde_json::from_value(json!({"is_correct": false, "score": -5})).expect("decode");
    let err = ServerVerdict::try_from(payload).expect_err("must fail");
    assert!(matches!(err, ProtocolError::InvalidField { field: "score", .. }));
}

#[test]
fn create_request_omits_absent_filters() {
    let body = serde_json::to_value(CreateSessionRequest {
        name: "Ada".into(),
        category: None,
        difficulty: Some("easy".into()),
        language: Language::Es,
    })
    .expect("encode");
    assert_eq!(
        body,
        json!({"name": "Ada", "difficulty": "easy", "language": "es"})
    );
}
