use super::*;

#[test]
fn option_labels_compare_ignoring_case() {
    assert_eq!(OptionLabel::new("b"), OptionLabel::new(" B "));
    assert!(OptionLabel::new("Functional").matches("functional"));
    assert_ne!(OptionLabel::new("A"), OptionLabel::new("B"));
}

#[test]
fn list_indices_map_to_letters() {
    assert_eq!(OptionLabel::from_index(0).as_str(), "A");
    assert_eq!(OptionLabel::from_index(7).as_str(), "H");
}

#[test]
fn game_variants_parse_from_slugs_and_titles() {
    assert_eq!(
        "quality-quest".parse::<GameVariant>(),
        Ok(GameVariant::QualityQuest)
    );
    assert_eq!(
        "RequirementRally".parse::<GameVariant>(),
        Ok(GameVariant::RequirementRally)
    );
    assert_eq!(
        "usability_universe".parse::<GameVariant>(),
        Ok(GameVariant::UsabilityUniverse)
    );
    assert!("chess".parse::<GameVariant>().is_err());
}

#[test]
fn languages_parse_and_serialize_as_codes() {
    assert_eq!("ES".parse::<Language>(), Ok(Language::Es));
    assert!("fr".parse::<Language>().is_err());
    assert_eq!(
        serde_json::to_string(&Language::En).expect("encode"),
        "\"en\""
    );
}

#[test]
fn scenario_checks_answers_against_its_correct_label() {
    let scenario = Scenario {
        id: None,
        content: "x".into(),
        options: vec![
            ScenarioOption {
                label: OptionLabel::new("A"),
                text: "one".into(),
            },
            ScenarioOption {
                label: OptionLabel::new("B"),
                text: "two".into(),
            },
        ],
        correct_answer: Some(OptionLabel::new("B")),
        explanation: None,
        difficulty: None,
        category: None,
    };

    assert!(scenario.is_correct(&OptionLabel::new("b")));
    assert!(!scenario.is_correct(&OptionLabel::new("A")));
    assert_eq!(scenario.option("a").map(|option| option.text.as_str()), Some("one"));
}
