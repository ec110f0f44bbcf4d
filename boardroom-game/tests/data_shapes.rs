use std::collections::BTreeSet;

use boardroom_game::constants::{LEVELS_PER_SCENARIO, MONTH_MARKERS, TOTAL_MONTHS};
use boardroom_game::{
    Archetype, ChoiceId, EvTier, OutcomeCatalog, ScenarioKey, ScorecardCatalog, Scores,
    StockState, TickerCatalog, Verdict,
};
use serde_json::{Value, json};

#[test]
fn scorecard_months_follow_the_timeline() {
    let catalog = ScorecardCatalog::load_from_static().unwrap();
    for key in ScenarioKey::all() {
        let levels = catalog.levels_for(key).unwrap();
        assert_eq!(levels.len(), LEVELS_PER_SCENARIO, "{key}");
        for (level, marker) in levels.iter().zip(MONTH_MARKERS) {
            assert_eq!(level.month, format!("Month {marker}"), "{key} level {}", level.id);
            assert!(!level.scenario.is_empty(), "{key} level {} has no copy", level.id);
            for choice in ChoiceId::ALL {
                assert!(!level.choices.get(choice).is_empty());
                assert!(!level.insights.get(choice).first.is_empty());
                assert!(!level.insights.get(choice).second.is_empty());
            }
        }
    }
    assert!(MONTH_MARKERS.iter().all(|month| *month < TOTAL_MONTHS));
}

#[test]
fn ticker_months_increase_and_kinds_match_direction() {
    let catalog = TickerCatalog::load_from_static().unwrap();
    let months: Vec<u8> = catalog.levels().iter().map(|l| l.month_number).collect();
    assert!(months.windows(2).all(|pair| pair[0] < pair[1]));
    for level in catalog.levels() {
        for (_, option) in level.choices.iter() {
            let json = serde_json::to_value(&option.ticker).unwrap();
            let kind = json["kind"].as_str().unwrap();
            match kind {
                "gain" => assert!(option.ticker.percent > 0.0),
                "loss" | "volatile" => assert!(option.ticker.percent < 0.0),
                other => panic!("unexpected kind {other}"),
            }
        }
    }
}

#[test]
fn outcome_keys_match_enum_serialization() {
    let catalog = OutcomeCatalog::load_from_static().unwrap();
    let value = serde_json::to_value(&catalog).unwrap();
    let keys = |section: &str| -> BTreeSet<String> {
        value[section].as_object().unwrap().keys().cloned().collect()
    };
    let verdicts: BTreeSet<String> = Verdict::ALL
        .iter()
        .map(|v| serde_json::to_value(v).unwrap().as_str().unwrap().to_string())
        .collect();
    let tiers: BTreeSet<String> = EvTier::ALL.iter().map(|t| t.key().to_string()).collect();
    let archetypes: BTreeSet<String> = Archetype::ALL
        .iter()
        .map(|a| serde_json::to_value(a).unwrap().as_str().unwrap().to_string())
        .collect();
    assert_eq!(keys("verdicts"), verdicts);
    assert_eq!(keys("tiers"), tiers);
    assert_eq!(keys("archetypes"), archetypes);
}

#[test]
fn state_types_use_wire_names() {
    let scores = serde_json::to_value(Scores::new(1, 2, 3, -4)).unwrap();
    assert_eq!(scores, json!({ "MV": 1, "TR": 2, "OR": 3, "TL": -4 }));

    let baseline = serde_json::to_value(StockState::baseline()).unwrap();
    assert_eq!(baseline["price"], json!(100.0));
    assert_eq!(baseline["history"], json!([100.0]));
    assert_eq!(baseline["change_percent"], json!(0.0));

    let key: Value = serde_json::to_value(ScenarioKey::all().last().unwrap()).unwrap();
    assert_eq!(key, json!({ "industry": "tech", "crisis": "product" }));
}
