use boardroom_game::{
    Archetype, ChoiceId, Crisis, EvTier, Flash, GameEngine, Industry, Phase, RevealStage,
    ScenarioKey, Scores, Session, SingleTrack, StaticCatalogLoader, TickerRules, Verdict,
    parse_path,
};

fn ticker_run(path: &str) -> Session<TickerRules> {
    let engine = GameEngine::new(StaticCatalogLoader);
    let mut session = engine.ticker_session(0xB0A2D).unwrap();
    session.select_scenario(SingleTrack).unwrap();
    session.begin().unwrap();
    for choice in parse_path(path).unwrap() {
        session.submit_choice(choice).unwrap();
        session.advance().unwrap();
    }
    session
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn ticker_paths_reach_every_verdict() {
    let cases = [
        ("ABABA", 141.29, Verdict::StrongBuy),
        ("BBABA", 128.33, Verdict::Outperform),
        ("ABAAA", 116.75, Verdict::Outperform),
        ("AAAAA", 102.30, Verdict::Hold),
        ("AABAA", 84.46, Verdict::Underperform),
        ("BBBBB", 80.41, Verdict::Underperform),
        ("AABAB", 64.10, Verdict::Sell),
        ("BABAB", 58.22, Verdict::Sell),
    ];
    for (path, price, verdict) in cases {
        let session = ticker_run(path);
        assert!(close(session.state().price, price), "{path}: {}", session.state().price);
        let outcome = session.outcome().unwrap();
        assert_eq!(outcome.verdict, verdict, "{path}");
        assert_eq!(outcome.winning, price >= 110.0, "{path}");
        assert_eq!(
            session.phase(),
            Phase::RevealingOutcome(RevealStage::Calculating)
        );
    }
}

#[test]
fn ticker_history_snapshots_track_each_step() {
    let session = ticker_run("ABABA");
    let prices: Vec<f64> = session
        .history()
        .iter()
        .map(|record| record.state_after.price)
        .collect();
    assert_eq!(prices.len(), 5);
    assert!(close(prices[0], 103.5));
    assert!(close(prices[1], 108.67));
    assert_eq!(session.state().history.len(), 6);
    let delta = session.last_delta().unwrap();
    assert_eq!(delta.level_id, 5);
    assert_eq!(delta.flash, Flash::Gain);
}

#[test]
fn ticker_sell_off_flashes_loss() {
    let engine = GameEngine::new(StaticCatalogLoader);
    let mut session = engine.ticker_session(1).unwrap();
    session.select_scenario(SingleTrack).unwrap();
    session.begin().unwrap();
    let delta = session.submit_choice(ChoiceId::B).unwrap();
    assert_eq!(delta.flash, Flash::Loss);
    assert!(close(delta.after, 94.0));
    assert!(close(delta.change, -6.0));
}

#[test]
fn scorecard_storylines_classify_as_expected() {
    let engine = GameEngine::new(StaticCatalogLoader);
    let cases = [
        (
            Industry::Financial,
            Crisis::Competitor,
            "AAAAAA",
            Scores::new(52, 28, 44, -12),
            2_780,
            EvTier::Solid,
            Archetype::VelocityMaximizer,
        ),
        (
            Industry::Financial,
            Crisis::Competitor,
            "BBBBBB",
            Scores::new(37, 53, 15, 40),
            5_500,
            EvTier::Exceptional,
            Archetype::TrustGuardian,
        ),
        (
            Industry::Financial,
            Crisis::Competitor,
            "ABABAB",
            Scores::new(49, 38, 29, 15),
            4_725,
            EvTier::Exceptional,
            Archetype::Architect,
        ),
        (
            Industry::Financial,
            Crisis::Market,
            "AAAAAA",
            Scores::new(46, 22, 41, -27),
            2_420,
            EvTier::Partial,
            Archetype::EfficiencyTrap,
        ),
        (
            Industry::Financial,
            Crisis::Breach,
            "AAAAAA",
            Scores::new(44, 14, 43, -14),
            1_760,
            EvTier::Partial,
            Archetype::CautionaryTale,
        ),
        (
            Industry::Tech,
            Crisis::Product,
            "BBBBBB",
            Scores::new(33, 60, 15, 42),
            5_700,
            EvTier::Exceptional,
            Archetype::TrustGuardian,
        ),
    ];
    for (industry, crisis, path, scores, ev, tier, archetype) in cases {
        let mut session = engine.scorecard_session(9).unwrap();
        session
            .select_scenario(ScenarioKey::new(industry, crisis))
            .unwrap();
        session.begin().unwrap();
        for choice in parse_path(path).unwrap() {
            session.submit_choice(choice).unwrap();
            session.advance().unwrap();
        }
        session.skip_reveal().unwrap();
        let outcome = session.outcome().unwrap();
        let label = format!("{industry:?}/{crisis:?}/{path}");
        assert_eq!(outcome.scores, scores, "{label}");
        assert_eq!(outcome.ev, ev, "{label}");
        assert_eq!(outcome.tier, tier, "{label}");
        assert_eq!(outcome.archetype, archetype, "{label}");
        assert_eq!(outcome.winning, ev >= 3_500, "{label}");
        assert_eq!(session.phase(), Phase::ShowingResult);
    }
}

#[test]
fn scorecard_undo_walks_back_to_the_start() {
    let engine = GameEngine::new(StaticCatalogLoader);
    let mut session = engine.scorecard_session(3).unwrap();
    session
        .select_scenario(ScenarioKey::new(Industry::Healthcare, Crisis::Breach))
        .unwrap();
    session.begin().unwrap();
    let mut snapshots = vec![*session.state()];
    for choice in parse_path("ABBABA").unwrap() {
        session.submit_choice(choice).unwrap();
        session.advance().unwrap();
        snapshots.push(*session.state());
    }
    assert_eq!(session.outcome().unwrap().ev, 4_475);
    snapshots.pop();
    while let Some(expected) = snapshots.pop() {
        session.undo().unwrap();
        assert_eq!(*session.state(), expected);
        assert!(session.outcome().is_none());
    }
    assert!(session.choices().is_empty());
    assert!(session.undo().is_err());
}
