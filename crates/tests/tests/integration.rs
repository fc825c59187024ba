//! Integration tests for end-to-end Chronos navigation.
//!
//! These tests drive the public API only:
//! Build change sets → Spawn entities → Navigate → Verify

use chronos_algebra::{ChangeEvent, ChangeSet, EventId, State};
use chronos_navigator::{
    Error, Metric, Navigator, NavigatorConfig, PriorityPolicy, TrustWeighted, pretty_report,
};
use chronos_tests::{
    PETUNIA_GOAL, TEA_GOAL, TestHarness, WHALE_GOAL, eids, improbability_chain, path_eids,
};

/// The most probable scenario of a chain of future events is the chain.
#[test]
fn test_improbability_chain_top_scenario() {
    let nav = Navigator::new();
    let scenarios = nav.most_probable_scenarios(&improbability_chain(), 3);

    assert!(!scenarios.is_empty());
    assert!(scenarios.len() <= 3);
    assert_eq!(
        path_eids(&scenarios[0]),
        ["idea", "tea", "whale", "petunia"]
    );
    assert!((scenarios[0].probability() - 1.0 * 0.7 * 0.3 * 0.15).abs() < 1e-12);
}

/// Chain: tea supports whale supports petunia, all declared at t0 = 0.
///
/// whale and petunia must wait, each behind a slack event.
#[test]
fn test_whimsical_schedule_inserts_slack() {
    let harness = TestHarness::whimsical();
    let timeline = harness.schedule().unwrap();

    assert!(timeline.is_closed());
    assert_eq!(timeline.len(), 5);

    let slack = timeline.index_of(&"slack-whale_entity".into()).unwrap();
    let whale = timeline.index_of(&WHALE_GOAL.into()).unwrap();
    assert!(slack < whale);

    let tea_done = timeline.get(&TEA_GOAL.into()).unwrap().end();
    let whale_goal = timeline.get(&WHALE_GOAL.into()).unwrap();
    assert!(whale_goal.t0() >= tea_done);
    assert_eq!(whale_goal.dt(), 0.2);

    let petunia_goal = timeline.get(&PETUNIA_GOAL.into()).unwrap();
    assert!(petunia_goal.t0() >= whale_goal.end());
    assert!(timeline.contains(&"slack-petunia_entity".into()));

    let slack_event = timeline.get(&"slack-whale_entity".into()).unwrap();
    assert_eq!(slack_event.prob(), 1.0);
    assert_eq!(slack_event.t0(), 0.0);
    assert_eq!(slack_event.end(), whale_goal.t0());
}

/// Same ontology, same result: scheduling is a pure function.
#[test]
fn test_schedule_is_deterministic() {
    let first = TestHarness::whimsical().schedule().unwrap();
    let second = TestHarness::whimsical().schedule().unwrap();
    assert_eq!(first, second);
    assert_eq!(eids(&first), eids(&second));
}

/// Parallel and sequential generation produce the same timeline.
#[test]
fn test_sequential_generation_matches_parallel() {
    let parallel = TestHarness::whimsical().schedule().unwrap();

    let mut harness = TestHarness::whimsical();
    harness.configure(NavigatorConfig {
        parallel_generation: false,
        ..NavigatorConfig::default()
    });
    assert_eq!(harness.schedule().unwrap(), parallel);
    assert_eq!(harness.generator_calls(), 3);
}

/// A supports B, B supports A: rejected before any generator runs.
#[test]
fn test_cycle_rejected_before_generation() {
    let mut harness = TestHarness::new();
    harness.spawn_single("a_entity", "whale", "a-goal", 0.0, 1.0);
    harness.spawn_single("b_entity", "whale", "b-goal", 0.0, 1.0);
    harness.link("a_entity", "b_entity", "supports");
    harness.link("b_entity", "a_entity", "supports");

    let err = harness.schedule().unwrap_err();
    match err {
        Error::CyclicDependency { entities } => {
            assert_eq!(entities.len(), 2);
        }
        other => panic!("expected a cyclic dependency, got {other:?}"),
    }
    assert_eq!(harness.generator_calls(), 0);
}

/// Priority decides among entities that are ready together.
#[test]
fn test_priority_policy_orders_ready_entities() {
    let mut harness = TestHarness::new();
    harness.spawn_single("quiet", "whale", "quiet-goal", 0.0, 1.0);
    harness.spawn_single("popular", "whale", "popular-goal", 0.0, 1.0);
    harness.spawn_single("fan", "whale", "fan-goal", 5.0, 1.0);
    harness.link("popular", "fan", "supports");

    let declared =
        chronos_navigator::dag::topological_order(harness.ontology(), PriorityPolicy::Declared)
            .unwrap();
    let effective =
        chronos_navigator::dag::topological_order(harness.ontology(), PriorityPolicy::Effective)
            .unwrap();

    let names = |order: &[&chronos_navigator::Entity]| {
        order.iter().map(|e| e.name().to_string()).collect::<Vec<_>>()
    };
    assert_eq!(names(&declared), ["quiet", "popular", "fan"]);
    assert_eq!(names(&effective), ["popular", "quiet", "fan"]);
}

/// The goal path of each whimsical entity is its single goal event.
#[test]
fn test_goal_path_reaches_goal() {
    let harness = TestHarness::whimsical();
    let path = harness.goal_path("whale_entity").unwrap();

    assert_eq!(path.last().unwrap().eid().as_str(), WHALE_GOAL);
    assert!(path.cost() >= 0.0);
    assert_eq!(path.probability(), 1.0);
}

#[test]
fn test_goal_never_generated_is_unreachable() {
    let mut harness = TestHarness::new();
    harness.spawn_with("drifter", "whale", "destination", |_| {
        Ok(ChangeSet::open([ChangeEvent::new("wander", 0.0, 1.0)?])?)
    });

    let err = harness.goal_path("drifter").unwrap_err();
    assert!(matches!(err, Error::UnreachableGoal { .. }));
}

/// Waiting costs double, whether before the first event or between events.
struct Patience;

impl Metric for Patience {
    fn distance(&self, from: &ChangeEvent, to: &ChangeEvent) -> f64 {
        (to.t0() - from.end()) * 2.0 + to.dt()
    }

    fn entry_cost(&self, to: &ChangeEvent) -> f64 {
        to.t0() * 2.0 + to.dt()
    }
}

/// Distrusted moves cost more, steering the path to a trusted route.
#[test]
fn test_trust_weighted_goal_path() {
    let mut harness = TestHarness::new();
    harness.spawn_with("traveller", "tea-party", "arrive", |_| {
        Ok(ChangeSet::open([
            ChangeEvent::new("walk", 0.0, 3.0)?,
            ChangeEvent::new("taxi", 0.0, 1.0)?,
            ChangeEvent::new("arrive", 3.0, 0.5)?,
        ])?)
    });
    let traveller = harness.ontology().entity(&"traveller".into()).unwrap();

    // Fully trusted, walking leaves no idle time.
    let plain = Navigator::with_metric(Patience)
        .entity_goal_path(traveller)
        .unwrap();
    assert_eq!(path_eids(&plain), ["walk", "arrive"]);
    assert_eq!(plain.cost(), 3.5);

    let trust = |from: &EventId, _: &EventId| if *from == "walk" { 0.0 } else { 1.0 };
    let nav = Navigator::with_metric(TrustWeighted::new(Patience, trust, 10.0));
    let path = nav.entity_goal_path(traveller).unwrap();
    assert_eq!(path_eids(&path), ["taxi", "arrive"]);
    assert_eq!(path.cost(), 5.5);
}

/// With plain durations the cheapest way to a goal is to enter it directly.
#[test]
fn test_duration_goal_path_enters_goal_directly() {
    let mut harness = TestHarness::new();
    harness.spawn_with("traveller", "tea-party", "arrive", |_| {
        Ok(ChangeSet::open([
            ChangeEvent::new("leave", 0.0, 1.0)?,
            ChangeEvent::new("arrive", 3.0, 0.5)?,
        ])?)
    });
    let path = harness.goal_path("traveller").unwrap();
    assert_eq!(path_eids(&path), ["arrive"]);
    assert_eq!(path.cost(), 0.5);
}

/// Scheduling is what makes a multi-entity timeline evolvable.
#[test]
fn test_scheduled_timeline_evolves() {
    let mut harness = TestHarness::new();
    harness.spawn_with("cup", "tea-party", "pour", |_| {
        Ok(ChangeSet::closed([ChangeEvent::transition(
            "pour", 0.0, 1.0, 100.0, 60.0,
        )?])?)
    });
    harness.spawn_with("kettle", "tea-party", "heat", |_| {
        Ok(ChangeSet::closed([ChangeEvent::transition(
            "heat", 0.0, 2.0, 20.0, 100.0,
        )?])?)
    });

    // Merged naively, the cup pours before the kettle boils.
    let naive = harness
        .ontology()
        .entities()
        .map(|e| e.generate().unwrap())
        .try_fold(ChangeSet::default(), |acc, set| acc.compose(&set))
        .unwrap();
    assert!(naive.evolve(&State::Scalar(20.0)).is_err());

    harness.link("kettle", "cup", "supports");
    let timeline = harness.schedule().unwrap();
    assert_eq!(eids(&timeline), ["heat", "slack-cup", "pour"]);
    assert_eq!(timeline.evolve(&State::Scalar(20.0)).unwrap(), State::Scalar(60.0));
}

/// Undoing a scheduled timeline returns to where it started.
#[test]
fn test_schedule_then_inverse_round_trips_state() {
    let mut harness = TestHarness::new();
    harness.spawn_with("lamp", "whale", "on", |_| {
        Ok(ChangeSet::closed([ChangeEvent::transition("on", 0.0, 1.0, "off", "on")?])?)
    });
    harness.spawn_with("dimmer", "whale", "dim", |_| {
        Ok(ChangeSet::closed([ChangeEvent::transition("dim", 0.0, 1.0, "on", "dim")?])?)
    });
    harness.link("lamp", "dimmer", "supports");

    let timeline = harness.schedule().unwrap();
    let undo = timeline.compose(&timeline.inverse()).unwrap();
    let start = State::from("off");
    assert_eq!(timeline.evolve(&start).unwrap(), State::from("dim"));
    assert_eq!(undo.evolve(&start).unwrap(), start);
}

/// Reports mark slack events and stay stable across runs.
#[test]
fn test_report_marks_slack() {
    let harness = TestHarness::whimsical();
    let timeline = harness.schedule().unwrap();
    let path = chronos_navigator::Path::new(timeline.iter().cloned().collect(), 0.0, 1.0);

    let report = pretty_report(&path, "slack-");
    assert_eq!(report.matches("[slack]").count(), 2);
    assert!(report.contains(&format!("• {TEA_GOAL} (t0: 0, dt: 0.5)\n")));
    assert_eq!(report, pretty_report(&path, "slack-"));
}

/// Euler integration through the public API.
#[test]
fn test_integrate_decay() {
    let nav = Navigator::new();
    let field = |x: &[f64]| x.iter().map(|v| -v).collect::<Vec<_>>();
    let trajectory = nav.integrate(&field, &[8.0, -8.0], 3, 0.5).unwrap();
    assert_eq!(trajectory.last().unwrap(), &vec![1.0, -1.0]);
}
