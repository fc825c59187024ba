//! Dependency quickstart
//!
//! Three entities whose goals depend on each other: the whale cannot appear
//! before the tea party is over, and the petunias wait for the whale. The
//! navigator merges their timelines and fills the gaps with slack events.
//!
//! Run with `RUST_LOG=chronos_navigator=debug` to watch the scheduler.

use chronos_algebra::{ChangeEvent, ChangeSet};
use chronos_navigator::{Entity, FnMetric, Navigator, Ontology, Path, Result, Schema};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn single(eid: &'static str, dt: f64) -> impl Fn(&Entity) -> Result<ChangeSet> + Send + Sync {
    move |_| Ok(ChangeSet::closed([ChangeEvent::new(eid, 0.0, dt)?])?)
}

fn build() -> Result<Ontology> {
    let mut onto = Ontology::new();
    onto.add_schema(
        Schema::new("tea-party", 5.0)
            .with_default_dt(0.5)
            .with_description("A tea party with Vogons"),
    )?;
    onto.add_schema(
        Schema::new("whale", 10.0)
            .with_default_dt(0.2)
            .with_description("A spontaneous whale appearance"),
    )?;
    onto.add_schema(
        Schema::new("petunia", 15.0)
            .with_default_dt(0.1)
            .with_description("A petunia uprising"),
    )?;

    onto.spawn(
        "tea_entity",
        "tea-party",
        "tea-party-with-Vogon",
        single("tea-party-with-Vogon", 0.5),
    )?;
    onto.spawn(
        "whale_entity",
        "whale",
        "spontaneous-whale-appearance",
        single("spontaneous-whale-appearance", 0.2),
    )?;
    onto.spawn(
        "petunia_entity",
        "petunia",
        "petunia-uprising",
        single("petunia-uprising", 0.1),
    )?;

    onto.add_dependency("tea_entity", "whale_entity", "supports")?;
    onto.add_dependency("whale_entity", "petunia_entity", "supports")?;
    Ok(onto)
}

fn run() -> Result<()> {
    let onto = build()?;

    // Time weighs in once, waiting between events weighs double.
    let metric = FnMetric(|from: &ChangeEvent, to: &ChangeEvent| {
        to.dt() + 2.0 * (to.t0() - from.end()).max(0.0)
    });
    let nav = Navigator::with_metric(metric);

    let timeline = nav.multi_entity_schedule(&onto)?;
    let path = Path::new(timeline.iter().cloned().collect(), 0.0, 1.0);
    println!("Combined timeline (with dependencies):");
    print!("{path}");

    for entity in onto.entities() {
        let goal = nav.entity_goal_path(entity)?;
        info!(entity = %entity.name(), cost = goal.cost(), "goal reachable");
    }
    Ok(())
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chronos_navigator=info,dependency_quickstart=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run() {
        error!("Scheduling failed: {}", e);
        std::process::exit(1);
    }
}
