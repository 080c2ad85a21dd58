//! Assembles content, battle and runtime for one headless session.
use std::io::Write;

use anyhow::{Context, Result};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{info, warn};

use combat_content::{CombatContent, ContentFactory};
use combat_core::{Battle, CombatOutcome, RandomTargetPolicy};
use combat_runtime::{AutoConfirmProvider, Event, EventBus, Runtime, RuntimeConfig};

use crate::config::ClientConfig;

pub fn load_content(config: &ClientConfig) -> Result<CombatContent> {
    match &config.data_dir {
        Some(dir) => ContentFactory::new(dir)
            .load_all()
            .with_context(|| format!("failed to load content from {}", dir.display())),
        None => CombatContent::embedded().context("embedded content is invalid"),
    }
}

pub fn build_battle(config: &ClientConfig, content: &CombatContent) -> Result<Battle> {
    let party = content
        .party
        .party(config.party.iter().map(String::as_str))?;
    let enemies = content.bestiary.encounter(&config.encounter)?;

    let battle = Battle::builder()
        .config(content.config.clone())
        .allies(party)
        .enemies(enemies)
        .items(content.items.clone())
        .enemy_policy(RandomTargetPolicy::new(config.seed))
        .seed(config.seed)
        .build()?;
    Ok(battle)
}

/// Runs the battle to its end, writing every event to `out` as one JSON line.
pub async fn run<W>(config: &ClientConfig, battle: Battle, out: W) -> Result<CombatOutcome>
where
    W: Write + Send + 'static,
{
    let mut runtime_config = RuntimeConfig::real_time(config.tick_interval)
        .with_time_step(config.time_step());
    runtime_config.max_ticks = config.max_ticks;

    let bus = EventBus::with_capacity(runtime_config.event_buffer_size);
    let events = bus.subscribe_all();

    let runtime = Runtime::builder()
        .config(runtime_config)
        .battle(battle)
        .provider(AutoConfirmProvider)
        .event_bus(bus)
        .build()?;
    let printer = tokio::spawn(print_events(events, out));

    info!(encounter = %config.encounter, seed = config.seed, "battle started");
    let outcome = runtime.wait().await?;
    let printed = printer.await.context("event printer panicked")??;
    info!(won = outcome.won, events = printed, "battle finished");
    Ok(outcome)
}

async fn print_events<W: Write>(mut events: broadcast::Receiver<Event>, mut out: W) -> Result<u64> {
    let mut printed = 0;
    loop {
        match events.recv().await {
            Ok(event) => {
                serde_json::to_writer(&mut out, &event)?;
                writeln!(out)?;
                printed += 1;
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "event printer fell behind");
            }
            Err(RecvError::Closed) => break,
        }
    }
    out.flush()?;
    Ok(printed)
}
