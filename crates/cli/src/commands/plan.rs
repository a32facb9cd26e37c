use maint_seed::{Phase, SeederSettings, StatementBatch};
use serde::Serialize;

use super::load_batch;

#[derive(Serialize)]
struct PlanEntry<'a> {
    position: usize,
    phase: Phase,
    name: &'a str,
}

pub async fn run(settings: SeederSettings, json: bool) -> anyhow::Result<()> {
    let batch = load_batch(&settings).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries(&batch))?);
        return Ok(());
    }

    println!("Execution plan ({} statements):", batch.len());
    for phase in [Phase::Create, Phase::Delete, Phase::Insert, Phase::Other] {
        if batch.phase_len(phase) == 0 {
            continue;
        }
        println!("\n{} ({})", phase, batch.phase_len(phase));
        for entry in entries(&batch).iter().filter(|e| e.phase == phase) {
            println!("  {:>3}. {}", entry.position, entry.name);
        }
    }
    Ok(())
}

fn entries(batch: &StatementBatch) -> Vec<PlanEntry<'_>> {
    batch
        .iter()
        .enumerate()
        .map(|(i, statement)| PlanEntry {
            position: i + 1,
            phase: statement.phase,
            name: &statement.name,
        })
        .collect()
}
