use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::OutputFormat;
use crate::scenario::Scenario;

/// One placement round.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Round {
    pub iteration: usize,
    pub service_id: String,
    /// Node names, best first. The first one received the service.
    pub ranking: Vec<String>,
}

pub fn simulate(path: &Path, iterations: usize, format: OutputFormat) -> anyhow::Result<()> {
    let scenario = Scenario::from_file(path)?;
    let rounds = run(&scenario, iterations)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rounds)?),
        OutputFormat::Text => {
            for round in &rounds {
                println!(
                    "{:>4}  {:<12} -> {}",
                    round.iteration,
                    round.service_id,
                    round.ranking.join(" > ")
                );
            }
        }
    }
    Ok(())
}

/// Place the scenario's candidate `iterations` times, each time on the
/// best-ranked node. Stops early if the scenario has no nodes.
pub fn run(scenario: &Scenario, iterations: usize) -> anyhow::Result<Vec<Round>> {
    let mut scheduler = scenario.scheduler()?;
    let mut rounds = Vec::with_capacity(iterations);

    for iteration in 0..iterations {
        let ranking: Vec<String> = scheduler
            .rank_nodes_to_start_service(&scenario.candidate)
            .into_iter()
            .map(|s| s.node)
            .collect();
        let Some(winner) = ranking.first() else {
            break;
        };

        let service_id = format!("sim:{iteration}");
        scheduler.add_service_usage_to_node(winner, service_id.clone(), scenario.candidate)?;
        debug!(iteration, node = %winner, service = %service_id, "placed candidate");

        rounds.push(Round {
            iteration,
            service_id,
            ranking,
        });
    }

    Ok(rounds)
}
