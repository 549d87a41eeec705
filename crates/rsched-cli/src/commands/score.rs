use std::path::Path;

use rsched_core::NodeScore;

use crate::OutputFormat;
use crate::scenario::Scenario;

pub fn score(path: &Path, format: OutputFormat) -> anyhow::Result<()> {
    let scenario = Scenario::from_file(path)?;
    let ranked = rank(&scenario)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&ranked)?),
        OutputFormat::Text => print!("{}", format_ranking(&ranked)),
    }
    Ok(())
}

/// Rank the scenario's nodes for its candidate, best first.
pub fn rank(scenario: &Scenario) -> anyhow::Result<Vec<NodeScore>> {
    let scheduler = scenario.scheduler()?;
    Ok(scheduler.rank_nodes_to_start_service(&scenario.candidate))
}

pub fn format_ranking(ranked: &[NodeScore]) -> String {
    let mut out = String::new();
    if ranked.is_empty() {
        out.push_str("no nodes registered\n");
        return out;
    }

    out.push_str(&format!(
        "{:<4} {:<16} {:>8}  {:>6} {:>6} {:>6} {:>6}\n",
        "RANK", "NODE", "SCORE", "AVGCPU", "MAXCPU", "AVGMEM", "MAXMEM"
    ));
    for (i, s) in ranked.iter().enumerate() {
        out.push_str(&format!(
            "{:<4} {:<16} {:>8.4}  {:>6.3} {:>6.3} {:>6.3} {:>6.3}\n",
            i + 1,
            s.node,
            s.score,
            s.breakdown.average_cpu - 1.0,
            s.breakdown.highest_cpu - 1.0,
            s.breakdown.average_memory - 1.0,
            s.breakdown.highest_memory - 1.0,
        ));
    }
    out
}
