use std::path::Path;

use crate::scenario::Scenario;

pub fn snapshot(path: &Path) -> anyhow::Result<()> {
    let scenario = Scenario::from_file(path)?;
    println!("{}", render(&scenario)?);
    Ok(())
}

/// Replay the scenario into a scheduler and serialize what it ended up with.
pub fn render(scenario: &Scenario) -> anyhow::Result<String> {
    let scheduler = scenario.scheduler()?;
    Ok(scheduler.snapshot().to_json()?)
}

#[cfg(test)]
mod tests {
    use rsched_core::{SchedulerSnapshot, ServiceFootprint};

    use super::*;

    const SCENARIO: &str = r#"
nodes = [
    { name = "B", cpu = 8, memory = 16000000000 },
    { name = "A", cpu = 4, memory = 8000000000 },
]

[[services]]
id = "vm:200"
node = "B"
footprint = { cpu = 2, memory = 4000000000 }

[[services]]
id = "vm:100"
node = "A"
footprint = { cpu = 1, memory = 1000000000 }

[[services]]
id = "vm:100"
node = "B"
footprint = { cpu = 1.5, memory = 2000000000 }

[candidate]
cpu = 1
memory = 1
"#;

    #[test]
    fn output_is_a_sorted_snapshot() {
        let scenario: Scenario = toml::from_str(SCENARIO).unwrap();

        let json = render(&scenario).unwrap();
        let snapshot = SchedulerSnapshot::from_json(&json).unwrap();

        let nodes: Vec<&str> = snapshot.nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(nodes, vec!["A", "B"]);
        assert_eq!(snapshot.nodes[1].cpu, 8);

        let services: Vec<(&str, &str)> = snapshot
            .services
            .iter()
            .map(|s| (s.id.as_str(), s.node.as_str()))
            .collect();
        assert_eq!(services, vec![("vm:100", "B"), ("vm:200", "B")]);
        assert_eq!(
            snapshot.services[0].footprint,
            ServiceFootprint::new(1.5, 2_000_000_000).unwrap()
        );
    }

    #[test]
    fn file_scenario_renders_like_parsed_one() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scenario.toml");
        std::fs::write(&path, SCENARIO).unwrap();

        let from_file = render(&Scenario::from_file(&path).unwrap()).unwrap();
        let parsed = render(&toml::from_str(SCENARIO).unwrap()).unwrap();

        assert_eq!(from_file, parsed);
    }

    #[test]
    fn dangling_service_is_an_error() {
        let mut scenario: Scenario = toml::from_str(SCENARIO).unwrap();
        scenario.services[0].node = "Z".to_string();

        assert!(render(&scenario).is_err());
    }
}
