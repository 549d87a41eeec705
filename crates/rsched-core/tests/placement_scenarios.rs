//! End-to-end placement scenarios.
//!
//! Each test drives a `StaticScheduler` the way a host orchestrator
//! would: register nodes, ask for a ranking, put the service on the
//! winner, repeat.

use std::collections::BTreeSet;

use rsched_core::*;

const MIB: u64 = 1 << 20;
const GIB: u64 = 1 << 30;

fn ranked(scheduler: &StaticScheduler, footprint: &ServiceFootprint) -> Vec<String> {
    scheduler
        .rank_nodes_to_start_service(footprint)
        .into_iter()
        .map(|s| s.node)
        .collect()
}

/// Rank, assert the expected order, then place the service on the winner.
fn place_and_check(
    scheduler: &mut StaticScheduler,
    footprint: &ServiceFootprint,
    iterations: usize,
    expected: impl Fn(usize) -> Vec<&'static str>,
) {
    for i in 0..iterations {
        let order = ranked(scheduler, footprint);
        assert_eq!(order, expected(i), "unexpected ranking in iteration {i}");

        scheduler
            .add_service_usage_to_node(&order[0], format!("vm:{}", 100 + i), *footprint)
            .unwrap();
    }
}

#[test]
fn node_membership_follows_adds_and_removes() {
    let mut scheduler = StaticScheduler::new();
    assert_eq!(scheduler.list_nodes().len(), 0);

    scheduler.add_node("A", 10, 100_000_000_000).unwrap();
    assert_eq!(scheduler.list_nodes().len(), 1);
    scheduler.add_node("B", 20, 200_000_000_000).unwrap();
    assert_eq!(scheduler.list_nodes().len(), 2);
    scheduler.add_node("C", 30, 300_000_000_000).unwrap();
    assert_eq!(scheduler.list_nodes().len(), 3);

    scheduler.remove_node("C");

    assert_eq!(scheduler.list_nodes().len(), 2);
    assert!(scheduler.contains_node("A"));
    assert!(scheduler.contains_node("B"));
    assert!(!scheduler.contains_node("C"));
}

#[test]
fn membership_matches_model_for_mixed_sequence() {
    let mut scheduler = StaticScheduler::new();
    let mut model = BTreeSet::new();

    let ops: &[(bool, &str)] = &[
        (true, "n1"),
        (true, "n2"),
        (true, "n1"),
        (false, "n3"),
        (true, "n3"),
        (false, "n1"),
        (false, "n1"),
        (true, "n4"),
        (false, "n2"),
    ];
    for (add, name) in ops {
        if *add {
            scheduler.add_node(*name, 4, 4 * GIB).unwrap();
            model.insert(name.to_string());
        } else {
            scheduler.remove_node(name);
            model.remove(*name);
        }

        let listed: BTreeSet<String> = scheduler.list_nodes().into_iter().collect();
        assert_eq!(listed, model);
        for candidate in ["n1", "n2", "n3", "n4"] {
            assert_eq!(scheduler.contains_node(candidate), model.contains(candidate));
        }
    }
}

#[test]
fn bigger_node_receives_twice_the_services() {
    let mut scheduler =
        StaticScheduler::from_nodes([("A", 10, 100_000_000_000), ("B", 20, 200_000_000_000)])
            .unwrap();
    let footprint = ServiceFootprint::whole(4, 20_000_000_000);

    place_and_check(&mut scheduler, &footprint, 15, |i| {
        if i % 3 == 2 { vec!["A", "B"] } else { vec!["B", "A"] }
    });

    assert_eq!(scheduler.usage_of_node("A").unwrap().services, 5);
    assert_eq!(scheduler.usage_of_node("B").unwrap().services, 10);
}

#[test]
fn overcommitted_nodes_rank_last() {
    let mut scheduler = StaticScheduler::from_nodes([
        ("A", 4, 4_102_062_080),
        ("B", 4, 4_102_062_080),
        ("C", 4, 4_102_053_888),
        ("D", 4, 4_102_053_888),
    ])
    .unwrap();

    let loads = [
        ServiceFootprint::whole(2, 2 * GIB),
        ServiceFootprint::whole(2, GIB),
        ServiceFootprint::whole(1, GIB),
        ServiceFootprint::whole(1, 512 * MIB),
    ];
    for (i, load) in loads.iter().enumerate() {
        scheduler
            .add_service_usage_to_node("A", format!("vm:{}", 100 + i), *load)
            .unwrap();
    }
    scheduler
        .add_service_usage_to_node("B", "vm:200", ServiceFootprint::whole(1, 512 * MIB))
        .unwrap();

    let footprint = ServiceFootprint::whole(1, 536_870_912);
    let scores = scheduler.score_nodes_to_start_service(&footprint);

    assert_eq!(scores.len(), 4);
    assert!(scores.iter().all(|(_, score)| score.is_finite()));
    assert_eq!(ranked(&scheduler, &footprint), vec!["C", "D", "B", "A"]);
}

#[test]
fn heterogeneous_nodes_cycle_deterministically() {
    let mut scheduler = StaticScheduler::from_nodes([
        ("A", 8, 10_000_000_000),
        ("B", 4, 9_000_000_000),
        ("C", 4, 8_000_000_000),
    ])
    .unwrap();
    let footprint = ServiceFootprint::whole(3, 16_000_000);

    place_and_check(&mut scheduler, &footprint, 20, |i| match i % 4 {
        0 | 1 => vec!["A", "B", "C"],
        2 => vec!["B", "C", "A"],
        _ => vec!["C", "A", "B"],
    });
}

#[test]
fn removed_node_disappears_from_scores() {
    let mut scheduler =
        StaticScheduler::from_nodes([("A", 4, 8 * GIB), ("B", 4, 8 * GIB)]).unwrap();
    scheduler
        .add_service_usage_to_node("A", "vm:100", ServiceFootprint::whole(2, 2 * GIB))
        .unwrap();
    scheduler
        .add_service_usage_to_node("A", "vm:101", ServiceFootprint::whole(1, GIB))
        .unwrap();

    scheduler.remove_node("A");
    let scores = scheduler.score_nodes_to_start_service(&ServiceFootprint::whole(1, GIB));

    assert_eq!(scores.len(), 1);
    assert_eq!(scores[0].0, "B");
    assert_eq!(scheduler.service_count(), 0);
}

#[test]
fn one_score_per_node_regardless_of_history() {
    let mut scheduler =
        StaticScheduler::from_nodes([("A", 2, 2 * GIB), ("B", 4, 4 * GIB), ("C", 8, 8 * GIB)])
            .unwrap();
    let footprint = ServiceFootprint::whole(1, GIB);

    for i in 0..10 {
        let node = ["A", "B", "C"][i % 3];
        scheduler
            .add_service_usage_to_node(node, format!("ct:{i}"), ServiceFootprint::whole(3, 3 * GIB))
            .unwrap();
        if i % 4 == 0 {
            scheduler.remove_service_usage(&format!("ct:{i}"));
        }

        let scores = scheduler.score_nodes_to_start_service(&footprint);
        let nodes: BTreeSet<String> = scores.into_iter().map(|(node, _)| node).collect();
        assert_eq!(nodes.len(), 3);
    }
}

#[test]
fn migration_overwrites_previous_assignment() {
    let mut scheduler =
        StaticScheduler::from_nodes([("A", 4, 8 * GIB), ("B", 4, 8 * GIB)]).unwrap();
    scheduler
        .add_service_usage_to_node("A", "vm:100", ServiceFootprint::whole(2, 4 * GIB))
        .unwrap();
    scheduler
        .add_service_usage_to_node("B", "vm:100", ServiceFootprint::whole(1, GIB))
        .unwrap();

    assert_eq!(scheduler.service_count(), 1);
    assert_eq!(scheduler.usage_of_node("A").unwrap(), NodeUsage::default());
    let b = scheduler.usage_of_node("B").unwrap();
    assert_eq!((b.cpu, b.memory, b.services), (1.0, GIB, 1));
}

#[test]
fn more_usage_never_improves_relative_score() {
    let footprint = ServiceFootprint::whole(1, GIB);
    let mut previous_gap = f64::INFINITY;

    for load in 0..12u32 {
        let mut scheduler =
            StaticScheduler::from_nodes([("A", 8, 16 * GIB), ("B", 8, 16 * GIB)]).unwrap();
        scheduler
            .add_service_usage_to_node("B", "vm:b", ServiceFootprint::whole(2, 2 * GIB))
            .unwrap();
        if load > 0 {
            let footprint = ServiceFootprint::whole(load, u64::from(load) * GIB);
            scheduler
                .add_service_usage_to_node("A", "vm:a", footprint)
                .unwrap();
        }

        let scores = scheduler.score_nodes_to_start_service(&footprint);
        let score = |node: &str| scores.iter().find(|(n, _)| n == node).unwrap().1;
        let gap = score("A") - score("B");

        assert!(gap <= previous_gap, "load {load}: gap {gap} grew from {previous_gap}");
        previous_gap = gap;
    }
}

#[test]
fn snapshot_survives_json_round_trip() {
    let mut scheduler =
        StaticScheduler::from_nodes([("A", 8, 10_000_000_000), ("B", 4, 9_000_000_000)]).unwrap();
    scheduler
        .add_service_usage_to_node("A", "vm:100", ServiceFootprint::new(1.5, 512 * MIB).unwrap())
        .unwrap();

    let json = scheduler.snapshot().to_json().unwrap();
    let snapshot = SchedulerSnapshot::from_json(&json).unwrap();
    let restored = StaticScheduler::restore(&snapshot, &SchedulerConfig::default()).unwrap();

    let footprint = ServiceFootprint::whole(3, 16_000_000);
    assert_eq!(ranked(&restored, &footprint), ranked(&scheduler, &footprint));
    assert_eq!(restored.snapshot(), scheduler.snapshot());
}

#[test]
fn oversized_cpu_requests_keep_scores_finite() {
    assert!(ServiceFootprint::new(1e200, 1).is_err());
    assert!(ServiceFootprint::new(ServiceFootprint::MAX_CPU * 2.0, 1).is_err());

    let mut scheduler = StaticScheduler::from_nodes([("A", 4, GIB), ("B", 4, GIB)]).unwrap();
    let largest = ServiceFootprint::new(ServiceFootprint::MAX_CPU, 1).unwrap();
    for i in 0..3 {
        scheduler
            .add_service_usage_to_node("A", format!("vm:{i}"), largest)
            .unwrap();
    }

    let footprint = ServiceFootprint::whole(1, GIB);
    let scores = scheduler.score_nodes_to_start_service(&footprint);

    assert_eq!(scores.len(), 2);
    assert!(scores.iter().all(|(_, s)| s.is_finite() && (0.0..=1.0).contains(s)));
    assert_eq!(ranked(&scheduler, &footprint), vec!["B", "A"]);
}
