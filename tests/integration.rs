use egonet::*;
use serde_json::{json, Value};
use std::cell::Cell;
use std::rc::Rc;

fn manual_network(start: i64) -> (Rc<ManualClock>, ContextualEgoNetwork) {
    let clock = Rc::new(ManualClock::new(start));
    let net = ContextualEgoNetwork::with_parts(
        "ego",
        json!({"name": "Ego"}),
        SharedClock::from_rc(clock.clone()),
        ErrorPolicy::Strict,
    )
    .unwrap();
    (clock, net)
}

// Scenario A/B: one interaction on an ego edge, then alter resolution.
#[test]
fn interaction_lifecycle_on_an_ego_edge() {
    let (_clock, mut net) = manual_network(0);
    let ego = net.ego();
    let alter1 = net.get_or_create_node("alter1", Value::Null).unwrap();
    let ctx = net.get_or_create_context("default").unwrap();
    let edge = net.get_or_create_edge(ego, alter1, ctx).unwrap();

    let end_time = net
        .edge_mut(edge)
        .unwrap()
        .add_interaction(100, 10, json!("msg"))
        .unwrap()
        .end_time();
    assert_eq!(end_time, 110);

    let interactions = net.edge(edge).unwrap().interactions();
    assert_eq!(interactions.len(), 1);
    assert_eq!(interactions[0].end_time(), 110);
    assert_eq!(interactions[0].data_type(), "string");
    assert_eq!(interactions[0].edge(), edge);

    // Scenario B: the network's ego is "ego", so the alter is "alter1".
    let alter = net.alter_of(edge).unwrap();
    assert_eq!(net.node(alter).unwrap().id(), "alter1");
}

// Scenario C: an edge between two alters has no ego and no alter.
#[test]
fn alter_fails_on_an_edge_without_the_ego() {
    let (_clock, mut net) = manual_network(0);
    let alter1 = net.get_or_create_node("alter1", Value::Null).unwrap();
    let alter2 = net.get_or_create_node("alter2", Value::Null).unwrap();
    let ctx = net.get_or_create_context("default").unwrap();
    let edge = net.get_or_create_edge(alter1, alter2, ctx).unwrap();

    assert_eq!(net.ego_of(edge).unwrap(), None);
    assert!(matches!(
        net.alter_of(edge),
        Err(Error::InvalidState { .. })
    ));
}

// Scenario D: the first factory registered for a key wins; later factories
// for the same key are never invoked.
#[test]
fn module_factory_is_invoked_at_most_once_per_key() {
    #[derive(Debug)]
    struct Stats {
        origin: &'static str,
    }

    let (_clock, mut net) = manual_network(0);
    let alice = net.get_or_create_node("alice", Value::Null).unwrap();
    let f1_calls = Cell::new(0u32);
    let f2_calls = Cell::new(0u32);

    let node = net.node_mut(alice).unwrap();
    let first = node
        .modules_mut()
        .get_or_insert_with("stats", || {
            f1_calls.set(f1_calls.get() + 1);
            Stats { origin: "F1" }
        })
        .unwrap();
    assert_eq!(first.origin, "F1");

    let second = node
        .modules_mut()
        .get_or_insert_with("stats", || {
            f2_calls.set(f2_calls.get() + 1);
            Stats { origin: "F2" }
        })
        .unwrap();
    assert_eq!(second.origin, "F1");
    assert_eq!(f1_calls.get(), 1);
    assert_eq!(f2_calls.get(), 0);
}

// Scenario E: a rejected interaction leaves the edge untouched.
#[test]
fn rejected_interaction_does_not_partially_append() {
    let (_clock, mut net) = manual_network(0);
    let ego = net.ego();
    let alter1 = net.get_or_create_node("alter1", Value::Null).unwrap();
    let ctx = net.get_or_create_context("default").unwrap();
    let edge = net.get_or_create_edge(ego, alter1, ctx).unwrap();

    let err = net
        .edge_mut(edge)
        .unwrap()
        .add_interaction(-1, 0, Value::Null)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { .. }));
    assert_eq!(net.edge(edge).unwrap().interaction_count(), 0);
}

#[test]
fn tie_strength_and_score_follow_the_injected_clock() {
    let (clock, mut net) = manual_network(1_000);
    let ego = net.ego();
    let alice = net.get_or_create_node("alice", Value::Null).unwrap();
    let ctx = net.get_or_create_context("default").unwrap();
    let edge = net.get_or_create_edge(ego, alice, ctx).unwrap();

    // Same instant as creation: both metrics guard the zero denominator.
    net.edge_mut(edge)
        .unwrap()
        .add_detected_interaction(json!("ping"))
        .unwrap();
    assert_eq!(net.edge(edge).unwrap().tie_strength(), 0.0);
    assert_eq!(net.node(alice).unwrap().score(), 0.0);

    clock.advance(10);
    net.edge_mut(edge)
        .unwrap()
        .add_detected_interaction(json!("pong"))
        .unwrap();
    net.node_mut(alice).unwrap().set_online_status(true);

    assert!((net.edge(edge).unwrap().tie_strength() - 0.2).abs() < f64::EPSILON);
    assert!((net.node(alice).unwrap().score() - 0.1).abs() < f64::EPSILON);
}

#[test]
fn lenient_network_clamps_instead_of_failing() {
    let clock = Rc::new(ManualClock::new(0));
    let mut net = ContextualEgoNetwork::with_parts(
        "ego",
        Value::Null,
        SharedClock::from_rc(clock),
        ErrorPolicy::Lenient,
    )
    .unwrap();
    let ego = net.ego();
    let alice = net.get_or_create_node("alice", Value::Null).unwrap();
    let ctx = net.get_or_create_context("default").unwrap();
    let edge = net.get_or_create_edge(ego, alice, ctx).unwrap();

    let start = net
        .edge_mut(edge)
        .unwrap()
        .add_interaction(-30, -1, json!("late"))
        .unwrap()
        .start_time();
    assert_eq!(start, 0);
    assert_eq!(net.edge(edge).unwrap().interaction_count(), 1);

    // No best-effort default exists for an empty node id, even leniently.
    assert!(matches!(
        net.get_or_create_node("", Value::Null),
        Err(Error::InvalidArgument { .. })
    ));
}

#[test]
fn save_load_cycle_preserves_the_graph_and_module_data_stays_lazy() {
    let (clock, mut net) = manual_network(0);
    let ego = net.ego();
    let alice = net.get_or_create_node("alice", json!({"name": "Alice"})).unwrap();
    let work = net.get_or_create_context("work").unwrap();
    let edge = net.get_or_create_edge(ego, alice, work).unwrap();
    net.edge_mut(edge)
        .unwrap()
        .add_interaction(100, 10, json!("msg"))
        .unwrap();

    // Resident module data is runtime-only state.
    net.node_mut(alice)
        .unwrap()
        .modules_mut()
        .get_or_insert_with("stats", || 7u64)
        .unwrap();

    let saved = serde_json::to_string(&net).unwrap();
    let mut restored: ContextualEgoNetwork = serde_json::from_str(&saved).unwrap();
    restored.restore(SharedClock::from_rc(clock));

    assert_eq!(restored.node_by_id("alice"), Some(alice));
    assert_eq!(restored.edge(edge).unwrap().interactions().len(), 1);
    assert_eq!(restored.alter_of(edge).unwrap(), alice);
    assert_eq!(restored.edges_in(work).unwrap(), &[edge]);

    // Module registries restore empty; the storage collaborator repopulates
    // them through the bare path without re-running factories.
    let node = restored.node_mut(alice).unwrap();
    assert!(node.modules().is_empty());
    node.modules_mut().insert_boxed("stats", Box::new(7u64));
    assert_eq!(node.modules().get::<u64>("stats").unwrap(), Some(&7));
}

#[test]
fn components_of_different_networks_do_not_mix() {
    let (_c1, net_a) = manual_network(0);
    let (_c2, net_b) = manual_network(0);

    assert!(assert_same_network(net_a.ego_node(), &net_a).is_ok());
    assert!(matches!(
        assert_same_network(net_a.ego_node(), net_b.ego_node()),
        Err(Error::InvalidState { .. })
    ));
}
