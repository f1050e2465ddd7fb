//! Scenario tests for the topology state machine: callback handling,
//! notification ordering, failover deferral and snapshot isolation.

use model::{Capability, ContextContainer, ManagementRegistry, ServerState};
use std::sync::Arc;
use topology::{
    ClientDescriptor, ManualTimeSource, PlatformClientInfo, PlatformEntityInfo,
    PlatformServerInfo, RecordingEventService, ServerStateInfo, TopologyCore,
};

struct Harness {
    core: Arc<TopologyCore>,
    events: Arc<RecordingEventService>,
    clock: Arc<ManualTimeSource>,
}

fn harness() -> Harness {
    let events = Arc::new(RecordingEventService::new());
    let clock = Arc::new(ManualTimeSource::at(1_000));
    let core = Arc::new(TopologyCore::new(
        "SINGLE",
        "server-1",
        events.clone(),
        clock.clone(),
    ));
    Harness { core, events, clock }
}

fn server(name: &str) -> PlatformServerInfo {
    PlatformServerInfo {
        server_name: name.to_string(),
        host_name: "node-a".to_string(),
        host_address: "10.0.0.1".to_string(),
        bind_address: "0.0.0.0".to_string(),
        bind_port: 9410,
        group_port: 9430,
        build_id: "build-1".to_string(),
        version: "1.0".to_string(),
        start_time: 500,
    }
}

fn cache_entity(consumer_id: u64, is_active: bool) -> PlatformEntityInfo {
    PlatformEntityInfo {
        name: "pets".to_string(),
        type_name: "CacheEntity".to_string(),
        consumer_id,
        is_active,
    }
}

fn client(name: &str) -> PlatformClientInfo {
    PlatformClientInfo {
        pid: 42,
        name: name.to_string(),
        uuid: format!("uid-{name}"),
        host_name: "client-host".to_string(),
        remote_address: "10.0.0.8".to_string(),
        remote_port: 61000,
    }
}

fn registry(container_value: &str) -> ManagementRegistry {
    let mut registry = ManagementRegistry::new(ContextContainer::new(
        "cacheManagerName",
        container_value,
    ));
    registry.add_capability(Capability::new("CacheSettings"));
    registry
}

#[test]
fn join_then_activate_emits_expected_sequence() {
    let h = harness();
    h.core.server_did_join_stripe(&server("server-1")).unwrap();
    h.core.server_did_become_active(&server("server-1")).unwrap();
    h.core
        .server_state_changed(
            &server("server-1"),
            &ServerStateInfo {
                state: "ACTIVE-COORDINATOR".to_string(),
                activate_time: 1_000,
            },
        )
        .unwrap();

    assert_eq!(
        h.events.notification_kinds(),
        vec!["SERVER_JOINED", "SERVER_STATE_CHANGED"]
    );

    let state_changed = &h.events.notifications()[1];
    assert_eq!(
        state_changed.attributes().get("state").map(String::as_str),
        Some("ACTIVE-COORDINATOR")
    );
    assert_eq!(
        state_changed
            .attributes()
            .get("activateTime")
            .map(String::as_str),
        Some("1000")
    );
    assert!(h.core.is_current_server_active());
}

#[test]
fn become_active_joins_if_needed_and_records_activation_time() {
    let h = harness();
    h.clock.set(7_777);
    h.core.server_did_become_active(&server("server-1")).unwrap();

    assert_eq!(h.events.notification_kinds(), vec!["SERVER_JOINED"]);
    let snapshot = h.core.cluster_snapshot();
    let node = snapshot.stripe("SINGLE").unwrap().server("server-1").unwrap();
    assert_eq!(node.state, ServerState::Active);
    assert_eq!(node.activate_time, 7_777);
}

#[test]
fn server_leave_uses_pre_removal_context_and_unknown_server_is_fatal() {
    let h = harness();
    h.core.server_did_join_stripe(&server("server-1")).unwrap();
    h.core.server_did_leave_stripe(&server("server-1")).unwrap();

    let left = &h.events.notifications()[1];
    assert_eq!(left.kind(), "SERVER_LEFT");
    assert_eq!(left.context().get("serverName"), Some("server-1"));

    let err = h
        .core
        .server_did_leave_stripe(&server("ghost"))
        .unwrap_err();
    assert!(err.detail().contains("Missing server: ghost"));
}

#[test]
fn active_passive_sender_mismatch_is_fatal() {
    let h = harness();
    h.core.server_did_become_active(&server("server-1")).unwrap();
    h.core.server_did_join_stripe(&server("server-2")).unwrap();

    // a passive server claiming an active entity
    let err = h
        .core
        .server_entity_created(&server("server-2"), &cache_entity(1, true))
        .unwrap_err();
    assert!(err.detail().contains("not the current active server"));

    // the active server claiming a passive entity
    let err = h
        .core
        .server_entity_created(&server("server-1"), &cache_entity(1, false))
        .unwrap_err();
    assert!(err.detail().contains("is the current active server"));

    // the error carries postmortem state
    let rendered = err.to_string();
    assert!(rendered.contains("current active: server-1"));
    assert!(rendered.contains("cluster:"));
}

#[test]
fn fetch_attaches_both_entity_and_client_contexts() {
    let h = harness();
    h.core.server_did_become_active(&server("server-1")).unwrap();
    h.core
        .server_entity_created(&server("server-1"), &cache_entity(1, true))
        .unwrap();
    h.core.client_connected(&client("app")).unwrap();
    h.core
        .client_fetch(&client("app"), &cache_entity(1, true), ClientDescriptor(7))
        .unwrap();

    assert_eq!(
        h.events.notification_kinds(),
        vec![
            "SERVER_JOINED",
            "SERVER_ENTITY_CREATED",
            "CLIENT_CONNECTED",
            "SERVER_ENTITY_FETCHED",
        ]
    );

    let fetched = h.events.notifications().last().unwrap().clone();
    let ctx = fetched.context().clone();
    assert_eq!(ctx.get("entityId"), Some("pets:CacheEntity"));
    assert_eq!(ctx.get("serverName"), Some("server-1"));
    assert_eq!(ctx.get("clientName"), Some("app"));
    assert!(ctx.get("clientId").is_some());
}

#[test]
fn duplicate_fetch_is_fatal() {
    let h = harness();
    h.core.server_did_become_active(&server("server-1")).unwrap();
    h.core
        .server_entity_created(&server("server-1"), &cache_entity(1, true))
        .unwrap();
    h.core.client_connected(&client("app")).unwrap();
    h.core
        .client_fetch(&client("app"), &cache_entity(1, true), ClientDescriptor(7))
        .unwrap();

    let err = h
        .core
        .client_fetch(&client("app"), &cache_entity(1, true), ClientDescriptor(8))
        .unwrap_err();
    assert!(err.detail().contains("Unable to fetch entity"));
}

#[test]
fn repeated_unfetch_informs_listeners_but_stays_silent() {
    let h = harness();
    h.core.server_did_become_active(&server("server-1")).unwrap();
    h.core
        .server_entity_created(&server("server-1"), &cache_entity(1, true))
        .unwrap();
    h.core.client_connected(&client("app")).unwrap();
    h.core
        .client_fetch(&client("app"), &cache_entity(1, true), ClientDescriptor(7))
        .unwrap();

    h.core
        .client_unfetch(&client("app"), &cache_entity(1, true), ClientDescriptor(7))
        .unwrap();
    h.core
        .client_unfetch(&client("app"), &cache_entity(1, true), ClientDescriptor(7))
        .unwrap();

    let unfetched: Vec<_> = h
        .events
        .notification_kinds()
        .into_iter()
        .filter(|k| k == "SERVER_ENTITY_UNFETCHED")
        .collect();
    assert_eq!(unfetched.len(), 1);
}

#[test]
fn failover_completion_is_deferred_until_recreation() {
    let h = harness();
    h.core.server_did_become_active(&server("server-2")).unwrap();
    h.events.clear();

    // the passive entity is parked: no notification yet
    h.core
        .server_entity_failover(&server("server-2"), &cache_entity(1, false))
        .unwrap();
    assert!(h.events.notification_kinds().is_empty());

    // its recreation on the new active completes the transition, once
    h.core
        .server_entity_created(&server("server-2"), &cache_entity(1, true))
        .unwrap();
    assert_eq!(
        h.events.notification_kinds(),
        vec!["SERVER_ENTITY_CREATED", "SERVER_ENTITY_FAILOVER_COMPLETED"]
    );

    // a later create of the same identifier does not complete again
    h.core
        .server_entity_destroyed(&server("server-2"), &cache_entity(1, true))
        .unwrap();
    h.core
        .server_entity_created(&server("server-2"), &cache_entity(1, true))
        .unwrap();
    let completed: Vec<_> = h
        .events
        .notification_kinds()
        .into_iter()
        .filter(|k| k == "SERVER_ENTITY_FAILOVER_COMPLETED")
        .collect();
    assert_eq!(completed.len(), 1);
}

#[test]
fn failover_requires_passive_entity_through_active_server() {
    let h = harness();
    h.core.server_did_become_active(&server("server-1")).unwrap();
    let err = h
        .core
        .server_entity_failover(&server("server-1"), &cache_entity(1, true))
        .unwrap_err();
    assert!(err.detail().contains("should be the active server"));
}

#[test]
fn registry_exposure_dedups_by_value() {
    let h = harness();
    h.core.server_did_become_active(&server("server-1")).unwrap();
    h.core
        .server_entity_created(&server("server-1"), &cache_entity(1, true))
        .unwrap();
    h.core.client_connected(&client("app")).unwrap();
    h.core
        .client_fetch(&client("app"), &cache_entity(1, true), ClientDescriptor(7))
        .unwrap();
    h.events.clear();

    h.core
        .set_client_management_registry(1, ClientDescriptor(7), registry("cm1"));
    h.core
        .set_client_management_registry(1, ClientDescriptor(7), registry("cm1"));
    assert_eq!(
        h.events.notification_kinds(),
        vec!["CLIENT_REGISTRY_AVAILABLE"]
    );

    h.core
        .set_client_management_registry(1, ClientDescriptor(7), registry("cm2"));
    assert_eq!(
        h.events.notification_kinds(),
        vec!["CLIENT_REGISTRY_AVAILABLE", "CLIENT_REGISTRY_UPDATED"]
    );

    h.events.clear();
    h.core
        .set_entity_management_registry(1, "server-1", registry("cm1"));
    h.core
        .set_entity_management_registry(1, "server-1", registry("cm1"));
    h.core
        .set_entity_management_registry(1, "server-1", registry("cm2"));
    assert_eq!(
        h.events.notification_kinds(),
        vec!["ENTITY_REGISTRY_AVAILABLE", "ENTITY_REGISTRY_UPDATED"]
    );
}

#[test]
fn client_tags_update_only_on_change() {
    let h = harness();
    h.core.server_did_become_active(&server("server-1")).unwrap();
    h.core
        .server_entity_created(&server("server-1"), &cache_entity(1, true))
        .unwrap();
    h.core.client_connected(&client("app")).unwrap();
    h.core
        .client_fetch(&client("app"), &cache_entity(1, true), ClientDescriptor(7))
        .unwrap();
    h.events.clear();

    let tags = vec!["webapp".to_string(), "eu".to_string()];
    h.core.set_client_tags(1, ClientDescriptor(7), &tags);
    // same set, different order: no second notification
    let reordered = vec!["eu".to_string(), "webapp".to_string()];
    h.core.set_client_tags(1, ClientDescriptor(7), &reordered);
    assert_eq!(h.events.notification_kinds(), vec!["CLIENT_TAGS_UPDATED"]);
}

#[test]
fn disconnect_without_unfetch_emits_only_client_disconnected() {
    let h = harness();
    h.core.server_did_become_active(&server("server-1")).unwrap();
    h.core
        .server_entity_created(&server("server-1"), &cache_entity(1, true))
        .unwrap();
    h.core.client_connected(&client("app")).unwrap();
    h.core
        .client_fetch(&client("app"), &cache_entity(1, true), ClientDescriptor(7))
        .unwrap();
    h.events.clear();

    h.core.client_disconnected(&client("app")).unwrap();
    assert_eq!(h.events.notification_kinds(), vec!["CLIENT_DISCONNECTED"]);

    // the fetch table no longer resolves the departed client
    assert!(h.core.client_context(1, ClientDescriptor(7)).is_none());
}

#[test]
fn snapshot_is_isolated_from_live_tree() {
    let h = harness();
    h.core.server_did_become_active(&server("server-1")).unwrap();

    let mut snapshot = h.core.cluster_snapshot();
    let node = snapshot
        .stripe_mut("SINGLE")
        .unwrap()
        .server_mut("server-1")
        .unwrap();
    node.build_id = "redacted".to_string();
    node.activate_time = 0;

    let fresh = h.core.cluster_snapshot();
    let live = fresh.stripe("SINGLE").unwrap().server("server-1").unwrap();
    assert_eq!(live.build_id, "build-1");
    assert_ne!(live.activate_time, 0);
}

#[test]
fn entity_context_lookups_respect_manageability() {
    let h = harness();
    h.core.server_did_become_active(&server("server-1")).unwrap();
    h.core
        .server_entity_created(&server("server-1"), &cache_entity(1, true))
        .unwrap();

    assert!(h.core.entity_context("server-1", 1).is_some());
    assert!(h.core.manageable_entity_context("server-1", 1).is_none());

    h.core
        .set_entity_management_registry(1, "server-1", registry("cm1"));
    assert!(h.core.manageable_entity_context("server-1", 1).is_some());
    assert!(h
        .core
        .manageable_entity_context_by_name("server-1", "pets", "CacheEntity")
        .is_some());
    assert!(h
        .core
        .manageable_entity_context_by_name("server-1", "ghost", "CacheEntity")
        .is_none());
}

#[test]
fn callbacks_without_active_server_are_fatal() {
    let h = harness();
    let err = h.core.client_connected(&client("app")).unwrap_err();
    assert!(err.detail().contains("No active server defined"));
}
