//! End-to-end scenarios: the platform drives the wired monitoring stack and
//! the front-end observes the resulting notification stream.

use lattice_e2e_tests::{cache_entity, client, server, ClusterFixture};
use model::{Capability, Context, ContextContainer, ManagementCall, ManagementMessage, ServerState};
use monitoring_service::{ClientMonitoringService, RecordingMessenger};
use std::sync::Arc;
use topology::{ClientDescriptor, ServerStateInfo};

#[test]
fn monitored_lifecycle_produces_ordered_notifications() {
    let fixture = ClusterFixture::new("server-1");
    let topology = &fixture.topology;

    // server joins and becomes active
    topology.server_did_join_stripe(&server("server-1")).unwrap();
    topology.server_did_become_active(&server("server-1")).unwrap();
    topology
        .server_state_changed(
            &server("server-1"),
            &ServerStateInfo {
                state: "ACTIVE-COORDINATOR".to_string(),
                activate_time: 1_000,
            },
        )
        .unwrap();
    assert_eq!(
        fixture.drain_notification_kinds(),
        vec!["SERVER_JOINED", "SERVER_STATE_CHANGED"]
    );

    // client connects and fetches the hosted entity
    topology
        .server_entity_created(&server("server-1"), &cache_entity(1, true))
        .unwrap();
    fixture.discard_buffered();
    topology.client_connected(&client("app")).unwrap();
    topology
        .client_fetch(&client("app"), &cache_entity(1, true), ClientDescriptor(7))
        .unwrap();

    let messages = fixture.buffer.drain();
    let kinds: Vec<_> = messages.iter().map(|m| m.kind().to_string()).collect();
    assert_eq!(kinds, vec!["CLIENT_CONNECTED", "SERVER_ENTITY_FETCHED"]);
    if let monitoring_service::MonitoringMessage::Notification(fetched) = &messages[1] {
        // both the entity's and the client's address travel on one context
        assert_eq!(fetched.context().get("entityId"), Some("pets:CacheEntity"));
        assert_eq!(fetched.context().get("serverName"), Some("server-1"));
        assert_eq!(fetched.context().get("clientName"), Some("app"));
    } else {
        panic!("expected a notification");
    }

    // disconnect without unfetch: only the disconnect is published
    topology.client_disconnected(&client("app")).unwrap();
    assert_eq!(fixture.drain_notification_kinds(), vec!["CLIENT_DISCONNECTED"]);
}

#[test]
fn failover_defers_completion_and_keeps_one_active() {
    let fixture = ClusterFixture::new("server-2");
    let topology = &fixture.topology;

    // stripe with an active and a passive server
    topology.server_did_become_active(&server("server-1")).unwrap();
    topology
        .server_entity_created(&server("server-1"), &cache_entity(1, true))
        .unwrap();
    topology.server_did_join_stripe(&server("server-2")).unwrap();
    topology
        .server_state_changed(
            &server("server-2"),
            &ServerStateInfo {
                state: "PASSIVE-STANDBY".to_string(),
                activate_time: 0,
            },
        )
        .unwrap();
    fixture.discard_buffered();

    // the passive takes over
    topology.server_did_become_active(&server("server-2")).unwrap();
    topology
        .server_entity_failover(&server("server-2"), &cache_entity(1, false))
        .unwrap();
    // parked: nothing published until the entity is structurally recreated
    assert!(fixture.drain_notification_kinds().is_empty());

    topology
        .server_entity_created(&server("server-2"), &cache_entity(1, true))
        .unwrap();
    assert_eq!(
        fixture.drain_notification_kinds(),
        vec!["SERVER_ENTITY_CREATED", "SERVER_ENTITY_FAILOVER_COMPLETED"]
    );

    // at most one ACTIVE server at any snapshot
    let snapshot = fixture.topology.cluster_snapshot();
    let stripe = snapshot.stripe(&fixture.config.stripe_name).unwrap();
    let active: Vec<_> = stripe.servers().filter(|s| s.is_active()).collect();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].name(), "server-2");
    assert_eq!(
        stripe.server("server-1").unwrap().state,
        ServerState::Unreachable
    );
    assert!(fixture.topology.is_current_server_active());
}

#[test]
fn management_call_round_trip() {
    let fixture = ClusterFixture::new("server-1");
    let topology = fixture.topology.clone();

    topology.server_did_become_active(&server("server-1")).unwrap();
    topology
        .server_entity_created(&server("server-1"), &cache_entity(1, true))
        .unwrap();

    let messenger = Arc::new(RecordingMessenger::new());
    let service = Arc::new(ClientMonitoringService::new(
        1,
        topology.clone(),
        fixture.buffer.clone(),
        messenger.clone(),
    ));
    topology.add_entity_listener(service.clone());

    topology.client_connected(&client("app")).unwrap();
    topology
        .client_fetch(&client("app"), &cache_entity(1, true), ClientDescriptor(7))
        .unwrap();
    service.expose_management_registry(
        ClientDescriptor(7),
        ContextContainer::new("cacheManagerName", "cm1"),
        vec![Capability::new("CacheCalls")],
    );

    // the front-end targets the client's address plus routing attributes
    let call_id = uuid::Uuid::new_v4().to_string();
    let target = topology
        .manageable_client_context_by_descriptor(1, ClientDescriptor(7))
        .unwrap()
        .with("cacheManagerName", "cm1");
    let call = ManagementMessage::ManagementCall(ManagementCall {
        call_id: call_id.clone(),
        target_context: target,
        capability: "CacheCalls".to_string(),
        method_name: "clear".to_string(),
        parameters: vec![],
    });
    service.fire_message(&call).unwrap();

    let sent = messenger.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, ClientDescriptor(7));

    // the client answers; the answer is claimable exactly once by call id
    service.answer_management_call(
        ClientDescriptor(7),
        &call_id,
        model::ContextualReturn::new(
            Context::empty(),
            "CacheCalls",
            "clear",
            model::CallOutcome::Returned(serde_json::Value::Null),
        ),
    );
    assert!(fixture.buffer.take_answer(&call_id).is_some());
    assert!(fixture.buffer.take_answer(&call_id).is_none());
}

#[test]
fn snapshot_serializes_stably_after_redaction() {
    let fixture = ClusterFixture::new("server-1");
    let topology = &fixture.topology;
    topology.server_did_become_active(&server("server-1")).unwrap();
    topology
        .server_entity_created(&server("server-1"), &cache_entity(12, true))
        .unwrap();

    // redact volatile fields the way a front-end comparison would
    let mut snapshot = topology.cluster_snapshot();
    let node = snapshot
        .stripe_mut("SINGLE")
        .unwrap()
        .server_mut("server-1")
        .unwrap();
    node.activate_time = 0;
    node.start_time = 0;
    node.build_id = "Build ID".to_string();

    let rendered = serde_json::to_value(
        snapshot.stripe("SINGLE").unwrap().server("server-1").unwrap(),
    )
    .unwrap();
    assert_eq!(rendered["state"], serde_json::json!("Active"));
    assert_eq!(rendered["build_id"], serde_json::json!("Build ID"));
    assert_eq!(rendered["activate_time"], serde_json::json!(0));

    // the redaction never leaked into the live tree
    let live = topology.cluster_snapshot();
    assert_eq!(
        live.stripe("SINGLE").unwrap().server("server-1").unwrap().build_id,
        "build-1"
    );
}
