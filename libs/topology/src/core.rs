//! Topology state machine
//!
//! `TopologyCore` owns the in-memory model of the cluster and is the only
//! component allowed to mutate it. Platform callbacks arrive one event at a
//! time, potentially from different threads; every entry point below runs
//! under one coarse exclusive lock covering the tree, the per-consumer fetch
//! tables, the failover-pending set and the listener list. Nothing blocks or
//! suspends while the lock is held: the event sink and entity listeners are
//! invoked synchronously and must return quickly.
//!
//! Interior references never escape. Readers get contexts and snapshots by
//! value; a snapshot is a deep structural clone safe to traverse and mutate
//! without affecting the live tree.

use crate::error::{TopologyError, TopologyResult};
use crate::event::EventService;
use crate::listener::EntityListener;
use crate::platform::{
    ClientDescriptor, PlatformClientInfo, PlatformEntityInfo, PlatformServerInfo, ServerStateInfo,
};
use crate::time::TimeSource;
use model::{
    Client, ClientIdentifier, Cluster, Connection, Context, ContextualNotification,
    ManagementRegistry, NotificationKind, Server, ServerEntity, ServerEntityIdentifier,
    ServerState, Stripe,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{trace, warn};

/// The topology state machine. One instance tracks one cluster.
pub struct TopologyCore {
    server_name: String,
    event_service: Arc<dyn EventService>,
    time_source: Arc<dyn TimeSource>,
    inner: Mutex<Inner>,
}

struct Inner {
    stripe_name: String,
    cluster: Cluster,
    current_active: Option<String>,
    /// Per active-entity consumer id: descriptor → client identity for every
    /// outstanding fetch. Exists only while the hosting server is the
    /// recognized active server.
    fetches: HashMap<u64, HashMap<ClientDescriptor, ClientIdentifier>>,
    /// Entities whose passive-to-active transition has been signaled but not
    /// yet structurally completed.
    failover_pending: HashMap<ServerEntityIdentifier, u64>,
    listeners: Vec<Arc<dyn EntityListener>>,
}

impl Inner {
    fn inconsistency(&self, detail: String) -> TopologyError {
        TopologyError::Inconsistent {
            detail,
            current_active: self
                .current_active
                .clone()
                .unwrap_or_else(|| "<none>".to_string()),
            cluster_dump: serde_json::to_string(&self.cluster)
                .unwrap_or_else(|e| format!("<unserializable: {e}>")),
        }
    }

    fn stripe(&self) -> TopologyResult<&Stripe> {
        self.cluster
            .stripe(&self.stripe_name)
            .ok_or_else(|| self.inconsistency(format!("Missing stripe: {}", self.stripe_name)))
    }

    fn active_server_name(&self) -> TopologyResult<String> {
        match &self.current_active {
            Some(name) => Ok(name.clone()),
            None => Err(self.inconsistency("No active server defined!".to_string())),
        }
    }

    fn client_identifier(
        &self,
        consumer_id: u64,
        descriptor: ClientDescriptor,
    ) -> Option<ClientIdentifier> {
        self.fetches
            .get(&consumer_id)
            .and_then(|table| table.get(&descriptor))
            .cloned()
    }

    /// Invokes `f` once per registered listener, isolating each call so a
    /// failing listener cannot corrupt topology state or starve the others.
    fn each_listener(&self, mut f: impl FnMut(&dyn EntityListener)) {
        for listener in &self.listeners {
            if catch_unwind(AssertUnwindSafe(|| f(listener.as_ref()))).is_err() {
                warn!("entity listener panicked during dispatch; continuing");
            }
        }
    }
}

impl TopologyCore {
    pub fn new(
        stripe_name: impl Into<String>,
        server_name: impl Into<String>,
        event_service: Arc<dyn EventService>,
        time_source: Arc<dyn TimeSource>,
    ) -> Self {
        let stripe_name = stripe_name.into();
        let mut cluster = Cluster::new();
        cluster.add_stripe(stripe_name.clone());
        Self {
            server_name: server_name.into(),
            event_service,
            time_source,
            inner: Mutex::new(Inner {
                stripe_name,
                cluster,
                current_active: None,
                fetches: HashMap::new(),
                failover_pending: HashMap::new(),
                listeners: Vec::new(),
            }),
        }
    }

    // ================================================
    // Platform callbacks
    // ================================================

    pub fn server_did_join_stripe(&self, server: &PlatformServerInfo) -> TopologyResult<()> {
        trace!(server = %server.server_name, "server_did_join_stripe");
        let mut inner = self.inner.lock();
        self.join_stripe_locked(&mut inner, server)
    }

    pub fn server_did_become_active(&self, server: &PlatformServerInfo) -> TopologyResult<()> {
        trace!(server = %server.server_name, "server_did_become_active");
        let mut inner = self.inner.lock();

        if inner.stripe()?.server(&server.server_name).is_none() {
            self.join_stripe_locked(&mut inner, server)?;
        }

        // An earlier active still marked ACTIVE in the tree means the
        // platform never told us it left; demote it so at most one server
        // reports ACTIVE at any snapshot.
        if let Some(previous) = inner.current_active.clone() {
            if previous != server.server_name {
                let stripe_name = inner.stripe_name.clone();
                if let Some(stale) = inner
                    .cluster
                    .stripe_mut(&stripe_name)
                    .and_then(|s| s.server_mut(&previous))
                {
                    if stale.state == ServerState::Active {
                        warn!(
                            previous = %previous,
                            new = %server.server_name,
                            "previous active server still marked ACTIVE, demoting to UNREACHABLE"
                        );
                        stale.state = ServerState::Unreachable;
                    }
                }
            }
        }

        let now = self.time_source.now_millis();
        let stripe_name = inner.stripe_name.clone();
        match inner
            .cluster
            .stripe_mut(&stripe_name)
            .and_then(|s| s.server_mut(&server.server_name))
        {
            Some(node) => {
                node.state = ServerState::Active;
                node.activate_time = now;
            }
            None => {
                return Err(
                    inner.inconsistency(format!("Missing server: {}", server.server_name))
                )
            }
        }
        inner.current_active = Some(server.server_name.clone());
        Ok(())
    }

    pub fn server_did_leave_stripe(&self, server: &PlatformServerInfo) -> TopologyResult<()> {
        trace!(server = %server.server_name, "server_did_leave_stripe");
        let mut inner = self.inner.lock();

        let context = match inner.stripe()?.server(&server.server_name) {
            Some(node) => node.context().clone(),
            None => {
                return Err(
                    inner.inconsistency(format!("Missing server: {}", server.server_name))
                )
            }
        };

        let stripe_name = inner.stripe_name.clone();
        if let Some(stripe) = inner.cluster.stripe_mut(&stripe_name) {
            stripe.remove_server(&server.server_name);
        }

        self.event_service
            .fire_notification(ContextualNotification::of(context, NotificationKind::ServerLeft));
        Ok(())
    }

    pub fn server_entity_created(
        &self,
        sender: &PlatformServerInfo,
        entity: &PlatformEntityInfo,
    ) -> TopologyResult<()> {
        trace!(sender = %sender.server_name, entity = %entity, "server_entity_created");
        let mut inner = self.inner.lock();

        let active_name = inner.active_server_name()?;
        if entity.is_active && sender.server_name != active_name {
            return Err(inner.inconsistency(format!(
                "Server {} is not the current active server but it created an active entity {}",
                sender.server_name, entity
            )));
        }
        if !entity.is_active && sender.server_name == active_name {
            return Err(inner.inconsistency(format!(
                "Server {} is the current active server but it created a passive entity {}",
                sender.server_name, entity
            )));
        }
        if inner.stripe()?.server(&sender.server_name).is_none() {
            return Err(inner.inconsistency(format!("Missing server: {}", sender.server_name)));
        }

        let identifier = entity.identifier();
        let stripe_name = inner.stripe_name.clone();
        let context = inner
            .cluster
            .stripe_mut(&stripe_name)
            .and_then(|s| s.server_mut(&sender.server_name))
            .and_then(|server| {
                server.add_entity(ServerEntity::new(identifier.clone(), entity.consumer_id));
                server.entity(&identifier).map(|e| e.context().clone())
            });
        let context = match context {
            Some(context) => context,
            None => {
                return Err(inner.inconsistency(format!("Missing server: {}", sender.server_name)))
            }
        };

        if sender.server_name == active_name {
            // keep track of fetches per entity for the active server
            inner.fetches.insert(entity.consumer_id, HashMap::new());
        }

        self.event_service.fire_notification(ContextualNotification::of(
            context.clone(),
            NotificationKind::ServerEntityCreated,
        ));

        if inner.failover_pending.remove(&identifier).is_some() {
            self.event_service.fire_notification(ContextualNotification::of(
                context,
                NotificationKind::ServerEntityFailoverCompleted,
            ));
        }
        Ok(())
    }

    pub fn server_entity_destroyed(
        &self,
        sender: &PlatformServerInfo,
        entity: &PlatformEntityInfo,
    ) -> TopologyResult<()> {
        trace!(sender = %sender.server_name, entity = %entity, "server_entity_destroyed");
        let mut inner = self.inner.lock();

        let active_name = inner.active_server_name()?;
        if entity.is_active && sender.server_name != active_name {
            return Err(inner.inconsistency(format!(
                "Server {} is not the current active server but it destroyed an active entity {}",
                sender.server_name, entity
            )));
        }
        if !entity.is_active && sender.server_name == active_name {
            return Err(inner.inconsistency(format!(
                "Server {} is the current active server but it destroyed a passive entity {}",
                sender.server_name, entity
            )));
        }

        let identifier = entity.identifier();
        let context = match inner.stripe()?.server(&sender.server_name) {
            Some(server) => match server.entity(&identifier) {
                Some(node) => node.context().clone(),
                None => {
                    return Err(inner.inconsistency(format!(
                        "Missing entity: {} on server {}",
                        entity, sender.server_name
                    )))
                }
            },
            None => {
                return Err(inner.inconsistency(format!("Missing server: {}", sender.server_name)))
            }
        };

        let stripe_name = inner.stripe_name.clone();
        if let Some(server) = inner
            .cluster
            .stripe_mut(&stripe_name)
            .and_then(|s| s.server_mut(&sender.server_name))
        {
            server.remove_entity(&identifier);
        }

        if sender.server_name == active_name {
            inner.fetches.remove(&entity.consumer_id);
            inner.each_listener(|listener| listener.on_entity_destroyed(entity.consumer_id));
        }

        self.event_service.fire_notification(ContextualNotification::of(
            context,
            NotificationKind::ServerEntityDestroyed,
        ));
        Ok(())
    }

    /// The entity is transitioning from a passive server to the (about to be)
    /// active one. The new incarnation's monitoring wiring does not exist
    /// yet, so nothing is published now: the identifier is parked and the
    /// deferred `SERVER_ENTITY_FAILOVER_COMPLETED` fires when the matching
    /// `server_entity_created` arrives.
    pub fn server_entity_failover(
        &self,
        sender: &PlatformServerInfo,
        entity: &PlatformEntityInfo,
    ) -> TopologyResult<()> {
        trace!(sender = %sender.server_name, entity = %entity, "server_entity_failover");
        let mut inner = self.inner.lock();

        let active_name = inner.active_server_name()?;
        if entity.is_active || sender.server_name != active_name {
            return Err(inner.inconsistency(format!(
                "Server {} should be the active server and should receive a passive entity {}",
                sender.server_name, entity
            )));
        }

        inner
            .failover_pending
            .insert(entity.identifier(), entity.consumer_id);
        inner.each_listener(|listener| listener.on_entity_failover(entity.consumer_id));
        Ok(())
    }

    pub fn client_connected(&self, client: &PlatformClientInfo) -> TopologyResult<()> {
        trace!(client = %client.name, pid = client.pid, "client_connected");
        let mut inner = self.inner.lock();

        let active_name = inner.active_server_name()?;
        let identifier = client.identifier();
        let mut node = Client::new(identifier.clone());
        node.host_name = client.host_name.clone();
        node.add_connection(Connection::new(
            identifier.connection_uid(),
            active_name,
            client.endpoint(),
        ));
        let context = node.context().clone();
        inner.cluster.add_client(node);

        self.event_service.fire_notification(ContextualNotification::of(
            context,
            NotificationKind::ClientConnected,
        ));
        Ok(())
    }

    pub fn client_disconnected(&self, client: &PlatformClientInfo) -> TopologyResult<()> {
        trace!(client = %client.name, pid = client.pid, "client_disconnected");
        let mut inner = self.inner.lock();

        let identifier = client.identifier();
        let context = match inner.cluster.client(&identifier) {
            Some(node) => node.context().clone(),
            None => return Err(inner.inconsistency(format!("Missing client: {identifier}"))),
        };
        inner.cluster.remove_client(&identifier);

        // Outstanding fetches of the departed client would otherwise linger
        // in the fetch tables until entity destruction. Sweep them and let
        // per-entity listeners drop their routing state; the disconnect
        // itself stays the only notification emitted.
        let mut swept: Vec<(u64, ClientDescriptor)> = Vec::new();
        for (consumer_id, table) in inner.fetches.iter_mut() {
            table.retain(|descriptor, mapped| {
                if *mapped == identifier {
                    swept.push((*consumer_id, *descriptor));
                    false
                } else {
                    true
                }
            });
        }
        for (consumer_id, descriptor) in swept {
            inner.each_listener(|listener| listener.on_unfetch(consumer_id, descriptor));
        }

        self.event_service.fire_notification(ContextualNotification::of(
            context,
            NotificationKind::ClientDisconnected,
        ));
        Ok(())
    }

    pub fn client_fetch(
        &self,
        client: &PlatformClientInfo,
        entity: &PlatformEntityInfo,
        descriptor: ClientDescriptor,
    ) -> TopologyResult<()> {
        trace!(client = %client.name, entity = %entity, %descriptor, "client_fetch");
        let mut inner = self.inner.lock();

        let active_name = inner.active_server_name()?;
        let identifier = client.identifier();
        let endpoint = client.endpoint();

        let client_context = match inner.cluster.client(&identifier) {
            Some(node) => node.context().clone(),
            None => return Err(inner.inconsistency(format!("Missing client: {identifier}"))),
        };
        if inner
            .cluster
            .client(&identifier)
            .and_then(|c| c.connection(&active_name, &endpoint))
            .is_none()
        {
            return Err(inner.inconsistency(format!(
                "Missing connection between server {active_name} and client {identifier}"
            )));
        }

        let entity_identifier = entity.identifier();
        let entity_context = match inner
            .stripe()?
            .server(&active_name)
            .and_then(|s| s.entity(&entity_identifier))
        {
            Some(node) => node.context().clone(),
            None => {
                return Err(inner.inconsistency(format!(
                    "Missing entity: name={}, type={}",
                    entity.name, entity.type_name
                )))
            }
        };

        let recorded = inner
            .cluster
            .client_mut(&identifier)
            .and_then(|c| c.connection_mut(&active_name, &endpoint))
            .map(|connection| connection.fetch(&entity_identifier));
        if recorded != Some(true) {
            return Err(inner.inconsistency(format!(
                "Unable to fetch entity {entity_identifier} from client {identifier}"
            )));
        }

        match inner.fetches.get_mut(&entity.consumer_id) {
            Some(table) => {
                table.insert(descriptor, identifier);
            }
            None => {
                return Err(inner.inconsistency(format!(
                    "No fetch table for consumer id {}",
                    entity.consumer_id
                )))
            }
        }

        inner.each_listener(|listener| listener.on_fetch(entity.consumer_id, descriptor));

        let mut notification =
            ContextualNotification::of(entity_context, NotificationKind::ServerEntityFetched);
        notification.extend_context(&client_context);
        self.event_service.fire_notification(notification);
        Ok(())
    }

    pub fn client_unfetch(
        &self,
        client: &PlatformClientInfo,
        entity: &PlatformEntityInfo,
        descriptor: ClientDescriptor,
    ) -> TopologyResult<()> {
        trace!(client = %client.name, entity = %entity, %descriptor, "client_unfetch");
        let mut inner = self.inner.lock();

        let active_name = inner.active_server_name()?;
        let identifier = client.identifier();
        let endpoint = client.endpoint();
        let entity_identifier = entity.identifier();

        let entity_context = match inner
            .stripe()?
            .server(&active_name)
            .and_then(|s| s.entity(&entity_identifier))
        {
            Some(node) => node.context().clone(),
            None => {
                return Err(inner.inconsistency(format!(
                    "Missing entity: name={}, type={}",
                    entity.name, entity.type_name
                )))
            }
        };
        let client_context = match inner.cluster.client(&identifier) {
            Some(node) => node.context().clone(),
            None => return Err(inner.inconsistency(format!("Missing client: {identifier}"))),
        };
        if inner
            .cluster
            .client(&identifier)
            .and_then(|c| c.connection(&active_name, &endpoint))
            .is_none()
        {
            return Err(inner.inconsistency(format!(
                "Missing connection: {endpoint} to server {active_name} from client {identifier}"
            )));
        }

        // The fetch-table entry goes away and listeners are told regardless
        // of whether the connection still records the fetch; the notification
        // fires only when it did, so a repeated unfetch stays silent.
        match inner.fetches.get_mut(&entity.consumer_id) {
            Some(table) => {
                table.remove(&descriptor);
            }
            None => {
                return Err(inner.inconsistency(format!(
                    "No fetch table for consumer id {}",
                    entity.consumer_id
                )))
            }
        }

        inner.each_listener(|listener| listener.on_unfetch(entity.consumer_id, descriptor));

        let removed = inner
            .cluster
            .client_mut(&identifier)
            .and_then(|c| c.connection_mut(&active_name, &endpoint))
            .map(|connection| connection.unfetch(&entity_identifier));
        if removed == Some(true) {
            let mut notification = ContextualNotification::of(
                entity_context,
                NotificationKind::ServerEntityUnfetched,
            );
            notification.extend_context(&client_context);
            self.event_service.fire_notification(notification);
        }
        Ok(())
    }

    pub fn server_state_changed(
        &self,
        sender: &PlatformServerInfo,
        state: &ServerStateInfo,
    ) -> TopologyResult<()> {
        trace!(sender = %sender.server_name, state = %state.state, "server_state_changed");
        let mut inner = self.inner.lock();

        let stripe_name = inner.stripe_name.clone();
        let context = match inner
            .cluster
            .stripe_mut(&stripe_name)
            .and_then(|s| s.server_mut(&sender.server_name))
        {
            Some(node) => {
                node.state = ServerState::parse(&state.state);
                node.activate_time = state.activate_time;
                node.context().clone()
            }
            None => {
                return Err(
                    inner.inconsistency(format!("Missing server: {}", sender.server_name))
                )
            }
        };

        let notification =
            ContextualNotification::of(context, NotificationKind::ServerStateChanged)
                .with_attribute("state", &state.state)
                .with_attribute(
                    "activateTime",
                    if state.activate_time > 0 {
                        state.activate_time.to_string()
                    } else {
                        "0".to_string()
                    },
                );
        self.event_service.fire_notification(notification);
        Ok(())
    }

    // ================================================
    // Registry and tag updates from layered services
    // ================================================

    /// Replaces a hosted entity's registry by value: fires
    /// `ENTITY_REGISTRY_AVAILABLE` on first exposure,
    /// `ENTITY_REGISTRY_UPDATED` on a real change, nothing on a no-op
    /// replace. Unresolvable targets are ignored; exposure races with
    /// topology transitions and is not an error.
    pub fn set_entity_management_registry(
        &self,
        consumer_id: u64,
        server_name: &str,
        new_registry: ManagementRegistry,
    ) {
        let mut inner = self.inner.lock();
        let stripe_name = inner.stripe_name.clone();
        let fired = inner
            .cluster
            .stripe_mut(&stripe_name)
            .and_then(|s| s.server_mut(server_name))
            .and_then(|s| s.entity_by_consumer_mut(consumer_id))
            .and_then(|entity| {
                let kind = registry_change_kind(
                    entity.registry(),
                    &new_registry,
                    NotificationKind::EntityRegistryAvailable,
                    NotificationKind::EntityRegistryUpdated,
                )?;
                entity.set_registry(new_registry);
                Some(ContextualNotification::of(entity.context().clone(), kind))
            });
        if let Some(notification) = fired {
            self.event_service.fire_notification(notification);
        }
    }

    /// Client counterpart of [`set_entity_management_registry`], resolved
    /// through the active entity's fetch table.
    ///
    /// [`set_entity_management_registry`]: Self::set_entity_management_registry
    pub fn set_client_management_registry(
        &self,
        consumer_id: u64,
        descriptor: ClientDescriptor,
        new_registry: ManagementRegistry,
    ) {
        let mut inner = self.inner.lock();
        let identifier = match inner.client_identifier(consumer_id, descriptor) {
            Some(identifier) => identifier,
            None => return,
        };
        let fired = inner.cluster.client_mut(&identifier).and_then(|client| {
            let kind = registry_change_kind(
                client.registry(),
                &new_registry,
                NotificationKind::ClientRegistryAvailable,
                NotificationKind::ClientRegistryUpdated,
            )?;
            client.set_registry(new_registry);
            Some(ContextualNotification::of(client.context().clone(), kind))
        });
        if let Some(notification) = fired {
            self.event_service.fire_notification(notification);
        }
    }

    /// Replaces a client's tag set, firing `CLIENT_TAGS_UPDATED` only when
    /// the set actually differs.
    pub fn set_client_tags(&self, consumer_id: u64, descriptor: ClientDescriptor, tags: &[String]) {
        let mut inner = self.inner.lock();
        let identifier = match inner.client_identifier(consumer_id, descriptor) {
            Some(identifier) => identifier,
            None => return,
        };
        let fired = inner.cluster.client_mut(&identifier).and_then(|client| {
            let new_tags: std::collections::BTreeSet<String> = tags.iter().cloned().collect();
            if *client.tags() == new_tags {
                return None;
            }
            client.set_tags(new_tags);
            Some(ContextualNotification::of(
                client.context().clone(),
                NotificationKind::ClientTagsUpdated,
            ))
        });
        if let Some(notification) = fired {
            self.event_service.fire_notification(notification);
        }
    }

    // ================================================
    // Context lookups and snapshots
    // ================================================

    pub fn entity_context(&self, server_name: &str, consumer_id: u64) -> Option<Context> {
        let inner = self.inner.lock();
        inner
            .stripe()
            .ok()?
            .server(server_name)?
            .entity_by_consumer(consumer_id)
            .map(|e| e.context().clone())
    }

    pub fn manageable_entity_context(&self, server_name: &str, consumer_id: u64) -> Option<Context> {
        let inner = self.inner.lock();
        inner
            .stripe()
            .ok()?
            .server(server_name)?
            .entity_by_consumer(consumer_id)
            .filter(|e| e.is_manageable())
            .map(|e| e.context().clone())
    }

    pub fn manageable_entity_context_by_name(
        &self,
        server_name: &str,
        entity_name: &str,
        entity_type: &str,
    ) -> Option<Context> {
        let identifier = ServerEntityIdentifier::new(entity_name, entity_type);
        let inner = self.inner.lock();
        inner
            .stripe()
            .ok()?
            .server(server_name)?
            .entity(&identifier)
            .filter(|e| e.is_manageable())
            .map(|e| e.context().clone())
    }

    pub fn client_context(&self, consumer_id: u64, descriptor: ClientDescriptor) -> Option<Context> {
        let inner = self.inner.lock();
        let identifier = inner.client_identifier(consumer_id, descriptor)?;
        inner
            .cluster
            .client(&identifier)
            .map(|c| c.context().clone())
    }

    pub fn manageable_client_context(&self, identifier: &ClientIdentifier) -> Option<Context> {
        let inner = self.inner.lock();
        inner
            .cluster
            .client(identifier)
            .filter(|c| c.is_manageable())
            .map(|c| c.context().clone())
    }

    pub fn manageable_client_context_by_descriptor(
        &self,
        consumer_id: u64,
        descriptor: ClientDescriptor,
    ) -> Option<Context> {
        let inner = self.inner.lock();
        let identifier = inner.client_identifier(consumer_id, descriptor)?;
        inner
            .cluster
            .client(&identifier)
            .filter(|c| c.is_manageable())
            .map(|c| c.context().clone())
    }

    /// Deep, independent copy of the whole tree: the only sanctioned way to
    /// read the topology outside the lock. Safe to traverse and to mutate
    /// locally without affecting live state.
    pub fn cluster_snapshot(&self) -> Cluster {
        self.inner.lock().cluster.clone()
    }

    pub fn is_current_server_active(&self) -> bool {
        self.inner.lock().current_active.as_deref() == Some(self.server_name.as_str())
    }

    pub fn current_server_name(&self) -> &str {
        &self.server_name
    }

    pub fn add_entity_listener(&self, listener: Arc<dyn EntityListener>) {
        self.inner.lock().listeners.push(listener);
    }

    pub fn remove_entity_listener(&self, listener: &Arc<dyn EntityListener>) {
        self.inner
            .lock()
            .listeners
            .retain(|registered| !Arc::ptr_eq(registered, listener));
    }

    fn join_stripe_locked(
        &self,
        inner: &mut Inner,
        info: &PlatformServerInfo,
    ) -> TopologyResult<()> {
        let mut server = Server::new(&info.server_name);
        server.host_name = info.host_name.clone();
        server.host_address = info.host_address.clone();
        server.bind_address = info.bind_address.clone();
        server.bind_port = info.bind_port;
        server.group_port = info.group_port;
        server.build_id = info.build_id.clone();
        server.version = info.version.clone();
        server.start_time = info.start_time;

        let stripe_name = inner.stripe_name.clone();
        let context = match inner.cluster.stripe_mut(&stripe_name) {
            Some(stripe) => {
                stripe.add_server(server);
                stripe
                    .server(&info.server_name)
                    .map(|s| s.context().clone())
            }
            None => None,
        };
        match context {
            Some(context) => {
                self.event_service.fire_notification(ContextualNotification::of(
                    context,
                    NotificationKind::ServerJoined,
                ));
                Ok(())
            }
            None => Err(inner.inconsistency(format!("Missing stripe: {stripe_name}"))),
        }
    }
}

/// AVAILABLE on first exposure, UPDATED on a value change, `None` on a no-op
/// replace.
fn registry_change_kind(
    current: Option<&ManagementRegistry>,
    new_registry: &ManagementRegistry,
    available: NotificationKind,
    updated: NotificationKind,
) -> Option<NotificationKind> {
    match current {
        None => Some(available),
        Some(current) if current == new_registry => None,
        Some(_) => Some(updated),
    }
}
