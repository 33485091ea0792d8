//! Graph nodes: globally unique entities with presence state.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use crate::clock::SharedClock;
use crate::error::{Error, Result};
use crate::network::NodeId;
use crate::policy::ErrorPolicy;
use crate::registry::{ComponentRef, ModuleData, ModuleRegistry};

/// A node of the social graph. All contexts of one network share the same
/// node instances: a string id resolves to exactly one [`NodeId`] per
/// network, and the container deduplicates creation through
/// [`crate::ContextualEgoNetwork::get_or_create_node`].
#[derive(Debug, Serialize, Deserialize)]
pub struct Node {
    id: String,
    handle: NodeId,
    #[serde(default)]
    data: Value,
    online: bool,
    online_counter: u64,
    created_at: i64,
    network: Option<Uuid>,
    policy: ErrorPolicy,
    /// Module data is populated lazily and persisted separately, to keep
    /// the serialized footprint of untouched nodes minimal.
    #[serde(skip)]
    modules: ModuleRegistry,
    #[serde(skip)]
    clock: SharedClock,
}

impl Node {
    pub(crate) fn new(
        id: &str,
        data: Value,
        handle: NodeId,
        network: Uuid,
        clock: SharedClock,
        policy: ErrorPolicy,
    ) -> Result<Self> {
        if id.is_empty() {
            if policy.is_lenient() {
                warn!("rejecting node with empty id, no fallback exists");
            }
            return Err(Error::InvalidArgument {
                reason: "node id cannot be an empty string".into(),
            });
        }
        Ok(Self {
            id: id.to_string(),
            handle,
            data,
            online: false,
            online_counter: 0,
            created_at: clock.now(),
            network: Some(network),
            policy,
            modules: ModuleRegistry::new(),
            clock,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn handle(&self) -> NodeId {
        self.handle
    }

    /// Opaque application payload attached at creation.
    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn online_status(&self) -> bool {
        self.online
    }

    /// Sets the presence state. The online counter increments only on an
    /// offline -> online transition, so repeated `true` calls count once.
    pub fn set_online_status(&mut self, online: bool) {
        if online && !self.online {
            self.online_counter += 1;
        }
        self.online = online;
    }

    /// Number of offline -> online transitions observed so far.
    pub fn online_counter(&self) -> u64 {
        self.online_counter
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    /// Presence score: online transitions per second of node lifetime.
    /// Exactly 0.0 while no time has elapsed since creation, mirroring the
    /// zero-elapsed guard of [`crate::Edge::tie_strength`].
    pub fn score(&self) -> f64 {
        let elapsed = self.clock.now() - self.created_at;
        if elapsed <= 0 {
            return 0.0;
        }
        self.online_counter as f64 / elapsed as f64
    }

    pub fn modules(&self) -> &ModuleRegistry {
        &self.modules
    }

    pub fn modules_mut(&mut self) -> &mut ModuleRegistry {
        &mut self.modules
    }

    /// Type-strategy module data with this node as the owner.
    pub fn module<T: ModuleData>(&mut self) -> Result<&T> {
        let owner = ComponentRef::Node(self.handle);
        self.modules.get_or_create::<T>(owner)
    }

    pub(crate) fn network_instance(&self) -> Option<Uuid> {
        self.network
    }

    /// Bare restore path: re-inject runtime state skipped by serialization.
    pub(crate) fn rebind(&mut self, clock: SharedClock) {
        self.clock = clock;
    }
}
