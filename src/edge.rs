//! Edges: ties between two nodes inside one context, accumulating
//! interactions over time.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use crate::clock::SharedClock;
use crate::error::{Error, Result};
use crate::interaction::Interaction;
use crate::network::{ContextId, EdgeId, NodeId};
use crate::policy::ErrorPolicy;
use crate::registry::{ComponentRef, ModuleData, ModuleRegistry};

/// A tie between two nodes inside one context.
///
/// An edge is identified by its `(src, dst, context)` triple, belongs to
/// exactly one context for its lifetime, and is only ever mutated by
/// interaction appends. Endpoints are non-owning handles resolved through
/// the [`crate::ContextualEgoNetwork`] container.
#[derive(Debug, Serialize, Deserialize)]
pub struct Edge {
    handle: EdgeId,
    src: NodeId,
    dst: NodeId,
    context: ContextId,
    created_at: i64,
    interactions: Vec<Interaction>,
    network: Option<Uuid>,
    policy: ErrorPolicy,
    #[serde(skip)]
    modules: ModuleRegistry,
    #[serde(skip)]
    clock: SharedClock,
}

impl Edge {
    pub(crate) fn new(
        handle: EdgeId,
        src: NodeId,
        dst: NodeId,
        context: ContextId,
        network: Uuid,
        clock: SharedClock,
        policy: ErrorPolicy,
    ) -> Result<Self> {
        if src == dst {
            return Err(Error::InvalidArgument {
                reason: "edge endpoints must be distinct nodes".into(),
            });
        }
        Ok(Self {
            handle,
            src,
            dst,
            context,
            created_at: clock.now(),
            interactions: Vec::new(),
            network: Some(network),
            policy,
            modules: ModuleRegistry::new(),
            clock,
        })
    }

    pub fn handle(&self) -> EdgeId {
        self.handle
    }

    pub fn src(&self) -> NodeId {
        self.src
    }

    pub fn dst(&self) -> NodeId {
        self.dst
    }

    pub fn context(&self) -> ContextId {
        self.context
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    /// Creates and appends a new interaction.
    ///
    /// Negative bounds fail with [`Error::InvalidArgument`] before anything
    /// is appended; under a lenient policy they are instead clamped to zero
    /// with a warning.
    pub fn add_interaction(
        &mut self,
        mut timestamp: i64,
        mut duration: i64,
        data: Value,
    ) -> Result<&Interaction> {
        if (timestamp < 0 || duration < 0) && self.policy.is_lenient() {
            warn!(timestamp, duration, "clamping negative interaction bounds to zero");
            timestamp = timestamp.max(0);
            duration = duration.max(0);
        }
        let interaction = Interaction::new(self.handle, timestamp, duration, data)?;
        let index = self.interactions.len();
        self.interactions.push(interaction);
        Ok(&self.interactions[index])
    }

    /// Appends a zero-duration interaction stamped with the current time.
    pub fn add_detected_interaction(&mut self, data: Value) -> Result<&Interaction> {
        let now = self.clock.now();
        self.add_interaction(now, 0, data)
    }

    /// Independent snapshot of the interaction sequence, in insertion
    /// order. Mutating the returned vector never affects the edge.
    pub fn interactions(&self) -> Vec<Interaction> {
        self.interactions.clone()
    }

    pub fn interaction_count(&self) -> usize {
        self.interactions.len()
    }

    /// Tie strength: interactions per second of edge lifetime. Exactly 0.0
    /// while no time has elapsed since creation, even if interactions exist.
    pub fn tie_strength(&self) -> f64 {
        let elapsed = self.clock.now() - self.created_at;
        if elapsed <= 0 {
            return 0.0;
        }
        self.interactions.len() as f64 / elapsed as f64
    }

    /// The endpoint equal to `ego`, or `None` when the edge does not
    /// contain it. The sentinel is deliberate: an edge between two alters
    /// is a valid edge, just not an ego edge.
    pub fn ego(&self, ego: NodeId) -> Option<NodeId> {
        if self.src == ego || self.dst == ego {
            Some(ego)
        } else {
            None
        }
    }

    /// The endpoint that is not `ego`. Fails with [`Error::InvalidState`]
    /// when neither endpoint is the ego.
    pub fn alter(&self, ego: NodeId) -> Result<NodeId> {
        if self.src == ego {
            return Ok(self.dst);
        }
        if self.dst == ego {
            return Ok(self.src);
        }
        Err(Error::InvalidState {
            reason: "cannot retrieve the alter of an edge that does not contain the ego".into(),
        })
    }

    pub fn modules(&self) -> &ModuleRegistry {
        &self.modules
    }

    pub fn modules_mut(&mut self) -> &mut ModuleRegistry {
        &mut self.modules
    }

    /// Type-strategy module data with this edge as the owner.
    pub fn module<T: ModuleData>(&mut self) -> Result<&T> {
        let owner = ComponentRef::Edge(self.handle);
        self.modules.get_or_create::<T>(owner)
    }

    pub(crate) fn network_instance(&self) -> Option<Uuid> {
        self.network
    }

    pub(crate) fn rebind(&mut self, clock: SharedClock) {
        self.clock = clock;
    }

    pub(crate) fn dedup_key(&self) -> (NodeId, NodeId, ContextId) {
        (self.src, self.dst, self.context)
    }
}
