//! Contexts: situational groupings of edges.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::network::{ContextId, EdgeId};
use crate::registry::{ComponentRef, ModuleData, ModuleRegistry};

/// A named grouping of edges, representing one situational subgraph of the
/// ego network (e.g. "work", "family"). The core treats it as an opaque
/// relation: it records membership but performs no traversal of its own.
#[derive(Debug, Serialize, Deserialize)]
pub struct Context {
    handle: ContextId,
    name: String,
    edges: Vec<EdgeId>,
    network: Option<Uuid>,
    #[serde(skip)]
    modules: ModuleRegistry,
}

impl Context {
    pub(crate) fn new(handle: ContextId, name: &str, network: Uuid) -> Self {
        Self {
            handle,
            name: name.to_string(),
            edges: Vec::new(),
            network: Some(network),
            modules: ModuleRegistry::new(),
        }
    }

    pub fn handle(&self) -> ContextId {
        self.handle
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Edges that belong to this context, in creation order.
    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    pub(crate) fn push_edge(&mut self, edge: EdgeId) {
        self.edges.push(edge);
    }

    pub fn modules(&self) -> &ModuleRegistry {
        &self.modules
    }

    pub fn modules_mut(&mut self) -> &mut ModuleRegistry {
        &mut self.modules
    }

    /// Type-strategy module data with this context as the owner.
    pub fn module<T: ModuleData>(&mut self) -> Result<&T> {
        let owner = ComponentRef::Context(self.handle);
        self.modules.get_or_create::<T>(owner)
    }

    pub(crate) fn network_instance(&self) -> Option<Uuid> {
        self.network
    }
}
