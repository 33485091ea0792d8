//! The contextual ego network container: sole owner of canonical node,
//! context and edge storage.
//!
//! Components live in arenas and relate to each other through copyable
//! index handles ([`NodeId`], [`EdgeId`], [`ContextId`]). Handles are only
//! meaningful against the network that issued them; resolving a stale or
//! foreign handle fails with [`Error::NullReference`] instead of dangling.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::clock::SharedClock;
use crate::context::Context;
use crate::edge::Edge;
use crate::error::{Error, Result};
use crate::node::Node;
use crate::policy::ErrorPolicy;
use crate::registry::ModuleRegistry;

/// Handle to a node in its network's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub(crate) u32);

/// Handle to an edge in its network's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeId(pub(crate) u32);

/// Handle to a context in its network's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContextId(pub(crate) u32);

/// Anything that knows which network instance it belongs to.
pub trait NetworkScoped {
    /// The owning network's instance id, or `None` for a component that
    /// was built bare and never attached.
    fn network_instance(&self) -> Option<Uuid>;
}

impl NetworkScoped for Node {
    fn network_instance(&self) -> Option<Uuid> {
        Node::network_instance(self)
    }
}

impl NetworkScoped for Edge {
    fn network_instance(&self) -> Option<Uuid> {
        Edge::network_instance(self)
    }
}

impl NetworkScoped for Context {
    fn network_instance(&self) -> Option<Uuid> {
        Context::network_instance(self)
    }
}

impl NetworkScoped for ContextualEgoNetwork {
    fn network_instance(&self) -> Option<Uuid> {
        Some(self.instance)
    }
}

/// Fails with [`Error::InvalidState`] unless both components share the same
/// enclosing network instance. Guards against cross-network handle mixing.
pub fn assert_same_network(a: &dyn NetworkScoped, b: &dyn NetworkScoped) -> Result<()> {
    match (a.network_instance(), b.network_instance()) {
        (Some(left), Some(right)) if left == right => Ok(()),
        (Some(_), Some(_)) => Err(Error::InvalidState {
            reason: "components belong to different network instances".into(),
        }),
        _ => Err(Error::InvalidState {
            reason: "component is not attached to a network".into(),
        }),
    }
}

/// A personal social graph observed through situational contexts.
///
/// Owns the canonical node set (string id -> one node instance), the
/// contexts, and every edge; issues the handles the rest of the crate
/// relates entities with. The clock and error policy injected at
/// construction are shared with every component the container creates.
#[derive(Debug, Serialize, Deserialize)]
pub struct ContextualEgoNetwork {
    instance: Uuid,
    ego: NodeId,
    nodes: Vec<Node>,
    node_ids: HashMap<String, NodeId>,
    contexts: Vec<Context>,
    context_names: HashMap<String, ContextId>,
    edges: Vec<Edge>,
    policy: ErrorPolicy,
    /// Rebuilt from the edge arena on restore; see [`Self::restore`].
    #[serde(skip)]
    edge_keys: HashMap<(NodeId, NodeId, ContextId), EdgeId>,
    #[serde(skip)]
    modules: ModuleRegistry,
    #[serde(skip)]
    clock: SharedClock,
}

impl ContextualEgoNetwork {
    /// Creates a network around the given ego, with the system clock and
    /// strict error policy.
    pub fn new(ego_id: &str, ego_data: Value) -> Result<Self> {
        Self::with_parts(ego_id, ego_data, SharedClock::system(), ErrorPolicy::Strict)
    }

    /// Full-control constructor: inject the clock and error policy.
    pub fn with_parts(
        ego_id: &str,
        ego_data: Value,
        clock: SharedClock,
        policy: ErrorPolicy,
    ) -> Result<Self> {
        let mut network = Self {
            instance: Uuid::new_v4(),
            ego: NodeId(0),
            nodes: Vec::new(),
            node_ids: HashMap::new(),
            contexts: Vec::new(),
            context_names: HashMap::new(),
            edges: Vec::new(),
            policy,
            edge_keys: HashMap::new(),
            modules: ModuleRegistry::new(),
            clock,
        };
        network.ego = network.create_node(ego_id, ego_data)?;
        Ok(network)
    }

    /// Random id of this network instance, recorded by every component for
    /// [`assert_same_network`].
    pub fn instance(&self) -> Uuid {
        self.instance
    }

    /// Handle of the ego node the network is built around.
    pub fn ego(&self) -> NodeId {
        self.ego
    }

    pub fn ego_node(&self) -> &Node {
        &self.nodes[self.ego.0 as usize]
    }

    pub fn clock(&self) -> &SharedClock {
        &self.clock
    }

    pub fn policy(&self) -> ErrorPolicy {
        self.policy
    }

    /// Canonical node resolution: returns the existing handle for a known
    /// id (the payload argument is ignored on a hit), or creates the node.
    /// This is the only node factory, which is what keeps one string id
    /// mapped to exactly one node instance per network.
    pub fn get_or_create_node(&mut self, id: &str, data: Value) -> Result<NodeId> {
        if let Some(&handle) = self.node_ids.get(id) {
            return Ok(handle);
        }
        self.create_node(id, data)
    }

    fn create_node(&mut self, id: &str, data: Value) -> Result<NodeId> {
        let handle = NodeId(self.nodes.len() as u32);
        let node = Node::new(
            id,
            data,
            handle,
            self.instance,
            self.clock.clone(),
            self.policy,
        )?;
        debug!(id, index = handle.0, "created node");
        self.nodes.push(node);
        self.node_ids.insert(id.to_string(), handle);
        Ok(handle)
    }

    /// Looks up a node handle by string id without creating anything.
    pub fn node_by_id(&self, id: &str) -> Option<NodeId> {
        self.node_ids.get(id).copied()
    }

    pub fn node(&self, handle: NodeId) -> Result<&Node> {
        self.nodes.get(handle.0 as usize).ok_or_else(|| Error::NullReference {
            what: format!("node handle {}", handle.0),
        })
    }

    pub fn node_mut(&mut self, handle: NodeId) -> Result<&mut Node> {
        self.nodes.get_mut(handle.0 as usize).ok_or_else(|| Error::NullReference {
            what: format!("node handle {}", handle.0),
        })
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the existing context with this name, or creates it.
    pub fn get_or_create_context(&mut self, name: &str) -> Result<ContextId> {
        if let Some(&handle) = self.context_names.get(name) {
            return Ok(handle);
        }
        if name.is_empty() {
            return Err(Error::InvalidArgument {
                reason: "context name cannot be an empty string".into(),
            });
        }
        let handle = ContextId(self.contexts.len() as u32);
        debug!(name, index = handle.0, "created context");
        self.contexts.push(Context::new(handle, name, self.instance));
        self.context_names.insert(name.to_string(), handle);
        Ok(handle)
    }

    pub fn context(&self, handle: ContextId) -> Result<&Context> {
        self.contexts.get(handle.0 as usize).ok_or_else(|| Error::NullReference {
            what: format!("context handle {}", handle.0),
        })
    }

    pub fn context_mut(&mut self, handle: ContextId) -> Result<&mut Context> {
        self.contexts.get_mut(handle.0 as usize).ok_or_else(|| Error::NullReference {
            what: format!("context handle {}", handle.0),
        })
    }

    pub fn context_count(&self) -> usize {
        self.contexts.len()
    }

    /// Returns the edge for the `(src, dst, context)` triple, creating it
    /// when the relationship first appears. The triple is the edge's
    /// identity: repeated calls return the same handle.
    pub fn get_or_create_edge(
        &mut self,
        src: NodeId,
        dst: NodeId,
        context: ContextId,
    ) -> Result<EdgeId> {
        self.node(src)?;
        self.node(dst)?;
        self.context(context)?;
        if let Some(&handle) = self.edge_keys.get(&(src, dst, context)) {
            return Ok(handle);
        }
        let handle = EdgeId(self.edges.len() as u32);
        let edge = Edge::new(
            handle,
            src,
            dst,
            context,
            self.instance,
            self.clock.clone(),
            self.policy,
        )?;
        debug!(src = src.0, dst = dst.0, context = context.0, "created edge");
        self.edges.push(edge);
        self.edge_keys.insert((src, dst, context), handle);
        self.context_mut(context)?.push_edge(handle);
        Ok(handle)
    }

    pub fn edge(&self, handle: EdgeId) -> Result<&Edge> {
        self.edges.get(handle.0 as usize).ok_or_else(|| Error::NullReference {
            what: format!("edge handle {}", handle.0),
        })
    }

    pub fn edge_mut(&mut self, handle: EdgeId) -> Result<&mut Edge> {
        self.edges.get_mut(handle.0 as usize).ok_or_else(|| Error::NullReference {
            what: format!("edge handle {}", handle.0),
        })
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Edges belonging to a context, in creation order.
    pub fn edges_in(&self, context: ContextId) -> Result<&[EdgeId]> {
        Ok(self.context(context)?.edges())
    }

    /// The ego endpoint of an edge, or `None` when the edge links two
    /// alters.
    pub fn ego_of(&self, edge: EdgeId) -> Result<Option<NodeId>> {
        Ok(self.edge(edge)?.ego(self.ego))
    }

    /// The non-ego endpoint of an edge. Fails with [`Error::InvalidState`]
    /// when neither endpoint is the ego.
    pub fn alter_of(&self, edge: EdgeId) -> Result<NodeId> {
        self.edge(edge)?.alter(self.ego)
    }

    /// Network-level module data, for modules that attach state to the
    /// graph as a whole rather than to one component.
    pub fn modules(&self) -> &ModuleRegistry {
        &self.modules
    }

    pub fn modules_mut(&mut self) -> &mut ModuleRegistry {
        &mut self.modules
    }

    /// Bare restore path for the serializer collaborator.
    ///
    /// Deserialization skips runtime-only state (clock handles, the edge
    /// dedup index, module registries); this call re-injects the clock into
    /// every component and rebuilds the dedup index from the edge arena.
    /// Handle identity is preserved because handles are arena indices
    /// serialized verbatim. Module registries stay empty and are
    /// repopulated, if desired, through
    /// [`ModuleRegistry::insert_boxed`].
    pub fn restore(&mut self, clock: SharedClock) {
        self.clock = clock.clone();
        for node in &mut self.nodes {
            node.rebind(clock.clone());
        }
        for edge in &mut self.edges {
            edge.rebind(clock.clone());
        }
        self.edge_keys = self
            .edges
            .iter()
            .map(|edge| (edge.dedup_key(), edge.handle()))
            .collect();
    }
}
