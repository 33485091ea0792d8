//! Contextual ego network core.
//!
//! Models a personal social graph observed through situational contexts:
//! an ego node, the alters it relates to, the edges between them, and the
//! timestamped interactions that occur on each edge. Every component
//! carries a [`ModuleRegistry`] so unrelated application modules can attach
//! lazily-created derived state to the same node, edge or context without
//! coordination.
//!
//! The [`ContextualEgoNetwork`] container is the sole owner of canonical
//! storage; everything else relates through copyable handles, so identity
//! is handle identity and one string node id never resolves to two node
//! instances within a network.
//!
//! Single-threaded by design: no operation suspends or blocks, mutating
//! calls take `&mut self`, and read accessors return snapshots.

pub mod clock;
pub mod context;
pub mod edge;
pub mod error;
pub mod interaction;
pub mod network;
pub mod node;
pub mod policy;
pub mod registry;

pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use context::Context;
pub use edge::Edge;
pub use error::{Error, Result};
pub use interaction::Interaction;
pub use network::{
    assert_same_network, ContextId, ContextualEgoNetwork, EdgeId, NetworkScoped, NodeId,
};
pub use node::Node;
pub use policy::ErrorPolicy;
pub use registry::{ComponentRef, ModuleData, ModuleRegistry};
