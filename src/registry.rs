//! Per-component module data: a lazily populated, type-keyed cache.
//!
//! Application modules attach derived state to nodes, edges and contexts
//! without the graph knowing their types in advance. Each component embeds a
//! [`ModuleRegistry`] by value (composition, no shared base type); an entry
//! goes absent -> present exactly once and then lives as long as the owning
//! component. There is no present -> absent transition.
//!
//! Mutations on resident module values are not observed by any persistence
//! notification mechanism; callers must not rely on such mutations being
//! durable without an explicit save path.

use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use crate::error::{Error, Result};
use crate::network::{ContextId, EdgeId, NodeId};

/// Back-handle handed to module data built through the type strategy, so a
/// value can remember which component owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentRef {
    Node(NodeId),
    Edge(EdgeId),
    Context(ContextId),
}

/// Module data constructible from its owning component.
///
/// `create` is the constructor that accepts the owner; implementations that
/// need no back-reference simply ignore it (typically `Ok(Self::default())`).
/// The default `key` is the type descriptor, which is what makes the
/// key-less [`ModuleRegistry::get_or_create`] convenience possible when a
/// module only ever needs a single instance per component.
pub trait ModuleData: Any {
    fn create(owner: ComponentRef) -> Result<Self>
    where
        Self: Sized;

    fn key() -> &'static str
    where
        Self: Sized,
    {
        type_name::<Self>()
    }
}

/// String-keyed store of opaque module values, one live value per key.
#[derive(Default)]
pub struct ModuleRegistry {
    entries: HashMap<String, Box<dyn Any>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Factory strategy: return the cached value for `key`, or invoke
    /// `factory` once, cache its result, and return it.
    ///
    /// On a cache hit the factory argument is ignored entirely — the first
    /// value cached under a key wins for the lifetime of the component, no
    /// matter what is passed later. Fails with [`Error::Construction`] if
    /// the cached value has a different concrete type than `T`.
    pub fn get_or_insert_with<T, F>(&mut self, key: &str, factory: F) -> Result<&T>
    where
        T: Any,
        F: FnOnce() -> T,
    {
        if !self.entries.contains_key(key) {
            debug!(key, "module data miss, invoking factory");
            self.entries.insert(key.to_string(), Box::new(factory()));
        }
        self.entries
            .get(key)
            .and_then(|value| value.downcast_ref::<T>())
            .ok_or_else(|| Self::mismatch(key, type_name::<T>()))
    }

    /// Type strategy: key inferred from `T`'s type descriptor, value built
    /// by [`ModuleData::create`] with a back-handle to the owner.
    ///
    /// A failing `create` maps to [`Error::Construction`]; the registry is
    /// left without an entry so a later call may retry with the same or a
    /// different strategy.
    pub fn get_or_create<T: ModuleData>(&mut self, owner: ComponentRef) -> Result<&T> {
        let key = T::key();
        if !self.entries.contains_key(key) {
            debug!(key, ?owner, "module data miss, constructing from type");
            let value = T::create(owner).map_err(|e| Error::Construction {
                key: key.to_string(),
                reason: e.to_string(),
            })?;
            self.entries.insert(key.to_string(), Box::new(value));
        }
        self.entries
            .get(key)
            .and_then(|value| value.downcast_ref::<T>())
            .ok_or_else(|| Self::mismatch(key, type_name::<T>()))
    }

    /// Typed peek. Absent is `Ok(None)`; a cached value of a different
    /// concrete type is an explicit cast-mismatch error, never a silent
    /// miss.
    pub fn get<T: Any>(&self, key: &str) -> Result<Option<&T>> {
        match self.entries.get(key) {
            None => Ok(None),
            Some(value) => match value.downcast_ref::<T>() {
                Some(typed) => Ok(Some(typed)),
                None => Err(Self::mismatch(key, type_name::<T>())),
            },
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys of all resident entries, for the serializer collaborator.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Bare repopulation path used when restoring persisted module data:
    /// installs a value without invoking any factory. Replaces a resident
    /// entry, so it is restricted to restore flows, not general use.
    pub fn insert_boxed(&mut self, key: impl Into<String>, value: Box<dyn Any>) {
        self.entries.insert(key.into(), value);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn mismatch(key: &str, requested: &str) -> Error {
        Error::Construction {
            key: key.to_string(),
            reason: format!("cached value is not of the requested type {requested}"),
        }
    }
}

impl fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleRegistry")
            .field("keys", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}
