//! Arena of live protocol entities addressed by stable handles.
//!
//! Creating an entity mints a fresh handle; destroying it removes the entity
//! and the handle never resolves again. Handles are never reused.

use std::{collections::HashMap, fmt, hash::Hash};

use fusionswap_types::{Address, AuctionId, EscrowId, FusionOrderId};

/// A handle type that can be freshly generated.
pub trait EntityKey: Copy + Eq + Hash + fmt::Display {
    fn generate() -> Self;
}

impl EntityKey for AuctionId {
    fn generate() -> Self {
        Self::new()
    }
}

impl EntityKey for FusionOrderId {
    fn generate() -> Self {
        Self::new()
    }
}

impl EntityKey for EscrowId {
    fn generate() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
struct Slot<T> {
    owner: Address,
    value: T,
}

/// Live entities of one type.
#[derive(Debug, Clone)]
pub struct EntityStore<K, T> {
    entities: HashMap<K, Slot<T>>,
}

impl<K: EntityKey, T> EntityStore<K, T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entities: HashMap::new(),
        }
    }

    /// Store `value` under a fresh handle.
    pub fn create(&mut self, owner: Address, value: T) -> K {
        let key = K::generate();
        self.entities.insert(key, Slot { owner, value });
        key
    }

    /// Build the entity from its own handle, storing it only on success.
    pub fn create_with<E>(
        &mut self,
        owner: Address,
        build: impl FnOnce(K) -> Result<T, E>,
    ) -> Result<K, E> {
        let key = K::generate();
        let value = build(key)?;
        self.entities.insert(key, Slot { owner, value });
        Ok(key)
    }

    /// Remove the entity, returning it. `None` if already gone.
    pub fn destroy(&mut self, key: &K) -> Option<T> {
        self.entities.remove(key).map(|slot| slot.value)
    }

    #[must_use]
    pub fn exists(&self, key: &K) -> bool {
        self.entities.contains_key(key)
    }

    #[must_use]
    pub fn get(&self, key: &K) -> Option<&T> {
        self.entities.get(key).map(|slot| &slot.value)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut T> {
        self.entities.get_mut(key).map(|slot| &mut slot.value)
    }

    /// The address that created the entity.
    #[must_use]
    pub fn owner(&self, key: &K) -> Option<Address> {
        self.entities.get(key).map(|slot| slot.owner)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &T)> {
        self.entities.iter().map(|(k, slot)| (k, &slot.value))
    }
}

impl<K: EntityKey, T> Default for EntityStore<K, T> {
    fn default() -> Self {
        Self::new()
    }
}
