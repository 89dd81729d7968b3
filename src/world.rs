//! The active set: the one collection that owns every live entity.
//!
//! Entities are stored in a `SlotMap` so the run state can hold stable
//! handles (player, boss) that never dangle after culling.  A separate key
//! list keeps insertion order, which is also draw order.

use slotmap::{new_key_type, SlotMap};

use crate::entities::{Category, Entity};

new_key_type! {
    /// Stable handle to an entity in the active set.
    pub struct EntityKey;
}

#[derive(Clone, Debug, Default)]
pub struct World {
    entities: SlotMap<EntityKey, Entity>,
    order: Vec<EntityKey>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, entity: Entity) -> EntityKey {
        let key = self.entities.insert(entity);
        self.order.push(key);
        key
    }

    pub fn get(&self, key: EntityKey) -> Option<&Entity> {
        self.entities.get(key)
    }

    pub fn get_mut(&mut self, key: EntityKey) -> Option<&mut Entity> {
        self.entities.get_mut(key)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> &[EntityKey] {
        &self.order
    }

    /// Entities in insertion order, including ones deactivated this frame.
    pub fn iter(&self) -> impl Iterator<Item = (EntityKey, &Entity)> + '_ {
        self.order
            .iter()
            .filter_map(move |&key| self.entities.get(key).map(|e| (key, e)))
    }

    /// Active entities only, in draw order.
    pub fn active(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.iter().map(|(_, e)| e).filter(|e| e.is_active())
    }

    /// Keys of every active entity in `category`, in insertion order.
    pub fn keys_of(&self, category: Category) -> Vec<EntityKey> {
        self.iter()
            .filter(|(_, e)| e.is_active() && e.category() == category)
            .map(|(key, _)| key)
            .collect()
    }

    pub fn count_of(&self, category: Category) -> usize {
        self.active().filter(|e| e.category() == category).count()
    }

    /// Drop every entity the predicate rejects.
    pub fn retain(&mut self, mut keep: impl FnMut(&Entity) -> bool) {
        let entities = &mut self.entities;
        self.order.retain(|&key| {
            let kept = entities.get(key).is_some_and(&mut keep);
            if !kept {
                entities.remove(key);
            }
            kept
        });
    }

    /// Remove inactive entities; returns how many were dropped.
    pub fn cull(&mut self) -> usize {
        let before = self.order.len();
        self.retain(Entity::is_active);
        before - self.order.len()
    }

    pub fn clear(&mut self) {
        self.entities.clear();
        self.order.clear();
    }
}
