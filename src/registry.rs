//! The live entity collection and its spatial queries.
//!
//! Entries keep insertion order, which is also draw order. While an entity
//! runs its own update it is checked out of its slot: the slot stays in place
//! (so order is preserved) but queries skip it, and the driver checks it back
//! in afterwards unless the slot was removed in the meantime.

use std::fmt;

use crate::entity::{Entity, EntityKind, Point};

/// Stable handle for a registry entry. Never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Result of a nearest-of-kind search.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Nearest {
    pub id: EntityId,
    pub position: Point,
    pub distance: f32,
}

#[derive(Debug)]
struct Slot {
    id: EntityId,
    kind: EntityKind,
    entity: Option<Entity>,
}

#[derive(Debug, Default)]
pub struct Registry {
    slots: Vec<Slot>,
    next_id: u64,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries, including one that is checked out.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Append an entity; it draws on top of everything already present.
    pub fn add(&mut self, entity: Entity) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.slots.push(Slot {
            id,
            kind: entity.kind(),
            entity: Some(entity),
        });
        id
    }

    /// Remove an entry and hand back its quality. Removing an absent id is a
    /// no-op returning `None`.
    pub fn remove(&mut self, id: EntityId) -> Option<f32> {
        let index = self.index_of(id)?;
        let slot = self.slots.remove(index);
        slot.entity.map(|e| e.body.quality)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        let index = self.index_of(id)?;
        self.slots[index].entity.as_ref()
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        let index = self.index_of(id)?;
        self.slots[index].entity.as_mut()
    }

    /// Ids in registry order, as of now.
    pub fn ids(&self) -> Vec<EntityId> {
        self.slots.iter().map(|s| s.id).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> + Clone + '_ {
        self.slots
            .iter()
            .filter_map(|s| s.entity.as_ref().map(|e| (s.id, e)))
    }

    /// Lazy, restartable view of the entries of one kind, in order.
    pub fn entries_of_type(
        &self,
        kind: EntityKind,
    ) -> impl Iterator<Item = (EntityId, &Entity)> + Clone + '_ {
        self.iter().filter(move |(_, e)| e.kind() == kind)
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        self.slots.iter().filter(|s| s.kind == kind).count()
    }

    /// Closest entity of `kind` to `(x, y)` by Euclidean distance between
    /// positions. Ties go to the earlier entry.
    pub fn find_nearest(&self, kind: EntityKind, x: f32, y: f32) -> Option<Nearest> {
        let mut best: Option<Nearest> = None;
        for (id, entity) in self.entries_of_type(kind) {
            let (ex, ey) = (entity.body.x, entity.body.y);
            let distance = ((x - ex).powi(2) + (y - ey).powi(2)).sqrt();
            if best.map_or(true, |b| distance < b.distance) {
                best = Some(Nearest {
                    id,
                    position: Point { x: ex, y: ey },
                    distance,
                });
            }
        }
        best
    }

    /// First entity of `kind` whose bounding box strictly contains the point.
    pub fn intersects(&self, kind: EntityKind, x: f32, y: f32) -> Option<EntityId> {
        self.entries_of_type(kind)
            .find(|(_, e)| e.body.rect().contains(x, y))
            .map(|(id, _)| id)
    }

    // ── Check-out ────────────────────────────────────────────────────────────

    /// Take an entity out of its slot for the duration of its own update.
    pub fn check_out(&mut self, id: EntityId) -> Option<Entity> {
        let index = self.index_of(id)?;
        self.slots[index].entity.take()
    }

    /// Put a checked-out entity back. Returns false (dropping the entity) if
    /// its slot was removed while it was out.
    pub fn check_in(&mut self, id: EntityId, entity: Entity) -> bool {
        match self.index_of(id) {
            Some(index) if self.slots[index].entity.is_none() => {
                self.slots[index].entity = Some(entity);
                true
            }
            _ => false,
        }
    }

    fn index_of(&self, id: EntityId) -> Option<usize> {
        self.slots.iter().position(|s| s.id == id)
    }
}
