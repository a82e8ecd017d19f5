//! Pairs currently in contact.
//!
//! The contact detector diffs this set against the overlaps it finds each
//! tick to decide which pairs begin and which end touching.
use bevy_ecs::prelude::*;
use rustc_hash::FxHashSet;

/// `(katamari, other)` pairs that were touching at the end of the last tick.
#[derive(Resource, Debug, Default, Clone)]
pub struct ActiveContacts {
    pairs: FxHashSet<(Entity, Entity)>,
}

impl ActiveContacts {
    pub fn contains(&self, katamari: Entity, other: Entity) -> bool {
        self.pairs.contains(&(katamari, other))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Swap in this tick's pairs and return the ones that stopped touching.
    pub fn replace(&mut self, current: FxHashSet<(Entity, Entity)>) -> Vec<(Entity, Entity)> {
        let mut ended: Vec<(Entity, Entity)> = self.pairs.difference(&current).copied().collect();
        // hash order is arbitrary; keep end events deterministic
        ended.sort();
        self.pairs = current;
        ended
    }

    pub fn clear(&mut self) {
        self.pairs.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_reports_ended_pairs() {
        let mut world = World::new();
        let k = world.spawn_empty().id();
        let a = world.spawn_empty().id();
        let b = world.spawn_empty().id();

        let mut contacts = ActiveContacts::default();
        let mut first = FxHashSet::default();
        first.insert((k, a));
        first.insert((k, b));
        assert!(contacts.replace(first).is_empty());
        assert_eq!(contacts.len(), 2);

        let mut second = FxHashSet::default();
        second.insert((k, b));
        assert_eq!(contacts.replace(second), vec![(k, a)]);
        assert!(contacts.contains(k, b));
        assert!(!contacts.contains(k, a));
    }
}
