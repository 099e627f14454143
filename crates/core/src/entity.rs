//! Entity trait: records identified by a key rather than by their contents.
//!
//! Stores key rows by `Entity::id`; storing an entity whose id is already
//! present replaces the earlier row.

pub trait Entity {
    /// Storage key of the entity.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug + core::fmt::Display;

    fn id(&self) -> &Self::Id;

    /// Whether `self` and `other` are the same entity, regardless of the
    /// rest of their fields.
    fn same_entity(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}
