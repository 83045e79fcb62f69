//! Prefab linkage as seen by the inspector.
//!
//! The inspector only queries whether an entity is linked and requests
//! operations on it. Applying or reverting a prefab is the host's business:
//! observe [`PrefabActionRequested`] to implement them.

use bevy::prelude::*;

/// Marks an entity as an instance of a prefab asset.
#[derive(Component, Reflect, Clone, Debug, PartialEq, Eq)]
#[reflect(Component)]
pub struct PrefabLink {
    /// Name or path of the prefab this entity was instantiated from.
    pub prefab: String,
}

impl PrefabLink {
    pub fn new(prefab: impl Into<String>) -> Self {
        Self {
            prefab: prefab.into(),
        }
    }
}

/// An operation on the link between an entity and its prefab.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Reflect)]
pub enum PrefabActionKind {
    /// Write the instance's changes back into the prefab.
    Apply,
    /// Discard instance changes and reload from the prefab.
    Revert,
    /// Detach the instance from its prefab.
    Break,
}

impl PrefabActionKind {
    pub const ALL: [PrefabActionKind; 3] = [Self::Apply, Self::Revert, Self::Break];

    /// Button caption.
    pub fn label(self) -> &'static str {
        match self {
            Self::Apply => "Apply",
            Self::Revert => "Revert",
            Self::Break => "Break",
        }
    }
}

/// Fire-and-forget request emitted by the inspector's prefab buttons.
#[derive(Event, Clone, Debug)]
pub struct PrefabActionRequested {
    pub entity: Entity,
    pub kind: PrefabActionKind,
}

/// Returns whether `entity` is linked to a prefab.
pub fn has_prefab_link(world: &World, entity: Entity) -> bool {
    world.get::<PrefabLink>(entity).is_some()
}

/// Default handling for [`PrefabActionKind::Break`]: drop the link component.
pub(crate) fn break_prefab_link(trigger: On<PrefabActionRequested>, mut commands: Commands) {
    if trigger.kind != PrefabActionKind::Break {
        return;
    }
    if let Ok(mut entity) = commands.get_entity(trigger.entity) {
        entity.remove::<PrefabLink>();
        debug!("Broke prefab link on {:?}", trigger.entity);
    }
}
