//! Shared inspector state: selection, coordinate mode and the action queue.

use bevy::prelude::*;

use crate::inspector::fields::{Axis, TransformProperty};
use crate::inspector::slot::SlotId;
use crate::inspector::widgets::FieldPath;
use crate::prefab::PrefabActionKind;

/// Marker component for inspector-internal entities (window, camera, UI root).
#[derive(Component)]
pub struct InspectorInternal;

/// Selection driving the inspector.
///
/// The host editor writes `selected`; the inspector rebuilds when it differs
/// from the entity currently shown.
#[derive(Resource, Default, Debug)]
pub struct InspectorState {
    /// Entity to inspect, if any.
    pub selected: Option<Entity>,
}

/// Frame in which position and rotation fields are shown and edited.
#[derive(Resource, Default, Clone, Copy, PartialEq, Eq, Debug, Reflect)]
pub enum CoordinateMode {
    /// Values relative to the world origin.
    #[default]
    World,
    /// Values relative to the parent.
    Local,
}

/// A user edit, produced by widget observers and dispatched once per tick.
#[derive(Clone, Debug, PartialEq)]
pub enum InspectorAction {
    /// Rename the inspected object.
    SetName(String),
    /// Set one axis of the inspected object's position, rotation or scale.
    SetTransformAxis {
        property: TransformProperty,
        axis: Axis,
        value: f32,
    },
    /// Set a numeric field inside a component.
    SetComponentField { path: FieldPath, value: f64 },
    /// Expand or collapse a component slot.
    ToggleSlot { slot: SlotId, expanded: bool },
    /// Request a prefab operation on the inspected object.
    Prefab(PrefabActionKind),
}

/// Queue of actions waiting for the next dispatch.
#[derive(Resource, Default, Debug)]
pub struct PendingInspectorActions {
    actions: Vec<InspectorAction>,
}

impl PendingInspectorActions {
    pub fn push(&mut self, action: InspectorAction) {
        self.actions.push(action);
    }

    /// Removes and returns every queued action in arrival order.
    pub fn take(&mut self) -> Vec<InspectorAction> {
        std::mem::take(&mut self.actions)
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Tracks the state of the inspector window.
#[derive(Resource, Default)]
pub struct InspectorWindowState {
    /// Entity ID of the inspector window, if it exists.
    pub window_entity: Option<Entity>,
    /// Entity ID of the camera rendering to the inspector window.
    pub camera_entity: Option<Entity>,
    /// Whether the inspector window is currently open.
    pub is_open: bool,
}
