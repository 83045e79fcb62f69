//! Inspector UI module.
//!
//! Shows one scene object at a time: a header with its name, prefab controls
//! and transform, then one collapsible slot per component. Edits flow through
//! [`PendingInspectorActions`] and are applied by the [`InspectorController`].

pub mod config;
pub mod controller;
pub mod fields;
pub mod header;
pub mod layout;
pub mod plugin;
pub mod slot;
pub mod state;
pub mod sub_inspector;
pub mod widgets;

pub use config::InspectorConfig;
pub use controller::{InspectorBody, InspectorController};
pub use fields::{Axis, TransformFields, TransformProperty};
pub use header::SceneObjectHeader;
pub use plugin::{InspectorCorePlugin, InspectorSet, InspectorWindow, InspectorWindowPlugin};
pub use slot::{InspectorSlot, SlotId};
pub use state::{
    CoordinateMode, InspectorAction, InspectorState, InspectorWindowState,
    PendingInspectorActions,
};
pub use sub_inspector::{
    FieldLabels, GenericInspector, InspectedComponent, RegisterSubInspectorExt, SubInspector,
    SubInspectorRegistry,
};
pub use widgets::{DragValue, DragValueChanged, FieldBinding, FieldPath, FieldPathSegment};
