//! A scene-object inspector panel for Bevy.
//!
//! Shows the selected entity's name, prefab controls and transform, followed by
//! one collapsible section per component. Built using bevy_feathers, powered by
//! bevy_reflect.

pub mod inspector;
pub mod prefab;
pub mod reflection_tools;

// Re-export the main plugins for convenience
pub use inspector::{
    CoordinateMode, InspectorConfig, InspectorController, InspectorCorePlugin, InspectorState,
    InspectorWindowPlugin,
};
pub use prefab::{PrefabActionKind, PrefabActionRequested, PrefabLink};
