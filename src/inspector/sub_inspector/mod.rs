//! Per-component editors shown inside inspector slots.
//!
//! A sub-inspector owns whatever widgets it spawns under the content region it
//! is given. The controller only tells it when to refresh, when to show or hide
//! and when to go away.

pub mod generic;
pub mod labels;
pub mod resolver;

use bevy::ecs::component::ComponentId;
use bevy::prelude::*;
use core::any::TypeId;

pub use generic::GenericInspector;
pub use labels::FieldLabels;
pub use resolver::{
    RegisterSubInspectorExt, ResolverError, SubInspectorFactory, SubInspectorRegistry,
};

/// The component a slot edits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InspectedComponent {
    /// Entity owning the component.
    pub entity: Entity,
    /// ECS id of the component.
    pub component_id: ComponentId,
    /// Rust type, absent for dynamic components.
    pub type_id: Option<TypeId>,
    /// Short type name shown in the slot header.
    pub name: String,
}

/// Editor for one component.
pub trait SubInspector: Send + Sync + 'static {
    /// Spawns the editor's widgets under `content`.
    fn initialize(&mut self, world: &mut World, content: Entity, component: InspectedComponent);

    /// Copies current component values into the widgets. Runs every tick,
    /// whether or not the editor is visible.
    fn refresh(&mut self, world: &mut World);

    /// Shows or hides the editor's widgets.
    fn set_visible(&mut self, world: &mut World, visible: bool);

    /// Despawns every widget the editor spawned.
    fn destroy(&mut self, world: &mut World);
}
