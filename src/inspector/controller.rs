//! The inspector controller: owns the header, the component slots and the
//! scroll container, rebuilds them on selection change and refreshes them
//! every tick.

use bevy::prelude::*;
use bevy::ui::Val::*;
use bevy::ui_widgets::{ControlOrientation, CoreScrollbarThumb, Scrollbar};

use crate::inspector::config::InspectorConfig;
use crate::inspector::header::{set_object_name, set_transform_axis, SceneObjectHeader};
use crate::inspector::layout::{self, flexible_space};
use crate::inspector::slot::{set_foldout_expanded, spawn_slot_widgets, InspectorSlot, SlotId};
use crate::inspector::state::{
    CoordinateMode, InspectorAction, InspectorState, PendingInspectorActions,
};
use crate::inspector::sub_inspector::generic::set_field_value;
use crate::inspector::sub_inspector::{
    GenericInspector, InspectedComponent, SubInspector, SubInspectorRegistry,
};
use crate::prefab::PrefabActionRequested;
use crate::reflection_tools::with_reflected_component_mut;

/// Node the scroll container is spawned under. Without one the container
/// becomes a UI root.
#[derive(Component)]
pub struct InspectorBody;

/// Scrollable region holding the header and the slots.
#[derive(Component)]
pub struct InspectorScrollContent;

/// Inspector for one scene object at a time.
#[derive(Resource, Default)]
pub struct InspectorController {
    target: Option<Entity>,
    scroll_area: Option<Entity>,
    header: Option<SceneObjectHeader>,
    slots: Vec<InspectorSlot>,
    next_slot_id: u32,
}

impl InspectorController {
    /// The entity being inspected.
    pub fn target(&self) -> Option<Entity> {
        self.target
    }

    /// One slot per component of the target, in component order.
    pub fn slots(&self) -> &[InspectorSlot] {
        &self.slots
    }

    pub fn header(&self) -> Option<&SceneObjectHeader> {
        self.header.as_ref()
    }

    pub fn scroll_area(&self) -> Option<Entity> {
        self.scroll_area
    }

    /// Tears down the current UI and, if `target` exists, builds a new one for it.
    pub fn set_target(&mut self, world: &mut World, target: Option<Entity>) {
        self.clear(world);

        let Some(target) = target else {
            return;
        };
        if world.get_entity(target).is_err() {
            debug!("Not inspecting {target}: entity does not exist");
            return;
        }

        let config = world
            .get_resource::<InspectorConfig>()
            .cloned()
            .unwrap_or_default();
        let mode = current_mode(world);

        self.target = Some(target);
        let (scroll_area, content) = spawn_scroll_area(world, &config);
        self.scroll_area = Some(scroll_area);

        let mut header = SceneObjectHeader::build(world, content, &config);
        header.refresh_fields(world, target, mode, true);
        self.header = Some(header);

        let components: Vec<InspectedComponent> = match world.inspect_entity(target) {
            Ok(infos) => infos
                .map(|info| InspectedComponent {
                    entity: target,
                    component_id: info.id(),
                    type_id: info.type_id(),
                    name: info.name().shortname().to_string(),
                })
                .collect(),
            Err(_) => Vec::new(),
        };
        for component in components {
            self.add_slot(world, content, component, &config);
        }

        world.spawn((flexible_space(), ChildOf(content)));
        info!("Inspecting {target} ({} components)", self.slots.len());
    }

    fn add_slot(
        &mut self,
        world: &mut World,
        parent: Entity,
        component: InspectedComponent,
        config: &InspectorConfig,
    ) {
        let id = SlotId(self.next_slot_id);
        self.next_slot_id += 1;

        let mut sub_inspector = world
            .get_resource::<SubInspectorRegistry>()
            .map(|registry| registry.resolve(component.type_id))
            .unwrap_or_else(|| Box::new(GenericInspector::default()) as Box<dyn SubInspector>);

        let (foldout, content) = spawn_slot_widgets(world, parent, id, &component.name, config);
        sub_inspector.initialize(world, content, component.clone());
        sub_inspector.refresh(world);

        self.slots.push(InspectorSlot {
            id,
            component,
            foldout,
            content,
            sub_inspector,
            expanded: true,
        });
    }

    /// Copies the target's current state into every widget.
    pub fn refresh(&mut self, world: &mut World) {
        let Some(target) = self.target else {
            return;
        };
        let mode = current_mode(world);
        if let Some(header) = self.header.as_mut() {
            header.refresh_fields(world, target, mode, false);
        }
        for slot in &mut self.slots {
            slot.sub_inspector.refresh(world);
        }
    }

    /// Destroys every slot, the header and the scroll container.
    pub fn clear(&mut self, world: &mut World) {
        for mut slot in self.slots.drain(..) {
            slot.sub_inspector.destroy(world);
            layout::despawn(world, slot.foldout);
            layout::despawn(world, slot.content);
        }
        if let Some(header) = self.header.take() {
            header.destroy(world);
        }
        if let Some(scroll_area) = self.scroll_area.take() {
            layout::despawn(world, scroll_area);
        }
        self.target = None;
    }

    /// Expands or collapses one slot. Unknown ids are ignored.
    pub fn toggle_slot(&mut self, world: &mut World, slot: SlotId, expanded: bool) {
        let Some(entry) = self.slots.iter_mut().find(|entry| entry.id == slot) else {
            debug!("Ignoring toggle of unknown slot {slot:?}");
            return;
        };
        entry.expanded = expanded;
        entry.sub_inspector.set_visible(world, expanded);
        set_foldout_expanded(world, entry.foldout, &entry.component.name, expanded);
    }

    /// Applies one queued user edit.
    pub fn handle_action(&mut self, world: &mut World, action: InspectorAction) {
        match action {
            InspectorAction::ToggleSlot { slot, expanded } => {
                self.toggle_slot(world, slot, expanded);
            }
            InspectorAction::SetComponentField { path, value } => {
                let result = with_reflected_component_mut(
                    world,
                    path.entity,
                    path.component_type_id,
                    |reflected| set_field_value(reflected, &path.path, value),
                );
                match result {
                    Ok(true) => {}
                    Ok(false) => warn!("Could not set field {:?} on {}", path.path, path.entity),
                    Err(err) => warn!("Failed to edit component: {err}"),
                }
            }
            InspectorAction::SetName(name) => {
                if let Some(target) = self.live_target("rename") {
                    set_object_name(world, target, &name);
                }
            }
            InspectorAction::SetTransformAxis {
                property,
                axis,
                value,
            } => {
                if let Some(target) = self.live_target("transform edit") {
                    let mode = current_mode(world);
                    set_transform_axis(world, target, mode, property, axis, value);
                }
            }
            InspectorAction::Prefab(kind) => {
                if let Some(target) = self.live_target("prefab action") {
                    world.trigger(PrefabActionRequested {
                        entity: target,
                        kind,
                    });
                }
            }
        }
    }

    fn live_target(&self, what: &str) -> Option<Entity> {
        if self.target.is_none() {
            debug!("Ignoring {what}: nothing is inspected");
        }
        self.target
    }
}

fn current_mode(world: &World) -> CoordinateMode {
    world
        .get_resource::<CoordinateMode>()
        .copied()
        .unwrap_or_default()
}

/// Spawns the scroll container with its scrollbar. Returns
/// `(scroll_area, content)`.
fn spawn_scroll_area(world: &mut World, config: &InspectorConfig) -> (Entity, Entity) {
    let body = world
        .query_filtered::<Entity, With<InspectorBody>>()
        .iter(world)
        .next();

    let scroll_area = world
        .spawn(Node {
            width: Percent(100.0),
            flex_grow: 1.0,
            display: Display::Grid,
            grid_template_columns: vec![GridTrack::fr(1.0), GridTrack::px(config.scrollbar_width)],
            ..default()
        })
        .id();
    if let Some(body) = body {
        world.entity_mut(scroll_area).insert(ChildOf(body));
    }

    let content = world
        .spawn((
            Node {
                display: Display::Flex,
                flex_direction: FlexDirection::Column,
                row_gap: config.item_gap,
                padding: config.panel_padding,
                overflow: Overflow::scroll_y(),
                ..default()
            },
            ScrollPosition::default(),
            InspectorScrollContent,
            ChildOf(scroll_area),
        ))
        .id();

    world.spawn((
        Scrollbar {
            target: content,
            orientation: ControlOrientation::Vertical,
            min_thumb_length: 20.0,
        },
        Node {
            width: Px(config.scrollbar_width),
            height: Percent(100.0),
            ..default()
        },
        BackgroundColor(Color::srgba(0.15, 0.15, 0.15, 0.5)),
        ChildOf(scroll_area),
        children![(
            CoreScrollbarThumb,
            Node {
                width: Percent(100.0),
                ..default()
            },
            BackgroundColor(Color::srgba(0.5, 0.5, 0.5, 0.8)),
        )],
    ));

    (scroll_area, content)
}

/// Dispatches the actions queued by widget observers since the last tick.
pub fn apply_inspector_actions(world: &mut World) {
    let Some(actions) = world
        .get_resource_mut::<PendingInspectorActions>()
        .map(|mut pending| pending.take())
    else {
        return;
    };
    if actions.is_empty() {
        return;
    }
    world.resource_scope(|world, mut controller: Mut<InspectorController>| {
        for action in actions {
            controller.handle_action(world, action);
        }
    });
}

/// Follows the selection, and drops a target that was despawned.
pub fn sync_inspector_target(world: &mut World) {
    world.resource_scope(|world, mut controller: Mut<InspectorController>| {
        let mut selected = world
            .get_resource::<InspectorState>()
            .and_then(|state| state.selected);
        if selected.is_some_and(|entity| world.get_entity(entity).is_err()) {
            debug!("Selected entity no longer exists, clearing selection");
            if let Some(mut state) = world.get_resource_mut::<InspectorState>() {
                state.selected = None;
            }
            selected = None;
        }

        if controller
            .target()
            .is_some_and(|target| world.get_entity(target).is_err())
        {
            info!("Inspected entity was despawned");
            controller.clear(world);
        }

        if selected != controller.target() {
            controller.set_target(world, selected);
        }
    });
}

/// Per-tick value sync.
pub fn refresh_inspector(world: &mut World) {
    world.resource_scope(|world, mut controller: Mut<InspectorController>| {
        controller.refresh(world);
    });
}
