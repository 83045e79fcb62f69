//! Scene-object header: name, prefab controls and the transform fields.

use bevy::feathers::controls::{button, ButtonProps};
use bevy::prelude::*;
use bevy::ui_widgets::{observe, Activate};

use crate::inspector::config::InspectorConfig;
use crate::inspector::fields::{
    parent_global_transform, read_transform_fields, write_transform_axis, Axis, TransformProperty,
};
use crate::inspector::layout::{self, caption, column, flexible_space, row, small_text};
use crate::inspector::state::{CoordinateMode, InspectorAction, PendingInspectorActions};
use crate::inspector::widgets::{
    drag_value, set_drag_value_display, set_text_field_value, text_field, DragValueProps,
    FieldBinding, TextFieldChanged,
};
use crate::prefab::{has_prefab_link, PrefabActionKind};

/// Marker for the object name field.
#[derive(Component)]
pub struct NameField;

/// Marker for the row holding the prefab controls.
#[derive(Component)]
pub struct PrefabRow;

/// A prefab action button.
#[derive(Component, Clone, Copy, Debug)]
pub struct PrefabButton(pub PrefabActionKind);

/// Widgets of the header panel and the cached prefab-link state.
pub struct SceneObjectHeader {
    root: Entity,
    name_field: Entity,
    prefab_row: Entity,
    /// Indexed by `[property][axis]`.
    fields: [[Entity; 3]; 3],
    has_prefab: bool,
}

impl SceneObjectHeader {
    /// Spawns the header under `parent`. Values are filled in by the first
    /// (forced) [`refresh_fields`](Self::refresh_fields).
    pub fn build(world: &mut World, parent: Entity, config: &InspectorConfig) -> Self {
        let root = world.spawn((column(config), ChildOf(parent))).id();

        let name_row = world.spawn((row(config), ChildOf(root))).id();
        world.spawn((caption("Name", config), ChildOf(name_row)));
        let name_field = world
            .spawn((text_field("", config), NameField, ChildOf(name_row)))
            .id();
        world.spawn((flexible_space(), ChildOf(name_row)));

        let prefab_row = world.spawn((row(config), PrefabRow, ChildOf(root))).id();

        let fields = TransformProperty::ALL.map(|property| {
            let property_row = world.spawn((row(config), ChildOf(root))).id();
            world.spawn((caption(property.label(), config), ChildOf(property_row)));
            let drag_speed = match property {
                TransformProperty::Rotation => config.rotation_drag_speed,
                _ => config.transform_drag_speed,
            };
            Axis::ALL.map(|axis| {
                world.spawn((
                    small_text(axis.label(), config.muted_text_color, config),
                    ChildOf(property_row),
                ));
                world
                    .spawn((
                        drag_value(
                            DragValueProps {
                                binding: FieldBinding::Transform { property, axis },
                                value: 0.0,
                                drag_speed,
                                precision: config.precision,
                                min: None,
                                max: None,
                            },
                            config,
                        ),
                        ChildOf(property_row),
                    ))
                    .id()
            })
        });

        Self {
            root,
            name_field,
            prefab_row,
            fields,
            has_prefab: false,
        }
    }

    pub fn root(&self) -> Entity {
        self.root
    }

    pub fn name_field(&self) -> Entity {
        self.name_field
    }

    pub fn prefab_row(&self) -> Entity {
        self.prefab_row
    }

    /// The numeric field showing one axis of one transform property.
    pub fn field(&self, property: TransformProperty, axis: Axis) -> Entity {
        self.fields[property_index(property)][axis.index()]
    }

    /// Last prefab-link state the prefab row was built for.
    pub fn has_prefab(&self) -> bool {
        self.has_prefab
    }

    /// Copies the target's state into the header widgets.
    ///
    /// The prefab row is rebuilt only when the link state differs from the
    /// cached one or `force` is set. Returns whether it was rebuilt.
    pub fn refresh_fields(
        &mut self,
        world: &mut World,
        target: Entity,
        mode: CoordinateMode,
        force: bool,
    ) -> bool {
        let name = world
            .get::<Name>(target)
            .map(|name| name.as_str().to_string())
            .unwrap_or_default();
        set_text_field_value(world, self.name_field, &name);

        let has_prefab = has_prefab_link(world, target);
        let rebuild = has_prefab != self.has_prefab || force;
        if rebuild {
            self.rebuild_prefab_row(world);
            self.has_prefab = has_prefab;
        }

        if let Some(local) = world.get::<Transform>(target).copied() {
            let parent = parent_global_transform(world, target);
            let values = read_transform_fields(mode, &local, &parent);
            for property in TransformProperty::ALL {
                let vector = values.get(property);
                for axis in Axis::ALL {
                    let widget = self.field(property, axis);
                    set_drag_value_display(world, widget, vector[axis.index()] as f64);
                }
            }
        }

        rebuild
    }

    fn rebuild_prefab_row(&self, world: &mut World) {
        let config = world
            .get_resource::<InspectorConfig>()
            .cloned()
            .unwrap_or_default();
        layout::despawn_children(world, self.prefab_row);

        world.spawn((caption("Prefab", &config), ChildOf(self.prefab_row)));
        for kind in PrefabActionKind::ALL {
            world.spawn((
                button(
                    ButtonProps::default(),
                    PrefabButton(kind),
                    Spawn((
                        Text::new(kind.label()),
                        TextFont {
                            font_size: config.small_font_size,
                            ..default()
                        },
                    )),
                ),
                observe(on_prefab_button_click),
                ChildOf(self.prefab_row),
            ));
        }
    }

    /// Despawns every header widget.
    pub fn destroy(self, world: &mut World) {
        layout::despawn(world, self.root);
    }
}

fn property_index(property: TransformProperty) -> usize {
    match property {
        TransformProperty::Position => 0,
        TransformProperty::Rotation => 1,
        TransformProperty::Scale => 2,
    }
}

/// Renames `target`, inserting a [`Name`] if it has none.
pub fn set_object_name(world: &mut World, target: Entity, name: &str) {
    let Ok(mut entity) = world.get_entity_mut(target) else {
        return;
    };
    match entity.get_mut::<Name>() {
        Some(mut current) => current.set(name.to_string()),
        None => {
            entity.insert(Name::new(name.to_string()));
        }
    }
}

/// Writes one transform axis of `target` in the given coordinate mode.
/// Returns false when the target has no [`Transform`] or the edit cannot be
/// expressed under its parent.
pub fn set_transform_axis(
    world: &mut World,
    target: Entity,
    mode: CoordinateMode,
    property: TransformProperty,
    axis: Axis,
    value: f32,
) -> bool {
    let parent = parent_global_transform(world, target);
    let Some(mut local) = world.get_mut::<Transform>(target) else {
        debug!("Ignoring {property:?} edit on {target}: no Transform");
        return false;
    };
    let written = write_transform_axis(mode, property, axis, value, &mut local, &parent);
    if !written {
        debug!("Ignoring {property:?} edit on {target}: parent transform is not invertible");
    }
    written
}

/// Observer for prefab buttons.
fn on_prefab_button_click(
    activate: On<Activate>,
    buttons: Query<&PrefabButton>,
    mut pending: ResMut<PendingInspectorActions>,
) {
    if let Ok(PrefabButton(kind)) = buttons.get(activate.entity) {
        pending.push(InspectorAction::Prefab(*kind));
    }
}

/// Observer turning name field edits into actions.
pub(crate) fn on_name_field_changed(
    trigger: On<TextFieldChanged>,
    name_fields: Query<(), With<NameField>>,
    mut pending: ResMut<PendingInspectorActions>,
) {
    if name_fields.contains(trigger.source) {
        pending.push(InspectorAction::SetName(trigger.value.clone()));
    }
}
