use bevy::prelude::*;
use object_inspector::inspector::fields::{Axis, TransformProperty};
use object_inspector::inspector::widgets::{
    drag_value_display, text_field_value, DragValueChanged, FieldBinding, TextFieldChanged,
};
use object_inspector::inspector::{InspectorAction, PendingInspectorActions};
use object_inspector::{
    InspectorController, InspectorCorePlugin, InspectorState, PrefabActionKind, PrefabLink,
};

#[derive(Component, Reflect, Default)]
#[reflect(Component)]
struct Lamp {
    brightness: f32,
}

fn app() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, InspectorCorePlugin))
        .register_type::<Lamp>();
    app
}

fn select(app: &mut App, entity: Option<Entity>) {
    app.world_mut().resource_mut::<InspectorState>().selected = entity;
    app.update();
}

fn controller(app: &App) -> &InspectorController {
    app.world().resource::<InspectorController>()
}

fn component_count(app: &App, entity: Entity) -> usize {
    app.world().inspect_entity(entity).unwrap().count()
}

#[test]
fn selection_drives_rebuilds() {
    let mut app = app();
    let lamp = app
        .world_mut()
        .spawn((Name::new("Lamp"), Transform::default(), Lamp::default()))
        .id();
    let marker = app.world_mut().spawn(Lamp { brightness: 1.0 }).id();

    select(&mut app, Some(lamp));
    assert_eq!(controller(&app).target(), Some(lamp));
    assert_eq!(controller(&app).slots().len(), component_count(&app, lamp));

    select(&mut app, Some(marker));
    assert_eq!(controller(&app).slots().len(), component_count(&app, marker));
    assert!(
        controller(&app)
            .slots()
            .iter()
            .all(|slot| slot.component().entity == marker)
    );

    select(&mut app, None);
    assert!(controller(&app).slots().is_empty());
    assert!(controller(&app).header().is_none());
}

#[test]
fn repeated_ticks_keep_slots_stable() {
    let mut app = app();
    let lamp = app.world_mut().spawn((Transform::default(), Lamp::default())).id();
    select(&mut app, Some(lamp));
    let ids: Vec<_> = controller(&app).slots().iter().map(|s| s.id()).collect();

    app.update();
    app.update();
    let after: Vec<_> = controller(&app).slots().iter().map(|s| s.id()).collect();
    assert_eq!(ids, after);
}

#[test]
fn header_follows_engine_changes() {
    let mut app = app();
    let lamp = app
        .world_mut()
        .spawn((Name::new("Lamp"), Transform::from_xyz(1.0, 2.0, 3.0)))
        .id();
    select(&mut app, Some(lamp));

    app.world_mut()
        .get_mut::<Transform>(lamp)
        .unwrap()
        .translation
        .y = 8.0;
    app.world_mut().get_mut::<Name>(lamp).unwrap().set("Torch");
    app.update();

    let header = controller(&app).header().unwrap();
    let y = header.field(TransformProperty::Position, Axis::Y);
    assert_eq!(drag_value_display(app.world(), y), Some(8.0));
    assert_eq!(
        text_field_value(app.world(), header.name_field()),
        Some("Torch")
    );
}

#[test]
fn widget_edits_are_applied_on_the_next_tick() {
    let mut app = app();
    let lamp = app
        .world_mut()
        .spawn((Name::new("Lamp"), Transform::from_xyz(1.0, 2.0, 3.0)))
        .id();
    select(&mut app, Some(lamp));

    let header = controller(&app).header().unwrap();
    let z_field = header.field(TransformProperty::Position, Axis::Z);
    let name_field = header.name_field();

    app.world_mut().trigger(DragValueChanged {
        source: z_field,
        binding: FieldBinding::Transform {
            property: TransformProperty::Position,
            axis: Axis::Z,
        },
        new_value: -4.0,
    });
    app.world_mut().trigger(TextFieldChanged {
        source: name_field,
        value: "Beacon".to_string(),
    });
    assert!(!app.world().resource::<PendingInspectorActions>().is_empty());

    app.update();
    assert!(app.world().resource::<PendingInspectorActions>().is_empty());
    assert_eq!(
        app.world().get::<Transform>(lamp).unwrap().translation,
        Vec3::new(1.0, 2.0, -4.0)
    );
    assert_eq!(app.world().get::<Name>(lamp).unwrap().as_str(), "Beacon");
}

#[test]
fn despawned_target_clears_the_inspector() {
    let mut app = app();
    let lamp = app.world_mut().spawn((Transform::default(), Lamp::default())).id();
    select(&mut app, Some(lamp));
    assert!(!controller(&app).slots().is_empty());

    app.world_mut().despawn(lamp);
    app.update();

    assert!(controller(&app).target().is_none());
    assert!(controller(&app).slots().is_empty());
    assert!(app.world().resource::<InspectorState>().selected.is_none());
}

#[test]
fn breaking_the_prefab_link_flips_the_prefab_row() {
    let mut app = app();
    let lamp = app
        .world_mut()
        .spawn((Transform::default(), PrefabLink::new("lamp.scn.ron")))
        .id();
    select(&mut app, Some(lamp));
    assert!(controller(&app).header().unwrap().has_prefab());

    app.world_mut()
        .resource_mut::<PendingInspectorActions>()
        .push(InspectorAction::Prefab(PrefabActionKind::Break));
    app.update();
    app.update();

    assert!(app.world().get::<PrefabLink>(lamp).is_none());
    assert!(!controller(&app).header().unwrap().has_prefab());
}
