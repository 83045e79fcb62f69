//! Demonstrates the object inspector window.
//!
//! Press 1, 2 or 3 to select an object, 0 to clear the selection and Space to
//! switch between world and local coordinates. Ctrl+Alt+I reopens the
//! inspector window after it was closed.

use bevy::prelude::*;
use object_inspector::{
    CoordinateMode, InspectorState, InspectorWindowPlugin, PrefabActionKind,
    PrefabActionRequested, PrefabLink,
};

/// Spins its entity around Z.
#[derive(Component, Reflect)]
#[reflect(Component)]
struct Spin {
    degrees_per_second: f32,
}

#[derive(Resource)]
struct Selectable(Vec<Entity>);

fn main() {
    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins(InspectorWindowPlugin)
        .register_type::<Spin>()
        .add_systems(Startup, setup)
        .add_systems(Update, (spin, select_with_keys))
        .add_observer(log_prefab_requests)
        .run();
}

fn setup(mut commands: Commands) {
    commands.spawn(Camera2d);

    let parent = commands
        .spawn((
            Sprite {
                color: Color::srgb(0.9, 0.8, 0.2),
                custom_size: Some(Vec2::new(80.0, 80.0)),
                ..default()
            },
            Transform::from_xyz(0.0, 0.0, 0.0),
            Name::new("Crate"),
            PrefabLink::new("props/crate.scn.ron"),
            Spin {
                degrees_per_second: 20.0,
            },
        ))
        .id();

    let child = commands
        .spawn((
            Sprite {
                color: Color::srgb(1.0, 0.0, 0.0),
                custom_size: Some(Vec2::new(30.0, 30.0)),
                ..default()
            },
            Transform::from_xyz(80.0, 0.0, 0.0),
            Name::new("Lid"),
            ChildOf(parent),
        ))
        .id();

    let standalone = commands
        .spawn((
            Sprite {
                color: Color::srgb(0.0, 1.0, 0.0),
                custom_size: Some(Vec2::new(50.0, 50.0)),
                ..default()
            },
            Transform::from_xyz(-200.0, 0.0, 0.0),
        ))
        .id();

    commands.insert_resource(Selectable(vec![parent, child, standalone]));
    commands.insert_resource(InspectorState {
        selected: Some(parent),
    });

    let instructions = "\
Check the Inspector window!

1 / 2 / 3: inspect the crate, its lid or the green square
0: clear the selection
Space: toggle world / local coordinates
Ctrl+Alt+I: reopen the inspector window"
        .to_string();

    commands.spawn((
        Text::new(instructions),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(12.0),
            left: Val::Px(12.0),
            ..default()
        },
        TextFont {
            font_size: 16.0,
            ..default()
        },
    ));
}

fn spin(time: Res<Time>, mut spinners: Query<(&Spin, &mut Transform)>) {
    for (spin, mut transform) in &mut spinners {
        transform.rotate_z(spin.degrees_per_second.to_radians() * time.delta_secs());
    }
}

fn select_with_keys(
    keys: Res<ButtonInput<KeyCode>>,
    selectable: Res<Selectable>,
    mut state: ResMut<InspectorState>,
    mut mode: ResMut<CoordinateMode>,
) {
    let slots = [KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3];
    for (key, entity) in slots.iter().zip(&selectable.0) {
        if keys.just_pressed(*key) {
            state.selected = Some(*entity);
        }
    }
    if keys.just_pressed(KeyCode::Digit0) {
        state.selected = None;
    }
    if keys.just_pressed(KeyCode::Space) {
        *mode = match *mode {
            CoordinateMode::World => CoordinateMode::Local,
            CoordinateMode::Local => CoordinateMode::World,
        };
    }
}

/// Apply and Revert are up to the host; Break is handled by the inspector.
fn log_prefab_requests(trigger: On<PrefabActionRequested>) {
    if trigger.kind != PrefabActionKind::Break {
        info!("{:?} requested for {}", trigger.kind, trigger.entity);
    }
}
