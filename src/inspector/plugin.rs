//! Inspector plugins and the window UI scaffold.

use bevy::camera::RenderTarget;
use bevy::ecs::hierarchy::ChildSpawnerCommands;
use bevy::ecs::relationship::Relationship;
use bevy::feathers::controls::{button, ButtonProps};
use bevy::feathers::dark_theme::create_dark_theme;
use bevy::feathers::theme::{ThemeBackgroundColor, UiTheme};
use bevy::feathers::tokens;
use bevy::feathers::FeathersPlugins;
use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::picking::hover::HoverMap;
use bevy::prelude::*;
use bevy::ui::Val::*;
use bevy::ui_widgets::{observe, Activate};
use bevy::window::{WindowRef, WindowResolution};

use super::config::InspectorConfig;
use super::controller::{
    apply_inspector_actions, refresh_inspector, sync_inspector_target, InspectorBody,
    InspectorController,
};
use super::header::on_name_field_changed;
use super::layout;
use super::state::{
    CoordinateMode, InspectorInternal, InspectorState, InspectorWindowState,
    PendingInspectorActions,
};
use super::sub_inspector::{FieldLabels, SubInspectorRegistry};
use super::widgets::{DragValuePlugin, TextFieldPlugin};
use crate::prefab::{break_prefab_link, PrefabLink};

/// Marker component for the inspector window.
#[derive(Component)]
pub struct InspectorWindow;

/// Marker to indicate UI has been initialized.
#[derive(Component)]
struct InspectorUiInitialized;

/// Title-bar button switching between world and local coordinates.
#[derive(Component)]
struct CoordinateModeButton;

/// System sets for organizing inspector systems.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum InspectorSet {
    /// Handle input events.
    Input,
    /// Dispatch queued user edits.
    ApplyActions,
    /// Follow the selection, rebuilding on change.
    SyncTarget,
    /// Copy engine state into the widgets.
    Refresh,
}

/// Inspector state, widgets and systems, without any window.
///
/// Hosts that already have a UI can add an [`InspectorBody`] node to place the
/// inspector inside it.
pub struct InspectorCorePlugin;

impl Plugin for InspectorCorePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((DragValuePlugin, TextFieldPlugin))
            // State resources
            .init_resource::<InspectorState>()
            .init_resource::<CoordinateMode>()
            .init_resource::<InspectorConfig>()
            .init_resource::<InspectorController>()
            .init_resource::<SubInspectorRegistry>()
            .init_resource::<FieldLabels>()
            .init_resource::<PendingInspectorActions>()
            .register_type::<PrefabLink>()
            .register_type::<CoordinateMode>()
            .add_observer(on_name_field_changed)
            .add_observer(break_prefab_link)
            // System ordering
            .configure_sets(
                Update,
                (
                    InspectorSet::Input,
                    InspectorSet::ApplyActions,
                    InspectorSet::SyncTarget,
                    InspectorSet::Refresh,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (
                    apply_inspector_actions.in_set(InspectorSet::ApplyActions),
                    sync_inspector_target.in_set(InspectorSet::SyncTarget),
                    refresh_inspector.in_set(InspectorSet::Refresh),
                ),
            );
    }
}

/// Opens the inspector in its own window.
pub struct InspectorWindowPlugin;

impl Plugin for InspectorWindowPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<InspectorCorePlugin>() {
            app.add_plugins(InspectorCorePlugin);
        }
        app.add_plugins(FeathersPlugins)
            .insert_resource(UiTheme(create_dark_theme()))
            .init_resource::<InspectorWindowState>()
            // Startup
            .add_systems(Startup, setup_inspector_window)
            // Update systems
            .add_systems(
                Update,
                (
                    (handle_mouse_wheel_scroll, reopen_inspector_window).in_set(InspectorSet::Input),
                    setup_inspector_ui.before(InspectorSet::SyncTarget),
                    update_coordinate_mode_caption
                        .run_if(resource_changed::<CoordinateMode>)
                        .in_set(InspectorSet::Refresh),
                    handle_window_close.before(InspectorSet::SyncTarget),
                ),
            )
            // Nothing to show while the window is closed
            .configure_sets(Update, InspectorSet::SyncTarget.run_if(inspector_window_open))
            .configure_sets(Update, InspectorSet::Refresh.run_if(inspector_window_open));
    }
}

/// Spawns the inspector window on startup.
fn setup_inspector_window(mut commands: Commands, mut window_state: ResMut<InspectorWindowState>) {
    open_inspector_window(&mut commands, &mut window_state);
}

fn open_inspector_window(commands: &mut Commands, window_state: &mut InspectorWindowState) {
    let window_entity = commands
        .spawn((
            Window {
                title: "Inspector".to_string(),
                resolution: WindowResolution::new(420, 720),
                ..default()
            },
            InspectorWindow,
            Visibility::Visible,
            InheritedVisibility::default(),
            ViewVisibility::default(),
        ))
        .id();

    window_state.window_entity = Some(window_entity);
    window_state.is_open = true;

    info!("Inspector window created: {:?}", window_entity);
}

/// Sets up the UI scaffold once the window exists.
fn setup_inspector_ui(
    mut commands: Commands,
    mut window_state: ResMut<InspectorWindowState>,
    config: Res<InspectorConfig>,
    inspector_windows: Query<Entity, (With<InspectorWindow>, Without<InspectorUiInitialized>)>,
) {
    let Some(window_entity) = window_state.window_entity else {
        return;
    };

    if inspector_windows.get(window_entity).is_err() {
        return;
    }

    // Mark window as initialized
    commands.entity(window_entity).insert(InspectorUiInitialized);

    let camera_entity = commands
        .spawn((
            Camera2d,
            Camera {
                target: RenderTarget::Window(WindowRef::Entity(window_entity)),
                ..default()
            },
            InspectorInternal,
        ))
        .id();
    window_state.camera_entity = Some(camera_entity);

    commands
        .spawn((
            Node {
                width: Percent(100.0),
                height: Percent(100.0),
                display: Display::Flex,
                flex_direction: FlexDirection::Column,
                ..default()
            },
            ThemeBackgroundColor(tokens::WINDOW_BG),
            UiTargetCamera(camera_entity),
            InspectorInternal,
        ))
        .with_children(|root| {
            spawn_title_bar(root, &config);

            root.spawn((
                Node {
                    width: Percent(100.0),
                    flex_grow: 1.0,
                    min_height: Px(0.0),
                    display: Display::Flex,
                    flex_direction: FlexDirection::Column,
                    ..default()
                },
                InspectorBody,
            ));
        });

    // Anything built before the body existed was spawned as a UI root.
    commands.queue(|world: &mut World| {
        world.resource_scope(|world, mut controller: Mut<InspectorController>| {
            let target = controller.target();
            if target.is_some() {
                controller.set_target(world, target);
            }
        });
    });

    info!("Inspector UI initialized");
}

fn spawn_title_bar(parent: &mut ChildSpawnerCommands<'_>, config: &InspectorConfig) {
    parent
        .spawn((
            Node {
                width: Percent(100.0),
                height: config.title_bar_height,
                display: Display::Flex,
                align_items: AlignItems::Center,
                justify_content: JustifyContent::SpaceBetween,
                padding: config.panel_padding,
                border: UiRect::bottom(Px(1.0)),
                ..default()
            },
            BorderColor::all(config.border_color),
        ))
        .with_children(|bar| {
            bar.spawn((
                Text::new("Inspector"),
                TextFont {
                    font_size: config.title_font_size + 2.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
            bar.spawn((
                button(
                    ButtonProps::default(),
                    CoordinateModeButton,
                    Spawn((
                        Text::new(coordinate_mode_caption(CoordinateMode::default())),
                        TextFont {
                            font_size: config.small_font_size,
                            ..default()
                        },
                    )),
                ),
                observe(toggle_coordinate_mode),
            ));
        });
}

fn coordinate_mode_caption(mode: CoordinateMode) -> &'static str {
    match mode {
        CoordinateMode::World => "World",
        CoordinateMode::Local => "Local",
    }
}

fn toggle_coordinate_mode(_activate: On<Activate>, mut mode: ResMut<CoordinateMode>) {
    *mode = match *mode {
        CoordinateMode::World => CoordinateMode::Local,
        CoordinateMode::Local => CoordinateMode::World,
    };
    debug!("Coordinate mode set to {:?}", *mode);
}

fn update_coordinate_mode_caption(
    mode: Res<CoordinateMode>,
    buttons: Query<&Children, With<CoordinateModeButton>>,
    mut texts: Query<&mut Text>,
) {
    for children in &buttons {
        for child in children.iter() {
            if let Ok(mut text) = texts.get_mut(child) {
                text.0 = coordinate_mode_caption(*mode).to_string();
            }
        }
    }
}

/// Handles cleanup when the inspector window is closed.
fn handle_window_close(
    mut commands: Commands,
    window_state: Res<InspectorWindowState>,
    mut removed_windows: RemovedComponents<Window>,
) {
    for entity in removed_windows.read() {
        if window_state.window_entity == Some(entity) {
            commands.queue(close_inspector_ui);
        }
    }
}

/// Clears the inspector and despawns the camera and UI that belonged to the
/// closed window. The selection is kept for when the window is reopened.
pub(crate) fn close_inspector_ui(world: &mut World) {
    if world.contains_resource::<InspectorController>() {
        world.resource_scope(|world, mut controller: Mut<InspectorController>| {
            controller.clear(world);
        });
    }

    let internal: Vec<Entity> = world
        .query_filtered::<Entity, With<InspectorInternal>>()
        .iter(world)
        .collect();
    for entity in internal {
        layout::despawn(world, entity);
    }

    if let Some(mut window_state) = world.get_resource_mut::<InspectorWindowState>() {
        window_state.window_entity = None;
        window_state.camera_entity = None;
        window_state.is_open = false;
    }
    info!("Inspector window closed");
}

/// Ctrl+Alt+I opens the inspector window again after it was closed.
fn reopen_inspector_window(
    keys: Res<ButtonInput<KeyCode>>,
    mut commands: Commands,
    mut window_state: ResMut<InspectorWindowState>,
) {
    let ctrl = keys.any_pressed([KeyCode::ControlLeft, KeyCode::ControlRight]);
    let alt = keys.any_pressed([KeyCode::AltLeft, KeyCode::AltRight]);
    if ctrl && alt && keys.just_pressed(KeyCode::KeyI) && !window_state.is_open {
        open_inspector_window(&mut commands, &mut window_state);
    }
}

fn inspector_window_open(window_state: Res<InspectorWindowState>) -> bool {
    window_state.is_open
}

/// Handles mouse wheel scrolling by traversing up from hovered entities to find scrollable containers.
fn handle_mouse_wheel_scroll(
    mut mouse_wheel_reader: MessageReader<MouseWheel>,
    hover_map: Res<HoverMap>,
    parents: Query<&ChildOf>,
    mut scrollables: Query<(&mut ScrollPosition, &Node, &ComputedNode)>,
) {
    for event in mouse_wheel_reader.read() {
        let mut delta = Vec2::new(event.x, event.y);
        if event.unit == MouseScrollUnit::Line {
            delta *= 20.0; // Convert lines to pixels
        }
        delta = -delta; // Invert for natural scrolling

        let hovered = hover_map
            .values()
            .flat_map(|pointer_map| pointer_map.keys().copied())
            .next();
        if let Some(hovered) = hovered {
            scroll_ancestor(hovered, delta, &parents, &mut scrollables);
        }
    }
}

/// Scrolls the nearest vertically scrollable ancestor of `start` (itself
/// included). Returns the entity that was scrolled.
fn scroll_ancestor(
    start: Entity,
    delta: Vec2,
    parents: &Query<&ChildOf>,
    scrollables: &mut Query<(&mut ScrollPosition, &Node, &ComputedNode)>,
) -> Option<Entity> {
    let mut current = start;
    loop {
        if let Ok((mut scroll_pos, node, computed)) = scrollables.get_mut(current) {
            if node.overflow.y == OverflowAxis::Scroll {
                if delta.y != 0.0 {
                    let max_y = (computed.content_size().y - computed.size().y).max(0.0)
                        * computed.inverse_scale_factor();
                    scroll_pos.y = (scroll_pos.y + delta.y).clamp(0.0, max_y);
                }
                return Some(current);
            }
        }
        current = parents.get(current).ok()?.get();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspector::controller::InspectorScrollContent;
    use bevy::ecs::system::RunSystemOnce;

    #[test]
    fn wheel_over_a_row_scrolls_the_enclosing_container() {
        let mut world = World::new();
        let content = world
            .spawn((
                Node {
                    overflow: Overflow::scroll_y(),
                    ..default()
                },
                ComputedNode {
                    size: Vec2::new(200.0, 100.0),
                    content_size: Vec2::new(200.0, 1000.0),
                    inverse_scale_factor: 1.0,
                    ..default()
                },
            ))
            .id();
        let row = world.spawn((Node::default(), ChildOf(content))).id();
        let field = world.spawn((Node::default(), ChildOf(row))).id();

        let scrolled = world
            .run_system_once(
                move |parents: Query<&ChildOf>,
                      mut scrollables: Query<(&mut ScrollPosition, &Node, &ComputedNode)>| {
                    scroll_ancestor(field, Vec2::new(0.0, 50.0), &parents, &mut scrollables)
                },
            )
            .unwrap();

        assert_eq!(scrolled, Some(content));
        assert_eq!(world.get::<ScrollPosition>(content).unwrap().y, 50.0);
    }

    fn window_world() -> (World, Entity) {
        let mut world = World::new();
        world.init_resource::<InspectorConfig>();
        world.init_resource::<CoordinateMode>();
        world.init_resource::<InspectorController>();
        let window = world.spawn((Window::default(), InspectorWindow)).id();
        world.insert_resource(InspectorWindowState {
            window_entity: Some(window),
            camera_entity: None,
            is_open: true,
        });
        (world, window)
    }

    #[test]
    fn closing_the_window_tears_the_inspector_down() {
        let (mut world, _) = window_world();
        let camera = world.spawn(InspectorInternal).id();
        let root = world
            .spawn((Node::default(), InspectorInternal))
            .with_child((Node::default(), InspectorBody))
            .id();
        let target = world.spawn(Transform::default()).id();
        world.resource_scope(|world, mut controller: Mut<InspectorController>| {
            controller.set_target(world, Some(target));
        });
        let scroll_area = world.resource::<InspectorController>().scroll_area().unwrap();
        assert!(world.get::<ChildOf>(scroll_area).is_some());

        close_inspector_ui(&mut world);

        let controller = world.resource::<InspectorController>();
        assert!(controller.target().is_none());
        assert!(controller.header().is_none());
        assert!(world.get_entity(camera).is_err());
        assert!(world.get_entity(root).is_err());
        assert!(world.get_entity(scroll_area).is_err());
        assert_eq!(
            world
                .query_filtered::<(), With<InspectorScrollContent>>()
                .iter(&world)
                .count(),
            0
        );
        let state = world.resource::<InspectorWindowState>();
        assert!(!state.is_open);
        assert!(state.window_entity.is_none());
        assert!(world.get_entity(target).is_ok());
    }

    #[test]
    fn shortcut_reopens_a_closed_window() {
        let (mut world, window) = window_world();
        world.despawn(window);
        close_inspector_ui(&mut world);

        let mut keys = ButtonInput::<KeyCode>::default();
        keys.press(KeyCode::ControlLeft);
        keys.press(KeyCode::AltLeft);
        keys.press(KeyCode::KeyI);
        world.insert_resource(keys);
        world.run_system_once(reopen_inspector_window).unwrap();

        let state = world.resource::<InspectorWindowState>();
        assert!(state.is_open);
        let reopened = state.window_entity.unwrap();
        assert!(world.get::<InspectorWindow>(reopened).is_some());

        // A second press while open does nothing.
        world.run_system_once(reopen_inspector_window).unwrap();
        assert_eq!(
            world
                .query_filtered::<(), With<InspectorWindow>>()
                .iter(&world)
                .count(),
            1
        );
    }
}
