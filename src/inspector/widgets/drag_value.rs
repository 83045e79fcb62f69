//! Drag value widget - a draggable number input like ImGui's DragFloat.
//!
//! This widget allows editing numeric values by:
//! 1. Horizontal dragging to increment/decrement the value
//! 2. Double-clicking to enter text input mode for direct value entry
//!
//! The widget never writes to the inspected entity itself. Every edit is
//! reported as a [`DragValueChanged`] carrying the field's [`FieldBinding`],
//! which the inspector turns into an action.

use bevy::ecs::entity::Entity;
use bevy::ecs::event::Event;
use bevy::ecs::observer::On;
use bevy::input::ButtonState;
use bevy::input::keyboard::{Key, KeyboardInput};
use bevy::input_focus::{FocusedInput, InputFocus};
use bevy::picking::events::{Click, Drag, DragEnd, DragStart, Pointer};
use bevy::prelude::*;
use bevy::ui::Val::*;
use core::any::TypeId;
use std::time::{Duration, Instant};

use crate::inspector::config::InspectorConfig;
use crate::inspector::fields::{Axis, TransformProperty};
use crate::inspector::layout;
use crate::inspector::state::{InspectorAction, PendingInspectorActions};

/// Double-click detection threshold (in milliseconds)
const DOUBLE_CLICK_THRESHOLD_MS: u64 = 300;

/// Describes how to locate a field within a component for write-back.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldPath {
    /// The entity containing the component.
    pub entity: Entity,
    /// The TypeId of the component.
    pub component_type_id: TypeId,
    /// The path segments to navigate to the field.
    pub path: Vec<FieldPathSegment>,
}

/// A segment in a field path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldPathSegment {
    /// Named struct field: e.g., "translation"
    Named(String),
    /// Indexed tuple/array field: e.g., 0, 1, 2
    Index(usize),
}

/// What a numeric widget edits.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldBinding {
    /// One axis of the inspected object's position, rotation or scale.
    Transform {
        property: TransformProperty,
        axis: Axis,
    },
    /// A numeric leaf inside a reflected component.
    Component(FieldPath),
}

/// Props for spawning a DragValue widget.
pub struct DragValueProps {
    /// What the widget edits.
    pub binding: FieldBinding,
    /// Current value.
    pub value: f64,
    /// How fast dragging changes the value.
    pub drag_speed: f64,
    /// Precision (decimal places for display).
    pub precision: usize,
    /// Minimum value (optional).
    pub min: Option<f64>,
    /// Maximum value (optional).
    pub max: Option<f64>,
}

/// A drag value widget.
/// Contains the binding for write-back and configuration.
#[derive(Component, Clone)]
#[require(DragValueDragState)]
pub struct DragValue {
    /// What this widget edits.
    pub binding: FieldBinding,
    /// How fast dragging changes the value (units per pixel).
    pub drag_speed: f64,
    /// Number of decimal places for display.
    pub precision: usize,
    /// Minimum allowed value.
    pub min: Option<f64>,
    /// Maximum allowed value.
    pub max: Option<f64>,
}

impl DragValue {
    fn constrain(&self, mut value: f64) -> f64 {
        if let Some(min) = self.min {
            value = value.max(min);
        }
        if let Some(max) = self.max {
            value = value.min(max);
        }
        value
    }

    /// Formats `value` with this widget's precision.
    pub fn format(&self, value: f64) -> String {
        format!("{:.prec$}", value, prec = self.precision)
    }
}

/// Tracks the drag state of a DragValue widget.
#[derive(Component, Default)]
pub struct DragValueDragState {
    /// Whether currently dragging.
    pub dragging: bool,
    /// The value when dragging started.
    pub start_value: f64,
    /// Whether in text editing mode.
    pub editing: bool,
    /// Text buffer for editing mode.
    pub edit_buffer: String,
    /// Last click time for double-click detection.
    pub last_click_time: Option<Instant>,
    /// The original value before editing (for cancellation).
    pub original_value: f64,
}

/// Event emitted when a DragValue changes.
#[derive(Event, Clone, Debug)]
pub struct DragValueChanged {
    /// The UI entity that triggered this change.
    pub source: Entity,
    /// What the widget edits.
    pub binding: FieldBinding,
    /// The new value.
    pub new_value: f64,
}

/// Event emitted when edit mode changes
#[derive(Event, Clone, Debug)]
pub struct DragValueEditModeChanged {
    pub entity: Entity,
    pub editing: bool,
}

/// Builds a drag value widget with its text child.
pub fn drag_value(props: DragValueProps, config: &InspectorConfig) -> impl Bundle {
    let widget = DragValue {
        binding: props.binding,
        drag_speed: props.drag_speed,
        precision: props.precision,
        min: props.min,
        max: props.max,
    };
    let label = widget.format(props.value);
    (
        Node {
            min_width: config.field_min_width,
            flex_grow: 1.0,
            padding: UiRect::horizontal(Px(4.0)),
            border: UiRect::all(Px(1.0)),
            ..default()
        },
        BorderColor::all(config.border_color),
        BackgroundColor(config.field_background),
        widget,
        Interaction::default(),
        children![(
            Text::new(label),
            TextFont {
                font_size: config.small_font_size,
                ..default()
            },
            TextColor(config.editable_text_color),
        )],
    )
}

/// Overwrites the value shown by a drag value widget.
///
/// A widget in text edit mode keeps showing its edit buffer, but the value
/// Escape returns to follows `value`.
pub fn set_drag_value_display(world: &mut World, widget: Entity, value: f64) {
    let Some(drag_value) = world.get::<DragValue>(widget) else {
        return;
    };
    let label = drag_value.format(value);
    if let Some(mut state) = world.get_mut::<DragValueDragState>(widget) {
        if state.editing {
            if state.original_value != value {
                state.original_value = value;
            }
            return;
        }
    }
    write_child_text(world, widget, label);
}

/// Reads the value currently displayed by a drag value widget.
pub fn drag_value_display(world: &World, widget: Entity) -> Option<f64> {
    world
        .get::<Children>(widget)?
        .iter()
        .find_map(|child| world.get::<Text>(child)?.0.parse::<f64>().ok())
}

fn write_child_text(world: &mut World, widget: Entity, label: String) {
    let children: Vec<Entity> = world
        .get::<Children>(widget)
        .map(|c| c.iter().collect())
        .unwrap_or_default();
    for child in children {
        layout::set_text(world, child, label.as_str());
    }
}

fn displayed_value(children: &Children, q_text: &Query<&mut Text>) -> f64 {
    children
        .iter()
        .find_map(|child| {
            q_text
                .get(child)
                .ok()
                .and_then(|text| text.0.parse::<f64>().ok())
        })
        .unwrap_or(0.0)
}

/// Applies a click to a widget's state. A double click enters text edit mode;
/// any click on a widget already in edit mode gives it the focus back.
/// Returns true when edit mode was entered.
fn register_click(
    entity: Entity,
    drag_value: &DragValue,
    drag_state: &mut DragValueDragState,
    current_value: f64,
    now: Instant,
    input_focus: &mut InputFocus,
) -> bool {
    if drag_state.editing {
        input_focus.set(entity);
        return false;
    }

    let is_double_click = drag_state
        .last_click_time
        .is_some_and(|last| {
            now.duration_since(last) < Duration::from_millis(DOUBLE_CLICK_THRESHOLD_MS)
        });
    if !is_double_click {
        drag_state.last_click_time = Some(now);
        return false;
    }

    drag_state.editing = true;
    drag_state.original_value = current_value;
    drag_state.edit_buffer = drag_value.format(current_value);
    // Reset to prevent triple-click
    drag_state.last_click_time = None;
    input_focus.set(entity);
    true
}

// Observer: handle click for double-click detection
fn drag_value_on_click(
    mut click: On<Pointer<Click>>,
    mut q_drag_value: Query<(&DragValue, &mut DragValueDragState, &Children)>,
    q_text: Query<&mut Text>,
    mut input_focus: ResMut<InputFocus>,
    mut commands: Commands,
) {
    let Ok((drag_value, mut drag_state, children)) = q_drag_value.get_mut(click.entity) else {
        return;
    };
    click.propagate(false);

    let current_value = displayed_value(children, &q_text);
    let entered = register_click(
        click.entity,
        drag_value,
        &mut drag_state,
        current_value,
        Instant::now(),
        &mut input_focus,
    );
    if entered {
        commands.trigger(DragValueEditModeChanged {
            entity: click.entity,
            editing: true,
        });
    }
}

/// Leaves text edit mode on every widget that no longer has keyboard focus,
/// discarding the buffer. The next refresh shows the engine value again.
fn end_edits_on_focus_loss(
    input_focus: Res<InputFocus>,
    mut q_drag_value: Query<(Entity, &DragValue, &mut DragValueDragState, &Children)>,
    mut q_text: Query<&mut Text>,
    mut commands: Commands,
) {
    for (entity, drag_value, mut drag_state, children) in &mut q_drag_value {
        if !drag_state.editing || input_focus.get() == Some(entity) {
            continue;
        }
        drag_state.editing = false;
        drag_state.edit_buffer.clear();
        let label = drag_value.format(drag_state.original_value);
        for child in children.iter() {
            if let Ok(mut text) = q_text.get_mut(child) {
                text.0 = label.clone();
            }
        }
        commands.trigger(DragValueEditModeChanged {
            entity,
            editing: false,
        });
    }
}

// Observer: handle drag start (skip if in edit mode)
fn drag_value_on_drag_start(
    mut drag_start: On<Pointer<DragStart>>,
    mut q_drag_value: Query<(&mut DragValueDragState, &Children), With<DragValue>>,
    q_text: Query<&mut Text>,
) {
    let Ok((mut drag_state, children)) = q_drag_value.get_mut(drag_start.entity) else {
        return;
    };
    if drag_state.editing {
        return;
    }
    drag_start.propagate(false);

    drag_state.dragging = true;
    drag_state.start_value = displayed_value(children, &q_text);
}

// Observer: handle drag
fn drag_value_on_drag(
    mut drag: On<Pointer<Drag>>,
    q_drag_value: Query<(&DragValue, &DragValueDragState)>,
    mut commands: Commands,
) {
    let Ok((drag_value, drag_state)) = q_drag_value.get(drag.entity) else {
        return;
    };
    drag.propagate(false);

    if drag_state.dragging {
        // Horizontal drag distance in pixels
        let delta_x = drag.distance.x as f64;
        let new_value = drag_value.constrain(drag_state.start_value + delta_x * drag_value.drag_speed);

        commands.trigger(DragValueChanged {
            source: drag.entity,
            binding: drag_value.binding.clone(),
            new_value,
        });
    }
}

// Observer: handle drag end
fn drag_value_on_drag_end(
    mut drag_end: On<Pointer<DragEnd>>,
    mut q_drag_value: Query<&mut DragValueDragState>,
) {
    if let Ok(mut drag_state) = q_drag_value.get_mut(drag_end.entity) {
        drag_end.propagate(false);
        drag_state.dragging = false;
    }
}

// Observer: show the new value right away, the next refresh confirms it from the engine
fn update_drag_value_display(
    trigger: On<DragValueChanged>,
    q_drag_value: Query<(&DragValue, &Children)>,
    mut q_text: Query<&mut Text>,
) {
    if let Ok((drag_value, children)) = q_drag_value.get(trigger.source) {
        for child in children.iter() {
            if let Ok(mut text) = q_text.get_mut(child) {
                text.0 = drag_value.format(trigger.new_value);
            }
        }
    }
}

/// Observer that turns value changes into inspector actions.
fn queue_value_change(trigger: On<DragValueChanged>, mut pending: ResMut<PendingInspectorActions>) {
    let value = trigger.new_value;
    let action = match &trigger.binding {
        FieldBinding::Transform { property, axis } => InspectorAction::SetTransformAxis {
            property: *property,
            axis: *axis,
            value: value as f32,
        },
        FieldBinding::Component(path) => InspectorAction::SetComponentField {
            path: path.clone(),
            value,
        },
    };
    pending.push(action);
}

/// Observer: handle keyboard input during text edit mode
fn drag_value_on_keyboard_input(
    trigger: On<FocusedInput<KeyboardInput>>,
    mut q_drag_value: Query<(&DragValue, &mut DragValueDragState, &Children)>,
    mut q_text: Query<&mut Text>,
    mut input_focus: ResMut<InputFocus>,
    mut commands: Commands,
) {
    if trigger.input.state != ButtonState::Pressed {
        return;
    }

    let entity = trigger.focused_entity;
    let Ok((drag_value, mut drag_state, children)) = q_drag_value.get_mut(entity) else {
        return;
    };
    if !drag_state.editing {
        return;
    }

    match &trigger.input.logical_key {
        Key::Enter => {
            if let Ok(new_value) = drag_state.edit_buffer.parse::<f64>() {
                commands.trigger(DragValueChanged {
                    source: entity,
                    binding: drag_value.binding.clone(),
                    new_value: drag_value.constrain(new_value),
                });
            }
            exit_edit_mode(&mut drag_state, &mut input_focus, entity, &mut commands);
        }
        Key::Escape => {
            let original = drag_value.format(drag_state.original_value);
            for child in children.iter() {
                if let Ok(mut text) = q_text.get_mut(child) {
                    text.0 = original.clone();
                }
            }
            exit_edit_mode(&mut drag_state, &mut input_focus, entity, &mut commands);
        }
        Key::Backspace => {
            drag_state.edit_buffer.pop();
            update_edit_display(&drag_state.edit_buffer, children, &mut q_text);
        }
        Key::Character(c) => {
            // Only allow numeric characters, decimal point, exponent and sign
            let valid = c
                .chars()
                .all(|ch| ch.is_ascii_digit() || matches!(ch, '.' | '-' | '+' | 'e' | 'E'));
            if valid {
                drag_state.edit_buffer.push_str(c);
                update_edit_display(&drag_state.edit_buffer, children, &mut q_text);
            }
        }
        _ => {}
    }
}

fn exit_edit_mode(
    drag_state: &mut DragValueDragState,
    input_focus: &mut ResMut<InputFocus>,
    entity: Entity,
    commands: &mut Commands,
) {
    drag_state.editing = false;
    drag_state.edit_buffer.clear();
    input_focus.clear();
    commands.trigger(DragValueEditModeChanged {
        entity,
        editing: false,
    });
}

/// Shows the edit buffer with a cursor indicator.
fn update_edit_display(buffer: &str, children: &Children, q_text: &mut Query<&mut Text>) {
    for child in children.iter() {
        if let Ok(mut text) = q_text.get_mut(child) {
            text.0 = format!("{}|", buffer);
        }
    }
}

/// Observer: show the edit buffer when entering edit mode
fn update_edit_mode_display(
    trigger: On<DragValueEditModeChanged>,
    q_drag_value: Query<(&DragValueDragState, &Children), With<DragValue>>,
    mut q_text: Query<&mut Text>,
) {
    if !trigger.editing {
        return;
    }
    if let Ok((drag_state, children)) = q_drag_value.get(trigger.entity) {
        update_edit_display(&drag_state.edit_buffer, children, &mut q_text);
    }
}

/// Plugin that adds the DragValue widget observers.
pub struct DragValuePlugin;

impl Plugin for DragValuePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InputFocus>()
            .init_resource::<PendingInspectorActions>()
            // Drag behavior
            .add_observer(drag_value_on_drag_start)
            .add_observer(drag_value_on_drag)
            .add_observer(drag_value_on_drag_end)
            // Click for double-click detection
            .add_observer(drag_value_on_click)
            // Keyboard input for text editing
            .add_observer(drag_value_on_keyboard_input)
            // Display updates
            .add_observer(update_drag_value_display)
            .add_observer(update_edit_mode_display)
            // Value change processing
            .add_observer(queue_value_change)
            .add_systems(
                PreUpdate,
                end_edits_on_focus_loss.run_if(resource_changed::<InputFocus>),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    fn spawn_widget(world: &mut World, binding: FieldBinding, value: f64) -> Entity {
        let config = InspectorConfig::default();
        world
            .spawn(drag_value(
                DragValueProps {
                    binding,
                    value,
                    drag_speed: 0.1,
                    precision: 2,
                    min: Some(0.0),
                    max: None,
                },
                &config,
            ))
            .id()
    }

    #[test]
    fn display_is_formatted_with_precision() {
        let mut world = World::new();
        let widget = spawn_widget(
            &mut world,
            FieldBinding::Transform {
                property: TransformProperty::Scale,
                axis: Axis::Y,
            },
            1.0,
        );
        assert_eq!(drag_value_display(&world, widget), Some(1.0));

        set_drag_value_display(&mut world, widget, 2.345);
        assert_eq!(drag_value_display(&world, widget), Some(2.35));
    }

    #[test]
    fn editing_widget_keeps_its_buffer() {
        let mut world = World::new();
        let widget = spawn_widget(
            &mut world,
            FieldBinding::Transform {
                property: TransformProperty::Position,
                axis: Axis::X,
            },
            4.0,
        );
        world.get_mut::<DragValueDragState>(widget).unwrap().editing = true;

        set_drag_value_display(&mut world, widget, 9.0);
        assert_eq!(drag_value_display(&world, widget), Some(4.0));
        // Escape would now return to the latest engine value.
        assert_eq!(
            world.get::<DragValueDragState>(widget).unwrap().original_value,
            9.0
        );
    }

    #[test]
    fn stale_edit_is_dropped_when_focus_moves_on() {
        let mut world = World::new();
        world.init_resource::<InputFocus>();
        let position = |axis| FieldBinding::Transform {
            property: TransformProperty::Position,
            axis,
        };
        let x = spawn_widget(&mut world, position(Axis::X), 1.0);
        let y = spawn_widget(&mut world, position(Axis::Y), 2.0);

        let start = Instant::now();
        let later = start + Duration::from_millis(50);
        world.resource_scope(|world, mut focus: Mut<InputFocus>| {
            let widget = world.get::<DragValue>(x).unwrap().clone();
            let mut state = world.get_mut::<DragValueDragState>(x).unwrap();
            assert!(!register_click(x, &widget, &mut state, 1.0, start, &mut focus));
            assert!(register_click(x, &widget, &mut state, 1.0, later, &mut focus));
        });
        assert!(world.get::<DragValueDragState>(x).unwrap().editing);

        world.resource_mut::<InputFocus>().set(y);
        world.run_system_once(end_edits_on_focus_loss).unwrap();

        assert!(!world.get::<DragValueDragState>(x).unwrap().editing);
        set_drag_value_display(&mut world, x, 6.5);
        assert_eq!(drag_value_display(&world, x), Some(6.5));
    }

    #[test]
    fn clicking_an_editing_widget_takes_focus_back() {
        let mut world = World::new();
        let x = spawn_widget(
            &mut world,
            FieldBinding::Transform {
                property: TransformProperty::Position,
                axis: Axis::X,
            },
            1.0,
        );
        let other = world.spawn_empty().id();
        let widget = world.get::<DragValue>(x).unwrap().clone();
        let mut state = DragValueDragState {
            editing: true,
            edit_buffer: "1.5".to_string(),
            ..default()
        };
        let mut focus = InputFocus::default();
        focus.set(other);

        assert!(!register_click(x, &widget, &mut state, 1.0, Instant::now(), &mut focus));
        assert_eq!(focus.get(), Some(x));
        assert!(state.editing);
        assert_eq!(state.edit_buffer, "1.5");
    }

    #[test]
    fn changes_are_queued_as_actions() {
        let mut world = World::new();
        world.init_resource::<PendingInspectorActions>();
        world.add_observer(queue_value_change);
        let widget = spawn_widget(
            &mut world,
            FieldBinding::Transform {
                property: TransformProperty::Rotation,
                axis: Axis::Z,
            },
            0.0,
        );

        world.trigger(DragValueChanged {
            source: widget,
            binding: FieldBinding::Transform {
                property: TransformProperty::Rotation,
                axis: Axis::Z,
            },
            new_value: 45.0,
        });

        let actions = world.resource_mut::<PendingInspectorActions>().take();
        assert_eq!(
            actions,
            vec![InspectorAction::SetTransformAxis {
                property: TransformProperty::Rotation,
                axis: Axis::Z,
                value: 45.0,
            }]
        );
    }

    #[test]
    fn constrain_applies_bounds() {
        let widget = DragValue {
            binding: FieldBinding::Transform {
                property: TransformProperty::Scale,
                axis: Axis::X,
            },
            drag_speed: 0.1,
            precision: 1,
            min: Some(0.0),
            max: Some(10.0),
        };
        assert_eq!(widget.constrain(-3.0), 0.0);
        assert_eq!(widget.constrain(12.0), 10.0);
        assert_eq!(widget.format(3.14159), "3.1");
    }
}
