//! Single-line text field.
//!
//! Click to focus, type to edit, Enter or Escape to leave. Every keystroke
//! emits a [`TextFieldChanged`] so the bound value follows the text as it is
//! typed.

use bevy::input::ButtonState;
use bevy::input::keyboard::{Key, KeyboardInput};
use bevy::input_focus::{FocusedInput, InputFocus};
use bevy::picking::events::{Click, Pointer};
use bevy::prelude::*;
use bevy::ui::Val::*;

use crate::inspector::config::InspectorConfig;
use crate::inspector::layout;

/// A text field. The displayed string lives in the [`Text`] child.
#[derive(Component, Default)]
pub struct TextField {
    /// Whether the field has keyboard focus.
    pub editing: bool,
    /// Text before editing began, restored by Escape.
    pub original: String,
    /// Current contents.
    pub value: String,
}

/// Event emitted on every edit of a text field.
#[derive(Event, Clone, Debug)]
pub struct TextFieldChanged {
    pub source: Entity,
    pub value: String,
}

/// Builds a text field showing `value`.
pub fn text_field(value: &str, config: &InspectorConfig) -> impl Bundle {
    (
        Node {
            flex_grow: 1.0,
            padding: UiRect::horizontal(Px(4.0)),
            border: UiRect::all(Px(1.0)),
            ..default()
        },
        BorderColor::all(config.border_color),
        BackgroundColor(config.field_background),
        TextField {
            value: value.to_string(),
            ..default()
        },
        Interaction::default(),
        children![(
            Text::new(value),
            TextFont {
                font_size: config.body_font_size,
                ..default()
            },
            TextColor(Color::WHITE),
        )],
    )
}

/// Overwrites the contents of a text field unless it is being edited.
pub fn set_text_field_value(world: &mut World, field: Entity, value: &str) {
    let Some(mut text_field) = world.get_mut::<TextField>(field) else {
        return;
    };
    if text_field.editing {
        return;
    }
    if text_field.value != value {
        text_field.value = value.to_string();
    }

    let children: Vec<Entity> = world
        .get::<Children>(field)
        .map(|c| c.iter().collect())
        .unwrap_or_default();
    for child in children {
        layout::set_text(world, child, value);
    }
}

/// Reads the contents of a text field.
pub fn text_field_value(world: &World, field: Entity) -> Option<&str> {
    world.get::<TextField>(field).map(|f| f.value.as_str())
}

fn show(children: &Children, q_text: &mut Query<&mut Text>, label: String) {
    for child in children.iter() {
        if let Ok(mut text) = q_text.get_mut(child) {
            if text.0 != label {
                text.0 = label.clone();
            }
        }
    }
}

/// Starts editing `field` and gives it keyboard focus. A field that is already
/// editing only takes the focus back. Returns the label to show when editing
/// starts.
fn focus_field(
    entity: Entity,
    field: &mut TextField,
    input_focus: &mut InputFocus,
) -> Option<String> {
    input_focus.set(entity);
    if field.editing {
        return None;
    }
    field.editing = true;
    field.original = field.value.clone();
    Some(format!("{}|", field.value))
}

fn text_field_on_click(
    mut click: On<Pointer<Click>>,
    mut fields: Query<(&mut TextField, &Children)>,
    mut q_text: Query<&mut Text>,
    mut input_focus: ResMut<InputFocus>,
) {
    let Ok((mut field, children)) = fields.get_mut(click.entity) else {
        return;
    };
    click.propagate(false);
    if let Some(label) = focus_field(click.entity, &mut field, &mut input_focus) {
        show(children, &mut q_text, label);
    }
}

/// Leaves edit mode on every field that no longer has keyboard focus. Typed
/// text has already been reported, so it is kept.
fn end_edits_on_focus_loss(
    input_focus: Res<InputFocus>,
    mut fields: Query<(Entity, &mut TextField, &Children)>,
    mut q_text: Query<&mut Text>,
) {
    for (entity, mut field, children) in &mut fields {
        if field.editing && input_focus.get() != Some(entity) {
            field.editing = false;
            show(children, &mut q_text, field.value.clone());
        }
    }
}

fn text_field_on_keyboard_input(
    trigger: On<FocusedInput<KeyboardInput>>,
    mut fields: Query<(&mut TextField, &Children)>,
    mut q_text: Query<&mut Text>,
    mut input_focus: ResMut<InputFocus>,
    mut commands: Commands,
) {
    if trigger.input.state != ButtonState::Pressed {
        return;
    }
    let entity = trigger.focused_entity;
    let Ok((mut field, children)) = fields.get_mut(entity) else {
        return;
    };
    if !field.editing {
        return;
    }

    let changed = match &trigger.input.logical_key {
        Key::Enter => {
            field.editing = false;
            input_focus.clear();
            false
        }
        Key::Escape => {
            field.editing = false;
            field.value = field.original.clone();
            input_focus.clear();
            true
        }
        Key::Backspace => field.value.pop().is_some(),
        Key::Space => {
            field.value.push(' ');
            true
        }
        Key::Character(c) if !c.chars().any(char::is_control) => {
            field.value.push_str(c);
            true
        }
        _ => false,
    };

    let label = if field.editing {
        format!("{}|", field.value)
    } else {
        field.value.clone()
    };
    show(children, &mut q_text, label);

    if changed {
        commands.trigger(TextFieldChanged {
            source: entity,
            value: field.value.clone(),
        });
    }
}

/// Plugin that adds the TextField widget observers.
pub struct TextFieldPlugin;

impl Plugin for TextFieldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InputFocus>()
            .add_observer(text_field_on_click)
            .add_observer(text_field_on_keyboard_input)
            .add_systems(
                PreUpdate,
                end_edits_on_focus_loss.run_if(resource_changed::<InputFocus>),
            );
    }
}
