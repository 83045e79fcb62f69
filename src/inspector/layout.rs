//! Small UI building blocks shared by the header, slots and sub-inspectors.

use bevy::prelude::*;
use bevy::ui::Val::*;

use crate::inspector::config::InspectorConfig;

/// A horizontal row of widgets.
pub fn row(config: &InspectorConfig) -> impl Bundle {
    Node {
        width: Percent(100.0),
        display: Display::Flex,
        flex_direction: FlexDirection::Row,
        align_items: AlignItems::Center,
        column_gap: config.column_gap,
        ..default()
    }
}

/// A vertical stack of rows.
pub fn column(config: &InspectorConfig) -> impl Bundle {
    Node {
        width: Percent(100.0),
        display: Display::Flex,
        flex_direction: FlexDirection::Column,
        row_gap: config.item_gap,
        ..default()
    }
}

/// Fixed-width caption at the start of a header row.
pub fn caption(text: &str, config: &InspectorConfig) -> impl Bundle {
    (
        Text::new(text),
        TextFont {
            font_size: config.body_font_size,
            ..default()
        },
        TextColor(Color::srgba(0.9, 0.9, 0.9, 1.0)),
        Node {
            width: config.label_width,
            flex_shrink: 0.0,
            ..default()
        },
    )
}

/// Plain small text.
pub fn small_text(text: impl Into<String>, color: Color, config: &InspectorConfig) -> impl Bundle {
    (
        Text::new(text),
        TextFont {
            font_size: config.small_font_size,
            ..default()
        },
        TextColor(color),
    )
}

/// Node that absorbs the remaining space along its parent's main axis.
pub fn flexible_space() -> impl Bundle {
    Node {
        flex_grow: 1.0,
        ..default()
    }
}

/// Despawns every child of `parent`, keeping `parent` itself.
pub fn despawn_children(world: &mut World, parent: Entity) {
    let children: Vec<Entity> = world
        .get::<Children>(parent)
        .map(|c| c.iter().collect())
        .unwrap_or_default();
    for child in children {
        despawn(world, child);
    }
}

/// Despawns `entity` and its descendants if it still exists.
pub fn despawn(world: &mut World, entity: Entity) {
    if let Ok(entity_mut) = world.get_entity_mut(entity) {
        entity_mut.despawn();
    }
}

/// Replaces the string of a [`Text`] entity. Unchanged text is left alone so
/// change detection and text layout stay quiet.
pub fn set_text(world: &mut World, entity: Entity, value: impl Into<String>) {
    if let Some(mut text) = world.get_mut::<Text>(entity) {
        let value = value.into();
        if text.0 != value {
            text.0 = value;
        }
    }
}

/// Shows or hides a node without despawning it.
pub fn set_displayed(world: &mut World, entity: Entity, displayed: bool) {
    if let Some(mut node) = world.get_mut::<Node>(entity) {
        node.display = if displayed {
            Display::Flex
        } else {
            Display::None
        };
    }
}

/// Returns whether a node is laid out.
pub fn is_displayed(world: &World, entity: Entity) -> bool {
    world
        .get::<Node>(entity)
        .is_some_and(|node| node.display != Display::None)
}
