//! One collapsible section per inspected component.

use bevy::feathers::controls::{button, ButtonProps};
use bevy::prelude::*;
use bevy::ui::Val::*;
use bevy::ui_widgets::{observe, Activate};

use crate::inspector::config::InspectorConfig;
use crate::inspector::layout::{self, column};
use crate::inspector::state::{InspectorAction, PendingInspectorActions};
use crate::inspector::sub_inspector::{InspectedComponent, SubInspector};

/// Identifies a slot. Never reused, so events from despawned widgets cannot
/// reach a slot built later.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Reflect)]
pub struct SlotId(pub u32);

/// The collapsible header button of a slot.
#[derive(Component, Debug)]
pub struct SlotFoldout {
    pub slot: SlotId,
    pub expanded: bool,
}

/// Region holding a slot's sub-inspector.
#[derive(Component, Debug)]
pub struct SlotContent(pub SlotId);

/// A component section: foldout header, content region and sub-inspector.
pub struct InspectorSlot {
    pub(crate) id: SlotId,
    pub(crate) component: InspectedComponent,
    pub(crate) foldout: Entity,
    pub(crate) content: Entity,
    pub(crate) sub_inspector: Box<dyn SubInspector>,
    pub(crate) expanded: bool,
}

impl InspectorSlot {
    pub fn id(&self) -> SlotId {
        self.id
    }

    /// The component this slot edits.
    pub fn component(&self) -> &InspectedComponent {
        &self.component
    }

    pub fn foldout(&self) -> Entity {
        self.foldout
    }

    pub fn content(&self) -> Entity {
        self.content
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }
}

fn foldout_caption(name: &str, expanded: bool) -> String {
    let marker = if expanded { "-" } else { "+" };
    format!("{marker} {name}")
}

/// Spawns the foldout button and the content region of a slot under `parent`.
/// Returns `(foldout, content)`.
pub(crate) fn spawn_slot_widgets(
    world: &mut World,
    parent: Entity,
    slot: SlotId,
    name: &str,
    config: &InspectorConfig,
) -> (Entity, Entity) {
    let foldout = world
        .spawn((
            button(
                ButtonProps::default(),
                SlotFoldout {
                    slot,
                    expanded: true,
                },
                Spawn((
                    Text::new(foldout_caption(name, true)),
                    TextFont {
                        font_size: config.body_font_size,
                        ..default()
                    },
                    TextColor(Color::srgba(0.9, 0.9, 0.9, 1.0)),
                )),
            ),
            observe(on_foldout_click),
            ChildOf(parent),
        ))
        .id();

    let content = world
        .spawn((column(config), SlotContent(slot), ChildOf(parent)))
        .id();
    if let Some(mut node) = world.get_mut::<Node>(content) {
        node.padding = UiRect::new(Px(config.indent_step), Px(0.0), Px(2.0), Px(6.0));
    }
    (foldout, content)
}

/// Updates the foldout's state and caption.
pub(crate) fn set_foldout_expanded(world: &mut World, foldout: Entity, name: &str, expanded: bool) {
    if let Some(mut state) = world.get_mut::<SlotFoldout>(foldout) {
        state.expanded = expanded;
    }
    let children: Vec<Entity> = world
        .get::<Children>(foldout)
        .map(|c| c.iter().collect())
        .unwrap_or_default();
    for child in children {
        layout::set_text(world, child, foldout_caption(name, expanded));
    }
}

/// Observer for foldout clicks: queues the opposite of the current state.
fn on_foldout_click(
    activate: On<Activate>,
    foldouts: Query<&SlotFoldout>,
    mut pending: ResMut<PendingInspectorActions>,
) {
    if let Ok(foldout) = foldouts.get(activate.entity) {
        pending.push(InspectorAction::ToggleSlot {
            slot: foldout.slot,
            expanded: !foldout.expanded,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caption_reflects_state() {
        assert_eq!(foldout_caption("Transform", true), "- Transform");
        assert_eq!(foldout_caption("Transform", false), "+ Transform");
    }

    #[test]
    fn foldout_state_and_caption_update_together() {
        let mut world = World::new();
        let config = InspectorConfig::default();
        let parent = world.spawn(Node::default()).id();
        let (foldout, content) = spawn_slot_widgets(&mut world, parent, SlotId(3), "Sprite", &config);

        assert_eq!(world.get::<SlotContent>(content).map(|c| c.0), Some(SlotId(3)));

        set_foldout_expanded(&mut world, foldout, "Sprite", false);
        assert!(!world.get::<SlotFoldout>(foldout).unwrap().expanded);
        let caption = world
            .get::<Children>(foldout)
            .unwrap()
            .iter()
            .find_map(|child| world.get::<Text>(child).map(|t| t.0.clone()));
        assert_eq!(caption.as_deref(), Some("+ Sprite"));
    }
}
