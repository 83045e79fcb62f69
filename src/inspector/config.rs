//! Configuration constants for the inspector UI.

use bevy::prelude::*;
use bevy::ui::Val;

/// Configuration for inspector UI layout, styling and field behavior.
#[derive(Resource, Clone)]
pub struct InspectorConfig {
    // Layout
    /// Height of the title bar.
    pub title_bar_height: Val,
    /// Width of the caption column in the header rows ("Name", "Position", ...).
    pub label_width: Val,
    /// Minimum width of a numeric field.
    pub field_min_width: Val,
    /// Width of the scrollbar next to the inspector content.
    pub scrollbar_width: f32,

    // Spacing
    /// Padding inside panels.
    pub panel_padding: UiRect,
    /// Gap between stacked rows.
    pub item_gap: Val,
    /// Gap between fields on one row.
    pub column_gap: Val,
    /// Indentation per nesting level in component fields.
    pub indent_step: f32,

    // Typography
    /// Font size for titles.
    pub title_font_size: f32,
    /// Font size for body text.
    pub body_font_size: f32,
    /// Font size for small/secondary text.
    pub small_font_size: f32,

    // Colors (for non-themed elements)
    /// Border color.
    pub border_color: Color,
    /// Muted text color.
    pub muted_text_color: Color,
    /// Field caption color.
    pub field_name_color: Color,
    /// Editable value color.
    pub editable_text_color: Color,
    /// Background of input fields.
    pub field_background: Color,

    // Fields
    /// Drag speed of position and scale fields (units per pixel).
    pub transform_drag_speed: f64,
    /// Drag speed of rotation fields (degrees per pixel).
    pub rotation_drag_speed: f64,
    /// Drag speed of numeric component fields.
    pub component_drag_speed: f64,
    /// Decimal places shown in numeric fields.
    pub precision: usize,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            // Layout
            title_bar_height: Val::Px(40.0),
            label_width: Val::Px(70.0),
            field_min_width: Val::Px(50.0),
            scrollbar_width: 8.0,

            // Spacing
            panel_padding: UiRect::all(Val::Px(8.0)),
            item_gap: Val::Px(4.0),
            column_gap: Val::Px(10.0),
            indent_step: 12.0,

            // Typography
            title_font_size: 16.0,
            body_font_size: 13.0,
            small_font_size: 11.0,

            // Colors
            border_color: Color::srgba(0.3, 0.3, 0.3, 1.0),
            muted_text_color: Color::srgba(0.6, 0.6, 0.6, 1.0),
            field_name_color: Color::srgba(0.6, 0.8, 1.0, 1.0),
            editable_text_color: Color::srgba(0.9, 0.9, 0.6, 1.0),
            field_background: Color::srgba(0.15, 0.15, 0.15, 1.0),

            // Fields
            transform_drag_speed: 0.1,
            rotation_drag_speed: 1.0,
            component_drag_speed: 0.1,
            precision: 2,
        }
    }
}
