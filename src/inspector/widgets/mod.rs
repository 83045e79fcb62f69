//! Inspector UI widgets.
//!
//! Provides editable value widgets for the inspector, including:
//! - DragValue: A draggable number input (like ImGui's DragFloat)
//!   - Drag horizontally to change value
//!   - Double-click to enter text input mode
//! - TextField: A single-line text input used for the object name

pub mod drag_value;
pub mod text_field;

pub use drag_value::{
    drag_value, drag_value_display, set_drag_value_display, DragValue, DragValueChanged,
    DragValueDragState, DragValueEditModeChanged, DragValuePlugin, DragValueProps, FieldBinding,
    FieldPath, FieldPathSegment,
};
pub use text_field::{
    set_text_field_value, text_field, text_field_value, TextField, TextFieldChanged,
    TextFieldPlugin,
};
