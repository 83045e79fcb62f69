//! Reflection-driven sub-inspector used for every component without a custom one.

use bevy::prelude::*;
use bevy::reflect::{ReflectMut, ReflectRef, VariantType};
use bevy::ui::Val::*;
use core::any::TypeId;

use super::{FieldLabels, InspectedComponent, SubInspector};
use crate::inspector::config::InspectorConfig;
use crate::inspector::layout::{self, column, row, small_text};
use crate::inspector::widgets::{
    drag_value, set_drag_value_display, DragValueProps, FieldBinding, FieldPath, FieldPathSegment,
};
use crate::reflection_tools::{with_reflected_component, ReflectionError};

/// Represents a field extracted from a reflected component
struct ReflectedField {
    name: String,
    value: String,
    indent: u8,
    /// If this is an editable numeric field, contains the numeric value and path segments
    editable: Option<EditableField>,
}

struct EditableField {
    value: f64,
    /// Path segments to reach this field from the component root
    path: Vec<FieldPathSegment>,
}

/// Identity of a row. Rows are rebuilt when the sequence of keys changes.
#[derive(Clone, PartialEq, Eq, Debug)]
struct RowKey {
    name: String,
    indent: u8,
    editable: bool,
}

impl From<&ReflectedField> for RowKey {
    fn from(field: &ReflectedField) -> Self {
        Self {
            name: field.name.clone(),
            indent: field.indent,
            editable: field.editable.is_some(),
        }
    }
}

struct FieldRow {
    /// DragValue for editable fields, Text otherwise.
    value_widget: Entity,
    editable: bool,
}

/// Lists a component's reflected fields, numeric leaves as drag values.
#[derive(Default)]
pub struct GenericInspector {
    component: Option<InspectedComponent>,
    root: Option<Entity>,
    rows: Vec<FieldRow>,
    layout: Vec<RowKey>,
    /// Whether the "<no reflected data>" placeholder is shown.
    placeholder: bool,
}

impl GenericInspector {
    /// Root node of the editor, once initialized.
    pub fn root(&self) -> Option<Entity> {
        self.root
    }

    /// Number of field rows currently shown.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn read_fields(&self, world: &World) -> Option<Vec<ReflectedField>> {
        let component = self.component.as_ref()?;
        let type_id = component.type_id?;

        let fallback;
        let labels = match world.get_resource::<FieldLabels>() {
            Some(labels) => labels,
            None => {
                fallback = FieldLabels::default();
                &fallback
            }
        };

        let result = with_reflected_component(world, component.entity, type_id, |reflected| {
            let mut fields = Vec::new();
            extract_fields(reflected, &mut fields, 0, labels, &[]);
            fields
        });
        match result {
            Ok(fields) => Some(fields),
            Err(ReflectionError::NotReflected(_)) => None,
            Err(err) => {
                debug!("Cannot read {}: {}", component.name, err);
                None
            }
        }
    }

    fn build_rows(&mut self, world: &mut World, fields: Option<Vec<ReflectedField>>) {
        let Some(root) = self.root else {
            return;
        };
        let config = world
            .get_resource::<InspectorConfig>()
            .cloned()
            .unwrap_or_default();

        layout::despawn_children(world, root);
        self.rows.clear();
        self.layout.clear();

        let fields = fields.unwrap_or_default();
        self.placeholder = fields.is_empty();
        if self.placeholder {
            world.spawn((
                small_text("<no reflected data>", config.muted_text_color, &config),
                ChildOf(root),
            ));
            return;
        }

        let (entity, type_id) = match &self.component {
            Some(InspectedComponent {
                entity,
                type_id: Some(type_id),
                ..
            }) => (*entity, *type_id),
            _ => return,
        };

        for field in &fields {
            let row_entity = world
                .spawn((
                    row(&config),
                    ChildOf(root),
                ))
                .id();
            if let Some(mut node) = world.get_mut::<Node>(row_entity) {
                node.margin = UiRect::left(Px(field.indent as f32 * config.indent_step));
            }
            world.spawn((
                small_text(format!("{}:", field.name), config.field_name_color, &config),
                ChildOf(row_entity),
            ));

            let value_widget = match &field.editable {
                Some(editable) => world
                    .spawn((
                        drag_value(
                            DragValueProps {
                                binding: FieldBinding::Component(FieldPath {
                                    entity,
                                    component_type_id: type_id,
                                    path: editable.path.clone(),
                                }),
                                value: editable.value,
                                drag_speed: config.component_drag_speed,
                                precision: config.precision,
                                min: None,
                                max: None,
                            },
                            &config,
                        ),
                        ChildOf(row_entity),
                    ))
                    .id(),
                None => world
                    .spawn((
                        small_text(field.value.clone(), config.muted_text_color, &config),
                        ChildOf(row_entity),
                    ))
                    .id(),
            };
            self.rows.push(FieldRow {
                value_widget,
                editable: field.editable.is_some(),
            });
            self.layout.push(RowKey::from(field));
        }
    }
}

impl SubInspector for GenericInspector {
    fn initialize(&mut self, world: &mut World, content: Entity, component: InspectedComponent) {
        let config = world
            .get_resource::<InspectorConfig>()
            .cloned()
            .unwrap_or_default();
        self.root = Some(world.spawn((column(&config), ChildOf(content))).id());
        self.component = Some(component);
        let fields = self.read_fields(world);
        self.build_rows(world, fields);
    }

    fn refresh(&mut self, world: &mut World) {
        if self.root.is_none() {
            return;
        }
        let fields = self.read_fields(world);
        let keys: Vec<RowKey> = fields
            .iter()
            .flatten()
            .map(RowKey::from)
            .collect();
        let shape_changed = keys != self.layout || (keys.is_empty() != self.placeholder);
        if shape_changed {
            self.build_rows(world, fields);
            return;
        }

        for (row, field) in self.rows.iter().zip(fields.iter().flatten()) {
            match (&field.editable, row.editable) {
                (Some(editable), true) => {
                    set_drag_value_display(world, row.value_widget, editable.value);
                }
                _ => layout::set_text(world, row.value_widget, field.value.clone()),
            }
        }
    }

    fn set_visible(&mut self, world: &mut World, visible: bool) {
        if let Some(root) = self.root {
            layout::set_displayed(world, root, visible);
        }
    }

    fn destroy(&mut self, world: &mut World) {
        if let Some(root) = self.root.take() {
            layout::despawn(world, root);
        }
        self.rows.clear();
        self.layout.clear();
        self.component = None;
    }
}

/// Extracts fields from a reflected value into a flat list of label/value pairs.
/// Tracks the path to each field for write-back support.
fn extract_fields(
    reflected: &dyn PartialReflect,
    fields: &mut Vec<ReflectedField>,
    indent: u8,
    labels: &FieldLabels,
    current_path: &[FieldPathSegment],
) {
    let type_id = reflected
        .get_represented_type_info()
        .map(|info| info.type_id());

    match reflected.reflect_ref() {
        ReflectRef::Struct(s) => {
            for i in 0..s.field_len() {
                let (Some(name), Some(value)) = (s.name_at(i), s.field_at(i)) else {
                    continue;
                };
                push_field(
                    fields,
                    name.to_string(),
                    value,
                    indent,
                    labels,
                    current_path,
                    FieldPathSegment::Named(name.to_string()),
                );
            }
        }
        ReflectRef::TupleStruct(ts) => {
            for i in 0..ts.field_len() {
                let Some(value) = ts.field(i) else {
                    continue;
                };
                push_field(
                    fields,
                    labels.label(type_id, i),
                    value,
                    indent,
                    labels,
                    current_path,
                    FieldPathSegment::Index(i),
                );
            }
        }
        ReflectRef::Enum(e) => {
            fields.push(ReflectedField {
                name: "variant".to_string(),
                value: e.variant_name().to_string(),
                indent,
                editable: None,
            });
            // Enum payloads are displayed but not editable.
            for i in 0..e.field_len() {
                let Some(value) = e.field_at(i) else {
                    continue;
                };
                let name = match e.variant_type() {
                    VariantType::Struct => e.name_at(i).unwrap_or("?").to_string(),
                    _ => format!(".{i}"),
                };
                if let Some(text) = format_simple_value(value) {
                    fields.push(ReflectedField {
                        name,
                        value: text,
                        indent: indent + 1,
                        editable: None,
                    });
                }
            }
        }
        _ => {
            if let Some(text) = format_simple_value(reflected) {
                fields.push(ReflectedField {
                    name: "value".to_string(),
                    value: text,
                    indent,
                    editable: try_extract_numeric(reflected).map(|value| EditableField {
                        value,
                        path: current_path.to_vec(),
                    }),
                });
            }
        }
    }
}

/// Pushes one struct or tuple-struct field, recursing into complex values.
fn push_field(
    fields: &mut Vec<ReflectedField>,
    name: String,
    value: &dyn PartialReflect,
    indent: u8,
    labels: &FieldLabels,
    current_path: &[FieldPathSegment],
    segment: FieldPathSegment,
) {
    let mut path = current_path.to_vec();
    path.push(segment);

    if let Some(text) = format_simple_value(value) {
        let editable = try_extract_numeric(value).map(|number| EditableField {
            value: number,
            path,
        });
        fields.push(ReflectedField {
            name,
            value: text,
            indent,
            editable,
        });
        return;
    }

    // Complex nested type - add header and recurse
    let type_name = value
        .get_represented_type_info()
        .map(|t| ShortName::from(t.type_path()).to_string())
        .unwrap_or_else(|| "?".to_string());
    fields.push(ReflectedField {
        name,
        value: format!("[{type_name}]"),
        indent,
        editable: None,
    });
    extract_fields(value, fields, indent + 1, labels, &path);
}

/// Returns the value as f64 if it's a supported numeric type.
fn try_extract_numeric(reflected: &dyn PartialReflect) -> Option<f64> {
    if let Some(val) = reflected.try_downcast_ref::<f32>() {
        return Some(*val as f64);
    }
    if let Some(val) = reflected.try_downcast_ref::<f64>() {
        return Some(*val);
    }
    if let Some(val) = reflected.try_downcast_ref::<i32>() {
        return Some(*val as f64);
    }
    if let Some(val) = reflected.try_downcast_ref::<i64>() {
        return Some(*val as f64);
    }
    if let Some(val) = reflected.try_downcast_ref::<u32>() {
        return Some(*val as f64);
    }
    if let Some(val) = reflected.try_downcast_ref::<u64>() {
        return Some(*val as f64);
    }
    None
}

/// Formats a leaf value, returns None for types that need their own rows.
fn format_simple_value(reflected: &dyn PartialReflect) -> Option<String> {
    match reflected.reflect_ref() {
        ReflectRef::Struct(_) | ReflectRef::TupleStruct(_) | ReflectRef::Enum(_) => None,
        ReflectRef::Tuple(t) => {
            if t.field_len() > 4 {
                return None;
            }
            let parts: Option<Vec<String>> = (0..t.field_len())
                .map(|i| t.field(i).and_then(format_simple_value))
                .collect();
            parts.map(|parts| format!("({})", parts.join(", ")))
        }
        ReflectRef::List(l) => Some(format!("[{} items]", l.len())),
        ReflectRef::Array(a) => Some(format!("[{} items]", a.len())),
        ReflectRef::Map(m) => Some(format!("{{{} entries}}", m.len())),
        ReflectRef::Set(s) => Some(format!("{{{} items}}", s.len())),
        ReflectRef::Opaque(o) => Some(format!("{:?}", o)),
    }
}

/// Navigates a field path and sets the numeric leaf using reflection.
/// Returns true on success.
pub(crate) fn set_field_value(
    reflected: &mut dyn PartialReflect,
    path: &[FieldPathSegment],
    new_value: f64,
) -> bool {
    let Some((segment, remaining)) = path.split_first() else {
        return apply_numeric(reflected, new_value);
    };

    let field = match (reflected.reflect_mut(), segment) {
        (ReflectMut::Struct(s), FieldPathSegment::Named(name)) => s.field_mut(name),
        (ReflectMut::TupleStruct(ts), FieldPathSegment::Index(idx)) => {
            ts.field_mut(*idx)
        }
        (ReflectMut::Tuple(t), FieldPathSegment::Index(idx)) => t.field_mut(*idx),
        _ => None,
    };
    field.is_some_and(|field| set_field_value(field, remaining, new_value))
}

fn apply_numeric(reflected: &mut dyn PartialReflect, new_value: f64) -> bool {
    if let Some(v) = reflected.try_downcast_mut::<f32>() {
        *v = new_value as f32;
    } else if let Some(v) = reflected.try_downcast_mut::<f64>() {
        *v = new_value;
    } else if let Some(v) = reflected.try_downcast_mut::<i32>() {
        *v = new_value as i32;
    } else if let Some(v) = reflected.try_downcast_mut::<i64>() {
        *v = new_value as i64;
    } else if let Some(v) = reflected.try_downcast_mut::<u32>() {
        *v = new_value.max(0.0) as u32;
    } else if let Some(v) = reflected.try_downcast_mut::<u64>() {
        *v = new_value.max(0.0) as u64;
    } else {
        return false;
    }
    true
}
