//! Human-readable labels for tuple struct fields.
//!
//! Tuple struct fields are only known by index. Types registered here show
//! "x", "y", "z" instead of ".0", ".1", ".2".

use bevy::math::{DVec2, DVec3, DVec4, Vec3A};
use bevy::platform::collections::HashMap;
use bevy::prelude::*;
use core::any::TypeId;

const XY: &[&str] = &["x", "y"];
const XYZ: &[&str] = &["x", "y", "z"];
const XYZW: &[&str] = &["x", "y", "z", "w"];

/// Registry of tuple field labels, keyed by type.
#[derive(Resource)]
pub struct FieldLabels {
    overrides: HashMap<TypeId, &'static [&'static str]>,
}

impl Default for FieldLabels {
    fn default() -> Self {
        let mut labels = Self {
            overrides: HashMap::default(),
        };
        labels
            .register::<Vec2>(XY)
            .register::<IVec2>(XY)
            .register::<UVec2>(XY)
            .register::<DVec2>(XY)
            .register::<Vec3>(XYZ)
            .register::<Vec3A>(XYZ)
            .register::<IVec3>(XYZ)
            .register::<UVec3>(XYZ)
            .register::<DVec3>(XYZ)
            .register::<Vec4>(XYZW)
            .register::<IVec4>(XYZW)
            .register::<UVec4>(XYZW)
            .register::<DVec4>(XYZW)
            .register::<Quat>(XYZW);
        labels
    }
}

impl FieldLabels {
    /// Sets the labels for the fields of `T`, in field order.
    pub fn register<T: 'static>(&mut self, names: &'static [&'static str]) -> &mut Self {
        self.overrides.insert(TypeId::of::<T>(), names);
        self
    }

    /// Label for field `index` of `type_id`, falling back to ".{index}".
    pub fn label(&self, type_id: Option<TypeId>, index: usize) -> String {
        type_id
            .and_then(|id| self.overrides.get(&id))
            .and_then(|names| names.get(index))
            .map(|name| name.to_string())
            .unwrap_or_else(|| format!(".{index}"))
    }
}
