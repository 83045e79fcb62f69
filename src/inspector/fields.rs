//! Transform field adapter.
//!
//! Translates between an entity's transform and the nine header fields. Reads
//! go engine to field on every refresh; writes go field to engine, one axis at a
//! time, only when the user edits a field. The coordinate mode is always passed
//! in rather than read here.

use bevy::math::EulerRot;
use bevy::prelude::*;

use crate::inspector::state::CoordinateMode;

/// Euler order used to present rotations.
const EULER_ORDER: EulerRot = EulerRot::XYZ;

/// Which transform vector a header field edits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Reflect)]
pub enum TransformProperty {
    Position,
    Rotation,
    Scale,
}

impl TransformProperty {
    pub const ALL: [TransformProperty; 3] = [Self::Position, Self::Rotation, Self::Scale];

    pub fn label(self) -> &'static str {
        match self {
            Self::Position => "Position",
            Self::Rotation => "Rotation",
            Self::Scale => "Scale",
        }
    }
}

/// A vector component.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Reflect)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Self::X, Self::Y, Self::Z];

    pub fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::X => "X",
            Self::Y => "Y",
            Self::Z => "Z",
        }
    }
}

/// Values shown by the transform fields. Rotation is in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformFields {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl TransformFields {
    pub fn get(&self, property: TransformProperty) -> Vec3 {
        match property {
            TransformProperty::Position => self.position,
            TransformProperty::Rotation => self.rotation,
            TransformProperty::Scale => self.scale,
        }
    }
}

/// Converts a rotation to Euler angles in degrees.
pub fn quat_to_degrees(rotation: Quat) -> Vec3 {
    let (x, y, z) = rotation.to_euler(EULER_ORDER);
    Vec3::new(x.to_degrees(), y.to_degrees(), z.to_degrees())
}

/// Converts Euler angles in degrees to a rotation.
pub fn degrees_to_quat(angles: Vec3) -> Quat {
    Quat::from_euler(
        EULER_ORDER,
        angles.x.to_radians(),
        angles.y.to_radians(),
        angles.z.to_radians(),
    )
}

/// Computes the field values for `local`, whose parent sits at `parent`.
///
/// Scale is always local.
pub fn read_transform_fields(
    mode: CoordinateMode,
    local: &Transform,
    parent: &GlobalTransform,
) -> TransformFields {
    let (position, rotation) = match mode {
        CoordinateMode::World => (
            parent.transform_point(local.translation),
            parent.rotation() * local.rotation,
        ),
        CoordinateMode::Local => (local.translation, local.rotation),
    };
    TransformFields {
        position,
        rotation: quat_to_degrees(rotation),
        scale: local.scale,
    }
}

/// Writes one axis of one property into `local`, leaving the other axes as they
/// are in the chosen frame.
///
/// World-frame position and rotation edits need an invertible parent. Under a
/// parent with a zero scale axis nothing is written and `false` is returned.
pub fn write_transform_axis(
    mode: CoordinateMode,
    property: TransformProperty,
    axis: Axis,
    value: f32,
    local: &mut Transform,
    parent: &GlobalTransform,
) -> bool {
    let index = axis.index();
    if mode == CoordinateMode::World
        && property != TransformProperty::Scale
        && !is_invertible(parent)
    {
        return false;
    }
    match (property, mode) {
        (TransformProperty::Position, CoordinateMode::World) => {
            let mut position = parent.transform_point(local.translation);
            position[index] = value;
            local.translation = parent.affine().inverse().transform_point3(position);
        }
        (TransformProperty::Position, CoordinateMode::Local) => {
            local.translation[index] = value;
        }
        (TransformProperty::Rotation, CoordinateMode::World) => {
            let parent_rotation = parent.rotation();
            let mut angles = quat_to_degrees(parent_rotation * local.rotation);
            angles[index] = value;
            local.rotation = parent_rotation.inverse() * degrees_to_quat(angles);
        }
        (TransformProperty::Rotation, CoordinateMode::Local) => {
            let mut angles = quat_to_degrees(local.rotation);
            angles[index] = value;
            local.rotation = degrees_to_quat(angles);
        }
        (TransformProperty::Scale, _) => {
            local.scale[index] = value;
        }
    }
    true
}

fn is_invertible(transform: &GlobalTransform) -> bool {
    let determinant = transform.affine().matrix3.determinant();
    determinant.is_finite() && determinant != 0.0
}

/// Global transform of `entity`'s parent, identity for roots.
pub fn parent_global_transform(world: &World, entity: Entity) -> GlobalTransform {
    world
        .get::<ChildOf>(entity)
        .and_then(|child_of| world.get::<GlobalTransform>(child_of.parent()))
        .copied()
        .unwrap_or(GlobalTransform::IDENTITY)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn assert_vec_eq(a: Vec3, b: Vec3) {
        assert!((a - b).length() < EPSILON, "{a:?} != {b:?}");
    }

    fn offset_parent() -> GlobalTransform {
        GlobalTransform::from(Transform::from_xyz(10.0, 0.0, 0.0))
    }

    #[test]
    fn mode_changes_displayed_position_not_the_transform() {
        let local = Transform::from_xyz(1.0, 2.0, 3.0);
        let parent = offset_parent();

        let world = read_transform_fields(CoordinateMode::World, &local, &parent);
        let local_fields = read_transform_fields(CoordinateMode::Local, &local, &parent);

        assert_vec_eq(world.position, Vec3::new(11.0, 2.0, 3.0));
        assert_vec_eq(local_fields.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(local, Transform::from_xyz(1.0, 2.0, 3.0));
    }

    #[test]
    fn mode_changes_displayed_rotation() {
        let local = Transform::from_rotation(Quat::from_rotation_z(30f32.to_radians()));
        let parent = GlobalTransform::from(Transform::from_rotation(Quat::from_rotation_z(
            15f32.to_radians(),
        )));

        let world = read_transform_fields(CoordinateMode::World, &local, &parent);
        let local_fields = read_transform_fields(CoordinateMode::Local, &local, &parent);

        assert!((world.rotation.z - 45.0).abs() < EPSILON);
        assert!((local_fields.rotation.z - 30.0).abs() < EPSILON);
    }

    #[test]
    fn scale_is_always_local() {
        let local = Transform::from_scale(Vec3::new(2.0, 3.0, 4.0));
        let parent = GlobalTransform::from(Transform::from_scale(Vec3::splat(10.0)));
        let fields = read_transform_fields(CoordinateMode::World, &local, &parent);
        assert_vec_eq(fields.scale, Vec3::new(2.0, 3.0, 4.0));
    }

    #[test]
    fn editing_one_position_axis_keeps_the_others() {
        let parent = offset_parent();
        for mode in [CoordinateMode::World, CoordinateMode::Local] {
            let mut local = Transform::from_xyz(1.0, 2.0, 3.0);
            write_transform_axis(mode, TransformProperty::Position, Axis::Y, 7.0, &mut local, &parent);
            let fields = read_transform_fields(mode, &local, &parent);
            assert!((fields.position.y - 7.0).abs() < EPSILON);
            assert!((local.translation.z - 3.0).abs() < EPSILON);
        }

        let mut local = Transform::from_xyz(1.0, 2.0, 3.0);
        write_transform_axis(
            CoordinateMode::World,
            TransformProperty::Position,
            Axis::X,
            20.0,
            &mut local,
            &parent,
        );
        assert_vec_eq(local.translation, Vec3::new(10.0, 2.0, 3.0));
    }

    #[test]
    fn editing_one_rotation_axis_keeps_the_others() {
        let parent = GlobalTransform::IDENTITY;
        let mut local = Transform::from_rotation(degrees_to_quat(Vec3::new(10.0, 20.0, 30.0)));
        write_transform_axis(
            CoordinateMode::Local,
            TransformProperty::Rotation,
            Axis::Y,
            -5.0,
            &mut local,
            &parent,
        );
        assert_vec_eq(quat_to_degrees(local.rotation), Vec3::new(10.0, -5.0, 30.0));
    }

    #[test]
    fn world_rotation_edit_accounts_for_parent() {
        let parent = GlobalTransform::from(Transform::from_rotation(Quat::from_rotation_z(
            15f32.to_radians(),
        )));
        let mut local = Transform::IDENTITY;
        write_transform_axis(
            CoordinateMode::World,
            TransformProperty::Rotation,
            Axis::Z,
            40.0,
            &mut local,
            &parent,
        );
        assert!((quat_to_degrees(local.rotation).z - 25.0).abs() < EPSILON);
    }

    #[test]
    fn each_scale_axis_is_independent() {
        let parent = GlobalTransform::IDENTITY;
        for axis in Axis::ALL {
            let mut local = Transform::from_scale(Vec3::new(1.0, 2.0, 3.0));
            write_transform_axis(CoordinateMode::World, TransformProperty::Scale, axis, 9.0, &mut local, &parent);
            let mut expected = Vec3::new(1.0, 2.0, 3.0);
            expected[axis.index()] = 9.0;
            assert_vec_eq(local.scale, expected);
        }
    }

    #[test]
    fn world_edits_under_a_flattened_parent_are_refused() {
        let parent = GlobalTransform::from(Transform::from_scale(Vec3::new(0.0, 1.0, 1.0)));
        let mut local = Transform::from_xyz(1.0, 2.0, 3.0);
        let before = local;

        for property in [TransformProperty::Position, TransformProperty::Rotation] {
            assert!(!write_transform_axis(
                CoordinateMode::World,
                property,
                Axis::Y,
                5.0,
                &mut local,
                &parent,
            ));
        }
        assert_eq!(local, before);

        assert!(write_transform_axis(
            CoordinateMode::Local,
            TransformProperty::Position,
            Axis::Y,
            5.0,
            &mut local,
            &parent,
        ));
        assert_vec_eq(local.translation, Vec3::new(1.0, 5.0, 3.0));
        assert!(local.translation.is_finite());
    }

    #[test]
    fn roots_use_identity_parent() {
        let mut world = World::new();
        let root = world.spawn(Transform::from_xyz(1.0, 0.0, 0.0)).id();
        assert_eq!(parent_global_transform(&world, root), GlobalTransform::IDENTITY);
    }
}
