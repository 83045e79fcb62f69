//! Helpers for reaching a component through `ReflectComponent`.

use bevy::ecs::reflect::{AppTypeRegistry, ReflectComponent};
use bevy::prelude::*;
use core::any::TypeId;
use thiserror::Error;

/// Reasons a component could not be accessed through reflection.
#[derive(Debug, Error)]
pub enum ReflectionError {
    #[error("entity {0} does not exist")]
    NoSuchEntity(Entity),
    #[error("the world has no AppTypeRegistry resource")]
    NoTypeRegistry,
    #[error("type {0:?} is not registered with #[reflect(Component)]")]
    NotReflected(TypeId),
    #[error("entity {entity} has no component of type {type_id:?}")]
    MissingComponent { entity: Entity, type_id: TypeId },
}

/// Calls `f` with a read-only reflected view of the component `type_id` on `entity`.
pub fn with_reflected_component<R>(
    world: &World,
    entity: Entity,
    type_id: TypeId,
    f: impl FnOnce(&dyn PartialReflect) -> R,
) -> Result<R, ReflectionError> {
    let registry = world
        .get_resource::<AppTypeRegistry>()
        .ok_or(ReflectionError::NoTypeRegistry)?
        .read();
    let reflect_component = registry
        .get_type_data::<ReflectComponent>(type_id)
        .ok_or(ReflectionError::NotReflected(type_id))?;
    let entity_ref = world
        .get_entity(entity)
        .map_err(|_| ReflectionError::NoSuchEntity(entity))?;
    let reflected = reflect_component
        .reflect(entity_ref)
        .ok_or(ReflectionError::MissingComponent { entity, type_id })?;
    Ok(f(reflected.as_partial_reflect()))
}

/// Calls `f` with a mutable reflected view of the component `type_id` on `entity`.
///
/// Change detection fires for the component.
pub fn with_reflected_component_mut<R>(
    world: &mut World,
    entity: Entity,
    type_id: TypeId,
    f: impl FnOnce(&mut dyn PartialReflect) -> R,
) -> Result<R, ReflectionError> {
    // Clone the registry handle so the world can be borrowed mutably below.
    let registry = world
        .get_resource::<AppTypeRegistry>()
        .ok_or(ReflectionError::NoTypeRegistry)?
        .clone();
    let registry = registry.read();
    let reflect_component = registry
        .get_type_data::<ReflectComponent>(type_id)
        .ok_or(ReflectionError::NotReflected(type_id))?;
    let mut entity_mut = world
        .get_entity_mut(entity)
        .map_err(|_| ReflectionError::NoSuchEntity(entity))?;
    let mut reflected = reflect_component
        .reflect_mut(&mut entity_mut)
        .ok_or(ReflectionError::MissingComponent { entity, type_id })?;
    Ok(f(reflected.as_partial_reflect_mut()))
}
