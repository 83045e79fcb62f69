//! Chooses the sub-inspector for a component type.

use bevy::ecs::reflect::{AppTypeRegistry, ReflectComponent};
use bevy::platform::collections::HashMap;
use bevy::prelude::*;
use bevy::reflect::TypeRegistry;
use core::any::TypeId;
use thiserror::Error;

use super::{GenericInspector, SubInspector};

/// Minimum Jaro-Winkler similarity for a type path to be offered as a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Creates a fresh sub-inspector for one slot.
pub type SubInspectorFactory = Box<dyn Fn() -> Box<dyn SubInspector> + Send + Sync>;

#[derive(Debug, Error)]
pub enum ResolverError {
    #[error("no reflected component has the type path `{path}`")]
    UnknownType { path: String },
    #[error("no reflected component has the type path `{path}`, did you mean `{suggestion}`?")]
    UnknownTypeWithSuggestion { path: String, suggestion: String },
}

/// Registry of custom sub-inspectors. Types without an entry get a
/// [`GenericInspector`].
#[derive(Resource, Default)]
pub struct SubInspectorRegistry {
    factories: HashMap<TypeId, SubInspectorFactory>,
}

impl SubInspectorRegistry {
    /// Uses `I` for every component of type `C`.
    pub fn register<C: Component, I: SubInspector + Default>(&mut self) -> &mut Self {
        self.register_factory(
            TypeId::of::<C>(),
            Box::new(|| Box::new(I::default()) as Box<dyn SubInspector>),
        )
    }

    /// Uses `factory` for the component type `type_id`, replacing any previous entry.
    pub fn register_factory(&mut self, type_id: TypeId, factory: SubInspectorFactory) -> &mut Self {
        self.factories.insert(type_id, factory);
        self
    }

    /// Looks up a reflected component by its full type path and registers
    /// `factory` for it.
    pub fn register_by_type_path(
        &mut self,
        type_registry: &TypeRegistry,
        path: &str,
        factory: SubInspectorFactory,
    ) -> Result<&mut Self, ResolverError> {
        let Some(registration) = type_registry
            .get_with_type_path(path)
            .filter(|registration| registration.data::<ReflectComponent>().is_some())
        else {
            return Err(unknown_type(type_registry, path));
        };
        Ok(self.register_factory(registration.type_id(), factory))
    }

    /// Whether `type_id` has a custom sub-inspector.
    pub fn has_custom(&self, type_id: TypeId) -> bool {
        self.factories.contains_key(&type_id)
    }

    /// Creates the sub-inspector for a component of type `type_id`.
    pub fn resolve(&self, type_id: Option<TypeId>) -> Box<dyn SubInspector> {
        type_id
            .and_then(|id| self.factories.get(&id))
            .map(|factory| factory())
            .unwrap_or_else(|| Box::new(GenericInspector::default()))
    }
}

fn unknown_type(type_registry: &TypeRegistry, path: &str) -> ResolverError {
    let suggestion = type_registry
        .iter()
        .filter(|registration| registration.data::<ReflectComponent>().is_some())
        .map(|registration| registration.type_info().type_path())
        .map(|candidate| (strsim::jaro_winkler(path, candidate), candidate))
        .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0));

    match suggestion {
        Some((_, candidate)) => ResolverError::UnknownTypeWithSuggestion {
            path: path.to_string(),
            suggestion: candidate.to_string(),
        },
        None => ResolverError::UnknownType {
            path: path.to_string(),
        },
    }
}

/// Registration helpers on [`App`].
pub trait RegisterSubInspectorExt {
    /// Uses `I` to inspect components of type `C`.
    fn register_sub_inspector<C: Component, I: SubInspector + Default>(&mut self) -> &mut Self;
}

impl RegisterSubInspectorExt for App {
    fn register_sub_inspector<C: Component, I: SubInspector + Default>(&mut self) -> &mut Self {
        self.world_mut()
            .get_resource_or_init::<SubInspectorRegistry>()
            .register::<C, I>();
        self
    }
}

/// Reads the app's type registry and registers `factory` by type path.
pub fn register_sub_inspector_by_path(
    world: &mut World,
    path: &str,
    factory: SubInspectorFactory,
) -> Result<(), ResolverError> {
    let type_registry = world.resource::<AppTypeRegistry>().clone();
    let type_registry = type_registry.read();
    world
        .get_resource_or_init::<SubInspectorRegistry>()
        .register_by_type_path(&type_registry, path, factory)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspector::sub_inspector::InspectedComponent;
    use bevy::reflect::TypePath;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Component, Reflect, Default)]
    #[reflect(Component)]
    struct Thruster {
        power: f32,
    }

    #[derive(Default)]
    struct CountingInspector {
        created: Option<Arc<AtomicUsize>>,
    }

    impl SubInspector for CountingInspector {
        fn initialize(&mut self, _: &mut World, _: Entity, _: InspectedComponent) {
            if let Some(created) = &self.created {
                created.fetch_add(1, Ordering::SeqCst);
            }
        }
        fn refresh(&mut self, _: &mut World) {}
        fn set_visible(&mut self, _: &mut World, _: bool) {}
        fn destroy(&mut self, _: &mut World) {}
    }

    #[test]
    fn unregistered_types_fall_back_to_generic() {
        let registry = SubInspectorRegistry::default();
        assert!(!registry.has_custom(TypeId::of::<Thruster>()));
        // Resolving never fails, even for dynamic components.
        let _ = registry.resolve(Some(TypeId::of::<Thruster>()));
        let _ = registry.resolve(None);
    }

    #[test]
    fn registered_factory_is_used() {
        let created = Arc::new(AtomicUsize::new(0));
        let mut registry = SubInspectorRegistry::default();
        let counter = created.clone();
        registry.register_factory(
            TypeId::of::<Thruster>(),
            Box::new(move || {
                Box::new(CountingInspector {
                    created: Some(counter.clone()),
                }) as Box<dyn SubInspector>
            }),
        );

        let mut world = World::new();
        let entity = world.spawn(Thruster::default()).id();
        let component = InspectedComponent {
            entity,
            component_id: world.component_id::<Thruster>().unwrap(),
            type_id: Some(TypeId::of::<Thruster>()),
            name: "Thruster".to_string(),
        };
        let mut inspector = registry.resolve(component.type_id);
        inspector.initialize(&mut world, entity, component);

        assert!(registry.has_custom(TypeId::of::<Thruster>()));
        assert_eq!(created.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn register_by_type_path_suggests_close_match() {
        let mut type_registry = TypeRegistry::default();
        type_registry.register::<Thruster>();
        let path = Thruster::type_path().to_string();
        let mut registry = SubInspectorRegistry::default();

        registry
            .register_by_type_path(
                &type_registry,
                &path,
                Box::new(|| Box::new(CountingInspector::default()) as Box<dyn SubInspector>),
            )
            .unwrap();
        assert!(registry.has_custom(TypeId::of::<Thruster>()));

        let typo = path.replace("Thruster", "Thruser");
        let err = registry
            .register_by_type_path(
                &type_registry,
                &typo,
                Box::new(|| Box::new(CountingInspector::default()) as Box<dyn SubInspector>),
            )
            .err()
            .unwrap();
        match err {
            ResolverError::UnknownTypeWithSuggestion { suggestion, .. } => {
                assert_eq!(suggestion, path)
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = registry
            .register_by_type_path(
                &type_registry,
                "zzz",
                Box::new(|| Box::new(CountingInspector::default()) as Box<dyn SubInspector>),
            )
            .err()
            .unwrap();
        assert!(matches!(err, ResolverError::UnknownType { .. }));
    }
}
