//! The build-time type table consulted by every bootstrap stage.
//!
//! Definitions name their types with plain strings. The `TypeRegistry` maps
//! those names to factories and, separately, maps each concrete Rust type to
//! its setters, initializers and extension roles. Nothing is discovered at
//! runtime: a type the registry does not describe has no setters, no
//! initializers and no roles.

use crate::core::{BoxError, BoxedObject, SharedObject};
use crate::error::{InjectionFailure, InstantiationFailure};
use crate::extension::{DefinitionRewriter, InstanceRewriter};
use crate::literal::FromLiteral;
use ahash::AHashMap;
use std::any::{type_name, Any, TypeId};
use std::marker::PhantomData;
use std::sync::Arc;

type Factory = Box<dyn Fn() -> Result<BoxedObject, BoxError> + Send + Sync>;
type ValueSetter = Box<dyn Fn(&mut BoxedObject, &str) -> Result<(), InjectionFailure> + Send + Sync>;
type RefSetter =
  Box<dyn Fn(&mut BoxedObject, &str, SharedObject) -> Result<(), InjectionFailure> + Send + Sync>;
type Initializer = Box<dyn Fn(&mut BoxedObject) -> Result<(), BoxError> + Send + Sync>;

pub(crate) type DefinitionRewriterCast = fn(&mut BoxedObject) -> Option<&mut dyn DefinitionRewriter>;
pub(crate) type InstanceRewriterCast = fn(&mut BoxedObject) -> Option<&mut dyn InstanceRewriter>;

/// Extension roles declared for a concrete type.
#[derive(Clone, Copy, Default)]
pub(crate) struct Roles {
  pub(crate) definition_rewriter: Option<DefinitionRewriterCast>,
  pub(crate) instance_rewriter: Option<InstanceRewriterCast>,
}

impl Roles {
  pub(crate) fn is_extension(&self) -> bool {
    self.definition_rewriter.is_some() || self.instance_rewriter.is_some()
  }
}

pub(crate) enum Setter {
  Value(ValueSetter),
  Reference(RefSetter),
}

/// Everything the container knows about one concrete Rust type.
pub(crate) struct TypeDescriptor {
  pub(crate) rust_name: &'static str,
  pub(crate) setters: AHashMap<String, Setter>,
  pub(crate) initializers: Vec<Initializer>,
  pub(crate) roles: Roles,
}

impl TypeDescriptor {
  fn new<T: Any>() -> Self {
    Self {
      rust_name: type_name::<T>(),
      setters: AHashMap::new(),
      initializers: Vec::new(),
      roles: Roles::default(),
    }
  }
}

/// The table of constructible types and their wiring capabilities.
#[derive(Default)]
pub struct TypeRegistry {
  factories: AHashMap<String, Factory>,
  descriptors: AHashMap<TypeId, TypeDescriptor>,
}

impl TypeRegistry {
  /// Creates a new, empty `TypeRegistry`.
  pub fn new() -> Self {
    Self::default()
  }

  // --- PRIVATE HELPERS ---

  fn add_factory_internal<T: Any + Send + Sync>(
    &mut self,
    name: &str,
    factory: Factory,
  ) -> TypeBuilder<'_, T> {
    if self.factories.insert(name.to_owned(), factory).is_some() {
      tracing::warn!(type_name = name, "replacing previously registered factory");
    }
    self.describe::<T>()
  }

  // --- PUBLIC API ---

  /// Registers `T` under `name`, constructed through `Default`.
  pub fn register<T: Any + Send + Sync + Default>(&mut self, name: &str) -> TypeBuilder<'_, T> {
    self.add_factory_internal::<T>(name, Box::new(|| Ok(Box::new(T::default()) as BoxedObject)))
  }

  /// Registers `T` under `name` with a custom zero-argument factory.
  pub fn register_with<T: Any + Send + Sync>(
    &mut self,
    name: &str,
    factory: impl Fn() -> T + Send + Sync + 'static,
  ) -> TypeBuilder<'_, T> {
    self.add_factory_internal::<T>(name, Box::new(move || Ok(Box::new(factory()) as BoxedObject)))
  }

  /// Registers `T` under `name` with a factory that may fail.
  pub fn try_register_with<T, E>(
    &mut self,
    name: &str,
    factory: impl Fn() -> Result<T, E> + Send + Sync + 'static,
  ) -> TypeBuilder<'_, T>
  where
    T: Any + Send + Sync,
    E: Into<BoxError> + 'static,
  {
    self.add_factory_internal::<T>(
      name,
      Box::new(move || factory().map(|v| Box::new(v) as BoxedObject).map_err(Into::into)),
    )
  }

  /// Describes `T` without making it constructible from a definition.
  ///
  /// Use this for values that only appear as the output of an instance
  /// rewriter but still need setters or initializers.
  pub fn describe<T: Any + Send + Sync>(&mut self) -> TypeBuilder<'_, T> {
    self.descriptor_mut::<T>();
    TypeBuilder {
      registry: self,
      _marker: PhantomData,
    }
  }

  pub fn is_registered(&self, name: &str) -> bool {
    self.factories.contains_key(name)
  }

  // --- CRATE API ---

  pub(crate) fn construct(&self, type_name: &str) -> Result<BoxedObject, InstantiationFailure> {
    let factory = self
      .factories
      .get(type_name)
      .ok_or_else(|| InstantiationFailure::UnknownType(type_name.to_owned()))?;
    factory().map_err(|source| InstantiationFailure::Factory {
      type_name: type_name.to_owned(),
      source,
    })
  }

  pub(crate) fn descriptor(&self, type_id: TypeId) -> Option<&TypeDescriptor> {
    self.descriptors.get(&type_id)
  }

  pub(crate) fn roles_of(&self, type_id: TypeId) -> Roles {
    self.descriptor(type_id).map(|d| d.roles).unwrap_or_default()
  }

  fn descriptor_mut<T: Any>(&mut self) -> &mut TypeDescriptor {
    self
      .descriptors
      .entry(TypeId::of::<T>())
      .or_insert_with(TypeDescriptor::new::<T>)
  }
}

/// Attaches setters, initializers and roles to a registered type.
pub struct TypeBuilder<'r, T> {
  registry: &'r mut TypeRegistry,
  _marker: PhantomData<fn() -> T>,
}

impl<'r, T: Any + Send + Sync> TypeBuilder<'r, T> {
  fn add_setter(self, field: &str, setter: Setter) -> Self {
    self
      .registry
      .descriptor_mut::<T>()
      .setters
      .insert(field.to_owned(), setter);
    self
  }

  /// Adds a setter for a literal value dependency.
  pub fn value<P: FromLiteral>(
    self,
    field: &str,
    set: impl Fn(&mut T, P) + Send + Sync + 'static,
  ) -> Self {
    let setter: ValueSetter = Box::new(move |object: &mut BoxedObject, literal: &str| {
      let value = P::from_literal(literal)?;
      let target = owner_of::<T>(object)?;
      set(target, value);
      Ok(())
    });
    self.add_setter(field, Setter::Value(setter))
  }

  /// Adds a setter for a reference dependency on an object of type `R`.
  pub fn reference<R: Any + Send + Sync>(
    self,
    field: &str,
    set: impl Fn(&mut T, Arc<R>) + Send + Sync + 'static,
  ) -> Self {
    let setter: RefSetter = Box::new(
      move |object: &mut BoxedObject, target_id: &str, shared: SharedObject| {
        let referenced = shared
          .downcast::<R>()
          .map_err(|_| InjectionFailure::IncompatibleReference {
            target: target_id.to_owned(),
            expected: type_name::<R>(),
          })?;
        set(owner_of::<T>(object)?, referenced);
        Ok(())
      },
    );
    self.add_setter(field, Setter::Reference(setter))
  }

  /// Adds an initializer. Initializers run in the order they were added.
  pub fn init(self, init: impl Fn(&mut T) + Send + Sync + 'static) -> Self {
    self.try_init(move |target| {
      init(target);
      Ok::<(), BoxError>(())
    })
  }

  /// Adds an initializer that may fail.
  pub fn try_init<E: Into<BoxError> + 'static>(
    self,
    init: impl Fn(&mut T) -> Result<(), E> + Send + Sync + 'static,
  ) -> Self {
    let initializer: Initializer = Box::new(move |object: &mut BoxedObject| {
      match object.downcast_mut::<T>() {
        Some(target) => init(target).map_err(Into::into),
        None => Ok(()),
      }
    });
    self.registry.descriptor_mut::<T>().initializers.push(initializer);
    self
  }

  /// Declares that `T` rewrites definitions.
  pub fn definition_rewriter(self) -> Self
  where
    T: DefinitionRewriter,
  {
    self.registry.descriptor_mut::<T>().roles.definition_rewriter =
      Some(cast_definition_rewriter::<T> as DefinitionRewriterCast);
    self
  }

  /// Declares that `T` rewrites instances.
  pub fn instance_rewriter(self) -> Self
  where
    T: InstanceRewriter,
  {
    self.registry.descriptor_mut::<T>().roles.instance_rewriter =
      Some(cast_instance_rewriter::<T> as InstanceRewriterCast);
    self
  }
}

/// Setters are looked up by the concrete `TypeId`, so a mismatch here means
/// the descriptor table is inconsistent.
fn owner_of<T: Any>(object: &mut BoxedObject) -> Result<&mut T, InjectionFailure> {
  object
    .downcast_mut::<T>()
    .ok_or(InjectionFailure::ForeignOwner {
      expected: type_name::<T>(),
    })
}

fn cast_definition_rewriter<T: DefinitionRewriter + Any>(
  object: &mut BoxedObject,
) -> Option<&mut dyn DefinitionRewriter> {
  object
    .downcast_mut::<T>()
    .map(|t| t as &mut dyn DefinitionRewriter)
}

fn cast_instance_rewriter<T: InstanceRewriter + Any>(
  object: &mut BoxedObject,
) -> Option<&mut dyn InstanceRewriter> {
  object.downcast_mut::<T>().map(|t| t as &mut dyn InstanceRewriter)
}
