//! The main `Container` struct and its lookup methods.

use crate::core::{concrete_type_id, SharedObject};
use crate::definition::{collect_definitions, Definitions, ObjectDefinition};
use crate::error::{Error, Query, Result};
use crate::pipeline;
use crate::registry::TypeRegistry;
use crate::source::DefinitionSource;
use indexmap::IndexMap;
use std::any::{type_name, Any, TypeId};
use std::sync::Arc;

/// The Inversion of Control (IoC) container.
///
/// A `Container` is built in one step from a [`TypeRegistry`] and a set of
/// definitions. Construction either completes fully or returns an error;
/// there is no partially built container. Once built, the set of objects
/// never changes, so a container can be shared freely between readers.
pub struct Container {
  definitions: Definitions,
  objects: IndexMap<String, SharedObject>,
}

impl Container {
  /// Builds a container from the definitions produced by `source`.
  pub fn build(registry: &TypeRegistry, source: &impl DefinitionSource) -> Result<Self> {
    let definitions = source.load()?;
    Self::from_definition_map(registry, definitions)
  }

  /// Builds a container from a list of definitions.
  ///
  /// Fails with [`Error::DuplicateDefinition`] if two definitions share an id.
  pub fn from_definitions<I>(registry: &TypeRegistry, definitions: I) -> Result<Self>
  where
    I: IntoIterator<Item = ObjectDefinition>,
  {
    Self::from_definition_map(registry, collect_definitions(definitions)?)
  }

  fn from_definition_map(registry: &TypeRegistry, definitions: Definitions) -> Result<Self> {
    let built = pipeline::bootstrap(registry, definitions)?;
    Ok(Self {
      definitions: built.definitions,
      objects: built.objects,
    })
  }

  // --- PRIVATE HELPERS ---

  fn single<'a, I>(matches: I, query: Query) -> Result<&'a SharedObject>
  where
    I: Iterator<Item = &'a SharedObject>,
  {
    let found: Vec<&SharedObject> = matches.collect();
    match found.as_slice() {
      [] => Err(Error::NoSuchDefinition(query)),
      [object] => Ok(*object),
      _ => Err(Error::NonUniqueType {
        count: found.len(),
        query,
      }),
    }
  }

  fn is_type<T: Any>(object: &SharedObject) -> bool {
    concrete_type_id(&**object) == TypeId::of::<T>()
  }

  fn downcast<T: Any + Send + Sync>(object: &SharedObject) -> Result<Arc<T>> {
    object.clone().downcast::<T>().map_err(|_| {
      Error::NoSuchDefinition(Query {
        id: None,
        type_name: Some(type_name::<T>()),
      })
    })
  }

  // --- PUBLIC API ---

  /// Returns the object registered under `id`.
  pub fn get_by_id(&self, id: &str) -> Result<SharedObject> {
    let query = Query {
      id: Some(id.to_owned()),
      type_name: None,
    };
    Self::single(self.objects.get(id).into_iter(), query).cloned()
  }

  /// Returns the only object whose concrete type is `T`.
  pub fn get_by_type<T: Any + Send + Sync>(&self) -> Result<Arc<T>> {
    let matches = self.objects.values().filter(|object| Self::is_type::<T>(object));
    let query = Query {
      id: None,
      type_name: Some(type_name::<T>()),
    };
    Self::single(matches, query).and_then(Self::downcast::<T>)
  }

  /// Returns the object registered under `id`, provided its concrete type is `T`.
  pub fn get_by_id_and_type<T: Any + Send + Sync>(&self, id: &str) -> Result<Arc<T>> {
    let matches = self
      .objects
      .get(id)
      .into_iter()
      .filter(|object| Self::is_type::<T>(object));
    let query = Query {
      id: Some(id.to_owned()),
      type_name: Some(type_name::<T>()),
    };
    Self::single(matches, query).and_then(Self::downcast::<T>)
  }

  /// Ids of every object in the container, in definition order.
  pub fn list_ids(&self) -> Vec<&str> {
    self.objects.keys().map(String::as_str).collect()
  }

  pub fn contains(&self, id: &str) -> bool {
    self.objects.contains_key(id)
  }

  pub fn len(&self) -> usize {
    self.objects.len()
  }

  pub fn is_empty(&self) -> bool {
    self.objects.is_empty()
  }

  /// The definition an object was built from, after definition rewriting.
  pub fn definition(&self, id: &str) -> Option<&ObjectDefinition> {
    self.definitions.get(id)
  }
}

impl Drop for Container {
  fn drop(&mut self) {
    // Release in reverse definition order.
    while let Some((id, _object)) = self.objects.pop() {
      tracing::trace!(id = %id, "releasing object");
    }
  }
}
