//! Declarative descriptions of the objects a container builds.

use crate::error::{Error, Result};
use indexmap::IndexMap;

/// Definitions keyed by id, in the order the source produced them.
pub type Definitions = IndexMap<String, ObjectDefinition>;

/// Describes one object: its type, its literal values and its references.
///
/// The id is fixed at creation. Definition rewriters may change everything
/// else before the final instantiation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectDefinition {
  id: String,
  /// Name the type was registered under in the `TypeRegistry`.
  pub type_name: String,
  /// Field name to literal string.
  pub value_dependencies: IndexMap<String, String>,
  /// Field name to the id of another definition.
  pub ref_dependencies: IndexMap<String, String>,
}

impl ObjectDefinition {
  pub fn new(id: impl Into<String>, type_name: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      type_name: type_name.into(),
      value_dependencies: IndexMap::new(),
      ref_dependencies: IndexMap::new(),
    }
  }

  /// Adds a literal value dependency.
  pub fn with_value(mut self, field: impl Into<String>, literal: impl Into<String>) -> Self {
    self.value_dependencies.insert(field.into(), literal.into());
    self
  }

  /// Adds a reference to another definition.
  pub fn with_ref(mut self, field: impl Into<String>, target_id: impl Into<String>) -> Self {
    self.ref_dependencies.insert(field.into(), target_id.into());
    self
  }

  pub fn id(&self) -> &str {
    &self.id
  }

  pub fn type_name(&self) -> &str {
    &self.type_name
  }
}

/// Collects definitions into a map, rejecting empty and duplicate ids.
pub fn collect_definitions<I>(definitions: I) -> Result<Definitions>
where
  I: IntoIterator<Item = ObjectDefinition>,
{
  let mut collected = Definitions::new();
  for definition in definitions {
    if definition.id.is_empty() {
      return Err(empty_id(&definition));
    }
    if collected.contains_key(&definition.id) {
      return Err(Error::DuplicateDefinition(definition.id));
    }
    collected.insert(definition.id.clone(), definition);
  }
  Ok(collected)
}

/// Checks the map-level invariants a `DefinitionSource` must uphold.
pub(crate) fn validate(definitions: &Definitions) -> Result<()> {
  for (key, definition) in definitions {
    if definition.id.is_empty() {
      return Err(empty_id(definition));
    }
    if key != &definition.id {
      return Err(Error::InvalidDefinition {
        id: definition.id.clone(),
        reason: format!("registered under mismatched key '{}'", key),
      });
    }
  }
  Ok(())
}

fn empty_id(definition: &ObjectDefinition) -> Error {
  Error::InvalidDefinition {
    id: String::new(),
    reason: format!("empty id for type '{}'", definition.type_name),
  }
}
