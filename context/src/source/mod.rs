//! Producers of object definitions.

#[cfg(feature = "yaml")]
mod yaml;

#[cfg(feature = "yaml")]
pub use yaml::YamlSource;

use crate::definition::{collect_definitions, Definitions, ObjectDefinition};
use crate::error::Result;

/// Produces the definitions a container is built from.
///
/// Implementations must return unique, non-empty ids, each stored under its
/// own key. The container checks this again before building anything.
pub trait DefinitionSource {
  fn load(&self) -> Result<Definitions>;
}

impl DefinitionSource for Definitions {
  fn load(&self) -> Result<Definitions> {
    Ok(self.clone())
  }
}

/// Definitions assembled in code.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
  definitions: Vec<ObjectDefinition>,
}

impl InMemorySource {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with(mut self, definition: ObjectDefinition) -> Self {
    self.definitions.push(definition);
    self
  }

  pub fn push(&mut self, definition: ObjectDefinition) {
    self.definitions.push(definition);
  }
}

impl FromIterator<ObjectDefinition> for InMemorySource {
  fn from_iter<I: IntoIterator<Item = ObjectDefinition>>(iter: I) -> Self {
    Self {
      definitions: iter.into_iter().collect(),
    }
  }
}

impl DefinitionSource for InMemorySource {
  fn load(&self) -> Result<Definitions> {
    collect_definitions(self.definitions.iter().cloned())
  }
}
