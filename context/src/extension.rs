//! Extension capabilities and the partitioning of probe instances.

use crate::core::{concrete_type_id, BoxError, BoxedObject, Instances};
use crate::definition::ObjectDefinition;
use crate::registry::{Roles, TypeRegistry};
use indexmap::IndexMap;

/// Rewrites the definitions of ordinary objects before they are built.
///
/// Rewriters run one after another over the same slice, so each sees the
/// edits of the rewriters before it.
pub trait DefinitionRewriter: Send + Sync {
  fn rewrite(&mut self, definitions: &mut [ObjectDefinition]) -> Result<(), BoxError>;
}

/// Replaces ordinary objects around their initializers.
///
/// Both hooks receive the current value and return the value that the next
/// rewriter (or the next stage) will see.
pub trait InstanceRewriter: Send + Sync {
  fn before_init(&mut self, value: BoxedObject, _id: &str) -> Result<BoxedObject, BoxError> {
    Ok(value)
  }

  fn after_init(&mut self, value: BoxedObject, _id: &str) -> Result<BoxedObject, BoxError> {
    Ok(value)
  }
}

/// A probe instance that declared at least one extension role.
pub(crate) struct Extension {
  value: BoxedObject,
  roles: Roles,
}

impl Extension {
  pub(crate) fn as_definition_rewriter(&mut self) -> Option<&mut dyn DefinitionRewriter> {
    let cast = self.roles.definition_rewriter?;
    cast(&mut self.value)
  }

  pub(crate) fn as_instance_rewriter(&mut self) -> Option<&mut dyn InstanceRewriter> {
    let cast = self.roles.instance_rewriter?;
    cast(&mut self.value)
  }
}

/// The extension members found among the probe instances, in definition order.
///
/// An object fulfilling both roles appears once here and is invoked in both
/// groups.
#[derive(Default)]
pub(crate) struct Extensions {
  members: IndexMap<String, Extension>,
}

impl Extensions {
  /// Keeps the probe instances that declare a role; plain ones are dropped.
  pub(crate) fn partition(registry: &TypeRegistry, probes: Instances) -> Self {
    let members = probes
      .into_iter()
      .filter_map(|(id, value)| {
        let roles = registry.roles_of(concrete_type_id(&*value));
        roles.is_extension().then(|| (id, Extension { value, roles }))
      })
      .collect();
    Self { members }
  }

  pub(crate) fn contains(&self, id: &str) -> bool {
    self.members.contains_key(id)
  }

  pub(crate) fn len(&self) -> usize {
    self.members.len()
  }

  pub(crate) fn definition_rewriters(
    &mut self,
  ) -> impl Iterator<Item = (&str, &mut dyn DefinitionRewriter)> {
    self
      .members
      .iter_mut()
      .filter_map(|(id, ext)| ext.as_definition_rewriter().map(|r| (id.as_str(), r)))
  }

  pub(crate) fn instance_rewriters(
    &mut self,
  ) -> impl Iterator<Item = (&str, &mut dyn InstanceRewriter)> {
    self
      .members
      .iter_mut()
      .filter_map(|(id, ext)| ext.as_instance_rewriter().map(|r| (id.as_str(), r)))
  }

  pub(crate) fn ids(&self) -> impl Iterator<Item = &str> {
    self.members.keys().map(String::as_str)
  }
}
