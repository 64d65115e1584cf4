use crate::core::Instances;
use crate::definition::Definitions;
use crate::error::{Error, Result};
use crate::registry::TypeRegistry;

/// Builds one bare object per definition through its registered factory.
///
/// No setters, hooks or initializers run here. The returned map has exactly
/// the keys of `definitions`, in the same order.
pub(crate) fn instantiate(registry: &TypeRegistry, definitions: &Definitions) -> Result<Instances> {
  definitions
    .iter()
    .map(|(id, definition)| {
      tracing::trace!(id = %id, type_name = %definition.type_name, "constructing object");
      registry
        .construct(&definition.type_name)
        .map(|object| (id.clone(), object))
        .map_err(|reason| Error::Instantiation {
          id: id.clone(),
          reason,
        })
    })
    .collect()
}
