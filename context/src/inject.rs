//! Literal-value and reference wiring of finished objects.
//!
//! Values are injected first, while every object is still exclusively
//! owned. References are wired afterwards, targets before holders: an
//! object is frozen into its shared form only once all of its own
//! references are set, so every holder of a reference sees exactly the
//! object the container exposes.

use crate::core::{concrete_type_id, BoxedObject, Instances, SharedObject};
use crate::definition::Definitions;
use crate::error::{Error, InjectionFailure, Result};
use crate::registry::{Setter, TypeDescriptor, TypeRegistry};
use ahash::AHashMap;
use indexmap::IndexMap;

/// Conventional setter name for a field, e.g. `port` -> `setPort`.
pub(crate) fn setter_name(field: &str) -> String {
  let mut chars = field.chars();
  match chars.next() {
    Some(first) => format!("set{}{}", first.to_uppercase(), chars.as_str()),
    None => "set".to_owned(),
  }
}

fn find_setter<'a>(
  registry: &'a TypeRegistry,
  object: &BoxedObject,
  field: &str,
) -> std::result::Result<&'a Setter, InjectionFailure> {
  let descriptor: Option<&TypeDescriptor> = registry.descriptor(concrete_type_id(&**object));
  descriptor
    .and_then(|d| d.setters.get(field))
    .ok_or_else(|| InjectionFailure::MissingSetter {
      setter: setter_name(field),
      owner: descriptor
        .map(|d| d.rust_name.to_owned())
        .unwrap_or_else(|| "<undescribed type>".to_owned()),
    })
}

/// Applies every definition's literal values through the registered setters.
pub(crate) fn inject_values(
  registry: &TypeRegistry,
  definitions: &Definitions,
  objects: &mut Instances,
) -> Result<()> {
  for (id, definition) in definitions {
    let Some(object) = objects.get_mut(id) else {
      continue;
    };
    for (field, literal) in &definition.value_dependencies {
      let fail = |reason| Error::Injection {
        id: id.clone(),
        field: field.clone(),
        reason,
      };
      let setter = find_setter(registry, object, field).map_err(fail)?;
      let Setter::Value(set) = setter else {
        return Err(fail(InjectionFailure::ExpectedReference {
          setter: setter_name(field),
        }));
      };
      tracing::trace!(id = %id, field = %field, literal = %literal, "injecting value");
      set(&mut *object, literal.as_str()).map_err(fail)?;
    }
  }
  Ok(())
}

/// Wires every reference and returns the frozen objects in definition order.
pub(crate) fn inject_references(
  registry: &TypeRegistry,
  definitions: &Definitions,
  mut objects: Instances,
) -> Result<IndexMap<String, SharedObject>> {
  let order = wiring_order(definitions, &objects)?;
  let mut wired: AHashMap<&str, SharedObject> = AHashMap::with_capacity(order.len());

  for id in order {
    let Some(mut object) = objects.shift_remove(id) else {
      continue;
    };
    let references = definitions.get(id).map(|d| &d.ref_dependencies);
    for (field, target) in references.into_iter().flatten() {
      let fail = |reason| Error::Injection {
        id: id.to_owned(),
        field: field.clone(),
        reason,
      };
      let Setter::Reference(set) = find_setter(registry, &object, field).map_err(fail)? else {
        return Err(fail(InjectionFailure::ExpectedValue {
          setter: setter_name(field),
        }));
      };
      let shared = wired
        .get(target.as_str())
        .cloned()
        .ok_or_else(|| fail(InjectionFailure::UnresolvedReference(target.clone())))?;
      tracing::trace!(id = %id, field = %field, target = %target, "injecting reference");
      set(&mut object, target.as_str(), shared).map_err(fail)?;
    }
    wired.insert(id, SharedObject::from(object));
  }

  Ok(
    definitions
      .keys()
      .filter_map(|id| wired.remove(id.as_str()).map(|object| (id.clone(), object)))
      .collect(),
  )
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
  Visiting,
  Done,
}

/// Orders the objects so every reference target comes before its holders.
///
/// Depth-first with an explicit stack, so chain length is bounded by memory
/// rather than by the thread's stack. Fails on unknown targets and cycles.
fn wiring_order<'a>(definitions: &'a Definitions, objects: &Instances) -> Result<Vec<&'a str>> {
  let mut marks: AHashMap<&'a str, Mark> = AHashMap::with_capacity(objects.len());
  let mut order: Vec<&'a str> = Vec::with_capacity(objects.len());
  // (id, index of the next reference to visit)
  let mut stack: Vec<(&'a str, usize)> = Vec::new();

  for root in definitions.keys().map(String::as_str) {
    if !objects.contains_key(root) || marks.contains_key(root) {
      continue;
    }
    marks.insert(root, Mark::Visiting);
    stack.push((root, 0));

    while let Some(frame) = stack.last_mut() {
      let (id, next) = *frame;
      frame.1 += 1;

      let edge = definitions
        .get(id)
        .and_then(|d| d.ref_dependencies.get_index(next));
      let Some((field, target)) = edge else {
        marks.insert(id, Mark::Done);
        order.push(id);
        stack.pop();
        continue;
      };

      let fail = |reason| Error::Injection {
        id: id.to_owned(),
        field: field.clone(),
        reason,
      };
      if !objects.contains_key(target) {
        return Err(fail(InjectionFailure::UnresolvedReference(target.clone())));
      }
      match marks.get(target.as_str()) {
        Some(Mark::Done) => {}
        Some(Mark::Visiting) => {
          let start = stack
            .iter()
            .position(|(s, _)| *s == target.as_str())
            .unwrap_or(0);
          let mut path: Vec<String> = stack[start..]
            .iter()
            .map(|(s, _)| (*s).to_owned())
            .collect();
          path.push(target.clone());
          return Err(fail(InjectionFailure::CircularReference(path)));
        }
        None => {
          marks.insert(target.as_str(), Mark::Visiting);
          stack.push((target.as_str(), 0));
        }
      }
    }
  }

  Ok(order)
}
