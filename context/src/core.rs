//! Core data structures shared by the bootstrap stages.

use indexmap::IndexMap;
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// An exclusively owned object produced by a factory or returned by a hook.
pub type BoxedObject = Box<dyn Any + Send + Sync>;

/// A finished object as exposed by the container.
pub type SharedObject = Arc<dyn Any + Send + Sync>;

/// Failure raised by user code: factories, rewriters, hooks and initializers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Live objects keyed by definition id, in definition order.
pub(crate) type Instances = IndexMap<String, BoxedObject>;

/// Returns the `TypeId` of the value behind the trait object.
///
/// Calling `type_id()` on a `Box<dyn Any>` directly yields the id of the box
/// itself, so every lookup keyed on a concrete type goes through here.
pub(crate) fn concrete_type_id(object: &(dyn Any + Send + Sync)) -> TypeId {
  object.type_id()
}

/// The bootstrap states, in the only order the pipeline visits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
  Raw,
  ProbeInstantiated,
  DefinitionsRewritten,
  Instantiated,
  BeforeHooked,
  InitCalled,
  AfterHooked,
  Finalized,
}

impl fmt::Display for Stage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Stage::Raw => "raw",
      Stage::ProbeInstantiated => "probe-instantiated",
      Stage::DefinitionsRewritten => "definitions-rewritten",
      Stage::Instantiated => "instantiated",
      Stage::BeforeHooked => "before-hooked",
      Stage::InitCalled => "init-called",
      Stage::AfterHooked => "after-hooked",
      Stage::Finalized => "finalized",
    };
    f.write_str(name)
  }
}
