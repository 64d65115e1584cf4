use crate::core::{BoxError, Stage};
use std::fmt;
use thiserror::Error;

/// The main error type for the `fibre_context` library.
///
/// Every bootstrap failure is fatal to container construction. Lookup
/// failures (`NoSuchDefinition`, `NonUniqueType`) are per-call.
#[derive(Debug, Error)]
pub enum Error {
  #[error("Failed to instantiate object '{id}': {reason}")]
  Instantiation {
    id: String,
    #[source]
    reason: InstantiationFailure,
  },

  /// `id` names the object a hook was applied to. Definition rewriters work
  /// on all definitions at once, so for them it is empty.
  #[error(
    "Rewrite failed at stage '{stage}' in rewriter '{rewriter}'{}: {source}",
    for_object(.id)
  )]
  Rewrite {
    stage: Stage,
    rewriter: String,
    id: String,
    #[source]
    source: BoxError,
  },

  #[error("Initializer failed for object '{id}': {source}")]
  Init {
    id: String,
    #[source]
    source: BoxError,
  },

  #[error("Failed to inject field '{field}' of object '{id}': {reason}")]
  Injection {
    id: String,
    field: String,
    #[source]
    reason: InjectionFailure,
  },

  #[error("No object matches {0}")]
  NoSuchDefinition(Query),

  #[error("Found {count} objects matching {query}")]
  NonUniqueType { query: Query, count: usize },

  #[error("Invalid definition '{id}': {reason}")]
  InvalidDefinition { id: String, reason: String },

  #[error("Duplicate definition id: {0}")]
  DuplicateDefinition(String),

  #[error("Definition file not found: {0}")]
  ConfigNotFound(String),

  #[error("Failed to read definition file: {0}")]
  ConfigRead(#[from] std::io::Error),

  #[error("Failed to parse definitions: {0}")]
  ConfigParse(String),
}

/// Why a definition could not be turned into a live object.
#[derive(Debug, Error)]
pub enum InstantiationFailure {
  #[error("type '{0}' is not registered")]
  UnknownType(String),

  #[error("factory for type '{type_name}' failed: {source}")]
  Factory {
    type_name: String,
    #[source]
    source: BoxError,
  },
}

/// Why a value or reference could not be injected.
#[derive(Debug, Error)]
pub enum InjectionFailure {
  #[error("no setter '{setter}' registered on type '{owner}'")]
  MissingSetter { setter: String, owner: String },

  #[error("setter '{setter}' takes a reference, not a literal value")]
  ExpectedReference { setter: String },

  #[error("setter '{setter}' takes a literal value, not a reference")]
  ExpectedValue { setter: String },

  #[error("setter registered for '{expected}' was handed a value of another type")]
  ForeignOwner { expected: &'static str },

  #[error(transparent)]
  Coercion(#[from] LiteralError),

  #[error("reference target '{0}' is not in the container")]
  UnresolvedReference(String),

  #[error("reference target '{target}' is not a '{expected}'")]
  IncompatibleReference {
    target: String,
    expected: &'static str,
  },

  #[error("circular reference: {}", .0.join(" -> "))]
  CircularReference(Vec<String>),
}

/// A literal that could not be converted to a setter's parameter type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot convert literal '{literal}' to {target}")]
pub struct LiteralError {
  pub literal: String,
  pub target: &'static str,
}

/// The filters of a lookup, used to describe lookup failures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
  pub id: Option<String>,
  pub type_name: Option<&'static str>,
}

impl fmt::Display for Query {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match (&self.id, self.type_name) {
      (Some(id), Some(ty)) => write!(f, "id '{}' and type '{}'", id, ty),
      (Some(id), None) => write!(f, "id '{}'", id),
      (None, Some(ty)) => write!(f, "type '{}'", ty),
      (None, None) => f.write_str("an empty query"),
    }
  }
}

fn for_object(id: &str) -> String {
  if id.is_empty() {
    String::new()
  } else {
    format!(" for '{}'", id)
  }
}

/// A specialized `Result` type for `fibre_context` operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
