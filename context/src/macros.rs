//! Public macros for ergonomic object resolution.

/// Resolves an object from a container, panicking if it cannot be found.
///
/// Use this where a missing object is a programming error. For a
/// non-panicking lookup, call `get_by_type` or `get_by_id_and_type` directly.
///
/// # Panics
///
/// Panics if no object matches, or if more than one object matches a
/// type-only lookup.
///
/// # Examples
///
/// ```
/// use fibre_context::{resolve, Container, ObjectDefinition, TypeRegistry};
///
/// #[derive(Default)]
/// struct Clock {
///   ticks: u64,
/// }
///
/// let mut registry = TypeRegistry::new();
/// registry
///   .register::<Clock>("Clock")
///   .value("ticks", |clock: &mut Clock, ticks: u64| clock.ticks = ticks);
///
/// let container = Container::from_definitions(
///   &registry,
///   [ObjectDefinition::new("clock", "Clock").with_value("ticks", "7")],
/// )
/// .unwrap();
///
/// let by_type = resolve!(container, Clock);
/// let by_id = resolve!(container, Clock, "clock");
/// assert_eq!(by_type.ticks, 7);
/// assert!(std::sync::Arc::ptr_eq(&by_type, &by_id));
/// ```
#[macro_export]
macro_rules! resolve {
  // resolve!(container, MyType)
  ($container:expr, $type:ty) => {
    $container
      .get_by_type::<$type>()
      .unwrap_or_else(|err| {
        panic!(
          "Failed to resolve required object {}: {}",
          std::any::type_name::<$type>(),
          err
        )
      })
  };

  // resolve!(container, MyType, "id")
  ($container:expr, $type:ty, $id:expr) => {
    $container
      .get_by_id_and_type::<$type>($id)
      .unwrap_or_else(|err| {
        panic!(
          "Failed to resolve required object '{}' of type {}: {}",
          $id,
          std::any::type_name::<$type>(),
          err
        )
      })
  };
}
