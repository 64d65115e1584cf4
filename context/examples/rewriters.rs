use fibre_context::{
  BoxError, BoxedObject, Container, DefinitionRewriter, InMemorySource, InstanceRewriter,
  ObjectDefinition, TypeRegistry,
};
use std::time::Duration;

// --- Plain objects ---

#[derive(Debug, Default)]
struct Cache {
  ttl_secs: u64,
}

#[derive(Debug, Default)]
struct LoggingCache {
  ttl_secs: u64,
}

// --- Extensions ---

/// Swaps every `Cache` definition for its logging variant.
#[derive(Default)]
struct UseLoggingCaches;

impl DefinitionRewriter for UseLoggingCaches {
  fn rewrite(&mut self, definitions: &mut [ObjectDefinition]) -> Result<(), BoxError> {
    for definition in definitions.iter_mut().filter(|d| d.type_name == "Cache") {
      println!("rewriting '{}' to LoggingCache", definition.id());
      definition.type_name = "LoggingCache".to_owned();
    }
    Ok(())
  }
}

/// Caps cache lifetimes after initialization.
struct CapTtl(Duration);

impl InstanceRewriter for CapTtl {
  fn after_init(&mut self, mut value: BoxedObject, id: &str) -> Result<BoxedObject, BoxError> {
    if let Some(cache) = value.downcast_mut::<LoggingCache>() {
      let cap = self.0.as_secs();
      if cache.ttl_secs > cap {
        println!("capping ttl of '{}' from {}s to {}s", id, cache.ttl_secs, cap);
        cache.ttl_secs = cap;
      }
    }
    Ok(value)
  }
}

fn main() {
  // --- Registration ---
  let mut registry = TypeRegistry::new();
  registry.register::<Cache>("Cache").init(|c| c.ttl_secs = 3600);
  registry
    .register::<LoggingCache>("LoggingCache")
    .init(|c| c.ttl_secs = 3600);
  registry
    .register::<UseLoggingCaches>("UseLoggingCaches")
    .definition_rewriter();
  registry
    .register_with("CapTtl", || CapTtl(Duration::from_secs(60)))
    .instance_rewriter();

  let source = InMemorySource::new()
    .with(ObjectDefinition::new("sessions", "Cache"))
    .with(ObjectDefinition::new("pages", "Cache"))
    .with(ObjectDefinition::new("useLogging", "UseLoggingCaches"))
    .with(ObjectDefinition::new("capTtl", "CapTtl"));

  // --- Bootstrap ---
  let container = Container::build(&registry, &source).expect("bootstrap failed");

  // Extensions are gone, the rest were rewritten.
  assert_eq!(container.list_ids(), vec!["sessions", "pages"]);
  for id in container.list_ids() {
    let cache = container.get_by_id_and_type::<LoggingCache>(id).unwrap();
    println!("{} -> {:?}", id, cache);
    assert_eq!(cache.ttl_secs, 60);
  }
}
