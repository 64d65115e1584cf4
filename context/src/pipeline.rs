//! The bootstrap pipeline.
//!
//! `bootstrap` walks the stages of [`Stage`] in order. Each stage consumes
//! the output of the previous one, so a failure anywhere drops everything
//! built so far and nothing partial escapes.

use crate::core::{concrete_type_id, BoxError, BoxedObject, Instances, SharedObject, Stage};
use crate::definition::{self, Definitions, ObjectDefinition};
use crate::error::{Error, Result};
use crate::extension::{Extensions, InstanceRewriter};
use crate::inject;
use crate::instantiate::instantiate;
use crate::registry::TypeRegistry;
use indexmap::IndexMap;

/// The product of a successful bootstrap.
pub(crate) struct Bootstrapped {
  pub(crate) definitions: Definitions,
  pub(crate) objects: IndexMap<String, SharedObject>,
}

#[derive(Clone, Copy)]
enum Hook {
  Before,
  After,
}

impl Hook {
  fn stage(self) -> Stage {
    match self {
      Hook::Before => Stage::BeforeHooked,
      Hook::After => Stage::AfterHooked,
    }
  }

  fn apply(
    self,
    rewriter: &mut dyn InstanceRewriter,
    value: BoxedObject,
    id: &str,
  ) -> std::result::Result<BoxedObject, BoxError> {
    match self {
      Hook::Before => rewriter.before_init(value, id),
      Hook::After => rewriter.after_init(value, id),
    }
  }
}

pub(crate) fn bootstrap(
  registry: &TypeRegistry,
  mut definitions: Definitions,
) -> Result<Bootstrapped> {
  let span = tracing::debug_span!("bootstrap", definitions = definitions.len());
  let _entered = span.enter();

  definition::validate(&definitions)?;
  tracing::debug!(stage = %Stage::Raw, count = definitions.len(), "definitions loaded");

  // Every definition is built once to find out which ones are extensions.
  let probes = instantiate(registry, &definitions)?;
  let mut extensions = Extensions::partition(registry, probes);
  definitions.retain(|id, _| !extensions.contains(id));
  tracing::debug!(
    stage = %Stage::ProbeInstantiated,
    extensions = extensions.len(),
    remaining = definitions.len(),
    "extensions partitioned"
  );

  let definitions = rewrite_definitions(&mut extensions, definitions)?;
  tracing::debug!(stage = %Stage::DefinitionsRewritten, "definitions rewritten");

  let objects = instantiate(registry, &definitions)?;
  tracing::debug!(stage = %Stage::Instantiated, count = objects.len(), "objects instantiated");

  let objects = run_hooks(&mut extensions, objects, Hook::Before)?;
  tracing::debug!(stage = %Stage::BeforeHooked, "before-init hooks applied");

  let objects = run_initializers(registry, objects)?;
  tracing::debug!(stage = %Stage::InitCalled, "initializers invoked");

  let mut objects = run_hooks(&mut extensions, objects, Hook::After)?;
  tracing::debug!(stage = %Stage::AfterHooked, "after-init hooks applied");

  for id in extensions.ids() {
    objects.shift_remove(id);
  }
  drop(extensions);
  tracing::debug!(stage = %Stage::Finalized, count = objects.len(), "extensions stripped");

  inject::inject_values(registry, &definitions, &mut objects)?;
  let objects = inject::inject_references(registry, &definitions, objects)?;

  tracing::info!(objects = objects.len(), "container ready");
  Ok(Bootstrapped {
    definitions,
    objects,
  })
}

/// Folds the remaining definitions through every definition rewriter in order.
fn rewrite_definitions(
  extensions: &mut Extensions,
  definitions: Definitions,
) -> Result<Definitions> {
  let initial: Vec<ObjectDefinition> = definitions.into_values().collect();

  let rewritten = extensions
    .definition_rewriters()
    .try_fold(initial, |mut defs, (rewriter_id, rewriter)| {
      tracing::trace!(rewriter = rewriter_id, "rewriting definitions");
      rewriter.rewrite(&mut defs).map_err(|source| Error::Rewrite {
        stage: Stage::DefinitionsRewritten,
        rewriter: rewriter_id.to_owned(),
        id: String::new(),
        source,
      })?;
      Ok::<_, Error>(defs)
    })?;

  Ok(
    rewritten
      .into_iter()
      .map(|definition| (definition.id().to_owned(), definition))
      .collect(),
  )
}

/// Threads each object through every instance rewriter's hook, in order.
fn run_hooks(extensions: &mut Extensions, objects: Instances, hook: Hook) -> Result<Instances> {
  let mut hooked = Instances::with_capacity(objects.len());
  for (id, object) in objects {
    let mut current = object;
    for (rewriter_id, rewriter) in extensions.instance_rewriters() {
      tracing::trace!(id = %id, rewriter = rewriter_id, stage = %hook.stage(), "applying hook");
      current = hook
        .apply(rewriter, current, &id)
        .map_err(|source| Error::Rewrite {
          stage: hook.stage(),
          rewriter: rewriter_id.to_owned(),
          id: id.clone(),
          source,
        })?;
    }
    hooked.insert(id, current);
  }
  Ok(hooked)
}

/// Runs the initializers registered for each object's concrete type.
fn run_initializers(registry: &TypeRegistry, mut objects: Instances) -> Result<Instances> {
  for (id, object) in objects.iter_mut() {
    let Some(descriptor) = registry.descriptor(concrete_type_id(&**object)) else {
      continue;
    };
    for initializer in &descriptor.initializers {
      tracing::trace!(id = %id, "running initializer");
      initializer(object).map_err(|source| Error::Init {
        id: id.clone(),
        source,
      })?;
    }
  }
  Ok(objects)
}
