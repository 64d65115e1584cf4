use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fibre_context::{Container, InMemorySource, ObjectDefinition, TypeRegistry};
use std::sync::Arc;

// --- Fixtures ---

#[derive(Default)]
struct Node {
  weight: i64,
  parent: Option<Arc<Node>>,
}

fn registry() -> TypeRegistry {
  let mut registry = TypeRegistry::new();
  registry
    .register::<Node>("Node")
    .value("weight", |n: &mut Node, w: i64| n.weight = w)
    .reference("parent", |n: &mut Node, p: Arc<Node>| n.parent = Some(p))
    .init(|n| n.weight += 1);
  registry
}

/// A chain of `len` nodes where each node references the one before it.
fn chain(len: usize) -> InMemorySource {
  (0..len)
    .map(|i| {
      let definition = ObjectDefinition::new(format!("node{}", i), "Node")
        .with_value("weight", i.to_string());
      if i == 0 {
        definition
      } else {
        definition.with_ref("parent", format!("node{}", i - 1))
      }
    })
    .collect()
}

// --- Benchmark Functions ---

fn bench_bootstrap(c: &mut Criterion) {
  let registry = registry();
  let mut group = c.benchmark_group("Bootstrap");

  for len in [10usize, 100, 1_000] {
    let source = chain(len);
    group.throughput(Throughput::Elements(len as u64));
    group.bench_with_input(BenchmarkId::new("chain", len), &source, |b, source| {
      b.iter(|| {
        let container = Container::build(&registry, source).unwrap();
        black_box(container.len())
      })
    });
  }

  group.finish();
}

fn bench_lookup(c: &mut Criterion) {
  let registry = registry();
  let container = Container::build(&registry, &chain(1_000)).unwrap();
  let mut group = c.benchmark_group("Lookup");

  group.bench_function("get_by_id", |b| {
    b.iter(|| black_box(container.get_by_id(black_box("node500")).unwrap()))
  });
  group.bench_function("get_by_id_and_type", |b| {
    b.iter(|| black_box(container.get_by_id_and_type::<Node>(black_box("node500")).unwrap()))
  });

  group.finish();
}

criterion_group!(benches, bench_bootstrap, bench_lookup);
criterion_main!(benches);
