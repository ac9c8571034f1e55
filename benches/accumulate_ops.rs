//! Benchmarks for edge accumulation.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::prelude::*;
use rand::SeedableRng;
use recipe_graph::{accumulate, AccumulateConfig, CancelToken, EdgeStorage, IngredientIndex};
use std::hint::black_box;

/// Random relation with a heavy-tailed ingredient popularity.
///
/// Ingredient `i` is used by roughly `n / (i + 1)` recipes (Zipf-like), so the first few
/// ingredients behave like salt and flour and dominate the pair count, as in real recipe data.
fn zipf_relation(num_recipes: usize, num_ingredients: usize, seed: u64) -> IngredientIndex {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut recipes: Vec<usize> = (0..num_recipes).collect();
    let lists = (0..num_ingredients)
        .map(|i| {
            let len = (num_recipes / (i + 1)).clamp(1, num_recipes);
            recipes.shuffle(&mut rng);
            recipes[..len].to_vec()
        })
        .collect();
    IngredientIndex::from_lists(num_recipes, lists).unwrap()
}

/// Every ingredient picks a handful of recipes; no universal ingredients.
fn uniform_relation(num_recipes: usize, num_ingredients: usize, per: usize, seed: u64) -> IngredientIndex {
    let mut rng = StdRng::seed_from_u64(seed);
    let lists = (0..num_ingredients)
        .map(|_| {
            let mut l: Vec<usize> = (0..per).map(|_| rng.random_range(0..num_recipes)).collect();
            l.sort_unstable();
            l.dedup();
            l
        })
        .collect();
    IngredientIndex::from_lists(num_recipes, lists).unwrap()
}

fn bench_accumulate(c: &mut Criterion) {
    let mut group = c.benchmark_group("accumulate");

    for n in [500usize, 2_000] {
        let relations = [
            ("zipf", zipf_relation(n, n / 4, 123)),
            ("uniform", uniform_relation(n, n, 12, 123)),
        ];

        for (name, idx) in relations {
            for (mode, cfg) in [
                ("canonical", AccumulateConfig { storage: EdgeStorage::Canonical, parallel: false }),
                ("symmetric", AccumulateConfig { storage: EdgeStorage::Symmetric, parallel: false }),
                ("canonical_par", AccumulateConfig { storage: EdgeStorage::Canonical, parallel: true }),
            ] {
                group.bench_with_input(BenchmarkId::new(format!("{name}/{mode}"), n), &n, |b, _| {
                    b.iter(|| {
                        let g = accumulate(black_box(&idx), black_box(cfg), &(), &CancelToken::new()).unwrap();
                        black_box(g);
                    })
                });
            }
        }
    }

    group.finish();
}

criterion_group!(benches, bench_accumulate);
criterion_main!(benches);
