//! Edge accumulation: ingredient lists -> weighted recipe co-occurrence graph.
//!
//! For ingredient `i` with recipe list `L_i` of length `n_i`:
//!
//! \[
//! \mathrm{idf}_i = \ln\frac{N}{n_i}
//! \]
//!
//! and every pair of positions `j < k` adds
//!
//! \[
//! \frac{2\,\mathrm{idf}_i}{c(L_i[j]) + c(L_i[k])}
//! \]
//!
//! to the edge `(L_i[j], L_i[k])`, where `c(r)` is the recipe's reference count. Contributions
//! are summed across ingredients, so the result does not depend on ingredient order.
//!
//! Cost is \(O(\sum_i n_i^2)\). An ingredient listed by most recipes (salt, water) dominates
//! everything else, which is why progress is reported per ingredient and why the `parallel`
//! feature splits the ingredient loop across threads.
//!
//! Pairs whose contribution is exactly zero (an ingredient listed by every recipe) still create
//! the edge with weight `0.0`.

use std::time::Instant;

use crate::error::{GraphError, Result};
use crate::graph::{EdgeStorage, RecipeGraph};
use crate::index::IngredientIndex;
use crate::progress::{CancelToken, IngredientProgress, ProgressObserver};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AccumulateConfig {
    pub storage: EdgeStorage,
    /// Spread ingredients across the rayon pool. Ignored without the `parallel` feature.
    ///
    /// Parallel sums may differ from sequential ones in the last bits, because addition order
    /// changes between runs.
    pub parallel: bool,
}

/// Sequential build with default storage and no progress reporting.
pub fn build_recipe_graph(index: &IngredientIndex) -> Result<RecipeGraph> {
    accumulate(index, AccumulateConfig::default(), &(), &CancelToken::new())
}

/// Accumulate every ingredient's pair contributions into a [`RecipeGraph`].
///
/// `observer` receives one event per ingredient. `cancel` is checked before each ingredient;
/// once set, the build stops with [`GraphError::Cancelled`].
pub fn accumulate<O>(
    index: &IngredientIndex,
    config: AccumulateConfig,
    observer: &O,
    cancel: &CancelToken,
) -> Result<RecipeGraph>
where
    O: ProgressObserver + ?Sized,
{
    let start = Instant::now();
    let graph = if config.parallel {
        accumulate_parallel(index, config.storage, observer, cancel)?
    } else {
        accumulate_sequential(index, config.storage, observer, cancel)?
    };
    tracing::debug!(
        recipes = graph.num_recipes(),
        edges = graph.edge_count(),
        parallel = config.parallel,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "accumulated recipe graph"
    );
    Ok(graph)
}

fn accumulate_sequential<O>(
    index: &IngredientIndex,
    storage: EdgeStorage,
    observer: &O,
    cancel: &CancelToken,
) -> Result<RecipeGraph>
where
    O: ProgressObserver + ?Sized,
{
    let mut graph = RecipeGraph::new(index.num_recipes(), storage)?;
    for ingredient in 0..index.num_ingredients() {
        if cancel.is_cancelled() {
            return Err(GraphError::Cancelled { completed: ingredient });
        }
        let progress = accumulate_ingredient(index, ingredient, |a, b, w| graph.add_weight(a, b, w))?;
        observer.ingredient_finished(progress);
    }
    Ok(graph)
}

#[cfg(feature = "parallel")]
fn accumulate_parallel<O>(
    index: &IngredientIndex,
    storage: EdgeStorage,
    observer: &O,
    cancel: &CancelToken,
) -> Result<RecipeGraph>
where
    O: ProgressObserver + ?Sized,
{
    use rayon::prelude::*;
    use rustc_hash::FxHashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // Per-worker partial sums keyed by canonical pair, merged by reduction.
    type Partial = FxHashMap<(usize, usize), f64>;

    let completed = AtomicUsize::new(0);
    let merged: Partial = (0..index.num_ingredients())
        .into_par_iter()
        .try_fold(Partial::default, |mut acc: Partial, ingredient: usize| -> Result<Partial> {
            if cancel.is_cancelled() {
                return Err(GraphError::Cancelled { completed: completed.load(Ordering::Relaxed) });
            }
            let progress = accumulate_ingredient(index, ingredient, |a, b, w| {
                let key = if a < b { (a, b) } else { (b, a) };
                *acc.entry(key).or_insert(0.0) += w;
            })?;
            completed.fetch_add(1, Ordering::Relaxed);
            observer.ingredient_finished(progress);
            Ok(acc)
        })
        .try_reduce(Partial::default, |a: Partial, b: Partial| -> Result<Partial> {
            let (mut big, small) = if a.len() >= b.len() { (a, b) } else { (b, a) };
            for (key, w) in small {
                *big.entry(key).or_insert(0.0) += w;
            }
            Ok(big)
        })?;

    let mut graph = RecipeGraph::new(index.num_recipes(), storage)?;
    for ((a, b), w) in merged {
        graph.add_weight(a, b, w);
    }
    Ok(graph)
}

#[cfg(not(feature = "parallel"))]
fn accumulate_parallel<O>(
    index: &IngredientIndex,
    storage: EdgeStorage,
    observer: &O,
    cancel: &CancelToken,
) -> Result<RecipeGraph>
where
    O: ProgressObserver + ?Sized,
{
    tracing::debug!("built without the `parallel` feature; accumulating sequentially");
    accumulate_sequential(index, storage, observer, cancel)
}

/// `ln(num_recipes / n)`.
pub fn idf(num_recipes: usize, n: usize) -> f64 {
    (num_recipes as f64 / n as f64).ln()
}

/// Visit every pair of one ingredient's list, handing each contribution to `add`.
fn accumulate_ingredient<F>(index: &IngredientIndex, ingredient: usize, mut add: F) -> Result<IngredientProgress>
where
    F: FnMut(usize, usize, f64),
{
    let start = Instant::now();
    let list = index.recipe_list(ingredient);
    let n = list.len();
    if n == 0 {
        return Err(GraphError::EmptyIngredient { ingredient });
    }
    let weight = idf(index.num_recipes(), n);
    let counts = index.reference_counts();

    for (j, &a) in list.iter().enumerate() {
        let count_a = counts[a];
        for &b in &list[j + 1..] {
            let denom = count_a + counts[b];
            if denom == 0 {
                return Err(GraphError::ZeroReferenceCount { a, b });
            }
            let contribution = weight * 2.0 / denom as f64;
            if !contribution.is_finite() {
                return Err(GraphError::NonFiniteWeight { a, b });
            }
            add(a, b, contribution);
        }
    }

    let n64 = n as u64;
    Ok(IngredientProgress {
        ingredient,
        recipes: n,
        pairs: n64 * (n64 - 1) / 2,
        idf: weight,
        elapsed: start.elapsed(),
    })
}
