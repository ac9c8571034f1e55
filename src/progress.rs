//! Ingredient-completion events and cooperative cancellation.
//!
//! Progress reporting is advisory: observers see events but cannot change the result.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// One finished ingredient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IngredientProgress {
    pub ingredient: usize,
    /// Number of recipes referencing the ingredient (`n_i`).
    pub recipes: usize,
    /// Pairs visited, `n_i (n_i - 1) / 2`.
    pub pairs: u64,
    /// IDF weight `ln(num_recipes / n_i)`.
    pub idf: f64,
    pub elapsed: Duration,
}

/// Receives one event per completed ingredient.
///
/// Must be `Sync`: with parallel accumulation, events arrive from worker threads and in no
/// particular order.
pub trait ProgressObserver: Sync {
    fn ingredient_finished(&self, progress: IngredientProgress);
}

impl ProgressObserver for () {
    fn ingredient_finished(&self, _progress: IngredientProgress) {}
}

impl<F> ProgressObserver for F
where
    F: Fn(IngredientProgress) + Sync,
{
    fn ingredient_finished(&self, progress: IngredientProgress) {
        self(progress)
    }
}

/// Logs each ingredient as a `tracing` event.
///
/// Ingredients with fewer than `min_recipes` recipes are logged at `trace`, the rest at `info`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProgress {
    pub min_recipes: usize,
}

impl ProgressObserver for TracingProgress {
    fn ingredient_finished(&self, p: IngredientProgress) {
        let secs = p.elapsed.as_secs_f64();
        if p.recipes >= self.min_recipes {
            tracing::info!(
                ingredient = p.ingredient,
                pairs = p.pairs,
                idf = p.idf,
                "finished ingredient with {} recipes in {:.3} seconds",
                p.recipes,
                secs
            );
        } else {
            tracing::trace!(
                ingredient = p.ingredient,
                pairs = p.pairs,
                idf = p.idf,
                "finished ingredient with {} recipes in {:.3} seconds",
                p.recipes,
                secs
            );
        }
    }
}

/// Shared flag checked between ingredients.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
