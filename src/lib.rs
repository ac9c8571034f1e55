//! # recipe-graph
//!
//! Weighted recipe co-occurrence graphs from an ingredient -> recipes relation.
//!
//! Two recipes are linked when they share an ingredient. Each shared ingredient contributes
//! `ln(N / n_i) * 2 / (c(a) + c(b))`, where `N` is the number of recipes, `n_i` the number of
//! recipes using the ingredient, and `c(r)` the number of ingredients recipe `r` uses. Rare
//! ingredients link recipes strongly; ubiquitous ones barely at all.
//!
//! ```
//! use recipe_graph::{build_recipe_graph, IngredientIndex};
//!
//! let index: IngredientIndex = "4 2\n2 0 1\n3 1 2 3\n".parse().unwrap();
//! let graph = build_recipe_graph(&index).unwrap();
//! assert!(graph.edge_weight(1, 0).unwrap() > graph.edge_weight(1, 2).unwrap());
//! ```

pub mod accumulate;
pub mod error;
pub mod graph;
pub mod index;
pub mod output;
pub mod pipeline;
pub mod progress;

pub use accumulate::{accumulate, build_recipe_graph, idf, AccumulateConfig};
pub use error::{GraphError, Record, Result};
pub use graph::{EdgeStorage, Graph, RecipeGraph, WeightedGraph};
pub use index::IngredientIndex;
pub use output::{format_line, write_graph, OutputConfig};
pub use pipeline::{run, RunConfig, RunSummary};
pub use progress::{CancelToken, IngredientProgress, ProgressObserver, TracingProgress};
