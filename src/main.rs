use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use recipe_graph::{
    pipeline::{DEFAULT_INPUT, DEFAULT_OUTPUT},
    AccumulateConfig, CancelToken, EdgeStorage, OutputConfig, RunConfig, TracingProgress,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "recipe-graph", version, about = "Build a weighted recipe co-occurrence graph")]
struct Cli {
    /// Ingredient -> recipes relation (`<num_recipes> <num_ingredients>` then one group per ingredient)
    #[arg(long, default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Where to write the adjacency dump
    #[arg(long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Edge layout; `symmetric` lists every neighbor on each recipe's line
    #[arg(long, value_enum, default_value_t = Storage::Canonical)]
    storage: Storage,

    /// Accumulate ingredients on all cores
    #[arg(long)]
    parallel: bool,

    /// Print weights with this many decimals instead of the shortest exact form
    #[arg(long)]
    precision: Option<usize>,

    /// Only log ingredients referenced by at least this many recipes at info level
    #[arg(long, default_value_t = 0)]
    log_min_recipes: usize,

    /// Only log warnings and errors
    #[arg(long, short)]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Storage {
    Canonical,
    Symmetric,
}

impl From<Storage> for EdgeStorage {
    fn from(s: Storage) -> Self {
        match s {
            Storage::Canonical => EdgeStorage::Canonical,
            Storage::Symmetric => EdgeStorage::Symmetric,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_target(false)
        .init();

    let config = RunConfig {
        input: cli.input,
        output: cli.output,
        accumulate: AccumulateConfig { storage: cli.storage.into(), parallel: cli.parallel },
        output_format: OutputConfig { precision: cli.precision },
    };
    let observer = TracingProgress { min_recipes: cli.log_min_recipes };

    let summary = recipe_graph::run(&config, &observer, &CancelToken::new())
        .with_context(|| format!("building recipe graph from {}", config.input.display()))?;

    tracing::info!(
        recipes = summary.recipes,
        ingredients = summary.ingredients,
        edges = summary.edges,
        "done in {:.2}s",
        summary.elapsed.as_secs_f64()
    );
    Ok(())
}
