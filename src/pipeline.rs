//! File-to-file build: load the ingredient index, accumulate, dump.
//!
//! The output is written to a temporary file beside the target and renamed into place only
//! after the whole graph is written. A failed run leaves no output file behind (and an existing
//! one untouched).

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::accumulate::{accumulate, AccumulateConfig};
use crate::error::Result;
use crate::index::IngredientIndex;
use crate::output::{write_graph, OutputConfig};
use crate::progress::{CancelToken, ProgressObserver};

pub const DEFAULT_INPUT: &str = "recipes_by_ingredients.txt";
pub const DEFAULT_OUTPUT: &str = "data/recipe_graph.txt";

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RunConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub accumulate: AccumulateConfig,
    pub output_format: OutputConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            accumulate: AccumulateConfig::default(),
            output_format: OutputConfig::default(),
        }
    }
}

/// What a completed run produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub recipes: usize,
    pub ingredients: usize,
    pub pairs: u64,
    pub edges: usize,
    pub elapsed: Duration,
}

pub fn run<O>(config: &RunConfig, observer: &O, cancel: &CancelToken) -> Result<RunSummary>
where
    O: ProgressObserver + ?Sized,
{
    let start = Instant::now();

    let index = IngredientIndex::parse(BufReader::new(File::open(&config.input)?))?;
    tracing::info!(
        input = %config.input.display(),
        recipes = index.num_recipes(),
        ingredients = index.num_ingredients(),
        pairs = index.pair_count(),
        "loaded ingredient index"
    );

    let graph = accumulate(&index, config.accumulate, observer, cancel)?;
    write_atomically(&config.output, |file| write_graph(&graph, BufWriter::new(file), config.output_format))?;

    let summary = RunSummary {
        recipes: index.num_recipes(),
        ingredients: index.num_ingredients(),
        pairs: index.pair_count(),
        edges: graph.edge_count(),
        elapsed: start.elapsed(),
    };
    tracing::info!(
        output = %config.output.display(),
        edges = summary.edges,
        elapsed_s = summary.elapsed.as_secs_f64(),
        "wrote recipe graph"
    );
    Ok(summary)
}

fn write_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut File) -> Result<()>,
{
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;
    let mut tmp = dump_file_builder().tempfile_in(dir)?;
    write(tmp.as_file_mut())?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Temp files default to 0600. The dump is created with 0666 less the umask, the same mode
/// `fs::write` would give it.
#[cfg(unix)]
fn dump_file_builder() -> tempfile::Builder<'static, 'static> {
    use std::os::unix::fs::PermissionsExt;

    let mut builder = tempfile::Builder::new();
    builder.permissions(fs::Permissions::from_mode(0o666));
    builder
}

#[cfg(not(unix))]
fn dump_file_builder() -> tempfile::Builder<'static, 'static> {
    tempfile::Builder::new()
}
