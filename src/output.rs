//! Flat text dump of a [`RecipeGraph`].
//!
//! One line per recipe, ascending:
//!
//! ```text
//! 0: (1,0.5) (2,2)
//! 1: (2,0.25)
//! 2:
//! ```
//!
//! Each `(neighbor,weight)` is followed by a single space, and neighbors ascend within a line.
//! A line lists the recipe's stored row, so under canonical storage it only shows neighbors with
//! a larger index.

use std::collections::BTreeMap;
use std::fmt::{self, Write as _};
use std::io::{self, Write as _};

use crate::error::Result;
use crate::graph::RecipeGraph;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OutputConfig {
    /// Fixed number of decimals for weights. `None` prints the shortest representation that
    /// round-trips.
    pub precision: Option<usize>,
}

/// Render one recipe's line, without the trailing newline.
pub fn format_line(graph: &RecipeGraph, recipe: usize, config: OutputConfig) -> String {
    let row = graph.row(recipe);
    let mut line = String::with_capacity(8 + row.len() * 12);
    write_row(&mut line, recipe, row, config).expect("formatting into a String is infallible");
    line
}

/// Write every recipe's line to `writer`.
///
/// Lines are rendered into one reused buffer and written whole; wrap file handles in a
/// `BufWriter`.
pub fn write_graph<W: io::Write>(graph: &RecipeGraph, mut writer: W, config: OutputConfig) -> Result<()> {
    let mut line = String::new();
    for (recipe, row) in graph.rows() {
        line.clear();
        write_row(&mut line, recipe, row, config)
            .map_err(|_| io::Error::other(format!("failed to format line for recipe {recipe}")))?;
        line.push('\n');
        writer.write_all(line.as_bytes())?;
    }
    writer.flush()?;
    Ok(())
}

fn write_row<W: fmt::Write>(out: &mut W, recipe: usize, row: &BTreeMap<usize, f64>, config: OutputConfig) -> fmt::Result {
    write!(out, "{recipe}: ")?;
    for (&neighbor, &weight) in row {
        match config.precision {
            Some(p) => write!(out, "({neighbor},{weight:.p$}) ")?,
            None => write!(out, "({neighbor},{weight}) ")?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::EdgeStorage;

    fn sample(storage: EdgeStorage) -> RecipeGraph {
        let mut g = RecipeGraph::new(3, storage).unwrap();
        g.add_weight(0, 2, 2.0);
        g.add_weight(1, 0, 0.5);
        g.add_weight(2, 1, 0.25);
        g
    }

    #[test]
    fn canonical_dump() {
        let mut out = Vec::new();
        write_graph(&sample(EdgeStorage::Canonical), &mut out, OutputConfig::default()).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "0: (1,0.5) (2,2) \n1: (2,0.25) \n2: \n");
    }

    #[test]
    fn symmetric_dump_lists_full_neighborhoods() {
        let mut out = Vec::new();
        write_graph(&sample(EdgeStorage::Symmetric), &mut out, OutputConfig::default()).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "0: (1,0.5) (2,2) \n1: (0,0.5) (2,0.25) \n2: (0,2) (1,0.25) \n"
        );
    }

    #[test]
    fn fixed_precision() {
        let cfg = OutputConfig { precision: Some(3) };
        let g = sample(EdgeStorage::Canonical);
        assert_eq!(format_line(&g, 0, cfg), "0: (1,0.500) (2,2.000) ");
        assert_eq!(format_line(&g, 2, cfg), "2: ");
    }

    #[test]
    fn format_line_matches_writer() {
        let g = sample(EdgeStorage::Symmetric);
        for cfg in [OutputConfig::default(), OutputConfig { precision: Some(2) }] {
            let mut out = Vec::new();
            write_graph(&g, &mut out, cfg).unwrap();
            let text = String::from_utf8(out).unwrap();
            let lines: Vec<String> = (0..3).map(|r| format_line(&g, r, cfg)).collect();
            assert_eq!(text.lines().collect::<Vec<_>>(), lines);
        }
    }
}
