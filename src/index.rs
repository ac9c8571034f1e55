//! Ingredient index: the bipartite ingredient -> recipes relation.
//!
//! Input is a whitespace-delimited token stream:
//!
//! ```text
//! <num_recipes> <num_ingredients>
//! <n_0> <recipe_id> ... (n_0 ids)
//! <n_1> <recipe_id> ...
//! ```
//!
//! Line breaks carry no meaning; only token order does. Loading also derives each recipe's
//! reference count (how many ingredient lists contain it), which the accumulator uses to
//! normalize edge contributions.
//!
//! Every list is validated as it is read:
//! - ids must lie in `[0, num_recipes)`;
//! - lists must be non-empty;
//! - a recipe may appear at most once per list.
//!
//! Together these guarantee `1 <= n_i <= num_recipes`, so the IDF weight is finite and
//! non-negative for every ingredient.

use std::io::{self, BufRead};
use std::str::FromStr;

use crate::error::{GraphError, Record, Result};

/// Loaded ingredient lists plus per-recipe reference counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientIndex {
    num_recipes: usize,
    recipe_lists: Vec<Vec<usize>>,
    reference_counts: Vec<usize>,
}

impl IngredientIndex {
    /// Parse the text format from a buffered reader.
    pub fn parse<R: BufRead>(reader: R) -> Result<Self> {
        let mut tokens = Tokens::new(reader);
        let num_recipes = tokens.expect_usize(Record::Header)?;
        let num_ingredients = tokens.expect_usize(Record::Header)?;

        let mut builder = IndexBuilder::new(num_recipes, num_ingredients)?;
        for ingredient in 0..num_ingredients {
            let record = Record::Ingredient(ingredient);
            let n = tokens.expect_usize(record)?;
            builder.begin(ingredient, n)?;
            for _ in 0..n {
                let recipe = tokens.expect_usize(record)?;
                builder.add(ingredient, recipe)?;
            }
        }

        if let Some(extra) = tokens.next_raw()? {
            return Err(GraphError::TrailingInput { token: String::from_utf8_lossy(extra).into_owned() });
        }

        Ok(builder.finish())
    }

    /// Build from in-memory lists, applying the same validation as [`IngredientIndex::parse`].
    pub fn from_lists(num_recipes: usize, lists: Vec<Vec<usize>>) -> Result<Self> {
        let mut builder = IndexBuilder::new(num_recipes, lists.len())?;
        for (ingredient, list) in lists.into_iter().enumerate() {
            builder.begin(ingredient, list.len())?;
            for recipe in list {
                builder.add(ingredient, recipe)?;
            }
        }
        Ok(builder.finish())
    }

    pub fn num_recipes(&self) -> usize {
        self.num_recipes
    }

    pub fn num_ingredients(&self) -> usize {
        self.recipe_lists.len()
    }

    pub fn recipe_lists(&self) -> &[Vec<usize>] {
        &self.recipe_lists
    }

    /// Recipes referencing `ingredient`, in input order.
    pub fn recipe_list(&self, ingredient: usize) -> &[usize] {
        &self.recipe_lists[ingredient]
    }

    pub fn reference_counts(&self) -> &[usize] {
        &self.reference_counts
    }

    /// Number of ingredient lists containing `recipe`.
    pub fn reference_count(&self, recipe: usize) -> usize {
        self.reference_counts[recipe]
    }

    /// Total number of recipe pairs the accumulator will visit: `sum n_i (n_i - 1) / 2`.
    ///
    /// This is the dominant cost of a build; a single ingredient shared by most recipes
    /// can account for nearly all of it.
    pub fn pair_count(&self) -> u64 {
        self.recipe_lists
            .iter()
            .map(|l| {
                let n = l.len() as u64;
                n * n.saturating_sub(1) / 2
            })
            .sum()
    }
}

impl FromStr for IngredientIndex {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s.as_bytes())
    }
}

/// Shared validation for both construction paths.
struct IndexBuilder {
    num_recipes: usize,
    recipe_lists: Vec<Vec<usize>>,
    reference_counts: Vec<usize>,
    // Duplicate detection: `seen[r] == ingredient + 1` means `r` is already in the current list.
    seen: Vec<usize>,
}

impl IndexBuilder {
    fn new(num_recipes: usize, num_ingredients: usize) -> Result<Self> {
        let mut recipe_lists = Vec::new();
        recipe_lists
            .try_reserve_exact(num_ingredients)
            .map_err(|_| GraphError::Allocation { what: "ingredient lists", requested: num_ingredients })?;
        Ok(Self {
            num_recipes,
            recipe_lists,
            reference_counts: zeroed(num_recipes, "reference counts")?,
            seen: zeroed(num_recipes, "duplicate tracking")?,
        })
    }

    fn begin(&mut self, ingredient: usize, n: usize) -> Result<()> {
        if n == 0 {
            return Err(GraphError::EmptyIngredient { ingredient });
        }
        // A valid list never exceeds `num_recipes`; anything longer fails validation below,
        // so don't let a bogus count drive a huge reservation.
        let mut list = Vec::new();
        let want = n.min(self.num_recipes);
        list.try_reserve_exact(want)
            .map_err(|_| GraphError::Allocation { what: "recipe list", requested: want })?;
        self.recipe_lists.push(list);
        Ok(())
    }

    fn add(&mut self, ingredient: usize, recipe: usize) -> Result<()> {
        if recipe >= self.num_recipes {
            return Err(GraphError::RecipeOutOfRange { ingredient, recipe, num_recipes: self.num_recipes });
        }
        let stamp = ingredient + 1;
        if self.seen[recipe] == stamp {
            return Err(GraphError::DuplicateRecipe { ingredient, recipe });
        }
        self.seen[recipe] = stamp;
        self.reference_counts[recipe] += 1;
        if let Some(list) = self.recipe_lists.last_mut() {
            list.push(recipe);
        }
        Ok(())
    }

    fn finish(self) -> IngredientIndex {
        IngredientIndex {
            num_recipes: self.num_recipes,
            recipe_lists: self.recipe_lists,
            reference_counts: self.reference_counts,
        }
    }
}

fn zeroed(n: usize, what: &'static str) -> Result<Vec<usize>> {
    let mut v = Vec::new();
    v.try_reserve_exact(n).map_err(|_| GraphError::Allocation { what, requested: n })?;
    v.resize(n, 0);
    Ok(v)
}

/// Whitespace tokenizer over a `BufRead`, one line buffered at a time.
///
/// Lines are read as bytes so that invalid UTF-8 surfaces as a bad token of the record being
/// parsed rather than as a bare I/O error.
struct Tokens<R> {
    reader: R,
    line: Vec<u8>,
    pos: usize,
}

impl<R: BufRead> Tokens<R> {
    fn new(reader: R) -> Self {
        Self { reader, line: Vec::new(), pos: 0 }
    }

    fn next_raw(&mut self) -> io::Result<Option<&[u8]>> {
        let (start, end) = loop {
            let rest = &self.line[self.pos..];
            if let Some(skip) = rest.iter().position(|b| !b.is_ascii_whitespace()) {
                let start = self.pos + skip;
                let len = self.line[start..]
                    .iter()
                    .position(u8::is_ascii_whitespace)
                    .unwrap_or(self.line.len() - start);
                break (start, start + len);
            }
            self.line.clear();
            self.pos = 0;
            if self.reader.read_until(b'\n', &mut self.line)? == 0 {
                return Ok(None);
            }
        };
        self.pos = end;
        Ok(Some(&self.line[start..end]))
    }

    fn expect_usize(&mut self, record: Record) -> Result<usize> {
        let raw = self.next_raw()?.ok_or(GraphError::UnexpectedEof { record })?;
        std::str::from_utf8(raw)
            .ok()
            .and_then(|tok| tok.parse::<usize>().ok())
            .ok_or_else(|| GraphError::InvalidToken { record, token: String::from_utf8_lossy(raw).into_owned() })
    }
}
