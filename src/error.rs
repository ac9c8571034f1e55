//! Error types for loading, accumulating, and writing recipe graphs.

use std::fmt;

use thiserror::Error;

/// Which part of the input stream was being parsed when a problem was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Record {
    /// The `<num_recipes> <num_ingredients>` header.
    Header,
    /// The group for ingredient `i`.
    Ingredient(usize),
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Record::Header => f.write_str("header"),
            Record::Ingredient(i) => write!(f, "ingredient {i}"),
        }
    }
}

/// Errors that abort a graph build.
///
/// There is no partial-success mode: every variant ends the run.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum GraphError {
    /// A token was not a non-negative integer.
    #[error("invalid token {token:?} while parsing {record}")]
    InvalidToken { record: Record, token: String },

    /// The stream ended before the declared number of values was read.
    #[error("unexpected end of input while parsing {record}")]
    UnexpectedEof { record: Record },

    /// Tokens remained after the last declared ingredient.
    #[error("trailing input after last ingredient: {token:?}")]
    TrailingInput { token: String },

    /// A recipe id outside `[0, num_recipes)`.
    #[error("ingredient {ingredient} references recipe {recipe}, but only {num_recipes} recipes exist")]
    RecipeOutOfRange { ingredient: usize, recipe: usize, num_recipes: usize },

    /// An ingredient with no recipes; its IDF weight is undefined.
    #[error("ingredient {ingredient} has an empty recipe list")]
    EmptyIngredient { ingredient: usize },

    /// The same recipe listed twice for one ingredient.
    #[error("ingredient {ingredient} lists recipe {recipe} more than once")]
    DuplicateRecipe { ingredient: usize, recipe: usize },

    /// Two paired recipes with a combined reference count of zero.
    #[error("recipes {a} and {b} have a combined reference count of zero")]
    ZeroReferenceCount { a: usize, b: usize },

    /// A contribution that is NaN or infinite.
    #[error("non-finite contribution for edge ({a}, {b})")]
    NonFiniteWeight { a: usize, b: usize },

    /// Storage for the declared input sizes could not be reserved.
    #[error("failed to allocate {what} for {requested} entries")]
    Allocation { what: &'static str, requested: usize },

    /// The cancel token was set; `completed` ingredients had been processed.
    #[error("cancelled after {completed} ingredients")]
    Cancelled { completed: usize },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for recipe graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;
