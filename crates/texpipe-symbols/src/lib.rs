//! texpipe-symbols: Matching symbols that share a base identifier
//!
//! Symbols are detected upstream and stored per paper as MathML. This crate
//! loads them, groups them by the identifier they are built on (`x` in `x`,
//! `x_i`, `x^2`) and records, for every symbol, the other symbols in the same
//! paper that are likely to refer to the same thing.

pub mod command;
pub mod matcher;
pub mod symbols;

pub use command::{FindSymbolMatches, MathmlForPaper};
pub use matcher::{
    Matches, MathmlError, SymbolMatch, SymbolShape, get_mathml_matches, parse_mathml,
};
pub use symbols::{SymbolRecord, load_symbols};
