//! MathML symbol matching
//!
//! A symbol is reduced to a [`SymbolShape`]: its base identifier (the text of
//! the first `<mi>`) and the sequence of element names it is built from. Two
//! distinct symbols match when they share a base identifier:
//!
//! - rank 1: same shape, e.g. `x_i` and `x_j`
//! - rank 2: different shape, e.g. `x` and `x_i`

use std::collections::{BTreeMap, BTreeSet};

use quick_xml::Reader;
use quick_xml::events::Event;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum MathmlError {
    #[error("invalid MathML: {0}")]
    Xml(String),
    #[error("unclosed element <{0}>")]
    Unclosed(String),
    #[error("no <mi> identifier")]
    NoIdentifier,
}

/// Structural summary of one MathML symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolShape {
    pub base: String,
    pub elements: Vec<String>,
}

/// One match record. Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolMatch {
    pub queried_mathml: String,
    pub matching_mathml: String,
    pub rank: u32,
}

/// Matches for every parseable symbol, keyed by the queried MathML.
pub type Matches = BTreeMap<String, Vec<SymbolMatch>>;

/// Parse a MathML fragment into its shape.
pub fn parse_mathml(mathml: &str) -> Result<SymbolShape, MathmlError> {
    let mut reader = Reader::from_str(mathml);
    reader.config_mut().trim_text(true);

    let mut elements = Vec::new();
    let mut open: Vec<String> = Vec::new();
    let mut base: Option<String> = None;
    // Text of the first <mi> while it is being read
    let mut first_mi: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                if name == "mi" && base.is_none() && first_mi.is_none() {
                    first_mi = Some(String::new());
                }
                elements.push(name.clone());
                open.push(name);
            }
            Ok(Event::Empty(e)) => {
                elements.push(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
            }
            Ok(Event::Text(t)) => {
                if let Some(text) = first_mi.as_mut() {
                    let unescaped = t.unescape().map_err(|e| MathmlError::Xml(e.to_string()))?;
                    text.push_str(&unescaped);
                }
            }
            Ok(Event::End(_)) => {
                if open.pop().as_deref() == Some("mi") {
                    if let Some(text) = first_mi.take() {
                        base = Some(text.trim().to_string());
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(MathmlError::Xml(e.to_string())),
            _ => {}
        }
    }

    if let Some(name) = open.pop() {
        return Err(MathmlError::Unclosed(name));
    }
    match base {
        Some(base) if !base.is_empty() => Ok(SymbolShape { base, elements }),
        _ => Err(MathmlError::NoIdentifier),
    }
}

/// Find, for each symbol, the other symbols sharing its base identifier.
///
/// Duplicate inputs are collapsed. Each symbol's matches are ordered by rank,
/// then by matching MathML, and never include the symbol itself. Symbols that
/// cannot be parsed are logged and left out.
pub fn get_mathml_matches<'a, I>(mathml_equations: I) -> Matches
where
    I: IntoIterator<Item = &'a str>,
{
    let distinct: BTreeSet<&str> = mathml_equations.into_iter().collect();

    let mut shapes: Vec<(&str, SymbolShape)> = Vec::with_capacity(distinct.len());
    for mathml in distinct {
        match parse_mathml(mathml) {
            Ok(shape) => shapes.push((mathml, shape)),
            Err(e) => log::warn!("Skipping symbol {mathml:?}: {e}"),
        }
    }

    let mut by_base: FxHashMap<&str, Vec<usize>> = FxHashMap::default();
    for (i, (_, shape)) in shapes.iter().enumerate() {
        by_base.entry(shape.base.as_str()).or_default().push(i);
    }

    let mut matches = Matches::new();
    for (mathml, shape) in &shapes {
        let mut symbol_matches: Vec<SymbolMatch> = by_base[shape.base.as_str()]
            .iter()
            .map(|&j| &shapes[j])
            .filter(|(other, _)| other != mathml)
            .map(|(other, other_shape)| SymbolMatch {
                queried_mathml: mathml.to_string(),
                matching_mathml: other.to_string(),
                rank: if other_shape.elements == shape.elements { 1 } else { 2 },
            })
            .collect();
        symbol_matches.sort_by(|a, b| {
            (a.rank, &a.matching_mathml).cmp(&(b.rank, &b.matching_mathml))
        });
        matches.insert(mathml.to_string(), symbol_matches);
    }
    matches
}
