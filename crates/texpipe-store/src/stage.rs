//! Stage definitions and their on-disk directory names

use std::fmt;
use std::str::FromStr;

/// Pipeline stage identifier.
///
/// Variants are declared in pipeline order; each stage's output is read by a
/// later stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StageName {
    SourcesArchives,
    Sources,
    CompiledSources,
    PaperImages,
    Bibitems,
    CompiledSourcesWithColorizedCitations,
    PaperWithColorizedCitationsImages,
    DetectedEquationTokens,
    SymbolMatches,
}

impl StageName {
    pub const ALL: [StageName; 9] = [
        Self::SourcesArchives,
        Self::Sources,
        Self::CompiledSources,
        Self::PaperImages,
        Self::Bibitems,
        Self::CompiledSourcesWithColorizedCitations,
        Self::PaperWithColorizedCitationsImages,
        Self::DetectedEquationTokens,
        Self::SymbolMatches,
    ];

    /// Short key used on the command line and in log lines.
    pub fn key(self) -> &'static str {
        match self {
            Self::SourcesArchives => "sources-archives",
            Self::Sources => "sources",
            Self::CompiledSources => "compiled-sources",
            Self::PaperImages => "paper-images",
            Self::Bibitems => "bibitems",
            Self::CompiledSourcesWithColorizedCitations => {
                "compiled-sources-with-colorized-citations"
            }
            Self::PaperWithColorizedCitationsImages => "paper-with-colorized-citations-images",
            Self::DetectedEquationTokens => "detected-equation-tokens",
            Self::SymbolMatches => "symbol-matches",
        }
    }

    /// Directory name under the data root (`NN-key`).
    pub fn dir_name(self) -> String {
        format!("{:02}-{}", self.index() + 1, self.key())
    }

    fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|s| *s == self)
            .unwrap_or_default()
    }
}

impl fmt::Display for StageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Error returned when a string names no known stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStage(pub String);

impl fmt::Display for UnknownStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown stage: {}", self.0)
    }
}

impl std::error::Error for UnknownStage {}

impl FromStr for StageName {
    type Err = UnknownStage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|stage| stage.key() == s || stage.dir_name() == s)
            .ok_or_else(|| UnknownStage(s.to_string()))
    }
}
