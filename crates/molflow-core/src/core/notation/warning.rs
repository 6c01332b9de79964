use thiserror::Error;

/// A non-fatal problem found while scanning structural notation.
///
/// Warnings never abort parsing: the offending token is skipped (or, for unknown
/// elements, replaced by Carbon) and the scan continues. Positions are byte offsets into
/// the input string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseWarning {
    #[error("Unknown element '{symbol}' at {position}; using carbon")]
    UnknownElement { symbol: String, position: usize },

    #[error("Ignored character '{character}' at {position}")]
    IgnoredCharacter { character: char, position: usize },

    #[error("Bond symbol '{symbol}' at {position} has no preceding bond")]
    BondOrderWithoutBond { symbol: char, position: usize },

    #[error("Ring label {label} at {position} appears before any atom")]
    RingLabelWithoutAtom { label: u8, position: usize },

    #[error("Ring label {label} at {position} would bond an atom to itself")]
    SelfClosingRing { label: u8, position: usize },

    #[error("Ring label {label} was opened but never closed")]
    UnclosedRing { label: u8 },

    #[error("Unmatched ')' at {position}")]
    UnmatchedBranchClose { position: usize },

    #[error("{count} branch(es) left open at end of input")]
    UnclosedBranch { count: usize },

    #[error("Bracket atom at {position} contains no element symbol")]
    EmptyBracketAtom { position: usize },

    #[error("Bracket atom at {position} is never closed")]
    UnterminatedBracket { position: usize },
}
