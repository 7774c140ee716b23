//! Missing-value normalization.
//!
//! Spreadsheets encode "no data" in many ways. Every converter runs its input through
//! [`normalize`] first, so a recognized token never reaches type-specific parsing.

use crate::types::Cell;

/// Tokens (compared lowercase, full-cell) that denote a missing value.
pub const MISSING_VALUE_TOKENS: [&str; 11] = [
    "nan",
    "na",
    "n/a",
    "none",
    "null",
    "missing",
    "miss",
    "unknow",
    "unk",
    "-999",
    "not available",
];

/// Returns `true` if `text` is a missing-value token, ignoring case.
///
/// The match is exact: surrounding whitespace or extra characters disqualify the text.
pub fn is_missing_token(text: &str) -> bool {
    let lowered = text.to_lowercase();
    MISSING_VALUE_TOKENS.contains(&lowered.as_str())
}

/// Returns `true` if the cell is absent or its canonical text is a missing-value token.
pub fn is_missing(cell: &Cell) -> bool {
    match cell {
        Cell::Absent => true,
        Cell::Text(s) => is_missing_token(s),
        other => is_missing_token(&other.to_text()),
    }
}

/// Replace every missing-value cell with [`Cell::Absent`]; all other cells are cloned unchanged.
pub fn normalize(cells: &[Cell]) -> Vec<Cell> {
    cells
        .iter()
        .map(|cell| if is_missing(cell) { Cell::Absent } else { cell.clone() })
        .collect()
}
