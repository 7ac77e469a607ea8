use core::str::FromStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::*;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    #[error("board definition is empty")]
    Empty,
    #[error("line {line}: expected `ROWSxCOLS` or a row count")]
    MalformedDimensions { line: usize },
    #[error("line {line}: `{text}` is not a valid dimension")]
    InvalidNumber { line: usize, text: String },
    #[error("missing column count after row count")]
    MissingColumns,
}

/// Board size and card values in row-major order, before shuffling.
///
/// The text form starts with a `ROWSxCOLS` line, or a bare row count followed
/// by a bare column count on the next line. Every later non-blank line is one
/// card value. Blank lines are ignored and values are trimmed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardDefinition {
    pub size: Coord2,
    pub values: Vec<String>,
}

impl BoardDefinition {
    pub fn config(&self) -> BoardConfig {
        BoardConfig::new(self.size)
    }

    /// Deals the values into a layout, checking the card count against the
    /// declared size.
    pub fn into_layout(self, dealer: impl CardDealer) -> Result<CardLayout> {
        CardLayout::deal(self.size, self.values, dealer)
    }
}

impl FromStr for BoardDefinition {
    type Err = DefinitionError;

    fn from_str(text: &str) -> core::result::Result<Self, Self::Err> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(index, line)| (index + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty());

        let (line, first) = lines.next().ok_or(DefinitionError::Empty)?;
        let size = match first.split_once('x') {
            Some((rows, cols)) => {
                let (rows, cols) = (rows.trim(), cols.trim());
                if rows.is_empty() || cols.is_empty() {
                    return Err(DefinitionError::MalformedDimensions { line });
                }
                (parse_dimension(line, rows)?, parse_dimension(line, cols)?)
            }
            None => {
                let rows = parse_dimension(line, first)?;
                let (line, cols) = lines.next().ok_or(DefinitionError::MissingColumns)?;
                (rows, parse_dimension(line, cols)?)
            }
        };

        let values = lines.map(|(_, value)| value.to_owned()).collect();
        Ok(Self { size, values })
    }
}

fn parse_dimension(line: usize, text: &str) -> core::result::Result<Coord, DefinitionError> {
    text.parse().map_err(|_| DefinitionError::InvalidNumber {
        line,
        text: text.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_compact_dimensions() {
        let def: BoardDefinition = "2x2\nA\nB\n\nA\nB\n".parse().unwrap();

        assert_eq!(def.size, (2, 2));
        assert_eq!(def.values, vec!["A", "B", "A", "B"]);
    }

    #[test]
    fn parses_split_dimensions() {
        let def: BoardDefinition = "\n  3\n1\n🦄\n🦄\n🌈\n".parse().unwrap();

        assert_eq!(def.size, (3, 1));
        assert_eq!(def.values, vec!["🦄", "🦄", "🌈"]);
    }

    #[test]
    fn tolerates_windows_line_endings() {
        let def: BoardDefinition = "1x2\r\nA\r\nA\r\n".parse().unwrap();

        assert_eq!(def.size, (1, 2));
        assert_eq!(def.values, vec!["A", "A"]);
    }

    #[test]
    fn rejects_empty_text() {
        assert_eq!("\n  \n".parse::<BoardDefinition>(), Err(DefinitionError::Empty));
    }

    #[test]
    fn rejects_malformed_dimensions() {
        assert_eq!(
            "3x\nA\n".parse::<BoardDefinition>(),
            Err(DefinitionError::MalformedDimensions { line: 1 })
        );
    }

    #[test]
    fn rejects_non_numeric_dimensions() {
        assert_eq!(
            "threexfour\n".parse::<BoardDefinition>(),
            Err(DefinitionError::InvalidNumber {
                line: 1,
                text: "three".to_owned()
            })
        );
        assert_eq!(
            "2\n\ntwo\n".parse::<BoardDefinition>(),
            Err(DefinitionError::InvalidNumber {
                line: 3,
                text: "two".to_owned()
            })
        );
        assert!(matches!(
            "2x4x5\n".parse::<BoardDefinition>(),
            Err(DefinitionError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn rejects_missing_column_line() {
        assert_eq!(
            "4\n".parse::<BoardDefinition>(),
            Err(DefinitionError::MissingColumns)
        );
    }

    #[test]
    fn card_count_is_checked_when_dealing() {
        let def: BoardDefinition = "2x2\nA\nA\nB\n".parse().unwrap();

        assert_eq!(
            def.into_layout(OrderedDealer),
            Err(BoardError::CardCountMismatch {
                expected: 4,
                actual: 3
            })
        );
    }
}
