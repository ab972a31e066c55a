//! Replay string codec.
//!
//! A finished match serializes to one base-36 digit per move, in play
//! order. Loading a match replays that string against a fresh board with
//! the same configuration; because the engine is deterministic, the replay
//! reproduces the exact terminal grid and victor.

use thiserror::Error;

/// Errors decoding a replay string. Decoding stops at the first bad digit;
/// the match falls back to live input from there.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum ReplayError {
    #[error("'{found}' at position {position} is not a base-36 digit")]
    BadDigit { position: usize, found: char },
}

/// Encode a move history as one lowercase base-36 digit per column index.
///
/// Board columns are capped far below 36, so every index encodes to a
/// single character.
#[must_use]
pub fn encode(history: &[usize]) -> String {
    history
        .iter()
        .filter_map(|&column| char::from_digit(column as u32, 36))
        .collect()
}

/// Lazily decodes a replay string one move at a time.
///
/// The cursor never touches a board: the match runner pulls one column per
/// turn, applies it itself, and abandons the cursor on the first decode
/// error or rejected move.
#[derive(Clone, Debug)]
pub struct ReplayCursor {
    moves: Vec<char>,
    position: usize,
}

impl ReplayCursor {
    #[must_use]
    pub fn new(encoded: &str) -> Self {
        Self {
            moves: encoded.trim().chars().collect(),
            position: 0,
        }
    }

    /// Index of the next character to decode.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn exhausted(&self) -> bool {
        self.position >= self.moves.len()
    }

    /// Decode the next column index. `None` once the string is spent.
    /// Decoding is case-insensitive even though encoding is lowercase.
    pub fn next_column(&mut self) -> Option<Result<usize, ReplayError>> {
        let found = *self.moves.get(self.position)?;
        let position = self.position;
        self.position += 1;
        Some(
            found
                .to_digit(36)
                .map(|digit| digit as usize)
                .ok_or(ReplayError::BadDigit { position, found }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_one_digit_per_move() {
        assert_eq!(encode(&[0, 6, 1, 6, 2, 6, 3]), "0616263");
        assert_eq!(encode(&[]), "");
        // Columns 10..=15 use letter digits.
        assert_eq!(encode(&[10, 15]), "af");
    }

    #[test]
    fn test_cursor_yields_columns_in_order() {
        let mut cursor = ReplayCursor::new("0a3");
        assert_eq!(cursor.next_column(), Some(Ok(0)));
        assert_eq!(cursor.next_column(), Some(Ok(10)));
        assert_eq!(cursor.next_column(), Some(Ok(3)));
        assert_eq!(cursor.next_column(), None);
        assert!(cursor.exhausted());
    }

    #[test]
    fn test_cursor_trims_surrounding_whitespace() {
        let mut cursor = ReplayCursor::new("  12 ");
        assert_eq!(cursor.next_column(), Some(Ok(1)));
        assert_eq!(cursor.next_column(), Some(Ok(2)));
        assert_eq!(cursor.next_column(), None);
    }

    #[test]
    fn test_cursor_reports_bad_digit_with_position() {
        let mut cursor = ReplayCursor::new("01!2");
        assert_eq!(cursor.next_column(), Some(Ok(0)));
        assert_eq!(cursor.next_column(), Some(Ok(1)));
        assert_eq!(
            cursor.next_column(),
            Some(Err(ReplayError::BadDigit {
                position: 2,
                found: '!'
            }))
        );
        // The cursor keeps going past the bad digit; the caller decides
        // whether to abandon it.
        assert_eq!(cursor.next_column(), Some(Ok(2)));
    }

    #[test]
    fn test_decode_accepts_uppercase() {
        let mut cursor = ReplayCursor::new("A");
        assert_eq!(cursor.next_column(), Some(Ok(10)));
    }

    #[test]
    fn test_round_trip() {
        let history = vec![3, 3, 2, 4, 0, 15, 6];
        let mut cursor = ReplayCursor::new(&encode(&history));
        let mut decoded = Vec::new();
        while let Some(step) = cursor.next_column() {
            decoded.push(step.unwrap());
        }
        assert_eq!(decoded, history);
    }
}
