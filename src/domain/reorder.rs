//! List reordering for galleries and quotes.

/// Why a move request was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    /// A position falls outside `1..=len`.
    OutOfRange {
        /// Number of items in the list.
        len: usize,
    },
    /// Source and destination are the same position.
    SamePosition,
}

/// Moves the item at one-based `from` so that it ends up at one-based `to`,
/// shifting the items in between.
///
/// # Errors
///
/// Returns [`MoveError`] when a position is out of range or both are equal.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> Result<(), MoveError> {
    let len = items.len();
    if from == 0 || to == 0 || from > len || to > len {
        return Err(MoveError::OutOfRange { len });
    }
    if from == to {
        return Err(MoveError::SamePosition);
    }

    let item = items.remove(from - 1);
    items.insert(to - 1, item);
    Ok(())
}
