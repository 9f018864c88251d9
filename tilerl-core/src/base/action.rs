//! Action set of the sliding-tile puzzle.
use serde::{Deserialize, Serialize};
use std::fmt;

/// A move on the board.
///
/// The discriminant order is the index order of model outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Slide tiles up.
    Up,

    /// Slide tiles down.
    Down,

    /// Slide tiles left.
    Left,

    /// Slide tiles right.
    Right,
}

impl Action {
    /// Number of actions.
    pub const COUNT: usize = 4;

    /// All actions ordered by index.
    pub const ALL: [Action; Action::COUNT] =
        [Action::Up, Action::Down, Action::Left, Action::Right];

    /// Returns the index of the action in model outputs.
    pub fn index(self) -> usize {
        match self {
            Action::Up => 0,
            Action::Down => 1,
            Action::Left => 2,
            Action::Right => 3,
        }
    }

    /// Returns the action of the given index, if any.
    pub fn from_index(ix: usize) -> Option<Self> {
        Self::ALL.get(ix).copied()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Up => "up",
            Action::Down => "down",
            Action::Left => "left",
            Action::Right => "right",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::Action;

    #[test]
    fn test_index_table() {
        for (i, a) in Action::ALL.iter().enumerate() {
            assert_eq!(a.index(), i);
            assert_eq!(Action::from_index(i), Some(*a));
        }
        assert_eq!(Action::from_index(Action::COUNT), None);
        assert_eq!(Action::Left.to_string(), "left");
    }
}
