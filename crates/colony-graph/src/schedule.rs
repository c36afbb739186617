//! The precomputed solution: an ordered list of simultaneous token moves.

use crate::graph::NodeIdx;

/// A token (ant) identifier as written in the input, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TokenId(pub u32);

impl TokenId {
    /// Position of this token in a zero-based token arena.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize - 1
    }
}

impl std::fmt::Display for TokenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// One token heading to one room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Step {
    pub token: TokenId,
    pub to: NodeIdx,
}

/// Everything that happens in one discrete time step.
///
/// Each token appears at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Move {
    steps: Vec<Step>,
}

impl Move {
    /// Create an empty move.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a step. Returns `false` (and leaves the move unchanged) if the
    /// token already moves in this step.
    pub fn push(&mut self, step: Step) -> bool {
        if self.steps.iter().any(|s| s.token == step.token) {
            return false;
        }
        self.steps.push(step);
        true
    }

    /// Steps in input order.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Number of tokens that move.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Moves in execution order. Immutable once parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveSchedule {
    moves: Vec<Move>,
}

impl MoveSchedule {
    /// Wrap parsed moves.
    pub fn new(moves: Vec<Move>) -> Self {
        Self { moves }
    }

    /// Get the move at index `i`.
    pub fn get(&self, i: usize) -> Option<&Move> {
        self.moves.get(i)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.moves.iter()
    }

    /// The first `n` moves (all of them if `n` is past the end).
    pub fn prefix(&self, n: usize) -> &[Move] {
        &self.moves[..n.min(self.moves.len())]
    }

    /// Number of moves.
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

impl<'a> IntoIterator for &'a MoveSchedule {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.iter()
    }
}
