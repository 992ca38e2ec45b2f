/*!
The trail: assignments in the order they were made.

The trail is append-only between backjumps, and FIFO with respect to
propagation: `q_head` points at the next literal whose consequences are to
be examined, so literals before `q_head` have been propagated and literals
at or after it are queued. Propagation drains the queue to quiescence or
pins `q_head` to the end of the trail on a conflict, to inhibit further
work before the conflict is handled.

`level_indices` holds, for each decision level, the index of its first
trail entry. Level zero (root facts) has no entry --- its literals are
those before `level_indices[0]`.
*/

use crate::{db::LevelIndex, structures::literal::CLiteral};

#[derive(Default)]
pub struct Trail {
    /// Assigned literals, in assignment order.
    pub literals: Vec<CLiteral>,

    /// For each decision level, the trail index at which the level begins.
    pub level_indices: Vec<usize>,

    /// The next literal to propagate.
    pub q_head: usize,
}

impl Trail {
    /// The current decision level.
    pub fn level(&self) -> LevelIndex {
        self.level_indices.len() as LevelIndex
    }

    /// Opens a fresh decision level at the current end of the trail.
    pub fn push_level(&mut self) {
        self.level_indices.push(self.literals.len());
    }

    /// True if any decision or assumption is active.
    pub fn decision_is_made(&self) -> bool {
        !self.level_indices.is_empty()
    }

    /// The assignments made at the (current) top level, in order of
    /// assignment.
    pub fn top_level_assignments(&self) -> &[CLiteral] {
        if let Some(&level_start) = self.level_indices.last() {
            &self.literals[level_start..]
        } else {
            &[]
        }
    }

    /// Removes levels above `level`, returning the literals they assigned.
    ///
    /// # Soundness
    /// Does not clear the *valuation* of the removed assignments --- the
    /// engine does so, as only it holds the valuation.
    pub fn clear_assignments_above(&mut self, level: LevelIndex) -> Vec<CLiteral> {
        if let Some(&level_start) = self.level_indices.get(level as usize) {
            self.level_indices.truncate(level as usize);
            let removed = self.literals.split_off(level_start);
            self.q_head = self.literals.len();
            removed
        } else {
            Vec::default()
        }
    }
}
