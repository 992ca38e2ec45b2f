/*!
The watchlist index: which clauses to revisit when a literal becomes true.

# Layout

For *V* variables there are 2*V* lists, addressed by
[literal index](crate::structures::literal::Literal::index). The list at
the index of literal *p* holds a watcher for every clause containing ¬*p*
at one of its (up to two) watched slots, so assigning *p* makes exactly the
clauses in that one list candidates for an update.

A watcher is a small tagged record, not a reference to one: dispatch in the
propagation loop is a discriminant check, and binary and ternary watchers
embed the whole remainder of their clause, so neither is ever followed to
clause storage. Long watchers carry the arena offset, a cached *blocker*
literal from inside the clause (a cheap satisfiability probe which often
saves the trip to the body), and which of the clause's two watches the
entry stands for.

# Ordering

At attach time binary watchers are swapped in front of any non-binary
watcher, so the cheap entries of a list are met first. This is a
convenience, not an invariant: propagation reorders lists while compacting
them and never depends on the sort. The derived order on [Watcher]
(Binary, then Ternary, then Long, each ordered by payload) is what
[sorting](crate::procedures::maintenance) restores for maintenance passes
that want contiguous type regions.

# Safety

The compaction loop of propagation mutates a list while the engine, which
owns this structure, is also borrowed mutably --- for enqueuing, and for
pushing relocated watchers to *other* lists. [Watches::list_unchecked_mut]
returns a pointer to make that explicit, as holding a `&mut` through the
engine would (rightly) be rejected by the borrow checker. The aliasing
argument is local to the propagation loop and documented there.
*/

use crate::{
    db::arena::ClauseOffset,
    structures::literal::CLiteral,
    types::err::WatchError,
};

/// A watchlist entry, tagged by clause form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Watcher {
    /// A binary clause: the other literal, and whether the clause is
    /// learnt.
    Binary { other: CLiteral, learnt: bool },

    /// A ternary clause, stored entirely inline: the other two literals.
    Ternary { other_a: CLiteral, other_b: CLiteral },

    /// A long clause at `offset`; `blocker` is a cached literal of the
    /// clause, `which` identifies the watch this entry represents.
    Long {
        offset: ClauseOffset,
        blocker: CLiteral,
        which: bool,
    },
}

impl Watcher {
    pub fn is_binary(&self) -> bool {
        matches!(self, Watcher::Binary { .. })
    }
}

impl std::fmt::Display for Watcher {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Binary { other, learnt } => write!(f, "bin: {other} learnt: {learnt}"),
            Self::Ternary { other_a, other_b } => write!(f, "tri: {other_a} {other_b}"),
            Self::Long { offset, blocker, which } => {
                write!(f, "long: {offset} blocker: {blocker} @{}", *which as u8)
            }
        }
    }
}

/// The watchlists, two per variable.
#[derive(Default)]
pub struct Watches {
    lists: Vec<Vec<Watcher>>,
}

impl Watches {
    /// Adds the two (empty) lists of a fresh variable.
    pub fn grow_for_var(&mut self) {
        self.lists.push(Vec::default());
        self.lists.push(Vec::default());
    }

    /// A count of lists (twice the variable count).
    pub fn count(&self) -> usize {
        self.lists.len()
    }

    /// The list at a literal index.
    pub fn list(&self, index: usize) -> &[Watcher] {
        &self.lists[index]
    }

    /// A pointer to the list at a literal index, for the compaction loop.
    ///
    /// # Safety
    /// No check is made that a list exists at `index`. The caller must also
    /// uphold the aliasing argument of the propagation loop: while the
    /// pointee is borrowed, no other access to *this* list is made through
    /// the engine.
    pub unsafe fn list_unchecked_mut(&mut self, index: usize) -> *mut Vec<Watcher> {
        self.lists.get_unchecked_mut(index)
    }

    /// Appends a watcher to the list at `index`.
    pub fn push(&mut self, index: usize, watcher: Watcher) {
        self.lists[index].push(watcher);
    }

    /// Appends a binary watcher and swaps it in front of any non-binary
    /// entry, keeping binaries front-loaded.
    pub fn push_binary_front(&mut self, index: usize, other: CLiteral, learnt: bool) {
        let list = &mut self.lists[index];
        list.push(Watcher::Binary { other, learnt });
        if let Some(slot) = list.iter().position(|w| !w.is_binary()) {
            let last = list.len() - 1;
            list.swap(slot, last);
        }
    }

    /// True if the list at `index` holds a long watcher for `offset`.
    pub fn contains_long(&self, index: usize, offset: ClauseOffset) -> bool {
        self.lists[index]
            .iter()
            .any(|w| matches!(w, Watcher::Long { offset: o, .. } if *o == offset))
    }

    /// Removes the long watcher for `offset` from the list at `index`.
    pub fn remove_long(&mut self, index: usize, offset: ClauseOffset) -> Result<(), WatchError> {
        let list = &mut self.lists[index];
        match list
            .iter()
            .position(|w| matches!(w, Watcher::Long { offset: o, .. } if *o == offset))
        {
            Some(slot) => {
                list.swap_remove(slot);
                Ok(())
            }
            None => Err(WatchError::MissingLong),
        }
    }

    /// Removes the ternary watcher with the given payload from the list at
    /// `index`. Ternary watchers are not keyed by offset, so removal is by
    /// payload comparison.
    pub fn remove_ternary(
        &mut self,
        index: usize,
        other_a: CLiteral,
        other_b: CLiteral,
    ) -> Result<(), WatchError> {
        let list = &mut self.lists[index];
        match list.iter().position(|w| {
            matches!(w, Watcher::Ternary { other_a: a, other_b: b }
                if (*a == other_a && *b == other_b) || (*a == other_b && *b == other_a))
        }) {
            Some(slot) => {
                list.swap_remove(slot);
                Ok(())
            }
            None => Err(WatchError::MissingTernary),
        }
    }

    /// Sorts every list by the derived watcher order: binaries, then
    /// ternaries, then longs by offset.
    pub fn sort_all(&mut self) {
        for list in &mut self.lists {
            list.sort();
        }
    }
}
