/*!
Watchlist utilities used by maintenance passes.

None of these participate in propagation. Sorting restores contiguous type
regions (binary, then ternary, then long) for passes which walk one region
of every list; the counting and enumeration helpers serve statistics,
scheduling, and diagnostics in an outer loop.
*/

use std::fmt::Write as _;

use crate::{
    db::watches::Watcher,
    engine::PropEngine,
    structures::literal::{CLiteral, Literal},
};

impl PropEngine {
    /// Sorts every watchlist by watcher type (binary, ternary, long) and
    /// by payload within type.
    ///
    /// Propagation is indifferent to watchlist order; maintenance passes
    /// which rely on contiguous type regions call this first.
    pub fn sort_watches(&mut self) {
        self.watches.sort_all();
    }

    /// A count of binary clauses present in the watchlists, by learntness
    /// class.
    ///
    /// Every binary clause has exactly two watchers, so the watcher count
    /// is halved --- and its parity asserted, as an odd count means a
    /// half-attached clause.
    pub fn count_binary_clauses(&self, also_learnt: bool, also_nonlearnt: bool) -> u64 {
        let mut count: u64 = 0;

        for index in 0..self.watches.count() {
            for watcher in self.watches.list(index) {
                if let Watcher::Binary { learnt, .. } = watcher {
                    match learnt {
                        true => count += also_learnt as u64,
                        false => count += also_nonlearnt as u64,
                    }
                }
            }
        }

        assert_eq!(count % 2, 0);
        count / 2
    }

    /// A count of binary watchers in the list of `literal`, optionally
    /// including learnt binaries.
    pub fn get_bin_watch_size(&self, literal: CLiteral, also_learnt: bool) -> usize {
        self.watches
            .list(literal.index())
            .iter()
            .filter(|watcher| {
                matches!(watcher, Watcher::Binary { learnt, .. } if also_learnt || !learnt)
            })
            .count()
    }

    /// The unit literals of the trail: those established before the first
    /// decision. Empty if no decision is active.
    pub fn get_unitaries(&self) -> Vec<CLiteral> {
        match self.trail.level_indices.first() {
            Some(&first_decision) => self.trail.literals[..first_decision].to_vec(),
            None => Vec::default(),
        }
    }

    /// The watchlist of `literal`, one watcher per line, for diagnostics.
    pub fn watch_list_string(&self, literal: CLiteral) -> String {
        let mut string = String::default();
        for watcher in self.watches.list(literal.index()) {
            let _ = writeln!(string, "{watcher}");
        }
        string
    }
}
