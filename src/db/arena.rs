/*!
A clause arena: clause bodies behind stable offsets.

Clauses of three or more literals are stored here; unit clauses are facts
on the trail and binary clauses exist only as watchlist entries. A stored
clause carries its literals, a learnt flag, a clause number, and the
[statistics record](ClauseStats) read by the
[clause-lifetime predictor](crate::predict).

# Offsets

An offset identifies a clause for the lifetime of the arena. Reasons and
long watchers hold offsets, never addresses, so the arena is free to keep
bodies wherever it likes. A clause body may be *shrunk* in place (its
offset and number are unchanged); it is the caller's task to detach before
shrinking below the watched positions and to re-attach afterwards, as
watches are not repaired here.

# Numbers

Each clause also receives a small dense number at allocation, used to key
the [meta table](crate::db::ClauseMeta). Offsets and numbers coincide in
this arena, but the two are kept distinct in the types: an offset locates a
body, a number keys side tables.
*/

use serde::{Deserialize, Serialize};

use crate::structures::literal::CLiteral;

/// The location of a clause body in the arena.
pub type ClauseOffset = u32;

/// Statistics kept per stored clause, read by the clause-lifetime
/// predictor and maintained by the outer loop as conflicts accumulate.
///
/// Several fields are undefined for ternary resolvents, which is recorded
/// by `is_ternary_resolvent` and respected during feature construction.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ClauseStats {
    /// Current glue (distinct decision levels), as most recently updated.
    pub glue: u32,

    /// Glue at introduction. Never 1: a glue of 1 at introduction would
    /// make the clause asserting at the root.
    pub orig_glue: u32,

    /// Glue before clause minimization. Undefined for ternary resolvents.
    pub glue_before_minim: u32,

    /// Long-horizon glue history at introduction. Undefined for ternary
    /// resolvents.
    pub glue_hist_long: f32,

    /// The conflict count when the clause was introduced.
    pub introduced_at_conflict: u64,

    /// The conflict count when the clause last participated.
    pub last_touched: u64,

    /// Time-to-live scheduling state.
    pub ttl_stats: i32,

    /// Propagations made in the current scoring window.
    pub props_made: u32,

    /// Propagations made over the clause's lifetime.
    pub sum_props_made: u64,

    /// Exponentially discounted propagation count.
    pub discounted_props_made: f32,

    /// Conflicts the clause participated in during the current window.
    pub conflicts_made: u32,

    /// How often the clause was the first unique implication point, over
    /// its lifetime.
    pub sum_uip1_used: u64,

    /// Exponentially discounted first-UIP count (third discount rate).
    pub discounted_uip1_used3: f32,

    /// Antecedents resolved to produce the clause. Undefined for ternary
    /// resolvents.
    pub num_antecedents: u32,

    /// Total literals across those antecedents. Undefined for ternary
    /// resolvents.
    pub num_total_lits_antecedents: u32,

    /// Resolution-count history at introduction. Undefined for ternary
    /// resolvents.
    pub num_resolutions_hist_lt: u32,

    /// Whether the clause was produced by ternary resolution.
    pub is_ternary_resolvent: bool,
}

/// A clause body stored in the arena.
#[derive(Clone, Debug)]
pub struct StoredClause {
    literals: Vec<CLiteral>,
    learnt: bool,
    num: u32,

    /// Statistics read by the clause-lifetime predictor.
    pub stats: ClauseStats,
}

impl StoredClause {
    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// The literal at `index`.
    ///
    /// # Panics
    /// If `index` is out of bounds --- the watched positions of an attached
    /// clause are always in bounds.
    pub fn literal(&self, index: usize) -> CLiteral {
        self.literals[index]
    }

    pub fn literals(&self) -> &[CLiteral] {
        &self.literals
    }

    pub fn learnt(&self) -> bool {
        self.learnt
    }

    /// The clause number, keying the meta table.
    pub fn num(&self) -> u32 {
        self.num
    }

    /// Shrinks the clause to its first `len` literals, in place.
    ///
    /// The offset and number are unchanged. Watches are *not* repaired:
    /// detach under the old watchers first, re-attach after.
    pub fn shrink_to(&mut self, len: usize) {
        debug_assert!(3 <= len && len <= self.literals.len());
        self.literals.truncate(len);
    }
}

/// The clause arena.
#[derive(Default)]
pub struct ClauseArena {
    bodies: Vec<StoredClause>,
}

impl ClauseArena {
    /// Stores a clause, returning its offset. Requires three or more
    /// literals --- shorter clauses never reach the arena.
    pub fn store(&mut self, literals: Vec<CLiteral>, learnt: bool) -> ClauseOffset {
        debug_assert!(literals.len() >= 3);
        let offset = self.bodies.len() as ClauseOffset;
        self.bodies.push(StoredClause {
            literals,
            learnt,
            num: offset,
            stats: ClauseStats::default(),
        });
        offset
    }

    /// The clause at `offset`.
    ///
    /// # Panics
    /// If no clause was ever stored at `offset` --- offsets held by
    /// watchers and reasons are valid by construction.
    pub fn get(&self, offset: ClauseOffset) -> &StoredClause {
        &self.bodies[offset as usize]
    }

    pub fn get_mut(&mut self, offset: ClauseOffset) -> &mut StoredClause {
        &mut self.bodies[offset as usize]
    }

    /// A count of stored clauses.
    pub fn count(&self) -> usize {
        self.bodies.len()
    }

    /// A raw pointer to the clause body, for memory prefetch hints only.
    pub fn body_ptr(&self, offset: ClauseOffset) -> *const StoredClause {
        &self.bodies[offset as usize]
    }
}
