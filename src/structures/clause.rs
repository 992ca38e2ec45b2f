/*!
Clauses, as passed across the crate boundary, and standalone binary clauses.

A clause handed to the engine is a vector of literals --- the canonical
[CClause]. Once stored, a clause lives in the
[arena](crate::db::arena::ClauseArena) and is addressed by offset; binary
clauses never reach the arena and exist only as watchlist entries, so a
standalone record ([BinaryClause]) is used wherever a binary clause must be
named outside the watchlists (the redundant-binary set and the pending
hyper-binary set of [full propagation](crate::procedures::full)).
*/

use crate::structures::literal::CLiteral;

/// The canonical representation of a clause.
pub type CClause = Vec<CLiteral>;

/// A binary clause, named independently of the watchlists.
///
/// The two literals are kept in their [Ord] order so that the same clause
/// compares equal however it was derived.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct BinaryClause {
    lit_a: CLiteral,
    lit_b: CLiteral,
    learnt: bool,
}

impl BinaryClause {
    pub fn new(a: CLiteral, b: CLiteral, learnt: bool) -> Self {
        let (lit_a, lit_b) = if a <= b { (a, b) } else { (b, a) };
        Self {
            lit_a,
            lit_b,
            learnt,
        }
    }

    /// The lesser literal of the clause.
    pub fn lit_a(&self) -> CLiteral {
        self.lit_a
    }

    /// The greater literal of the clause.
    pub fn lit_b(&self) -> CLiteral {
        self.lit_b
    }

    pub fn learnt(&self) -> bool {
        self.learnt
    }
}

impl std::fmt::Display for BinaryClause {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} {}", self.lit_a, self.lit_b)
    }
}
