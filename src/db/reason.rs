/*!
The reason a literal holds on the current valuation.

Reasons reconstruct the clause which forced a literal without storing the
clause itself: a binary reason carries the other literal, a ternary reason
carries both others, and a long reason carries the arena offset of the
clause together with which of its two watches asserted. Offsets are used
rather than addresses as the arena guarantees offsets are stable while
addresses are not.

A [Reason] doubles as the conflict descriptor returned by propagation: the
clause identified by the reason is, in that case, unsatisfied rather than
asserting.

The implication graph formed by reasons is acyclic by construction ---
every literal of a reason was assigned strictly earlier on the trail than
the literal it forced.
*/

use crate::{db::arena::ClauseOffset, structures::literal::CLiteral};

/// Why a literal holds, or which clause conflicts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reason {
    /// No reason is recorded --- the variable is unassigned.
    None,

    /// A decision, or a unit fact at the root level.
    Unary,

    /// A binary clause; the other literal of the clause is given.
    Binary(CLiteral),

    /// A ternary clause; the other two literals of the clause are given.
    Ternary(CLiteral, CLiteral),

    /// A long clause at `offset`, asserting through watch `which`.
    Long {
        offset: ClauseOffset,
        which: bool,
    },
}

impl std::fmt::Display for Reason {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Unary => write!(f, "unary"),
            Self::Binary(other) => write!(f, "bin: {other}"),
            Self::Ternary(a, b) => write!(f, "tri: {a} {b}"),
            Self::Long { offset, which } => write!(f, "long: {offset} @{}", *which as u8),
        }
    }
}
