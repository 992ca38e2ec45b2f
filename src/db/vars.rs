/*!
Per-variable records: assignment context, and probe-time implication data.

[VarData] is meaningful while the variable is assigned: which level the
assignment was made at and the [Reason](crate::db::reason::Reason) it was
made for. The elimination status is an exception --- it persists across
assignments, and gates attachment (a clause may not be attached over a
fully eliminated variable).

[PropData] is written only by [full propagation](crate::procedures::full)
and records how each literal assigned during the current probe was implied:
its ancestor in the implication graph anchored at the probe, whether the
implying step was learnt, and whether the literal was reached by a
synthesized hyper-binary (and, if so, whether that binary was actually
recorded or degenerated away).
*/

use crate::{
    db::{reason::Reason, LevelIndex},
    structures::literal::CLiteral,
};

/// The elimination status of a variable.
///
/// Attachment tolerates [None](ElimStatus::None) and
/// [PendingReplacement](ElimStatus::PendingReplacement) only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ElimStatus {
    /// Not eliminated.
    #[default]
    None,

    /// Queued for replacement by an equivalent literal.
    PendingReplacement,

    /// Eliminated from the formula.
    Eliminated,
}

/// Assignment context of a variable.
#[derive(Clone, Copy, Debug)]
pub struct VarData {
    /// The decision level of the current assignment. Meaningful only while
    /// the variable is assigned.
    pub level: LevelIndex,

    /// Why the current assignment holds.
    pub reason: Reason,

    /// Elimination status; persists across assignments.
    pub elim: ElimStatus,
}

impl Default for VarData {
    fn default() -> Self {
        VarData {
            level: 0,
            reason: Reason::None,
            elim: ElimStatus::None,
        }
    }
}

/// How a literal was implied during the current probe.
#[derive(Clone, Copy, Debug, Default)]
pub struct PropData {
    /// The literal this one was implied from; none for the probe itself.
    pub ancestor: Option<CLiteral>,

    /// Whether the implying step was learnt.
    pub learnt_step: bool,

    /// Whether the literal was reached through a synthesized hyper-binary.
    pub hyper_bin: bool,

    /// Set when a hyper-binary derivation degenerated to a single ancestor
    /// and no clause was recorded for it.
    pub hyper_bin_not_added: bool,
}
