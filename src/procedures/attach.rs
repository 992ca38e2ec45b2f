/*!
Attach and detach: a clause's presence in the watchlists.

Clause forms are watched differently:
- A binary clause is two [Binary](Watcher::Binary) watchers, one in each
  negated-literal list, each embedding the other literal. Binary watchers
  are never relocated.
- A ternary clause is three [Ternary](Watcher::Ternary) watchers, one per
  negated literal, each embedding the other two literals. Also never
  relocated: every literal of the clause is watched.
- A long clause is two [Long](Watcher::Long) watchers over the two
  positions named in its [meta entry](crate::db::ClauseMeta), each carrying
  a blocker literal from inside the clause.

A clause attached at size 3 is canonically ternary. An arena clause shrunk
in place *to* size 3 remains long-attached until detached, which is the one
state in which clause size does not determine watcher form --- detach
resolves it with a presence check on the long watchlist.

# Watch symmetry

Attachment establishes, and detach unwinds, the symmetry the propagation
loop relies on: a binary watcher with payload *b* in the list of ¬*a*
always has a twin with payload *a* in the list of ¬*b*; the three ternary
watchers of a clause exist together; the two long watchers of a clause
refer to the positions in its meta entry.
*/

use crate::{
    db::{arena::ClauseOffset, watches::Watcher, ClauseMeta},
    engine::PropEngine,
    misc::log::targets::{self},
    structures::{
        clause::CClause,
        literal::{CLiteral, Literal},
    },
    types::err::WatchError,
};

impl PropEngine {
    /// Attaches the binary clause {`a`, `b`}.
    ///
    /// Each list receives its new watcher swapped in front of any
    /// non-binary entry.
    pub fn attach_binary(&mut self, a: CLiteral, b: CLiteral, learnt: bool) {
        debug_assert_ne!(a.var(), b.var());
        debug_assert!(self.elim_tolerates_attach(a));
        debug_assert!(self.elim_tolerates_attach(b));
        if self.config.check_attach {
            assert!(self.value_of_var(a.var()).is_none());
            assert_ne!(self.value_of(b), Some(true));
        }

        self.watches
            .push_binary_front((-a).index(), b, learnt);
        self.watches
            .push_binary_front((-b).index(), a, learnt);

        log::trace!(target: targets::ATTACH, "Attached binary {a} {b} learnt: {learnt}.");
    }

    /// Stores a clause of three or more literals in the arena, unattached.
    pub fn add_clause(&mut self, literals: CClause, learnt: bool) -> ClauseOffset {
        let offset = self.arena.store(literals, learnt);
        // Numbers are dense, so the meta table tracks the arena even for
        // ternary clauses, which never use their entry.
        self.clause_meta.push(ClauseMeta::default());
        offset
    }

    /// Attaches the stored clause at `offset`, watching positions `w0` and
    /// `w1`.
    ///
    /// A clause of exactly three literals is attached ternary and the
    /// requested positions are moot --- all three literals are watched.
    pub fn attach_clause(&mut self, offset: ClauseOffset, w0: u32, w1: u32) {
        let clause = self.arena.get(offset);
        let size = clause.len();
        debug_assert!(size >= 3);
        debug_assert_ne!(
            clause.literal(w0 as usize).var(),
            clause.literal(w1 as usize).var()
        );

        if size == 3 {
            let [a, b, c] = [clause.literal(0), clause.literal(1), clause.literal(2)];
            debug_assert!(
                self.elim_tolerates_attach(a)
                    && self.elim_tolerates_attach(b)
                    && self.elim_tolerates_attach(c)
            );

            self.watches.push(
                (-a).index(),
                Watcher::Ternary {
                    other_a: b,
                    other_b: c,
                },
            );
            self.watches.push(
                (-b).index(),
                Watcher::Ternary {
                    other_a: a,
                    other_b: c,
                },
            );
            self.watches.push(
                (-c).index(),
                Watcher::Ternary {
                    other_a: a,
                    other_b: b,
                },
            );

            log::trace!(target: targets::ATTACH, "Attached ternary {a} {b} {c}.");
            return;
        }

        let lit_0 = clause.literal(w0 as usize);
        let lit_1 = clause.literal(w1 as usize);
        // The blocker is the literal in the middle. For no reason --- any
        // literal of the clause will do.
        let blocker = clause.literal(size / 2);
        let num = clause.num();
        debug_assert!(clause
            .literals()
            .iter()
            .all(|l| self.elim_tolerates_attach(*l)));
        if self.config.check_attach {
            assert!(self.value_of_var(lit_0.var()).is_none());
            assert_ne!(self.value_of(lit_1), Some(true));
        }

        self.clause_meta[num as usize] = ClauseMeta::new(w0, w1);

        self.watches.push(
            (-lit_0).index(),
            Watcher::Long {
                offset,
                blocker,
                which: false,
            },
        );
        self.watches.push(
            (-lit_1).index(),
            Watcher::Long {
                offset,
                blocker,
                which: true,
            },
        );

        log::trace!(target: targets::ATTACH, "Attached long {offset} watching {lit_0} {lit_1}.");
    }

    /// Removes the stored clause at `offset` from the watchlists.
    ///
    /// A clause of (current) size 3 whose offset is absent from the long
    /// list of its first literal was attached ternary, and its watchers are
    /// removed by payload; otherwise the two long watchers named by the
    /// meta entry are removed by offset.
    pub fn detach(&mut self, offset: ClauseOffset) -> Result<(), WatchError> {
        let clause = self.arena.get(offset);
        let size = clause.len();

        if size == 3 {
            let [a, b, c] = [clause.literal(0), clause.literal(1), clause.literal(2)];
            if !self.watches.contains_long((-a).index(), offset) {
                self.watches.remove_ternary((-a).index(), b, c)?;
                self.watches.remove_ternary((-b).index(), a, c)?;
                self.watches.remove_ternary((-c).index(), a, b)?;
                log::trace!(target: targets::ATTACH, "Detached ternary {a} {b} {c}.");
                return Ok(());
            }
            // The clause only recently became 3-long: its long watchers are
            // still in place, under the first two literals.
            self.watches.remove_long((-a).index(), offset)?;
            self.watches.remove_long((-b).index(), offset)?;
            log::trace!(target: targets::ATTACH, "Detached shrunk long {offset}.");
            return Ok(());
        }

        let meta = self.clause_meta[clause.num() as usize];
        let lit_0 = clause.literal(meta.watch[0] as usize);
        let lit_1 = clause.literal(meta.watch[1] as usize);

        self.watches.remove_long((-lit_0).index(), offset)?;
        self.watches.remove_long((-lit_1).index(), offset)?;
        log::trace!(target: targets::ATTACH, "Detached long {offset}.");
        Ok(())
    }

    /// Whether the elimination status of the literal's variable tolerates
    /// attachment.
    pub(crate) fn elim_tolerates_attach(&self, literal: CLiteral) -> bool {
        use crate::db::vars::ElimStatus;
        matches!(
            self.var_data[literal.var() as usize].elim,
            ElimStatus::None | ElimStatus::PendingReplacement
        )
    }
}
