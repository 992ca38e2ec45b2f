/*!
Boolean constraint propagation over the watchlists.

# Overview

[propagate](PropEngine::propagate) drains the trail from the propagation
cursor. For each dequeued literal *p* the list `watches[p]` is traversed
once, and rewritten in place while traversed: a read cursor walks every
entry, a write cursor trails behind it, entries which stay are copied
forward and entries relocated to another list are simply not copied. On a
conflict the remaining entries are copied verbatim, the list is truncated
at the write cursor, and the cursor into the trail is pinned to its end so
no further work is attempted before the conflict is handled.

Per entry:
- A binary watcher is always kept. The embedded other literal is enqueued
  if unvalued, and closes a conflict if unsatisfied.
- A ternary watcher is always kept. With one embedded literal unvalued and
  the other unsatisfied, the unvalued literal is enqueued; with both
  unsatisfied, the clause conflicts.
- A long watcher is kept if its blocker witnesses satisfaction, or if the
  clause's other watched literal does. Otherwise the clause body is
  scanned for a non-unsatisfied literal outside the two watched positions:
  if one is found the watch moves there (the meta entry is updated, a
  watcher is pushed to the new literal's list, and the current entry is
  dropped); if none is found the clause is asserting or unsatisfied
  through its other watch.

# Complications

The list under traversal is reached through a pointer
([list_unchecked_mut](crate::db::watches::Watches::list_unchecked_mut)),
as the engine is borrowed mutably *while* the list is held: to value and
enqueue literals, to update clause meta entries, and to push relocated
watchers. The borrowed list itself is never touched through the engine
within the loop: a relocated watcher is pushed to the list of ¬*c*[*k*]
for a candidate *c*[*k*] whose value is not 'false', while every literal
of `watches[p]`'s own list index has just been falsified by *p* --- so the
destination is always some other list. The same argument covers the
prefetch peek, which only reads ahead within the held list.

# Prefetch

While the read cursor is at *i*, the entry at *i* + 3 is peeked: if it is a
long watcher whose blocker is not already satisfied, its clause body is
requested from memory early. A hint only, behind
[Config::prefetch](crate::config::Config::prefetch).
*/

use crate::{
    db::{reason::Reason, watches::Watcher},
    engine::PropEngine,
    misc::log::targets::{self},
    structures::literal::{CLiteral, Literal},
};

/// Whether a unit derivation enqueues plainly or through hyper-binary
/// synthesis anchored at a probe.
#[derive(Clone, Copy)]
pub(crate) enum PropMode {
    Simple,
    Hyper { root: CLiteral },
}

/// The outcome of examining one long watcher.
pub(crate) enum LongResult {
    /// The entry stays in the list.
    Kept,

    /// The watch moved to another list; the entry is dropped here.
    Relocated,

    /// The clause is unsatisfied. The entry stays in the list.
    Conflict(Reason),
}

impl PropEngine {
    /// Propagates queued literals to quiescence or to the first conflict,
    /// returning the conflicting clause's reason form if one is found.
    ///
    /// Once quiescent, a further call returns immediately: the cursor
    /// stands at the end of the trail.
    pub fn propagate(&mut self) -> Option<Reason> {
        let mut conflict = None;

        'trail: while self.trail.q_head < self.trail.literals.len() {
            let p = self.trail.literals[self.trail.q_head];
            self.trail.q_head += 1;
            self.counters.propagations += 1;
            log::trace!(target: targets::PROPAGATION, "Propagating {p}.");

            // Safety: see the module notes on aliasing.
            let list = unsafe { &mut *self.watches.list_unchecked_mut(p.index()) };
            self.counters.bogo_props += list.len() as u64 / 4 + 1;

            let end = list.len();
            let mut read = 0;
            let mut write = 0;

            'list: while read < end {
                if self.config.prefetch {
                    self.prefetch_ahead(list, read + 3);
                }

                let watcher = list[read];
                match watcher {
                    Watcher::Binary { other, .. } => {
                        list[write] = watcher;
                        write += 1;

                        match self.value_of(other) {
                            None => {
                                self.counters.props_bin += 1;
                                self.enqueue(other, Reason::Binary(-p));
                            }

                            Some(true) => {}

                            Some(false) => {
                                conflict = Some(Reason::Binary(-p));
                                self.fail_bin_lit = Some(other);
                                self.trail.q_head = self.trail.literals.len();
                                read += 1;
                                break 'list;
                            }
                        }
                    }

                    Watcher::Ternary { other_a, other_b } => {
                        list[write] = watcher;
                        write += 1;

                        if let Err(found) =
                            self.prop_ternary(p, other_a, other_b, PropMode::Simple)
                        {
                            conflict = Some(found);
                            read += 1;
                            break 'list;
                        }
                    }

                    Watcher::Long {
                        offset,
                        blocker,
                        which,
                    } => match self.prop_long(p, offset, blocker, which, PropMode::Simple) {
                        LongResult::Relocated => {}

                        LongResult::Kept => {
                            list[write] = watcher;
                            write += 1;
                        }

                        LongResult::Conflict(found) => {
                            list[write] = watcher;
                            write += 1;
                            conflict = Some(found);
                            read += 1;
                            break 'list;
                        }
                    },
                }

                read += 1;
            }

            while read < end {
                list[write] = list[read];
                write += 1;
                read += 1;
            }
            list.truncate(write);

            if conflict.is_some() {
                break 'trail;
            }
        }

        conflict
    }

    /// Propagation restricted to watchers of non-learnt binary clauses.
    ///
    /// Computes the non-learnt binary implication closure of the queued
    /// literals without touching the clause arena; used by preprocessing.
    pub fn propagate_nonlearnt_bin(&mut self) -> Option<Reason> {
        while self.trail.q_head < self.trail.literals.len() {
            let p = self.trail.literals[self.trail.q_head];
            self.trail.q_head += 1;

            // Binary watchers are never relocated, so the list may be
            // re-borrowed per entry and no compaction is needed.
            for index in 0..self.watches.list(p.index()).len() {
                let Watcher::Binary {
                    other,
                    learnt: false,
                } = self.watches.list(p.index())[index]
                else {
                    continue;
                };

                match self.value_of(other) {
                    None => {
                        self.counters.props_bin += 1;
                        self.enqueue(other, Reason::Binary(-p));
                    }

                    Some(true) => {}

                    Some(false) => {
                        self.fail_bin_lit = Some(other);
                        self.trail.q_head = self.trail.literals.len();
                        return Some(Reason::Binary(-p));
                    }
                }
            }
        }

        None
    }

    /// Examines one ternary watcher of *p*, enqueuing per `mode` if the
    /// clause asserts. `Err` carries the conflict, if the clause is
    /// unsatisfied.
    pub(crate) fn prop_ternary(
        &mut self,
        p: CLiteral,
        other_a: CLiteral,
        other_b: CLiteral,
        mode: PropMode,
    ) -> Result<(), Reason> {
        let val_a = self.value_of(other_a);
        if val_a == Some(true) {
            return Ok(());
        }
        let val_b = self.value_of(other_b);

        if val_a.is_none() && val_b == Some(false) {
            self.counters.props_tri += 1;
            match mode {
                PropMode::Simple => self.enqueue(other_a, Reason::Ternary(-p, other_b)),
                PropMode::Hyper { root } => self.add_hyper_bin_pair(root, other_a, -p, other_b),
            }
        } else if val_a == Some(false) && val_b.is_none() {
            self.counters.props_tri += 1;
            match mode {
                PropMode::Simple => self.enqueue(other_b, Reason::Ternary(-p, other_a)),
                PropMode::Hyper { root } => self.add_hyper_bin_pair(root, other_b, -p, other_a),
            }
        } else if val_a == Some(false) && val_b == Some(false) {
            self.fail_bin_lit = Some(other_a);
            self.trail.q_head = self.trail.literals.len();
            return Err(Reason::Ternary(-p, other_b));
        }

        Ok(())
    }

    /// Examines one long watcher of *p*: keeps, relocates, enqueues per
    /// `mode`, or reports the clause unsatisfied.
    pub(crate) fn prop_long(
        &mut self,
        p: CLiteral,
        offset: crate::db::arena::ClauseOffset,
        blocker: CLiteral,
        which: bool,
        mode: PropMode,
    ) -> LongResult {
        if self.value_of(blocker) == Some(true) {
            return LongResult::Kept;
        }
        self.counters.bogo_props += 4;

        let slot = usize::from(which);
        let (num, other, learnt, found) = {
            let clause = self.arena.get(offset);
            let num = clause.num() as usize;
            let meta = &self.clause_meta[num];
            debug_assert_eq!(clause.literal(meta.watch[slot] as usize), -p);

            let other = clause.literal(meta.watch[1 - slot] as usize);
            if self.value_of(other) == Some(true) {
                return LongResult::Kept;
            }

            let mut found = None;
            for index in 0..clause.len() {
                if index as u32 == meta.watch[0] || index as u32 == meta.watch[1] {
                    continue;
                }
                if self.value_of(clause.literal(index)) != Some(false) {
                    found = Some((index, clause.literal(index)));
                    break;
                }
            }

            (num, other, clause.learnt(), found)
        };

        match found {
            Some((index, fresh)) => {
                let meta = &mut self.clause_meta[num];
                meta.watch[slot] = index as u32;
                meta.num_lit_visited += index as u32;
                self.counters.bogo_props += index as u64 / 10;

                self.watches.push(
                    (-fresh).index(),
                    Watcher::Long {
                        offset,
                        blocker: other,
                        which,
                    },
                );

                LongResult::Relocated
            }

            None => {
                // Unit under the assignment, or unsatisfied.
                let len = self.arena.get(offset).len() as u32;
                let meta = &mut self.clause_meta[num];
                meta.num_lit_visited += len;
                meta.num_prop_and_confl += 1;
                self.counters.bogo_props += len as u64 / 10;

                if self.value_of(other) == Some(false) {
                    self.trail.q_head = self.trail.literals.len();
                    LongResult::Conflict(Reason::Long {
                        offset,
                        which: !which,
                    })
                } else {
                    match learnt {
                        true => self.counters.props_long_red += 1,
                        false => self.counters.props_long_irred += 1,
                    }
                    self.arena.get_mut(offset).stats.props_made += 1;

                    match mode {
                        PropMode::Simple => self.enqueue(
                            other,
                            Reason::Long {
                                offset,
                                which: !which,
                            },
                        ),
                        PropMode::Hyper { root } => self.add_hyper_bin_clause(root, other, offset),
                    }

                    LongResult::Kept
                }
            }
        }
    }

    #[allow(unused_variables)]
    fn prefetch_ahead(&self, list: &[Watcher], index: usize) {
        if let Some(Watcher::Long {
            offset, blocker, ..
        }) = list.get(index)
        {
            if self.value_of(*blocker) != Some(true) {
                #[cfg(target_arch = "x86_64")]
                // Safety: the pointer is valid; the hint has no observable
                // effect on memory.
                unsafe {
                    use core::arch::x86_64::{_mm_prefetch, _MM_HINT_T0};
                    _mm_prefetch::<{ _MM_HINT_T0 }>(self.arena.body_ptr(*offset) as *const i8);
                }
            }
        }
    }
}
