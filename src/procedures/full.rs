/*!
Full propagation: probe-time propagation with hyper-binary resolution.

# Theory

A *probe* is a tentative single-literal assignment made at decision level
one to discover facts: if propagating the probe conflicts, the probe's
negation is forced (a *failed literal*). Probing also exposes structure.
When a long chain of implications leads from the probe to some literal,
the two-literal clause {¬probe, literal} --- a *hyper-binary resolvent* ---
summarizes the chain, and once it exists some binary clauses along the way
may become transitively redundant.

Full propagation does the propagation of a probe and both of these
strengthenings at once. For every literal it assigns it records an
*ancestor* --- the literal it was implied from in the implication graph
anchored at the probe. A unit derivation from a ternary or long clause
finds the *dominator* of the clause's falsified literals (their deepest
common ancestor) and records the hyper-binary {¬dominator, literal} ---
unless the dominator is the probe itself, in which case the derivation is
already a direct implication from the probe and nothing is recorded.
A binary implication whose source is itself an implied literal records the
chain shortcut {¬probe, literal} and re-anchors its ancestor at the probe.
When two binary edges are found to imply the same literal, one of them is
redundant, and a retire policy (`remove_which`, below) chooses which (if
either) to mark.

# Phases

Watchers are drained in priority order:

- (a) non-learnt binary watchers,
- (b) learnt binary watchers,
- (c) ternary and long watchers.

Whenever phase (b) or (c) enqueues a literal, the loop restarts at phase
(a). Non-learnt binary implications are therefore exhausted before any
learnt or longer reasoning contributes a derivation, which keeps recorded
ancestry inside the non-learnt core whenever possible.

Each step either assigns a previously-unassigned literal (bounded by the
variable count), inserts into the redundant-binary set (bounded by the
database), or advances one of the three cursors --- so the loop
terminates.

# Outputs

On success the engine's pending hyper-binary set holds the clauses to
attach; `useless_bin` receives binaries found redundant. On conflict the
conflict is handed to the caller's [FailAnalysis] implementation and its
failed literal is returned. Either way the trail retains the probe's
consequences for the caller to inspect before backtracking.
*/

use std::collections::BTreeSet;

use crate::{
    db::{reason::Reason, vars::PropData, watches::Watcher},
    engine::PropEngine,
    misc::log::targets::{self},
    procedures::propagate::{LongResult, PropMode},
    structures::{
        clause::BinaryClause,
        literal::{CLiteral, Literal},
    },
};

/// Analysis of a failed probe --- an external collaborator.
///
/// Given the conflict met while propagating a probe, an implementation
/// derives the literal whose negation is forced. The engine calls this on
/// the conflict path of [propagate_full](PropEngine::propagate_full) only.
pub trait FailAnalysis {
    fn analyze_fail(&mut self, conflict: &Reason) -> CLiteral;
}

/// Which of two binary edges implying the same literal to retire.
enum Retire {
    /// The recorded edge: replace the literal's ancestor with the new
    /// source.
    Existing,

    /// The new edge: the recorded ancestry stands.
    Incoming,

    /// Neither --- the edges are not comparable.
    Neither,
}

impl PropEngine {
    /// Propagates a probe to quiescence or conflict, synthesizing
    /// hyper-binaries and collecting redundant binaries along the way.
    ///
    /// To be called with exactly one literal --- the probe --- enqueued at
    /// decision level one. Returns the failed literal on conflict, and
    /// nothing otherwise.
    pub fn propagate_full<A: FailAnalysis>(
        &mut self,
        useless_bin: &mut BTreeSet<BinaryClause>,
        analyzer: &mut A,
    ) -> Option<CLiteral> {
        debug_assert!(useless_bin.is_empty());
        debug_assert_eq!(self.trail.level(), 1);
        debug_assert_eq!(self.trail.top_level_assignments().len(), 1);

        let root = self.trail.literals[self.trail.q_head];
        log::trace!(target: targets::PROBE, "Probing {root}.");
        self.prop_data[root.var() as usize] = PropData::default();

        let mut nl_bin_head = self.trail.q_head;
        let mut l_bin_head = self.trail.q_head;
        self.need_to_add_bin_clause.clear();

        'restart: loop {
            // Phase (a): non-learnt binaries, to fixpoint.
            while nl_bin_head < self.trail.literals.len() {
                let p = self.trail.literals[nl_bin_head];
                nl_bin_head += 1;
                self.counters.bogo_props += 1;

                for index in 0..self.watches.list(p.index()).len() {
                    let Watcher::Binary {
                        other,
                        learnt: false,
                    } = self.watches.list(p.index())[index]
                    else {
                        continue;
                    };

                    if let Some(conflict) = self.prop_bin_full(root, p, other, false, useless_bin)
                    {
                        return Some(analyzer.analyze_fail(&conflict));
                    }
                }
            }

            // Phase (b): learnt binaries; any enqueue restarts at (a).
            while l_bin_head < self.trail.literals.len() {
                let p = self.trail.literals[l_bin_head];
                self.counters.bogo_props += 1;
                self.enqueued_something = false;

                for index in 0..self.watches.list(p.index()).len() {
                    let Watcher::Binary {
                        other,
                        learnt: true,
                    } = self.watches.list(p.index())[index]
                    else {
                        continue;
                    };

                    if let Some(conflict) = self.prop_bin_full(root, p, other, true, useless_bin) {
                        return Some(analyzer.analyze_fail(&conflict));
                    }

                    if self.enqueued_something {
                        continue 'restart;
                    }
                }

                l_bin_head += 1;
            }

            // Phase (c): ternary and long watchers, with unit derivations
            // routed through hyper-binary synthesis. Any enqueue restarts
            // at (a).
            while self.trail.q_head < self.trail.literals.len() {
                let p = self.trail.literals[self.trail.q_head];
                self.counters.bogo_props += 1;
                self.enqueued_something = false;
                let mut conflict = None;

                // Safety: see the aliasing notes of the propagate module.
                let list = unsafe { &mut *self.watches.list_unchecked_mut(p.index()) };
                let end = list.len();
                let mut read = 0;
                let mut write = 0;

                'list: while read < end {
                    let watcher = list[read];
                    match watcher {
                        Watcher::Binary { .. } => {
                            list[write] = watcher;
                            write += 1;
                        }

                        Watcher::Ternary { other_a, other_b } => {
                            list[write] = watcher;
                            write += 1;

                            if let Err(found) = self.prop_ternary(
                                p,
                                other_a,
                                other_b,
                                PropMode::Hyper { root },
                            ) {
                                conflict = Some(found);
                                read += 1;
                                break 'list;
                            }
                            if self.enqueued_something {
                                read += 1;
                                break 'list;
                            }
                        }

                        Watcher::Long {
                            offset,
                            blocker,
                            which,
                        } => {
                            match self.prop_long(p, offset, blocker, which, PropMode::Hyper { root })
                            {
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
                            }
                            if conflict.is_none() && self.enqueued_something {
                                read += 1;
                                break 'list;
                            }
                        }
                    }

                    read += 1;
                }

                while read < end {
                    list[write] = list[read];
                    write += 1;
                    read += 1;
                }
                list.truncate(write);

                if let Some(found) = conflict {
                    return Some(analyzer.analyze_fail(&found));
                }
                if self.enqueued_something {
                    continue 'restart;
                }

                self.trail.q_head += 1;
            }

            break 'restart;
        }

        None
    }

    /// Examines one binary watcher of *p* during full propagation.
    ///
    /// An unvalued other literal is enqueued --- directly if *p* is the
    /// probe, and through the chain shortcut {¬probe, literal} otherwise.
    /// An unsatisfied other literal closes a conflict. A satisfied other
    /// literal assigned within the probe marks a second implication path,
    /// and the retire policy decides which edge (if either) is redundant.
    fn prop_bin_full(
        &mut self,
        root: CLiteral,
        p: CLiteral,
        literal: CLiteral,
        learnt: bool,
        useless_bin: &mut BTreeSet<BinaryClause>,
    ) -> Option<Reason> {
        match self.value_of(literal) {
            None => {
                self.counters.props_bin += 1;
                if p == root {
                    self.enqueue_complex(literal, p, learnt);
                } else {
                    // The source is itself implied, so the probe implies
                    // the literal through the chain: record the shortcut
                    // and anchor the ancestry at the probe.
                    self.need_to_add_bin_clause
                        .insert(BinaryClause::new(-root, literal, true));
                    self.enqueue_complex(literal, root, true);
                    self.prop_data[literal.var() as usize].hyper_bin = true;
                }
                None
            }

            Some(false) => {
                log::trace!(target: targets::PROBE, "Conflict from {p} and {literal}.");
                self.fail_bin_lit = Some(literal);
                Some(Reason::Binary(-p))
            }

            Some(true) => {
                if self.var_data[literal.var() as usize].level != 0 {
                    // A second implication path to an already-assigned
                    // literal.
                    match self.remove_which(literal, p, learnt) {
                        Retire::Existing => {
                            let var = literal.var() as usize;
                            let data = self.prop_data[var];
                            if let Some(old) = data.ancestor {
                                if !data.hyper_bin {
                                    useless_bin.insert(BinaryClause::new(
                                        -old,
                                        literal,
                                        data.learnt_step,
                                    ));
                                } else if !data.hyper_bin_not_added {
                                    // The recorded hyper-binary is now
                                    // superseded; the subsumption pass
                                    // retires it later.
                                }

                                self.prop_data[var] = PropData {
                                    ancestor: Some(p),
                                    learnt_step: learnt,
                                    hyper_bin: false,
                                    hyper_bin_not_added: false,
                                };
                            }
                        }

                        Retire::Incoming => {
                            useless_bin.insert(BinaryClause::new(-p, literal, learnt));
                        }

                        Retire::Neither => {}
                    }
                }
                None
            }
        }
    }

    /// Assigns `literal` with `ancestor` recorded as its implication
    /// source for the current probe.
    fn enqueue_complex(&mut self, literal: CLiteral, ancestor: CLiteral, learnt_step: bool) {
        debug_assert_ne!(self.var_data[ancestor.var() as usize].level, 0);

        self.enqueue(literal, Reason::Binary(-ancestor));
        self.prop_data[literal.var() as usize] = PropData {
            ancestor: Some(ancestor),
            learnt_step,
            hyper_bin: false,
            hyper_bin_not_added: false,
        };
        self.enqueued_something = true;
    }

    /// Hyper-binary synthesis for a unit derivation from a ternary clause:
    /// `false_a` and `false_b` are the falsified literals of the clause.
    pub(crate) fn add_hyper_bin_pair(
        &mut self,
        root: CLiteral,
        literal: CLiteral,
        false_a: CLiteral,
        false_b: CLiteral,
    ) {
        self.current_ancestors.clear();
        for false_lit in [false_a, false_b] {
            debug_assert_eq!(self.value_of(false_lit), Some(false));
            if self.var_data[false_lit.var() as usize].level != 0 {
                self.current_ancestors.push(-false_lit);
            }
        }
        self.hyper_bin_finish(root, literal);
    }

    /// Hyper-binary synthesis for a unit derivation from the long clause
    /// at `offset`, all of whose literals but `literal` are falsified.
    pub(crate) fn add_hyper_bin_clause(
        &mut self,
        root: CLiteral,
        literal: CLiteral,
        offset: crate::db::arena::ClauseOffset,
    ) {
        self.current_ancestors.clear();
        let clause = self.arena.get(offset);
        for index in 0..clause.len() {
            let clause_lit = clause.literal(index);
            if clause_lit == literal {
                continue;
            }
            debug_assert_eq!(self.value_of(clause_lit), Some(false));
            if self.var_data[clause_lit.var() as usize].level != 0 {
                self.current_ancestors.push(-clause_lit);
            }
        }
        self.hyper_bin_finish(root, literal);
    }

    /// Completes hyper-binary synthesis over the collected ancestors:
    /// records {¬dominator, literal} and enqueues with the dominator as
    /// ancestor.
    ///
    /// No clause is recorded when the dominator is the probe itself ---
    /// the derivation is already a direct implication from the probe ---
    /// or when a single ancestor survives, the reason having thinned to an
    /// effective binary. Either way `hyper_bin_not_added` marks that the
    /// literal's hyper-binary has no recorded clause behind it.
    fn hyper_bin_finish(&mut self, root: CLiteral, literal: CLiteral) {
        let (ancestor, not_added) = if self.current_ancestors.len() > 1 {
            let dominator = self.deepest_common_ancestor();
            if dominator == root {
                (dominator, true)
            } else {
                log::trace!(target: targets::PROBE, "Hyper-binary {} {literal}.", -dominator);
                self.need_to_add_bin_clause
                    .insert(BinaryClause::new(-dominator, literal, true));
                (dominator, false)
            }
        } else {
            // Root-level assignments thinned the reason to an effective
            // binary; with nothing at all left, fall back to the probe.
            match self.current_ancestors.first() {
                Some(&ancestor) => (ancestor, true),
                None => (root, true),
            }
        };

        self.enqueue_complex(literal, ancestor, true);
        let var = literal.var() as usize;
        self.prop_data[var].hyper_bin = true;
        self.prop_data[var].hyper_bin_not_added = not_added;
    }

    /// The deepest literal lying on the ancestor chain of every collected
    /// ancestor.
    ///
    /// Chains are walked to the probe with per-literal visit counts kept in
    /// the `seen` map; the dominator is the first literal of the first
    /// chain visited by all of them. Counts touched are reset before
    /// returning.
    fn deepest_common_ancestor(&mut self) -> CLiteral {
        let chains = self.current_ancestors.len() as u32;
        debug_assert!(chains > 1);
        self.to_clear.clear();

        for index in 0..self.current_ancestors.len() {
            let mut cursor = self.current_ancestors[index];
            loop {
                if self.seen[cursor.index()] == 0 {
                    self.to_clear.push(cursor);
                }
                self.seen[cursor.index()] += 1;

                match self.prop_data[cursor.var() as usize].ancestor {
                    Some(up) => cursor = up,
                    None => break,
                }
            }
        }

        let mut cursor = self.current_ancestors[0];
        let dominator = loop {
            if self.seen[cursor.index()] == chains {
                break cursor;
            }
            match self.prop_data[cursor.var() as usize].ancestor {
                Some(up) => cursor = up,
                // The probe is on every chain, so this is unreachable; the
                // probe itself is the sound answer regardless.
                None => break cursor,
            }
        };

        for literal in &self.to_clear {
            self.seen[literal.index()] = 0;
        }

        dominator
    }

    /// True if `candidate` lies strictly above `descendant` on its
    /// ancestor chain.
    fn is_ancestor_of(&self, descendant: CLiteral, candidate: CLiteral) -> bool {
        let mut cursor = descendant;
        while let Some(up) = self.prop_data[cursor.var() as usize].ancestor {
            if up == candidate {
                return true;
            }
            cursor = up;
        }
        false
    }

    /// The retire policy for a second binary edge into `literal` from `p`.
    ///
    /// A local, swappable heuristic: a non-learnt edge is never displaced
    /// in favour of a learnt one; otherwise whichever edge the ancestor
    /// chains prove to be a transitive shortcut is retired; with unrelated
    /// chains, neither.
    fn remove_which(&self, literal: CLiteral, p: CLiteral, this_learnt: bool) -> Retire {
        let data = &self.prop_data[literal.var() as usize];
        let Some(old) = data.ancestor else {
            return Retire::Neither;
        };
        if old == p {
            return Retire::Neither;
        }

        if self.is_ancestor_of(old, p) {
            // p implies old, so the new edge restates the chain through
            // old.
            match this_learnt || !data.learnt_step {
                true => Retire::Incoming,
                false => Retire::Neither,
            }
        } else if self.is_ancestor_of(p, old) {
            // old implies p, so the recorded edge restates the chain
            // through p.
            match data.learnt_step || !this_learnt {
                true => Retire::Existing,
                false => Retire::Neither,
            }
        } else {
            Retire::Neither
        }
    }
}
