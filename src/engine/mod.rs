/*!
The propagation engine --- the single value owning all propagation state.

An engine holds the watchlists, the valuation, per-variable and per-probe
data, the trail, the clause arena with its meta table, and the scratch
structures of full propagation. Procedures
([attach](crate::procedures::attach),
[propagate](crate::procedures::propagate),
[full propagation](crate::procedures::full),
[maintenance](crate::procedures::maintenance)) are methods on the engine,
kept in their own files.

There is no hidden process-wide state: two engines are fully independent,
and everything an engine mutates it owns. All operations run on the
calling thread to quiescence or conflict; an outer loop imposes budgets
*between* calls (e.g. on [Counters] totals), never within one.

# Example

```rust
# use marten_sat::engine::PropEngine;
# use marten_sat::db::reason::Reason;
# use marten_sat::structures::literal::{CLiteral, Literal};
let mut engine = PropEngine::default();
let v = engine.fresh_var().unwrap();
let w = engine.fresh_var().unwrap();

let p = CLiteral::new(v, true);
let q = CLiteral::new(w, true);
engine.attach_binary(-p, q, false);

engine.enqueue(p, Reason::Unary);
assert!(engine.propagate().is_none());
assert_eq!(engine.value_of(q), Some(true));
```
*/

mod counters;
pub use counters::Counters;

use std::collections::BTreeSet;

use crate::{
    config::Config,
    db::{
        arena::{ClauseArena, ClauseOffset, StoredClause},
        reason::Reason,
        trail::Trail,
        vars::{PropData, VarData},
        watches::{Watcher, Watches},
        ClauseMeta, LevelIndex,
    },
    misc::log::targets::{self},
    structures::{
        clause::BinaryClause,
        literal::{CLiteral, Literal},
        variable::{Var, VAR_MAX},
    },
    types::err::CapacityError,
};

/// The propagation engine.
pub struct PropEngine {
    /// The configuration of the engine.
    pub config: Config,

    /// Counts of propagation work done.
    pub counters: Counters,

    /// Assignments, in order --- with the propagation cursor.
    pub trail: Trail,

    pub(crate) watches: Watches,

    /// The current (often partial) valuation, indexed by variable.
    pub(crate) valuation: Vec<Option<bool>>,

    pub(crate) var_data: Vec<VarData>,

    pub(crate) prop_data: Vec<PropData>,

    pub(crate) arena: ClauseArena,

    /// Watched positions and traversal counters, keyed by clause number.
    pub(crate) clause_meta: Vec<ClauseMeta>,

    /// Per-literal visit counts, used by the dominator search of full
    /// propagation and by conflict analysis.
    pub(crate) seen: Vec<u32>,

    /// Per-literal marks, reserved for conflict analysis.
    pub(crate) seen2: Vec<bool>,

    /// The literal which closed a binary or ternary conflict, kept for
    /// diagnostics beside the conflict reason.
    pub(crate) fail_bin_lit: Option<CLiteral>,

    /// Hyper-binary clauses synthesized by the current probe, to be
    /// attached by the caller after the probe returns.
    pub(crate) need_to_add_bin_clause: BTreeSet<BinaryClause>,

    /// Set by every enqueue inside full propagation; drives its
    /// restart-on-progress loop.
    pub(crate) enqueued_something: bool,

    /// Scratch: the on-trail ancestors of a reason under dominator search.
    pub(crate) current_ancestors: Vec<CLiteral>,

    /// Scratch: literals whose `seen` count must be reset.
    pub(crate) to_clear: Vec<CLiteral>,

    /// Cleared when a root-level conflict is observed; the outer loop
    /// checks this before trusting any further derivation.
    pub(crate) ok: bool,
}

impl Default for PropEngine {
    fn default() -> Self {
        Self::with_config(Config::default())
    }
}

impl PropEngine {
    pub fn with_config(config: Config) -> Self {
        PropEngine {
            config,
            counters: Counters::default(),
            trail: Trail::default(),
            watches: Watches::default(),
            valuation: Vec::default(),
            var_data: Vec::default(),
            prop_data: Vec::default(),
            arena: ClauseArena::default(),
            clause_meta: Vec::default(),
            seen: Vec::default(),
            seen2: Vec::default(),
            fail_bin_lit: None,
            need_to_add_bin_clause: BTreeSet::default(),
            enqueued_something: false,
            current_ancestors: Vec::default(),
            to_clear: Vec::default(),
            ok: true,
        }
    }

    /// A fresh variable --- on Ok every per-variable structure has grown to
    /// admit it, and the safety of unchecked access through it follows.
    pub fn fresh_var(&mut self) -> Result<Var, CapacityError> {
        let var = self.valuation.len() as Var;
        if var >= VAR_MAX {
            return Err(CapacityError::VarsExhausted);
        }

        self.watches.grow_for_var();
        self.valuation.push(None);
        self.var_data.push(VarData::default());
        self.prop_data.push(PropData::default());

        // Two entries per variable: these are literal-indexed.
        self.seen.push(0);
        self.seen.push(0);
        self.seen2.push(false);
        self.seen2.push(false);

        Ok(var)
    }

    /// A count of variables in the engine.
    pub fn var_count(&self) -> usize {
        self.valuation.len()
    }

    /// The value of a variable on the current valuation.
    pub fn value_of_var(&self, var: Var) -> Option<bool> {
        self.valuation[var as usize]
    }

    /// The value of a literal on the current valuation, following polarity.
    pub fn value_of(&self, literal: CLiteral) -> Option<bool> {
        self.valuation[literal.var() as usize].map(|value| value == literal.polarity())
    }

    /// The current decision level.
    pub fn decision_level(&self) -> LevelIndex {
        self.trail.level()
    }

    /// Opens a fresh decision level.
    pub fn push_decision_level(&mut self) {
        self.trail.push_level();
    }

    /// Assigns `literal` and appends it to the trail, with `reason`
    /// recorded at the current decision level.
    ///
    /// The caller ensures the variable is unassigned; an inconsistent
    /// enqueue is a conflict to be *returned*, never silently absorbed
    /// here.
    pub fn enqueue(&mut self, literal: CLiteral, reason: Reason) {
        debug_assert!(self.value_of(literal).is_none());
        let var = literal.var() as usize;

        self.valuation[var] = Some(literal.polarity());
        self.var_data[var].level = self.trail.level();
        self.var_data[var].reason = reason;
        self.trail.literals.push(literal);

        log::trace!(target: targets::QUEUE, "Queued {literal} at level {} for {reason}.", self.trail.level());
    }

    /// Removes levels above `level`: truncates the trail and clears the
    /// valuation and reasons of the removed assignments.
    pub fn backtrack_to(&mut self, level: LevelIndex) {
        for literal in self.trail.clear_assignments_above(level) {
            let var = literal.var() as usize;
            self.valuation[var] = None;
            self.var_data[var].reason = Reason::None;
            log::trace!(target: targets::VALUATION, "Cleared {literal}.");
        }
    }

    /// The elimination status of a variable.
    pub fn elim_status(&self, var: Var) -> crate::db::vars::ElimStatus {
        self.var_data[var as usize].elim
    }

    /// Sets the elimination status of a variable. Preprocessing owns the
    /// transitions; attach only reads the status.
    pub fn set_elim_status(&mut self, var: Var, status: crate::db::vars::ElimStatus) {
        self.var_data[var as usize].elim = status;
    }

    /// False if a root-level conflict has been observed.
    pub fn is_ok(&self) -> bool {
        self.ok
    }

    /// Notes a root-level conflict.
    pub fn set_not_ok(&mut self) {
        self.ok = false;
    }

    // Read access for diagnostics and tests.

    /// The watchers examined when `literal` becomes true.
    pub fn watchers(&self, literal: CLiteral) -> &[Watcher] {
        self.watches.list(literal.index())
    }

    /// The clause stored at `offset`.
    pub fn clause(&self, offset: ClauseOffset) -> &StoredClause {
        self.arena.get(offset)
    }

    /// Mutable access to a stored clause, for in-place shrinking and for
    /// statistics updates by the outer loop.
    pub fn clause_mut(&mut self, offset: ClauseOffset) -> &mut StoredClause {
        self.arena.get_mut(offset)
    }

    /// The meta entry of a (long) clause, by clause number.
    pub fn clause_meta(&self, num: u32) -> &ClauseMeta {
        &self.clause_meta[num as usize]
    }

    /// The reason recorded for the variable's current assignment ---
    /// conflict analysis reads these together with the trail.
    pub fn reason_of(&self, var: Var) -> Reason {
        self.var_data[var as usize].reason
    }

    /// The decision level of the variable's current assignment.
    /// Meaningful only while the variable is assigned.
    pub fn level_of(&self, var: Var) -> LevelIndex {
        self.var_data[var as usize].level
    }

    /// A count of clauses stored in the arena. Offsets below the count are
    /// valid.
    pub fn clause_count(&self) -> usize {
        self.arena.count()
    }

    /// How the variable was implied during the current probe.
    pub fn prop_data(&self, var: Var) -> &PropData {
        &self.prop_data[var as usize]
    }

    /// The literal which closed the most recent binary or ternary
    /// conflict.
    pub fn fail_bin_lit(&self) -> Option<CLiteral> {
        self.fail_bin_lit
    }

    /// Hyper-binary clauses synthesized by the most recent probe, for the
    /// caller to attach.
    pub fn pending_hyper_binaries(&self) -> &BTreeSet<BinaryClause> {
        &self.need_to_add_bin_clause
    }

    /// The per-literal scratch maps grown with the variable count: visit
    /// counts and marks, two entries per variable.
    ///
    /// Conflict analysis borrows these rather than keeping its own, so one
    /// allocation follows the engine's capacity. Each user leaves the maps
    /// zeroed --- full propagation's dominator search relies on it.
    pub fn analysis_scratch(&mut self) -> (&mut Vec<u32>, &mut Vec<bool>) {
        (&mut self.seen, &mut self.seen2)
    }
}
