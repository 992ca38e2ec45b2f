use marten_sat::{
    db::reason::Reason,
    engine::PropEngine,
    structures::literal::{CLiteral, Literal},
};

fn fresh_literals<const N: usize>(engine: &mut PropEngine) -> [CLiteral; N] {
    std::array::from_fn(|_| CLiteral::new(engine.fresh_var().unwrap(), true))
}

/// Attaches each clause by its length: two literals binary, otherwise
/// stored and attached watching the first two positions.
fn attach_all(engine: &mut PropEngine, clauses: &[Vec<CLiteral>]) {
    for clause in clauses {
        match clause.len() {
            2 => engine.attach_binary(clause[0], clause[1], false),
            _ => {
                let offset = engine.add_clause(clause.clone(), false);
                engine.attach_clause(offset, 0, 1);
            }
        }
    }
}

mod chains {
    use super::*;

    #[test]
    fn unit_chain() {
        let mut engine = PropEngine::default();
        let [p, q, r] = fresh_literals(&mut engine);

        engine.attach_binary(-p, q, false);
        engine.attach_binary(-q, r, false);

        engine.enqueue(p, Reason::Unary);
        assert!(engine.propagate().is_none());

        assert_eq!(engine.trail.literals, vec![p, q, r]);
        assert_eq!(engine.reason_of(q.var()), Reason::Binary(-p));
        assert_eq!(engine.reason_of(r.var()), Reason::Binary(-q));
    }

    #[test]
    fn quiescent_propagation_is_immediate() {
        let mut engine = PropEngine::default();
        let [p, q, r] = fresh_literals(&mut engine);

        engine.attach_binary(-p, q, false);
        engine.attach_binary(-q, r, false);
        engine.enqueue(p, Reason::Unary);

        assert!(engine.propagate().is_none());
        let trail_before = engine.trail.literals.clone();
        let propagations_before = engine.counters.propagations;

        // Nothing queued: the second call must do no work.
        assert!(engine.propagate().is_none());
        assert_eq!(engine.trail.literals, trail_before);
        assert_eq!(engine.counters.propagations, propagations_before);
    }
}

mod conflicts {
    use super::*;

    #[test]
    fn binary_conflict() {
        let mut engine = PropEngine::default();
        let [p, q] = fresh_literals(&mut engine);

        engine.attach_binary(-p, q, false);
        engine.attach_binary(-p, -q, false);

        engine.enqueue(p, Reason::Unary);
        let conflict = engine.propagate();

        assert_eq!(conflict, Some(Reason::Binary(-p)));
        assert!(matches!(engine.fail_bin_lit(), Some(l) if l == q || l == -q));

        // p and whichever of q/-q was reached first.
        assert_eq!(engine.trail.literals.len(), 2);
        assert_eq!(engine.trail.literals[0], p);

        // The cursor is pinned to the trail end to inhibit further work.
        assert_eq!(engine.trail.q_head, engine.trail.literals.len());
    }

    #[test]
    fn lone_falsified_watcher_compacts() {
        let mut engine = PropEngine::default();
        let [p, q] = fresh_literals(&mut engine);

        // {-p, -q} only: the list of p holds exactly one watcher, and it
        // conflicts once q is set.
        engine.attach_binary(-p, -q, false);

        engine.enqueue(q, Reason::Unary);
        engine.enqueue(p, Reason::Unary);
        let conflict = engine.propagate();

        assert!(conflict.is_some());
        assert_eq!(engine.watchers(p).len(), 1);
        assert_eq!(engine.watchers(q).len(), 1);
    }

    #[test]
    fn empty_watchlist_is_a_noop() {
        let mut engine = PropEngine::default();
        let [p] = fresh_literals(&mut engine);

        engine.enqueue(p, Reason::Unary);
        assert!(engine.propagate().is_none());
        assert_eq!(engine.trail.literals, vec![p]);
    }
}

mod ternaries {
    use super::*;

    #[test]
    fn ternary_unit() {
        let mut engine = PropEngine::default();
        let [p, q, r] = fresh_literals(&mut engine);

        let offset = engine.add_clause(vec![p, q, r], false);
        engine.attach_clause(offset, 0, 1);

        engine.enqueue(-p, Reason::Unary);
        engine.enqueue(-q, Reason::Unary);
        assert!(engine.propagate().is_none());

        assert_eq!(engine.value_of(r), Some(true));
        assert_eq!(engine.reason_of(r.var()), Reason::Ternary(p, q));
        assert_eq!(engine.trail.literals, vec![-p, -q, r]);
    }

    #[test]
    fn ternary_conflict() {
        let mut engine = PropEngine::default();
        let [p, q, r] = fresh_literals(&mut engine);

        let offset = engine.add_clause(vec![p, q, r], false);
        engine.attach_clause(offset, 0, 1);

        engine.enqueue(-p, Reason::Unary);
        engine.enqueue(-q, Reason::Unary);
        engine.enqueue(-r, Reason::Unary);

        let conflict = engine.propagate();
        assert!(matches!(conflict, Some(Reason::Ternary(_, _))));
        assert!(engine.fail_bin_lit().is_some());
    }
}

mod long_clauses {
    use super::*;
    use marten_sat::db::watches::Watcher;

    #[test]
    fn watch_relocation() {
        let mut engine = PropEngine::default();
        let [a, b, c, d, e] = fresh_literals(&mut engine);

        let offset = engine.add_clause(vec![a, b, c, d, e], false);
        engine.attach_clause(offset, 0, 1);

        engine.enqueue(-a, Reason::Unary);
        assert!(engine.propagate().is_none());

        // The watch on position 0 moved to position 2, the first
        // non-falsified literal.
        let num = engine.clause(offset).num();
        assert_eq!(engine.clause_meta(num).watch, [2, 1]);

        // The relocated watcher sits under -c, blocking on the other
        // watched literal.
        assert!(engine.watchers(-c).iter().any(|w| matches!(
            w,
            Watcher::Long { offset: o, blocker, which: false } if *o == offset && *blocker == b
        )));
        assert!(engine.watchers(-a).is_empty());

        // No assignment was forced.
        assert_eq!(engine.trail.literals, vec![-a]);
        assert!(engine.value_of(b).is_none());
    }

    #[test]
    fn unit_under_assignment() {
        let mut engine = PropEngine::default();
        let [a, b, c, d] = fresh_literals(&mut engine);

        let offset = engine.add_clause(vec![a, b, c, d], false);
        engine.attach_clause(offset, 0, 1);

        // Falsify every non-watched literal, then the first watch.
        engine.enqueue(-c, Reason::Unary);
        engine.enqueue(-d, Reason::Unary);
        engine.enqueue(-a, Reason::Unary);
        assert!(engine.propagate().is_none());

        assert_eq!(engine.value_of(b), Some(true));
        assert_eq!(
            engine.reason_of(b.var()),
            Reason::Long {
                offset,
                which: true
            }
        );
    }

    #[test]
    fn long_conflict() {
        let mut engine = PropEngine::default();
        let [a, b, c, d] = fresh_literals(&mut engine);

        let offset = engine.add_clause(vec![a, b, c, d], false);
        engine.attach_clause(offset, 0, 1);

        engine.enqueue(-c, Reason::Unary);
        engine.enqueue(-d, Reason::Unary);
        engine.enqueue(-b, Reason::Unary);
        engine.enqueue(-a, Reason::Unary);

        let conflict = engine.propagate();
        assert!(matches!(conflict, Some(Reason::Long { offset: o, .. }) if o == offset));
        assert_eq!(engine.trail.q_head, engine.trail.literals.len());
    }

    #[test]
    fn blocker_satisfaction_skips_the_clause() {
        let mut engine = PropEngine::default();
        let [a, b, c, d, e] = fresh_literals(&mut engine);

        let offset = engine.add_clause(vec![a, b, c, d, e], false);
        engine.attach_clause(offset, 0, 1);

        // The blocker is the middle literal, c. With c satisfied the
        // watches stay put however a is valued.
        engine.enqueue(c, Reason::Unary);
        engine.enqueue(-a, Reason::Unary);
        assert!(engine.propagate().is_none());

        let num = engine.clause(offset).num();
        assert_eq!(engine.clause_meta(num).watch, [0, 1]);
        assert_eq!(engine.watchers(-a).len(), 1);
    }
}

mod properties {
    use super::*;
    use std::collections::BTreeSet;

    /// After quiescence, every stored clause is satisfied or has at least
    /// two non-falsified literals.
    #[test]
    fn quiescence_leaves_clauses_watchable() {
        let mut engine = PropEngine::default();
        let [p, q, r, s, t] = fresh_literals(&mut engine);

        attach_all(
            &mut engine,
            &[
                vec![-p, q],
                vec![-q, r, s],
                vec![-r, s, t, p],
                vec![-s, t],
            ],
        );

        engine.enqueue(p, Reason::Unary);
        assert!(engine.propagate().is_none());
        assert_eq!(engine.trail.q_head, engine.trail.literals.len());

        for offset in 0..engine.clause_count() as u32 {
            let clause = engine.clause(offset);
            let satisfied = clause
                .literals()
                .iter()
                .any(|l| engine.value_of(*l) == Some(true));
            let non_false = clause
                .literals()
                .iter()
                .filter(|l| engine.value_of(**l) != Some(false))
                .count();
            assert!(satisfied || non_false >= 2);
        }
    }

    /// The literals propagated from a decision do not depend on attach
    /// order.
    #[test]
    fn attach_order_is_immaterial() {
        let clauses = |lits: &[CLiteral; 5]| {
            let [p, q, r, s, t] = *lits;
            vec![
                vec![-p, q],
                vec![-q, r],
                vec![-r, -q, s],
                vec![-s, -p, t, r],
            ]
        };

        let mut forward = PropEngine::default();
        let lits = fresh_literals(&mut forward);
        attach_all(&mut forward, &clauses(&lits));
        forward.enqueue(lits[0], Reason::Unary);
        assert!(forward.propagate().is_none());

        let mut reverse = PropEngine::default();
        let lits_r = fresh_literals(&mut reverse);
        let mut reversed = clauses(&lits_r);
        reversed.reverse();
        attach_all(&mut reverse, &reversed);
        reverse.enqueue(lits_r[0], Reason::Unary);
        assert!(reverse.propagate().is_none());

        let assigned = |engine: &PropEngine| -> BTreeSet<CLiteral> {
            engine.trail.literals.iter().copied().collect()
        };
        assert_eq!(assigned(&forward), assigned(&reverse));
    }

    #[test]
    fn backtracking_clears_values() {
        let mut engine = PropEngine::default();
        let [p, q] = fresh_literals(&mut engine);
        engine.attach_binary(-p, q, false);

        engine.push_decision_level();
        engine.enqueue(p, Reason::Unary);
        assert!(engine.propagate().is_none());
        assert_eq!(engine.value_of(q), Some(true));

        engine.backtrack_to(0);
        assert!(engine.value_of(p).is_none());
        assert!(engine.value_of(q).is_none());
        assert!(engine.trail.literals.is_empty());
        assert_eq!(engine.reason_of(q.var()), Reason::None);
    }
}

mod nonlearnt_binary {
    use super::*;

    #[test]
    fn learnt_binaries_are_ignored() {
        let mut engine = PropEngine::default();
        let [p, q, r] = fresh_literals(&mut engine);

        engine.attach_binary(-p, q, false);
        engine.attach_binary(-p, r, true);

        engine.enqueue(p, Reason::Unary);
        assert!(engine.propagate_nonlearnt_bin().is_none());

        assert_eq!(engine.value_of(q), Some(true));
        assert!(engine.value_of(r).is_none());
    }

    #[test]
    fn nonlearnt_conflict_is_reported() {
        let mut engine = PropEngine::default();
        let [p, q] = fresh_literals(&mut engine);

        engine.attach_binary(-p, q, false);
        engine.attach_binary(-p, -q, false);

        engine.enqueue(p, Reason::Unary);
        assert_eq!(engine.propagate_nonlearnt_bin(), Some(Reason::Binary(-p)));
    }
}
