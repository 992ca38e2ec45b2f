use std::collections::BTreeSet;

use marten_sat::{
    db::reason::Reason,
    engine::PropEngine,
    procedures::full::FailAnalysis,
    structures::{
        clause::BinaryClause,
        literal::{CLiteral, Literal},
    },
};

fn fresh_literals<const N: usize>(engine: &mut PropEngine) -> [CLiteral; N] {
    std::array::from_fn(|_| CLiteral::new(engine.fresh_var().unwrap(), true))
}

/// Records the conflicts it is shown and returns a fixed literal.
struct MockAnalyzer {
    seen: Vec<Reason>,
    returns: CLiteral,
}

impl MockAnalyzer {
    fn returning(literal: CLiteral) -> Self {
        MockAnalyzer {
            seen: Vec::default(),
            returns: literal,
        }
    }
}

impl FailAnalysis for MockAnalyzer {
    fn analyze_fail(&mut self, conflict: &Reason) -> CLiteral {
        self.seen.push(*conflict);
        self.returns
    }
}

fn probe(engine: &mut PropEngine, literal: CLiteral) {
    engine.push_decision_level();
    engine.enqueue(literal, Reason::Unary);
}

mod hyper_binaries {
    use super::*;

    /// A chain of non-learnt binaries: every literal reached through the
    /// chain is re-anchored at the probe, with the shortcut recorded.
    #[test]
    fn binary_chain_is_shortcut_to_the_probe() {
        let mut engine = PropEngine::default();
        let [p, q, r, s] = fresh_literals(&mut engine);

        engine.attach_binary(-p, q, false);
        engine.attach_binary(-q, r, false);
        engine.attach_binary(-r, s, false);

        probe(&mut engine, p);
        let mut useless_bin = BTreeSet::default();
        let mut analyzer = MockAnalyzer::returning(-p);

        assert!(engine
            .propagate_full(&mut useless_bin, &mut analyzer)
            .is_none());
        assert!(analyzer.seen.is_empty());

        assert_eq!(engine.trail.literals, vec![p, q, r, s]);
        assert_eq!(engine.prop_data(s.var()).ancestor, Some(p));
        assert!(engine.prop_data(s.var()).hyper_bin);

        assert!(engine
            .pending_hyper_binaries()
            .contains(&BinaryClause::new(-p, s, true)));
        assert!(engine
            .pending_hyper_binaries()
            .contains(&BinaryClause::new(-p, r, true)));

        // A first step from the probe is a plain implication.
        assert_eq!(engine.prop_data(q.var()).ancestor, Some(p));
        assert!(!engine.prop_data(q.var()).hyper_bin);
    }

    /// Two paths to one literal: the retire policy marks the transitive
    /// shortcut redundant and re-anchors the ancestor.
    #[test]
    fn duplicate_path_retires_the_shortcut_edge() {
        let mut engine = PropEngine::default();
        let [p, q, r] = fresh_literals(&mut engine);

        engine.attach_binary(-p, q, false);
        engine.attach_binary(-p, r, false);
        engine.attach_binary(-q, r, false);

        probe(&mut engine, p);
        let mut useless_bin = BTreeSet::default();
        let mut analyzer = MockAnalyzer::returning(-p);

        assert!(engine
            .propagate_full(&mut useless_bin, &mut analyzer)
            .is_none());

        // {-p, r} restates p -> q -> r, so it is the redundant edge, and
        // r's ancestry moves to the direct parent q.
        assert!(useless_bin.contains(&BinaryClause::new(-p, r, false)));
        assert_eq!(engine.prop_data(r.var()).ancestor, Some(q));
    }

    /// A ternary unit derivation whose falsified literals all trace
    /// directly to the probe is a direct implication: the dominator is the
    /// probe, and no clause is recorded for it.
    #[test]
    fn probe_dominator_is_a_direct_implication() {
        let mut engine = PropEngine::default();
        let [p, q, r, s] = fresh_literals(&mut engine);

        engine.attach_binary(-p, q, false);
        engine.attach_binary(-p, r, false);
        let offset = engine.add_clause(vec![-q, -r, s], false);
        engine.attach_clause(offset, 0, 1);

        probe(&mut engine, p);
        let mut useless_bin = BTreeSet::default();
        let mut analyzer = MockAnalyzer::returning(-p);

        assert!(engine
            .propagate_full(&mut useless_bin, &mut analyzer)
            .is_none());

        // Both falsified literals of {-q, -r, s} are one hop from p, so p
        // itself dominates the derivation.
        assert_eq!(engine.trail.literals, vec![p, q, r, s]);
        assert_eq!(engine.prop_data(s.var()).ancestor, Some(p));
        assert!(engine.prop_data(s.var()).hyper_bin);
        assert!(engine.prop_data(s.var()).hyper_bin_not_added);
        assert!(engine.pending_hyper_binaries().is_empty());
    }

    /// A ternary unit derivation whose falsified literals meet below the
    /// probe records the hyper-binary from their dominator.
    #[test]
    fn deep_dominator_records_from_the_dominator() {
        let mut engine = PropEngine::default();
        let [p, q, r0, r1, s, t, u] = fresh_literals(&mut engine);

        engine.attach_binary(-p, q, false);
        // r0 and r1 are false at the root, so each of these thins to an
        // effective binary from q.
        let via_s = engine.add_clause(vec![-q, r0, s], false);
        engine.attach_clause(via_s, 0, 1);
        let via_t = engine.add_clause(vec![-q, r1, t], false);
        engine.attach_clause(via_t, 0, 1);
        let resolvent = engine.add_clause(vec![-s, -t, u], false);
        engine.attach_clause(resolvent, 0, 1);

        engine.enqueue(-r0, Reason::Unary);
        engine.enqueue(-r1, Reason::Unary);
        assert!(engine.propagate().is_none());

        probe(&mut engine, p);
        let mut useless_bin = BTreeSet::default();
        let mut analyzer = MockAnalyzer::returning(-p);

        assert!(engine
            .propagate_full(&mut useless_bin, &mut analyzer)
            .is_none());

        // s and t both trace to q, so q --- not the probe --- dominates
        // {-s, -t, u} and {-q, u} is the resolvent.
        assert_eq!(engine.value_of(u), Some(true));
        assert_eq!(engine.prop_data(u.var()).ancestor, Some(q));
        assert!(engine.prop_data(u.var()).hyper_bin);
        assert!(!engine.prop_data(u.var()).hyper_bin_not_added);
        assert!(engine
            .pending_hyper_binaries()
            .contains(&BinaryClause::new(-q, u, true)));
    }

    /// With one reason literal already fixed at the root, the reason thins
    /// to an effective binary and no clause is recorded.
    #[test]
    fn root_level_literals_thin_the_reason() {
        let mut engine = PropEngine::default();
        let [p, q, r] = fresh_literals(&mut engine);

        // r is false at the root, so {-p, r, q}'s only live ancestor is p.
        engine.enqueue(-r, Reason::Unary);
        let offset = engine.add_clause(vec![-p, r, q], false);
        engine.attach_clause(offset, 0, 1);
        assert!(engine.propagate().is_none());

        probe(&mut engine, p);
        let mut useless_bin = BTreeSet::default();
        let mut analyzer = MockAnalyzer::returning(-p);

        assert!(engine
            .propagate_full(&mut useless_bin, &mut analyzer)
            .is_none());

        assert_eq!(engine.value_of(q), Some(true));
        assert_eq!(engine.prop_data(q.var()).ancestor, Some(p));
        assert!(engine.prop_data(q.var()).hyper_bin);
        assert!(engine.prop_data(q.var()).hyper_bin_not_added);
        assert!(engine.pending_hyper_binaries().is_empty());
    }

    /// Learnt binaries contribute only after non-learnt binaries are
    /// exhausted, and their derivations restart the non-learnt phase.
    #[test]
    fn nonlearnt_binaries_take_priority() {
        let mut engine = PropEngine::default();
        let [p, q, r, s] = fresh_literals(&mut engine);

        // Learnt edge to q; non-learnt edges q -> r and p -> s.
        engine.attach_binary(-p, q, true);
        engine.attach_binary(-q, r, false);
        engine.attach_binary(-p, s, false);

        probe(&mut engine, p);
        let mut useless_bin = BTreeSet::default();
        let mut analyzer = MockAnalyzer::returning(-p);

        assert!(engine
            .propagate_full(&mut useless_bin, &mut analyzer)
            .is_none());

        // s (non-learnt, from the probe) precedes q (learnt).
        assert_eq!(engine.trail.literals, vec![p, s, q, r]);
        assert!(engine.prop_data(q.var()).learnt_step);
        assert_eq!(engine.prop_data(r.var()).ancestor, Some(p));
    }
}

mod failed_probes {
    use super::*;

    /// A failed probe routes its conflict through the analyzer and
    /// returns the analyzer's literal.
    #[test]
    fn probe_failure_is_analyzed() {
        let mut engine = PropEngine::default();
        let [p, q, sentinel] = fresh_literals(&mut engine);

        engine.attach_binary(-p, q, false);
        engine.attach_binary(-p, -q, false);

        probe(&mut engine, p);
        let mut useless_bin = BTreeSet::default();
        let mut analyzer = MockAnalyzer::returning(sentinel);

        let failed = engine.propagate_full(&mut useless_bin, &mut analyzer);

        assert_eq!(failed, Some(sentinel));
        assert_eq!(analyzer.seen, vec![Reason::Binary(-p)]);
        assert!(matches!(engine.fail_bin_lit(), Some(l) if l == q || l == -q));
    }

    /// A conflict met in the ternary phase is analyzed all the same.
    #[test]
    fn ternary_probe_failure() {
        let mut engine = PropEngine::default();
        let [p, q, r, sentinel] = fresh_literals(&mut engine);

        engine.attach_binary(-p, q, false);
        engine.attach_binary(-p, r, false);
        let offset = engine.add_clause(vec![-p, -q, -r], false);
        engine.attach_clause(offset, 0, 1);

        probe(&mut engine, p);
        let mut useless_bin = BTreeSet::default();
        let mut analyzer = MockAnalyzer::returning(sentinel);

        let failed = engine.propagate_full(&mut useless_bin, &mut analyzer);

        assert_eq!(failed, Some(sentinel));
        assert_eq!(analyzer.seen.len(), 1);
    }
}
