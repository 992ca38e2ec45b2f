/*!
Feature construction for the clause-lifetime models.

The feature order and missing-value rules here are a contract with the
trained models: an entry may only be appended, never reordered. Missing
values use the sentinel [MISSING_VAL](crate::predict::MISSING_VAL), which
the models route through their missing branches; the row is prefilled with
the sentinel and only defined features are written.

The first [COLS_SHORT](crate::predict::COLS_SHORT) entries form the row of
the short-horizon model; the full [COLS](crate::predict::COLS) entries form
the row of the long- and forever-horizon models. Several of the later
features are undefined for ternary resolvents, whose statistics (original
glue, antecedent counts, glue histories) were never recorded.
*/

use crate::{
    db::arena::ClauseStats,
    predict::{COLS, MISSING_VAL},
};

/// Relative rankings and database averages at scoring time, shared by
/// every clause scored in one pass.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScoringContext {
    /// Conflicts seen by the solver so far.
    pub sum_conflicts: u64,

    /// The clause's activity rank, relative to the database size.
    pub act_rank_rel: f64,

    /// The clause's first-UIP-use rank, relative to the database size.
    pub uip1_rank_rel: f64,

    /// The clause's propagation rank, relative to the database size.
    pub prop_rank_rel: f64,

    /// Mean propagations per clause over the database.
    pub avg_props: f64,

    /// Mean glue over the database.
    pub avg_glue: f64,
}

/// The feature row of a clause: [COLS] values, of which the first
/// [COLS_SHORT](crate::predict::COLS_SHORT) are the short-horizon row.
pub fn feature_row(stats: &ClauseStats, ctx: &ScoringContext) -> [f32; COLS] {
    // A glue of 0 happens for ternary resolvents, and an updated glue may
    // reach 1. An original glue of 1 cannot.
    debug_assert_ne!(stats.orig_glue, 1);

    let mut row = [MISSING_VAL; COLS];

    let last_touched_diff = ctx.sum_conflicts.saturating_sub(stats.last_touched);
    let time_inside_solver =
        ctx.sum_conflicts.saturating_sub(stats.introduced_at_conflict) as f64;

    // 1: uip1_rank_rel
    row[0] = ctx.uip1_rank_rel as f32;

    // 2: act_rank_rel / last_touched_diff
    if last_touched_diff != 0 {
        row[1] = (ctx.act_rank_rel / last_touched_diff as f64) as f32;
    }

    // 3: prop_rank_rel
    row[2] = ctx.prop_rank_rel as f32;

    // 4: props_made / avg_props
    if ctx.avg_props != 0.0 {
        row[3] = (stats.props_made as f64 / ctx.avg_props) as f32;
    }

    // 5: last_touched_diff
    row[4] = last_touched_diff as f32;

    // 6: ttl_stats --- the short-horizon row ends here
    row[5] = stats.ttl_stats as f32;

    // 7: glue / conflicts_made
    if stats.conflicts_made != 0 {
        row[6] = (stats.glue as f64 / stats.conflicts_made as f64) as f32;
    }

    // 8: sum_props_made / time_inside_solver
    if time_inside_solver != 0.0 {
        row[7] = (stats.sum_props_made as f64 / time_inside_solver) as f32;
    }

    // 9: (8) / (glue / avg_glue)
    if time_inside_solver != 0.0 && ctx.avg_glue != 0.0 && stats.glue != 0 {
        row[8] = ((stats.sum_props_made as f64 / time_inside_solver)
            / (stats.glue as f64 / ctx.avg_glue)) as f32;
    }

    // 10: log2(glue_before_minim) / (sum_uip1_used / time_inside_solver)
    // --- glue before minimization does not exist for ternary resolvents.
    if time_inside_solver != 0.0
        && stats.sum_uip1_used != 0
        && stats.glue_before_minim != 0
        && !stats.is_ternary_resolvent
    {
        row[9] = ((stats.glue_before_minim as f64).log2()
            / (stats.sum_uip1_used as f64 / time_inside_solver)) as f32;
    }

    // 11: orig_glue --- does not exist for ternary resolvents.
    if !stats.is_ternary_resolvent {
        row[10] = stats.orig_glue as f32;
    }

    // 12: log2(num_antecedents) / num_total_lits_antecedents --- neither
    // exists for ternary resolvents.
    if stats.num_antecedents != 0
        && stats.num_total_lits_antecedents != 0
        && !stats.is_ternary_resolvent
    {
        row[11] = ((stats.num_antecedents as f64).log2()
            / stats.num_total_lits_antecedents as f64) as f32;
    }

    // 13: glue_hist_long / glue_before_minim --- the history does not
    // exist for ternary resolvents.
    if stats.glue_before_minim != 0 && !stats.is_ternary_resolvent {
        row[12] = (stats.glue_hist_long as f64 / stats.glue_before_minim as f64) as f32;
    }

    // 14: discounted_uip1_used3 / ternary flag --- the flag is the
    // divisor, so the feature exists only for ternary resolvents.
    if stats.is_ternary_resolvent {
        row[13] = stats.discounted_uip1_used3;
    }

    // 15: discounted_props_made / num_resolutions_hist_lt --- the history
    // does not exist for ternary resolvents.
    if stats.num_resolutions_hist_lt != 0 && !stats.is_ternary_resolvent {
        row[14] =
            (stats.discounted_props_made as f64 / stats.num_resolutions_hist_lt as f64) as f32;
    }

    // 16: (sum_uip1_used / time_inside_solver) / discounted_props_made
    if stats.discounted_props_made != 0.0 && time_inside_solver != 0.0 {
        row[15] = ((stats.sum_uip1_used as f64 / time_inside_solver)
            / stats.discounted_props_made as f64) as f32;
    }

    // 17: glue / (props_made / avg_props)
    if ctx.avg_props != 0.0 && stats.props_made != 0 {
        row[16] = (stats.glue as f64 / (stats.props_made as f64 / ctx.avg_props)) as f32;
    }

    row
}
