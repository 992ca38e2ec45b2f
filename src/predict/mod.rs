/*!
The clause-lifetime predictor: survival scores for learnt clauses.

Three pre-trained gradient-boosted tree models score a learnt clause's
chance of being useful over a short horizon, a long horizon, and forever.
An outer loop ranks clauses by these scores when pruning the learnt
database.

The predictor is an oracle from this crate's point of view: scoring is a
pure function of a clause's [statistics](crate::db::arena::ClauseStats)
and a handful of database-wide rankings and averages
([ScoringContext](features::ScoringContext)), with the models as its only
state. Models are owned by a [Predictors] holder with explicit
initialisation ([load](Predictors::load)); teardown is by drop.

# Models

A model is an additive tree ensemble with a logistic link: each tree is
walked from its root by feature comparisons (a row value equal to
[MISSING_VAL] takes the node's missing branch), the reached leaf values
are summed onto the base score, and the sum is squashed to (0, 1).

Serialized models are JSON, deserialized with [serde_json] and validated
on load so that evaluation never follows an out-of-bounds child or
feature.
*/

pub mod features;
pub use features::{feature_row, ScoringContext};

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    db::arena::ClauseStats,
    misc::log::targets::{self},
    types::err::PredictError,
};

/// Features consumed by the short-horizon model.
pub const COLS_SHORT: usize = 6;

/// Features consumed by the long- and forever-horizon models.
pub const COLS: usize = 17;

/// The sentinel marking a feature with no defined value.
pub const MISSING_VAL: f32 = -1.0;

/// A node of a decision tree: a leaf value, or a split on a feature.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum Node {
    Split {
        feature: usize,
        threshold: f32,
        yes: usize,
        no: usize,
        missing: usize,
    },
    Leaf {
        leaf: f32,
    },
}

/// A decision tree, nodes in preorder with node 0 the root.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// The leaf value reached by `row`.
    fn evaluate(&self, row: &[f32]) -> f32 {
        let mut at = 0;
        loop {
            match self.nodes[at] {
                Node::Leaf { leaf } => break leaf,
                Node::Split {
                    feature,
                    threshold,
                    yes,
                    no,
                    missing,
                } => {
                    let value = row[feature];
                    at = if value == MISSING_VAL {
                        missing
                    } else if value < threshold {
                        yes
                    } else {
                        no
                    };
                }
            }
        }
    }
}

/// A gradient-boosted tree ensemble for one horizon.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GbdtModel {
    base_score: f32,
    cols: usize,
    trees: Vec<Tree>,
}

impl GbdtModel {
    /// Deserializes a model from JSON and validates it.
    pub fn from_json(json: &str) -> Result<Self, PredictError> {
        let model: GbdtModel = serde_json::from_str(json)?;
        model.validate()?;
        Ok(model)
    }

    /// Reads a serialized model from `path`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PredictError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Checks every split for in-bounds children and features, so
    /// [evaluate](Self::evaluate) may index without further checks. Child
    /// indices must also move strictly forward, which rules out cycles.
    fn validate(&self) -> Result<(), PredictError> {
        if self.cols > COLS {
            return Err(PredictError::Malformed);
        }
        for tree in &self.trees {
            for (at, node) in tree.nodes.iter().enumerate() {
                if let Node::Split {
                    feature,
                    yes,
                    no,
                    missing,
                    ..
                } = node
                {
                    let forward = |child: usize| at < child && child < tree.nodes.len();
                    if *feature >= self.cols
                        || !forward(*yes)
                        || !forward(*no)
                        || !forward(*missing)
                    {
                        return Err(PredictError::Malformed);
                    }
                }
            }
            if tree.nodes.is_empty() {
                return Err(PredictError::Malformed);
            }
        }
        Ok(())
    }

    /// The model's score for `row`, in (0, 1).
    pub fn evaluate(&self, row: &[f32]) -> f32 {
        debug_assert!(row.len() >= self.cols);
        let margin: f32 = self
            .trees
            .iter()
            .map(|tree| tree.evaluate(row))
            .sum::<f32>()
            + self.base_score;
        1.0 / (1.0 + (-margin).exp())
    }
}

/// The three horizon models, loaded once and owned together.
pub struct Predictors {
    short: GbdtModel,
    long: GbdtModel,
    forever: GbdtModel,
}

impl Predictors {
    /// Loads the three serialized models.
    pub fn load(
        short_path: impl AsRef<Path>,
        long_path: impl AsRef<Path>,
        forever_path: impl AsRef<Path>,
    ) -> Result<Self, PredictError> {
        let predictors = Predictors {
            short: GbdtModel::from_file(short_path)?,
            long: GbdtModel::from_file(long_path)?,
            forever: GbdtModel::from_file(forever_path)?,
        };
        if predictors.short.cols > COLS_SHORT {
            return Err(PredictError::Malformed);
        }
        log::trace!(target: targets::PREDICT, "Models loaded.");
        Ok(predictors)
    }

    /// Builds predictors from already-deserialized models.
    pub fn from_models(short: GbdtModel, long: GbdtModel, forever: GbdtModel) -> Self {
        debug_assert!(short.cols <= COLS_SHORT);
        Predictors {
            short,
            long,
            forever,
        }
    }

    /// Survival scores of a clause over the three horizons:
    /// (short, long, forever).
    pub fn predict(&self, stats: &ClauseStats, ctx: &ScoringContext) -> (f32, f32, f32) {
        let row = feature_row(stats, ctx);

        // The short model is validated to reference only the short prefix
        // of the row, so every model reads the one row.
        let p_short = self.short.evaluate(&row);
        let p_long = self.long.evaluate(&row);
        let p_forever = self.forever.evaluate(&row);

        (p_short, p_long, p_forever)
    }
}
