//! A watched-literal propagation core for conflict-driven clause-learning
//! satisfiability solvers.
//!
//! marten_sat is the propagation subsystem of a CDCL solver, packaged on
//! its own: the data structures and procedures which derive the forced
//! consequences of a partial assignment and detect the first unsatisfied
//! clause. It is developed for building solvers on, and for investigating
//! propagation itself --- the part of a solver where nearly all the time
//! goes.
//!
//! The outer loop of a solver --- decisions, conflict analysis,
//! backjumping, restarts, input --- is a collaborator, not included.
//! Where such a collaborator is required mid-procedure it appears as a
//! seam (see [FailAnalysis](procedures::full::FailAnalysis)); otherwise
//! the engine's interface is designed against one: enqueue a decision,
//! [propagate](engine::PropEngine::propagate), read the conflict, repeat.
//!
//! # Orientation
//!
//! Internally, and at a high level, propagation is the interplay of a
//! handful of databases:
//! - Clause bodies are held in an [arena](db::arena) behind stable
//!   offsets.
//! - The [watchlists](db::watches) index clauses by the literals whose
//!   assignment could make them assert, with binary and ternary clauses
//!   embedded whole so the arena is only ever visited for long clauses.
//! - Assignments are recorded on a [trail](db::trail) and consumed by a
//!   cursor, so propagation is a queue drain.
//!
//! All state is owned by a [PropEngine](engine::PropEngine) value, and the
//! interesting procedures are engine methods kept in files of their own:
//! - [attach/detach](procedures::attach) --- clause entry to and exit from
//!   the watchlists.
//! - [propagate](procedures::propagate) --- standard boolean constraint
//!   propagation.
//! - [full propagation](procedures::full) --- probe-time propagation with
//!   hyper-binary resolution and redundant-binary collection.
//! - [maintenance](procedures::maintenance) --- watchlist utilities.
//!
//! Beside the engine, the [predict] module scores learnt clauses for
//! database pruning with pre-trained gradient-boosted models; it shares
//! only the clause statistics record with the rest of the crate.
//!
//! # Example
//!
//! ```rust
//! # use marten_sat::engine::PropEngine;
//! # use marten_sat::db::reason::Reason;
//! # use marten_sat::structures::literal::{CLiteral, Literal};
//! let mut engine = PropEngine::default();
//! let vars: Vec<_> = (0..3).map(|_| engine.fresh_var().unwrap()).collect();
//!
//! let p = CLiteral::new(vars[0], true);
//! let q = CLiteral::new(vars[1], true);
//! let r = CLiteral::new(vars[2], true);
//!
//! // p, and clauses {-p q}, {-q r}: p forces q forces r.
//! engine.attach_binary(-p, q, false);
//! engine.attach_binary(-q, r, false);
//! engine.enqueue(p, Reason::Unary);
//!
//! assert!(engine.propagate().is_none());
//! assert_eq!(engine.value_of(r), Some(true));
//! assert_eq!(engine.trail.literals, vec![p, q, r]);
//! ```
//!
//! # Logs
//!
//! To help diagnose issues (somewhat) detailed calls to [log!](log) are
//! made, with targets defined in [misc::log] to narrow output to relevant
//! parts of the library. No log implementation is provided; pair with
//! [env_logger](https://docs.rs/env_logger/latest/env_logger/) or similar,
//! e.g. `RUST_LOG=propagation …`.

#![allow(clippy::single_match)]
#![allow(clippy::collapsible_else_if)]

pub mod config;
pub mod engine;

pub mod db;
pub mod procedures;
pub mod structures;
pub mod types;

pub mod predict;

pub mod misc;
