/*!
Procedures on a [PropEngine](crate::engine::PropEngine), each in its own
file:

- [attach] --- entering and removing clauses from the watchlists.
- [propagate] --- standard boolean constraint propagation, and its
  restriction to non-learnt binary clauses.
- [full] --- probe-time propagation with hyper-binary resolution.
- [maintenance] --- watchlist utilities for maintenance passes.
*/

pub mod attach;
pub mod full;
pub mod maintenance;
pub mod propagate;
