/// Counts for various things which count, roughly.
///
/// The per-form propagation counts let an outer loop weigh where work goes;
/// `bogo_props` is a coarse, deterministic effort measure (watchlist
/// lengths and clause visits) usable as a budget where wall clocks are too
/// noisy.
#[derive(Clone, Copy, Debug, Default)]
pub struct Counters {
    /// A count of every literal dequeued for propagation.
    pub propagations: u64,

    /// Enqueues forced by binary clauses.
    pub props_bin: u64,

    /// Enqueues forced by ternary clauses.
    pub props_tri: u64,

    /// Enqueues forced by long non-learnt clauses.
    pub props_long_irred: u64,

    /// Enqueues forced by long learnt clauses.
    pub props_long_red: u64,

    /// A coarse effort measure, incremented in proportion to work done.
    pub bogo_props: u64,
}
