/*!
Logging support.

Calls to the [log] macros are made throughout the library, under the
targets below, so output can be narrowed to the part of the engine under
investigation. No log implementation is provided --- pair the crate with
one and filter by target, e.g. `RUST_LOG=propagation` under env_logger.
*/

/// Targets to be used within a [log]! macro.
pub mod targets {
    pub const PROPAGATION: &str = "propagation";
    pub const PROBE: &str = "probe";
    pub const ATTACH: &str = "attach";
    pub const QUEUE: &str = "queue";
    pub const VALUATION: &str = "valuation";
    pub const PREDICT: &str = "predict";
}
