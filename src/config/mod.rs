/*!
Configuration of a propagation engine.

All configuration for an engine is contained within the engine, fixed when
the engine is built. The options here tune checks and performance hints
only --- nothing in the configuration changes which literals propagation
derives.
*/

/// The primary configuration structure.
#[derive(Clone)]
pub struct Config {
    /// Assert, when attaching a clause, that the first watched literal has
    /// no value and the second is unvalued or unsatisfied --- so attachment
    /// cannot silence a clause which currently asserts.
    ///
    /// Intended for debugging attach discipline in an outer loop; off by
    /// default as attachment during backjumping legitimately violates it.
    pub check_attach: bool,

    /// While scanning a watchlist, peek a few entries ahead and request the
    /// clause body of an upcoming long watcher from memory early.
    ///
    /// A performance hint only; derived assignments are identical either
    /// way.
    pub prefetch: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            check_attach: false,
            prefetch: true,
        }
    }
}
