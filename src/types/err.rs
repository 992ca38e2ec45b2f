/*!
Error types used in the library.

The taxonomy is narrow:
- Capacity errors are fatal --- there is no sensible recovery from a
  variable count at the representation limit.
- Watch errors indicate a corrupt watchlist, i.e. a bug. These surface from
  debug assertions in most places, and as errors only where detach must
  report that a watcher it was told to remove does not exist.
- Predictor errors cover loading the serialized scoring models.

A *conflict* is not an error: it is the ordinary outcome of propagation,
communicated by return value (see
[propagate](crate::engine::PropEngine::propagate)). Likewise
unsatisfiability at the root level is communicated through the engine's
`ok` flag, for the outer loop to observe.
*/

/// A union of varied error kinds.
#[derive(Debug)]
pub enum ErrorKind {
    /// A capacity limit was reached.
    Capacity(CapacityError),

    /// A corrupt watchlist.
    Watch(WatchError),

    /// An error from the clause-lifetime predictor.
    Predict(PredictError),
}

/// Errors from capacity limits on the core structures.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CapacityError {
    /// The variable count would reach [VAR_MAX](crate::structures::variable::VAR_MAX).
    VarsExhausted,
}

impl From<CapacityError> for ErrorKind {
    fn from(e: CapacityError) -> Self {
        ErrorKind::Capacity(e)
    }
}

/// Corruption noted in the watchlists.
///
/// These are unexpected, and indicate a bug rather than a state to recover
/// from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WatchError {
    /// A long watcher to remove was not found in the expected list.
    MissingLong,

    /// A ternary watcher to remove was not found in the expected list.
    MissingTernary,
}

impl From<WatchError> for ErrorKind {
    fn from(e: WatchError) -> Self {
        ErrorKind::Watch(e)
    }
}

/// Errors when loading a serialized scoring model.
#[derive(Debug)]
pub enum PredictError {
    /// The model file could not be read.
    Read(std::io::Error),

    /// The model file could not be parsed.
    Parse(serde_json::Error),

    /// The model parsed, but a node referes to an out-of-bounds child or
    /// feature.
    Malformed,
}

impl From<PredictError> for ErrorKind {
    fn from(e: PredictError) -> Self {
        ErrorKind::Predict(e)
    }
}

impl From<std::io::Error> for PredictError {
    fn from(e: std::io::Error) -> Self {
        PredictError::Read(e)
    }
}

impl From<serde_json::Error> for PredictError {
    fn from(e: serde_json::Error) -> Self {
        PredictError::Parse(e)
    }
}
