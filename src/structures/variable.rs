/*!
(The internal representation of) a variable.

Each variable is a `u32` *v* such that either *v* is 0 or *v − 1* is a
variable, so the variables in use are always [0..*V*) for some *V*.
This allows variables to index every per-variable structure directly
(valuation, variable data, the two scratch maps) without translation.

The representation caps the variable count at [VAR_MAX]: a literal packs a
variable and a polarity into watchlist indices of the form 2*v* + *s*, and
the propagation structures assume those indices fit comfortably in a
`usize`. Requesting a variable at or beyond the cap is a hard error
([VarsExhausted](crate::types::err::CapacityError::VarsExhausted)).
*/

/// A variable, aka. an 'atom'.
pub type Var = u32;

/// The exclusive upper bound on variable counts.
pub const VAR_MAX: Var = 1 << 30;
