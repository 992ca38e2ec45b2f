//! Types which are used across the library, not elsewhere classified.

pub mod err;
