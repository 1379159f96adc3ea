//! Shape matching for JSON response bodies.
//!
//! An expected document describes the minimum a response must contain:
//! objects match by subset, lists match existentially, scalars by value.
//! [`match_partial`] bypasses decoding and looks for a literal fragment.

mod decode;
mod error;
mod matcher;
mod partial;

pub use decode::{DecodeError, decode};
pub use error::{Mismatch, Path, Shape, Side};
pub use matcher::{match_bytes, match_values};
pub use partial::{PartialMatch, match_partial};

/// `Ok(())` when the actual document satisfies the expected one.
pub type MatchResult = Result<(), Mismatch>;
