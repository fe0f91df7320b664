//! # Release-name parser
//!
//! Turns a raw release name into a [`ParsedRelease`](crate::types::ParsedRelease)
//! by folding an ordered table of regex rules over the name.

pub mod heuristic;
pub(crate) mod language;
pub(crate) mod pipeline;

pub use heuristic::{ReleaseParser, parse};
